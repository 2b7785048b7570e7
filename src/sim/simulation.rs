//! 仿真门面
//!
//! 把传染过程、准稳态历史与测量注册表组合成三种对外模型（幂律群组 SIS、连续时间率表 SIS、
//! 离散时间概率表 SIS），并提供 `evolve` 驱动：按固定间隔设置检查点，在检查点上执行测量
//! 与历史记录，过程被吸收时从历史中重新播种。

use tracing::{debug, info};

use super::history::HistoryBuffer;
use super::process::ContagionProcess;
use crate::error::{Result, SchonError};
use crate::measure::{
    InfectiousSet, MarginalInfectionProbability, Measure, MeasureRegistry, Prevalence, TimeSeries,
};
use crate::pop::{BipartiteNetwork, EdgeList, GroupId, NodeId, NodeState, Population};
use crate::rate::{HeterogeneousExposure, PowerlawRate, RateModel, RateTable};

/// 一次 `evolve` 调用的统计
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EvolveStats {
    /// 连续时间为事件数，离散时间为步数
    pub steps: u64,
    pub checkpoints: u64,
    /// 从历史中重新播种的次数
    pub resamples: u64,
}

#[derive(Debug)]
pub struct Simulation {
    process: ContagionProcess,
    history: HistoryBuffer,
    measures: MeasureRegistry,
}

impl Simulation {
    /// 用任意率模型构建
    pub fn new(edges: &EdgeList, recovery: f64, rates: RateModel) -> Result<Self> {
        Self::from_network(BipartiteNetwork::from_edges(edges)?, recovery, rates)
    }

    /// 用已构建好的网络构建
    pub fn from_network(
        network: BipartiteNetwork,
        recovery: f64,
        rates: RateModel,
    ) -> Result<Self> {
        info!(
            nodes = network.size(),
            groups = network.number_of_groups(),
            max_group_size = network.max_group_size(),
            discrete = rates.is_discrete(),
            "构建仿真"
        );
        Ok(Self {
            process: ContagionProcess::new(network, rates, recovery)?,
            history: HistoryBuffer::default(),
            measures: MeasureRegistry::default(),
        })
    }

    /// 幂律群组 SIS（连续时间）
    pub fn powerlaw_group_sis(
        edges: &EdgeList,
        recovery_rate: f64,
        scale_infection: f64,
        shape_infection: f64,
        rate_bounds: (f64, f64),
    ) -> Result<Self> {
        let rate = PowerlawRate::new(scale_infection, shape_infection, rate_bounds)?;
        Self::new(edges, recovery_rate, RateModel::Powerlaw(rate))
    }

    /// 连续时间率表 SIS：`infection_rate[n][i]` 乘以逐群组的 `group_transmission_rate`
    pub fn continuous_sis(
        edges: &EdgeList,
        recovery_rate: f64,
        infection_rate: Vec<Vec<f64>>,
        group_transmission_rate: Vec<f64>,
    ) -> Result<Self> {
        let rates = RateModel::ContinuousTable {
            table: RateTable::new(infection_rate),
            transmission: group_transmission_rate,
        };
        Self::new(edges, recovery_rate, rates)
    }

    /// 离散时间概率表 SIS
    pub fn discrete_sis(
        edges: &EdgeList,
        recovery_probability: f64,
        infection_probability: Vec<Vec<f64>>,
    ) -> Result<Self> {
        let rates = RateModel::DiscreteTable(RateTable::new(infection_probability));
        Self::new(edges, recovery_probability, rates)
    }

    /// 异质暴露 SIS（离散时间）：每个易感成员在每个群组中抽取幂律分布的参与时间
    /// `tau ∈ [1, T]` 与剂量 `-beta * tau * rho * ln(1 - r)`，剂量超过 `K` 即被感染，
    /// 其中 `rho = i / (n - 1)`。
    pub fn heterogeneous_exposure(
        edges: &EdgeList,
        recovery_probability: f64,
        alpha: f64,
        max_participation_time: f64,
        beta: f64,
        dose_threshold: f64,
    ) -> Result<Self> {
        let exposure =
            HeterogeneousExposure::new(alpha, max_participation_time, beta, dose_threshold)?;
        Self::new(
            edges,
            recovery_probability,
            RateModel::HeterogeneousExposure(exposure),
        )
    }

    pub fn process(&self) -> &ContagionProcess {
        &self.process
    }

    pub fn population(&self) -> &Population {
        self.process.population()
    }

    pub fn network(&self) -> &BipartiteNetwork {
        self.process.population().network()
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn size(&self) -> usize {
        self.population().size()
    }

    pub fn current_time(&self) -> f64 {
        self.process.current_time()
    }

    pub fn number_of_infected_nodes(&self) -> usize {
        self.population().infected_count()
    }

    /// 节点当前状态
    pub fn node_state(&self, node: usize) -> NodeState {
        self.population().state(NodeId(node))
    }

    pub fn node_states(&self) -> &[NodeState] {
        self.population().states()
    }

    /// 升序排列的感染节点编号
    pub fn infected_nodes(&self) -> Vec<usize> {
        self.population().snapshot()
    }

    pub fn group_infected_count(&self, group: usize) -> usize {
        self.population().group_infected(GroupId(group))
    }

    pub fn total_rate(&self) -> f64 {
        self.process.total_rate()
    }

    pub fn lifetime(&self) -> f64 {
        self.process.lifetime()
    }

    pub fn seed(&mut self, seed: u64) {
        self.process.seed(seed);
    }

    pub fn infect_fraction(&mut self, fraction: f64) -> Result<()> {
        self.process.infect_fraction(fraction)
    }

    pub fn infect_node_set(&mut self, nodes: &[usize]) -> Result<()> {
        self.process.infect_node_set(nodes)
    }

    /// 所有节点恢复为易感；时间、测量与历史不变
    pub fn clear(&mut self) {
        self.process.clear();
    }

    /// 回到时间 0、全体易感，并清空测量累计值与历史
    pub fn reset(&mut self) {
        self.process.reset();
        self.measures.clear_all();
        self.history.clear();
    }

    /// 分配准稳态历史；当前构型存活时立即记录一份
    pub fn initialize_history(&mut self, capacity: usize) {
        self.history.initialize(capacity);
        self.history.record(self.process.population());
        debug!(capacity, stored = self.history.len(), "初始化准稳态历史");
    }

    /// 注册测量；同名测量已存在时忽略并返回 false
    pub fn register_measure(&mut self, measure: Box<dyn Measure>) -> bool {
        self.measures.register(measure)
    }

    pub fn measure_prevalence(&mut self) -> bool {
        self.register_measure(Box::new(Prevalence::default()))
    }

    pub fn measure_marginal_infection_probability(&mut self) -> bool {
        let n = self.size();
        self.register_measure(Box::new(MarginalInfectionProbability::new(n)))
    }

    pub fn measure_infectious_set(&mut self) -> bool {
        self.register_measure(Box::new(InfectiousSet::default()))
    }

    pub fn measure_time(&mut self) -> bool {
        self.register_measure(Box::new(TimeSeries::default()))
    }

    /// 已注册的测量（按注册顺序）
    pub fn measures(&self) -> &MeasureRegistry {
        &self.measures
    }

    /// 推进仿真 `duration`（离散时间为步数），每隔 `interval` 设置一个检查点。
    ///
    /// 检查点上：`measure` 为真时更新所有测量，`quasistationary` 为真时记录历史。
    /// 准稳态模式下过程一旦被吸收，立即从历史中均匀抽取构型恢复；历史为空时返回
    /// [`SchonError::EmptyHistory`]，此时实例应丢弃。
    #[tracing::instrument(skip(self), fields(t0 = self.current_time()))]
    pub fn evolve(
        &mut self,
        duration: f64,
        interval: f64,
        measure: bool,
        quasistationary: bool,
    ) -> Result<EvolveStats> {
        if !duration.is_finite() || duration < 0.0 {
            return Err(SchonError::NegativeDuration(duration));
        }
        if !interval.is_finite() || interval <= 0.0 {
            return Err(SchonError::InvalidInterval(interval));
        }

        info!(infected = self.number_of_infected_nodes(), "▶️  开始演化");
        let stats = if self.process.is_discrete() {
            self.evolve_discrete(duration, interval, measure, quasistationary)?
        } else {
            self.evolve_continuous(duration, interval, measure, quasistationary)?
        };
        info!(
            now = self.current_time(),
            infected = self.number_of_infected_nodes(),
            steps = stats.steps,
            checkpoints = stats.checkpoints,
            resamples = stats.resamples,
            "✅ 演化完成"
        );
        Ok(stats)
    }

    fn evolve_continuous(
        &mut self,
        duration: f64,
        interval: f64,
        measure: bool,
        quasistationary: bool,
    ) -> Result<EvolveStats> {
        let t0 = self.current_time();
        let end = t0 + duration;
        let checkpoints = checkpoint_count(duration, interval);
        let mut stats = EvolveStats::default();
        let mut next_k: u64 = 1;

        loop {
            let total = self.process.total_rate();
            let next = if total > 0.0 {
                self.current_time() + self.process.draw_waiting_time(total)
            } else {
                f64::INFINITY
            };

            // 检查点看到的是下一事件发生前的状态
            while next_k <= checkpoints {
                let at = t0 + next_k as f64 * interval;
                if at >= next {
                    break;
                }
                self.process.clock_mut().set(at.min(end));
                self.checkpoint(measure, quasistationary);
                stats.checkpoints += 1;
                next_k += 1;
            }

            if next > end {
                break;
            }
            self.process.clock_mut().set(next);
            self.process.fire_event(total);
            stats.steps += 1;
            if self.resample_if_absorbed(quasistationary)? {
                stats.resamples += 1;
            }
        }

        let now = self.current_time();
        self.process.clock_mut().set(end.max(now));
        Ok(stats)
    }

    fn evolve_discrete(
        &mut self,
        duration: f64,
        interval: f64,
        measure: bool,
        quasistationary: bool,
    ) -> Result<EvolveStats> {
        let ticks = duration.floor() as u64;
        let every = (interval.round() as u64).max(1);
        let mut stats = EvolveStats::default();

        for t in 1..=ticks {
            // 只有本步把存活构型变为吸收态时才恢复；一开始就吸收的过程保持空转
            let was_alive = !self.process.population().is_absorbed();
            self.process.tick();
            stats.steps += 1;
            if was_alive && self.resample_if_absorbed(quasistationary)? {
                stats.resamples += 1;
            }
            if t % every == 0 {
                self.checkpoint(measure, quasistationary);
                stats.checkpoints += 1;
            }
        }
        Ok(stats)
    }

    fn checkpoint(&mut self, measure: bool, quasistationary: bool) {
        let now = self.current_time();
        let population = self.process.population();
        if measure {
            self.measures.update_all(population, now);
        }
        if quasistationary {
            self.history.record(population);
        }
    }

    /// 准稳态模式下若已被吸收，则从历史中恢复。返回是否发生了恢复。
    fn resample_if_absorbed(&mut self, quasistationary: bool) -> Result<bool> {
        if !quasistationary || !self.process.population().is_absorbed() {
            return Ok(false);
        }
        let time = self.current_time();
        let snapshot = self
            .history
            .draw(self.process.rng_mut())
            .map(<[usize]>::to_vec)
            .ok_or(SchonError::EmptyHistory { time })?;
        debug!(
            now = self.current_time(),
            infected = snapshot.len(),
            "⚠️  过程被吸收，从历史中恢复构型"
        );
        self.process.restore(&snapshot);
        Ok(true)
    }
}

/// 一次演化中检查点的个数：`floor(duration / interval)`，容忍除法的舍入误差
fn checkpoint_count(duration: f64, interval: f64) -> u64 {
    (duration / interval + 1e-9).floor() as u64
}

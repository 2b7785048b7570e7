//! 传染过程
//!
//! 持有人群、率模型、加权抽样器、时钟与随机数发生器，负责单个状态翻转及其级联更新：
//! - 连续时间：精确随机模拟，每步恰好执行一个事件（恢复或感染）；
//! - 离散时间：同步更新，每步基于步前快照做独立伯努利试验，步末统一翻转。

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::trace;

use super::time::Clock;
use crate::error::{Result, SchonError};
use crate::pop::{BipartiteNetwork, GroupId, NodeId, Population};
use crate::rate::{RateModel, check_probability, check_rate};
use crate::sampler::EventSampler;

#[derive(Debug, Clone)]
pub struct ContagionProcess {
    population: Population,
    rates: RateModel,
    /// 连续时间为恢复率，离散时间为恢复概率
    recovery: f64,
    /// 每个群组当前施加在易感成员上的强度（仅连续时间维护）
    group_rates: Vec<f64>,
    sampler: EventSampler,
    clock: Clock,
    rng: ChaCha8Rng,
    // 级联更新的去重标记
    touched: Vec<usize>,
    stamp: Vec<u64>,
    epoch: u64,
    // 离散时间步的临时缓冲
    escape: Vec<f64>,
    flips: Vec<NodeId>,
}

impl ContagionProcess {
    /// 创建全体易感的过程。随机数发生器取自系统熵源，需复现时调用 [`ContagionProcess::seed`]。
    pub fn new(network: BipartiteNetwork, rates: RateModel, recovery: f64) -> Result<Self> {
        rates.validate(&network)?;
        if rates.is_discrete() {
            check_probability("recovery_probability", recovery)?;
        } else {
            check_rate("recovery_rate", recovery)?;
        }

        let n = network.size();
        let g = network.number_of_groups();
        let discrete = rates.is_discrete();
        let mut process = Self {
            population: Population::new(network),
            rates,
            recovery,
            group_rates: vec![0.0; g],
            sampler: EventSampler::new(if discrete { 0 } else { n }),
            clock: Clock::zero(discrete),
            rng: ChaCha8Rng::from_entropy(),
            touched: Vec::new(),
            stamp: vec![0; n],
            epoch: 0,
            escape: Vec::with_capacity(if discrete { g } else { 0 }),
            flips: Vec::new(),
        };
        if !discrete {
            process.rebuild_rates();
        }
        Ok(process)
    }

    /// 重新设置随机数发生器状态
    pub fn seed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn rates(&self) -> &RateModel {
        &self.rates
    }

    pub fn recovery(&self) -> f64 {
        self.recovery
    }

    pub fn is_discrete(&self) -> bool {
        self.rates.is_discrete()
    }

    pub fn clock(&self) -> Clock {
        self.clock
    }

    pub fn current_time(&self) -> f64 {
        self.clock.now()
    }

    pub(crate) fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    pub(crate) fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// 节点当前的总感染强度（连续时间；已感染节点为 0）
    pub fn hazard(&self, node: NodeId) -> f64 {
        self.sampler.weight(node.0)
    }

    /// 群组当前强度缓存（连续时间）
    pub fn group_rate(&self, group: GroupId) -> f64 {
        self.group_rates[group.0]
    }

    /// 所有易感节点感染强度之和
    pub fn infection_rate(&self) -> f64 {
        if self.is_discrete() {
            return 0.0;
        }
        self.sampler.total_weight()
    }

    /// 所有感染节点恢复率之和
    pub fn recovery_rate_total(&self) -> f64 {
        if self.is_discrete() {
            return 0.0;
        }
        self.population.infected_count() as f64 * self.recovery
    }

    /// 连续时间下的总事件率
    pub fn total_rate(&self) -> f64 {
        self.recovery_rate_total() + self.infection_rate()
    }

    /// 当前状态的期望停留时间；没有任何可发生的事件时为无穷大
    pub fn lifetime(&self) -> f64 {
        if self.is_discrete() {
            return if self.population.is_absorbed() {
                f64::INFINITY
            } else {
                1.0
            };
        }
        let total = self.total_rate();
        if total > 0.0 {
            1.0 / total
        } else {
            f64::INFINITY
        }
    }

    /// S -> I，并更新所有受影响易感节点的强度。节点原本已感染时返回 false。
    pub fn infect(&mut self, node: NodeId) -> bool {
        if !self.population.infect(node) {
            return false;
        }
        if !self.is_discrete() {
            self.sampler.remove(node.0);
            self.refresh_groups_of(node);
        }
        true
    }

    /// I -> S，并更新所有受影响易感节点的强度。节点原本易感时返回 false。
    pub fn recover(&mut self, node: NodeId) -> bool {
        if !self.population.recover(node) {
            return false;
        }
        if !self.is_discrete() {
            self.sampler.insert(node.0, 0.0);
            self.refresh_groups_of(node);
            let hazard = self.node_hazard(node);
            self.sampler.update(node.0, hazard);
        }
        true
    }

    /// 随机感染 `floor(fraction * N)` 个节点（从当前易感节点中均匀无放回抽取）。
    pub fn infect_fraction(&mut self, fraction: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(SchonError::InvalidFraction(fraction));
        }
        let wanted = (self.population.size() as f64 * fraction).floor() as usize;
        let susceptible: Vec<NodeId> = self
            .population
            .network()
            .nodes()
            .filter(|&n| !self.population.state(n).is_infected())
            .collect();
        let chosen: Vec<NodeId> = susceptible
            .choose_multiple(&mut self.rng, wanted.min(susceptible.len()))
            .copied()
            .collect();
        for node in chosen {
            self.infect(node);
        }
        Ok(())
    }

    /// 感染给定节点集合；已感染的节点跳过。
    pub fn infect_node_set(&mut self, nodes: &[usize]) -> Result<()> {
        let size = self.population.size();
        if let Some(&node) = nodes.iter().find(|&&n| n >= size) {
            return Err(SchonError::UnknownNode { node, size });
        }
        for &node in nodes {
            self.infect(NodeId(node));
        }
        Ok(())
    }

    /// 恢复所有节点，时间不变
    pub fn clear(&mut self) {
        while let Some(&node) = self.population.infected().last() {
            self.recover(node);
        }
    }

    /// 用快照替换当前构型（时间不变）
    pub(crate) fn restore(&mut self, snapshot: &[usize]) {
        self.clear();
        for &node in snapshot {
            self.infect(NodeId(node));
        }
    }

    /// 抽取到下一个事件的指数等待时间，`total` 必须为正
    pub(crate) fn draw_waiting_time(&mut self, total: f64) -> f64 {
        let u: f64 = self.rng.gen_range(0.0..1.0);
        -(1.0 - u).ln() / total
    }

    /// 按两类事件率之比选择事件类型并执行，`total` 为当前总事件率
    pub(crate) fn fire_event(&mut self, total: f64) {
        let recovery = self.recovery_rate_total();
        let u = self.rng.gen_range(0.0..total);
        if u < recovery {
            self.recover_uniform();
        } else if let Some(id) = self.sampler.sample(&mut self.rng) {
            trace!(node = id, hazard = self.sampler.weight(id), "感染事件");
            self.infect(NodeId(id));
        } else {
            // 舍入使 u 落在感染区间但感染率实际为 0
            self.recover_uniform();
        }
    }

    fn recover_uniform(&mut self) {
        let count = self.population.infected_count();
        if count == 0 {
            return;
        }
        let node = self.population.infected_at(self.rng.gen_range(0..count));
        trace!(node = node.0, "恢复事件");
        self.recover(node);
    }

    /// 离散时间同步更新一步
    pub(crate) fn tick(&mut self) {
        let network = self.population.network();
        let exposure = match &self.rates {
            RateModel::HeterogeneousExposure(exposure) => Some(*exposure),
            _ => None,
        };

        // 每个群组对其易感成员的逃逸概率，全部基于步前状态；暴露模型逐次抽样，不用此表
        self.escape.clear();
        for group in network.groups() {
            let n = network.group_size(group);
            let q = if n == 0 || exposure.is_some() {
                1.0
            } else {
                let i = self.population.group_infected(group);
                1.0 - self.rates.group_intensity(group, n, i)
            };
            self.escape.push(q);
        }

        self.flips.clear();
        for node in network.nodes() {
            let flip = if self.population.state(node).is_infected() {
                self.recovery > 0.0 && self.rng.gen_bool(self.recovery)
            } else if let Some(exposure) = &exposure {
                network.adjacent_groups(node).iter().any(|&g| {
                    let n = network.group_size(g);
                    let i = self.population.group_infected(g);
                    exposure.exposed(n, i, &mut self.rng)
                })
            } else {
                let escape: f64 = network
                    .adjacent_groups(node)
                    .iter()
                    .map(|g| self.escape[g.0])
                    .product();
                let p = (1.0 - escape).clamp(0.0, 1.0);
                p > 0.0 && self.rng.gen_bool(p)
            };
            if flip {
                self.flips.push(node);
            }
        }

        let flips = std::mem::take(&mut self.flips);
        for &node in &flips {
            if self.population.state(node).is_infected() {
                self.population.recover(node);
            } else {
                self.population.infect(node);
            }
        }
        self.flips = flips;
        self.clock.tick();
    }

    /// 回到时间 0、全体易感
    pub(crate) fn reset(&mut self) {
        self.clear();
        self.clock.reset();
        if !self.is_discrete() {
            // 丢弃长时间运行留下的强度缓存
            self.rebuild_rates();
        }
    }

    /// 由当前状态整体重建群组强度与抽样器（构造与重置时使用）
    fn rebuild_rates(&mut self) {
        let network = self.population.network();
        for group in network.groups() {
            let n = network.group_size(group);
            self.group_rates[group.0] = if n == 0 {
                0.0
            } else {
                let i = self.population.group_infected(group);
                self.rates.group_intensity(group, n, i)
            };
        }
        self.sampler.clear();
        for node in network.nodes() {
            if !self.population.state(node).is_infected() {
                let hazard = self.node_hazard(node);
                self.sampler.insert(node.0, hazard);
            }
        }
    }

    fn node_hazard(&self, node: NodeId) -> f64 {
        self.population
            .network()
            .adjacent_groups(node)
            .iter()
            .map(|g| self.group_rates[g.0])
            .sum()
    }

    /// `node` 翻转后，重算其所在群组的强度，并刷新这些群组中易感成员的缓存强度。
    fn refresh_groups_of(&mut self, node: NodeId) {
        self.epoch = self.epoch.wrapping_add(1);
        self.touched.clear();

        let network = self.population.network();
        for &group in network.adjacent_groups(node) {
            let n = network.group_size(group);
            let i = self.population.group_infected(group);
            let rate = self.rates.group_intensity(group, n, i);
            if rate == self.group_rates[group.0] {
                continue;
            }
            self.group_rates[group.0] = rate;
            for &member in network.group_members(group) {
                if self.population.state(member).is_infected()
                    || self.stamp[member.0] == self.epoch
                {
                    continue;
                }
                self.stamp[member.0] = self.epoch;
                self.touched.push(member.0);
            }
        }

        for k in 0..self.touched.len() {
            let member = NodeId(self.touched[k]);
            let hazard = self.node_hazard(member);
            self.sampler.update(member.0, hazard);
        }
    }
}

//! 场景描述（JSON）
//!
//! 一个场景给出人群结构、模型参数、初始条件、要注册的测量以及若干演化阶段，
//! 例如先不测量的预热阶段，再做测量阶段。

use serde::{Deserialize, Serialize};
use tracing::info;

use super::simulation::Simulation;
use crate::error::{Result, SchonError};
use crate::pop::BipartiteNetwork;
use crate::rate::{HeterogeneousExposure, PowerlawRate, RateModel, RateTable};

pub const SCENARIO_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSpec {
    pub schema_version: u32,
    pub structure: StructureSpec,
    pub model: ModelSpec,
    #[serde(default)]
    pub initial_infected_fraction: Option<f64>,
    #[serde(default)]
    pub initial_infected: Option<Vec<usize>>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub history_capacity: Option<usize>,
    #[serde(default)]
    pub measures: Vec<MeasureKind>,
    #[serde(default)]
    pub phases: Vec<PhaseSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StructureSpec {
    /// 显式 (节点, 群组) 边列表
    EdgeList { edges: Vec<(usize, usize)> },
    /// `nodes` 个节点，每个节点属于全部 `groups` 个群组
    CompleteGroups { nodes: usize, groups: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSpec {
    Powerlaw {
        recovery_rate: f64,
        scale_infection: f64,
        shape_infection: f64,
        rate_bounds: (f64, f64),
    },
    ContinuousTable {
        recovery_rate: f64,
        infection_rate: TableSpec,
        group_transmission_rate: Vec<f64>,
    },
    DiscreteTable {
        recovery_probability: f64,
        infection_probability: TableSpec,
    },
    HeterogeneousExposure {
        recovery_probability: f64,
        alpha: f64,
        max_participation_time: f64,
        beta: f64,
        dose_threshold: f64,
    },
}

/// 率表：显式给出，或按最大群组大小生成
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TableSpec {
    Explicit { rows: Vec<Vec<f64>> },
    /// `scale * i`
    Linear { scale: f64 },
    /// `scale * i^shape`，`i == 0` 时为 0
    Powerlaw { scale: f64, shape: f64 },
}

impl TableSpec {
    pub fn to_table(&self, max_group_size: usize) -> RateTable {
        match self {
            TableSpec::Explicit { rows } => RateTable::new(rows.clone()),
            TableSpec::Linear { scale } => {
                RateTable::from_fn(max_group_size, |_, i| scale * i as f64)
            }
            TableSpec::Powerlaw { scale, shape } => RateTable::from_fn(max_group_size, |_, i| {
                if i == 0 {
                    0.0
                } else {
                    scale * (i as f64).powf(*shape)
                }
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MeasureKind {
    Prevalence,
    MarginalInfectionProbability,
    InfectiousSet,
    Time,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseSpec {
    pub duration: f64,
    #[serde(default = "default_interval")]
    pub interval: f64,
    #[serde(default)]
    pub measure: bool,
    #[serde(default)]
    pub quasistationary: bool,
}

fn default_interval() -> f64 {
    1.0
}

impl StructureSpec {
    pub fn edges(&self) -> Vec<(usize, usize)> {
        match self {
            StructureSpec::EdgeList { edges } => edges.clone(),
            StructureSpec::CompleteGroups { nodes, groups } => (0..*nodes)
                .flat_map(|n| (0..*groups).map(move |g| (n, g)))
                .collect(),
        }
    }
}

impl ScenarioSpec {
    pub fn from_json(raw: &str) -> Result<Self> {
        let spec: ScenarioSpec = serde_json::from_str(raw)?;
        if spec.schema_version != SCENARIO_SCHEMA_VERSION {
            return Err(SchonError::UnsupportedSchema(spec.schema_version));
        }
        Ok(spec)
    }

    /// 构建仿真并设置初始条件与测量（不执行任何阶段）。`seed` 覆盖场景中的种子。
    pub fn build(&self, seed: Option<u64>) -> Result<Simulation> {
        let edges = self.structure.edges();
        let network = BipartiteNetwork::from_edges(&edges)?;
        let max_group_size = network.max_group_size();

        let (recovery, rates) = match &self.model {
            ModelSpec::Powerlaw {
                recovery_rate,
                scale_infection,
                shape_infection,
                rate_bounds,
            } => {
                let rate = PowerlawRate::new(*scale_infection, *shape_infection, *rate_bounds)?;
                (*recovery_rate, RateModel::Powerlaw(rate))
            }
            ModelSpec::ContinuousTable {
                recovery_rate,
                infection_rate,
                group_transmission_rate,
            } => {
                let rates = RateModel::ContinuousTable {
                    table: infection_rate.to_table(max_group_size),
                    transmission: group_transmission_rate.clone(),
                };
                (*recovery_rate, rates)
            }
            ModelSpec::DiscreteTable {
                recovery_probability,
                infection_probability,
            } => {
                let table = infection_probability.to_table(max_group_size);
                (*recovery_probability, RateModel::DiscreteTable(table))
            }
            ModelSpec::HeterogeneousExposure {
                recovery_probability,
                alpha,
                max_participation_time,
                beta,
                dose_threshold,
            } => {
                let exposure = HeterogeneousExposure::new(
                    *alpha,
                    *max_participation_time,
                    *beta,
                    *dose_threshold,
                )?;
                (
                    *recovery_probability,
                    RateModel::HeterogeneousExposure(exposure),
                )
            }
        };
        let mut sim = Simulation::from_network(network, recovery, rates)?;

        if let Some(seed) = seed.or(self.seed) {
            sim.seed(seed);
        }
        if let Some(fraction) = self.initial_infected_fraction {
            sim.infect_fraction(fraction)?;
        }
        if let Some(nodes) = &self.initial_infected {
            sim.infect_node_set(nodes)?;
        }
        if let Some(capacity) = self.history_capacity {
            sim.initialize_history(capacity);
        }
        for kind in &self.measures {
            match kind {
                MeasureKind::Prevalence => sim.measure_prevalence(),
                MeasureKind::MarginalInfectionProbability => {
                    sim.measure_marginal_infection_probability()
                }
                MeasureKind::InfectiousSet => sim.measure_infectious_set(),
                MeasureKind::Time => sim.measure_time(),
            };
        }
        Ok(sim)
    }

    /// 构建并依次执行所有阶段
    pub fn run(&self, seed: Option<u64>) -> Result<Simulation> {
        let mut sim = self.build(seed)?;
        for (idx, phase) in self.phases.iter().enumerate() {
            info!(
                phase = idx,
                duration = phase.duration,
                interval = phase.interval,
                measure = phase.measure,
                quasistationary = phase.quasistationary,
                "执行阶段"
            );
            sim.evolve(
                phase.duration,
                phase.interval,
                phase.measure,
                phase.quasistationary,
            )?;
        }
        Ok(sim)
    }
}

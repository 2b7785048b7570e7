//! 边际感染概率：每个节点在所有检查点中处于感染态的经验频率（按节点编号排列）

use super::{Measure, MeasureResult};
use crate::pop::Population;

#[derive(Debug, Clone)]
pub struct MarginalInfectionProbability {
    infected_counts: Vec<u64>,
    samples: u64,
}

impl MarginalInfectionProbability {
    pub const NAME: &'static str = "marginal_infection_probability";

    pub fn new(network_size: usize) -> Self {
        Self {
            infected_counts: vec![0; network_size],
            samples: 0,
        }
    }

    pub fn samples(&self) -> u64 {
        self.samples
    }
}

impl Measure for MarginalInfectionProbability {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn update(&mut self, population: &Population, _time: f64) {
        for node in population.infected() {
            self.infected_counts[node.0] += 1;
        }
        self.samples += 1;
    }

    /// 尚未采样时全部为 0
    fn result(&self) -> MeasureResult {
        let denom = self.samples.max(1) as f64;
        MeasureResult::Series(
            self.infected_counts
                .iter()
                .map(|&c| c as f64 / denom)
                .collect(),
        )
    }

    fn clear(&mut self) {
        self.infected_counts.fill(0);
        self.samples = 0;
    }
}

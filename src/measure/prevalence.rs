//! 流行率：每个检查点上感染节点所占比例

use super::{Measure, MeasureResult};
use crate::pop::Population;

#[derive(Debug, Default, Clone)]
pub struct Prevalence {
    values: Vec<f64>,
}

impl Prevalence {
    pub const NAME: &'static str = "prevalence";
}

impl Measure for Prevalence {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn update(&mut self, population: &Population, _time: f64) {
        self.values.push(population.prevalence());
    }

    fn result(&self) -> MeasureResult {
        MeasureResult::Series(self.values.clone())
    }

    fn clear(&mut self) {
        self.values.clear();
    }
}

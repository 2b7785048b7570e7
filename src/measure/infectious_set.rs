//! 感染集合：每个检查点记录一次升序排列的感染节点编号

use super::{Measure, MeasureResult};
use crate::pop::Population;

#[derive(Debug, Default, Clone)]
pub struct InfectiousSet {
    sets: Vec<Vec<usize>>,
}

impl InfectiousSet {
    pub const NAME: &'static str = "infectious_set";
}

impl Measure for InfectiousSet {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn update(&mut self, population: &Population, _time: f64) {
        self.sets.push(population.snapshot());
    }

    fn result(&self) -> MeasureResult {
        MeasureResult::Sets(self.sets.clone())
    }

    fn clear(&mut self) {
        self.sets.clear();
    }
}

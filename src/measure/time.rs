//! 检查点时间

use super::{Measure, MeasureResult};
use crate::pop::Population;

#[derive(Debug, Default, Clone)]
pub struct TimeSeries {
    times: Vec<f64>,
}

impl TimeSeries {
    pub const NAME: &'static str = "time";
}

impl Measure for TimeSeries {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn update(&mut self, _population: &Population, time: f64) {
        self.times.push(time);
    }

    fn result(&self) -> MeasureResult {
        MeasureResult::Series(self.times.clone())
    }

    fn clear(&mut self) {
        self.times.clear();
    }
}

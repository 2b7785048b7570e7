//! 测量
//!
//! 每个测量有唯一名字，在每个检查点上 `update` 一次，`result` 返回累计统计量。
//! 累计值跨多次 `evolve` 调用保留，直到显式清空。

mod infectious_set;
mod marginal;
mod prevalence;
mod registry;
mod time;

pub use infectious_set::InfectiousSet;
pub use marginal::MarginalInfectionProbability;
pub use prevalence::Prevalence;
pub use registry::MeasureRegistry;
pub use time::TimeSeries;

use serde::Serialize;

use crate::pop::Population;

/// 测量结果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MeasureResult {
    /// 实数序列（按检查点或按节点编号排列）
    Series(Vec<f64>),
    /// 每个检查点一个节点编号集合
    Sets(Vec<Vec<usize>>),
}

impl MeasureResult {
    pub fn as_series(&self) -> Option<&[f64]> {
        match self {
            MeasureResult::Series(v) => Some(v),
            MeasureResult::Sets(_) => None,
        }
    }

    pub fn as_sets(&self) -> Option<&[Vec<usize>]> {
        match self {
            MeasureResult::Sets(v) => Some(v),
            MeasureResult::Series(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            MeasureResult::Series(v) => v.len(),
            MeasureResult::Sets(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 测量探针
pub trait Measure: std::fmt::Debug {
    fn name(&self) -> &str;
    /// 在检查点上采样一次
    fn update(&mut self, population: &Population, time: f64);
    fn result(&self) -> MeasureResult;
    /// 丢弃累计值
    fn clear(&mut self);
}

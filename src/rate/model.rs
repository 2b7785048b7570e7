//! 率模型（和类型）

use super::exposure::HeterogeneousExposure;
use super::table::RateTable;
use crate::error::{Result, SchonError};
use crate::pop::{BipartiteNetwork, GroupId};

/// 幂律率：`clamp(scale * i^shape, lo, hi)`，`i == 0` 时为 0。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerlawRate {
    pub scale: f64,
    pub shape: f64,
    pub bounds: (f64, f64),
}

impl PowerlawRate {
    pub fn new(scale: f64, shape: f64, bounds: (f64, f64)) -> Result<Self> {
        check_rate("scale", scale)?;
        check_rate("rate_bounds.0", bounds.0)?;
        check_rate("rate_bounds.1", bounds.1)?;
        if !shape.is_finite() {
            return Err(SchonError::InvalidRate {
                what: "shape".to_string(),
                value: shape,
            });
        }
        if bounds.0 > bounds.1 {
            return Err(SchonError::InvalidRate {
                what: "rate_bounds (lower above upper)".to_string(),
                value: bounds.0,
            });
        }
        Ok(Self {
            scale,
            shape,
            bounds,
        })
    }

    pub fn rate(&self, i: usize) -> f64 {
        if i == 0 {
            return 0.0;
        }
        let raw = self.scale * (i as f64).powf(self.shape);
        raw.clamp(self.bounds.0, self.bounds.1)
    }
}

/// 感染率模型。构造时选定变体，同时决定时间模型：前两种为连续时间，后两种为离散时间。
#[derive(Debug, Clone)]
pub enum RateModel {
    Powerlaw(PowerlawRate),
    /// 每个易感成员的感染率表，再乘以逐群组的传播系数
    ContinuousTable {
        table: RateTable,
        transmission: Vec<f64>,
    },
    /// 每个易感成员在一个时间步内被该群组感染的概率
    DiscreteTable(RateTable),
    /// 每个易感成员在每个群组中抽取参与时间与剂量，剂量超过阈值即被感染
    HeterogeneousExposure(HeterogeneousExposure),
}

impl RateModel {
    pub fn is_discrete(&self) -> bool {
        matches!(
            self,
            RateModel::DiscreteTable(_) | RateModel::HeterogeneousExposure(_)
        )
    }

    /// 只依赖 `(n, i)` 的基础强度/概率
    pub fn intensity(&self, n: usize, i: usize) -> f64 {
        match self {
            RateModel::Powerlaw(p) => p.rate(i),
            RateModel::ContinuousTable { table, .. } => table.get(n, i),
            RateModel::DiscreteTable(table) => table.get(n, i),
            RateModel::HeterogeneousExposure(exposure) => exposure.infection_probability(n, i),
        }
    }

    /// 群组 `group` 施加在每个易感成员上的强度（含传播系数）
    pub fn group_intensity(&self, group: GroupId, n: usize, i: usize) -> f64 {
        match self {
            RateModel::ContinuousTable { transmission, .. } => {
                transmission[group.0] * self.intensity(n, i)
            }
            _ => self.intensity(n, i),
        }
    }

    /// 确认模型参数覆盖网络中可能出现的每个 `(n, i)`。
    pub fn validate(&self, network: &BipartiteNetwork) -> Result<()> {
        match self {
            RateModel::Powerlaw(_) | RateModel::HeterogeneousExposure(_) => Ok(()),
            RateModel::ContinuousTable {
                table,
                transmission,
            } => {
                if transmission.len() < network.number_of_groups() {
                    return Err(SchonError::MissingTransmissionRate {
                        given: transmission.len(),
                        groups: network.number_of_groups(),
                    });
                }
                for (g, &value) in transmission.iter().enumerate() {
                    check_rate(&format!("group_transmission_rate[{g}]"), value)?;
                }
                table.validate(&network.group_sizes(), false)
            }
            RateModel::DiscreteTable(table) => table.validate(&network.group_sizes(), true),
        }
    }
}

pub(crate) fn check_rate(what: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(SchonError::InvalidRate {
            what: what.to_string(),
            value,
        });
    }
    Ok(())
}

pub(crate) fn check_probability(what: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(SchonError::InvalidProbability {
            what: what.to_string(),
            value,
        });
    }
    Ok(())
}

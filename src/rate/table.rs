//! 二维率表
//!
//! `rows[n][i]`：大小为 `n`、含 `i` 个感染成员的群组对应的值。

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchonError};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateTable {
    rows: Vec<Vec<f64>>,
}

impl RateTable {
    pub fn new(rows: Vec<Vec<f64>>) -> Self {
        Self { rows }
    }

    /// 由函数生成覆盖 `0..=max_group_size` 的完整表
    pub fn from_fn(max_group_size: usize, f: impl Fn(usize, usize) -> f64) -> Self {
        let rows = (0..=max_group_size)
            .map(|n| (0..=n).map(|i| f(n, i)).collect())
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// 读取 `(n, i)`；调用前必须已通过 [`RateTable::validate`]。
    pub fn get(&self, n: usize, i: usize) -> f64 {
        self.rows[n][i]
    }

    /// 检查表覆盖 `sizes` 中每个群组大小的全部 `(n, i)`，并且每个值合法。
    /// `probability` 为真时值必须落在 [0, 1]，否则只要求有限非负。
    pub fn validate(&self, sizes: &[usize], probability: bool) -> Result<()> {
        for &n in sizes {
            let row_len = self.rows.get(n).map_or(0, Vec::len);
            if row_len < n + 1 {
                return Err(SchonError::TableTooSmall {
                    group_size: n,
                    row_len,
                    needed: n + 1,
                });
            }
            for (i, &value) in self.rows[n][..=n].iter().enumerate() {
                let what = format!("table[{n}][{i}]");
                if probability {
                    if !(0.0..=1.0).contains(&value) {
                        return Err(SchonError::InvalidProbability { what, value });
                    }
                } else if !value.is_finite() || value < 0.0 {
                    return Err(SchonError::InvalidRate { what, value });
                }
            }
        }
        Ok(())
    }
}

//! 感染率模型
//!
//! 四种模型共享同一个契约：给定群组大小 `n` 与感染成员数 `i`，返回该群组施加在
//! 每个易感成员上的感染强度（连续时间）或感染概率（离散时间）。模型无状态、无副作用。

mod exposure;
mod model;
mod table;

pub use exposure::HeterogeneousExposure;
pub(crate) use model::{check_probability, check_rate};
pub use model::{PowerlawRate, RateModel};
pub use table::RateTable;

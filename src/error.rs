//! 错误类型
//!
//! 所有错误都是调用方的前置条件违例：出错后该仿真实例应当丢弃，不提供重试语义。

use thiserror::Error;

/// 仿真引擎错误
#[derive(Debug, Error)]
pub enum SchonError {
    #[error("edge list is empty")]
    EmptyEdgeList,

    #[error("node {node} is listed twice in group {group}")]
    DuplicateMembership { node: usize, group: usize },

    #[error("id {id} in the edge list is too large to index")]
    IdOutOfRange { id: usize },

    #[error("rate table has no usable entry for group size {group_size} (row holds {row_len} values, need {needed})")]
    TableTooSmall {
        group_size: usize,
        row_len: usize,
        needed: usize,
    },

    #[error("group transmission rates cover {given} groups but the network has {groups}")]
    MissingTransmissionRate { given: usize, groups: usize },

    #[error("fraction {0} is outside [0, 1]")]
    InvalidFraction(f64),

    #[error("probability {value} at {what} is outside [0, 1]")]
    InvalidProbability { what: String, value: f64 },

    #[error("rate {value} at {what} must be finite and non-negative")]
    InvalidRate { what: String, value: f64 },

    #[error("duration {0} must be finite and non-negative")]
    NegativeDuration(f64),

    #[error("checkpoint interval {0} must be finite and positive")]
    InvalidInterval(f64),

    #[error("node {node} is out of range (population size {size})")]
    UnknownNode { node: usize, size: usize },

    #[error("absorbing state reached in quasistationary mode at t={time} with an empty history")]
    EmptyHistory { time: f64 },

    #[error("unsupported scenario schema_version {0}")]
    UnsupportedSchema(u32),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SchonError>;

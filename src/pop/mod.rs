//! 人群结构
//!
//! 节点-群组二部网络，以及随仿真变化的节点状态和群组感染计数。

mod id;
mod network;
mod population;

pub use id::{GroupId, NodeId, NodeState};
pub use network::{BipartiteNetwork, EdgeList};
pub use population::Population;

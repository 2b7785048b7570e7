//! 标识符类型
//!
//! 定义节点和群组（超边）的唯一标识符，均为稠密数组下标。

/// 节点标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

/// 群组标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(pub usize);

/// 节点状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeState {
    #[default]
    Susceptible,
    Infected,
}

impl NodeState {
    pub fn is_infected(self) -> bool {
        matches!(self, NodeState::Infected)
    }
}

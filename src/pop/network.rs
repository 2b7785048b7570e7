//! 二部网络
//!
//! 节点与群组存放在两个扁平数组中，成员关系用下标列表表示（双向）。

use std::collections::HashSet;

use super::id::{GroupId, NodeId};
use crate::error::{Result, SchonError};

/// 边列表：(节点编号, 群组编号)，一个节点可以出现在多个群组中。
pub type EdgeList = [(usize, usize)];

/// 节点-群组二部网络（构造后不可变）
#[derive(Debug, Clone)]
pub struct BipartiteNetwork {
    node_groups: Vec<Vec<GroupId>>,
    group_members: Vec<Vec<NodeId>>,
    min_membership: usize,
    max_membership: usize,
    min_group_size: usize,
    max_group_size: usize,
}

/// 为编号 `0..=max_id` 分配邻接表；编号溢出或内存不足时报错而不是 panic
fn arena<T: Clone>(max_id: usize) -> Result<Vec<Vec<T>>> {
    let len = max_id
        .checked_add(1)
        .ok_or(SchonError::IdOutOfRange { id: max_id })?;
    let mut lists = Vec::new();
    lists
        .try_reserve_exact(len)
        .map_err(|_| SchonError::IdOutOfRange { id: max_id })?;
    lists.resize(len, Vec::new());
    Ok(lists)
}

impl BipartiteNetwork {
    /// 由边列表构建网络。节点数与群组数取最大编号加一。
    pub fn from_edges(edges: &EdgeList) -> Result<Self> {
        if edges.is_empty() {
            return Err(SchonError::EmptyEdgeList);
        }

        let max_node = edges.iter().map(|&(n, _)| n).max().unwrap_or(0);
        let max_group = edges.iter().map(|&(_, g)| g).max().unwrap_or(0);

        let mut node_groups = arena(max_node)?;
        let mut group_members = arena(max_group)?;
        let mut seen = HashSet::with_capacity(edges.len());
        for &(node, group) in edges {
            if !seen.insert((node, group)) {
                return Err(SchonError::DuplicateMembership { node, group });
            }
            node_groups[node].push(GroupId(group));
            group_members[group].push(NodeId(node));
        }

        let min_membership = node_groups.iter().map(Vec::len).min().unwrap_or(0);
        let max_membership = node_groups.iter().map(Vec::len).max().unwrap_or(0);
        let min_group_size = group_members.iter().map(Vec::len).min().unwrap_or(0);
        let max_group_size = group_members.iter().map(Vec::len).max().unwrap_or(0);

        Ok(Self {
            node_groups,
            group_members,
            min_membership,
            max_membership,
            min_group_size,
            max_group_size,
        })
    }

    /// 节点数
    pub fn size(&self) -> usize {
        self.node_groups.len()
    }

    pub fn number_of_groups(&self) -> usize {
        self.group_members.len()
    }

    /// 节点所属的群组
    pub fn adjacent_groups(&self, node: NodeId) -> &[GroupId] {
        &self.node_groups[node.0]
    }

    /// 群组成员
    pub fn group_members(&self, group: GroupId) -> &[NodeId] {
        &self.group_members[group.0]
    }

    pub fn group_size(&self, group: GroupId) -> usize {
        self.group_members[group.0].len()
    }

    pub fn membership(&self, node: NodeId) -> usize {
        self.node_groups[node.0].len()
    }

    pub fn min_membership(&self) -> usize {
        self.min_membership
    }

    pub fn max_membership(&self) -> usize {
        self.max_membership
    }

    pub fn min_group_size(&self) -> usize {
        self.min_group_size
    }

    pub fn max_group_size(&self) -> usize {
        self.max_group_size
    }

    /// 网络中实际出现过的（非空）群组大小，升序去重。
    pub fn group_sizes(&self) -> Vec<usize> {
        let mut sizes: Vec<usize> = self
            .group_members
            .iter()
            .map(Vec::len)
            .filter(|&n| n > 0)
            .collect();
        sizes.sort_unstable();
        sizes.dedup();
        sizes
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.size()).map(NodeId)
    }

    pub fn groups(&self) -> impl Iterator<Item = GroupId> + '_ {
        (0..self.number_of_groups()).map(GroupId)
    }
}

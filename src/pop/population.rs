//! 人群状态
//!
//! 维护每个节点的 S/I 状态、每个群组的感染计数，以及可 O(1) 均匀抽样的感染节点集合。
//! 群组感染计数只在节点状态翻转时做 ±1 增量更新，从不整体重算。

use super::id::{GroupId, NodeId, NodeState};
use super::network::BipartiteNetwork;

const ABSENT: usize = usize::MAX;

#[derive(Debug, Clone)]
pub struct Population {
    network: BipartiteNetwork,
    states: Vec<NodeState>,
    group_infected: Vec<usize>,
    /// 感染节点的稠密列表（顺序无意义）
    infected: Vec<NodeId>,
    /// 节点在 `infected` 中的位置；易感节点为 ABSENT
    position: Vec<usize>,
}

impl Population {
    /// 全体易感的初始人群
    pub fn new(network: BipartiteNetwork) -> Self {
        let n = network.size();
        let g = network.number_of_groups();
        Self {
            network,
            states: vec![NodeState::Susceptible; n],
            group_infected: vec![0; g],
            infected: Vec::new(),
            position: vec![ABSENT; n],
        }
    }

    pub fn network(&self) -> &BipartiteNetwork {
        &self.network
    }

    pub fn size(&self) -> usize {
        self.states.len()
    }

    pub fn state(&self, node: NodeId) -> NodeState {
        self.states[node.0]
    }

    pub fn states(&self) -> &[NodeState] {
        &self.states
    }

    /// 群组 `group` 当前的感染成员数
    pub fn group_infected(&self, group: GroupId) -> usize {
        self.group_infected[group.0]
    }

    pub fn group_size(&self, group: GroupId) -> usize {
        self.network.group_size(group)
    }

    pub fn infected_count(&self) -> usize {
        self.infected.len()
    }

    pub fn infected(&self) -> &[NodeId] {
        &self.infected
    }

    /// 无病吸收态
    pub fn is_absorbed(&self) -> bool {
        self.infected.is_empty()
    }

    /// 感染比例
    pub fn prevalence(&self) -> f64 {
        if self.states.is_empty() {
            return 0.0;
        }
        self.infected.len() as f64 / self.states.len() as f64
    }

    /// 按下标取第 `index` 个感染节点（配合均匀抽样）
    pub(crate) fn infected_at(&self, index: usize) -> NodeId {
        self.infected[index]
    }

    /// 紧凑快照：升序排列的感染节点编号
    pub fn snapshot(&self) -> Vec<usize> {
        let mut ids: Vec<usize> = self.infected.iter().map(|n| n.0).collect();
        ids.sort_unstable();
        ids
    }

    /// S -> I。节点原本已感染时返回 false 且不做任何修改。
    pub(crate) fn infect(&mut self, node: NodeId) -> bool {
        if self.states[node.0].is_infected() {
            return false;
        }
        self.states[node.0] = NodeState::Infected;
        self.position[node.0] = self.infected.len();
        self.infected.push(node);
        for &group in self.network.adjacent_groups(node) {
            let count = &mut self.group_infected[group.0];
            *count += 1;
            debug_assert!(*count <= self.network.group_size(group));
        }
        true
    }

    /// I -> S。节点原本易感时返回 false 且不做任何修改。
    pub(crate) fn recover(&mut self, node: NodeId) -> bool {
        if !self.states[node.0].is_infected() {
            return false;
        }
        self.states[node.0] = NodeState::Susceptible;

        // swap-remove，并修正被换到该位置的节点下标
        let pos = self.position[node.0];
        let last = self.infected.len() - 1;
        self.infected.swap(pos, last);
        self.infected.pop();
        if pos < self.infected.len() {
            let moved = self.infected[pos];
            self.position[moved.0] = pos;
        }
        self.position[node.0] = ABSENT;

        for &group in self.network.adjacent_groups(node) {
            let count = &mut self.group_infected[group.0];
            debug_assert!(*count > 0);
            *count -= 1;
        }
        true
    }

    /// 全量扫描校验群组计数（测试与调试用）
    pub fn group_counts_consistent(&self) -> bool {
        self.network.groups().all(|g| {
            let actual = self
                .network
                .group_members(g)
                .iter()
                .filter(|n| self.states[n.0].is_infected())
                .count();
            actual == self.group_infected[g.0]
        })
    }
}

//! 准稳态历史
//!
//! 固定容量的环形缓冲区，保存若干存活（至少一个感染者）构型的紧凑快照。
//! 过程被吸收到无病态时，从中均匀抽取一个快照恢复状态。

use std::collections::VecDeque;

use rand::Rng;

use crate::pop::Population;

#[derive(Debug, Clone, Default)]
pub struct HistoryBuffer {
    capacity: usize,
    /// 每个快照为升序排列的感染节点编号
    snapshots: VecDeque<Vec<usize>>,
}

impl HistoryBuffer {
    /// 清空并按新容量重新分配
    pub fn initialize(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.snapshots = VecDeque::with_capacity(capacity);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn snapshots(&self) -> impl Iterator<Item = &[usize]> {
        self.snapshots.iter().map(Vec::as_slice)
    }

    /// 记录当前构型。已吸收或容量为 0 时不记录；满时淘汰最旧的快照。
    pub fn record(&mut self, population: &Population) -> bool {
        if self.capacity == 0 || population.is_absorbed() {
            return false;
        }
        if self.snapshots.len() == self.capacity {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(population.snapshot());
        true
    }

    /// 均匀抽取一个快照
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&[usize]> {
        if self.snapshots.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.snapshots.len());
        Some(&self.snapshots[index])
    }

    /// 丢弃快照，保留容量
    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}

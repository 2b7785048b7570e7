//! 求和树
//!
//! 完全二叉树存放在数组中：`tree[1]` 为根，叶子位于 `[cap, 2*cap)`。
//! 每次修改叶子后沿路径用左右孩子之和重算父节点，内部节点不做增量累加，
//! 因此长时间运行也不会积累浮点漂移，且全零子树的和严格为 0。

use rand::Rng;

#[derive(Debug, Clone)]
pub struct EventSampler {
    cap: usize,
    tree: Vec<f64>,
    present: Vec<bool>,
    len: usize,
}

impl EventSampler {
    /// 为编号 `0..n` 的元素创建空抽样器
    pub fn new(n: usize) -> Self {
        let cap = n.max(1).next_power_of_two();
        Self {
            cap,
            tree: vec![0.0; 2 * cap],
            present: vec![false; n],
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, id: usize) -> bool {
        self.present.get(id).copied().unwrap_or(false)
    }

    /// 元素当前权重；不在集合中时为 0
    pub fn weight(&self, id: usize) -> f64 {
        if self.contains(id) {
            self.tree[self.cap + id]
        } else {
            0.0
        }
    }

    /// 所有权重之和（根节点）
    pub fn total_weight(&self) -> f64 {
        self.tree[1]
    }

    pub fn insert(&mut self, id: usize, weight: f64) {
        debug_assert!(!self.present[id], "element {id} already present");
        self.present[id] = true;
        self.len += 1;
        self.set(id, weight);
    }

    pub fn update(&mut self, id: usize, weight: f64) {
        debug_assert!(self.present[id], "element {id} not present");
        self.set(id, weight);
    }

    pub fn remove(&mut self, id: usize) {
        if !self.present[id] {
            return;
        }
        self.present[id] = false;
        self.len -= 1;
        self.set(id, 0.0);
    }

    pub fn clear(&mut self) {
        self.tree.fill(0.0);
        self.present.fill(false);
        self.len = 0;
    }

    /// 按权重成正比地抽取一个元素；总权重为 0 时返回 None。
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        let total = self.total_weight();
        if total <= 0.0 {
            return None;
        }
        let mut u = rng.gen_range(0.0..total);
        let mut idx = 1;
        while idx < self.cap {
            let left = self.tree[2 * idx];
            let right = self.tree[2 * idx + 1];
            // 舍入误差下 u 可能越过右子树；右子树为 0 时总是走左边
            if u < left || right <= 0.0 {
                idx *= 2;
            } else {
                u -= left;
                idx = 2 * idx + 1;
            }
        }
        Some(idx - self.cap)
    }

    fn set(&mut self, id: usize, weight: f64) {
        debug_assert!(weight.is_finite() && weight >= 0.0, "bad weight {weight}");
        let mut idx = self.cap + id;
        self.tree[idx] = weight;
        idx /= 2;
        while idx >= 1 {
            self.tree[idx] = self.tree[2 * idx] + self.tree[2 * idx + 1];
            idx /= 2;
        }
    }
}

//! 加权抽样结构
//!
//! 为每个易感节点缓存总感染强度，支持按权重成正比地抽取下一个被感染的节点。
//! 插入/更新/删除/抽样均为 O(log N)，总权重查询为 O(1)。

mod sum_tree;

pub use sum_tree::EventSampler;

mod measures;
mod process;
mod sampler;

/// `nodes` 个节点，每个节点属于全部 `groups` 个群组
pub(crate) fn complete_groups(nodes: usize, groups: usize) -> Vec<(usize, usize)> {
    (0..nodes)
        .flat_map(|n| (0..groups).map(move |g| (n, g)))
        .collect()
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::sampler::EventSampler;

#[test]
fn sampler_tracks_membership_and_total_weight() {
    let mut s = EventSampler::new(5);
    assert!(s.is_empty());
    assert_eq!(s.total_weight(), 0.0);

    s.insert(0, 1.0);
    s.insert(3, 2.5);
    s.insert(4, 0.0);
    assert_eq!(s.len(), 3);
    assert!(s.contains(4));
    assert!(!s.contains(1));
    assert_eq!(s.total_weight(), 3.5);

    s.update(3, 0.5);
    assert_eq!(s.weight(3), 0.5);
    assert_eq!(s.total_weight(), 1.5);

    s.remove(0);
    assert!(!s.contains(0));
    assert_eq!(s.weight(0), 0.0);
    assert_eq!(s.len(), 2);
    assert_eq!(s.total_weight(), 0.5);

    // 重复删除是无操作
    s.remove(0);
    assert_eq!(s.len(), 2);

    s.clear();
    assert!(s.is_empty());
    assert_eq!(s.total_weight(), 0.0);
}

#[test]
fn sampler_returns_none_when_all_weights_are_zero() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut s = EventSampler::new(3);
    assert!(s.sample(&mut rng).is_none());
    s.insert(1, 0.0);
    assert!(s.sample(&mut rng).is_none());
}

#[test]
fn sampler_single_slot_works() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut s = EventSampler::new(1);
    s.insert(0, 4.0);
    assert_eq!(s.total_weight(), 4.0);
    assert_eq!(s.sample(&mut rng), Some(0));
}

#[test]
fn sampler_draws_proportionally_to_weight() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let weights = [1.0, 2.0, 0.0, 7.0, 0.0, 0.0];
    let mut s = EventSampler::new(weights.len());
    for (id, &w) in weights.iter().enumerate() {
        s.insert(id, w);
    }

    let draws = 200_000;
    let mut counts = [0usize; 6];
    for _ in 0..draws {
        let id = s.sample(&mut rng).expect("positive total");
        counts[id] += 1;
    }
    assert_eq!(counts[2], 0);
    assert_eq!(counts[4], 0);
    assert_eq!(counts[5], 0);
    for (id, &w) in weights.iter().enumerate() {
        let freq = counts[id] as f64 / draws as f64;
        assert!(
            (freq - w / 10.0).abs() < 0.01,
            "id={id} freq={freq} expected={}",
            w / 10.0
        );
    }
}

#[test]
fn sampler_never_draws_removed_elements() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut s = EventSampler::new(100);
    for id in 0..100 {
        s.insert(id, 1.0 + id as f64);
    }
    for id in (0..100).filter(|id| id % 3 != 0) {
        s.remove(id);
    }
    for _ in 0..10_000 {
        let id = s.sample(&mut rng).expect("nonempty");
        assert_eq!(id % 3, 0);
    }
}

#[test]
fn sampler_total_is_exact_after_many_updates() {
    let mut s = EventSampler::new(64);
    for id in 0..64 {
        s.insert(id, 0.1);
    }
    for round in 0..1000 {
        for id in 0..64 {
            s.update(id, 0.1 * ((round + id) % 7) as f64);
        }
    }
    for id in 0..64 {
        s.update(id, 0.0);
    }
    // 内部节点按孩子之和重算，不会残留舍入误差
    assert_eq!(s.total_weight(), 0.0);
}

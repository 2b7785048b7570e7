use crate::SchonError;
use crate::pop::{BipartiteNetwork, NodeId};
use crate::rate::{PowerlawRate, RateModel, RateTable};
use crate::sim::{Clock, ContagionProcess};

use super::complete_groups;

fn powerlaw_process(edges: &[(usize, usize)], recovery: f64, scale: f64) -> ContagionProcess {
    let net = BipartiteNetwork::from_edges(edges).expect("network");
    let rate = PowerlawRate::new(scale, 1.0, (1e-3, 100.0)).expect("rate");
    let mut p = ContagionProcess::new(net, RateModel::Powerlaw(rate), recovery).expect("process");
    p.seed(42);
    p
}

/// 从当前状态完全重算每个易感节点的强度，与缓存值比较
fn assert_hazards_match_scan(p: &ContagionProcess) {
    let pop = p.population();
    let net = pop.network();
    let mut total = 0.0;
    for node in net.nodes() {
        let expected = if pop.state(node).is_infected() {
            0.0
        } else {
            net.adjacent_groups(node)
                .iter()
                .map(|&g| {
                    let n = net.group_size(g);
                    p.rates().group_intensity(g, n, pop.group_infected(g))
                })
                .sum()
        };
        assert!(
            (p.hazard(node) - expected).abs() < 1e-12,
            "node {node:?}: cached={} expected={expected}",
            p.hazard(node)
        );
        total += expected;
    }
    assert!((p.infection_rate() - total).abs() < 1e-9);
}

#[test]
fn infection_updates_hazards_of_susceptible_co_members() {
    // 群组 0 = {0,1,2}，群组 1 = {2,3}
    let edges = [(0, 0), (1, 0), (2, 0), (2, 1), (3, 1)];
    let mut p = powerlaw_process(&edges, 1.0, 0.5);
    assert_eq!(p.infection_rate(), 0.0);

    assert!(p.infect(NodeId(0)));
    assert_eq!(p.hazard(NodeId(0)), 0.0);
    assert_eq!(p.hazard(NodeId(1)), 0.5);
    assert_eq!(p.hazard(NodeId(2)), 0.5);
    assert_eq!(p.hazard(NodeId(3)), 0.0);
    assert_hazards_match_scan(&p);

    assert!(p.infect(NodeId(2)));
    // 群组 0 现在有 2 个感染者，群组 1 有 1 个
    assert_eq!(p.hazard(NodeId(1)), 1.0);
    assert_eq!(p.hazard(NodeId(3)), 0.5);
    assert_hazards_match_scan(&p);
    assert_eq!(p.recovery_rate_total(), 2.0);
    assert_eq!(p.total_rate(), 3.5);
}

#[test]
fn recovery_reinserts_node_with_its_current_hazard() {
    let edges = [(0, 0), (1, 0), (2, 0)];
    let mut p = powerlaw_process(&edges, 1.0, 0.25);
    p.infect(NodeId(0));
    p.infect(NodeId(1));

    assert!(p.recover(NodeId(0)));
    // 节点 0 恢复后仍被节点 1 感染压力覆盖
    assert_eq!(p.hazard(NodeId(0)), 0.25);
    assert_eq!(p.hazard(NodeId(2)), 0.25);
    assert_hazards_match_scan(&p);

    assert!(p.recover(NodeId(1)));
    assert_eq!(p.infection_rate(), 0.0);
    assert_eq!(p.total_rate(), 0.0);
    assert!(p.lifetime().is_infinite());
}

#[test]
fn hazards_stay_consistent_over_many_events() {
    let edges = complete_groups(60, 3);
    let mut p = powerlaw_process(&edges, 1.0, 0.02);
    p.infect_fraction(0.5).expect("fraction");
    for _ in 0..2_000 {
        let total = p.total_rate();
        if total <= 0.0 {
            break;
        }
        p.fire_event(total);
    }
    assert!(p.population().group_counts_consistent());
    assert_hazards_match_scan(&p);
}

#[test]
fn continuous_table_hazard_uses_transmission_rates() {
    let edges = [(0, 0), (1, 0), (1, 1), (2, 1)];
    let net = BipartiteNetwork::from_edges(&edges).expect("network");
    let rates = RateModel::ContinuousTable {
        table: RateTable::from_fn(2, |_, i| i as f64),
        transmission: vec![0.5, 3.0],
    };
    let mut p = ContagionProcess::new(net, rates, 1.0).expect("process");
    p.infect(NodeId(1));
    assert_eq!(p.hazard(NodeId(0)), 0.5);
    assert_eq!(p.hazard(NodeId(2)), 3.0);
    assert_hazards_match_scan(&p);
}

#[test]
fn table_with_pressure_at_zero_infected_seeds_initial_hazards() {
    let edges = [(0, 0), (1, 0)];
    let net = BipartiteNetwork::from_edges(&edges).expect("network");
    let rates = RateModel::ContinuousTable {
        table: RateTable::new(vec![vec![], vec![], vec![0.1, 1.0, 2.0]]),
        transmission: vec![1.0],
    };
    let p = ContagionProcess::new(net, rates, 1.0).expect("process");
    assert_eq!(p.hazard(NodeId(0)), 0.1);
    assert!((p.infection_rate() - 0.2).abs() < 1e-15);
}

#[test]
fn infect_fraction_picks_exactly_floor_fraction_n_nodes() {
    let edges = complete_groups(500, 2);
    let mut p = powerlaw_process(&edges, 1.0, 1.2e-3);
    p.infect_fraction(0.05).expect("fraction");
    assert_eq!(p.population().infected_count(), 25);
    assert!(p.population().group_counts_consistent());

    p.infect_fraction(1.0).expect("fraction");
    assert_eq!(p.population().infected_count(), 500);
}

#[test]
fn infect_fraction_rejects_values_outside_unit_interval() {
    let edges = complete_groups(10, 1);
    let mut p = powerlaw_process(&edges, 1.0, 0.1);
    assert!(matches!(
        p.infect_fraction(1.5),
        Err(SchonError::InvalidFraction(_))
    ));
    assert!(matches!(
        p.infect_fraction(-0.1),
        Err(SchonError::InvalidFraction(_))
    ));
    assert!(matches!(
        p.infect_fraction(f64::NAN),
        Err(SchonError::InvalidFraction(_))
    ));
    assert!(p.population().is_absorbed());
}

#[test]
fn infect_node_set_skips_infected_and_rejects_unknown_nodes() {
    let edges = complete_groups(4, 1);
    let mut p = powerlaw_process(&edges, 1.0, 0.1);
    p.infect_node_set(&[1, 3, 1]).expect("infect");
    assert_eq!(p.population().snapshot(), vec![1, 3]);

    let err = p.infect_node_set(&[2, 9]).expect_err("unknown node");
    assert!(matches!(err, SchonError::UnknownNode { node: 9, size: 4 }));
    assert_eq!(p.population().snapshot(), vec![1, 3], "no partial update");
}

#[test]
fn clear_recovers_everyone_and_restores_zero_infection_rate() {
    let edges = complete_groups(30, 2);
    let mut p = powerlaw_process(&edges, 1.0, 0.1);
    p.infect_fraction(0.5).expect("fraction");
    p.clear();
    assert!(p.population().is_absorbed());
    assert_eq!(p.infection_rate(), 0.0);
    assert_hazards_match_scan(&p);
}

#[test]
fn constructor_rejects_bad_recovery_parameter() {
    let edges = complete_groups(3, 1);
    let net = BipartiteNetwork::from_edges(&edges).expect("network");
    let rates = RateModel::DiscreteTable(RateTable::from_fn(3, |_, _| 0.1));
    assert!(matches!(
        ContagionProcess::new(net.clone(), rates, 1.2),
        Err(SchonError::InvalidProbability { .. })
    ));

    let rate = PowerlawRate::new(1.0, 1.0, (0.0, 1.0)).expect("rate");
    assert!(matches!(
        ContagionProcess::new(net, RateModel::Powerlaw(rate), -1.0),
        Err(SchonError::InvalidRate { .. })
    ));
}

#[test]
fn discrete_tick_applies_flips_synchronously() {
    // 两个节点同属一个群组；恢复概率 1，单个感染者的感染概率 1
    let edges = [(0, 0), (1, 0)];
    let net = BipartiteNetwork::from_edges(&edges).expect("network");
    let rates = RateModel::DiscreteTable(RateTable::new(vec![
        vec![],
        vec![],
        vec![0.0, 1.0, 1.0],
    ]));
    let mut p = ContagionProcess::new(net, rates, 1.0).expect("process");
    p.seed(5);
    p.infect(NodeId(0));

    p.tick();
    // 基于步前快照：0 恢复的同时 1 被 0 感染
    assert_eq!(p.population().snapshot(), vec![1]);
    assert_eq!(p.clock(), Clock::Discrete(1));

    p.tick();
    assert_eq!(p.population().snapshot(), vec![0]);
    assert_eq!(p.clock(), Clock::Discrete(2));
    assert!(p.population().group_counts_consistent());
}

#[test]
fn discrete_tick_combines_escape_probabilities_over_groups() {
    // 节点 0 同时属于两个各含一个感染者的群组，每个群组感染概率 0.5
    let edges = [(0, 0), (1, 0), (0, 1), (2, 1)];
    let net = BipartiteNetwork::from_edges(&edges).expect("network");
    let rates = RateModel::DiscreteTable(RateTable::new(vec![
        vec![],
        vec![],
        vec![0.0, 0.5, 0.5],
    ]));
    let mut p = ContagionProcess::new(net, rates, 0.0).expect("process");
    p.seed(17);

    let trials = 20_000;
    let mut infected = 0;
    for _ in 0..trials {
        p.clear();
        p.infect_node_set(&[1, 2]).expect("infect");
        p.tick();
        if p.population().state(NodeId(0)).is_infected() {
            infected += 1;
        }
    }
    // 1 - (1 - 0.5)^2 = 0.75
    let freq = infected as f64 / trials as f64;
    assert!((freq - 0.75).abs() < 0.02, "freq={freq}");
}

use crate::measure::{
    InfectiousSet, MarginalInfectionProbability, Measure, MeasureRegistry, MeasureResult,
    Prevalence, TimeSeries,
};
use crate::pop::{BipartiteNetwork, NodeId, Population};

fn population(n: usize) -> Population {
    let edges: Vec<(usize, usize)> = (0..n).map(|i| (i, 0)).collect();
    Population::new(BipartiteNetwork::from_edges(&edges).expect("network"))
}

#[test]
fn registry_registers_each_name_once_in_order() {
    let mut reg = MeasureRegistry::default();
    assert!(reg.is_empty());
    assert!(reg.register(Box::new(Prevalence::default())));
    assert!(reg.register(Box::new(TimeSeries::default())));
    assert!(!reg.register(Box::new(Prevalence::default())));
    assert_eq!(reg.len(), 2);
    assert_eq!(reg.names(), vec!["prevalence", "time"]);
    assert!(reg.get("infectious_set").is_none());
    assert!(reg.result("missing").is_none());
}

#[test]
fn duplicate_registration_keeps_accumulated_values() {
    let mut reg = MeasureRegistry::default();
    let mut pop = population(4);
    reg.register(Box::new(Prevalence::default()));
    pop.infect(NodeId(0));
    reg.update_all(&pop, 1.0);

    assert!(!reg.register(Box::new(Prevalence::default())));
    let values = reg.result(Prevalence::NAME).expect("registered");
    assert_eq!(values, MeasureResult::Series(vec![0.25]));
}

#[test]
fn prevalence_and_time_append_one_value_per_update() {
    let mut prev = Prevalence::default();
    let mut time = TimeSeries::default();
    let mut pop = population(5);

    for (t, node) in [(0.5, 0), (1.0, 1), (1.5, 2)] {
        pop.infect(NodeId(node));
        prev.update(&pop, t);
        time.update(&pop, t);
    }
    let prev = prev.result();
    let values = prev.as_series().expect("series");
    assert_eq!(values.len(), 3);
    assert!((values[0] - 0.2).abs() < 1e-12);
    assert!((values[2] - 0.6).abs() < 1e-12);
    assert_eq!(time.result(), MeasureResult::Series(vec![0.5, 1.0, 1.5]));
    assert!(prev.as_sets().is_none());
}

#[test]
fn marginal_probability_is_per_node_frequency() {
    let mut pop = population(3);
    let mut marginal = MarginalInfectionProbability::new(3);
    assert_eq!(
        marginal.result(),
        MeasureResult::Series(vec![0.0, 0.0, 0.0]),
        "no samples yet"
    );

    pop.infect(NodeId(0));
    marginal.update(&pop, 1.0);
    pop.infect(NodeId(2));
    marginal.update(&pop, 2.0);
    pop.recover(NodeId(0));
    marginal.update(&pop, 3.0);
    pop.recover(NodeId(2));
    marginal.update(&pop, 4.0);

    assert_eq!(marginal.samples(), 4);
    assert_eq!(
        marginal.result(),
        MeasureResult::Series(vec![0.5, 0.0, 0.5])
    );
}

#[test]
fn infectious_set_records_sorted_ids() {
    let mut pop = population(6);
    let mut sets = InfectiousSet::default();
    for node in [4, 1, 3] {
        pop.infect(NodeId(node));
    }
    sets.update(&pop, 0.0);
    pop.recover(NodeId(1));
    sets.update(&pop, 1.0);

    let result = sets.result();
    assert_eq!(
        result.as_sets().expect("sets"),
        &[vec![1, 3, 4], vec![3, 4]]
    );
    assert!(result.as_series().is_none());
    assert_eq!(result.len(), 2);
}

#[test]
fn clear_all_drops_values_but_keeps_registrations() {
    let mut reg = MeasureRegistry::default();
    reg.register(Box::new(Prevalence::default()));
    reg.register(Box::new(MarginalInfectionProbability::new(2)));
    let mut pop = population(2);
    pop.infect(NodeId(1));
    reg.update_all(&pop, 1.0);

    reg.clear_all();
    assert_eq!(reg.len(), 2);
    assert!(reg.result(Prevalence::NAME).expect("prevalence").is_empty());
    assert_eq!(
        reg.result(MarginalInfectionProbability::NAME),
        Some(MeasureResult::Series(vec![0.0, 0.0]))
    );
}

#[test]
fn series_serialize_as_plain_json_arrays() {
    let series = MeasureResult::Series(vec![0.5, 1.0]);
    let sets = MeasureResult::Sets(vec![vec![2, 7]]);
    assert_eq!(
        serde_json::to_string(&series).expect("json"),
        "[0.5,1.0]"
    );
    assert_eq!(serde_json::to_string(&sets).expect("json"), "[[2,7]]");
}

use crate::cache::AccessOutcome;
use crate::config::{CacheConfig, ConfigError};
use crate::simulator::{SimulationResult, Simulator};
use crate::trace::{parse_trace, AccessEvent, AccessKind};
use crate::util::{access, loads};

fn run(config: &CacheConfig, events: &[AccessEvent]) -> SimulationResult {
    let mut simulator = Simulator::new(config).unwrap();
    simulator.simulate(events).clone()
}

fn counters(hits: u64, misses: u64, evictions: u64) -> SimulationResult {
    SimulationResult {
        hits,
        misses,
        evictions,
    }
}

#[test]
fn direct_mapped_conflicting_addresses_thrash() {
    // Two sets of one line, no offset bits: addresses 0 and 2 share set 0,
    // so the second load evicts the first and the third misses again
    let config = CacheConfig::new(1, 1, 0);
    let result = run(&config, &loads(&[0x0, 0x2, 0x0]));
    assert_eq!(result, counters(0, 3, 1));
}

#[test]
fn lru_evicts_the_least_recently_touched_line() {
    // One set, two lines. Touching tag 1 again before the conflict makes
    // tag 2 the victim
    let config = CacheConfig::new(0, 2, 0);
    let result = run(&config, &loads(&[1, 2, 1, 3]));
    assert_eq!(result, counters(1, 3, 1));

    // Reload both survivors to confirm which tag was evicted
    let mut simulator = Simulator::new(&config).unwrap();
    let result = simulator.simulate(&loads(&[1, 2, 1, 3, 1, 3])).clone();
    assert_eq!(result, counters(3, 3, 1));
}

#[test]
fn a_modify_misses_then_hits_at_a_fresh_address() {
    let config = CacheConfig::new(4, 1, 4);
    let result = run(&config, &[access(AccessKind::Modify, 0x1000)]);
    assert_eq!(result, counters(1, 1, 0));
}

#[test]
fn accesses_within_one_block_share_a_line() {
    // Four offset bits: addresses 0x100..=0x10F land on the same line
    let config = CacheConfig::new(0, 1, 4);
    let result = run(&config, &loads(&[0x100, 0x10F, 0x108]));
    assert_eq!(result, counters(2, 1, 0));

    // The next block over misses
    let result = run(&config, &loads(&[0x100, 0x110]));
    assert_eq!(result, counters(0, 2, 1));
}

#[test]
fn no_eviction_until_the_set_is_full() {
    let config = CacheConfig::new(0, 3, 0);
    let result = run(&config, &loads(&[1, 2, 3]));
    assert_eq!(result, counters(0, 3, 0));

    let result = run(&config, &loads(&[1, 2, 3, 4]));
    assert_eq!(result, counters(0, 4, 1));
}

#[test]
fn counters_keep_accumulating_across_simulate_calls() {
    let config = CacheConfig::new(0, 2, 0);
    let mut simulator = Simulator::new(&config).unwrap();
    let _ = simulator.simulate(&loads(&[1, 2]));
    let result = simulator.simulate(&loads(&[1, 2])).clone();
    assert_eq!(result, counters(2, 2, 0));
}

#[test]
fn a_modify_reports_its_two_accesses_to_the_observer() {
    let config = CacheConfig::new(0, 1, 0);
    let mut simulator = Simulator::new(&config).unwrap();
    let mut seen = Vec::new();
    simulator.process_with(access(AccessKind::Modify, 0x20), &mut |kind, address, outcome| {
        seen.push((kind, address, outcome));
    });
    assert_eq!(
        seen,
        vec![
            (AccessKind::Modify, 0x20, AccessOutcome::MissFilled),
            (AccessKind::Modify, 0x20, AccessOutcome::Hit),
        ]
    );
}

#[test]
fn rejected_configurations_never_build_a_simulator() {
    assert_eq!(
        Simulator::new(&CacheConfig::new(2, 0, 2)).err(),
        Some(ConfigError::ZeroAssociativity)
    );
    assert_eq!(
        Simulator::new(&CacheConfig::new(70, 1, 0)).err(),
        Some(ConfigError::SetBitsTooLarge(70))
    );
}

#[test]
fn json_and_direct_configurations_agree() {
    let parsed: CacheConfig =
        serde_json::from_str(r#"{"set_index_bits":1,"lines_per_set":1,"block_offset_bits":0}"#)
            .unwrap();
    let events = loads(&[0x0, 0x2, 0x0]);
    assert_eq!(run(&parsed, &events), run(&CacheConfig::new(1, 1, 0), &events));
}

#[test]
fn a_parsed_trace_replays_end_to_end() {
    // One line, four offset bits: everything below 0x10 shares the block
    let trace = " L 0,4\nI  0400d7d4,8\n M 0,4\n S 8,4\n";
    let events = parse_trace(trace).unwrap();
    let result = run(&CacheConfig::new(0, 1, 4), &events);
    assert_eq!(result, counters(3, 1, 0));
}

#[test]
fn uninitialised_lines_are_counted() {
    let config = CacheConfig::new(1, 2, 0);
    let mut simulator = Simulator::new(&config).unwrap();
    assert_eq!(simulator.uninitialised_line_count(), 4);
    let _ = simulator.simulate(&loads(&[0, 1]));
    assert_eq!(simulator.uninitialised_line_count(), 2);
}

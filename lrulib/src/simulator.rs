use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::cache::{AccessOutcome, Cache};
use crate::config::{CacheConfig, ConfigError};
use crate::trace::{AccessEvent, AccessKind};

/// Drives the cache once (or, for modifies, twice) per trace event and
/// collects the counters
///
/// It supports calling simulate multiple times, and will update the time taken
/// to simulate and the results accordingly
#[derive(Debug)]
pub struct Simulator {
    cache: Cache,
    result: SimulationResult,
    simulation_time: Duration,
}

/// The result of a cache simulation. Can be serialised to the output format
///
/// Purely additive counters; derived metrics like hit rate are left to
/// whatever presents the result
#[derive(Debug, Default, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct SimulationResult {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl Simulator {
    /// Creates a new simulator for a given configuration
    ///
    /// # Arguments
    ///
    /// * `config`: A cache configuration, from CLI flags or parsed JSON
    ///
    /// returns: Result<Simulator, ConfigError>
    pub fn new(config: &CacheConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            cache: Cache::new(config)?,
            result: SimulationResult::default(),
            simulation_time: Duration::new(0, 0),
        })
    }

    /// Processes one trace event
    ///
    /// A modify stands for a load immediately followed by a store to the same
    /// address, so it runs the engine twice as two independent accesses. The
    /// second access always hits the line the first one touched or installed,
    /// since nothing can intervene in the same set
    pub fn process(&mut self, event: AccessEvent) {
        self.process_with(event, &mut |_, _, _| {});
    }

    /// Same as process, but reports every internal engine access to the
    /// observer as (kind, address, outcome)
    ///
    /// The observer is a diagnostics side channel; the counters are unaffected
    /// by it
    pub fn process_with<O>(&mut self, event: AccessEvent, observer: &mut O)
    where
        O: FnMut(AccessKind, u64, AccessOutcome),
    {
        let first = self.single_access(event.address);
        observer(event.kind, event.address, first);
        if event.kind == AccessKind::Modify {
            let second = self.single_access(event.address);
            observer(event.kind, event.address, second);
        }
    }

    // Every counter update flows from the outcome the engine returns, so the
    // counters can't drift from what the cache actually did
    fn single_access(&mut self, address: u64) -> AccessOutcome {
        let (tag, set_index) = self.cache.split_address(address);
        let outcome = self.cache.access(set_index, tag);
        match outcome {
            AccessOutcome::Hit => self.result.hits += 1,
            AccessOutcome::MissFilled => self.result.misses += 1,
            AccessOutcome::MissEvicted => {
                self.result.misses += 1;
                self.result.evictions += 1;
            }
        }
        outcome
    }

    /// Replays a full trace, in order
    ///
    /// # Arguments
    ///
    /// * `events`: The parsed trace
    ///
    /// returns: &SimulationResult
    pub fn simulate(&mut self, events: &[AccessEvent]) -> &SimulationResult {
        self.simulate_with(events, &mut |_, _, _| {})
    }

    /// Replays a full trace, reporting each internal access to the observer
    pub fn simulate_with<O>(&mut self, events: &[AccessEvent], observer: &mut O) -> &SimulationResult
    where
        O: FnMut(AccessKind, u64, AccessOutcome),
    {
        let start = Instant::now();
        for event in events {
            self.process_with(*event, observer);
        }
        let end = Instant::now();
        self.simulation_time += end - start;
        &self.result
    }

    /// Gets the counters accumulated so far
    pub fn result(&self) -> &SimulationResult {
        &self.result
    }

    /// Gets the wall-clock execution time for processing
    pub fn get_execution_time(&self) -> &Duration {
        &self.simulation_time
    }

    /// Gets the number of lines never installed, for debugging output
    pub fn uninitialised_line_count(&self) -> usize {
        self.cache.uninitialised_line_count()
    }
}

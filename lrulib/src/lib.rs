//! # LruLib
//!
//! Lrulib is a library for simulating set-associative caches with least
//! recently used replacement
//!
//! It provides the cache model and replacement engine, a parser for valgrind
//! memory traces, and a simulator which drives the cache from a parsed trace
//! and collects hit, miss, and eviction counts
//!
//! Only address metadata is simulated; no cached data is moved, so the engine
//! is cheap enough to replay traces of hundreds of millions of accesses

/// Contains the cache model, address decomposition, and the replacement engine
pub mod cache;

/// Contains the cache shape parameters, which can be built directly or parsed
/// from the JSON input format
pub mod config;

/// Contains the trace file reader
pub mod io;

/// Contains the simulator used to replay a parsed trace against a cache
pub mod simulator;

/// Contains the valgrind trace format parser
pub mod trace;

#[cfg(test)]
mod test;

/// Contains utilities for building traces in tests and benchmarks.
pub mod util;

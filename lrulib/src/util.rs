use crate::trace::{AccessEvent, AccessKind};

/// Builds a single event with a fixed size of one byte
pub fn access(kind: AccessKind, address: u64) -> AccessEvent {
    AccessEvent {
        kind,
        address,
        size: 1,
    }
}

/// Builds a trace of loads, one per address
pub fn loads(addresses: &[u64]) -> Vec<AccessEvent> {
    addresses
        .iter()
        .map(|address| access(AccessKind::Load, *address))
        .collect()
}

/// Builds a deterministic pseudo-random trace for benchmarks
///
/// A fixed-seed LCG keeps runs comparable. Addresses are confined to a 1MiB
/// window so small caches still see plenty of reuse, and every eighth event is
/// a modify to exercise the double-access path
pub fn synthetic_trace(length: usize) -> Vec<AccessEvent> {
    let mut state: u64 = 0x853c_49e6_748f_ea9b;
    (0..length)
        .map(|i| {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            let kind = match i % 8 {
                0 => AccessKind::Modify,
                1 | 4 => AccessKind::Store,
                _ => AccessKind::Load,
            };
            AccessEvent {
                kind,
                address: state & 0xF_FFFF,
                size: 4,
            }
        })
        .collect()
}

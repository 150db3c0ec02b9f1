use crate::config::{CacheConfig, ConfigError};

/// The three ways a single engine access can resolve
///
/// A miss is split by whether the set still had a free line; the caller can
/// recover plain hit/miss booleans from this without losing the eviction count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessOutcome {
    Hit,
    MissFilled,
    MissEvicted,
}

impl AccessOutcome {
    pub fn is_hit(self) -> bool {
        self == AccessOutcome::Hit
    }

    pub fn is_eviction(self) -> bool {
        self == AccessOutcome::MissEvicted
    }
}

/// One cache line. When `valid` is false the tag and recency are leftovers
/// from initialisation and must not be read
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Line {
    pub(crate) valid: bool,
    pub(crate) tag: u64,
    pub(crate) recency: u64,
}

/// Converts an address into a tag and a set index given the configured bit
/// widths. The set index is the `set_index_bits` bits immediately above the
/// `block_offset_bits` block offset bits; the tag is everything above both
///
/// Shifting a u64 by 64 or more isn't defined, so out-of-range widths are
/// pinned explicitly: offset bits covering the whole address mean set index 0,
/// index and offset bits together covering it mean tag 0
///
/// # Arguments
///
/// * `address`: The accessed address
/// * `set_index_bits`: s, the number of set index bits
/// * `block_offset_bits`: b, the number of block offset bits
///
/// returns: (u64, u64), the tag and the set index
pub fn decompose(address: u64, set_index_bits: u32, block_offset_bits: u32) -> (u64, u64) {
    let set_index = if block_offset_bits >= u64::BITS {
        0
    } else {
        (address >> block_offset_bits) & index_mask(set_index_bits)
    };
    let tag_shift = u64::from(set_index_bits) + u64::from(block_offset_bits);
    let tag = if tag_shift >= u64::from(u64::BITS) {
        0
    } else {
        address >> tag_shift
    };
    (tag, set_index)
}

fn index_mask(set_index_bits: u32) -> u64 {
    if set_index_bits >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << set_index_bits) - 1
    }
}

/// The simulated cache and its replacement engine
///
/// Line storage is a single flat allocation; set `i` occupies the index range
/// `[i * lines_per_set, (i + 1) * lines_per_set)`. Keeping the sets contiguous
/// means the per-access scans stay within one stretch of memory
///
/// Recency is a monotonic logical clock stamped on a line each time it is
/// touched, not a queue: eviction picks the minimum stamp with a linear scan.
/// This trades O(1) touches for O(E) victim selection, which is fine as E is
/// small in realistic configurations
#[derive(Debug)]
pub struct Cache {
    lines: Vec<Line>,
    set_index_bits: u32,
    block_offset_bits: u32,
    lines_per_set: usize,
    clock: u64,
}

impl Cache {
    /// Allocates a cache with every line invalid. Fails on an ill-defined
    /// shape, before any storage is allocated
    pub fn new(config: &CacheConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let line_count = config.set_count() as usize * config.lines_per_set as usize;
        Ok(Self {
            lines: vec![Line::default(); line_count],
            set_index_bits: config.set_index_bits,
            block_offset_bits: config.block_offset_bits,
            lines_per_set: config.lines_per_set as usize,
            clock: 0,
        })
    }

    /// Splits an address with this cache's configured widths
    ///
    /// returns: (u64, u64), the tag and the set index
    pub fn split_address(&self, address: u64) -> (u64, u64) {
        decompose(address, self.set_index_bits, self.block_offset_bits)
    }

    /// Runs one engine access against a set
    ///
    /// Scans the set's lines in index order for a valid line with a matching
    /// tag; on a miss re-scans for the first free line and installs there; with
    /// the set full, overwrites the line with the minimum recency stamp. Every
    /// touched line is stamped with the next clock value
    ///
    /// # Arguments
    ///
    /// * `set_index`: The target set, as produced by `split_address`
    /// * `tag`: The requested tag
    ///
    /// returns: AccessOutcome
    pub fn access(&mut self, set_index: u64, tag: u64) -> AccessOutcome {
        let lower = set_index as usize * self.lines_per_set;
        let upper = lower + self.lines_per_set;

        // No two valid lines in a set share a tag, so the first match is the
        // only match
        for i in lower..upper {
            if self.lines[i].valid && self.lines[i].tag == tag {
                let stamp = self.touch();
                self.lines[i].recency = stamp;
                return AccessOutcome::Hit;
            }
        }

        // Miss: install into the first free line, not any free line
        for i in lower..upper {
            if !self.lines[i].valid {
                let stamp = self.touch();
                self.lines[i] = Line {
                    valid: true,
                    tag,
                    recency: stamp,
                };
                return AccessOutcome::MissFilled;
            }
        }

        // Set full: evict the least recently touched line. Stamps are unique
        // across the cache, so the strict minimum is unambiguous
        let mut victim = lower;
        for i in lower + 1..upper {
            if self.lines[i].recency < self.lines[victim].recency {
                victim = i;
            }
        }
        let stamp = self.touch();
        self.lines[victim].tag = tag;
        self.lines[victim].recency = stamp;
        AccessOutcome::MissEvicted
    }

    fn touch(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Gets the number of lines never installed since initialisation. Useful
    /// for judging how much of the cache a trace actually exercises
    pub fn uninitialised_line_count(&self) -> usize {
        self.lines.iter().filter(|line| !line.valid).count()
    }

    #[cfg(test)]
    pub(crate) fn set_count(&self) -> u64 {
        (self.lines.len() / self.lines_per_set) as u64
    }

    #[cfg(test)]
    pub(crate) fn lines_in_set(&self, set_index: u64) -> &[Line] {
        let lower = set_index as usize * self.lines_per_set;
        &self.lines[lower..lower + self.lines_per_set]
    }
}

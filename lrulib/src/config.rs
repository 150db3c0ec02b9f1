use serde::Deserialize;
use thiserror::Error;

/// The shape of a simulated cache: `2^set_index_bits` sets of `lines_per_set`
/// lines each, with `block_offset_bits` low address bits per block
///
/// The shape is fixed for the lifetime of a cache; there is no resizing or
/// reconfiguration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    pub set_index_bits: u32,
    pub lines_per_set: u32,
    pub block_offset_bits: u32,
}

/// Configurations the cache model rejects. Both are checked before any line
/// storage is allocated
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("a cache needs at least one line per set")]
    ZeroAssociativity,
    #[error("{0} set index bits would give an unrepresentable number of sets")]
    SetBitsTooLarge(u32),
}

impl CacheConfig {
    pub fn new(set_index_bits: u32, lines_per_set: u32, block_offset_bits: u32) -> Self {
        Self {
            set_index_bits,
            lines_per_set,
            block_offset_bits,
        }
    }

    /// Checks the shape is well-defined
    ///
    /// Deserialisation doesn't validate, so this runs when a cache is created
    /// from the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lines_per_set < 1 {
            return Err(ConfigError::ZeroAssociativity);
        }
        // 2^64 sets don't fit a u64, and no real configuration gets close
        if self.set_index_bits > 63 {
            return Err(ConfigError::SetBitsTooLarge(self.set_index_bits));
        }
        Ok(())
    }

    /// The number of sets, `2^set_index_bits`. Only meaningful for validated
    /// configurations
    pub fn set_count(&self) -> u64 {
        1u64 << self.set_index_bits
    }
}

//! Common types and constants for the LZ match-finding engine
//!
//! This module defines the match value type, the error enum, and the
//! budget constants shared by the sliding window, the match finders,
//! and the lazy encoder.

use thiserror::Error;

/// A backward reference into the sliding window
///
/// `distance` counts bytes backward from the current position (1 = one
/// byte back, never an absolute index). `length` is the match length in
/// raw bytes. A zero `length` is the tagged-empty value used by the lazy
/// encoder while weighing candidates; finders only report matches with
/// `distance > 0` and `length >= min_length`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// Bytes backward from the current position
    pub distance: u32,
    /// Match length in bytes
    pub length: u32,
}

impl Match {
    /// The empty match (no candidate found yet)
    pub const EMPTY: Match = Match {
        distance: 0,
        length: 0,
    };

    /// Create a new match
    pub fn new(distance: u32, length: u32) -> Self {
        Self { distance, length }
    }

    /// Whether this carries an actual match
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

/// Error type for lzfind operations
#[derive(Debug, Error)]
pub enum LzFindError {
    /// Window capacity must be a power of two
    #[error("Window capacity {0} is not a power of two")]
    CapacityNotPowerOfTwo(usize),

    /// Window capacity too small for the requested configuration
    #[error("Window capacity {capacity} too small: needs at least {required}")]
    CapacityTooSmall {
        /// Configured capacity
        capacity: usize,
        /// Minimum capacity the configuration needs
        required: usize,
    },

    /// Maximum match distance must be non-zero and inside the window
    #[error("Invalid max distance {max_distance} for window capacity {capacity}")]
    InvalidMaxDistance {
        /// Requested maximum distance
        max_distance: u32,
        /// Window capacity it must fit inside
        capacity: usize,
    },

    /// Minimum match length must be non-zero and within the hash span
    #[error("Invalid min length {min_length} (must be in 1..={hash_span} for this finder)")]
    InvalidMinLength {
        /// Requested minimum reportable length
        min_length: u32,
        /// Number of bytes covered by the finder's hash
        hash_span: u32,
    },

    /// Dictionary size must be a power of two of at least `MIN_DICT_SIZE`
    #[error("Invalid dictionary size {0} (power of two >= {MIN_DICT_SIZE} required)")]
    InvalidDictionarySize(u32),

    /// A token stream referenced history that does not exist
    #[error("Token references {distance} bytes back with only {available} available")]
    InvalidTokenDistance {
        /// Distance the match token carried
        distance: u32,
        /// Bytes of output available at that point
        available: usize,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for lzfind operations
pub type Result<T> = std::result::Result<T, LzFindError>;

/// Hard per-call cap on hash-chain hops
///
/// A worst-case latency bound: degenerate inputs with many colliding
/// hashes (e.g. a single repeated byte) cannot cause unbounded scans.
pub const MAX_CHAIN_HOPS: usize = 4096;

/// Candidate budget the lazy encoder enforces on top of [`MAX_CHAIN_HOPS`]
pub const MAX_CANDIDATES: usize = 256;

/// Number of encodable length codes in the downstream entropy stage
pub const LENGTH_CODES: u32 = 271;

/// Minimum match length the lazy encoder will emit
pub const MIN_MATCH_LENGTH: u32 = 3;

/// Longest match the encoder asks a finder for
pub const MAX_MATCH_LENGTH: u32 = LENGTH_CODES + MIN_MATCH_LENGTH - 1;

/// A repeat-distance match longer than this is accepted greedily
pub const NICE_REP_LENGTH: u32 = 64;

/// Smallest dictionary size accepted by [`crate::FastEncoder`]
pub const MIN_DICT_SIZE: u32 = 1024;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_empty() {
        assert!(Match::EMPTY.is_empty());
        assert!(!Match::new(3, 6).is_empty());
        assert_eq!(Match::new(3, 6).distance, 3);
        assert_eq!(Match::new(3, 6).length, 6);
    }

    #[test]
    fn test_constants() {
        assert_eq!(MAX_CHAIN_HOPS, 4096);
        assert_eq!(MAX_CANDIDATES, 256);
        assert_eq!(MAX_MATCH_LENGTH, 273);
        assert_eq!(NICE_REP_LENGTH, 64);
    }

    #[test]
    fn test_error_display() {
        let err = LzFindError::InvalidMinLength {
            min_length: 5,
            hash_span: 2,
        };
        assert!(err.to_string().contains("min length 5"));
    }
}

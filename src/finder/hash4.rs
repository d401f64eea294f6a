//! 4-byte hash-chain match finder
//!
//! Buckets are keyed on a 24-bit rolling hash of the 4-byte prefix at a
//! position (`((h << 6) ^ b) & 0xFFFFFF` rolled over four bytes).
//! Unlike [`HashChain2`](super::HashChain2) there is no early exit on a
//! short head candidate: the 24-bit hash is lossy, so a short match at
//! the head may be an ordinary collision rather than proof of
//! staleness, and the full chain is walked (bounded by the hop cap),
//! reporting every candidate of at least the minimum length.

use super::chain::ChainIndex;
use super::{distance_limit, lookahead_at, MatchFinder};
use crate::common::{LzFindError, Match, Result};
use crate::window::SlidingWindow;

/// Bytes covered by the hash; hashing a position needs this much
/// lookahead beyond it
const SPAN: u32 = 4;
/// Bucket table of 2^24 entries
const TABLE_BITS: u32 = 24;
/// Per-byte hash update shift
const HASH_SHIFT: u32 = 6;

/// Hash-chain finder keyed on 4-byte prefixes
#[derive(Debug)]
pub struct HashChain4 {
    index: ChainIndex,
    max_distance: u32,
    min_length: u32,
}

impl HashChain4 {
    /// Create a finder for a window of the given power-of-two capacity
    pub fn new(capacity: usize, max_distance: u32, min_length: u32) -> Result<Self> {
        if !capacity.is_power_of_two() {
            return Err(LzFindError::CapacityNotPowerOfTwo(capacity));
        }
        if max_distance == 0 || max_distance as usize >= capacity {
            return Err(LzFindError::InvalidMaxDistance {
                max_distance,
                capacity,
            });
        }
        if min_length == 0 || min_length > SPAN {
            return Err(LzFindError::InvalidMinLength {
                min_length,
                hash_span: SPAN,
            });
        }
        Ok(Self {
            index: ChainIndex::new(TABLE_BITS, HASH_SHIFT, SPAN, capacity),
            max_distance,
            min_length,
        })
    }
}

impl MatchFinder for HashChain4 {
    fn init(&mut self) {
        self.index.init();
    }

    fn insert(&mut self, window: &SlidingWindow, num_bytes: usize) {
        self.index.insert(window, num_bytes);
    }

    fn find_matches<F>(
        &mut self,
        window: &SlidingWindow,
        position: usize,
        max_length: usize,
        mut visit: F,
    ) where
        F: FnMut(Match) -> bool,
    {
        if lookahead_at(window, position) < SPAN as usize {
            return;
        }
        let h = self.index.hash_at(window, position);
        let head = match self.index.bucket_head(h) {
            Some(head) => head,
            None => return,
        };

        let mask = window.capacity() - 1;
        let limit = distance_limit(window, position, self.max_distance);
        let (first, hops) = self.index.walk_start(position, head, mask);
        self.index.scan(
            window,
            position,
            max_length,
            self.min_length,
            limit,
            first,
            0,
            hops,
            &mut visit,
        );
    }

    fn min_length(&self) -> u32 {
        self.min_length
    }

    fn max_distance(&self) -> u32 {
        self.max_distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window_with(data: &[u8]) -> SlidingWindow {
        let mut w = SlidingWindow::new(64).unwrap();
        assert_eq!(w.feed(data), data.len());
        w
    }

    #[test]
    fn test_rejects_bad_config() {
        assert!(HashChain4::new(96, 9, 4).is_err());
        assert!(HashChain4::new(64, 0, 4).is_err());
        assert!(HashChain4::new(64, 9, 5).is_err());
    }

    #[test]
    fn test_finds_planted_repeat() {
        let w = window_with(b"ABCDEF..ABCDEFGH");
        let mut f = HashChain4::new(64, 15, 4).unwrap();
        f.init();
        f.insert(&w, 8);

        let mut best = Match::EMPTY;
        f.find_matches(&w, 8, 8, |m| {
            if m.length > best.length {
                best = m;
            }
            true
        });
        assert_eq!(best, Match::new(8, 6));
    }

    #[test]
    fn test_collision_does_not_invalidate_chain() {
        // A run of one byte puts every position in the same bucket;
        // all candidates must still be surfaced in distance order.
        let w = window_with(b"AAAAAAAAAAAA");
        let mut f = HashChain4::new(64, 11, 4).unwrap();
        f.init();
        f.insert(&w, 8);

        let mut dists = Vec::new();
        f.find_matches(&w, 8, 4, |m| {
            dists.push(m.distance);
            true
        });
        assert_eq!(dists, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_respects_min_length() {
        let w = window_with(b"ABCDxxxxABCDEFGH");
        let mut f = HashChain4::new(64, 15, 4).unwrap();
        f.init();
        f.insert(&w, 8);

        let mut seen = Vec::new();
        f.find_matches(&w, 8, 8, |m| {
            seen.push(m);
            true
        });
        assert_eq!(seen, vec![Match::new(8, 4)]);
    }
}

//! 3-byte hash-chain match finder
//!
//! The middle sibling of [`HashChain2`](super::HashChain2) and
//! [`HashChain4`](super::HashChain4): buckets are keyed on a 20-bit
//! rolling hash of the 3-byte prefix at a position
//! (`((h << 7) ^ b) & 0xFFFFF` rolled over three bytes). Like the
//! 4-byte variant the hash is lossy, so short candidates are skipped
//! rather than taken as proof of staleness, and the full chain is
//! walked under the hop cap. This is the finder the lazy encoder
//! drives: a 3-byte minimum skips the barely-profitable 2-byte matches
//! while still catching short repeats the 4-byte hash cannot see.

use super::chain::ChainIndex;
use super::{distance_limit, lookahead_at, MatchFinder};
use crate::common::{LzFindError, Match, Result};
use crate::window::SlidingWindow;

/// Bytes covered by the hash
const SPAN: u32 = 3;
/// Bucket table of 2^20 entries; between the siblings' 2^16 and 2^24
const TABLE_BITS: u32 = 20;
/// Per-byte hash update shift; three 7-bit shifted bytes cover the
/// 20-bit domain
const HASH_SHIFT: u32 = 7;

/// Hash-chain finder keyed on 3-byte prefixes
#[derive(Debug)]
pub struct HashChain3 {
    index: ChainIndex,
    max_distance: u32,
    min_length: u32,
}

impl HashChain3 {
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

impl MatchFinder for HashChain3 {
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
        assert!(HashChain3::new(63, 9, 3).is_err());
        assert!(HashChain3::new(64, 0, 3).is_err());
        assert!(HashChain3::new(64, 9, 4).is_err());
    }

    #[test]
    fn test_finds_three_byte_repeat() {
        let w = window_with(b"ABCxyABCq");
        let mut f = HashChain3::new(64, 8, 3).unwrap();
        f.init();
        f.insert(&w, 5);

        let mut seen = Vec::new();
        f.find_matches(&w, 5, 4, |m| {
            seen.push(m);
            true
        });
        assert_eq!(seen, vec![Match::new(5, 3)]);
    }

    #[test]
    fn test_run_candidates_in_distance_order() {
        let w = window_with(b"AAAAAAAAAA");
        let mut f = HashChain3::new(64, 9, 3).unwrap();
        f.init();
        f.insert(&w, 6);

        let mut dists = Vec::new();
        f.find_matches(&w, 6, 3, |m| {
            dists.push(m.distance);
            true
        });
        assert_eq!(dists, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_init_clears_index() {
        let w = window_with(b"ABCABC");
        let mut f = HashChain3::new(64, 5, 3).unwrap();
        f.init();
        f.insert(&w, 3);
        f.init();

        let mut count = 0;
        f.find_matches(&w, 3, 3, |_| {
            count += 1;
            true
        });
        assert_eq!(count, 0);
    }
}

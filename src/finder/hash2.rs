//! 2-byte hash-chain match finder
//!
//! Buckets are keyed on an exact 16-bit encoding of the byte pair at a
//! position (`((h << 8) ^ b) & 0xFFFF` rolled over two bytes). Because
//! the hash is injective over the pair, a head candidate that fails to
//! match even two bytes is proof the entry predates a ring overwrite,
//! so the head is invalidated on the spot and the walk abandoned.
//! 2-byte matches are common and low-value enough that this
//! short-circuit is cheaper than a full chain walk.

use log::trace;

use super::chain::ChainIndex;
use super::{distance_limit, lookahead_at, MatchFinder};
use crate::common::{LzFindError, Match, Result};
use crate::window::SlidingWindow;

/// Bytes covered by the hash
const SPAN: u32 = 2;
/// Bucket table of 2^16 entries, one per possible byte pair
const TABLE_BITS: u32 = 16;
/// Per-byte hash update shift
const HASH_SHIFT: u32 = 8;

/// Hash-chain finder keyed on 2-byte prefixes
#[derive(Debug)]
pub struct HashChain2 {
    index: ChainIndex,
    max_distance: u32,
    min_length: u32,
}

impl HashChain2 {
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

impl MatchFinder for HashChain2 {
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
        let dist = position.wrapping_sub(head as usize) & mask;
        if dist == 0 {
            // The probe position itself sits at the head (it has been
            // inserted already); the real candidate list starts below.
            self.index.scan(
                window,
                position,
                max_length,
                self.min_length,
                limit,
                self.index.next_in_chain(head),
                0,
                1,
                &mut visit,
            );
            return;
        }
        if dist as u64 > limit {
            return;
        }

        let len = window.match_length(position, head as usize, max_length);
        if (len as u32) < self.min_length {
            // The pair hash is exact, so a short head cannot be a
            // collision: the entry is stale. Drop it to bound future
            // scans on this bucket.
            if max_length >= SPAN as usize {
                trace!("hash2: invalidating stale head for bucket {h:#06x}");
                self.index.clear_head(h);
            }
            return;
        }
        if !visit(Match::new(dist as u32, len as u32)) {
            return;
        }

        self.index.scan(
            window,
            position,
            max_length,
            self.min_length,
            limit,
            self.index.next_in_chain(head),
            dist as u64,
            1,
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
        assert!(HashChain2::new(48, 9, 2).is_err());
        assert!(HashChain2::new(64, 0, 2).is_err());
        assert!(HashChain2::new(64, 64, 2).is_err());
        assert!(HashChain2::new(64, 9, 3).is_err());
        assert!(HashChain2::new(64, 9, 0).is_err());
    }

    #[test]
    fn test_finds_pair_at_distance_three() {
        let w = window_with(b"ABCABCABCX");
        let mut f = HashChain2::new(64, 9, 2).unwrap();
        f.init();
        f.insert(&w, 3);

        let mut seen = Vec::new();
        f.find_matches(&w, 3, 7, |m| {
            seen.push(m);
            true
        });
        assert!(seen.contains(&Match::new(3, 6)));
    }

    #[test]
    fn test_distances_strictly_increase() {
        let w = window_with(b"ABABABABAB");
        let mut f = HashChain2::new(64, 9, 2).unwrap();
        f.init();
        f.insert(&w, 8);

        let mut dists = Vec::new();
        f.find_matches(&w, 8, 2, |m| {
            dists.push(m.distance);
            true
        });
        assert_eq!(dists, vec![2, 4, 6, 8]);
    }

    #[test]
    fn test_visitor_can_stop_early() {
        let w = window_with(b"ABABABABAB");
        let mut f = HashChain2::new(64, 9, 2).unwrap();
        f.init();
        f.insert(&w, 8);

        let mut count = 0;
        f.find_matches(&w, 8, 2, |_| {
            count += 1;
            false
        });
        assert_eq!(count, 1);
    }

    #[test]
    fn test_no_probe_without_lookahead() {
        let w = window_with(b"ABAB");
        let mut f = HashChain2::new(64, 3, 2).unwrap();
        f.init();
        f.insert(&w, 4);

        let mut count = 0;
        // Position 4 has no lookahead bytes at all
        f.find_matches(&w, 4, 2, |_| {
            count += 1;
            true
        });
        assert_eq!(count, 0);
    }

    #[test]
    fn test_stale_head_pruned_after_wrap() {
        let mut w = SlidingWindow::new(8).unwrap();
        w.feed(b"ABXXXXXX");
        let mut f = HashChain2::new(8, 7, 2).unwrap();
        f.init();
        f.insert(&w, 6);
        w.advance(8);
        // The ring wraps: "AB" at index 0 is overwritten with "QQ"
        w.feed(b"QQABZZZZ");
        f.insert(&w, 2);

        let mut count = 0;
        f.find_matches(&w, 2, 4, |_| {
            count += 1;
            true
        });
        // The surviving bucket entry points at rewritten bytes
        assert_eq!(count, 0);
    }

    #[test]
    fn test_probe_at_inserted_position_skips_self() {
        let w = window_with(b"ABAB");
        let mut f = HashChain2::new(64, 3, 2).unwrap();
        f.init();
        // Position 2 itself lands in the "AB" bucket
        f.insert(&w, 3);

        let mut seen = Vec::new();
        f.find_matches(&w, 2, 2, |m| {
            seen.push(m);
            true
        });
        assert_eq!(seen, vec![Match::new(2, 2)]);
    }
}

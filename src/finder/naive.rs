//! Brute-force match finder
//!
//! Walks every offset in the window instead of keeping an index. At
//! `O(max_distance)` per query it is far too slow for production, but
//! it is guaranteed to surface the true best match at a position, so it
//! serves as the correctness baseline the hash-chain finders are tested
//! against (those can miss matches whose prefix hash was overwritten or
//! never collided into the probed chain).

use super::{distance_limit, MatchFinder};
use crate::common::{LzFindError, Match, Result, MAX_CHAIN_HOPS};
use crate::window::SlidingWindow;

/// Exhaustive linear-scan match finder
#[derive(Debug)]
pub struct NaiveMatchFinder {
    max_distance: u32,
    min_length: u32,
}

impl NaiveMatchFinder {
    /// Create a finder scanning up to `max_distance` bytes back and
    /// reporting matches of at least `min_length` bytes
    pub fn new(max_distance: u32, min_length: u32) -> Result<Self> {
        if max_distance == 0 {
            return Err(LzFindError::InvalidMaxDistance {
                max_distance,
                capacity: 0,
            });
        }
        if min_length == 0 {
            return Err(LzFindError::InvalidMinLength {
                min_length,
                hash_span: u32::MAX,
            });
        }
        Ok(Self {
            max_distance,
            min_length,
        })
    }
}

impl MatchFinder for NaiveMatchFinder {
    fn init(&mut self) {
        // No index to reset
    }

    fn insert(&mut self, _window: &SlidingWindow, _num_bytes: usize) {
        // No index to maintain
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
        let mask = window.capacity() - 1;
        let limit = distance_limit(window, position, self.max_distance);
        let mut visited = 0;

        for dist in 1..=limit {
            let candidate = position.wrapping_sub(dist as usize) & mask;
            let len = window.match_length(position, candidate, max_length);
            if (len as u32) < self.min_length {
                continue;
            }
            visited += 1;
            if !visit(Match::new(dist as u32, len as u32)) || visited >= MAX_CHAIN_HOPS {
                return;
            }
        }
    }

    fn min_length(&self) -> u32 {
        self.min_length
    }

    fn max_distance(&self) -> u32 {
        self.max_distance
    }
}

//! Match finders for the sliding window
//!
//! A match finder proposes, for a stream position, prior occurrences of
//! the bytes starting there as `(distance, length)` pairs. Three
//! implementations share one capability:
//!
//! - [`NaiveMatchFinder`] - exhaustive linear scan, the correctness
//!   baseline
//! - [`HashChain2`] / [`HashChain3`] / [`HashChain4`] - production
//!   finders keyed on 2-, 3-, and 4-byte prefix hashes
//!
//! Candidates are pushed to a visitor closure newest-first; the visitor
//! returns `false` to stop the walk early. Every call is bounded by
//! [`MAX_CHAIN_HOPS`](crate::MAX_CHAIN_HOPS) probes, so degenerate
//! inputs cannot cause unbounded scans.

mod chain;
mod hash2;
mod hash3;
mod hash4;
mod naive;

pub use hash2::HashChain2;
pub use hash3::HashChain3;
pub use hash4::HashChain4;
pub use naive::NaiveMatchFinder;

use crate::common::Match;
use crate::window::SlidingWindow;

/// The match-finder capability
///
/// One finder instance is confined to exactly one compression stream;
/// its hash and chain tables are mutable, unsynchronized state. The
/// caller inserts every newly available position exactly once, in
/// order, before the window advances past it, and may then query any
/// already-inserted position from a later one.
pub trait MatchFinder {
    /// Reset all index state; call once before the first byte
    fn init(&mut self);

    /// Index the next `num_bytes` positions starting at `window.pos()`
    ///
    /// Must be called before the window advances past those positions.
    /// A position declared while fewer than its hash span of bytes are
    /// buffered is indexed by a later `insert` call, once the rest of
    /// its span has been fed.
    fn insert(&mut self, window: &SlidingWindow, num_bytes: usize);

    /// Visit candidate matches at `position`, newest-first
    ///
    /// Lengths are capped at `max_length`; only candidates with
    /// `length >= min_length` are reported. The visitor returns `true`
    /// to continue to the next (older) candidate. Zero visits is a
    /// normal outcome.
    fn find_matches<F>(
        &mut self,
        window: &SlidingWindow,
        position: usize,
        max_length: usize,
        visit: F,
    ) where
        F: FnMut(Match) -> bool;

    /// Minimum reportable match length
    fn min_length(&self) -> u32;

    /// Maximum reportable match distance
    fn max_distance(&self) -> u32;
}

/// Largest distance reachable from `position`: matches may not refer
/// past the start of the stream, nor beyond the finder's window.
#[inline]
pub(crate) fn distance_limit(window: &SlidingWindow, position: usize, max_distance: u32) -> u64 {
    let mask = window.capacity() - 1;
    let ahead = position.wrapping_sub(window.pos()) & mask;
    let total = window.total_position() + ahead as u64;
    (max_distance as u64).min(total)
}

/// Lookahead bytes available at `position` (which sits `0..working_size`
/// bytes ahead of the window cursor).
#[inline]
pub(crate) fn lookahead_at(window: &SlidingWindow, position: usize) -> usize {
    let mask = window.capacity() - 1;
    let ahead = position.wrapping_sub(window.pos()) & mask;
    window.working_size().saturating_sub(ahead)
}

//! Shared hash-chain index for the prefix-hash finders
//!
//! A fixed bucket table maps a rolling prefix hash to the most recent
//! buffer position with that hash; a parallel chain array, sized to the
//! window capacity, links each position to the prior one in its bucket.
//! The lists are newest-first and implicitly bounded by ring overwrite:
//! entries are never deleted, only superseded, and a walk detects stale
//! links by requiring strictly increasing distances.

use crate::common::{Match, MAX_CHAIN_HOPS};
use crate::window::SlidingWindow;

/// "No entry" marker inside the tables; never exposed through the API
const NO_ENTRY: u32 = u32::MAX;

/// Bucket heads + chain links for one hash-chain finder
#[derive(Debug)]
pub(crate) struct ChainIndex {
    head: Box<[u32]>,
    chain: Box<[u32]>,
    shift: u32,
    hash_mask: u32,
    span: u32,
    /// Declared positions whose span of bytes has not arrived yet;
    /// `next` is the buffer index of the first one
    deferred: usize,
    next: usize,
}

impl ChainIndex {
    /// `table_bits` sizes the bucket table at `2^table_bits`; `shift`
    /// and `span` define the per-byte hash update
    /// `h = ((h << shift) ^ byte) & ((1 << table_bits) - 1)` folded over
    /// `span` bytes. `capacity` is the window capacity.
    pub fn new(table_bits: u32, shift: u32, span: u32, capacity: usize) -> Self {
        Self {
            head: vec![NO_ENTRY; 1 << table_bits].into_boxed_slice(),
            chain: vec![NO_ENTRY; capacity].into_boxed_slice(),
            shift,
            hash_mask: (1u32 << table_bits) - 1,
            span,
            deferred: 0,
            next: 0,
        }
    }

    /// Reset every bucket and link to the no-entry state
    pub fn init(&mut self) {
        self.head.fill(NO_ENTRY);
        self.chain.fill(NO_ENTRY);
        self.deferred = 0;
    }

    /// Hash of the `span` upcoming bytes at a buffer index
    #[inline]
    pub fn hash_at(&self, window: &SlidingWindow, index: usize) -> usize {
        let mut h = 0u32;
        for k in 0..self.span as usize {
            h = ((h << self.shift) ^ window.byte(index + k) as u32) & self.hash_mask;
        }
        h as usize
    }

    /// Index positions `window.pos() .. window.pos() + num_bytes`
    ///
    /// A position with fewer than `span` lookahead bytes cannot be
    /// hashed yet; it is deferred, and a later call catches it up once
    /// the rest of its span has been fed. Deferred positions trail the
    /// cursor by less than the hash span.
    pub fn insert(&mut self, window: &SlidingWindow, num_bytes: usize) {
        debug_assert!(num_bytes <= window.working_size());
        let mask = window.capacity() - 1;
        let start = if self.deferred > 0 {
            self.next
        } else {
            window.pos()
        };
        let total = self.deferred + num_bytes;

        let ahead = start.wrapping_sub(window.pos()) & mask;
        let mut lookahead = if ahead <= window.working_size() {
            window.working_size() - ahead
        } else {
            // `start` sits behind the cursor (the window advanced past
            // a deferred position)
            window.working_size() + (window.capacity() - ahead)
        };

        let mut q = start;
        for k in 0..total {
            if lookahead < self.span as usize {
                self.next = q;
                self.deferred = total - k;
                return;
            }
            let h = self.hash_at(window, q);
            self.chain[q] = self.head[h];
            self.head[h] = q as u32;
            q = (q + 1) & mask;
            lookahead -= 1;
        }
        self.deferred = 0;
    }

    /// Most recent position in a bucket, if any
    #[inline]
    pub fn bucket_head(&self, h: usize) -> Option<u32> {
        let v = self.head[h];
        (v != NO_ENTRY).then_some(v)
    }

    /// Drop a bucket head known to be stale
    pub fn clear_head(&mut self, h: usize) {
        self.head[h] = NO_ENTRY;
    }

    /// Prior position sharing `index`'s bucket, if any
    #[inline]
    pub fn next_in_chain(&self, index: u32) -> Option<u32> {
        let v = self.chain[index as usize];
        (v != NO_ENTRY).then_some(v)
    }

    /// Starting point for a walk from `head` when probing `position`
    ///
    /// If the probe position has itself been inserted it sits at the
    /// bucket head; the real candidate list starts one link below, and
    /// the self-entry costs one hop.
    #[inline]
    pub fn walk_start(&self, position: usize, head: u32, mask: usize) -> (Option<u32>, usize) {
        if position.wrapping_sub(head as usize) & mask == 0 {
            (self.next_in_chain(head), 1)
        } else {
            (Some(head), 0)
        }
    }

    /// Walk the chain from `first`, visiting candidates newest-first
    ///
    /// `prev_distance` and `hops_used` carry state from probes the
    /// caller already performed on the same call (HashChain2 inspects
    /// the head itself first). Stops at the hop cap, when the chain is
    /// exhausted, when distance stops increasing (the ring wrapped), or
    /// when distance exceeds `limit`.
    #[allow(clippy::too_many_arguments)]
    pub fn scan(
        &self,
        window: &SlidingWindow,
        position: usize,
        max_length: usize,
        min_length: u32,
        limit: u64,
        first: Option<u32>,
        prev_distance: u64,
        hops_used: usize,
        visit: &mut impl FnMut(Match) -> bool,
    ) {
        let mask = window.capacity() - 1;
        let mut cand = match first {
            Some(c) => c,
            None => return,
        };
        let mut last_dist = prev_distance;
        let mut hops = hops_used;

        loop {
            if hops >= MAX_CHAIN_HOPS {
                return;
            }
            hops += 1;

            let dist = position.wrapping_sub(cand as usize) & mask;
            if dist == 0 || dist as u64 <= last_dist || dist as u64 > limit {
                // Self-reference or non-increasing distance means the
                // ring overwrote this part of the chain.
                return;
            }
            last_dist = dist as u64;

            let len = window.match_length(position, cand as usize, max_length);
            if len as u32 >= min_length && !visit(Match::new(dist as u32, len as u32)) {
                return;
            }

            cand = match self.next_in_chain(cand) {
                Some(c) => c,
                None => return,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_covers_span() {
        let mut w = SlidingWindow::new(64).unwrap();
        w.feed(b"ABCD");
        let idx = ChainIndex::new(16, 8, 2, 64);
        // 16-bit, shift 8: the pair hash is exactly (b0 << 8) ^ b1
        assert_eq!(
            idx.hash_at(&w, 0),
            (((b'A' as u32) << 8) ^ b'B' as u32) as usize
        );
        assert_eq!(
            idx.hash_at(&w, 1),
            (((b'B' as u32) << 8) ^ b'C' as u32) as usize
        );
    }

    #[test]
    fn test_insert_links_newest_first() {
        let mut w = SlidingWindow::new(64).unwrap();
        w.feed(b"ABxABy");
        let mut idx = ChainIndex::new(16, 8, 2, 64);
        idx.init();
        idx.insert(&w, 6);

        let h = idx.hash_at(&w, 0);
        // "AB" occurs at 0 and 3; the head must be the newer position
        assert_eq!(idx.bucket_head(h), Some(3));
        assert_eq!(idx.next_in_chain(3), Some(0));
        assert_eq!(idx.next_in_chain(0), None);
    }

    #[test]
    fn test_underfilled_tail_deferred_until_refill() {
        let mut w = SlidingWindow::new(64).unwrap();
        w.feed(b"AB");
        let mut idx = ChainIndex::new(16, 8, 2, 64);
        idx.init();
        idx.insert(&w, 2);
        // Position 0 has a full pair; position 1 does not yet
        assert_eq!(idx.bucket_head(idx.hash_at(&w, 0)), Some(0));
        let h1 = (((b'B' as u32) << 8) ^ b'C' as u32) as usize;
        assert_eq!(idx.bucket_head(h1), None);

        // Feeding the missing byte completes position 1's pair; the
        // next insert call catches it up without re-declaring it
        w.feed(b"C");
        idx.insert(&w, 0);
        assert_eq!(idx.bucket_head(h1), Some(1));
    }

    #[test]
    fn test_deferred_position_indexed_after_advance() {
        let mut w = SlidingWindow::new(64).unwrap();
        w.feed(b"A");
        let mut idx = ChainIndex::new(16, 8, 2, 64);
        idx.init();
        // Declared with one byte of lookahead, then advanced past
        idx.insert(&w, 1);
        w.advance(1);
        w.feed(b"BA");
        idx.insert(&w, 1);

        // Position 0 ("AB") was caught up behind the cursor, position 1
        // ("BA") indexed normally
        assert_eq!(
            idx.bucket_head((((b'A' as u32) << 8) ^ b'B' as u32) as usize),
            Some(0)
        );
        assert_eq!(
            idx.bucket_head((((b'B' as u32) << 8) ^ b'A' as u32) as usize),
            Some(1)
        );
    }
}

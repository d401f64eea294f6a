//! Sliding window buffer for match finding
//!
//! A fixed-capacity circular byte buffer holding both processed history
//! and unprocessed lookahead. All position arguments are buffer indices
//! in `[0, capacity)`, interpreted modulo the capacity; distances are
//! always counted backward from the current position.

use crate::common::{LzFindError, Result};

/// Circular byte buffer shared by one compression session
///
/// The window tracks three things: the processing cursor (`pos`), the
/// monotonic count of bytes ever consumed (`total_position`), and the
/// number of buffered-but-unconsumed lookahead bytes (`working_size`).
/// [`feed`](SlidingWindow::feed) never overwrites unconsumed lookahead;
/// callers that also need intact history (the encoder does) must keep
/// `max_distance + working_size <= capacity` on their feed path.
#[derive(Debug)]
pub struct SlidingWindow {
    buffer: Box<[u8]>,
    mask: usize,
    pos: usize,
    total_position: u64,
    working_size: usize,
}

impl SlidingWindow {
    /// Create a window with the given power-of-two capacity
    pub fn new(capacity: usize) -> Result<Self> {
        if !capacity.is_power_of_two() {
            return Err(LzFindError::CapacityNotPowerOfTwo(capacity));
        }
        if capacity < 2 {
            return Err(LzFindError::CapacityTooSmall {
                capacity,
                required: 2,
            });
        }
        Ok(Self {
            buffer: vec![0u8; capacity].into_boxed_slice(),
            mask: capacity - 1,
            pos: 0,
            total_position: 0,
            working_size: 0,
        })
    }

    /// Buffer capacity in bytes
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Current processing position (a buffer index)
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Total bytes consumed from the stream so far
    pub fn total_position(&self) -> u64 {
        self.total_position
    }

    /// Buffered-but-unconsumed lookahead bytes
    pub fn working_size(&self) -> usize {
        self.working_size
    }

    /// Read one byte; the index wraps modulo the capacity
    #[inline]
    pub fn byte(&self, index: usize) -> u8 {
        self.buffer[index & self.mask]
    }

    /// Append lookahead bytes, returning how many were accepted
    ///
    /// Accepts at most `capacity - working_size` bytes so unconsumed
    /// lookahead is never clobbered. History older than that may be
    /// overwritten once the ring wraps.
    pub fn feed(&mut self, data: &[u8]) -> usize {
        let free = self.capacity() - self.working_size;
        let accepted = data.len().min(free);
        let mut write = (self.pos + self.working_size) & self.mask;
        for &b in &data[..accepted] {
            self.buffer[write] = b;
            write = (write + 1) & self.mask;
        }
        self.working_size += accepted;
        accepted
    }

    /// Consume `n` lookahead bytes, moving the cursor forward
    ///
    /// `n` must not exceed [`working_size`](SlidingWindow::working_size).
    pub fn advance(&mut self, n: usize) {
        debug_assert!(n <= self.working_size);
        self.pos = (self.pos + n) & self.mask;
        self.total_position += n as u64;
        self.working_size -= n;
    }

    /// Count equal bytes between two buffer positions, up to `max_len`
    ///
    /// Both positions are interpreted modulo the capacity relative to
    /// their own cursors, so a match may span the wrap boundary.
    #[inline]
    pub fn match_length(&self, current: usize, candidate: usize, max_len: usize) -> usize {
        let mut len = 0;
        while len < max_len
            && self.buffer[(current + len) & self.mask] == self.buffer[(candidate + len) & self.mask]
        {
            len += 1;
        }
        len
    }

    /// Reset to the pristine state for a fresh stream
    pub fn reset(&mut self) {
        self.buffer.fill(0);
        self.pos = 0;
        self.total_position = 0;
        self.working_size = 0;
    }
}

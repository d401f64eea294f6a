//! One-step-lookahead lazy parser
//!
//! For each position the encoder weighs the best match starting there
//! (`main_match`) against the best match one byte later (`next_match`).
//! If the delayed match is meaningfully better it emits a literal now
//! and takes the better match next position, trading a mediocre
//! immediate match for a stronger delayed one. The thresholds in the
//! veto are empirically tuned ratio/speed trade-offs, validated by
//! benchmark rather than derived.

use log::debug;

use super::Token;
use crate::common::{
    LzFindError, Match, Result, MAX_CANDIDATES, MAX_MATCH_LENGTH, MIN_DICT_SIZE, MIN_MATCH_LENGTH,
    NICE_REP_LENGTH,
};
use crate::finder::{HashChain3, MatchFinder};
use crate::window::SlidingWindow;

/// Lookahead the encoder wants before committing to a decision
/// mid-stream: enough for a maximal match at the next position too.
const DECISION_LOOKAHEAD: usize = MAX_MATCH_LENGTH as usize + 1;

/// Lazy one-step-lookahead parser over a window and a 3-byte
/// hash-chain finder
///
/// One encoder owns exactly one window + finder pair and is confined
/// to one stream. Feed bytes with [`feed`](FastEncoder::feed), pull
/// decisions with [`next_token`](FastEncoder::next_token), and call
/// [`finish`](FastEncoder::finish) once the input ends so the tail can
/// drain. The four repeat-distance registers are read, not owned: the
/// caller passes them per call and maintains them.
#[derive(Debug)]
pub struct FastEncoder {
    window: SlidingWindow,
    finder: HashChain3,
    main_match: Match,
    next_match: Match,
    /// Bytes the previous decision consumed, to insert before advancing
    pending: usize,
    /// Bytes advanced by the previous decision (1 enables reuse of the
    /// lookahead match already computed)
    last_advance: usize,
    max_distance: u32,
    finished: bool,
}

impl FastEncoder {
    /// Create an encoder session for the given dictionary size
    ///
    /// `dict_size` must be a power of two of at least
    /// [`MIN_DICT_SIZE`]. The window is sized at twice the dictionary
    /// so lookahead never overwrites reachable history.
    pub fn new(dict_size: u32) -> Result<Self> {
        if dict_size < MIN_DICT_SIZE || !dict_size.is_power_of_two() {
            return Err(LzFindError::InvalidDictionarySize(dict_size));
        }
        let capacity = dict_size as usize * 2;
        let max_distance = dict_size - 1;
        let window = SlidingWindow::new(capacity)?;
        let mut finder = HashChain3::new(capacity, max_distance, MIN_MATCH_LENGTH)?;
        finder.init();
        debug!("FastEncoder: dict_size={dict_size}, window capacity={capacity}");
        Ok(Self {
            window,
            finder,
            main_match: Match::EMPTY,
            next_match: Match::EMPTY,
            pending: 0,
            last_advance: 0,
            max_distance,
            finished: false,
        })
    }

    /// Maximum distance a match may reach back
    pub fn max_distance(&self) -> u32 {
        self.max_distance
    }

    /// Total bytes consumed from the stream so far
    pub fn total_position(&self) -> u64 {
        self.window.total_position()
    }

    /// Append input bytes, returning how many were accepted
    ///
    /// Acceptance is capped so that `max_distance` bytes of history
    /// plus all unconsumed lookahead always fit in the window; call
    /// again after draining tokens.
    pub fn feed(&mut self, data: &[u8]) -> usize {
        let guarded_free = self
            .window
            .capacity()
            .saturating_sub(self.max_distance as usize + self.window.working_size());
        let n = data.len().min(guarded_free);
        let accepted = self.window.feed(&data[..n]);
        debug_assert_eq!(accepted, n);
        accepted
    }

    /// Mark the end of input so the remaining lookahead can drain
    pub fn finish(&mut self) {
        self.finished = true;
    }

    /// Reset the session for a fresh stream
    pub fn reset(&mut self) {
        self.window.reset();
        self.finder.init();
        self.main_match = Match::EMPTY;
        self.next_match = Match::EMPTY;
        self.pending = 0;
        self.last_advance = 0;
        self.finished = false;
    }

    /// Produce the next decision, or `None` if more input is needed
    /// (or the stream is fully drained after [`finish`](Self::finish))
    pub fn next_token(&mut self, reps: &[u32; 4]) -> Option<Token> {
        if self.pending > 0 {
            // The decision position itself was indexed when it was
            // probed; index the rest of the consumed span before
            // moving past it.
            self.window.advance(1);
            self.finder.insert(&self.window, self.pending - 1);
            self.window.advance(self.pending - 1);
            self.last_advance = self.pending;
            self.pending = 0;
        }

        let working = self.window.working_size();
        if working == 0 || (!self.finished && working < DECISION_LOOKAHEAD) {
            return None;
        }

        // Index the current position so the offset-1 probe can see it;
        // the finders skip the self-entry on the offset-0 probe.
        self.finder.insert(&self.window, 1);

        self.main_match = if self.last_advance == 1 {
            // The lookahead decision from the previous position is the
            // decision for this one.
            self.next_match
        } else {
            self.find_match_fast(0, reps)
        };
        self.last_advance = 0;

        self.next_match = if working > 1 {
            self.find_match_fast(1, reps)
        } else {
            Match::EMPTY
        };

        if !self.main_match.is_empty() && self.should_defer() {
            self.main_match.length = 0;
        }

        if self.main_match.length >= MIN_MATCH_LENGTH {
            self.pending = self.main_match.length as usize;
            Some(Token::Match {
                distance: self.main_match.distance,
                length: self.main_match.length,
            })
        } else {
            let byte = self.window.byte(self.window.pos());
            self.pending = 1;
            Some(Token::Literal(byte))
        }
    }

    /// Four disjunctive heuristics deciding whether the match one byte
    /// later is worth deferring for
    fn should_defer(&self) -> bool {
        let main = self.main_match;
        let next = self.next_match;
        (main.length > 3
            && next.length + 1 >= main.length
            && next.distance < (main.distance >> 7))
            || (next.length >= main.length && next.distance < main.distance)
            || (next.length >= main.length + 1 && (next.distance >> 7) <= main.distance)
            || (next.length > main.length + 1)
    }

    /// Reduce the finder's candidates at `pos + offset` to one best
    ///
    /// Prefers strictly greater length; accepts greedily any match
    /// longer than [`NICE_REP_LENGTH`] sitting at one of the repeat
    /// distances; gives up after [`MAX_CANDIDATES`] candidates (the
    /// finder's own hop cap still applies underneath).
    fn find_match_fast(&mut self, offset: usize, reps: &[u32; 4]) -> Match {
        let working = self.window.working_size();
        if working <= offset {
            return Match::EMPTY;
        }
        let max_length = (MAX_MATCH_LENGTH as usize).min(working - offset);
        let mask = self.window.capacity() - 1;
        let position = (self.window.pos() + offset) & mask;

        let mut best = Match::EMPTY;
        let mut examined = 0usize;
        self.finder
            .find_matches(&self.window, position, max_length, |m| {
                examined += 1;
                if m.length > best.length {
                    best = m;
                }
                if m.length > NICE_REP_LENGTH && reps.contains(&m.distance) {
                    best = m;
                    return false;
                }
                examined < MAX_CANDIDATES
            });
        best
    }
}

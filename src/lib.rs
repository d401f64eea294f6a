//! lzfind - dictionary-based LZ match finding and lazy parsing
//!
//! This crate implements the match-finding core of a sliding-window
//! compressor: a circular history buffer, a family of match finders
//! (an exhaustive baseline plus 2-, 3-, and 4-byte hash chains with a
//! hard per-query hop budget), and a lazy one-step-lookahead encoder
//! that reduces finder candidates to a stream of `literal | match`
//! decisions. Entropy coding of those decisions is a downstream
//! concern and is not part of this crate.
//!
//! # Example - one-shot parsing
//!
//! ```
//! use lzfind::{encode_bytes, reconstruct};
//!
//! let data = b"abcabcabcabcabc";
//! let tokens = encode_bytes(data, 1024)?;
//! assert_eq!(reconstruct(&tokens)?, data);
//! # Ok::<(), lzfind::LzFindError>(())
//! ```
//!
//! # Example - driving a match finder directly
//!
//! ```
//! use lzfind::{HashChain2, MatchFinder, SlidingWindow};
//!
//! let mut window = SlidingWindow::new(64)?;
//! window.feed(b"ABCABCABCX");
//!
//! let mut finder = HashChain2::new(64, 9, 2)?;
//! finder.init();
//! finder.insert(&window, 3);
//! finder.find_matches(&window, 3, 7, |m| {
//!     println!("candidate: {} bytes back, {} long", m.distance, m.length);
//!     true
//! });
//! # Ok::<(), lzfind::LzFindError>(())
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod common;
pub mod encoder;
pub mod error;
pub mod finder;
pub mod window;

// Re-export the working set
pub use common::{
    LzFindError, Match, Result, LENGTH_CODES, MAX_CANDIDATES, MAX_CHAIN_HOPS, MAX_MATCH_LENGTH,
    MIN_DICT_SIZE, MIN_MATCH_LENGTH, NICE_REP_LENGTH,
};
pub use encoder::{encode_bytes, promote_repeat, reconstruct, FastEncoder, ScanStats, Token};
pub use finder::{HashChain2, HashChain3, HashChain4, MatchFinder, NaiveMatchFinder};
pub use window::SlidingWindow;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexports() {
        let _ = Match::EMPTY;
        let _ = Token::Literal(0);
        assert!(SlidingWindow::new(16).is_ok());
        assert!(NaiveMatchFinder::new(8, 2).is_ok());
    }
}

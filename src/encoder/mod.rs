//! Lazy parsing encoder
//!
//! This module turns a byte stream into a stream of `literal | match`
//! decisions using the one-step-lookahead [`FastEncoder`]. The entropy
//! coding of those decisions belongs to a downstream stage; here a
//! token is the final product, and [`reconstruct`] is the inverse used
//! by the tests and the CLI to prove a token stream is self-consistent.

mod fast;

pub use fast::FastEncoder;

use log::debug;

use crate::common::{LzFindError, Result};

/// One parsing decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// Emit this byte verbatim
    Literal(u8),
    /// Copy `length` bytes starting `distance` bytes back
    Match {
        /// Bytes backward from the current output position (>= 1)
        distance: u32,
        /// Bytes to copy
        length: u32,
    },
}

/// Counts over a token stream, for reporting
#[derive(Debug, Default, Clone)]
pub struct ScanStats {
    /// Literal tokens emitted
    pub literal_count: usize,
    /// Match tokens emitted
    pub match_count: usize,
    /// Longest match emitted
    pub longest_match: u32,
    /// Total stream bytes the tokens represent
    pub total_bytes: u64,
}

impl ScanStats {
    /// Tally a token stream
    pub fn from_tokens(tokens: &[Token]) -> Self {
        let mut stats = Self::default();
        for tok in tokens {
            match *tok {
                Token::Literal(_) => {
                    stats.literal_count += 1;
                    stats.total_bytes += 1;
                }
                Token::Match { length, .. } => {
                    stats.match_count += 1;
                    stats.longest_match = stats.longest_match.max(length);
                    stats.total_bytes += length as u64;
                }
            }
        }
        stats
    }
}

/// Move `distance` to the front of the repeat registers
///
/// The four registers cache recently used match distances, which are
/// cheaper to re-encode than fresh ones. A distance already present is
/// rotated to the front; a new one pushes the oldest out.
pub fn promote_repeat(reps: &mut [u32; 4], distance: u32) {
    if let Some(i) = reps.iter().position(|&r| r == distance) {
        reps[..=i].rotate_right(1);
    } else {
        *reps = [distance, reps[0], reps[1], reps[2]];
    }
}

/// Parse a byte slice into tokens with a fresh encoder session
///
/// `dict_size` must be a power of two of at least
/// [`MIN_DICT_SIZE`](crate::MIN_DICT_SIZE); matches reach back at most
/// `dict_size - 1` bytes. This drives the streaming API the way a
/// minimal consumer would, maintaining the repeat registers by
/// most-recently-used rotation.
pub fn encode_bytes(data: &[u8], dict_size: u32) -> Result<Vec<Token>> {
    let mut encoder = FastEncoder::new(dict_size)?;
    let mut reps = [1u32, 2, 3, 4];
    let mut tokens = Vec::new();
    let mut fed = 0;

    loop {
        fed += encoder.feed(&data[fed..]);
        if fed == data.len() {
            encoder.finish();
        }
        while let Some(token) = encoder.next_token(&reps) {
            if let Token::Match { distance, .. } = token {
                promote_repeat(&mut reps, distance);
            }
            tokens.push(token);
        }
        if fed == data.len() {
            break;
        }
    }

    debug!(
        "encode_bytes: {} bytes -> {} tokens",
        data.len(),
        tokens.len()
    );
    Ok(tokens)
}

/// Expand a token stream back into bytes
///
/// Matches may overlap their own output (distance 1 with a long length
/// is run-length expansion), so the copy is byte-at-a-time.
pub fn reconstruct(tokens: &[Token]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    for tok in tokens {
        match *tok {
            Token::Literal(b) => out.push(b),
            Token::Match { distance, length } => {
                if distance == 0 || distance as usize > out.len() {
                    return Err(LzFindError::InvalidTokenDistance {
                        distance,
                        available: out.len(),
                    });
                }
                let start = out.len() - distance as usize;
                for k in 0..length as usize {
                    let b = out[start + k];
                    out.push(b);
                }
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_promote_repeat_rotates_existing() {
        let mut reps = [10, 20, 30, 40];
        promote_repeat(&mut reps, 30);
        assert_eq!(reps, [30, 10, 20, 40]);
        promote_repeat(&mut reps, 30);
        assert_eq!(reps, [30, 10, 20, 40]);
    }

    #[test]
    fn test_promote_repeat_inserts_new() {
        let mut reps = [10, 20, 30, 40];
        promote_repeat(&mut reps, 7);
        assert_eq!(reps, [7, 10, 20, 30]);
    }

    #[test]
    fn test_reconstruct_literals_and_matches() {
        let tokens = [
            Token::Literal(b'a'),
            Token::Literal(b'b'),
            Token::Match {
                distance: 2,
                length: 4,
            },
        ];
        assert_eq!(reconstruct(&tokens).unwrap(), b"ababab");
    }

    #[test]
    fn test_reconstruct_overlapping_run() {
        let tokens = [
            Token::Literal(b'x'),
            Token::Match {
                distance: 1,
                length: 5,
            },
        ];
        assert_eq!(reconstruct(&tokens).unwrap(), b"xxxxxx");
    }

    #[test]
    fn test_reconstruct_rejects_bad_distance() {
        let tokens = [
            Token::Literal(b'x'),
            Token::Match {
                distance: 3,
                length: 2,
            },
        ];
        assert!(reconstruct(&tokens).is_err());
    }

    #[test]
    fn test_scan_stats() {
        let tokens = [
            Token::Literal(b'a'),
            Token::Match {
                distance: 1,
                length: 6,
            },
            Token::Literal(b'b'),
        ];
        let stats = ScanStats::from_tokens(&tokens);
        assert_eq!(stats.literal_count, 2);
        assert_eq!(stats.match_count, 1);
        assert_eq!(stats.longest_match, 6);
        assert_eq!(stats.total_bytes, 8);
    }
}

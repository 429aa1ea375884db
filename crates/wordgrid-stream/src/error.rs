//! Error type for stream reads.

use std::error::Error;
use std::fmt;

/// Errors that can occur while decoding from a [`BitStream`](crate::BitStream).
///
/// Writes cannot fail (the backing buffer grows on demand), so only the
/// `get*` family returns these.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamError {
    /// A read asked for more bits than the stream holds past the read
    /// cursor (truncated or corrupt blob).
    UnderRun {
        /// Bits the operation needed.
        wanted_bits: u64,
        /// Bits actually available at the read cursor.
        available_bits: u64,
    },
    /// A length-prefixed string held bytes that are not valid UTF-8.
    BadUtf8,
    /// A variable-length integer ran past the 32-bit range.
    BadVarint,
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnderRun {
                wanted_bits,
                available_bits,
            } => write!(
                f,
                "stream under-run: wanted {wanted_bits} bits, {available_bits} available"
            ),
            Self::BadUtf8 => write!(f, "string field is not valid UTF-8"),
            Self::BadVarint => write!(f, "variable-length integer exceeds 32 bits"),
        }
    }
}

impl Error for StreamError {}

//! Bit-granular stream buffer for the wordgrid save and wire formats.
//!
//! Everything the game persists — dictionaries, move logs, whole games —
//! is packed through [`BitStream`]: an in-memory byte buffer with
//! independent, bit-addressable read and write cursors and a per-stream
//! format version tag. The same blob must decode bit-for-bit on every
//! device and build, so the packing rules are fixed:
//!
//! - bit fields fill each byte least-significant-bit first;
//! - byte-aligned integers are big-endian;
//! - any byte-granular operation first advances its cursor to the next
//!   byte boundary, abandoning a partially consumed byte;
//! - strings carry a 1-byte length prefix (so at most 254 bytes).
//!
//! Reads return `Result` and never panic on truncated input; writes go
//! to memory and cannot fail. Persisting the buffer to disk or network
//! is the caller's job.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod pos;
pub mod stream;

pub use error::StreamError;
pub use pos::{Cursor, StreamPos};
pub use stream::BitStream;

/// Number of bits needed to represent every value in `0..=max`.
///
/// Computed by shifting right until nothing remains, so
/// `bits_for_max(1) == 1`, `bits_for_max(4) == 3`, `bits_for_max(255) == 8`.
///
/// # Panics
///
/// Panics if `max` is zero; a zero maximum means the caller has no data
/// to encode and a 0-bit field cannot round-trip.
///
/// # Examples
///
/// ```
/// use wordgrid_stream::bits_for_max;
///
/// assert_eq!(bits_for_max(2), 2);
/// assert_eq!(bits_for_max(256), 9);
/// ```
pub fn bits_for_max(max: u32) -> u32 {
    assert!(max > 0, "bits_for_max(0) is meaningless");
    let mut nn = max;
    let mut result = 0;
    while nn != 0 {
        nn >>= 1;
        result += 1;
    }
    result
}

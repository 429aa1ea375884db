//! Cursor positions within a bit stream.

use std::fmt;

/// A saved cursor position: byte offset in the high bits, sub-byte bit
/// offset in the low three.
///
/// Positions are opaque bookmarks — take one with
/// [`BitStream::pos`](crate::BitStream::pos), hand it back to
/// [`BitStream::set_pos`](crate::BitStream::set_pos). They also travel on
/// the wire (the move log stores its end-of-log position as a `u32`), so
/// the representation is fixed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StreamPos(pub u32);

impl StreamPos {
    /// The beginning of a stream.
    pub const START: StreamPos = StreamPos(0);

    /// Byte offset of the position.
    pub fn byte_offset(self) -> usize {
        (self.0 >> 3) as usize
    }

    /// Bit offset within the byte, 0..8.
    pub fn bit_offset(self) -> u32 {
        self.0 & 0x7
    }
}

impl fmt::Display for StreamPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.byte_offset(), self.bit_offset())
    }
}

/// Selects which of a stream's two cursors an operation targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cursor {
    /// The read cursor, advanced by `get*` operations.
    Read,
    /// The write cursor, advanced by `put*` operations.
    Write,
}

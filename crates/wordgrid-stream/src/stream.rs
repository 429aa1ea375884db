//! The bit-packed stream buffer.

use crate::error::StreamError;
use crate::pos::{Cursor, StreamPos};

/// An append/random-access byte buffer with independent bit-granular
/// read and write cursors.
///
/// # Examples
///
/// ```
/// use wordgrid_stream::BitStream;
///
/// let mut stream = BitStream::new();
/// stream.put_bits(6, 27);
/// stream.put_bits(3, 5);
/// stream.put_u16(0xBEEF);
///
/// assert_eq!(stream.get_bits(6).unwrap(), 27);
/// assert_eq!(stream.get_bits(3).unwrap(), 5);
/// // byte-aligned reads skip the rest of a partial byte
/// assert_eq!(stream.get_u16().unwrap(), 0xBEEF);
/// ```
#[derive(Clone, Debug, Default)]
pub struct BitStream {
    buf: Vec<u8>,
    /// Read cursor, in bits from the start of `buf`.
    rpos: u32,
    /// Write cursor, in bits from the start of `buf`.
    wpos: u32,
    /// Format version tag; zero until assigned.
    version: u16,
}

impl BitStream {
    /// Create an empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty stream with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Wrap an existing blob for reading; the write cursor starts at the
    /// end, so appends extend the blob.
    pub fn from_vec(buf: Vec<u8>) -> Self {
        let wpos = (buf.len() as u32) << 3;
        Self {
            buf,
            rpos: 0,
            wpos,
            version: 0,
        }
    }

    /// The full written contents, including any bytes already read.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the stream, returning the backing buffer.
    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }

    /// Bytes between the read cursor (rounded up to a byte boundary) and
    /// the end of written data.
    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(Self::ceil_bytes(self.rpos))
    }

    // ── Version tag ─────────────────────────────────────────────

    /// The stream's format version tag (zero if never set).
    pub fn version(&self) -> u16 {
        self.version
    }

    /// Record the stream's format version, read once near the start of
    /// any top-level save format.
    ///
    /// Something is wrong if the tag changes mid-stream, so re-assignment
    /// to a different value is debug-asserted.
    pub fn set_version(&mut self, version: u16) {
        debug_assert!(
            self.version == 0 || self.version == version,
            "stream version changed from {} to {}",
            self.version,
            version
        );
        self.version = version;
    }

    // ── Cursor management ───────────────────────────────────────

    /// Current position of the chosen cursor.
    pub fn pos(&self, which: Cursor) -> StreamPos {
        match which {
            Cursor::Read => StreamPos(self.rpos),
            Cursor::Write => StreamPos(self.wpos),
        }
    }

    /// Move the chosen cursor, returning the position it had before.
    ///
    /// The returned position makes the pervasive save/restore ("peek
    /// ahead, then rewind") pattern a one-liner in each direction.
    pub fn set_pos(&mut self, which: Cursor, pos: StreamPos) -> StreamPos {
        let old = self.pos(which);
        match which {
            Cursor::Read => self.rpos = pos.0,
            Cursor::Write => self.wpos = pos.0,
        }
        old
    }

    // ── Bit-granular access ─────────────────────────────────────

    /// Write the low `n_bits` bits of `value`, least significant first.
    ///
    /// # Panics
    ///
    /// Panics if `n_bits` is outside `1..=32`; debug-asserts that `value`
    /// fits in the field.
    pub fn put_bits(&mut self, n_bits: u32, value: u32) {
        assert!((1..=32).contains(&n_bits), "put_bits width {n_bits}");
        debug_assert!(
            n_bits == 32 || value >> n_bits == 0,
            "value {value:#x} too wide for {n_bits} bits"
        );
        for ii in 0..n_bits {
            self.put_one_bit(value >> ii & 1 != 0);
        }
    }

    /// Read `n_bits` bits (1–32) as an unsigned integer.
    pub fn get_bits(&mut self, n_bits: u32) -> Result<u32, StreamError> {
        assert!((1..=32).contains(&n_bits), "get_bits width {n_bits}");
        let total_bits = (self.buf.len() as u64) * 8;
        let available = total_bits.saturating_sub(u64::from(self.rpos));
        if u64::from(n_bits) > available {
            return Err(StreamError::UnderRun {
                wanted_bits: u64::from(n_bits),
                available_bits: available,
            });
        }
        let mut result = 0u32;
        for ii in 0..n_bits {
            let byte = (self.rpos >> 3) as usize;
            let bit = self.rpos & 7;
            if self.buf[byte] >> bit & 1 != 0 {
                result |= 1 << ii;
            }
            self.rpos += 1;
        }
        Ok(result)
    }

    fn put_one_bit(&mut self, one: bool) {
        let byte = (self.wpos >> 3) as usize;
        let bit = self.wpos & 7;
        if byte >= self.buf.len() {
            self.buf.resize(byte + 1, 0);
        } else if bit == 0 {
            // starting to overwrite an existing byte: clear it so stale
            // high bits can't survive a shorter rewrite
            self.buf[byte] = 0;
        }
        let mask = 1u8 << bit;
        if one {
            self.buf[byte] |= mask;
        } else {
            self.buf[byte] &= !mask;
        }
        self.wpos += 1;
    }

    // ── Byte-granular access ────────────────────────────────────

    /// Write raw bytes at the (byte-aligned) write cursor.
    pub fn put_bytes(&mut self, data: &[u8]) {
        self.wpos = Self::align_up(self.wpos);
        let start = (self.wpos >> 3) as usize;
        let end = start + data.len();
        if end <= self.buf.len() {
            self.buf[start..end].copy_from_slice(data);
        } else if start <= self.buf.len() {
            let n_over = self.buf.len() - start;
            self.buf[start..].copy_from_slice(&data[..n_over]);
            self.buf.extend_from_slice(&data[n_over..]);
        } else {
            // cursor parked past the end; pad the gap
            self.buf.resize(start, 0);
            self.buf.extend_from_slice(data);
        }
        self.wpos = (end as u32) << 3;
    }

    /// Fill `out` with raw bytes from the (byte-aligned) read cursor.
    pub fn get_bytes(&mut self, out: &mut [u8]) -> Result<(), StreamError> {
        self.rpos = Self::align_up(self.rpos);
        let start = (self.rpos >> 3) as usize;
        let end = start + out.len();
        if end > self.buf.len() {
            return Err(StreamError::UnderRun {
                wanted_bits: (out.len() as u64) * 8,
                available_bits: (self.buf.len().saturating_sub(start) as u64) * 8,
            });
        }
        out.copy_from_slice(&self.buf[start..end]);
        self.rpos = (end as u32) << 3;
        Ok(())
    }

    /// Read `count` raw bytes into a fresh vector.
    pub fn get_byte_vec(&mut self, count: usize) -> Result<Vec<u8>, StreamError> {
        let mut out = vec![0u8; count];
        self.get_bytes(&mut out)?;
        Ok(out)
    }

    /// Write one byte.
    pub fn put_u8(&mut self, value: u8) {
        self.put_bytes(&[value]);
    }

    /// Write a big-endian `u16`.
    pub fn put_u16(&mut self, value: u16) {
        self.put_bytes(&value.to_be_bytes());
    }

    /// Write a big-endian `u32`.
    pub fn put_u32(&mut self, value: u32) {
        self.put_bytes(&value.to_be_bytes());
    }

    /// Read one byte.
    pub fn get_u8(&mut self) -> Result<u8, StreamError> {
        let mut buf = [0u8; 1];
        self.get_bytes(&mut buf)?;
        Ok(buf[0])
    }

    /// Read a big-endian `u16`.
    pub fn get_u16(&mut self) -> Result<u16, StreamError> {
        let mut buf = [0u8; 2];
        self.get_bytes(&mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Read a big-endian `u32`.
    pub fn get_u32(&mut self) -> Result<u32, StreamError> {
        let mut buf = [0u8; 4];
        self.get_bytes(&mut buf)?;
        Ok(u32::from_be_bytes(buf))
    }

    // ── Variable-length integers ────────────────────────────────

    /// Write a `u32` in 7-bits-per-byte form, low bits first, the high
    /// bit of each byte signalling another byte follows.
    ///
    /// Emitted through [`put_bits`](Self::put_bits), so a varint may sit
    /// at any bit offset.
    pub fn put_u32vl(&mut self, mut value: u32) {
        loop {
            let mut byte = (value & 0x7F) as u32;
            value >>= 7;
            let have_more = value != 0;
            if have_more {
                byte |= 0x80;
            }
            self.put_bits(8, byte);
            if !have_more {
                break;
            }
        }
    }

    /// Read a `u32` written by [`put_u32vl`](Self::put_u32vl).
    pub fn get_u32vl(&mut self) -> Result<u32, StreamError> {
        let mut result = 0u32;
        for ii in 0.. {
            let byte = self.get_bits(8)?;
            if ii >= 5 || (ii == 4 && byte & 0x70 != 0) {
                return Err(StreamError::BadVarint);
            }
            result |= (byte & 0x7F) << (7 * ii);
            if byte & 0x80 == 0 {
                break;
            }
        }
        Ok(result)
    }

    // ── Strings ─────────────────────────────────────────────────

    /// Write a length-prefixed UTF-8 string (1-byte length, so at most
    /// 254 bytes).
    ///
    /// # Panics
    ///
    /// Panics if the string is 255 bytes or longer; the format cannot
    /// represent it and callers must enforce the cap.
    pub fn put_string(&mut self, s: &str) {
        let bytes = s.as_bytes();
        assert!(
            bytes.len() < 255,
            "string too long for stream: {} bytes",
            bytes.len()
        );
        self.put_u8(bytes.len() as u8);
        self.put_bytes(bytes);
    }

    /// Read a string written by [`put_string`](Self::put_string).
    pub fn get_string(&mut self) -> Result<String, StreamError> {
        let len = self.get_u8()? as usize;
        let bytes = self.get_byte_vec(len)?;
        String::from_utf8(bytes).map_err(|_| StreamError::BadUtf8)
    }

    // ── Stream nesting ──────────────────────────────────────────

    /// Copy `n_bytes` from `src`'s read cursor to this stream's write
    /// cursor, advancing both.
    ///
    /// This is how one component's whole stream is embedded verbatim in
    /// another's (e.g. the move log inside a game save).
    pub fn append_from(&mut self, src: &mut BitStream, n_bytes: usize) -> Result<(), StreamError> {
        let bytes = src.get_byte_vec(n_bytes)?;
        self.put_bytes(&bytes);
        Ok(())
    }

    // ── Content hash ────────────────────────────────────────────

    /// Jenkins one-at-a-time hash of the stream's bytes from the start
    /// up to `pos`.
    ///
    /// The unused high bits of a trailing partial byte are masked off,
    /// so streams that agree bit-for-bit up to `pos` hash identically
    /// regardless of what was written past it.
    pub fn hash_to(&self, pos: StreamPos) -> u32 {
        let whole = pos.byte_offset();
        let bits = pos.bit_offset();
        let mut hash = augment_hash(0, &self.buf[..whole.min(self.buf.len())]);
        if bits != 0 && whole < self.buf.len() {
            let masked = self.buf[whole] & !(0xFFu8 << bits);
            hash = augment_hash(hash, &[masked]);
        }
        finish_hash(hash)
    }

    fn align_up(pos: u32) -> u32 {
        (pos + 7) & !7
    }

    fn ceil_bytes(pos: u32) -> usize {
        ((pos + 7) >> 3) as usize
    }
}

fn augment_hash(mut hash: u32, bytes: &[u8]) -> u32 {
    // http://en.wikipedia.org/wiki/Jenkins_hash_function
    for &byte in bytes {
        hash = hash.wrapping_add(u32::from(byte));
        hash = hash.wrapping_add(hash << 10);
        hash ^= hash >> 6;
    }
    hash
}

fn finish_hash(mut hash: u32) -> u32 {
    hash = hash.wrapping_add(hash << 3);
    hash ^= hash >> 11;
    hash.wrapping_add(hash << 15)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_roundtrip_simple() {
        let mut stream = BitStream::new();
        stream.put_bits(1, 1);
        stream.put_bits(5, 19);
        stream.put_bits(12, 0xABC);
        assert_eq!(stream.get_bits(1).unwrap(), 1);
        assert_eq!(stream.get_bits(5).unwrap(), 19);
        assert_eq!(stream.get_bits(12).unwrap(), 0xABC);
    }

    #[test]
    fn bit_packing_is_lsb_first() {
        let mut stream = BitStream::new();
        stream.put_bits(3, 0b101);
        stream.put_bits(5, 0b11010);
        // first byte: bits 0..3 = 101, bits 3..8 = 11010
        assert_eq!(stream.as_bytes(), &[0b1101_0101]);
    }

    #[test]
    fn write_cursor_advances_exactly() {
        let mut stream = BitStream::new();
        for width in 1..=32 {
            let before = stream.pos(Cursor::Write).0;
            stream.put_bits(width, 0);
            assert_eq!(stream.pos(Cursor::Write).0 - before, width);
        }
    }

    #[test]
    fn byte_ops_realign_both_cursors() {
        let mut stream = BitStream::new();
        stream.put_bits(3, 5);
        stream.put_u8(0x42); // lands on the next byte boundary
        assert_eq!(stream.as_bytes().len(), 2);

        assert_eq!(stream.get_bits(3).unwrap(), 5);
        assert_eq!(stream.get_u8().unwrap(), 0x42);
    }

    #[test]
    fn integers_are_big_endian() {
        let mut stream = BitStream::new();
        stream.put_u16(0x1234);
        stream.put_u32(0xDEADBEEF);
        assert_eq!(stream.as_bytes(), &[0x12, 0x34, 0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(stream.get_u16().unwrap(), 0x1234);
        assert_eq!(stream.get_u32().unwrap(), 0xDEADBEEF);
    }

    #[test]
    fn underrun_reports_sizes() {
        let mut stream = BitStream::from_vec(vec![0xFF]);
        assert_eq!(stream.get_bits(8).unwrap(), 0xFF);
        let err = stream.get_bits(1).unwrap_err();
        assert_eq!(
            err,
            StreamError::UnderRun {
                wanted_bits: 1,
                available_bits: 0
            }
        );
    }

    #[test]
    fn peek_via_pos_save_restore() {
        let mut stream = BitStream::new();
        stream.put_u8(1);
        stream.put_u8(2);

        let saved = stream.pos(Cursor::Read);
        assert_eq!(stream.get_u8().unwrap(), 1);
        assert_eq!(stream.get_u8().unwrap(), 2);
        stream.set_pos(Cursor::Read, saved);
        assert_eq!(stream.get_u8().unwrap(), 1);
    }

    #[test]
    fn set_pos_returns_displaced_position() {
        let mut stream = BitStream::new();
        stream.put_u8(0);
        let old = stream.set_pos(Cursor::Write, StreamPos::START);
        assert_eq!(old, StreamPos(8));
    }

    #[test]
    fn overwrite_in_middle_keeps_length() {
        let mut stream = BitStream::new();
        stream.put_u32(0xAAAAAAAA);
        stream.set_pos(Cursor::Write, StreamPos(8));
        stream.put_u8(0xBB);
        assert_eq!(stream.as_bytes(), &[0xAA, 0xBB, 0xAA, 0xAA]);
    }

    #[test]
    fn string_roundtrip_and_empty() {
        let mut stream = BitStream::new();
        stream.put_string("CH");
        stream.put_string("");
        assert_eq!(stream.get_string().unwrap(), "CH");
        assert_eq!(stream.get_string().unwrap(), "");
    }

    #[test]
    fn string_of_254_bytes_roundtrips() {
        let long = "x".repeat(254);
        let mut stream = BitStream::new();
        stream.put_string(&long);
        assert_eq!(stream.get_string().unwrap(), long);
    }

    #[test]
    #[should_panic(expected = "string too long")]
    fn string_of_255_bytes_is_rejected() {
        let too_long = "x".repeat(255);
        let mut stream = BitStream::new();
        stream.put_string(&too_long);
    }

    #[test]
    fn bad_utf8_string_errors() {
        let mut stream = BitStream::from_vec(vec![2, 0xFF, 0xFE]);
        assert_eq!(stream.get_string().unwrap_err(), StreamError::BadUtf8);
    }

    #[test]
    fn varint_roundtrip_boundaries() {
        for value in [0u32, 1, 0x7F, 0x80, 0x3FFF, 0x4000, u32::MAX] {
            let mut stream = BitStream::new();
            stream.put_u32vl(value);
            assert_eq!(stream.get_u32vl().unwrap(), value, "value {value:#x}");
        }
    }

    #[test]
    fn varint_at_bit_offset() {
        let mut stream = BitStream::new();
        stream.put_bits(3, 6);
        stream.put_u32vl(300);
        assert_eq!(stream.get_bits(3).unwrap(), 6);
        assert_eq!(stream.get_u32vl().unwrap(), 300);
    }

    #[test]
    fn nesting_copies_between_streams() {
        let mut inner = BitStream::new();
        inner.put_u32(0x01020304);

        let mut outer = BitStream::new();
        outer.put_u16(4);
        outer.append_from(&mut inner, 4).unwrap();

        assert_eq!(outer.get_u16().unwrap(), 4);
        assert_eq!(outer.get_u32().unwrap(), 0x01020304);
    }

    #[test]
    fn remaining_counts_unread_bytes() {
        let mut stream = BitStream::from_vec(vec![0; 10]);
        assert_eq!(stream.remaining(), 10);
        let _ = stream.get_bits(3).unwrap();
        // the partially consumed byte no longer counts
        assert_eq!(stream.remaining(), 9);
    }

    #[test]
    fn hash_masks_partial_byte() {
        let mut a = BitStream::new();
        a.put_bits(3, 0b101);
        let pos = a.pos(Cursor::Write);
        a.put_bits(5, 0b11111);

        let mut b = BitStream::new();
        b.put_bits(3, 0b101);
        b.put_bits(5, 0);

        assert_eq!(a.hash_to(pos), b.hash_to(pos));
        assert_ne!(
            a.hash_to(a.pos(Cursor::Write)),
            b.hash_to(b.pos(Cursor::Write))
        );
    }

    #[test]
    fn version_is_sticky() {
        let mut stream = BitStream::new();
        assert_eq!(stream.version(), 0);
        stream.set_version(2);
        assert_eq!(stream.version(), 2);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn roundtrip_any_width(width in 1u32..=32, value: u32) {
                let value = if width == 32 { value } else { value & ((1 << width) - 1) };
                let mut stream = BitStream::new();
                stream.put_bits(width, value);
                prop_assert_eq!(stream.pos(Cursor::Write).0, width);
                prop_assert_eq!(stream.get_bits(width).unwrap(), value);
            }

            #[test]
            fn roundtrip_field_sequences(fields in prop::collection::vec((1u32..=32, any::<u32>()), 0..64)) {
                let fields: Vec<(u32, u32)> = fields
                    .into_iter()
                    .map(|(w, v)| (w, if w == 32 { v } else { v & ((1 << w) - 1) }))
                    .collect();
                let mut stream = BitStream::new();
                for &(width, value) in &fields {
                    stream.put_bits(width, value);
                }
                for &(width, value) in &fields {
                    prop_assert_eq!(stream.get_bits(width).unwrap(), value);
                }
            }

            #[test]
            fn roundtrip_varint(value: u32) {
                let mut stream = BitStream::new();
                stream.put_u32vl(value);
                prop_assert_eq!(stream.get_u32vl().unwrap(), value);
            }

            #[test]
            fn roundtrip_strings(s in "[a-zA-Zà-öø-ÿ]{0,60}") {
                let mut stream = BitStream::new();
                stream.put_string(&s);
                prop_assert_eq!(stream.get_string().unwrap(), s);
            }
        }
    }
}

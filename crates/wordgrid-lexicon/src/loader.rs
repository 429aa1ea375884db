//! Dictionary-file parsing.
//!
//! The on-disk format differs from the wire layout: a flags word picks
//! node size and face encoding, an optional header carries word count and
//! provenance, specials bring their bitmaps along, and the word trie sits
//! at the tail.

use wordgrid_stream::BitStream;

use crate::dawg::{Dawg, NodeSize};
use crate::error::LexiconError;
use crate::face::{split_faces, Face, SpecialFace, TileBitmap, SYNONYM_DELIM};
use crate::lexicon::{Lexicon, LexiconMeta};

/// Flags bit marking an optional header block after the flags word.
const DICT_HEADER_MASK: u16 = 0x08;
/// Flags bit noting faces may carry synonym alternates; layout-neutral.
const DICT_SYNONYMS_MASK: u16 = 0x10;

struct Format {
    node_size: NodeSize,
    char_size: usize,
    is_utf8: bool,
}

fn format_for_flags(flags: u16) -> Result<Format, LexiconError> {
    let (node_size, char_size, is_utf8) = match flags & 0x0007 {
        1 => (NodeSize::Three, 1, false),
        2 => (NodeSize::Three, 2, false),
        3 => (NodeSize::Four, 2, false),
        4 => (NodeSize::Three, 1, true),
        5 => (NodeSize::Four, 1, true),
        _ => return Err(LexiconError::BadFlags { flags }),
    };
    if flags & !(DICT_HEADER_MASK | DICT_SYNONYMS_MASK | 0x0007) != 0 {
        return Err(LexiconError::BadFlags { flags });
    }
    Ok(Format {
        node_size,
        char_size,
        is_utf8,
    })
}

impl Lexicon {
    /// Parse a complete dictionary binary: flags, optional header, face
    /// table, counts and values, special texts with their bitmaps, and
    /// the trie tail.
    pub fn from_file_bytes(bytes: &[u8]) -> Result<Lexicon, LexiconError> {
        let mut stream = BitStream::from_vec(bytes.to_vec());

        let flags = stream.get_u16()?;
        let format = format_for_flags(flags)?;

        let mut meta = LexiconMeta::default();
        if flags & DICT_HEADER_MASK != 0 {
            read_header(&mut stream, &mut meta)?;
        }

        let n_face_bytes = if format.is_utf8 {
            Some(usize::from(stream.get_u8()?))
        } else {
            None
        };
        let n_faces = usize::from(stream.get_u8()?);
        if n_faces == 0 {
            return Err(LexiconError::NoFaces);
        }
        let n_face_bytes = n_face_bytes.unwrap_or(n_faces * format.char_size);
        let blob = stream.get_byte_vec(n_face_bytes)?;
        let faces = split_faces(&blob, n_faces, format.is_utf8)?;

        let xloc = stream.get_u16()?;
        meta.lang_code = (xloc & 0x7F) as u8;

        let mut counts = Vec::with_capacity(n_faces);
        let mut values = Vec::with_capacity(n_faces);
        for _ in 0..n_faces {
            counts.push(stream.get_u8()?);
            values.push(stream.get_u8()?);
        }

        let mut specials = Vec::new();
        for face in &faces {
            if let Face::Special(_) = face {
                specials.push(read_special(&mut stream)?);
            }
        }

        let dawg = Dawg::from_tail(&mut stream, format.node_size)?;

        Lexicon::assemble(
            faces,
            counts,
            values,
            specials,
            format.is_utf8,
            dawg,
            meta,
        )
    }
}

fn read_header(stream: &mut BitStream, meta: &mut LexiconMeta) -> Result<(), LexiconError> {
    let header_len = usize::from(stream.get_u16()?);
    if header_len < 4 {
        return Err(LexiconError::BadHeader {
            detail: "too short for a word count",
        });
    }
    meta.word_count = stream.get_u32()?;

    let rest = stream.get_byte_vec(header_len - 4)?;
    let mut pos = 0;
    meta.desc = take_nul_string(&rest, &mut pos);
    meta.md5_sum = take_nul_string(&rest, &mut pos);
    // a trailing u16 of header flags and anything after it is skippable
    Ok(())
}

/// Read a NUL-terminated string, if any bytes remain before the slice end.
fn take_nul_string(bytes: &[u8], pos: &mut usize) -> Option<String> {
    if *pos >= bytes.len() {
        return None;
    }
    let rest = &bytes[*pos..];
    let end = rest.iter().position(|&b| b == 0).unwrap_or(rest.len());
    *pos += end + 1;
    Some(String::from_utf8_lossy(&rest[..end]).into_owned())
}

fn read_special(stream: &mut BitStream) -> Result<SpecialFace, LexiconError> {
    let text_len = usize::from(stream.get_u8()?);
    let raw = stream.get_byte_vec(text_len)?;
    // synonym alternates ride behind delimiters; keep the primary text
    let primary = raw
        .split(|&b| b == SYNONYM_DELIM)
        .next()
        .unwrap_or(&raw[..]);
    let text = std::str::from_utf8(primary)
        .map_err(|_| LexiconError::BadFaceBytes)?
        .to_string();
    let small = read_bitmap(stream)?;
    let large = read_bitmap(stream)?;
    Ok(SpecialFace { text, small, large })
}

fn read_bitmap(stream: &mut BitStream) -> Result<Option<TileBitmap>, LexiconError> {
    let n_cols = stream.get_u8()?;
    if n_cols == 0 {
        return Ok(None);
    }
    let n_rows = stream.get_u8()?;
    let n_bytes = (usize::from(n_cols) * usize::from(n_rows) + 7) / 8;
    let bits = stream.get_byte_vec(n_bytes)?;
    Ok(Some(TileBitmap {
        n_cols,
        n_rows,
        bits,
    }))
}

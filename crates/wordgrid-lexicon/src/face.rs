//! Tile faces and the flat face-blob layout.

use std::fmt;

use crate::error::LexiconError;

/// Face bytes below this value are reserved: 0x00 is the blank, 0x01..0x1F
/// index the special side table.
pub const SPECIAL_LIMIT: u8 = 0x20;

/// Separator between alternate spellings of one face in a dictionary
/// file's UTF-8 blob. Safe to scan for bytewise since no UTF-8
/// continuation byte has the high bit clear.
pub const SYNONYM_DELIM: u8 = b' ';

/// One entry in a lexicon's tile alphabet.
///
/// The flat face blob cannot carry multi-glyph text inline (faces are
/// split back apart one character at a time), so anything longer than a
/// single character lives in the special side table and is represented
/// here by its reserved index byte.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Face {
    /// The wildcard tile; wire byte 0x00, display text is empty.
    Blank,
    /// A plain single-character face, first byte in the printable range.
    Text(String),
    /// A multi-glyph or bitmap-rendered face; the byte (1..0x20) is the
    /// 1-based slot in the lexicon's special side table.
    Special(u8),
}

impl Face {
    /// Whether this face resolves through the special side table.
    pub fn is_special(&self) -> bool {
        matches!(self, Face::Special(_))
    }

    /// The byte(s) this face contributes to a UTF-8 face blob.
    pub(crate) fn blob_bytes(&self) -> Vec<u8> {
        match self {
            Face::Blank => vec![0x00],
            Face::Text(text) => text.as_bytes().to_vec(),
            Face::Special(byte) => vec![*byte],
        }
    }

    /// The single byte this face occupies in a legacy (pre-UTF-8) blob.
    ///
    /// # Panics
    ///
    /// Panics if a text face does not fit in one Latin-1 byte; legacy
    /// dictionaries cannot represent it.
    pub(crate) fn legacy_byte(&self) -> u8 {
        match self {
            Face::Blank => 0x00,
            Face::Special(byte) => *byte,
            Face::Text(text) => {
                let ch = text.chars().next().unwrap_or('\0');
                let code = u32::from(ch);
                assert!(code < 0x100, "face {text:?} does not fit a legacy blob");
                code as u8
            }
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Face::Blank => write!(f, "<blank>"),
            Face::Text(text) => write!(f, "{text}"),
            Face::Special(byte) => write!(f, "<special {byte}>"),
        }
    }
}

/// A monochrome glyph for a special face, row-major, one bit per pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileBitmap {
    /// Width in pixels.
    pub n_cols: u8,
    /// Height in pixels.
    pub n_rows: u8,
    /// `ceil(n_cols * n_rows / 8)` packed bytes.
    pub bits: Vec<u8>,
}

/// Side-table entry for one special face.
///
/// Bitmaps come only from dictionary files; the wire stream carries the
/// text alone and loads leave both bitmap slots empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpecialFace {
    /// Display text, e.g. a digraph like "CH".
    pub text: String,
    /// Glyph for small tile rendering, if the file supplied one.
    pub small: Option<TileBitmap>,
    /// Glyph for large tile rendering, if the file supplied one.
    pub large: Option<TileBitmap>,
}

impl SpecialFace {
    /// A text-only special, as produced by wire-stream loads.
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            small: None,
            large: None,
        }
    }
}

/// Split a flat face blob back into one [`Face`] per alphabet entry.
///
/// In UTF-8 blobs each face is a single character, possibly followed by
/// space-delimited alternate spellings (which are dropped in favor of the
/// primary); reserved low bytes stand alone. Legacy blobs hold either one
/// Latin-1 byte per face or two bytes per face with a leading NUL, told
/// apart by the blob length.
pub fn split_faces(bytes: &[u8], n_faces: usize, is_utf8: bool) -> Result<Vec<Face>, LexiconError> {
    if is_utf8 {
        split_utf8(bytes, n_faces)
    } else {
        split_legacy(bytes, n_faces)
    }
}

fn split_utf8(bytes: &[u8], n_faces: usize) -> Result<Vec<Face>, LexiconError> {
    let mut faces = Vec::with_capacity(n_faces);
    let mut pos = 0;
    for _ in 0..n_faces {
        if pos >= bytes.len() {
            return Err(LexiconError::FaceBytesMismatch {
                n_faces,
                n_bytes: bytes.len(),
            });
        }
        let lead = bytes[pos];
        let face = if lead == 0x00 {
            pos += 1;
            Face::Blank
        } else if lead < SPECIAL_LIMIT {
            pos += 1;
            Face::Special(lead)
        } else {
            let text = take_char(bytes, &mut pos)?;
            // alternate spellings follow behind delimiters; keep the primary
            while pos < bytes.len() && bytes[pos] == SYNONYM_DELIM {
                pos += 1;
                let _ = take_char(bytes, &mut pos)?;
            }
            Face::Text(text)
        };
        faces.push(face);
    }
    if pos != bytes.len() {
        return Err(LexiconError::FaceBytesMismatch {
            n_faces,
            n_bytes: bytes.len(),
        });
    }
    Ok(faces)
}

fn split_legacy(bytes: &[u8], n_faces: usize) -> Result<Vec<Face>, LexiconError> {
    let face_byte = |byte: u8| match byte {
        0x00 => Face::Blank,
        byte if byte < SPECIAL_LIMIT => Face::Special(byte),
        byte => Face::Text(char::from(byte).to_string()),
    };
    if bytes.len() == n_faces {
        Ok(bytes.iter().map(|&b| face_byte(b)).collect())
    } else if bytes.len() == n_faces * 2 {
        // two bytes per face, the first always NUL
        bytes
            .chunks_exact(2)
            .map(|pair| {
                if pair[0] != 0 {
                    Err(LexiconError::FaceBytesMismatch {
                        n_faces,
                        n_bytes: bytes.len(),
                    })
                } else {
                    Ok(face_byte(pair[1]))
                }
            })
            .collect()
    } else {
        Err(LexiconError::FaceBytesMismatch {
            n_faces,
            n_bytes: bytes.len(),
        })
    }
}

/// Decode one UTF-8 character starting at `*pos`, advancing past it.
fn take_char(bytes: &[u8], pos: &mut usize) -> Result<String, LexiconError> {
    let lead = bytes[*pos];
    let len = match lead {
        0x20..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => return Err(LexiconError::BadFaceBytes),
    };
    let end = *pos + len;
    if end > bytes.len() {
        return Err(LexiconError::BadFaceBytes);
    }
    let text = std::str::from_utf8(&bytes[*pos..end])
        .map_err(|_| LexiconError::BadFaceBytes)?
        .to_string();
    *pos = end;
    Ok(text)
}

//! Error type for lexicon decoding.

use std::error::Error;
use std::fmt;

use wordgrid_stream::StreamError;

/// Errors from decoding a lexicon, either from its wire stream or from a
/// dictionary file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LexiconError {
    /// The underlying stream ran out of data or held invalid bytes.
    Stream(StreamError),
    /// The stream was written by a newer format than this build reads.
    UnsupportedVersion {
        /// The version tag found on the stream.
        version: u16,
    },
    /// A lexicon must have at least one face.
    NoFaces,
    /// The alphabet exceeds what the 6-bit face-count field can carry.
    TooManyFaces {
        /// Number of faces requested.
        n_faces: usize,
    },
    /// A count or value bit width outside the allowed 1..=5 range.
    BadBitWidth {
        /// Which width field was bad ("count" or "value").
        which: &'static str,
        /// The width found.
        bits: u32,
    },
    /// More than one face claimed to be the blank.
    DuplicateBlank,
    /// A special face carried an index byte out of step with its position
    /// in the side table.
    BadSpecialIndex {
        /// Face index in the alphabet.
        face: usize,
        /// The reserved byte found there.
        byte: u8,
    },
    /// A plain-text face that is not exactly one character; multi-glyph
    /// faces must go through the special side table.
    TextFaceNotSingleChar,
    /// A face byte sequence that is not valid UTF-8.
    BadFaceBytes,
    /// A face blob whose length does not match the declared face count.
    FaceBytesMismatch {
        /// Faces the header declared.
        n_faces: usize,
        /// Bytes actually present in the blob.
        n_bytes: usize,
    },
    /// A dictionary file header that cannot hold its mandatory fields.
    BadHeader {
        /// What was wrong with it.
        detail: &'static str,
    },
    /// A dictionary file with an unrecognized format flags word.
    BadFlags {
        /// The flags value found.
        flags: u16,
    },
    /// The trie tail failed a structural check.
    BadTrie {
        /// What was wrong with it.
        detail: &'static str,
    },
}

impl fmt::Display for LexiconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stream(err) => write!(f, "lexicon stream: {err}"),
            Self::UnsupportedVersion { version } => {
                write!(f, "unsupported stream version {version}")
            }
            Self::NoFaces => write!(f, "lexicon has no faces"),
            Self::TooManyFaces { n_faces } => {
                write!(f, "{n_faces} faces exceeds the 6-bit face-count field")
            }
            Self::BadBitWidth { which, bits } => {
                write!(f, "{which} width of {bits} bits outside 1..=5")
            }
            Self::DuplicateBlank => write!(f, "more than one blank face"),
            Self::BadSpecialIndex { face, byte } => {
                write!(f, "face {face} has out-of-order special byte {byte:#04x}")
            }
            Self::TextFaceNotSingleChar => {
                write!(f, "plain-text face is not a single character")
            }
            Self::BadFaceBytes => write!(f, "face bytes are not valid UTF-8"),
            Self::FaceBytesMismatch { n_faces, n_bytes } => {
                write!(f, "{n_bytes} face bytes cannot hold {n_faces} faces")
            }
            Self::BadHeader { detail } => write!(f, "bad file header: {detail}"),
            Self::BadFlags { flags } => {
                write!(f, "unrecognized dictionary flags {flags:#06x}")
            }
            Self::BadTrie { detail } => write!(f, "bad trie: {detail}"),
        }
    }
}

impl Error for LexiconError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Stream(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StreamError> for LexiconError {
    fn from(err: StreamError) -> Self {
        Self::Stream(err)
    }
}

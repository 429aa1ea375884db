//! Tile-alphabet codec and DAWG addressing for wordgrid dictionaries.
//!
//! A [`Lexicon`] is the immutable description of one dictionary's tile
//! set: the faces (including at most one blank and any multi-glyph
//! "special" faces resolved through a side table), per-tile counts and
//! point values, and the flattened word trie. It loads from two sources:
//!
//! - the compact wire layout embedded in game saves
//!   ([`Lexicon::load_from_stream`]), which carries the alphabet only;
//! - a full dictionary file ([`Lexicon::from_file_bytes`]), which adds
//!   header metadata, special-face bitmaps, and the trie.
//!
//! [`Lexicon::tiles_are_same`] decides whether two devices hold
//! interchangeable dictionaries without shipping the word list across.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod dawg;
pub mod error;
pub mod face;
pub mod lexicon;
mod loader;

pub use dawg::{Dawg, DawgEdge, NodeSize};
pub use error::LexiconError;
pub use face::{split_faces, Face, SpecialFace, TileBitmap, SPECIAL_LIMIT};
pub use lexicon::{Lexicon, LexiconMeta};

//! Wordgrid: the bit-exact persistence core of a crossword-style word
//! game.
//!
//! This facade re-exports the public API of the wordgrid sub-crates. For
//! most users, adding `wordgrid` as a single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use wordgrid::prelude::*;
//!
//! // A dictionary: A, a "CH" digraph, and the blank.
//! let lexicon = Lexicon::new(
//!     vec![Face::Text("A".into()), Face::Special(1), Face::Blank],
//!     vec![9, 1, 2],
//!     vec![1, 5, 0],
//!     vec![SpecialFace::text_only("CH")],
//!     true,
//! )
//! .unwrap();
//!
//! // A move log for a game played with it.
//! let mut log = MoveStack::new(TileBits::Five);
//! log.add_assign(Player(0), (0..3).map(Tile).collect());
//!
//! // Both nest into one save stream.
//! let mut save = BitStream::new();
//! save.set_version(CUR_STREAM_VERS);
//! save.put_u16(save.version());
//! lexicon.write_to_stream(&mut save);
//! log.write_to_stream(&mut save);
//!
//! // ...and come back out of the raw bytes.
//! let mut loaded = BitStream::from_vec(save.into_vec());
//! let version = loaded.get_u16().unwrap();
//! loaded.set_version(version);
//! let lexicon2 = Lexicon::load_from_stream(&mut loaded).unwrap();
//! let mut log2 = MoveStack::load_from_stream(&mut loaded, TileBits::Five).unwrap();
//!
//! assert!(lexicon.tiles_are_same(&lexicon2));
//! assert_eq!(log2.entry(0).unwrap(), log.entry(0).unwrap());
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `wordgrid-core` | Tile/player IDs, tray sets, limits, versions |
//! | [`stream`] | `wordgrid-stream` | The bit-granular stream buffer |
//! | [`lexicon`] | `wordgrid-lexicon` | Dictionary codec and DAWG addressing |
//! | [`movelog`] | `wordgrid-movelog` | Replayable move log with undo/redo |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Shared identifiers, limits, and format versions (`wordgrid-core`).
pub use wordgrid_core as types;

/// The bit-granular stream buffer (`wordgrid-stream`).
///
/// Everything the game persists goes through [`stream::BitStream`].
pub use wordgrid_stream as stream;

/// Dictionary codec and DAWG addressing (`wordgrid-lexicon`).
///
/// [`lexicon::Lexicon`] loads from game saves or full dictionary files
/// and answers tile-identity questions across devices.
pub use wordgrid_lexicon as lexicon;

/// Replayable move log with undo/redo (`wordgrid-movelog`).
pub use wordgrid_movelog as movelog;

/// Common imports for typical wordgrid usage.
///
/// ```rust
/// use wordgrid::prelude::*;
/// ```
pub mod prelude {
    pub use wordgrid_core::{
        Player, Tile, TrayTileSet, CUR_STREAM_VERS, MAX_NUM_PLAYERS, MAX_TRAY_TILES,
    };
    pub use wordgrid_lexicon::{Face, Lexicon, LexiconError, SpecialFace};
    pub use wordgrid_movelog::{MoveInfo, MoveStack, StackAction, StackEntry, TileBits};
    pub use wordgrid_stream::{bits_for_max, BitStream, Cursor, StreamError, StreamPos};
}

//! Core types and constants for the wordgrid persistence crates.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the shared vocabulary of the save/wire formats: tile and player
//! identifiers, the tray tile set, alphabet limits, and the stream
//! format version history.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod id;
pub mod tray;
pub mod version;

pub use id::{Player, Tile};
pub use tray::TrayTileSet;
pub use version::{CUR_STREAM_VERS, STREAM_VERS_ORIG, STREAM_VERS_UTF8};

/// Maximum number of tiles a player's tray can hold.
///
/// The wire format encodes tray tile counts in [`NTILES_NBITS`] bits,
/// so this cannot grow past 7 without a format version bump.
pub const MAX_TRAY_TILES: usize = 7;

/// Bit width of a tray tile count field (holds 0..=7).
pub const NTILES_NBITS: u32 = 3;

/// Maximum number of players in one game.
///
/// Player numbers travel in 2-bit wire fields.
pub const MAX_NUM_PLAYERS: usize = 4;

/// Maximum number of distinct tile faces a dictionary may define.
///
/// A 32-letter alphabet plus the blank plus headroom; face counts travel
/// in 6-bit wire fields.
pub const MAX_UNIQUE_TILES: usize = 64;

/// Mask selecting the face-index bits of a tile value on the wire.
pub const TILE_VALUE_MASK: u8 = 0x3F;

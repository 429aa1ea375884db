//! The tray tile set: an ordered collection of up to seven tiles.

use smallvec::SmallVec;
use std::fmt;

use crate::id::Tile;
use crate::MAX_TRAY_TILES;

/// The tiles on one player's tray, or a drawn/traded batch of tiles.
///
/// Order is significant on the wire (tiles are written in the order they
/// appear here), but two trays holding the same tiles in different orders
/// describe the same rack; use [`TrayTileSet::sorted`] before comparing
/// or hashing across devices.
///
/// # Examples
///
/// ```
/// use wordgrid_core::{Tile, TrayTileSet};
///
/// let mut tray = TrayTileSet::new();
/// tray.push(Tile(4));
/// tray.push(Tile(0));
/// assert_eq!(tray.len(), 2);
/// assert_eq!(tray.sorted().tiles()[0], Tile(0));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrayTileSet {
    tiles: SmallVec<[Tile; MAX_TRAY_TILES]>,
}

impl TrayTileSet {
    /// Create an empty tray.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tile to the tray.
    ///
    /// # Panics
    ///
    /// Panics if the tray already holds [`MAX_TRAY_TILES`] tiles.
    pub fn push(&mut self, tile: Tile) {
        assert!(self.tiles.len() < MAX_TRAY_TILES, "tray overflow");
        self.tiles.push(tile);
    }

    /// Number of tiles currently held.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// True if the tray holds no tiles.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// The tiles, in insertion (wire) order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// A copy of this tray with its tiles sorted ascending.
    pub fn sorted(&self) -> Self {
        let mut tiles = self.tiles.clone();
        tiles.sort_unstable();
        Self { tiles }
    }
}

impl FromIterator<Tile> for TrayTileSet {
    fn from_iter<I: IntoIterator<Item = Tile>>(iter: I) -> Self {
        let tiles: SmallVec<[Tile; MAX_TRAY_TILES]> = iter.into_iter().collect();
        assert!(tiles.len() <= MAX_TRAY_TILES, "tray overflow");
        Self { tiles }
    }
}

impl fmt::Display for TrayTileSet {
    /// Lists tile indices comma-separated, e.g. `[0,4,4]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (ii, tile) in self.tiles.iter().enumerate() {
            if ii > 0 {
                write!(f, ",")?;
            }
            write!(f, "{tile}")?;
        }
        write!(f, "]")
    }
}

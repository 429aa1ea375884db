//! Move records and their bit-level encoding.

use smallvec::SmallVec;
use wordgrid_core::{Player, Tile, TrayTileSet, MAX_TRAY_TILES, NTILES_NBITS, TILE_VALUE_MASK};
use wordgrid_stream::{BitStream, StreamError};

/// Tray-set tiles are always 6 bits on the wire, wide enough for any
/// alphabet, independent of the per-placement width.
const TRAY_TILE_BITS: u32 = 6;

/// Per-placement tile width, chosen from the dictionary's alphabet size:
/// five bits suffice for up to 32 faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileBits {
    /// 5-bit tiles, alphabets of at most 32 faces.
    Five,
    /// 6-bit tiles, up to the 64-face maximum.
    Six,
}

impl TileBits {
    /// Field width in bits.
    pub fn bits(self) -> u32 {
        match self {
            TileBits::Five => 5,
            TileBits::Six => 6,
        }
    }

    fn mask(self) -> u8 {
        ((1u16 << self.bits()) - 1) as u8
    }
}

/// One tile laid on the board within a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TilePlacement {
    /// Coordinate along the move's axis, 0..32.
    pub var_coord: u8,
    /// The tile placed.
    pub tile: Tile,
    /// Whether a blank was assigned this face.
    pub is_blank: bool,
}

/// The board geometry of one move: the fixed row or column, orientation,
/// and the tiles placed along it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveInfo {
    /// The coordinate shared by every placement (row if horizontal).
    pub common_coord: u8,
    /// Whether the move runs horizontally.
    pub is_horizontal: bool,
    /// Placements in board order.
    pub tiles: SmallVec<[TilePlacement; MAX_TRAY_TILES]>,
}

/// What a logged entry did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StackAction {
    /// A committed word, with the tiles drawn to refill the tray.
    Move {
        /// Board geometry of the play.
        info: MoveInfo,
        /// Replacement tiles drawn from the bag.
        new_tiles: TrayTileSet,
    },
    /// A played word that was challenged off; nothing was drawn.
    Phony {
        /// Board geometry of the rejected play.
        info: MoveInfo,
    },
    /// Tiles exchanged with the bag; the sets are the same size.
    Trade {
        /// Tiles returned to the bag.
        old_tiles: TrayTileSet,
        /// Tiles drawn in their place.
        new_tiles: TrayTileSet,
    },
    /// A player's initial tray.
    Assign {
        /// The dealt tiles.
        tiles: TrayTileSet,
    },
}

impl StackAction {
    fn tag(&self) -> u32 {
        match self {
            StackAction::Move { .. } => 0,
            StackAction::Phony { .. } => 1,
            StackAction::Trade { .. } => 2,
            StackAction::Assign { .. } => 3,
        }
    }
}

/// One decoded log entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StackEntry {
    /// Who acted.
    pub player: Player,
    /// Position of this entry in the log, stamped on read.
    pub move_num: u16,
    /// What happened.
    pub action: StackAction,
}

pub(crate) fn write_entry(
    stream: &mut BitStream,
    player: Player,
    action: &StackAction,
    tile_bits: TileBits,
) {
    assert!(player.0 < 4, "player {player} exceeds the 2-bit field");
    stream.put_bits(2, action.tag());
    stream.put_bits(2, u32::from(player.0));

    match action {
        StackAction::Move { info, new_tiles } => {
            write_move_info(stream, info, tile_bits);
            write_tray_set(stream, new_tiles);
        }
        StackAction::Phony { info } => {
            write_move_info(stream, info, tile_bits);
        }
        StackAction::Trade {
            old_tiles,
            new_tiles,
        } => {
            assert_eq!(
                old_tiles.len(),
                new_tiles.len(),
                "trade sets must be the same size"
            );
            write_tray_set(stream, old_tiles);
            write_tray_set(stream, new_tiles);
        }
        StackAction::Assign { tiles } => {
            write_tray_set(stream, tiles);
        }
    }
}

pub(crate) fn read_entry(
    stream: &mut BitStream,
    tile_bits: TileBits,
) -> Result<(Player, StackAction), StreamError> {
    let tag = stream.get_bits(2)?;
    let player = Player(stream.get_bits(2)? as u8);

    let action = match tag {
        0 => StackAction::Move {
            info: read_move_info(stream, tile_bits)?,
            new_tiles: read_tray_set(stream)?,
        },
        1 => StackAction::Phony {
            info: read_move_info(stream, tile_bits)?,
        },
        2 => StackAction::Trade {
            old_tiles: read_tray_set(stream)?,
            new_tiles: read_tray_set(stream)?,
        },
        _ => StackAction::Assign {
            tiles: read_tray_set(stream)?,
        },
    };
    Ok((player, action))
}

fn write_move_info(stream: &mut BitStream, info: &MoveInfo, tile_bits: TileBits) {
    assert!(info.tiles.len() <= MAX_TRAY_TILES, "too many placements");
    stream.put_bits(NTILES_NBITS, info.tiles.len() as u32);
    stream.put_bits(5, u32::from(info.common_coord));
    stream.put_bits(1, u32::from(info.is_horizontal));
    for placement in &info.tiles {
        debug_assert!(placement.tile.0 <= tile_bits.mask());
        stream.put_bits(5, u32::from(placement.var_coord));
        stream.put_bits(tile_bits.bits(), u32::from(placement.tile.0));
        stream.put_bits(1, u32::from(placement.is_blank));
    }
}

fn read_move_info(stream: &mut BitStream, tile_bits: TileBits) -> Result<MoveInfo, StreamError> {
    let n_tiles = stream.get_bits(NTILES_NBITS)?;
    let common_coord = stream.get_bits(5)? as u8;
    let is_horizontal = stream.get_bits(1)? != 0;
    let mut tiles = SmallVec::new();
    for _ in 0..n_tiles {
        let var_coord = stream.get_bits(5)? as u8;
        let tile = Tile(stream.get_bits(tile_bits.bits())? as u8);
        let is_blank = stream.get_bits(1)? != 0;
        tiles.push(TilePlacement {
            var_coord,
            tile,
            is_blank,
        });
    }
    Ok(MoveInfo {
        common_coord,
        is_horizontal,
        tiles,
    })
}

fn write_tray_set(stream: &mut BitStream, set: &TrayTileSet) {
    stream.put_bits(NTILES_NBITS, set.len() as u32);
    for &tile in set.tiles() {
        debug_assert!(tile.0 <= TILE_VALUE_MASK);
        stream.put_bits(TRAY_TILE_BITS, u32::from(tile.0));
    }
}

fn read_tray_set(stream: &mut BitStream) -> Result<TrayTileSet, StreamError> {
    let n_tiles = stream.get_bits(NTILES_NBITS)?;
    let mut set = TrayTileSet::new();
    for _ in 0..n_tiles {
        set.push(Tile(stream.get_bits(TRAY_TILE_BITS)? as u8));
    }
    Ok(set)
}

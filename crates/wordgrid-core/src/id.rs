//! Strongly-typed tile and player identifiers.

use std::fmt;

/// Index of one face in a dictionary's tile alphabet.
///
/// `Tile(n)` names the n-th entry of the face table, in the order the
/// dictionary defines them. The blank tile is an ordinary index; which
/// index it is depends on the dictionary (see the lexicon crate's
/// `blank_tile` accessor).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tile(pub u8);

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for Tile {
    fn from(v: u8) -> Self {
        Self(v)
    }
}

/// A player's seat number within one game.
///
/// Always less than [`MAX_NUM_PLAYERS`](crate::MAX_NUM_PLAYERS); the wire
/// format stores it in 2 bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Player(pub u8);

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for Player {
    fn from(v: u8) -> Self {
        Self(v)
    }
}

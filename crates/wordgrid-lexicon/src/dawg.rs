//! Flat DAWG edge array: addressing, edge field decoding, sanity checks.
//!
//! The lexicon owns the bytes; the word-search engine walks them. Node
//! index 0 is reserved to mean "no such edge", so real indices start at 1
//! and the conversion to a byte offset never yields 0 for a live edge.

use wordgrid_core::Tile;

use crate::error::LexiconError;
use wordgrid_stream::BitStream;

/// Bytes per trie edge, fixed when the dictionary is built.
///
/// Three-byte edges cap the node index at 2^21; four-byte edges trade
/// memory for headroom. The two layouts are wire-incompatible.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeSize {
    /// Compact 3-byte edges, 5-bit letters.
    Three,
    /// 4-byte edges, 6-bit letters.
    Four,
}

impl Default for NodeSize {
    fn default() -> Self {
        NodeSize::Three
    }
}

impl NodeSize {
    /// Width of one edge in bytes.
    pub fn bytes(self) -> usize {
        match self {
            NodeSize::Three => 3,
            NodeSize::Four => 4,
        }
    }

    /// Byte offset of edge `index` in the flat array.
    ///
    /// The 3-byte case is shift+add, kept from builds for CPUs without a
    /// fast multiply.
    pub fn byte_offset(self, index: u32) -> usize {
        let index = index as usize;
        match self {
            NodeSize::Three => (index << 1) + index,
            NodeSize::Four => index << 2,
        }
    }
}

/// One decoded trie edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DawgEdge {
    /// Tile index this edge consumes.
    pub tile: Tile,
    /// A word may end here.
    pub accepting: bool,
    /// Last edge in its sibling list.
    pub last: bool,
    /// Index of the first child edge; 0 if none.
    pub next: u32,
}

impl DawgEdge {
    /// Decode the fields of a raw edge.
    ///
    /// # Panics
    ///
    /// Panics if `raw` is not exactly `node_size` bytes.
    pub fn decode(raw: &[u8], node_size: NodeSize) -> DawgEdge {
        assert_eq!(raw.len(), node_size.bytes(), "edge slice width");
        let low = u32::from(raw[0]) << 8 | u32::from(raw[1]);
        match node_size {
            NodeSize::Three => DawgEdge {
                tile: Tile(raw[2] & 0x1F),
                accepting: raw[2] & 0x80 != 0,
                last: raw[2] & 0x40 != 0,
                next: low | u32::from(raw[2] & 0x20) << 11,
            },
            NodeSize::Four => DawgEdge {
                tile: Tile(raw[2] & 0x3F),
                accepting: raw[2] & 0x80 != 0,
                last: raw[2] & 0x40 != 0,
                next: low | u32::from(raw[3]) << 16,
            },
        }
    }
}

/// An immutable DAWG: the edge array plus the root edge's index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dawg {
    edges: Vec<u8>,
    node_size: NodeSize,
    /// Index of the root edge; `None` for a wordless dictionary.
    top: Option<u32>,
}

impl Dawg {
    /// An empty trie; every lookup misses.
    pub fn empty(node_size: NodeSize) -> Self {
        Self {
            edges: Vec::new(),
            node_size,
            top: None,
        }
    }

    /// Parse the trie tail of a dictionary binary: a big-endian `u32`
    /// root edge index followed by the flat edge array. No bytes at all,
    /// or a zero root, means a dictionary with no words.
    pub fn from_tail(tail: &mut BitStream, node_size: NodeSize) -> Result<Self, LexiconError> {
        if tail.remaining() == 0 {
            return Ok(Self::empty(node_size));
        }
        let top = tail.get_u32()?;
        let edges = tail.get_byte_vec(tail.remaining())?;
        if edges.len() % node_size.bytes() != 0 {
            return Err(LexiconError::BadTrie {
                detail: "edge array length not a multiple of the node size",
            });
        }
        let dawg = Self {
            edges,
            node_size,
            // index 0 is the reserved null node; a root of 0 reaches no words
            top: if top == 0 { None } else { Some(top) },
        };
        if top as usize >= dawg.num_edges() && top != 0 {
            return Err(LexiconError::BadTrie {
                detail: "root edge index out of range",
            });
        }
        Ok(dawg)
    }

    /// Bytes-per-edge for this trie.
    pub fn node_size(&self) -> NodeSize {
        self.node_size
    }

    /// Number of edges in the array.
    pub fn num_edges(&self) -> usize {
        self.edges.len() / self.node_size.bytes()
    }

    /// Whether the trie holds no words.
    pub fn is_empty(&self) -> bool {
        self.top.is_none()
    }

    /// The raw bytes of edge `index`; `None` for index 0 or out of range.
    pub fn edge_for_index(&self, index: u32) -> Option<&[u8]> {
        if index == 0 {
            return None;
        }
        let start = self.node_size.byte_offset(index);
        let end = start + self.node_size.bytes();
        self.edges.get(start..end)
    }

    /// The root edge of the whole trie.
    pub fn top_edge(&self) -> Option<&[u8]> {
        self.edge_for_index(self.top?)
    }

    /// Decode the edge at `index`.
    pub fn edge_at(&self, index: u32) -> Option<DawgEdge> {
        self.edge_for_index(index)
            .map(|raw| DawgEdge::decode(raw, self.node_size))
    }

    /// First child of `edge`, i.e. the start of the next sibling list.
    pub fn follow(&self, edge: &DawgEdge) -> Option<DawgEdge> {
        self.edge_at(edge.next)
    }

    /// Scan the sibling list starting at `index` for an edge consuming
    /// `tile`.
    pub fn edge_with_tile(&self, index: u32, tile: Tile) -> Option<DawgEdge> {
        let mut at = index;
        loop {
            let edge = self.edge_at(at)?;
            if edge.tile == tile {
                return Some(edge);
            }
            if edge.last {
                return None;
            }
            at += 1;
        }
    }

    /// Structural validation of every edge: tile indices within the
    /// alphabet, child indices within the array, sibling lists in strictly
    /// ascending tile order, and a terminated final list.
    pub fn check_sanity(&self, n_faces: u8) -> bool {
        let num_edges = self.num_edges() as u32;
        let mut prev_tile: Option<Tile> = None;
        for index in 1..num_edges {
            let edge = match self.edge_at(index) {
                Some(edge) => edge,
                None => return false,
            };
            if edge.tile.0 >= n_faces || edge.next >= num_edges {
                return false;
            }
            if let Some(prev) = prev_tile {
                if edge.tile.0 <= prev.0 {
                    return false;
                }
            }
            prev_tile = if edge.last { None } else { Some(edge.tile) };
        }
        // the array must not end mid-sibling-list
        prev_tile.is_none()
    }
}

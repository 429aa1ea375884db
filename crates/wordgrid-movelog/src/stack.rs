//! The move stack: a replayable log with undo and redo.

use wordgrid_core::{Player, TrayTileSet};
use wordgrid_stream::{BitStream, Cursor, StreamError, StreamPos};

use crate::entry::{read_entry, write_entry, MoveInfo, StackAction, StackEntry, TileBits};

/// An append-mostly log of every committed action in one game, backed by
/// a private bit stream.
///
/// Undo ([`pop`](Self::pop)) rewinds the logical end of the log without
/// erasing bytes, so [`redo`](Self::redo) can restore entries up to the
/// deepest point ever reached; the next push overwrites the redo region.
/// Random access replays from the start on a cache miss, an O(depth) cost
/// accepted because game logs stay short.
///
/// # Examples
///
/// ```
/// use wordgrid_core::{Player, Tile};
/// use wordgrid_movelog::{MoveStack, TileBits};
///
/// let mut stack = MoveStack::new(TileBits::Five);
/// stack.add_assign(Player(0), (0..7).map(Tile).collect());
/// assert_eq!(stack.len(), 1);
///
/// let popped = stack.pop().unwrap().unwrap();
/// assert_eq!(stack.len(), 0);
/// let redone = stack.redo().unwrap().unwrap();
/// assert_eq!(redone, popped);
/// ```
#[derive(Clone, Debug)]
pub struct MoveStack {
    data: BitStream,
    /// End of the logical log (start of the redo region, if any).
    top: StreamPos,
    /// Start position of entry `cache_next` in `data`.
    cached_pos: StreamPos,
    cache_next: u16,
    n_entries: u16,
    high_water_mark: u16,
    tile_bits: TileBits,
}

impl MoveStack {
    /// An empty log. `tile_bits` must match the dictionary the game is
    /// being played with.
    pub fn new(tile_bits: TileBits) -> Self {
        Self {
            data: BitStream::new(),
            top: StreamPos::START,
            cached_pos: StreamPos::START,
            cache_next: 0,
            n_entries: 0,
            high_water_mark: 0,
            tile_bits,
        }
    }

    /// Current logical depth.
    pub fn len(&self) -> u16 {
        self.n_entries
    }

    /// Whether the log holds no entries.
    pub fn is_empty(&self) -> bool {
        self.n_entries == 0
    }

    /// Deepest depth ever reached; entries between [`len`](Self::len) and
    /// this are redoable.
    pub fn high_water_mark(&self) -> u16 {
        self.high_water_mark
    }

    /// The per-placement tile width this log encodes with.
    pub fn tile_bits(&self) -> TileBits {
        self.tile_bits
    }

    // ── Pushing ─────────────────────────────────────────────────

    /// Log a committed word and the tiles drawn to replace it.
    pub fn add_move(&mut self, player: Player, info: MoveInfo, new_tiles: TrayTileSet) {
        self.push(player, StackAction::Move { info, new_tiles });
    }

    /// Log a play that was challenged off the board.
    pub fn add_phony(&mut self, player: Player, info: MoveInfo) {
        self.push(player, StackAction::Phony { info });
    }

    /// Log a tile exchange.
    ///
    /// # Panics
    ///
    /// Panics if the two sets differ in size.
    pub fn add_trade(&mut self, player: Player, old_tiles: TrayTileSet, new_tiles: TrayTileSet) {
        self.push(
            player,
            StackAction::Trade {
                old_tiles,
                new_tiles,
            },
        );
    }

    /// Log a player's initial tray.
    pub fn add_assign(&mut self, player: Player, tiles: TrayTileSet) {
        self.push(player, StackAction::Assign { tiles });
    }

    fn push(&mut self, player: Player, action: StackAction) {
        let old_pos = self.data.set_pos(Cursor::Write, self.top);
        write_entry(&mut self.data, player, &action, self.tile_bits);
        self.n_entries += 1;
        // any redo region is now overwritten
        self.high_water_mark = self.n_entries;
        self.top = self.data.set_pos(Cursor::Write, old_pos);
    }

    // ── Random access ───────────────────────────────────────────

    /// Decode entry `n`, or `Ok(None)` past the current depth.
    pub fn entry(&mut self, n: u16) -> Result<Option<StackEntry>, StreamError> {
        if n >= self.n_entries {
            return Ok(None);
        }
        if self.cache_next != n {
            self.seek_cache_to(n)?;
        }
        let old_pos = self.data.set_pos(Cursor::Read, self.cached_pos);
        let (player, action) = read_entry(&mut self.data, self.tile_bits)?;
        self.cached_pos = self.data.set_pos(Cursor::Read, old_pos);
        self.cache_next = n + 1;
        Ok(Some(StackEntry {
            player,
            move_num: n,
            action,
        }))
    }

    /// Replay from the start until the cache points at entry `n`.
    fn seek_cache_to(&mut self, n: u16) -> Result<(), StreamError> {
        self.data.set_pos(Cursor::Read, StreamPos::START);
        for _ in 0..n {
            read_entry(&mut self.data, self.tile_bits)?;
        }
        self.cache_next = n;
        self.cached_pos = self.data.pos(Cursor::Read);
        Ok(())
    }

    // ── Undo / redo ─────────────────────────────────────────────

    /// Remove and return the newest entry. Its bytes stay in the buffer
    /// for [`redo`](Self::redo).
    pub fn pop(&mut self) -> Result<Option<StackEntry>, StreamError> {
        if self.n_entries == 0 {
            return Ok(None);
        }
        let n = self.n_entries - 1;
        let entry = self.entry(n)?;
        if entry.is_some() {
            self.n_entries = n;
            self.seek_cache_to(n)?;
            self.top = self.cached_pos;
        }
        Ok(entry)
    }

    /// Restore the most recently popped entry, if one remains below the
    /// high water mark. Writes nothing; only the bookkeeping moves.
    pub fn redo(&mut self) -> Result<Option<StackEntry>, StreamError> {
        if self.n_entries + 1 > self.high_water_mark {
            return Ok(None);
        }
        self.n_entries += 1;
        let entry = self.entry(self.n_entries - 1)?;
        self.seek_cache_to(self.n_entries)?;
        self.top = self.cached_pos;
        Ok(entry)
    }

    // ── Hashing and serialization ───────────────────────────────

    /// Jenkins hash of the log's bytes up to the logical end, excluding
    /// any redo region; two devices with identical histories agree on it
    /// regardless of undo activity.
    pub fn hash(&self) -> u32 {
        self.data.hash_to(self.top)
    }

    /// Append the whole stack to a save stream as a length-prefixed blob.
    /// An empty stack is just a zero length.
    pub fn write_to_stream(&self, stream: &mut BitStream) {
        let bytes = self.data.as_bytes();
        stream.put_u16(bytes.len() as u16);
        if !bytes.is_empty() {
            stream.put_u16(self.high_water_mark);
            stream.put_u16(self.n_entries);
            stream.put_u32(self.top.0);
            stream.put_bytes(bytes);
        }
    }

    /// Read a stack written by [`write_to_stream`](Self::write_to_stream).
    pub fn load_from_stream(
        stream: &mut BitStream,
        tile_bits: TileBits,
    ) -> Result<Self, StreamError> {
        let n_bytes = usize::from(stream.get_u16()?);
        let mut stack = Self::new(tile_bits);
        if n_bytes > 0 {
            stack.high_water_mark = stream.get_u16()?;
            stack.n_entries = stream.get_u16()?;
            stack.top = StreamPos(stream.get_u32()?);
            stack.data.append_from(stream, n_bytes)?;
        }
        Ok(stack)
    }
}

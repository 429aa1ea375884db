//! The immutable lexicon value and its wire codec.

use wordgrid_core::version::{CUR_STREAM_VERS, STREAM_VERS_UTF8};
use wordgrid_core::Tile;
use wordgrid_stream::{bits_for_max, BitStream};

use crate::dawg::Dawg;
use crate::error::LexiconError;
use crate::face::{split_faces, Face, SpecialFace};

/// Widest count/value field the 3-bit width fields may declare.
const MAX_FIELD_BITS: u32 = 5;

/// A dictionary's tile alphabet: faces, per-tile counts and point values,
/// the special-face side table, and the word trie.
///
/// Immutable once constructed; share one instance across games behind an
/// `Arc` rather than re-parsing.
///
/// # Examples
///
/// ```
/// use wordgrid_lexicon::{Face, Lexicon};
/// use wordgrid_stream::BitStream;
///
/// let lexicon = Lexicon::new(
///     vec![Face::Text("A".into()), Face::Blank],
///     vec![9, 2],
///     vec![1, 0],
///     vec![],
///     true,
/// )
/// .unwrap();
///
/// let mut stream = BitStream::new();
/// stream.set_version(2);
/// lexicon.write_to_stream(&mut stream);
/// let loaded = Lexicon::load_from_stream(&mut stream).unwrap();
/// assert!(lexicon.tiles_are_same(&loaded));
/// ```
#[derive(Clone, Debug)]
pub struct Lexicon {
    faces: Vec<Face>,
    counts: Vec<u8>,
    values: Vec<u8>,
    specials: Vec<SpecialFace>,
    blank: Option<Tile>,
    is_utf8: bool,
    dawg: Dawg,
    meta: LexiconMeta,
}

/// File-header metadata; absent on wire-stream loads.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LexiconMeta {
    /// Language code from the file's `xloc` field.
    pub lang_code: u8,
    /// Words in the trie, per the file header.
    pub word_count: u32,
    /// Human-readable description.
    pub desc: Option<String>,
    /// Checksum recorded at build time.
    pub md5_sum: Option<String>,
}

impl Lexicon {
    /// Build a lexicon from its parts, validating the alphabet invariants:
    /// 1..=63 faces, matching count/value lengths, at most one blank,
    /// special bytes numbered 1.. in face order, and single-character
    /// plain-text faces.
    pub fn new(
        faces: Vec<Face>,
        counts: Vec<u8>,
        values: Vec<u8>,
        specials: Vec<SpecialFace>,
        is_utf8: bool,
    ) -> Result<Self, LexiconError> {
        Self::assemble(
            faces,
            counts,
            values,
            specials,
            is_utf8,
            Dawg::default(),
            LexiconMeta::default(),
        )
    }

    pub(crate) fn assemble(
        faces: Vec<Face>,
        counts: Vec<u8>,
        values: Vec<u8>,
        specials: Vec<SpecialFace>,
        is_utf8: bool,
        dawg: Dawg,
        meta: LexiconMeta,
    ) -> Result<Self, LexiconError> {
        if faces.is_empty() {
            return Err(LexiconError::NoFaces);
        }
        if faces.len() > 63 {
            return Err(LexiconError::TooManyFaces {
                n_faces: faces.len(),
            });
        }
        assert_eq!(faces.len(), counts.len(), "count per face");
        assert_eq!(faces.len(), values.len(), "value per face");

        let mut blank = None;
        let mut next_special = 1u8;
        for (index, face) in faces.iter().enumerate() {
            match face {
                Face::Blank => {
                    if blank.is_some() {
                        return Err(LexiconError::DuplicateBlank);
                    }
                    blank = Some(Tile(index as u8));
                }
                Face::Special(byte) => {
                    // side-table bytes are dense and in face order
                    if *byte != next_special || usize::from(*byte) > specials.len() {
                        return Err(LexiconError::BadSpecialIndex {
                            face: index,
                            byte: *byte,
                        });
                    }
                    next_special += 1;
                }
                Face::Text(text) => {
                    if text.chars().count() != 1 {
                        return Err(LexiconError::TextFaceNotSingleChar);
                    }
                }
            }
        }

        Ok(Self {
            faces,
            counts,
            values,
            specials,
            blank,
            is_utf8,
            dawg,
            meta,
        })
    }

    // ── Accessors ───────────────────────────────────────────────

    /// Alphabet size.
    pub fn n_faces(&self) -> u8 {
        self.faces.len() as u8
    }

    /// The face for `tile`.
    pub fn face(&self, tile: Tile) -> &Face {
        &self.faces[usize::from(tile.0)]
    }

    /// How many of `tile` the bag starts with.
    pub fn tile_count(&self, tile: Tile) -> u8 {
        self.counts[usize::from(tile.0)]
    }

    /// Point value of `tile`.
    pub fn tile_value(&self, tile: Tile) -> u8 {
        self.values[usize::from(tile.0)]
    }

    /// Display text for `tile`: empty for the blank, side-table text for
    /// specials.
    pub fn tile_string(&self, tile: Tile) -> &str {
        match self.face(tile) {
            Face::Blank => "",
            Face::Text(text) => text,
            Face::Special(byte) => &self.specials[usize::from(*byte) - 1].text,
        }
    }

    /// The side-table entry behind a special face, if `tile` is one.
    pub fn special(&self, tile: Tile) -> Option<&SpecialFace> {
        match self.face(tile) {
            Face::Special(byte) => self.specials.get(usize::from(*byte) - 1),
            _ => None,
        }
    }

    /// Whether the alphabet includes a blank.
    pub fn has_blank_tile(&self) -> bool {
        self.blank.is_some()
    }

    /// The blank tile's index, if the alphabet has one.
    pub fn blank_tile(&self) -> Option<Tile> {
        self.blank
    }

    /// Whether faces are UTF-8 (vs the legacy one-byte layout).
    pub fn is_utf8(&self) -> bool {
        self.is_utf8
    }

    /// Length in chars of the longest face text.
    pub fn max_tile_chars(&self) -> usize {
        (0..self.faces.len())
            .map(|ii| self.tile_string(Tile(ii as u8)).chars().count())
            .max()
            .unwrap_or(0)
    }

    /// The word trie.
    pub fn dawg(&self) -> &Dawg {
        &self.dawg
    }

    /// File-header metadata (defaults for wire-stream loads).
    pub fn meta(&self) -> &LexiconMeta {
        &self.meta
    }

    // ── Tile/string conversion ──────────────────────────────────

    /// Concatenate the face texts of `tiles`, separated by `delim` when
    /// one is given.
    pub fn tiles_to_string(&self, tiles: &[Tile], delim: Option<char>) -> String {
        let mut out = String::new();
        for (ii, &tile) in tiles.iter().enumerate() {
            if ii > 0 {
                if let Some(delim) = delim {
                    out.push(delim);
                }
            }
            out.push_str(self.tile_string(tile));
        }
        out
    }

    /// Parse `text` into tiles by greedy face matching with backtracking;
    /// digraph faces make the split ambiguous, so the first full cover in
    /// face-index order wins. Matching is case-sensitive. `None` if no
    /// tiling covers the whole string.
    pub fn tiles_for_string(&self, text: &str) -> Option<Vec<Tile>> {
        let mut tiles = Vec::new();
        if self.match_tiles(text, &mut tiles) {
            Some(tiles)
        } else {
            None
        }
    }

    fn match_tiles(&self, rest: &str, tiles: &mut Vec<Tile>) -> bool {
        if rest.is_empty() {
            return true;
        }
        for ii in 0..self.faces.len() {
            let tile = Tile(ii as u8);
            let face_text = self.tile_string(tile);
            if face_text.is_empty() {
                continue; // the blank matches nothing
            }
            if let Some(suffix) = rest.strip_prefix(face_text) {
                tiles.push(tile);
                if self.match_tiles(suffix, tiles) {
                    return true;
                }
                tiles.pop();
            }
        }
        false
    }

    // ── Equality for cross-device play ──────────────────────────

    /// Whether two lexicons describe the same playable tile set: equal
    /// alphabet sizes and, per face index, equal value, count, specialness
    /// and text. Special text is compared only up to the shorter string's
    /// length, matching peers that truncate side-table entries.
    pub fn tiles_are_same(&self, other: &Lexicon) -> bool {
        if self.faces.len() != other.faces.len() {
            return false;
        }
        (0..self.faces.len()).all(|ii| {
            let tile = Tile(ii as u8);
            if self.tile_value(tile) != other.tile_value(tile)
                || self.tile_count(tile) != other.tile_count(tile)
            {
                return false;
            }
            let mine = self.face(tile);
            let theirs = other.face(tile);
            if mine.is_special() != theirs.is_special() {
                return false;
            }
            let a = self.tile_string(tile);
            let b = other.tile_string(tile);
            if mine.is_special() {
                let len = a.len().min(b.len());
                a.as_bytes()[..len] == b.as_bytes()[..len]
            } else {
                a == b
            }
        })
    }

    // ── Wire codec ──────────────────────────────────────────────

    /// Serialize the alphabet in the compact wire layout. The stream's
    /// version tag (already set by the caller) picks the face-blob
    /// layout; the trie is never part of the wire format.
    ///
    /// # Panics
    ///
    /// Panics if any count or value needs more than 5 bits, or if every
    /// count (or every value) is zero.
    pub fn write_to_stream(&self, stream: &mut BitStream) {
        stream.put_bits(6, u32::from(self.n_faces()));

        let max_count = u32::from(self.counts.iter().copied().max().unwrap_or(0));
        let max_value = u32::from(self.values.iter().copied().max().unwrap_or(0));
        let count_bits = bits_for_max(max_count);
        let value_bits = bits_for_max(max_value);
        assert!(count_bits <= MAX_FIELD_BITS, "count {max_count} too large");
        assert!(value_bits <= MAX_FIELD_BITS, "value {max_value} too large");
        stream.put_bits(3, count_bits);
        stream.put_bits(3, value_bits);

        for ii in 0..self.faces.len() {
            stream.put_bits(count_bits, u32::from(self.counts[ii]));
            stream.put_bits(value_bits, u32::from(self.values[ii]));
        }

        if stream.version() >= STREAM_VERS_UTF8 {
            let blob: Vec<u8> = self.faces.iter().flat_map(|f| f.blob_bytes()).collect();
            stream.put_u8(blob.len() as u8);
            stream.put_bytes(&blob);
        } else {
            // legacy layout: exactly one byte per face, no length field
            let blob: Vec<u8> = self.faces.iter().map(|f| f.legacy_byte()).collect();
            stream.put_bytes(&blob);
        }

        for special in &self.specials {
            stream.put_string(&special.text);
        }
    }

    /// Decode a lexicon written by [`write_to_stream`](Self::write_to_stream).
    /// The stream's version tag decides whether the face blob carries its
    /// own length (UTF-8 era) or is one byte per face (legacy). The trie
    /// starts empty; it comes from the dictionary file, not the wire.
    pub fn load_from_stream(stream: &mut BitStream) -> Result<Self, LexiconError> {
        let version = stream.version();
        if version > CUR_STREAM_VERS {
            return Err(LexiconError::UnsupportedVersion { version });
        }

        let n_faces = stream.get_bits(6)? as usize;
        if n_faces == 0 {
            return Err(LexiconError::NoFaces);
        }

        let count_bits = stream.get_bits(3)?;
        let value_bits = stream.get_bits(3)?;
        if count_bits == 0 || count_bits > MAX_FIELD_BITS {
            return Err(LexiconError::BadBitWidth {
                which: "count",
                bits: count_bits,
            });
        }
        if value_bits == 0 || value_bits > MAX_FIELD_BITS {
            return Err(LexiconError::BadBitWidth {
                which: "value",
                bits: value_bits,
            });
        }

        let mut counts = Vec::with_capacity(n_faces);
        let mut values = Vec::with_capacity(n_faces);
        for _ in 0..n_faces {
            counts.push(stream.get_bits(count_bits)? as u8);
            values.push(stream.get_bits(value_bits)? as u8);
        }

        let is_utf8 = stream.version() >= STREAM_VERS_UTF8;
        let n_face_bytes = if is_utf8 {
            usize::from(stream.get_u8()?)
        } else {
            n_faces
        };
        let blob = stream.get_byte_vec(n_face_bytes)?;
        let faces = split_faces(&blob, n_faces, is_utf8)?;

        let mut specials = Vec::new();
        for face in &faces {
            if face.is_special() {
                specials.push(SpecialFace::text_only(stream.get_string()?));
            }
        }

        Self::assemble(
            faces,
            counts,
            values,
            specials,
            is_utf8,
            Dawg::default(),
            LexiconMeta::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordgrid_core::version::{CUR_STREAM_VERS, STREAM_VERS_ORIG};

    fn spanish_like() -> Lexicon {
        // A, CH (special), N, blank
        Lexicon::new(
            vec![
                Face::Text("A".into()),
                Face::Special(1),
                Face::Text("N".into()),
                Face::Blank,
            ],
            vec![9, 1, 5, 2],
            vec![1, 5, 1, 0],
            vec![SpecialFace::text_only("CH")],
            true,
        )
        .unwrap()
    }

    fn roundtrip(lexicon: &Lexicon, version: u16) -> Lexicon {
        let mut stream = BitStream::new();
        stream.set_version(version);
        lexicon.write_to_stream(&mut stream);
        Lexicon::load_from_stream(&mut stream).unwrap()
    }

    #[test]
    fn wire_roundtrip_preserves_tile_identity() {
        let lexicon = spanish_like();
        let loaded = roundtrip(&lexicon, CUR_STREAM_VERS);
        assert!(lexicon.tiles_are_same(&loaded));
        assert_eq!(loaded.blank_tile(), Some(Tile(3)));
        assert_eq!(loaded.tile_string(Tile(1)), "CH");
        assert_eq!(loaded.tile_value(Tile(1)), 5);
        assert_eq!(loaded.tile_count(Tile(0)), 9);
    }

    #[test]
    fn legacy_version_omits_blob_length() {
        let lexicon = Lexicon::new(
            vec![Face::Text("A".into()), Face::Blank],
            vec![9, 2],
            vec![1, 0],
            vec![],
            false,
        )
        .unwrap();

        let mut stream = BitStream::new();
        stream.set_version(STREAM_VERS_ORIG);
        lexicon.write_to_stream(&mut stream);
        // 6+3+3 bits header, 2*(4+1) bit pairs, rounded up, then 2 face
        // bytes and nothing else
        let loaded = Lexicon::load_from_stream(&mut stream).unwrap();
        assert!(!loaded.is_utf8());
        assert!(lexicon.tiles_are_same(&loaded));
    }

    #[test]
    fn minimal_widths_are_used() {
        let lexicon = Lexicon::new(
            vec![Face::Text("A".into()), Face::Text("B".into())],
            vec![12, 2],
            vec![1, 3],
            vec![],
            true,
        )
        .unwrap();
        let mut stream = BitStream::new();
        stream.set_version(CUR_STREAM_VERS);
        lexicon.write_to_stream(&mut stream);

        assert_eq!(stream.get_bits(6).unwrap(), 2);
        assert_eq!(stream.get_bits(3).unwrap(), 4); // bits_for_max(12)
        assert_eq!(stream.get_bits(3).unwrap(), 2); // bits_for_max(3)
        assert_eq!(stream.get_bits(4).unwrap(), 12);
        assert_eq!(stream.get_bits(2).unwrap(), 1);
    }

    #[test]
    fn duplicate_blank_is_rejected() {
        let result = Lexicon::new(
            vec![Face::Blank, Face::Blank],
            vec![1, 1],
            vec![0, 0],
            vec![],
            true,
        );
        assert_eq!(result.unwrap_err(), LexiconError::DuplicateBlank);
    }

    #[test]
    fn out_of_order_special_bytes_are_rejected() {
        let result = Lexicon::new(
            vec![Face::Special(2)],
            vec![1],
            vec![1],
            vec![SpecialFace::text_only("CH"), SpecialFace::text_only("LL")],
            true,
        );
        assert!(matches!(
            result,
            Err(LexiconError::BadSpecialIndex { face: 0, byte: 2 })
        ));
    }

    #[test]
    fn multi_char_plain_face_is_rejected() {
        let result = Lexicon::new(vec![Face::Text("CH".into())], vec![1], vec![1], vec![], true);
        assert_eq!(result.unwrap_err(), LexiconError::TextFaceNotSingleChar);
    }

    #[test]
    fn special_text_compares_by_shorter_prefix() {
        let a = spanish_like();
        let b = Lexicon::new(
            vec![
                Face::Text("A".into()),
                Face::Special(1),
                Face::Text("N".into()),
                Face::Blank,
            ],
            vec![9, 1, 5, 2],
            vec![1, 5, 1, 0],
            vec![SpecialFace::text_only("CHX")],
            true,
        )
        .unwrap();
        assert!(a.tiles_are_same(&b));

        let c = Lexicon::new(
            vec![
                Face::Text("A".into()),
                Face::Special(1),
                Face::Text("N".into()),
                Face::Blank,
            ],
            vec![9, 1, 5, 2],
            vec![1, 5, 1, 0],
            vec![SpecialFace::text_only("LL")],
            true,
        )
        .unwrap();
        assert!(!a.tiles_are_same(&c));
    }

    #[test]
    fn differing_counts_or_values_differ() {
        let a = spanish_like();
        let mut b = spanish_like();
        b.counts[0] = 8;
        assert!(!a.tiles_are_same(&b));

        let mut c = spanish_like();
        c.values[2] = 2;
        assert!(!a.tiles_are_same(&c));
    }

    #[test]
    fn tiles_for_string_handles_digraphs() {
        let lexicon = spanish_like();
        assert_eq!(
            lexicon.tiles_for_string("CHA"),
            Some(vec![Tile(1), Tile(0)])
        );
        assert_eq!(lexicon.tiles_for_string("AN"), Some(vec![Tile(0), Tile(2)]));
        assert_eq!(lexicon.tiles_for_string("AX"), None);
    }

    #[test]
    fn tiles_to_string_with_and_without_delim() {
        let lexicon = spanish_like();
        let tiles = [Tile(0), Tile(1), Tile(2)];
        assert_eq!(lexicon.tiles_to_string(&tiles, None), "ACHN");
        assert_eq!(lexicon.tiles_to_string(&tiles, Some('.')), "A.CH.N");
    }

    #[test]
    fn max_tile_chars_counts_special_text() {
        assert_eq!(spanish_like().max_tile_chars(), 2);
    }

    #[test]
    fn zero_face_stream_is_rejected() {
        let mut stream = BitStream::new();
        stream.set_version(CUR_STREAM_VERS);
        stream.put_bits(6, 0);
        stream.put_bits(3, 1);
        stream.put_bits(3, 1);
        assert_eq!(
            Lexicon::load_from_stream(&mut stream).unwrap_err(),
            LexiconError::NoFaces
        );
    }

    #[test]
    fn oversized_width_field_is_rejected() {
        let mut stream = BitStream::new();
        stream.set_version(CUR_STREAM_VERS);
        stream.put_bits(6, 1);
        stream.put_bits(3, 7);
        stream.put_bits(3, 1);
        assert!(matches!(
            Lexicon::load_from_stream(&mut stream),
            Err(LexiconError::BadBitWidth {
                which: "count",
                bits: 7
            })
        ));
    }

    #[test]
    fn future_stream_version_is_rejected() {
        let lexicon = spanish_like();
        let mut stream = BitStream::new();
        stream.set_version(CUR_STREAM_VERS + 1);
        lexicon.write_to_stream(&mut stream);
        assert_eq!(
            Lexicon::load_from_stream(&mut stream).unwrap_err(),
            LexiconError::UnsupportedVersion {
                version: CUR_STREAM_VERS + 1
            }
        );
    }

    #[test]
    fn truncated_stream_is_an_error_not_a_panic() {
        let lexicon = spanish_like();
        let mut stream = BitStream::new();
        stream.set_version(CUR_STREAM_VERS);
        lexicon.write_to_stream(&mut stream);
        let mut bytes = stream.into_vec();
        bytes.truncate(bytes.len() - 2);
        let mut short = BitStream::from_vec(bytes);
        short.set_version(CUR_STREAM_VERS);
        assert!(matches!(
            Lexicon::load_from_stream(&mut short),
            Err(LexiconError::Stream(_))
        ));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_lexicon() -> impl Strategy<Value = Lexicon> {
            // plain faces drawn without replacement from A..Z, optional
            // blank, optional digraph special
            (
                prop::sample::subsequence((b'A'..=b'Z').collect::<Vec<u8>>(), 1..=20),
                any::<bool>(),
                any::<bool>(),
            )
                .prop_flat_map(|(letters, with_blank, with_special)| {
                    let mut faces: Vec<Face> = letters
                        .into_iter()
                        .map(|b| Face::Text(char::from(b).to_string()))
                        .collect();
                    if with_special {
                        faces.push(Face::Special(1));
                    }
                    if with_blank {
                        faces.push(Face::Blank);
                    }
                    let n = faces.len();
                    (
                        Just(faces),
                        prop::collection::vec(0u8..=31, n),
                        prop::collection::vec(0u8..=31, n),
                    )
                })
                .prop_filter_map("all-zero counts or values", |(faces, counts, values)| {
                    if counts.iter().all(|&c| c == 0) || values.iter().all(|&v| v == 0) {
                        return None;
                    }
                    let specials = if faces.iter().any(Face::is_special) {
                        vec![SpecialFace::text_only("CH")]
                    } else {
                        vec![]
                    };
                    Lexicon::new(faces, counts, values, specials, true).ok()
                })
        }

        proptest! {
            #[test]
            fn roundtrip_is_tiles_are_same(lexicon in arb_lexicon()) {
                let loaded = roundtrip(&lexicon, CUR_STREAM_VERS);
                prop_assert!(lexicon.tiles_are_same(&loaded));
                prop_assert_eq!(lexicon.blank_tile(), loaded.blank_tile());
                prop_assert_eq!(lexicon.n_faces(), loaded.n_faces());
            }
        }
    }
}

//! Replayable move log for wordgrid games.
//!
//! Every committed action — a played word, a challenged-off phony, a
//! trade, an initial tray assignment — is appended to a [`MoveStack`],
//! which packs entries into a private bit stream. The stack supports
//! undo ([`MoveStack::pop`]) and redo ([`MoveStack::redo`]) without
//! rewriting bytes, random access by entry index, and nesting into a
//! game's save stream as an opaque length-prefixed blob.
//!
//! Per-placement tile width ([`TileBits`]) comes from the dictionary in
//! play: five bits for alphabets of up to 32 faces, six beyond that.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod entry;
pub mod stack;

pub use entry::{MoveInfo, StackAction, StackEntry, TileBits, TilePlacement};
pub use stack::MoveStack;

//! Save-stream format version history.
//!
//! Every top-level save blob begins with a version tag that the reader
//! stores on its stream (see the stream crate's `set_version`). Versioned
//! fields below the top level consult that tag to pick between historical
//! layouts, so old blobs stay readable and a too-new blob is rejected
//! before any field is trusted.

/// The original stream layout: dictionary face tables stored exactly one
/// byte per face, with no face-byte-count field.
pub const STREAM_VERS_ORIG: u16 = 1;

/// First version whose dictionary streams are UTF-8: the face blob may
/// hold multi-byte faces, so a byte-count field precedes it.
pub const STREAM_VERS_UTF8: u16 = 2;

/// The newest format this build writes.
///
/// Readers must refuse any stream tagged with a higher version; such a
/// blob was written by a newer build and no field after the tag can be
/// assumed to parse.
pub const CUR_STREAM_VERS: u16 = STREAM_VERS_UTF8;

//! Directory catalog
//!
//! Turns one level of a library directory into folder and audio entries:
//! - Classify entries as folders, audio files or JSON sidecars
//! - Pair each audio file with its transcript sidecar
//! - Order entries for display (folders first, then by name)

mod entry;
mod listing;
pub mod pairing;

pub use entry::{sort_for_display, CatalogEntry};
pub use listing::{count_files, list, DirectoryReport, FileReport};
pub use pairing::{pair_transcript, MatchStrategy, Pairing};

//! Sidecar transcript loading
//!
//! Sidecars come from different transcription tools and share no schema.
//! Any JSON value is accepted; its shape is classified once when read.

mod document;
mod reader;

pub use document::{Segment, TranscriptContent, TranscriptDocument, TranscriptShape};
pub use reader::read;

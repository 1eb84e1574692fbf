pub mod catalog;
pub mod config;
pub mod error;
pub mod http;
pub mod media;
pub mod sandbox;
pub mod session;
pub mod transcript;

pub use catalog::{sort_for_display, CatalogEntry, MatchStrategy, Pairing};
pub use config::{Account, Config, Overrides};
pub use error::ApiError;
pub use http::{create_router, AppState, SESSION_HEADER, SESSION_QUERY_PARAM};
pub use media::{ByteRange, MediaStream, RangeRequest};
pub use sandbox::PathSandbox;
pub use session::{Session, SessionConfig, SessionStore};
pub use transcript::{TranscriptContent, TranscriptDocument, TranscriptShape};

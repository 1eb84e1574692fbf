//! Audio file streaming with HTTP byte-range support

mod range;
mod stream;

pub use range::{parse_range, ByteRange, RangeRequest};
pub use stream::{content_type_for, stream, MediaStream};

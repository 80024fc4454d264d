//! The URI-form text codec (§4.3, §6.2).

pub mod decode;
pub mod encode;

pub use decode::from_text;
pub use encode::{to_text, to_text_default, ByteStrForm, FloatForm, SchemePolicy, TextEncodeOptions};

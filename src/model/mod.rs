pub mod attribute;
pub mod debug_info;
pub mod decode;
pub mod frames;
pub mod loader;
pub mod parse_result;

pub use attribute::{Attribute, AttributeValue};
pub use debug_info::{DebugSummary, Dimensions};
pub use frames::FramePreview;
pub use loader::{parse_file, ParserBackend, ParserReply};
pub use parse_result::ParseResult;

pub mod escape;
pub mod formatting;

pub use escape::escape_html;
pub use formatting::{format_tag, pixel_data_summary, primitive_to_string};

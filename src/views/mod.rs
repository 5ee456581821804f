pub mod attribute_table;
pub mod debug_panel;
pub mod document;
pub mod image_panel;

pub use attribute_table::{attribute_row, attribute_rows};
pub use debug_panel::debug_panel;
pub use document::{render_document, render_error, PreviewDocument};
pub use image_panel::preview_panel;

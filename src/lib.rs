//! Self-contained HTML preview reports for DICOM files.
//!
//! The pipeline runs in one synchronous pass per invocation: validate the
//! source path, call a [`ParserBackend`] through its narrow reply contract,
//! decode the structural payload, assemble the preview frames, and render
//! the document. The top-level entry points always produce a document;
//! failures become error documents instead of propagating.

pub mod error;
pub mod extractor;
pub mod model;
pub mod resources;
pub mod utils;
pub mod views;

use std::path::Path;

pub use error::{DecodeError, PreviewError};
pub use extractor::NativeParser;
pub use model::{
    Attribute, AttributeValue, DebugSummary, FramePreview, ParseResult, ParserBackend, ParserReply,
};
pub use resources::Resources;
pub use views::{render_document, render_error, PreviewDocument};

/// Renders a preview document for the file at `path` with the built-in
/// parser backend and the bundled assets.
pub fn generate_preview(path: &Path) -> PreviewDocument {
    generate_preview_with(&NativeParser, &Resources::bundled(), path)
}

/// Renders a preview document with an explicit backend and asset set. A
/// document comes back on every path; parse failures render as error
/// documents.
pub fn generate_preview_with(
    backend: &dyn ParserBackend,
    resources: &Resources,
    path: &Path,
) -> PreviewDocument {
    match model::parse_file(backend, path) {
        Ok(result) => render_document(&result, resources),
        Err(error) => {
            log::error!("{}: {error}", path.display());
            render_error(&error, resources)
        }
    }
}

//! Error types for the preview pipeline.

use thiserror::Error;

/// The failure kinds a preview run can end with. Every stage maps its
/// failures into exactly one of these before returning; none of them are
/// fatal to the host, which renders an error document instead.
#[derive(Debug, Error)]
pub enum PreviewError {
    /// The source path is missing, not a regular file, or unreadable.
    #[error("file error: {0}")]
    File(String),

    /// The upstream parser reported a failure, returned nothing, or returned
    /// zero attributes.
    #[error("DICOM parsing error: {0}")]
    Parsing(String),

    /// The parser payload did not match the expected wire shape.
    #[error("decoding error: {0}")]
    Decoding(#[from] DecodeError),

    /// An attribute value carried an unrecognized discriminator.
    #[error("malformed value tag: unrecognized attribute value type `{0}`")]
    MalformedValueTag(String),
}

/// Structural mismatches between the expected and the received payload.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The payload was not valid JSON at all.
    #[error("corrupted payload: {0}")]
    Corrupted(String),

    /// A required key is absent.
    #[error("missing key `{key}` in {context}")]
    MissingKey {
        key: &'static str,
        context: &'static str,
    },

    /// A field holds a value of the wrong type.
    #[error("type mismatch at `{path}`: expected {expected}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
    },

    /// A required field is present but null.
    #[error("value missing at `{path}`")]
    ValueMissing { path: String },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PreviewError>;

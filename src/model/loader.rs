use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use super::decode::decode_payload;
use super::{FramePreview, ParseResult};
use crate::error::{PreviewError, Result};

/// Narrow call contract to the upstream parser: a backend is handed a file
/// path and returns exactly one of a JSON payload or an error string.
///
/// Backends must be reentrant to allow concurrent invocations; a backend
/// wrapping a non-reentrant parser has to serialize calls internally.
pub trait ParserBackend {
    fn parse_file(&self, path: &Path) -> ParserReply;
}

/// Reply from a [`ParserBackend`] call. The reply owns its strings, so any
/// resources the backend allocated for the call are released with this value
/// on every exit path.
#[derive(Debug, Clone, Default)]
pub struct ParserReply {
    pub json: Option<String>,
    pub error: Option<String>,
}

impl ParserReply {
    pub fn success(json: String) -> Self {
        Self {
            json: Some(json),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            json: None,
            error: Some(error.into()),
        }
    }
}

/// Runs the full parse pipeline for one file: source validation, the backend
/// call, structural decode, and preview-frame assembly.
pub fn parse_file(backend: &dyn ParserBackend, path: &Path) -> Result<ParseResult> {
    log::info!("Loading DICOM file: {}", path.display());
    validate_source(path)?;

    let reply = backend.parse_file(path);
    if let Some(error) = reply.error {
        log::error!("{}: parser backend reported a failure", path.display());
        return Err(PreviewError::Parsing(error));
    }
    let json = reply
        .json
        .ok_or_else(|| PreviewError::Parsing("no data returned from parser".to_string()))?;

    let payload = decode_payload(&json)?;

    // A file that decodes to zero attributes is unusable as DICOM even
    // though the payload itself was well-formed.
    if payload.attributes.is_empty() {
        return Err(PreviewError::Parsing(
            "no DICOM attributes found in the file".to_string(),
        ));
    }

    let preview = decode_preview_frames(&payload.preview_images.unwrap_or_default());

    Ok(ParseResult {
        attributes: payload.attributes,
        preview,
        debug: payload.debug_info,
    })
}

fn validate_source(path: &Path) -> Result<()> {
    let metadata = fs::metadata(path).map_err(|err| {
        PreviewError::File(format!("{}: cannot access file ({err})", path.display()))
    })?;
    if !metadata.is_file() {
        return Err(PreviewError::File(format!(
            "{}: not a regular file",
            path.display()
        )));
    }
    fs::File::open(path).map_err(|err| {
        PreviewError::File(format!("{}: file is not readable ({err})", path.display()))
    })?;
    Ok(())
}

/// Entries that fail base64 decoding are dropped rather than failing the
/// parse; the preview then reflects only the frames that decoded.
fn decode_preview_frames(encoded: &[String]) -> FramePreview {
    let mut frames = Vec::with_capacity(encoded.len());
    for (index, text) in encoded.iter().enumerate() {
        match BASE64.decode(text.as_bytes()) {
            Ok(blob) => frames.push(blob),
            Err(err) => log::warn!("Dropping preview frame {index}: invalid base64 ({err})"),
        }
    }
    FramePreview::new(frames)
}

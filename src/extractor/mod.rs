//! Parser backend built directly on the `dicom` crate.

pub mod attributes;
pub mod debug;
pub mod preview;

use std::path::Path;

use dicom::object::open_file;
use serde::Serialize;

use crate::model::{Attribute, DebugSummary, ParserBackend, ParserReply};

/// Wire payload handed back through the backend contract.
#[derive(Serialize)]
struct ExtractOutput {
    attributes: Vec<Attribute>,
    preview_images: Option<Vec<String>>,
    debug_info: DebugSummary,
}

/// The built-in [`ParserBackend`]: opens the file with `dicom`, walks the
/// data set, and serializes the result. Pure function of the path, so it is
/// reentrant and concurrent invocations need no coordination.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeParser;

impl ParserBackend for NativeParser {
    fn parse_file(&self, path: &Path) -> ParserReply {
        extract(path)
    }
}

/// Parses one file into the reply contract: JSON on success, an error string
/// (enriched with the pre-parse structural analysis) on failure.
pub fn extract(path: &Path) -> ParserReply {
    let (mut debug_info, analysis) = debug::analyze_file_structure(path);

    let object = match open_file(path) {
        Ok(object) => object,
        Err(err) => {
            log::error!("{}: failed to open DICOM file ({err})", path.display());
            return ParserReply::failure(format!(
                "{}: failed to open DICOM file ({err})\n\nFile analysis:\n{analysis}",
                path.display()
            ));
        }
    };

    debug::update_from_object(&object, &mut debug_info);
    let attributes = attributes::collect_attributes(&object);
    let preview_images = preview::encode_preview_frames(&object, &mut debug_info);

    let output = ExtractOutput {
        attributes,
        preview_images,
        debug_info,
    };
    match serde_json::to_string(&output) {
        Ok(json) => ParserReply::success(json),
        Err(err) => ParserReply::failure(format!("failed to serialize parser output: {err}")),
    }
}

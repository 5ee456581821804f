//! Structural decode of the upstream parser payload.
//!
//! The payload is walked as a `serde_json::Value` tree with explicit
//! discriminator dispatch, so every failure names the offending field
//! instead of surfacing a raw serialization error, and attribute sequences
//! decode through a heap-allocated work stack rather than call-stack
//! recursion.

use serde_json::{Map, Value};

use super::{Attribute, AttributeValue, DebugSummary, Dimensions};
use crate::error::{DecodeError, PreviewError, Result};

/// The decoded wire payload, before the orchestrator applies its policies.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsePayload {
    pub attributes: Vec<Attribute>,
    pub preview_images: Option<Vec<String>>,
    pub debug_info: DebugSummary,
}

/// Decodes the full JSON payload returned by a parser backend.
pub fn decode_payload(json: &str) -> Result<ParsePayload> {
    let root: Value =
        serde_json::from_str(json).map_err(|err| DecodeError::Corrupted(err.to_string()))?;
    let root = as_object(&root, "payload")?;

    let attributes = decode_attributes(require(root, "attributes", "payload")?)?;
    let preview_images = decode_preview_images(root)?;
    let debug_info =
        decode_debug_info(as_object(require(root, "debug_info", "payload")?, "debug_info")?)?;

    Ok(ParsePayload {
        attributes,
        preview_images,
        debug_info,
    })
}

/// Header fields of an attribute whose sequence children are still being
/// decoded.
struct SeqHeader {
    depth: i32,
    tag: String,
    name: String,
    vr: String,
}

/// One in-progress nesting level of the work stack.
struct Level<'a> {
    raw: &'a [Value],
    next: usize,
    decoded: Vec<Attribute>,
    pending: Option<SeqHeader>,
}

/// Decodes the attribute array. Nesting depth is bounded only by memory:
/// sequence recursion is driven by an explicit stack of levels.
pub fn decode_attributes(value: &Value) -> Result<Vec<Attribute>> {
    if value.is_null() {
        return Err(value_missing("attributes"));
    }
    let items = value
        .as_array()
        .ok_or_else(|| type_mismatch("attributes", "array"))?;

    let mut stack = vec![Level {
        raw: items.as_slice(),
        next: 0,
        decoded: Vec::with_capacity(items.len()),
        pending: None,
    }];

    loop {
        let top = stack.len() - 1;
        if stack[top].next < stack[top].raw.len() {
            let raw = stack[top].raw;
            let index = stack[top].next;
            stack[top].next += 1;

            let attr = decode_attribute(&raw[index])?;
            match attr.value {
                RawValue::Leaf(text) => stack[top].decoded.push(Attribute {
                    depth: attr.depth,
                    tag: attr.tag,
                    name: attr.name,
                    vr: attr.vr,
                    value: AttributeValue::String(text),
                }),
                RawValue::Items(children) => stack.push(Level {
                    raw: children,
                    next: 0,
                    decoded: Vec::with_capacity(children.len()),
                    pending: Some(SeqHeader {
                        depth: attr.depth,
                        tag: attr.tag,
                        name: attr.name,
                        vr: attr.vr,
                    }),
                }),
            }
        } else {
            // This level is exhausted: fold it into its parent, or return it
            // when it is the root.
            let Some(finished) = stack.pop() else {
                return Ok(Vec::new());
            };
            let Some(header) = finished.pending else {
                return Ok(finished.decoded);
            };
            let Some(parent) = stack.last_mut() else {
                return Err(DecodeError::Corrupted("attribute nesting imbalance".to_string()).into());
            };
            parent.decoded.push(Attribute {
                depth: header.depth,
                tag: header.tag,
                name: header.name,
                vr: header.vr,
                value: AttributeValue::Sequence(finished.decoded),
            });
        }
    }
}

enum RawValue<'a> {
    Leaf(String),
    Items(&'a [Value]),
}

struct RawAttribute<'a> {
    depth: i32,
    tag: String,
    name: String,
    vr: String,
    value: RawValue<'a>,
}

fn decode_attribute(item: &Value) -> Result<RawAttribute<'_>> {
    let obj = as_object(item, "attributes[]")?;

    let depth = present(obj, "depth", "attribute")?
        .as_i64()
        .filter(|depth| *depth >= 0)
        .and_then(|depth| i32::try_from(depth).ok())
        .ok_or_else(|| type_mismatch("attribute.depth", "non-negative integer"))?;
    let tag = req_str(obj, "tag", "attribute")?;
    let name = req_str(obj, "name", "attribute")?;
    let vr = req_str(obj, "vr", "attribute")?;

    let value_obj = as_object(require(obj, "value", "attribute")?, "attribute.value")?;
    let discriminator = req_str(value_obj, "type", "attribute.value")?;
    let content = present(value_obj, "content", "attribute.value")?;

    let value = match discriminator.as_str() {
        "String" => RawValue::Leaf(
            content
                .as_str()
                .map(str::to_owned)
                .ok_or_else(|| type_mismatch("attribute.value.content", "string"))?,
        ),
        "Sequence" => RawValue::Items(
            content
                .as_array()
                .map(Vec::as_slice)
                .ok_or_else(|| type_mismatch("attribute.value.content", "array"))?,
        ),
        other => return Err(PreviewError::MalformedValueTag(other.to_string())),
    };

    Ok(RawAttribute {
        depth,
        tag,
        name,
        vr,
        value,
    })
}

fn decode_preview_images(root: &Map<String, Value>) -> Result<Option<Vec<String>>> {
    match root.get("preview_images") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                item.as_str()
                    .map(str::to_owned)
                    .ok_or_else(|| type_mismatch(format!("preview_images[{index}]"), "string"))
            })
            .collect::<Result<Vec<_>>>()
            .map(Some),
        Some(_) => Err(type_mismatch("preview_images", "array")),
    }
}

fn decode_debug_info(obj: &Map<String, Value>) -> Result<DebugSummary> {
    Ok(DebugSummary {
        file_size: req_u64(obj, "file_size", "debug_info")?,
        file_preamble: req_str(obj, "file_preamble", "debug_info")?,
        dicom_magic: req_str(obj, "dicom_magic", "debug_info")?,
        transfer_syntax: opt_str(obj, "transfer_syntax", "debug_info")?,
        attribute_count: req_usize(obj, "attribute_count", "debug_info")?,
        sequence_count: req_usize(obj, "sequence_count", "debug_info")?,
        meta_info_present: req_bool(obj, "meta_info_present", "debug_info")?,
        has_pixel_data: req_bool(obj, "has_pixel_data", "debug_info")?,
        pixel_data_vr: opt_str(obj, "pixel_data_vr", "debug_info")?,
        image_dimensions: opt_dimensions(obj)?,
        number_of_frames: opt_i32(obj, "number_of_frames", "debug_info")?,
        bits_allocated: opt_i32(obj, "bits_allocated", "debug_info")?,
        samples_per_pixel: opt_i32(obj, "samples_per_pixel", "debug_info")?,
        photometric_interpretation: opt_str(obj, "photometric_interpretation", "debug_info")?,
        pixel_representation: opt_i32(obj, "pixel_representation", "debug_info")?,
        parse_error: opt_str(obj, "parse_error", "debug_info")?,
        pixel_decode_error: opt_str(obj, "pixel_decode_error", "debug_info")?,
        pixel_convert_error: opt_str(obj, "pixel_convert_error", "debug_info")?,
        pixel_encode_error: opt_str(obj, "pixel_encode_error", "debug_info")?,
    })
}

fn opt_dimensions(obj: &Map<String, Value>) -> Result<Option<Dimensions>> {
    let Some(value) = obj.get("image_dimensions") else {
        return Ok(None);
    };
    if value.is_null() {
        return Ok(None);
    }
    let dims = as_object(value, "debug_info.image_dimensions")?;
    Ok(Some(Dimensions {
        rows: req_i32(dims, "rows", "debug_info.image_dimensions")?,
        columns: req_i32(dims, "columns", "debug_info.image_dimensions")?,
    }))
}

fn type_mismatch(path: impl Into<String>, expected: &'static str) -> PreviewError {
    PreviewError::Decoding(DecodeError::TypeMismatch {
        path: path.into(),
        expected,
    })
}

fn value_missing(path: impl Into<String>) -> PreviewError {
    PreviewError::Decoding(DecodeError::ValueMissing { path: path.into() })
}

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| type_mismatch(path, "object"))
}

fn require<'a>(
    obj: &'a Map<String, Value>,
    key: &'static str,
    context: &'static str,
) -> Result<&'a Value> {
    obj.get(key)
        .ok_or_else(|| PreviewError::Decoding(DecodeError::MissingKey { key, context }))
}

/// Like [`require`], but a JSON null is also rejected.
fn present<'a>(
    obj: &'a Map<String, Value>,
    key: &'static str,
    context: &'static str,
) -> Result<&'a Value> {
    let value = require(obj, key, context)?;
    if value.is_null() {
        return Err(value_missing(format!("{context}.{key}")));
    }
    Ok(value)
}

fn req_str(obj: &Map<String, Value>, key: &'static str, context: &'static str) -> Result<String> {
    present(obj, key, context)?
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| type_mismatch(format!("{context}.{key}"), "string"))
}

fn req_u64(obj: &Map<String, Value>, key: &'static str, context: &'static str) -> Result<u64> {
    present(obj, key, context)?
        .as_u64()
        .ok_or_else(|| type_mismatch(format!("{context}.{key}"), "unsigned integer"))
}

fn req_usize(obj: &Map<String, Value>, key: &'static str, context: &'static str) -> Result<usize> {
    let value = req_u64(obj, key, context)?;
    usize::try_from(value)
        .map_err(|_| type_mismatch(format!("{context}.{key}"), "unsigned integer"))
}

fn req_bool(obj: &Map<String, Value>, key: &'static str, context: &'static str) -> Result<bool> {
    present(obj, key, context)?
        .as_bool()
        .ok_or_else(|| type_mismatch(format!("{context}.{key}"), "boolean"))
}

fn req_i32(obj: &Map<String, Value>, key: &'static str, context: &'static str) -> Result<i32> {
    present(obj, key, context)?
        .as_i64()
        .and_then(|value| i32::try_from(value).ok())
        .ok_or_else(|| type_mismatch(format!("{context}.{key}"), "32-bit integer"))
}

fn opt_str(
    obj: &Map<String, Value>,
    key: &'static str,
    context: &'static str,
) -> Result<Option<String>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_str()
            .map(|text| Some(text.to_owned()))
            .ok_or_else(|| type_mismatch(format!("{context}.{key}"), "string")),
    }
}

fn opt_i32(
    obj: &Map<String, Value>,
    key: &'static str,
    context: &'static str,
) -> Result<Option<i32>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_i64()
            .and_then(|number| i32::try_from(number).ok())
            .map(Some)
            .ok_or_else(|| type_mismatch(format!("{context}.{key}"), "32-bit integer")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_debug_info() -> Value {
        json!({
            "file_size": 1024,
            "file_preamble": "[00, 00]",
            "dicom_magic": "DICM",
            "transfer_syntax": null,
            "attribute_count": 1,
            "sequence_count": 0,
            "meta_info_present": true,
            "has_pixel_data": false,
            "pixel_data_vr": null,
            "image_dimensions": null,
            "number_of_frames": null,
            "bits_allocated": null,
            "samples_per_pixel": null,
            "photometric_interpretation": null,
            "pixel_representation": null,
            "parse_error": null,
            "pixel_decode_error": null,
            "pixel_convert_error": null,
            "pixel_encode_error": null
        })
    }

    fn leaf(tag: &str, name: &str, vr: &str, content: &str) -> Value {
        json!({
            "depth": 0,
            "tag": tag,
            "name": name,
            "vr": vr,
            "value": {"type": "String", "content": content}
        })
    }

    #[test]
    fn decodes_a_minimal_payload() {
        let payload = json!({
            "attributes": [leaf("(0010,0010)", "PatientName", "PN", "Doe^John")],
            "preview_images": null,
            "debug_info": minimal_debug_info()
        });

        let decoded = decode_payload(&payload.to_string()).unwrap();
        assert_eq!(decoded.attributes.len(), 1);
        assert_eq!(decoded.attributes[0].tag, "(0010,0010)");
        assert_eq!(
            decoded.attributes[0].value,
            AttributeValue::String("Doe^John".to_string())
        );
        assert_eq!(decoded.preview_images, None);
        assert_eq!(decoded.debug_info.file_size, 1024);
        assert!(!decoded.debug_info.has_pixel_data);
    }

    #[test]
    fn decode_encode_decode_is_idempotent() {
        let nested = json!([{
            "depth": 0,
            "tag": "(0008,1115)",
            "name": "ReferencedSeriesSequence",
            "vr": "SQ",
            "value": {"type": "Sequence", "content": [
                leaf("(0008,0060)", "Modality", "CS", "MR"),
                {
                    "depth": 1,
                    "tag": "(0008,1140)",
                    "name": "ReferencedImageSequence",
                    "vr": "SQ",
                    "value": {"type": "Sequence", "content": []}
                }
            ]}
        }]);

        let first = decode_attributes(&nested).unwrap();
        let encoded = serde_json::to_value(&first).unwrap();
        assert_eq!(encoded, nested);
        let second = decode_attributes(&encoded).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unknown_discriminator_is_a_malformed_value_tag() {
        let attrs = json!([{
            "depth": 0,
            "tag": "(0010,0010)",
            "name": "PatientName",
            "vr": "PN",
            "value": {"type": "Bogus", "content": "x"}
        }]);

        match decode_attributes(&attrs) {
            Err(PreviewError::MalformedValueTag(tag)) => assert_eq!(tag, "Bogus"),
            other => panic!("expected MalformedValueTag, got {other:?}"),
        }
    }

    #[test]
    fn missing_attribute_key_names_the_key() {
        let attrs = json!([{
            "depth": 0,
            "tag": "(0010,0010)",
            "name": "PatientName",
            "value": {"type": "String", "content": "x"}
        }]);

        match decode_attributes(&attrs) {
            Err(PreviewError::Decoding(DecodeError::MissingKey { key, .. })) => {
                assert_eq!(key, "vr");
            }
            other => panic!("expected MissingKey, got {other:?}"),
        }
    }

    #[test]
    fn non_integer_depth_is_a_type_mismatch() {
        let attrs = json!([{
            "depth": "zero",
            "tag": "(0010,0010)",
            "name": "PatientName",
            "vr": "PN",
            "value": {"type": "String", "content": "x"}
        }]);

        match decode_attributes(&attrs) {
            Err(PreviewError::Decoding(DecodeError::TypeMismatch { path, .. })) => {
                assert!(path.contains("depth"), "unexpected path {path}");
            }
            other => panic!("expected TypeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn negative_depth_is_rejected() {
        let attrs = json!([{
            "depth": -1,
            "tag": "(0010,0010)",
            "name": "PatientName",
            "vr": "PN",
            "value": {"type": "String", "content": "x"}
        }]);

        assert!(matches!(
            decode_attributes(&attrs),
            Err(PreviewError::Decoding(DecodeError::TypeMismatch { .. }))
        ));
    }

    #[test]
    fn null_leaf_content_is_a_missing_value() {
        let attrs = json!([{
            "depth": 0,
            "tag": "(0010,0010)",
            "name": "PatientName",
            "vr": "PN",
            "value": {"type": "String", "content": null}
        }]);

        assert!(matches!(
            decode_attributes(&attrs),
            Err(PreviewError::Decoding(DecodeError::ValueMissing { .. }))
        ));
    }

    #[test]
    fn corrupt_json_is_reported_as_corrupted() {
        assert!(matches!(
            decode_payload("{ not json"),
            Err(PreviewError::Decoding(DecodeError::Corrupted(_)))
        ));
    }

    #[test]
    fn non_string_preview_entry_is_a_type_mismatch() {
        let payload = json!({
            "attributes": [leaf("(0010,0010)", "PatientName", "PN", "Doe^John")],
            "preview_images": ["aGVsbG8=", 7],
            "debug_info": minimal_debug_info()
        });

        assert!(matches!(
            decode_payload(&payload.to_string()),
            Err(PreviewError::Decoding(DecodeError::TypeMismatch { .. }))
        ));
    }

    #[test]
    fn deeply_nested_sequences_decode_without_recursion() {
        const DEPTH: usize = 2000;

        let mut value = json!({"type": "String", "content": "leaf"});
        for level in (0..DEPTH).rev() {
            value = json!({
                "type": "Sequence",
                "content": [{
                    "depth": level,
                    "tag": "(0008,1115)",
                    "name": "ReferencedSeriesSequence",
                    "vr": "SQ",
                    "value": value
                }]
            });
        }
        let attrs = json!([{
            "depth": 0,
            "tag": "(0008,1115)",
            "name": "ReferencedSeriesSequence",
            "vr": "SQ",
            "value": value
        }]);

        let decoded = decode_attributes(&attrs).unwrap();
        assert_eq!(decoded.len(), 1);

        let mut levels = 0;
        let mut cursor = decoded.as_slice();
        while let Some(first) = cursor.first() {
            levels += 1;
            cursor = match &first.value {
                AttributeValue::Sequence(items) => items.as_slice(),
                AttributeValue::String(_) => &[],
            };
        }
        assert_eq!(levels, DEPTH + 1);
    }
}

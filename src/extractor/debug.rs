use std::fmt::Write as _;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use dicom::core::header::Header;
use dicom::core::{Tag, VR};
use dicom::object::DefaultDicomObject;

use crate::model::{DebugSummary, Dimensions};

const PIXEL_DATA: Tag = Tag(0x7FE0, 0x0010);
const SAMPLES_PER_PIXEL: Tag = Tag(0x0028, 0x0002);
const PHOTOMETRIC_INTERPRETATION: Tag = Tag(0x0028, 0x0004);
const NUMBER_OF_FRAMES: Tag = Tag(0x0028, 0x0008);
const ROWS: Tag = Tag(0x0028, 0x0010);
const COLUMNS: Tag = Tag(0x0028, 0x0011);
const BITS_ALLOCATED: Tag = Tag(0x0028, 0x0100);
const PIXEL_REPRESENTATION: Tag = Tag(0x0028, 0x0103);

const PREAMBLE_LEN: usize = 128;
const MAGIC_END: usize = 132;
const HEADER_PROBE_LEN: usize = 256;

/// Structural pass over the raw bytes, independent of DICOM parsing, so a
/// failed parse still reports what the file looked like. Returns the seeded
/// debug summary and a human-readable analysis transcript.
pub fn analyze_file_structure(path: &Path) -> (DebugSummary, String) {
    let mut debug = DebugSummary::default();
    let mut analysis = String::new();

    if let Ok(metadata) = std::fs::metadata(path) {
        debug.file_size = metadata.len();
        let _ = writeln!(analysis, "File size: {} bytes", metadata.len());
    }

    let mut header = [0u8; HEADER_PROBE_LEN];
    let filled = read_probe(path, &mut header);
    if filled >= MAGIC_END {
        debug.file_preamble = format!("{:02X?}", &header[..PREAMBLE_LEN]);
        debug.dicom_magic = String::from_utf8_lossy(&header[PREAMBLE_LEN..MAGIC_END]).into_owned();
        let _ = writeln!(
            analysis,
            "First {PREAMBLE_LEN} bytes (preamble): {}",
            debug.file_preamble
        );
        let _ = writeln!(analysis, "Marker at offset {PREAMBLE_LEN}: {}", debug.dicom_magic);

        if let Some(uid) = sniff_transfer_syntax(&header[..filled]) {
            let _ = writeln!(analysis, "Possible transfer syntax UID: {uid}");
            debug.transfer_syntax = Some(uid);
        }
    } else {
        let _ = writeln!(analysis, "File too short for a DICOM preamble ({filled} bytes read)");
    }

    (debug, analysis)
}

fn read_probe(path: &Path, buffer: &mut [u8]) -> usize {
    let Ok(mut file) = File::open(path) else {
        return 0;
    };
    let mut filled = 0;
    while filled < buffer.len() {
        match file.read(&mut buffer[filled..]) {
            Ok(0) | Err(_) => break,
            Ok(read) => filled += read,
        }
    }
    filled
}

/// Heuristic used only when the file cannot be opened as DICOM: the first
/// UID-looking run after the magic bytes.
fn sniff_transfer_syntax(header: &[u8]) -> Option<String> {
    let tail = header.get(MAGIC_END..)?;
    let pos = tail.windows(2).position(|window| window == b"1.")?;
    let uid: String = tail[pos..]
        .iter()
        .take(64)
        .map(|byte| *byte as char)
        .take_while(|ch| ch.is_ascii_digit() || *ch == '.')
        .collect();
    if uid.len() > 2 {
        Some(uid)
    } else {
        None
    }
}

/// Fills the object-derived half of the summary once parsing succeeded.
pub fn update_from_object(object: &DefaultDicomObject, debug: &mut DebugSummary) {
    debug.meta_info_present = true;
    let syntax = object
        .meta()
        .transfer_syntax
        .trim_end_matches(['\0', ' '])
        .to_string();
    if !syntax.is_empty() {
        debug.transfer_syntax = Some(syntax);
    }

    debug.attribute_count = object.iter().count();
    debug.sequence_count = object
        .iter()
        .filter(|element| element.vr() == VR::SQ)
        .count();

    if let Ok(element) = object.element(PIXEL_DATA) {
        debug.has_pixel_data = true;
        debug.pixel_data_vr = Some(element.vr().to_string().to_owned());
    }

    debug.image_dimensions = match (int_attribute(object, ROWS), int_attribute(object, COLUMNS)) {
        (Some(rows), Some(columns)) => Some(Dimensions { rows, columns }),
        _ => None,
    };
    debug.number_of_frames = int_attribute(object, NUMBER_OF_FRAMES);
    debug.bits_allocated = int_attribute(object, BITS_ALLOCATED);
    debug.samples_per_pixel = int_attribute(object, SAMPLES_PER_PIXEL);
    debug.pixel_representation = int_attribute(object, PIXEL_REPRESENTATION);
    debug.photometric_interpretation = str_attribute(object, PHOTOMETRIC_INTERPRETATION);
}

fn int_attribute(object: &DefaultDicomObject, tag: Tag) -> Option<i32> {
    object
        .element(tag)
        .ok()
        .and_then(|element| element.to_int().ok())
}

fn str_attribute(object: &DefaultDicomObject, tag: Tag) -> Option<String> {
    object
        .element(tag)
        .ok()
        .and_then(|element| element.to_str().ok())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn reads_preamble_and_magic_from_raw_bytes() {
        let mut file = NamedTempFile::new().unwrap();
        let mut bytes = vec![0u8; PREAMBLE_LEN];
        bytes.extend_from_slice(b"DICM");
        bytes.extend_from_slice(b"\x02\x00\x10\x001.2.840.10008.1.2.1\x00");
        bytes.resize(300, 0);
        file.write_all(&bytes).unwrap();

        let (debug, analysis) = analyze_file_structure(file.path());
        assert_eq!(debug.file_size, 300);
        assert_eq!(debug.dicom_magic, "DICM");
        assert_eq!(
            debug.transfer_syntax.as_deref(),
            Some("1.2.840.10008.1.2.1")
        );
        assert!(analysis.contains("File size: 300 bytes"));
    }

    #[test]
    fn short_files_yield_an_empty_summary() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"tiny").unwrap();

        let (debug, analysis) = analyze_file_structure(file.path());
        assert_eq!(debug.file_size, 4);
        assert!(debug.dicom_magic.is_empty());
        assert_eq!(debug.transfer_syntax, None);
        assert!(analysis.contains("too short"));
    }
}

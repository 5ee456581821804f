use std::fmt::Write as _;

use crate::model::DebugSummary;
use crate::utils::escape_html;

/// Renders the collapsed diagnostic panel: file info, structure counts, and
/// pixel-data info, plus an error section only when an upstream stage
/// recorded a failure.
pub fn debug_panel(debug: &DebugSummary) -> String {
    format!(
        "<div class=\"debug-container\">\n\
         <button class=\"debug-toggle\" onclick=\"toggleDebug(this)\">▶ Show Debug Information</button>\n\
         <div class=\"debug-content\" style=\"display: none;\">\n\
         <table class=\"debug-table\">\n{file}{structure}{pixel}</table>\n\
         {errors}</div>\n</div>\n",
        file = file_info_rows(debug),
        structure = structure_rows(debug),
        pixel = pixel_data_rows(debug),
        errors = error_section(debug),
    )
}

fn file_info_rows(debug: &DebugSummary) -> String {
    let mut rows = section_header("File Information");
    rows.push_str(&two_col("File Size", &format!("{} bytes", debug.file_size)));
    rows.push_str(&two_col("DICOM Magic", &escape_html(&debug.dicom_magic)));
    rows.push_str(&two_col(
        "Transfer Syntax",
        &or_na(debug.transfer_syntax.as_deref()),
    ));
    rows
}

fn structure_rows(debug: &DebugSummary) -> String {
    let mut rows = section_header("DICOM Structure");
    rows.push_str(&two_col(
        "Total Attributes",
        &debug.attribute_count.to_string(),
    ));
    rows.push_str(&two_col(
        "Sequence Count",
        &debug.sequence_count.to_string(),
    ));
    rows.push_str(&two_col(
        "Meta Info Present",
        &debug.meta_info_present.to_string(),
    ));
    rows
}

fn pixel_data_rows(debug: &DebugSummary) -> String {
    let dimensions = debug
        .image_dimensions
        .map(|dims| format!("{} × {}", dims.rows, dims.columns));

    let mut rows = section_header("Pixel Data Information");
    rows.push_str(&two_col(
        "Has Pixel Data",
        &debug.has_pixel_data.to_string(),
    ));
    rows.push_str(&two_col(
        "Pixel Data VR",
        &or_na(debug.pixel_data_vr.as_deref()),
    ));
    rows.push_str(&two_col("Dimensions", &or_na(dimensions.as_deref())));
    rows.push_str(&two_col(
        "Number of Frames",
        &debug.number_of_frames.unwrap_or(1).to_string(),
    ));
    rows.push_str(&two_col(
        "Bits Allocated",
        &debug.bits_allocated.unwrap_or(0).to_string(),
    ));
    rows.push_str(&two_col(
        "Samples per Pixel",
        &debug.samples_per_pixel.unwrap_or(0).to_string(),
    ));
    rows.push_str(&two_col(
        "Photometric Interpretation",
        &or_na(debug.photometric_interpretation.as_deref()),
    ));
    rows.push_str(&two_col(
        "Pixel Representation",
        &debug.pixel_representation.unwrap_or(0).to_string(),
    ));
    rows
}

fn error_section(debug: &DebugSummary) -> String {
    if !debug.has_errors() {
        return String::new();
    }

    let slots = [
        ("Parse Error", &debug.parse_error),
        ("Pixel Decode Error", &debug.pixel_decode_error),
        ("Pixel Convert Error", &debug.pixel_convert_error),
        ("Pixel Encode Error", &debug.pixel_encode_error),
    ];

    let mut section = String::from("<div class=\"error-section\">\n<h3>Errors</h3>\n");
    for (label, slot) in slots {
        if let Some(message) = slot {
            let _ = writeln!(
                section,
                "<p class=\"error-item\"><strong>{label}:</strong> {}</p>",
                escape_html(message)
            );
        }
    }
    section.push_str("</div>\n");
    section
}

fn section_header(title: &str) -> String {
    format!("<tr>\n<th colspan=\"2\">{title}</th>\n</tr>\n")
}

fn two_col(label: &str, value: &str) -> String {
    format!("<tr>\n<td>{label}</td>\n<td>{value}</td>\n</tr>\n")
}

fn or_na(value: Option<&str>) -> String {
    value.map(escape_html).unwrap_or_else(|| "N/A".to_string())
}

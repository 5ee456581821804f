use serde::Serialize;

/// Image matrix size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub rows: i32,
    pub columns: i32,
}

/// Flat diagnostic record about the source file and the pixel-data pipeline,
/// carried alongside the attribute tree.
///
/// The four error slots reflect partial upstream failures (for example,
/// attributes parsed fine but the preview could not be encoded). They are
/// display data only and never block rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DebugSummary {
    pub file_size: u64,
    pub file_preamble: String,
    pub dicom_magic: String,
    pub transfer_syntax: Option<String>,

    pub attribute_count: usize,
    pub sequence_count: usize,
    pub meta_info_present: bool,

    pub has_pixel_data: bool,
    pub pixel_data_vr: Option<String>,
    pub image_dimensions: Option<Dimensions>,
    pub number_of_frames: Option<i32>,
    pub bits_allocated: Option<i32>,
    pub samples_per_pixel: Option<i32>,
    pub photometric_interpretation: Option<String>,
    pub pixel_representation: Option<i32>,

    pub parse_error: Option<String>,
    pub pixel_decode_error: Option<String>,
    pub pixel_convert_error: Option<String>,
    pub pixel_encode_error: Option<String>,
}

impl DebugSummary {
    /// True when at least one upstream stage recorded a failure.
    pub fn has_errors(&self) -> bool {
        self.parse_error.is_some()
            || self.pixel_decode_error.is_some()
            || self.pixel_convert_error.is_some()
            || self.pixel_encode_error.is_some()
    }
}

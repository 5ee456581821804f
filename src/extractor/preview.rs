use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use dicom::object::DefaultDicomObject;
use dicom::pixeldata::{ConvertOptions, PixelDecoder, VoiLutOption};
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;

use crate::model::DebugSummary;

const JPEG_QUALITY: u8 = 60;

/// Encodes every frame of the pixel data as a base64 JPEG string.
///
/// Preview failures never fail the parse: each stage records its error into
/// the matching debug slot and the preview is abandoned for the whole
/// series, so partial frame sets are never emitted.
pub fn encode_preview_frames(
    object: &DefaultDicomObject,
    debug: &mut DebugSummary,
) -> Option<Vec<String>> {
    if !debug.has_pixel_data {
        return None;
    }

    let decoded = match object.decode_pixel_data() {
        Ok(decoded) => decoded,
        Err(err) => {
            log::warn!("Unable to decode pixel data: {err}");
            debug.pixel_decode_error = Some(format!("pixel data decode error: {err}"));
            return None;
        }
    };

    let options = ConvertOptions::new()
        .with_voi_lut(VoiLutOption::Normalize)
        .force_8bit();

    // Single-sample MONOCHROME2 frames stay grayscale; everything else goes
    // through RGB.
    let grayscale = debug.photometric_interpretation.as_deref() == Some("MONOCHROME2")
        && debug.samples_per_pixel == Some(1);

    let frame_count = decoded.number_of_frames();
    let mut frames = Vec::with_capacity(frame_count as usize);
    for frame_index in 0..frame_count {
        let image = match decoded.to_dynamic_image_with_options(frame_index, &options) {
            Ok(image) => image,
            Err(err) => {
                log::warn!("Unable to convert frame {frame_index}: {err}");
                debug.pixel_convert_error =
                    Some(format!("image conversion error for frame {frame_index}: {err}"));
                return None;
            }
        };

        let mut jpeg = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY);
        let encoded = if grayscale {
            let luma = image.to_luma8();
            encoder.encode(
                luma.as_raw(),
                luma.width(),
                luma.height(),
                ExtendedColorType::L8,
            )
        } else {
            let rgb = image.to_rgb8();
            encoder.encode(
                rgb.as_raw(),
                rgb.width(),
                rgb.height(),
                ExtendedColorType::Rgb8,
            )
        };

        if let Err(err) = encoded {
            log::warn!("Unable to encode frame {frame_index}: {err}");
            debug.pixel_encode_error =
                Some(format!("JPEG encoding error for frame {frame_index}: {err}"));
            return None;
        }

        frames.push(BASE64.encode(&jpeg));
    }

    if frames.is_empty() {
        None
    } else {
        Some(frames)
    }
}

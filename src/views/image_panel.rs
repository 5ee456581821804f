use std::fmt::Write as _;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::model::FramePreview;

/// Renders the preview panel: a placeholder when no frame decoded, a static
/// image for a single frame, and a slider wired to client-side frame data
/// for multi-frame series.
pub fn preview_panel(preview: &FramePreview) -> String {
    let Some(primary) = preview.primary() else {
        return no_preview_panel();
    };

    let mut content = format!(
        "<div class=\"preview-image-wrapper\">\n\
         <img id=\"previewImage\" src=\"data:image/jpeg;base64,{}\" class=\"preview-image\">\n\
         </div>\n",
        BASE64.encode(primary)
    );

    if preview.is_multi_frame() {
        let count = preview.frame_count();
        // The slider index is zero-based; the label is one-based.
        let _ = write!(
            content,
            "<div class=\"slider-container\">\n\
             <input type=\"range\" id=\"frameSlider\" min=\"0\" max=\"{max}\" value=\"0\" class=\"frame-slider\">\n\
             <div class=\"slider-label\">Frame: <span id=\"frameNumber\">1</span> / {count}</div>\n\
             </div>\n<script>\nwindow.frameData = [\n",
            max = count - 1
        );
        for (index, frame) in preview.frames().iter().enumerate() {
            let separator = if index + 1 == count { "" } else { "," };
            let _ = writeln!(content, "'{}'{separator}", BASE64.encode(frame));
        }
        content.push_str("];\n</script>\n");
    }

    format!(
        "<div class=\"preview-container\">\n\
         <button class=\"preview-toggle\" onclick=\"togglePreview(this)\">▼ Preview Image</button>\n\
         <div class=\"preview-content\">\n{content}</div>\n</div>\n"
    )
}

fn no_preview_panel() -> String {
    "<div class=\"preview-container\">\n\
     <button class=\"preview-toggle\" onclick=\"togglePreview(this)\">▶ Preview Image</button>\n\
     <div class=\"preview-content\" style=\"display: none;\">\n\
     <div class=\"no-preview-container\">\n\
     <p class=\"error-message\">No preview image available</p>\n\
     </div>\n</div>\n</div>\n"
        .to_string()
}

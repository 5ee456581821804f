use crate::error::PreviewError;
use crate::model::ParseResult;
use crate::resources::Resources;
use crate::utils::escape_html;

use super::attribute_table::attribute_rows;
use super::debug_panel::debug_panel;
use super::image_panel::preview_panel;

/// Content size hint for text-only results.
const TEXT_CONTENT_SIZE: (u32, u32) = (800, 600);
/// Content size hint when at least one preview frame is present.
const IMAGE_CONTENT_SIZE: (u32, u32) = (800, 800);

/// A finished preview: the document text plus the display size hint the
/// host lays the preview out with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewDocument {
    pub html: String,
    pub content_size: (u32, u32),
}

impl PreviewDocument {
    pub fn bytes(&self) -> &[u8] {
        self.html.as_bytes()
    }
}

/// Minimal document embedding the escaped error message.
pub fn render_error(error: &PreviewError, resources: &Resources) -> PreviewDocument {
    let html = format!(
        "<!DOCTYPE html>\n<html>\n{head}\n<body>\n\
         <div class=\"error\">Error parsing DICOM file: {message}</div>\n\
         </body>\n</html>\n",
        head = document_head("DICOM Parse Error", resources),
        message = escape_html(&error.to_string()),
    );
    PreviewDocument {
        html,
        content_size: TEXT_CONTENT_SIZE,
    }
}

/// Composes the full document: preview panel, debug panel, global
/// expand/collapse controls, and the attribute table.
pub fn render_document(result: &ParseResult, resources: &Resources) -> PreviewDocument {
    let content_size = if result.preview.is_empty() {
        TEXT_CONTENT_SIZE
    } else {
        IMAGE_CONTENT_SIZE
    };

    let html = format!(
        "<!DOCTYPE html>\n<html>\n{head}\n<body>\n\
         <div class=\"container\">\n\
         <h1>DICOM File Preview</h1>\n\
         <div class=\"preview-section\">\n{preview}{debug}</div>\n\
         <div class=\"attributes-section\">\n\
         <div class=\"controls\">\n\
         <button onclick=\"expandAll()\">Expand All</button>\n\
         <button onclick=\"collapseAll()\">Collapse All</button>\n\
         </div>\n\
         <div class=\"table-container\">\n\
         <table>\n<thead>\n<tr>\n\
         <th class=\"tag-id\">Tag ID</th>\n\
         <th class=\"tag-name\">Tag Name</th>\n\
         <th class=\"vr\">VR</th>\n\
         <th class=\"value\">Value</th>\n\
         </tr>\n</thead>\n<tbody>\n{rows}</tbody>\n</table>\n\
         </div>\n\
         <div class=\"count\">{count} DICOM attributes</div>\n\
         </div>\n</div>\n</body>\n</html>\n",
        head = document_head("DICOM File Preview", resources),
        preview = preview_panel(&result.preview),
        debug = debug_panel(&result.debug),
        rows = attribute_rows(&result.attributes),
        count = result.attributes.len(),
    );

    PreviewDocument { html, content_size }
}

/// Head section with the stylesheet and script inlined verbatim.
fn document_head(title: &str, resources: &Resources) -> String {
    format!(
        "<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <style>\n{css}\n</style>\n<script>\n{js}\n</script>\n</head>",
        title = escape_html(title),
        css = resources.css,
        js = resources.js,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Attribute, AttributeValue, DebugSummary, FramePreview};

    fn result_with_preview(preview: FramePreview) -> ParseResult {
        ParseResult {
            attributes: vec![Attribute {
                depth: 0,
                tag: "(0010,0010)".to_string(),
                name: "PatientName".to_string(),
                vr: "PN".to_string(),
                value: AttributeValue::String("Doe^John".to_string()),
            }],
            preview,
            debug: DebugSummary::default(),
        }
    }

    #[test]
    fn text_only_documents_use_the_smaller_size_hint() {
        let document = render_document(&result_with_preview(FramePreview::empty()), &Resources::bundled());
        assert_eq!(document.content_size, (800, 600));
        assert!(document.html.contains("No preview image available"));
    }

    #[test]
    fn documents_with_frames_use_the_larger_size_hint() {
        let document = render_document(
            &result_with_preview(FramePreview::new(vec![vec![1, 2]])),
            &Resources::bundled(),
        );
        assert_eq!(document.content_size, (800, 800));
    }

    #[test]
    fn global_controls_are_present() {
        let document = render_document(&result_with_preview(FramePreview::empty()), &Resources::bundled());
        assert!(document.html.contains("onclick=\"expandAll()\""));
        assert!(document.html.contains("onclick=\"collapseAll()\""));
        assert!(document.html.contains("1 DICOM attributes"));
    }

    #[test]
    fn error_documents_escape_the_message() {
        let error = PreviewError::Parsing("<broken> & bad".to_string());
        let document = render_error(&error, &Resources::bundled());
        assert_eq!(document.content_size, (800, 600));
        assert!(document
            .html
            .contains("Error parsing DICOM file: DICOM parsing error: &lt;broken&gt; &amp; bad"));
    }
}

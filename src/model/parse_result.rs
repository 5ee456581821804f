use super::{Attribute, DebugSummary, FramePreview};

/// Everything the renderer needs for one file: the attribute tree, the
/// assembled preview frames, and the debug summary. Produced once per
/// invocation by the orchestrator and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    pub attributes: Vec<Attribute>,
    pub preview: FramePreview,
    pub debug: DebugSummary,
}

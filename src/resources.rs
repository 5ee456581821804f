//! Static presentation assets inlined into the document head.

use std::fs;
use std::path::Path;

const BUNDLED_CSS: &str = include_str!("../assets/styles.css");
const BUNDLED_JS: &str = include_str!("../assets/scripts.js");

const STYLESHEET_NAME: &str = "styles.css";
const SCRIPT_NAME: &str = "scripts.js";

/// The stylesheet and script text injected verbatim into every document.
/// The rendering pipeline only emits the class and id hooks these consume;
/// swapping the assets swaps the whole interactive layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resources {
    pub css: String,
    pub js: String,
}

impl Resources {
    /// The copies bundled with the crate.
    pub fn bundled() -> Self {
        Self {
            css: BUNDLED_CSS.to_string(),
            js: BUNDLED_JS.to_string(),
        }
    }

    /// Loads both assets by name from a host-supplied directory. A missing
    /// or unreadable file yields an empty inline block rather than a
    /// failure.
    pub fn from_dir(dir: &Path) -> Self {
        Self {
            css: load_asset(dir, STYLESHEET_NAME),
            js: load_asset(dir, SCRIPT_NAME),
        }
    }
}

impl Default for Resources {
    fn default() -> Self {
        Self::bundled()
    }
}

fn load_asset(dir: &Path, name: &str) -> String {
    match fs::read_to_string(dir.join(name)) {
        Ok(text) => text,
        Err(err) => {
            log::warn!("Missing resource {name} in {}: {err}", dir.display());
            String::new()
        }
    }
}

//! Fixture discovery and loading
//!
//! A fixture is a named directory under the fixtures root holding the three
//! files the test page is built from: an HTML fragment, a style sheet and the
//! pre-recorded control image (stored as a data URL).

use std::io;
use std::path::Path;
use tokio::fs;

/// HTML fragment rendered into the page as the node under test
pub const DOM_NODE_FILE: &str = "dom-node.html";
/// Fixture style sheet, inlined into the page head
pub const STYLE_FILE: &str = "style.css";
/// Reference rendering the developer compares against (data URL)
pub const CONTROL_IMAGE_FILE: &str = "control-image";

/// Placeholder substituted for fixture files that do not exist
pub const MISSING_FILE_PLACEHOLDER: &str = "<none>";

/// Contents of one fixture's files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixtureFiles {
    pub dom_node: String,
    pub style: String,
    pub control_image: String,
}

/// List fixture names: the subdirectories of the fixtures root, sorted
///
/// Plain files in the root are skipped. A missing or unreadable root is an
/// error and surfaces on the test page.
pub async fn list(root: &Path) -> io::Result<Vec<String>> {
    let mut entries = fs::read_dir(root).await?;
    let mut names = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }

    names.sort();
    Ok(names)
}

/// Load the three files of the named fixture
///
/// A missing file is not an error: its content becomes
/// [`MISSING_FILE_PLACEHOLDER`]. Any other read failure propagates.
pub async fn load(root: &Path, name: &str) -> io::Result<FixtureFiles> {
    if !is_valid_name(name) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid fixture name: '{name}'"),
        ));
    }

    let dir = root.join(name);
    Ok(FixtureFiles {
        dom_node: read_or_placeholder(&dir.join(DOM_NODE_FILE)).await?,
        style: read_or_placeholder(&dir.join(STYLE_FILE)).await?,
        control_image: read_or_placeholder(&dir.join(CONTROL_IMAGE_FILE)).await?,
    })
}

/// Reject names that could escape the fixtures root
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.contains('/') && !name.contains('\\') && !name.contains("..")
}

async fn read_or_placeholder(path: &Path) -> io::Result<String> {
    match fs::read_to_string(path).await {
        Ok(contents) => Ok(contents),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(MISSING_FILE_PLACEHOLDER.to_string()),
        Err(e) => Err(e),
    }
}

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ClasificaError, Result};
use crate::output::OUTPUT_PREFIX;

pub const INPUT_SUFFIX: &str = ".csv";

#[derive(Debug, PartialEq, Eq)]
enum Entry {
    Statement,
    /// A `.csv` this tool wrote on an earlier run.
    PreviousOutput,
    Other,
}

fn entry_kind(name: &str) -> Entry {
    if !name.ends_with(INPUT_SUFFIX) {
        Entry::Other
    } else if name.starts_with(OUTPUT_PREFIX) {
        Entry::PreviousOutput
    } else {
        Entry::Statement
    }
}

/// Statement files in `dir`, sorted by file name. Sub-directories are ignored,
/// and so are files this tool wrote on a previous run.
pub fn discover_inputs(dir: &Path) -> Result<Vec<PathBuf>> {
    let unreadable = |source| ClasificaError::InputDirUnreadable {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        let Ok(file_type) = entry.file_type() else { continue };
        if file_type.is_dir() {
            continue;
        }
        let name = entry.file_name();
        match entry_kind(&name.to_string_lossy()) {
            Entry::Statement => files.push(entry.path()),
            Entry::PreviousOutput => {
                debug!(path = %entry.path().display(), "earlier output skipped, rename it to process it")
            }
            Entry::Other => {}
        }
    }
    files.sort();
    info!(dir = %dir.display(), count = files.len(), "input files discovered");
    Ok(files)
}

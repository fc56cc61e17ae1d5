//! Intermediate JSON files
//!
//! Harvest results (`tlogs.json`) map each log path to its raw records;
//! parse results (`cmds.json`) are a list of single-entry objects keyed by
//! source file. Both are UTF-8 with 2-space indentation and non-ASCII text
//! written as-is.

use crate::error::FormatError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::debug;

pub const DEFAULT_HARVEST_FILE: &str = "tlogs.json";
pub const DEFAULT_INVOCATIONS_FILE: &str = "cmds.json";
pub const DEFAULT_BUILD_FILE: &str = "build.ninja";

pub fn save_json<T: Serialize + ?Sized>(path: &Path, content: &T) -> Result<(), FormatError> {
    let mut text = serde_json::to_string_pretty(content).map_err(|source| FormatError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    text.push('\n');

    fs::write(path, text).map_err(|source| FormatError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "Saved JSON");
    Ok(())
}

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, FormatError> {
    if !path.exists() {
        return Err(FormatError::NotFound(path.to_path_buf()));
    }

    let text = fs::read_to_string(path).map_err(|source| FormatError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| FormatError::Json {
        path: path.to_path_buf(),
        source,
    })
}

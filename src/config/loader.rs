// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::model::{RawWorkflowFile, WorkflowFile};
use crate::errors::Result;

/// Load a workflow description from a given path and return the raw
/// `RawWorkflowFile`.
///
/// Files ending in `.json` are decoded with `serde_json`; anything else is
/// treated as TOML. This only performs deserialization; it does **not**
/// check ids or edges. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawWorkflowFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let raw: RawWorkflowFile = if is_json {
        serde_json::from_str(&contents)?
    } else {
        toml::from_str(&contents)?
    };

    Ok(raw)
}

/// Load a workflow description from path and validate it.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads TOML or JSON.
/// - Applies `[convert]` defaults (handled by `serde` + `Default` impls).
/// - Checks for:
///   - duplicate or empty job ids and invalid runtimes,
///   - dependencies naming unknown jobs, self-loops,
///   - DAG cycles.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<WorkflowFile> {
    let raw = load_from_path(&path)?;
    WorkflowFile::try_from(raw)
}

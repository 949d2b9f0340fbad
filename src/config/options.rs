// src/config/options.rs

//! Resolved conversion options.

use std::str::FromStr;

use crate::config::model::{ConvertSection, default_execution_cmd, default_runtime_buffer};
use crate::errors::{ManifestError, Result};
use crate::types::Seconds;

/// A request to fuse every job carrying `name` into one aggregate job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSpec {
    pub name: String,
    /// Explicit per-group core cap; falls back to the global default.
    pub max_cores: Option<u64>,
}

impl GroupSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            max_cores: None,
        }
    }

    pub fn capped(name: impl Into<String>, max_cores: u64) -> Self {
        Self {
            name: name.into(),
            max_cores: Some(max_cores),
        }
    }
}

impl FromStr for GroupSpec {
    type Err = ManifestError;

    /// Parses `"name"` or `"name:maxCores"`. Only the last `:` separates the
    /// cap, so names may themselves contain colons.
    fn from_str(s: &str) -> Result<Self> {
        let token = s.trim();
        let (name, max_cores) = match token.rsplit_once(':') {
            Some((name, cap)) => {
                let cap = cap.trim().parse::<u64>().map_err(|_| {
                    ManifestError::ConfigError(format!(
                        "invalid group token '{token}': expected \"name\" or \"name:maxCores\""
                    ))
                })?;
                (name.trim(), Some(cap))
            }
            None => (token, None),
        };

        if name.is_empty() {
            return Err(ManifestError::ConfigError(format!(
                "invalid group token '{token}': empty group name"
            )));
        }

        Ok(GroupSpec {
            name: name.to_string(),
            max_cores,
        })
    }
}

/// Everything the pipeline needs besides the workflow itself.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    pub groups: Vec<GroupSpec>,
    /// `None` (or `Some(0)`) means fused groups are not capped.
    pub default_max_cores: Option<u64>,
    pub sequence_fusion: bool,
    pub runtime_buffer: Seconds,
    pub execution_cmd: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            default_max_cores: None,
            sequence_fusion: true,
            runtime_buffer: default_runtime_buffer(),
            execution_cmd: default_execution_cmd(),
        }
    }
}

impl ConvertOptions {
    /// Resolve a `[convert]` section, parsing its group tokens.
    pub fn from_section(section: &ConvertSection) -> Result<Self> {
        if !section.runtime_buffer.is_valid() {
            return Err(ManifestError::ConfigError(format!(
                "[convert].runtime_buffer must be a non-negative number (got {})",
                section.runtime_buffer
            )));
        }

        let groups = section
            .groups
            .iter()
            .map(|token| token.parse::<GroupSpec>())
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            groups,
            default_max_cores: section.max_cores,
            sequence_fusion: section.sequence_fusion,
            runtime_buffer: section.runtime_buffer,
            execution_cmd: section.execution_cmd.clone(),
        })
    }
}

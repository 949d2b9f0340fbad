// src/config/mod.rs

//! Workflow descriptions and conversion options.
//!
//! - [`model`] mirrors the TOML / JSON input.
//! - [`loader`] reads a file from disk.
//! - [`validate`] enforces the input contract (`TryFrom<RawWorkflowFile>`).
//! - [`options`] resolves `[convert]` into [`ConvertOptions`].

pub mod loader;
pub mod model;
pub mod options;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{ConvertSection, JobConfig, RawWorkflowFile, WorkflowFile};
pub use options::{ConvertOptions, GroupSpec};
pub use validate::{ensure_acyclic, validate_workflow};

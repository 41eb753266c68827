//! # Error Handling
//!
//! The unified `GenError` enum returned by every stage of the generation
//! pipeline, and the `GenResult` alias used throughout the crate.

use derive_more::{Display, From};
use std::path::PathBuf;

/// The generation pipeline's error taxonomy (spec §6/§7).
#[derive(Debug, Display, From)]
pub enum GenError {
    /// The caller-supplied source directory does not exist.
    #[display("source directory not found: {_0}")]
    #[from(ignore)]
    SrcDirMissing(PathBuf),

    /// `forge-dev.yaml` is missing from the source directory.
    #[display("config file not found: {_0}")]
    #[from(ignore)]
    ConfigNotFound(PathBuf),

    /// `forge-dev.yaml` exists but could not be read.
    #[display("config file unreadable: {path}: {cause}")]
    #[from(ignore)]
    ConfigUnreadable {
        /// Path of the unreadable file.
        path: PathBuf,
        /// Underlying I/O error.
        cause: std::io::Error,
    },

    /// `forge-dev.yaml` exists but is not valid YAML.
    #[display("config file parse error: {_0}")]
    #[from(ignore)]
    ConfigParseError(String),

    /// `forge-dev.yaml` parsed but failed field validation.
    #[display("invalid config: {}", errors.join("; "))]
    #[from(ignore)]
    InvalidConfig {
        /// Every violation found, in field order.
        errors: Vec<String>,
    },

    /// `docs/usage.md` does not exist next to the config.
    #[display("docs/usage.md not found under source directory")]
    #[from(ignore)]
    UsageMdMissing,

    /// The configured `openapi.specPath` does not exist.
    #[display("schema file not found: {_0}")]
    #[from(ignore)]
    SchemaNotFound(PathBuf),

    /// The schema file exists but is not a parseable OpenAPI document.
    #[display("schema parse error: {_0}")]
    #[from(ignore)]
    SchemaParseError(String),

    /// `components.schemas.Spec` is absent.
    #[display("components.schemas.Spec is required but was not found")]
    #[from(ignore)]
    MissingSpecSchema,

    /// A schema referenced a name not present in `components.schemas`.
    #[display("unresolved reference: {name}")]
    #[from(ignore)]
    UnresolvedReference {
        /// The dangling referent name.
        name: String,
    },

    /// A schema used an OpenAPI construct outside the supported subset.
    #[display("unsupported schema shape at {path}: {reason}")]
    #[from(ignore)]
    UnsupportedSchemaShape {
        /// Dotted path into the document where the shape was encountered.
        path: String,
        /// Human-readable explanation.
        reason: String,
    },

    /// A template produced invalid output; the pre-format text is preserved
    /// by the caller of this variant for diagnosis.
    #[display("template error in '{template}': {cause}")]
    #[from(ignore)]
    TemplateError {
        /// Name of the offending template (e.g. "spec", "validate").
        template: String,
        /// Cause of the failure.
        cause: String,
    },

    /// Writing a generated file failed.
    #[display("failed to write {path}: {cause}")]
    #[from(ignore)]
    WriteFailed {
        /// Target path.
        path: PathBuf,
        /// Underlying I/O error.
        cause: std::io::Error,
    },

    /// The skip-cache could not read the previously emitted spec file for a
    /// reason other than the file being absent (absence is not an error).
    #[display("skip cache unreadable at {path}: {cause}")]
    #[from(ignore)]
    SkipCacheUnreadable {
        /// Path of the unreadable prior output.
        path: PathBuf,
        /// Underlying I/O error.
        cause: std::io::Error,
    },

    /// Fallback for unexpected I/O failures not covered by a named variant.
    #[display("I/O error: {_0}")]
    Io(std::io::Error),
}

impl std::error::Error for GenError {}

/// Result alias used across the pipeline.
pub type GenResult<T> = Result<T, GenError>;

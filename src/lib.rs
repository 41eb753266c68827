#![deny(missing_docs)]

//! # forge-dev
//!
//! Deterministic engine scaffolding generator: given a per-engine config
//! and an OpenAPI schema describing its input shape, produces a
//! compilable Go engine (type definitions, a structural validator, a
//! protocol adapter, an entry point, and documentation) into the same
//! source directory. Regenerating on unchanged inputs is a no-op: a
//! fingerprint carried in the primary output short-circuits the run.
//!
//! The public surface is a single function, [`generate`], taking a
//! [`BuildInput`] and returning an [`Artifact`] or a [`GenError`].

/// Shared error taxonomy.
pub mod error;

/// Config loading and field validation.
pub mod config;

/// Source fingerprinting and the skip cache.
pub mod fingerprint;

/// OpenAPI ingestion: strict document loading and type modelling.
pub mod oas;

/// Dependency resolution: topological ordering and cycle-breaking.
pub mod resolver;

/// Code/doc emission: one render function per generated file.
pub mod emit;

/// Atomic file writing and Artifact construction.
pub mod writer;

pub use config::Config;
pub use error::{GenError, GenResult};
pub use writer::Artifact;

use emit::EmitContext;
use std::path::PathBuf;
use tracing::info;
use writer::PendingFile;

/// The single caller-supplied input: the source directory holding
/// `forge-dev.yaml`, the referenced OpenAPI schema, and `docs/usage.md`
/// (spec §6).
pub struct BuildInput {
    /// The source directory to read from and write into.
    pub src: PathBuf,
}

/// Runs the full generation pipeline (spec §4.8):
/// `loaded -> fingerprinted -> (skip|loaded) -> modelled -> resolved ->
/// (emit-spec, emit-validate, emit-adapter, emit-main, emit-docs,
/// emit-schema-md, emit-list-yaml) -> written`.
pub fn generate(input: BuildInput) -> GenResult<Artifact> {
    let src = input.src;
    if !src.exists() {
        return Err(GenError::SrcDirMissing(src));
    }

    let (config, config_bytes, _config_path) = Config::load(&src)?;
    config::require_usage_md(&src)?;

    let schema_path = src.join(&config.schema_path);
    if !schema_path.exists() {
        return Err(GenError::SchemaNotFound(schema_path));
    }
    let schema_bytes = std::fs::read(&schema_path).map_err(GenError::Io)?;

    let current_fingerprint =
        fingerprint::SourceFingerprint::compute(&config_bytes, &schema_bytes);

    let spec_file_path = src.join("zz_generated.spec.go");
    if let Some(cached) = fingerprint::check_skip(&spec_file_path, &current_fingerprint)? {
        info!(version = %cached, "skip cache hit, generation skipped");
        return Ok(Artifact {
            name: config.name,
            artifact_type: "generated",
            location: src.canonicalize().unwrap_or(src),
            timestamp: chrono::Utc::now().to_rfc3339(),
            version: cached.as_str().to_string(),
        });
    }

    let schema_text = String::from_utf8(schema_bytes)
        .map_err(|e| GenError::SchemaParseError(format!("schema file is not valid UTF-8: {e}")))?;
    let document = oas::load_document(&schema_text)?;
    let defs = oas::model::model_components(&document.components, &document.raw)?;
    let resolution = resolver::resolve(defs)?;

    let ctx = EmitContext {
        config: &config,
        ordered: &resolution.ordered,
        fingerprint: &current_fingerprint,
    };

    let mut files = Vec::new();

    files.push(PendingFile {
        relative_path: PathBuf::from("zz_generated.spec.go"),
        contents: emit::format::format_go(&emit::spec::render(&ctx)),
    });
    files.push(PendingFile {
        relative_path: PathBuf::from("zz_generated.validate.go"),
        contents: emit::format::format_go(&emit::validate::render(&ctx)),
    });
    files.push(PendingFile {
        relative_path: PathBuf::from("zz_generated.mcp.go"),
        contents: emit::format::format_go(&emit::adapter::render(&ctx)),
    });
    files.push(PendingFile {
        relative_path: PathBuf::from("zz_generated.main.go"),
        contents: emit::format::format_go(&emit::entrypoint::render(&ctx)),
    });
    files.push(PendingFile {
        relative_path: PathBuf::from("zz_generated.docs.go"),
        contents: emit::format::format_go(&emit::docs::render_registry(&ctx)),
    });
    files.push(PendingFile {
        relative_path: PathBuf::from("docs/schema.md"),
        contents: emit::docs::render_schema_md(&ctx),
    });
    files.push(PendingFile {
        relative_path: PathBuf::from("docs/list.yaml"),
        contents: emit::docs::render_list_yaml(&ctx),
    });

    writer::write_all(&src, &config, &current_fingerprint, &files)
}

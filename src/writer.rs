//! # Writer
//!
//! Writes the emitted files into the source directory (spec §4.7):
//! ensures `docs/` exists with mode `rwxr-xr-x`, writes files with mode
//! `rw-r--r--`, logs each successful write, and builds the returned
//! [`Artifact`]. Writes are atomic per-file (write to a sibling temp file,
//! then rename) but there is no cross-file transaction — a failure midway
//! leaves whatever was already written in place, matching spec §4.7's
//! "no partial cleanup" rule, since every output is a deterministic
//! function of the same inputs and will be overwritten on the next run.

use crate::config::Config;
use crate::error::{GenError, GenResult};
use crate::fingerprint::SourceFingerprint;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::info;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// The value returned to the caller on a successful generation run
/// (spec §6).
#[derive(Debug, Clone)]
pub struct Artifact {
    /// The engine name from config.
    pub name: String,
    /// Always the literal string `"generated"`.
    pub artifact_type: &'static str,
    /// Absolute path of the source directory.
    pub location: PathBuf,
    /// RFC3339 UTC timestamp of this run.
    pub timestamp: String,
    /// The source fingerprint (or the cached one, on a skip-cache hit).
    pub version: String,
}

/// One file to write, relative to the source directory.
pub struct PendingFile {
    /// Path relative to `src`.
    pub relative_path: PathBuf,
    /// File contents.
    pub contents: String,
}

/// Writes every pending file into `src`, creating `docs/` if needed, and
/// builds the resulting [`Artifact`].
pub fn write_all(
    src: &Path,
    config: &Config,
    fingerprint: &SourceFingerprint,
    files: &[PendingFile],
) -> GenResult<Artifact> {
    ensure_docs_dir(src)?;

    for file in files {
        write_one(src, file)?;
    }

    let location = src
        .canonicalize()
        .unwrap_or_else(|_| src.to_path_buf());

    Ok(Artifact {
        name: config.name.clone(),
        artifact_type: "generated",
        location,
        timestamp: Utc::now().to_rfc3339(),
        version: fingerprint.as_str().to_string(),
    })
}

fn ensure_docs_dir(src: &Path) -> GenResult<()> {
    let docs_dir = src.join("docs");
    if docs_dir.exists() {
        return Ok(());
    }
    std::fs::create_dir_all(&docs_dir).map_err(GenError::Io)?;
    set_permissions(&docs_dir, 0o755)?;
    Ok(())
}

fn write_one(src: &Path, file: &PendingFile) -> GenResult<()> {
    let target = src.join(&file.relative_path);
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(GenError::Io)?;
    }

    let tmp_path = target.with_extension(format!(
        "{}.tmp",
        target
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("out")
    ));

    std::fs::write(&tmp_path, &file.contents).map_err(|cause| GenError::WriteFailed {
        path: target.clone(),
        cause,
    })?;
    set_permissions(&tmp_path, 0o644)?;

    std::fs::rename(&tmp_path, &target).map_err(|cause| GenError::WriteFailed {
        path: target.clone(),
        cause,
    })?;

    info!(path = %target.display(), "wrote generated file");
    Ok(())
}

#[cfg(unix)]
fn set_permissions(path: &Path, mode: u32) -> GenResult<()> {
    let perms = std::fs::Permissions::from_mode(mode);
    std::fs::set_permissions(path, perms).map_err(GenError::Io)
}

#[cfg(not(unix))]
fn set_permissions(_path: &Path, _mode: u32) -> GenResult<()> {
    Ok(())
}

//! # Fingerprint & Skip Cache
//!
//! Computes the `sha256:<hex>` source fingerprint (spec §4.2) and
//! implements the skip-cache header scan against a previously emitted
//! primary output file.

use crate::error::{GenError, GenResult};
use sha2::{Digest, Sha256};
use std::io::{BufRead, BufReader};
use std::path::Path;

/// How many leading lines of the prior output the skip cache will scan
/// before giving up looking for the checksum header.
const HEADER_SCAN_LINES: usize = 10;

/// The header prefix emitted at the top of every generated source file.
pub const CHECKSUM_HEADER_PREFIX: &str = "// SourceChecksum: ";

/// The header prefix used in YAML outputs (`docs/list.yaml`).
pub const CHECKSUM_HEADER_PREFIX_YAML: &str = "# SourceChecksum: ";

/// An opaque `sha256:<hex>` digest of `(configBytes || schemaBytes)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceFingerprint(String);

impl SourceFingerprint {
    /// Computes the fingerprint of the concatenation of the config file's
    /// raw bytes followed by the schema file's raw bytes, in that order.
    pub fn compute(config_bytes: &[u8], schema_bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(config_bytes);
        hasher.update(schema_bytes);
        let digest = hasher.finalize();
        Self(format!("sha256:{:x}", digest))
    }

    /// Wraps an already-computed fingerprint string (used when reading a
    /// header out of a previously emitted file).
    fn from_header_value(value: &str) -> Self {
        Self(value.trim().to_string())
    }

    /// Renders the full header line for embedding in generated Go source.
    pub fn header_line(&self) -> String {
        format!("{CHECKSUM_HEADER_PREFIX}{}", self.0)
    }

    /// Renders the full header line for embedding in generated YAML.
    pub fn header_line_yaml(&self) -> String {
        format!("{CHECKSUM_HEADER_PREFIX_YAML}{}", self.0)
    }

    /// The raw `sha256:<hex>` string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SourceFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Scans the first [`HEADER_SCAN_LINES`] lines of `path` for a
/// `// SourceChecksum: ` header, stopping early at the first non-comment,
/// non-blank line. Returns `Ok(None)` if the file is absent (not an error);
/// returns `Err` only for genuine I/O failures on an existing file.
pub fn read_prior_fingerprint(path: &Path) -> GenResult<Option<SourceFingerprint>> {
    let file = match std::fs::File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(cause) => {
            return Err(GenError::SkipCacheUnreadable {
                path: path.to_path_buf(),
                cause,
            })
        }
    };

    let reader = BufReader::new(file);
    for line in reader.lines().take(HEADER_SCAN_LINES) {
        let line = match line {
            Ok(l) => l,
            Err(cause) => {
                return Err(GenError::SkipCacheUnreadable {
                    path: path.to_path_buf(),
                    cause,
                })
            }
        };
        let trimmed = line.trim_start();

        if let Some(value) = trimmed
            .strip_prefix(CHECKSUM_HEADER_PREFIX)
            .or_else(|| trimmed.strip_prefix(CHECKSUM_HEADER_PREFIX_YAML))
        {
            if value.trim().is_empty() {
                // A malformed/empty header never matches anything.
                return Ok(None);
            }
            return Ok(Some(SourceFingerprint::from_header_value(value)));
        }

        let is_comment = trimmed.starts_with("//") || trimmed.starts_with('#');
        if !is_comment && !trimmed.is_empty() {
            // A non-comment, non-blank line ends the scan window.
            break;
        }
    }

    Ok(None)
}

/// Returns `Some(prior)` if `prior` (read from `spec_file_path`'s header)
/// byte-exactly matches `current`, meaning generation can be skipped.
pub fn check_skip(
    spec_file_path: &Path,
    current: &SourceFingerprint,
) -> GenResult<Option<SourceFingerprint>> {
    let prior = read_prior_fingerprint(spec_file_path)?;
    Ok(match prior {
        Some(p) if p == *current => Some(p),
        _ => None,
    })
}

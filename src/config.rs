//! # Config Loader
//!
//! Reads and validates `<src>/forge-dev.yaml` (spec §4.1). Validation
//! collects every violation instead of failing on the first one, so a
//! caller gets the full list in a single round trip.

use crate::error::{GenError, GenResult};
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Filename expected directly under the source directory.
pub const CONFIG_FILE_NAME: &str = "forge-dev.yaml";

/// The four engine kinds this generator may scaffold (spec GLOSSARY).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    /// Produces build artifacts.
    Builder,
    /// Runs a test suite.
    TestRunner,
    /// A test-environment subengine.
    TestenvSubengine,
    /// Detects project dependencies.
    DependencyDetector,
}

impl EngineKind {
    /// Parses the `type` field's recognized literal values.
    fn from_str(s: &str) -> Option<Self> {
        match s {
            "builder" => Some(Self::Builder),
            "test-runner" => Some(Self::TestRunner),
            "testenv-subengine" => Some(Self::TestenvSubengine),
            "dependency-detector" => Some(Self::DependencyDetector),
            _ => None,
        }
    }

    /// The literal string this variant was parsed from.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Builder => "builder",
            Self::TestRunner => "test-runner",
            Self::TestenvSubengine => "testenv-subengine",
            Self::DependencyDetector => "dependency-detector",
        }
    }
}

/// Optional block enabling emission of a separate external-types file.
#[derive(Debug, Clone)]
pub struct ExternalTypesConfig {
    /// Whether external-types emission is enabled.
    pub enabled: bool,
    /// Output path (relative to the source directory) for the external types file.
    pub output_path: PathBuf,
    /// Package/namespace name used in that file.
    pub package_name: String,
}

/// The validated, immutable per-engine configuration (spec §3 Config).
#[derive(Debug, Clone)]
pub struct Config {
    /// Engine name: lowercase-alphanumeric-hyphen, starts with a letter, <=64 chars.
    pub name: String,
    /// Which of the four engine kinds this config scaffolds.
    pub kind: EngineKind,
    /// Strict `X.Y.Z` version string.
    pub version: String,
    /// Optional human-readable description.
    pub description: Option<String>,
    /// Path to the OpenAPI schema, relative to the config file's directory.
    pub schema_path: PathBuf,
    /// The emitted-code namespace declaration, used verbatim.
    pub package_name: String,
    /// Optional external-types emission settings.
    pub external_types: Option<ExternalTypesConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct RawOpenApi {
    #[serde(rename = "specPath")]
    spec_path: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct RawGenerate {
    #[serde(rename = "packageName")]
    package_name: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct RawExternalTypes {
    enabled: Option<bool>,
    #[serde(rename = "outputPath")]
    output_path: Option<String>,
    #[serde(rename = "packageName")]
    package_name: Option<String>,
}

/// The as-parsed, pre-validation shape of `forge-dev.yaml`. Unknown keys are
/// ignored per spec §6.
#[derive(Debug, Deserialize, Default)]
struct RawConfig {
    name: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    version: Option<String>,
    description: Option<String>,
    #[serde(default)]
    openapi: RawOpenApi,
    #[serde(default)]
    generate: RawGenerate,
    #[serde(rename = "externalTypes")]
    external_types: Option<RawExternalTypes>,
}

fn name_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z][a-z0-9-]*$").expect("valid regex"))
}

fn package_name_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z][a-z0-9_]*$").expect("valid regex"))
}

fn version_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+$").expect("valid regex"))
}

impl Config {
    /// Loads and validates `<src>/forge-dev.yaml`, returning the raw bytes
    /// of the config file alongside the parsed `Config` (the fingerprint
    /// stage needs the raw bytes, not the reparsed structure).
    pub fn load(src: &Path) -> GenResult<(Self, Vec<u8>, PathBuf)> {
        let config_path = src.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            return Err(GenError::ConfigNotFound(config_path));
        }

        let bytes = std::fs::read(&config_path).map_err(|cause| GenError::ConfigUnreadable {
            path: config_path.clone(),
            cause,
        })?;

        let raw: RawConfig = serde_yaml::from_slice(&bytes)
            .map_err(|e| GenError::ConfigParseError(e.to_string()))?;

        let config = Self::from_raw(raw)?;
        Ok((config, bytes, config_path))
    }

    fn from_raw(raw: RawConfig) -> GenResult<Self> {
        let mut errors = Vec::new();

        let name = validate_name(raw.name.as_deref(), &mut errors);
        let kind = validate_kind(raw.kind.as_deref(), &mut errors);
        let version = validate_version(raw.version.as_deref(), &mut errors);
        let schema_path = validate_required_path(
            raw.openapi.spec_path.as_deref(),
            "openapi.specPath",
            &mut errors,
        );
        let package_name =
            validate_package_name(raw.generate.package_name.as_deref(), &mut errors);

        let external_types = raw.external_types.map(|ext| {
            let enabled = ext.enabled.unwrap_or(false);
            let output_path = ext
                .output_path
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("external_types"));
            let package_name = ext.package_name.unwrap_or_else(|| "externaltypes".into());
            ExternalTypesConfig {
                enabled,
                output_path,
                package_name,
            }
        });

        if !errors.is_empty() {
            return Err(GenError::InvalidConfig { errors });
        }

        Ok(Config {
            name: name.expect("validated above"),
            kind: kind.expect("validated above"),
            version: version.expect("validated above"),
            description: raw.description,
            schema_path: schema_path.expect("validated above"),
            package_name: package_name.expect("validated above"),
            external_types,
        })
    }
}

fn validate_name(value: Option<&str>, errors: &mut Vec<String>) -> Option<String> {
    let Some(value) = value else {
        errors.push("name: required field is missing".into());
        return None;
    };
    if value.len() > 64 {
        errors.push(format!("name: must be <= 64 chars, got {}", value.len()));
        return None;
    }
    if !name_pattern().is_match(value) {
        errors.push(format!(
            "name: must match ^[a-z][a-z0-9-]*$, got '{}'",
            value
        ));
        return None;
    }
    Some(value.to_string())
}

fn validate_kind(value: Option<&str>, errors: &mut Vec<String>) -> Option<EngineKind> {
    let Some(value) = value else {
        errors.push("type: required field is missing".into());
        return None;
    };
    match EngineKind::from_str(value) {
        Some(kind) => Some(kind),
        None => {
            errors.push(format!(
                "type: must be one of builder, test-runner, testenv-subengine, dependency-detector, got '{}'",
                value
            ));
            None
        }
    }
}

fn validate_version(value: Option<&str>, errors: &mut Vec<String>) -> Option<String> {
    let Some(value) = value else {
        errors.push("version: required field is missing".into());
        return None;
    };
    if !version_pattern().is_match(value) {
        errors.push(format!(
            "version: must match ^[0-9]+\\.[0-9]+\\.[0-9]+$, got '{}'",
            value
        ));
        return None;
    }
    Some(value.to_string())
}

fn validate_required_path(
    value: Option<&str>,
    field: &str,
    errors: &mut Vec<String>,
) -> Option<PathBuf> {
    match value {
        Some(v) if !v.is_empty() => Some(PathBuf::from(v)),
        _ => {
            errors.push(format!("{field}: required field is missing"));
            None
        }
    }
}

fn validate_package_name(value: Option<&str>, errors: &mut Vec<String>) -> Option<String> {
    let Some(value) = value else {
        errors.push("generate.packageName: required field is missing".into());
        return None;
    };
    if !package_name_pattern().is_match(value) {
        errors.push(format!(
            "generate.packageName: must match ^[a-z][a-z0-9_]*$, got '{}'",
            value
        ));
        return None;
    }
    Some(value.to_string())
}

/// Checks that `<src>/docs/usage.md` exists (spec §4.1 fatal precondition).
pub fn require_usage_md(src: &Path) -> GenResult<()> {
    if src.join("docs").join("usage.md").exists() {
        Ok(())
    } else {
        Err(GenError::UsageMdMissing)
    }
}

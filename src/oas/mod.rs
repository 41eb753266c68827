//! # OpenAPI Ingestion
//!
//! - **document**: strict document loading and the structural preconditions
//!   of spec §4.3 (internal-only refs, `openapi` version marker, the `Spec`
//!   schema).
//! - **model**: normalization of `components.schemas` into the `TypeDef`/
//!   `Property` model of spec §3.

/// Strict document loading and the structural preconditions of spec §4.3.
pub mod document;
/// Normalization of `components.schemas` into the TypeDef/Property model.
pub mod model;

pub use document::load_document;
pub use model::{Property, TypeDef, TypeShape};

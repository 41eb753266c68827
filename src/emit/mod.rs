//! # Emitter Engine
//!
//! A small text-template runtime (spec §4.5): each submodule prepares a
//! context built from the resolved [`TypeDef`] list and writes Go (or
//! Markdown/YAML) source text with plain string-building, in the style
//! `core::codegen` uses for Rust. There is no templating crate in the
//! dependency stack — the "templates" are the functions in this module
//! tree, and the "helpers" below are the fixed registry of pure predicates
//! spec §4.5 calls out by name.

/// Protocol adapter generator (`zz_generated.mcp.go`), four kind-specific variants.
pub mod adapter;
/// Documentation registry, schema table, and YAML index generators.
pub mod docs;
/// Entry point generator (`zz_generated.main.go`).
pub mod entrypoint;
/// Optional `gofmt` shell-out, fails open.
pub mod format;
/// Type specification generator (`zz_generated.spec.go`).
pub mod spec;
/// Structural validator generator (`zz_generated.validate.go`).
pub mod validate;

use crate::config::{Config, EngineKind};
use crate::fingerprint::SourceFingerprint;
use crate::oas::model::{Property, TypeDef, TypeShape};

/// Everything a file generator needs, already resolved. Built once per run
/// and threaded through every emit stage (spec §9: "prefer a fully-prepared
/// context record... to keep template logic minimal").
pub struct EmitContext<'a> {
    /// The validated engine config driving this run.
    pub config: &'a Config,
    /// Type defs in final emission order (spec §4.4).
    pub ordered: &'a [TypeDef],
    /// The source fingerprint, embedded as a header in primary outputs.
    pub fingerprint: &'a SourceFingerprint,
}

impl<'a> EmitContext<'a> {
    /// The TypeDef named `Spec`, the generator's fixed entry point.
    pub fn main_type(&self) -> &TypeDef {
        self.ordered
            .iter()
            .find(|d| d.name == crate::oas::model::MAIN_SCHEMA_NAME)
            .expect("document loader guarantees a Spec schema")
    }

    /// spec §4.6: true iff the generated `zz_generated.spec.go` will contain
    /// a `fmt.Errorf` call. Every union always dispatches through one (the
    /// discriminator-tag check and the unmatched-tag case), and every object
    /// property other than a bare optional `any` goes through a `FromMap`
    /// assertion or conversion that can fail.
    pub fn needs_fmt_import(&self) -> bool {
        const BARE_SCALAR: &str = "any";
        self.union_defs().next().is_some()
            || self.ordered.iter().any(|def| {
                let TypeShape::Object { properties } = &def.shape else {
                    return false;
                };
                properties.iter().any(|p| {
                    p.required
                        || p.is_ref
                        || p.is_array_of_ref
                        || p.is_array
                        || p.is_map
                        || p.go_type != BARE_SCALAR
                })
            })
    }

    /// spec §4.6's second template flag: true when any emitted object type
    /// has an array- or map-shaped property. Go's slice and map types are
    /// built in, so unlike `needs_fmt_import` this never gates an import —
    /// it is kept available for templates that branch on "this spec has
    /// collection-shaped fields" without caring which ones.
    pub fn has_array_or_map(&self) -> bool {
        self.ordered.iter().any(|def| {
            let TypeShape::Object { properties } = &def.shape else {
                return false;
            };
            properties.iter().any(|p| p.is_array || p.is_map)
        })
    }

    /// All object-shaped type defs, in emission order.
    pub fn object_defs(&self) -> impl Iterator<Item = &TypeDef> {
        self.ordered
            .iter()
            .filter(|d| matches!(d.shape, TypeShape::Object { .. }))
    }

    /// All union-shaped type defs, in emission order.
    pub fn union_defs(&self) -> impl Iterator<Item = &TypeDef> {
        self.ordered.iter().filter(|d| d.is_union())
    }

    /// All enum-shaped type defs, in emission order.
    pub fn enum_defs(&self) -> impl Iterator<Item = &TypeDef> {
        self.ordered.iter().filter(|d| d.is_enum())
    }

    /// spec §9's open question on the `FromMap`/`<Type>FromMap` naming
    /// convention, resolved in favor of always qualifying (see DESIGN.md).
    pub fn from_map_fn_name(&self, type_name: &str) -> String {
        format!("{type_name}FromMap")
    }
}

impl EngineKind {
    /// The Go identifier fragment distinguishing this engine kind's
    /// adapter template (spec §4.6, §9: four variants, never unified).
    pub fn template_tag(&self) -> &'static str {
        match self {
            EngineKind::Builder => "builder",
            EngineKind::TestRunner => "testRunner",
            EngineKind::TestenvSubengine => "testenvSubengine",
            EngineKind::DependencyDetector => "dependencyDetector",
        }
    }
}

/// `isRef(p)` helper (spec §4.5).
pub fn is_ref(p: &Property) -> bool {
    p.is_ref
}

/// `refType(p)` helper.
pub fn ref_type(p: &Property) -> Option<&str> {
    p.ref_type.as_deref()
}

/// `isArrayRef(p)` helper.
pub fn is_array_ref(p: &Property) -> bool {
    p.is_array_of_ref
}

/// `isMap(p)` helper.
pub fn is_map(p: &Property) -> bool {
    p.is_map
}

/// `mapValueType(p)` helper.
pub fn map_value_type(p: &Property) -> Option<&str> {
    p.map_value_type.as_deref()
}

/// `usePointer(p)` helper. Applies to both direct references and
/// array-of-reference items, matching whichever form the property is.
pub fn use_pointer(p: &Property) -> bool {
    if p.is_array_of_ref {
        p.array_item_use_pointer
    } else {
        p.use_pointer
    }
}

/// `isUnion(t)` helper.
pub fn is_union(t: &TypeDef) -> bool {
    t.is_union()
}

/// `unionVariants(t)` helper.
pub fn union_variants(t: &TypeDef) -> &[String] {
    match &t.shape {
        TypeShape::Union { variants, .. } => variants,
        _ => &[],
    }
}

/// `discriminatorField(t)` helper.
pub fn discriminator_field(t: &TypeDef) -> Option<&str> {
    match &t.shape {
        TypeShape::Union {
            discriminator_field, ..
        } => discriminator_field.as_deref(),
        _ => None,
    }
}

/// `camel(s)` helper: lowerCamelCase (first letter down-cased from
/// [`crate::oas::model::to_camel`]'s UpperCamelCase).
pub fn camel(s: &str) -> String {
    let title = crate::oas::model::to_camel(s);
    let mut chars = title.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// `title(s)` helper: UpperCamelCase.
pub fn title(s: &str) -> String {
    crate::oas::model::to_camel(s)
}

/// `commentify(s)` helper: renders a (possibly multi-line) string as a
/// block of `//`-prefixed Go comment lines.
pub fn commentify(s: &str) -> String {
    s.lines()
        .map(|line| format!("// {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_lowercases_first_letter() {
        assert_eq!(camel("user_id"), "userId");
        assert_eq!(title("user_id"), "UserId");
    }

    #[test]
    fn commentify_prefixes_every_line() {
        assert_eq!(commentify("a\nb"), "// a\n// b");
    }
}

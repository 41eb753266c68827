//! # Validator Generator
//!
//! Builds `zz_generated.validate.go` (spec §4.6): per-type structural
//! validation (required-field presence, enum-value membership, recursive
//! validation of referenced types and arrays of references), plus the two
//! entry points `Validate(<Main>)` and `ValidateMap(map)` the protocol
//! adapter's `config-validate` handler calls.

use super::{title, EmitContext};
use crate::oas::model::{Property, TypeDef, TypeShape};

/// Renders the complete `zz_generated.validate.go` source text.
pub fn render(ctx: &EmitContext) -> String {
    let mut out = String::new();
    out.push_str(&ctx.fingerprint.header_line());
    out.push_str("\n\n");
    out.push_str(&format!("package {}\n\n", ctx.config.package_name));
    if any_enum_property(ctx) {
        out.push_str("import (\n\t\"fmt\"\n)\n\n");
    } else {
        out.push_str("import (\n)\n\n");
    }

    for def in ctx.object_defs() {
        out.push_str(&render_validate_fn(def));
        out.push('\n');
    }

    let main_name = &ctx.main_type().name;
    out.push_str(&format!(
        "// Validate checks a fully-typed {main_name} against the structural rules\n// generated from the schema.\n"
    ));
    out.push_str(&format!(
        "func Validate(v {main_name}) []string {{\n\treturn validate{main_name}(v)\n}}\n\n"
    ));

    out.push_str("// ValidateMap parses m into the main type and validates it in one step.\n");
    out.push_str(&format!(
        "func ValidateMap(m map[string]interface{{}}) []string {{\n\tv, err := {}(m)\n\tif err != nil {{\n\t\treturn []string{{err.Error()}}\n\t}}\n\treturn Validate(v)\n}}\n",
        ctx.from_map_fn_name(main_name)
    ));

    out
}

/// Whether any emitted object property carries an inline `enum` constraint
/// — the only construct this file's validator renders a `fmt.Sprintf` call
/// for, so the `"fmt"` import is gated on it rather than always included.
fn any_enum_property(ctx: &EmitContext) -> bool {
    ctx.object_defs().any(|def| {
        let TypeShape::Object { properties } = &def.shape else {
            return false;
        };
        properties.iter().any(|p| p.is_enum)
    })
}

fn render_validate_fn(def: &TypeDef) -> String {
    let TypeShape::Object { properties } = &def.shape else {
        return String::new();
    };
    let mut out = String::new();
    out.push_str(&format!(
        "// validate{0} checks a {0}'s structural rules.\n",
        def.name
    ));
    out.push_str(&format!(
        "func validate{0}(v {0}) []string {{\n\tvar errs []string\n",
        def.name
    ));
    for prop in properties {
        out.push_str(&render_property_checks(def, prop));
    }
    out.push_str("\treturn errs\n}\n");
    out
}

fn render_property_checks(def: &TypeDef, prop: &Property) -> String {
    let mut out = String::new();
    let field = title(&prop.name);
    let accessor = format!("v.{field}");

    if prop.required && prop.use_pointer {
        out.push_str(&format!(
            "\tif {accessor} == nil {{\n\t\terrs = append(errs, \"{}: required field is missing\")\n\t}}\n",
            prop.name
        ));
    }

    if prop.is_enum {
        let quoted: Vec<String> = prop.enum_values.iter().map(|v| format!("\"{v}\"")).collect();
        out.push_str(&format!(
            "\tswitch {accessor} {{\n\tcase {}:\n\tdefault:\n\t\terrs = append(errs, fmt.Sprintf(\"{}: invalid value %q\", {accessor}))\n\t}}\n",
            quoted.join(", "),
            prop.name
        ));
    }

    if prop.is_ref {
        let target = prop.ref_type.as_deref().unwrap_or(&def.name);
        if prop.use_pointer {
            out.push_str(&format!(
                "\tif {accessor} != nil {{\n\t\terrs = append(errs, validate{target}(*{accessor})...)\n\t}}\n"
            ));
        } else {
            out.push_str(&format!(
                "\terrs = append(errs, validate{target}({accessor})...)\n"
            ));
        }
    }

    if prop.is_array_of_ref {
        let item = prop.array_item_type.as_deref().unwrap_or(&def.name);
        if prop.array_item_use_pointer {
            out.push_str(&format!(
                "\tfor _, item := range {accessor} {{\n\t\tif item != nil {{\n\t\t\terrs = append(errs, validate{item}(*item)...)\n\t\t}}\n\t}}\n"
            ));
        } else {
            out.push_str(&format!(
                "\tfor _, item := range {accessor} {{\n\t\terrs = append(errs, validate{item}(item)...)\n\t}}\n"
            ));
        }
    }

    out
}

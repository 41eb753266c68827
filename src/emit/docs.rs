//! # Documentation Registry Generator
//!
//! Builds `zz_generated.docs.go` (a compile-time `docs-list`/`docs-get`
//! registry), `docs/schema.md` (a human-readable property table for the
//! main schema), and `docs/list.yaml` (a YAML mirror of the Go registry,
//! carrying its own fingerprint header) — spec §4.6.

use super::EmitContext;
use crate::oas::model::{Property, TypeShape};

/// The fixed set of documentation entries this generator always registers.
/// A real deployment may carry more; the generator only knows about the
/// schema doc it itself produces.
const DOC_NAMES: &[&str] = &["schema"];

/// Renders `zz_generated.docs.go`.
pub fn render_registry(ctx: &EmitContext) -> String {
    let mut out = String::new();
    out.push_str(&ctx.fingerprint.header_line());
    out.push_str("\n\n");
    out.push_str(&format!("package {}\n\n", ctx.config.package_name));
    out.push_str("// docBaseURL is where docs-get fetches full content when not embedded.\n");
    out.push_str(&format!(
        "const docBaseURL = \"https://docs.invalid/{}/\"\n\n",
        ctx.config.name
    ));
    out.push_str("// docNames lists every document docs-list advertises.\n");
    out.push_str("var docNames = []string{\n");
    for name in DOC_NAMES {
        out.push_str(&format!("\t\"{name}\",\n"));
    }
    out.push_str("}\n\n");
    out.push_str("// DocsList returns the fixed set of documentation names.\n");
    out.push_str("func DocsList() []string {\n\treturn docNames\n}\n\n");
    out.push_str("// DocsGet returns the base URL a docs-get tool should fetch name from.\n");
    out.push_str(
        "func DocsGet(name string) (string, bool) {\n\
         \tfor _, n := range docNames {\n\
         \t\tif n == name {\n\
         \t\t\treturn docBaseURL + name, true\n\
         \t\t}\n\
         \t}\n\
         \treturn \"\", false\n\
         }\n",
    );
    out
}

/// Renders `docs/schema.md`: a property table for the main `Spec` schema.
pub fn render_schema_md(ctx: &EmitContext) -> String {
    let main = ctx.main_type();
    let mut out = String::new();
    out.push_str(&format!("# {} schema\n\n", main.name));
    if let Some(desc) = &main.description {
        out.push_str(desc);
        out.push_str("\n\n");
    }

    let TypeShape::Object { properties } = &main.shape else {
        out.push_str("_This schema has no object properties to document._\n");
        return out;
    };

    out.push_str("| Property | Type | Required | Description | Default |\n");
    out.push_str("|----------|------|----------|-------------|---------|\n");
    for prop in properties {
        out.push_str(&schema_md_row(prop));
    }
    out
}

fn schema_md_row(prop: &Property) -> String {
    format!(
        "| {} | {} | {} | {} | {} |\n",
        prop.name,
        prop.rendered_type(),
        if prop.required { "yes" } else { "no" },
        prop.description.as_deref().unwrap_or("").replace('|', "\\|"),
        prop.default.as_deref().unwrap_or("").replace('|', "\\|"),
    )
}

/// Renders `docs/list.yaml`: a fingerprinted YAML mirror of the Go registry.
pub fn render_list_yaml(ctx: &EmitContext) -> String {
    let mut out = String::new();
    out.push_str(&ctx.fingerprint.header_line_yaml());
    out.push('\n');
    out.push_str(&format!(
        "baseUrl: https://docs.invalid/{}/\n",
        ctx.config.name
    ));
    out.push_str("docs:\n");
    for name in DOC_NAMES {
        out.push_str(&format!("  - {name}\n"));
    }
    out
}

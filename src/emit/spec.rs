//! # Type Specification Generator
//!
//! Builds `zz_generated.spec.go` (spec §4.6): one Go type per [`TypeDef`],
//! a `<Type>FromMap` deserializer and a `<type>.ToMap` serializer per
//! object type, a tagged variant for unions, and string constants with a
//! validity predicate for enums. This is the primary output the skip
//! cache consults, so it always carries the fingerprint header.

use super::{commentify, discriminator_field, title, union_variants, EmitContext};
use crate::oas::model::{Property, TypeDef, TypeShape};

/// Renders the complete `zz_generated.spec.go` source text.
pub fn render(ctx: &EmitContext) -> String {
    let mut out = String::new();

    out.push_str(&ctx.fingerprint.header_line());
    out.push_str("\n\n");
    out.push_str(&format!("package {}\n\n", ctx.config.package_name));

    let mut imports = Vec::new();
    if ctx.needs_fmt_import() {
        imports.push("\"fmt\"");
    }
    imports.sort();
    imports.dedup();
    out.push_str("import (\n");
    for imp in imports {
        out.push_str(&format!("\t{imp}\n"));
    }
    out.push_str(")\n\n");

    for def in ctx.ordered {
        match &def.shape {
            TypeShape::Object { properties } => {
                out.push_str(&render_struct(def, properties));
                out.push('\n');
                out.push_str(&render_from_map(ctx, def, properties));
                out.push('\n');
                out.push_str(&render_to_map(def, properties));
                out.push('\n');
            }
            TypeShape::Union { .. } => {
                out.push_str(&render_union(ctx, def));
                out.push('\n');
            }
            TypeShape::Enum { values } => {
                out.push_str(&render_enum(def, values));
                out.push('\n');
            }
        }
    }

    out
}

fn render_struct(def: &TypeDef, properties: &[Property]) -> String {
    let mut out = String::new();
    if let Some(desc) = &def.description {
        out.push_str(&commentify(desc));
        out.push('\n');
    } else {
        out.push_str(&format!("// {} is a generated type.\n", def.name));
    }
    out.push_str(&format!("type {} struct {{\n", def.name));
    for prop in properties {
        if let Some(desc) = &prop.description {
            for line in desc.lines() {
                out.push_str(&format!("\t// {line}\n"));
            }
        }
        let omitempty = if prop.required { "" } else { ",omitempty" };
        out.push_str(&format!(
            "\t{} {} `json:\"{}{}\"`\n",
            title(&prop.name),
            prop.rendered_type(),
            prop.name,
            omitempty
        ));
    }
    out.push_str("}\n");
    out
}

fn render_from_map(ctx: &EmitContext, def: &TypeDef, properties: &[Property]) -> String {
    let fn_name = ctx.from_map_fn_name(&def.name);
    let mut out = String::new();
    out.push_str(&format!(
        "// {fn_name} builds a {} from a generic map.\n",
        def.name
    ));
    out.push_str(&format!(
        "func {fn_name}(m map[string]interface{{}}) ({}, error) {{\n",
        def.name
    ));
    out.push_str(&format!("\tvar out {}\n", def.name));
    for prop in properties {
        out.push_str(&render_from_map_field(ctx, prop));
    }
    out.push_str("\treturn out, nil\n}\n");
    out
}

/// A scalar's JSON-decoded representation: what to assert `interface{}` to,
/// and (for the numeric Go types, which JSON always decodes as `float64`)
/// the cast needed to reach the field's declared type.
enum ScalarConv {
    /// Assert straight to the field's own type: `string`, `bool`, `float64`.
    Direct(&'static str),
    /// Assert to `float64`, then cast to the narrower numeric type.
    Numeric(&'static str),
    /// No assertion possible or needed: `interface{}`/`any`.
    Any,
}

fn scalar_conv(go_type: &str) -> ScalarConv {
    match go_type {
        "string" => ScalarConv::Direct("string"),
        "bool" => ScalarConv::Direct("bool"),
        "float64" => ScalarConv::Direct("float64"),
        "int" | "int32" | "int64" | "float32" => ScalarConv::Numeric(go_type),
        _ => ScalarConv::Any,
    }
}

/// Renders `\tvar <out> <go_type>\n<assertion against <raw>, erroring via
/// <err_name> on mismatch>\n` assigning the converted value to `<out>`.
fn render_scalar_convert(
    go_type: &str,
    raw: &str,
    out_var: &str,
    err_name: &str,
    indent: &str,
) -> String {
    match scalar_conv(go_type) {
        ScalarConv::Direct(assert_ty) => format!(
            "{indent}{out_var}, ok := {raw}.({assert_ty})\n\
             {indent}if !ok {{\n\
             {indent}\treturn out, fmt.Errorf(\"{err_name}: expected {assert_ty}\")\n\
             {indent}}}\n"
        ),
        ScalarConv::Numeric(go_type) => format!(
            "{indent}{out_var}Raw, ok := {raw}.(float64)\n\
             {indent}if !ok {{\n\
             {indent}\treturn out, fmt.Errorf(\"{err_name}: expected a number\")\n\
             {indent}}}\n\
             {indent}{out_var} := {go_type}({out_var}Raw)\n"
        ),
        ScalarConv::Any => format!("{indent}{out_var} := {raw}\n"),
    }
}

fn render_from_map_field(ctx: &EmitContext, prop: &Property) -> String {
    let field = title(&prop.name);
    let mut out = String::new();
    out.push_str(&format!("\tif raw, ok := m[\"{}\"]; ok {{\n", prop.name));

    if prop.is_ref {
        out.push_str(&format!(
            "\t\tsub, ok := raw.(map[string]interface{{}})\n\t\tif !ok {{\n\t\t\treturn out, fmt.Errorf(\"{}: expected an object\")\n\t\t}}\n\t\tparsed, err := {}(sub)\n\t\tif err != nil {{\n\t\t\treturn out, fmt.Errorf(\"{}: %w\", err)\n\t\t}}\n",
            prop.name,
            ctx.from_map_fn_name(prop.ref_type.as_deref().unwrap_or_default()),
            prop.name
        ));
        if prop.use_pointer {
            out.push_str(&format!("\t\tout.{field} = &parsed\n"));
        } else {
            out.push_str(&format!("\t\tout.{field} = parsed\n"));
        }
    } else if prop.is_array_of_ref {
        let item_type = prop.array_item_type.as_deref().unwrap_or("any");
        let rendered_item = if prop.array_item_use_pointer {
            format!("*{item_type}")
        } else {
            item_type.to_string()
        };
        out.push_str(&format!(
            "\t\titems, ok := raw.([]interface{{}})\n\t\tif !ok {{\n\t\t\treturn out, fmt.Errorf(\"{}: expected an array\")\n\t\t}}\n\t\tparsedItems := make([]{rendered_item}, 0, len(items))\n\t\tfor _, item := range items {{\n\t\t\tsub, ok := item.(map[string]interface{{}})\n\t\t\tif !ok {{\n\t\t\t\treturn out, fmt.Errorf(\"{}: expected an object\")\n\t\t\t}}\n\t\t\tparsed, err := {}(sub)\n\t\t\tif err != nil {{\n\t\t\t\treturn out, fmt.Errorf(\"{}: %w\", err)\n\t\t\t}}\n",
            prop.name,
            prop.name,
            ctx.from_map_fn_name(item_type),
            prop.name
        ));
        if prop.array_item_use_pointer {
            out.push_str("\t\t\tparsedItems = append(parsedItems, &parsed)\n");
        } else {
            out.push_str("\t\t\tparsedItems = append(parsedItems, parsed)\n");
        }
        out.push_str("\t\t}\n");
        out.push_str(&format!("\t\tout.{field} = parsedItems\n"));
    } else if prop.is_array {
        let item_type = prop.array_item_type.as_deref().unwrap_or("any");
        out.push_str(&format!(
            "\t\titems, ok := raw.([]interface{{}})\n\t\tif !ok {{\n\t\t\treturn out, fmt.Errorf(\"{}: expected an array\")\n\t\t}}\n",
            prop.name
        ));
        if matches!(scalar_conv(item_type), ScalarConv::Any) {
            out.push_str(&format!("\t\tout.{field} = items\n"));
        } else {
            out.push_str(&format!("\t\tconverted := make([]{item_type}, 0, len(items))\n"));
            out.push_str("\t\tfor _, item := range items {\n");
            out.push_str(&render_scalar_convert(
                item_type, "item", "v", &prop.name, "\t\t\t",
            ));
            out.push_str("\t\t\tconverted = append(converted, v)\n");
            out.push_str("\t\t}\n");
            out.push_str(&format!("\t\tout.{field} = converted\n"));
        }
    } else if prop.is_map {
        let value_type = prop.map_value_type.as_deref().unwrap_or("any");
        out.push_str(&format!(
            "\t\tsub, ok := raw.(map[string]interface{{}})\n\t\tif !ok {{\n\t\t\treturn out, fmt.Errorf(\"{}: expected an object\")\n\t\t}}\n",
            prop.name
        ));
        if matches!(scalar_conv(value_type), ScalarConv::Any) {
            out.push_str(&format!("\t\tout.{field} = sub\n"));
        } else {
            out.push_str(&format!(
                "\t\tconverted := make(map[string]{value_type}, len(sub))\n"
            ));
            out.push_str("\t\tfor k, item := range sub {\n");
            out.push_str(&render_scalar_convert(
                value_type, "item", "v", &prop.name, "\t\t\t",
            ));
            out.push_str("\t\t\tconverted[k] = v\n");
            out.push_str("\t\t}\n");
            out.push_str(&format!("\t\tout.{field} = converted\n"));
        }
    } else {
        out.push_str(&render_scalar_convert(
            &prop.go_type,
            "raw",
            "v",
            &prop.name,
            "\t\t",
        ));
        out.push_str(&format!("\t\tout.{field} = v\n"));
    }

    out.push_str("\t}");
    if prop.required {
        out.push_str(&format!(
            " else {{\n\t\treturn out, fmt.Errorf(\"{}: required field is missing\")\n\t}}",
            prop.name
        ));
    }
    out.push('\n');
    out
}

fn render_to_map(def: &TypeDef, properties: &[Property]) -> String {
    let mut out = String::new();
    let receiver = receiver_letter(&def.name);
    out.push_str(&format!(
        "// ToMap serializes a {} into a generic map.\n",
        def.name
    ));
    out.push_str(&format!(
        "func ({receiver} {}) ToMap() map[string]interface{{}} {{\n",
        def.name
    ));
    out.push_str("\tm := make(map[string]interface{})\n");
    for prop in properties {
        let field = title(&prop.name);
        if prop.is_ref {
            out.push_str(&format!(
                "\tm[\"{}\"] = {receiver}.{field}.ToMap()\n",
                prop.name
            ));
        } else {
            out.push_str(&format!("\tm[\"{}\"] = {receiver}.{field}\n", prop.name));
        }
    }
    out.push_str("\treturn m\n}\n");
    out
}

fn render_union(ctx: &EmitContext, def: &TypeDef) -> String {
    let mut out = String::new();
    let variants = union_variants(def);
    let field = discriminator_field(def).unwrap_or("kind");

    if let Some(desc) = &def.description {
        out.push_str(&commentify(desc));
        out.push('\n');
    } else {
        out.push_str(&format!(
            "// {} is a tagged union over {}.\n",
            def.name,
            variants.join(", ")
        ));
    }
    out.push_str(&format!("type {} struct {{\n", def.name));
    out.push_str(&format!("\t{} string\n", title(field)));
    for variant in variants {
        out.push_str(&format!("\t{} *{variant}\n", variant));
    }
    out.push_str("}\n\n");

    let fn_name = ctx.from_map_fn_name(&def.name);
    out.push_str(&format!(
        "// {fn_name} dispatches on the '{field}' field to build a {}.\n",
        def.name
    ));
    out.push_str(&format!(
        "func {fn_name}(m map[string]interface{{}}) ({}, error) {{\n",
        def.name
    ));
    out.push_str(&format!("\tvar out {}\n", def.name));
    out.push_str(&format!(
        "\ttag, ok := m[\"{field}\"].(string)\n\tif !ok {{\n\t\treturn out, fmt.Errorf(\"{field}: required field is missing\")\n\t}}\n"
    ));
    out.push_str(&format!("\tout.{} = tag\n", title(field)));
    out.push_str("\tswitch tag {\n");

    let mapping = match &def.shape {
        TypeShape::Union {
            discriminator_mapping,
            ..
        } => discriminator_mapping.clone(),
        _ => Default::default(),
    };
    let mut entries: Vec<(&String, &String)> = mapping.iter().collect();
    entries.sort();
    for (value, variant) in entries {
        out.push_str(&format!("\tcase \"{value}\":\n"));
        out.push_str(&format!(
            "\t\tparsed, err := {}(m)\n\t\tif err != nil {{\n\t\t\treturn out, fmt.Errorf(\"{}: %w\", err)\n\t\t}}\n\t\tout.{} = &parsed\n",
            ctx.from_map_fn_name(variant),
            def.name,
            variant
        ));
    }
    out.push_str(&format!(
        "\tdefault:\n\t\treturn out, fmt.Errorf(\"{field}: unrecognized value %q\", tag)\n"
    ));
    out.push_str("\t}\n\treturn out, nil\n}\n\n");

    let receiver = receiver_letter(&def.name);
    out.push_str(&format!(
        "// ToMap serializes a {} back into the flat map its variant was parsed from.\n",
        def.name
    ));
    out.push_str(&format!(
        "func ({receiver} {}) ToMap() map[string]interface{{}} {{\n",
        def.name
    ));
    out.push_str("\tm := make(map[string]interface{})\n");
    for variant in variants {
        out.push_str(&format!(
            "\tif {receiver}.{variant} != nil {{\n\t\tfor k, v := range {receiver}.{variant}.ToMap() {{\n\t\t\tm[k] = v\n\t\t}}\n\t}}\n"
        ));
    }
    out.push_str(&format!("\tm[\"{field}\"] = {receiver}.{}\n", title(field)));
    out.push_str("\treturn m\n}\n");
    out
}

fn render_enum(def: &TypeDef, values: &[String]) -> String {
    let mut out = String::new();
    if let Some(desc) = &def.description {
        out.push_str(&commentify(desc));
        out.push('\n');
    } else {
        out.push_str(&format!("// {} is a closed set of string values.\n", def.name));
    }
    out.push_str("const (\n");
    for value in values {
        out.push_str(&format!(
            "\t{}{} = \"{}\"\n",
            def.name,
            title(value),
            value
        ));
    }
    out.push_str(")\n\n");
    out.push_str(&format!(
        "// Valid{} reports whether v is a recognized {} value.\n",
        def.name, def.name
    ));
    out.push_str(&format!("func Valid{}(v string) bool {{\n", def.name));
    out.push_str("\tswitch v {\n\tcase ");
    let quoted: Vec<String> = values.iter().map(|v| format!("\"{v}\"")).collect();
    out.push_str(&quoted.join(", "));
    out.push_str(":\n\t\treturn true\n\tdefault:\n\t\treturn false\n\t}\n}\n");
    out
}

fn receiver_letter(type_name: &str) -> String {
    type_name
        .chars()
        .next()
        .map(|c| c.to_lowercase().to_string())
        .unwrap_or_else(|| "r".to_string())
}

//! # Type Modeller
//!
//! Normalizes `components.schemas` (a `utoipa::openapi::Components`) into
//! the `TypeDef`/`Property` model of spec §3, applying the resolution rules
//! of spec §4.3. Every map traversal here sorts keys before emitting, so
//! the resulting list is a deterministic function of the schema text,
//! independent of map-iteration order (spec §9 design note).

use crate::error::{GenError, GenResult};
use heck::ToUpperCamelCase;
use std::collections::{BTreeMap, BTreeSet};
use utoipa::openapi::schema::{AdditionalProperties, ArrayItems, KnownFormat, Schema, SchemaFormat, SchemaType, Type};
use utoipa::openapi::{Components, RefOr};

/// The main entry-point schema name (spec GLOSSARY: "Main schema").
pub const MAIN_SCHEMA_NAME: &str = "Spec";

/// A normalized top-level schema (spec §3 TypeDef).
#[derive(Debug, Clone)]
pub struct TypeDef {
    /// The schema name, used verbatim as the emitted type name.
    pub name: String,
    /// Schema-level description, if any.
    pub description: Option<String>,
    /// What this type def is: a record, a discriminated union, or a promoted enum.
    pub shape: TypeShape,
}

/// The three supported top-level schema shapes.
#[derive(Debug, Clone)]
pub enum TypeShape {
    /// An object with named properties.
    Object {
        /// Properties, already sorted by JSON name.
        properties: Vec<Property>,
    },
    /// A `oneOf`/`anyOf` discriminated union.
    Union {
        /// Referent type names, sorted.
        variants: Vec<String>,
        /// The discriminator's `propertyName`, if one was declared.
        discriminator_field: Option<String>,
        /// Discriminator value -> referent type name.
        discriminator_mapping: BTreeMap<String, String>,
    },
    /// A promoted top-level string enum.
    Enum {
        /// Enum literals, sorted.
        values: Vec<String>,
    },
}

impl TypeDef {
    /// True for [`TypeShape::Union`].
    pub fn is_union(&self) -> bool {
        matches!(self.shape, TypeShape::Union { .. })
    }

    /// True for [`TypeShape::Enum`].
    pub fn is_enum(&self) -> bool {
        matches!(self.shape, TypeShape::Enum { .. })
    }

    /// The object properties, if this is an object type def.
    pub fn properties(&self) -> &[Property] {
        match &self.shape {
            TypeShape::Object { properties } => properties,
            _ => &[],
        }
    }
}

/// A normalized object property (spec §3 Property).
#[derive(Debug, Clone)]
pub struct Property {
    /// JSON field name, preserved verbatim in serialization.
    pub name: String,
    /// CamelCase-converted identifier used for code emission.
    pub ident_name: String,
    /// The resolved base type string (without any pointer marker).
    pub go_type: String,
    /// Property-level description.
    pub description: Option<String>,
    /// Whether this field is in the owning object's `required` set.
    pub required: bool,
    /// Whether the schema declared `nullable: true`.
    pub nullable: bool,
    /// Whether the resolver should render this as an indirection.
    /// Starts as `nullable && !required`; may be forced `true` later by the
    /// dependency resolver to break a value cycle (spec §4.4).
    pub use_pointer: bool,
    /// True if this property is a direct `$ref`.
    pub is_ref: bool,
    /// The referent type name, when `is_ref` is true.
    pub ref_type: Option<String>,
    /// True if this property is an array.
    pub is_array: bool,
    /// The array item's base type string, when `is_array` is true.
    pub array_item_type: Option<String>,
    /// True if this property is an array whose items are a `$ref`.
    pub is_array_of_ref: bool,
    /// Whether the resolver marked the array item for indirection (spec §4.4).
    pub array_item_use_pointer: bool,
    /// True if this property is a free-form map (`additionalProperties`).
    pub is_map: bool,
    /// The map's value type string, when `is_map` is true.
    pub map_value_type: Option<String>,
    /// True if this property carries an inline `enum` constraint.
    pub is_enum: bool,
    /// Inline enum literals, sorted, when `is_enum` is true.
    pub enum_values: Vec<String>,
    /// The schema's declared `default`, rendered as a literal string for
    /// documentation (spec §4.6: the property table carries "type names,
    /// requiredness, description, default").
    pub default: Option<String>,
}

impl Property {
    /// Renders the final type string, applying the pointer marker when
    /// `use_pointer`/`array_item_use_pointer` call for one.
    pub fn rendered_type(&self) -> String {
        if self.is_ref {
            let base = self.ref_type.as_deref().unwrap_or(&self.go_type);
            return if self.use_pointer {
                format!("*{base}")
            } else {
                base.to_string()
            };
        }
        if self.is_array_of_ref {
            let item = self.array_item_type.as_deref().unwrap_or("any");
            return if self.array_item_use_pointer {
                format!("[]*{item}")
            } else {
                format!("[]{item}")
            };
        }
        self.go_type.clone()
    }
}

/// Builds the sorted list of [`TypeDef`]s from a loaded document's
/// components (spec §4.3).
pub fn model_components(components: &Components, raw: &serde_json::Value) -> GenResult<Vec<TypeDef>> {
    let nullable_markers = collect_nullable_markers(raw);

    let mut names: Vec<&String> = components.schemas.keys().collect();
    names.sort();

    let mut defs = Vec::with_capacity(names.len());
    for name in names {
        let node = components.schemas.get(name).expect("key from keys()");
        let schema = match node {
            RefOr::Ref(_) => {
                return Err(GenError::UnsupportedSchemaShape {
                    path: format!("components.schemas.{name}"),
                    reason: "a top-level schema may not itself be a bare $ref".into(),
                })
            }
            RefOr::T(s) => s,
        };
        let def = model_one(name, schema, components, nullable_markers.get(name))?;
        defs.push(def);
    }

    Ok(defs)
}

fn model_one(
    name: &str,
    schema: &Schema,
    components: &Components,
    nullable_props: Option<&BTreeSet<String>>,
) -> GenResult<TypeDef> {
    match schema {
        Schema::OneOf(one_of) => {
            let discriminator = one_of.discriminator.clone();
            let discriminator_field = discriminator.as_ref().map(|d| d.property_name.clone());
            let discriminator_mapping = discriminator
                .map(|d| resolve_discriminator_mapping(d.mapping))
                .unwrap_or_default();

            let mut variants = Vec::new();
            for item in &one_of.items {
                variants.push(variant_name(item, components)?);
            }
            variants.sort();
            variants.dedup();

            Ok(TypeDef {
                name: name.to_string(),
                description: one_of.description.clone(),
                shape: TypeShape::Union {
                    variants,
                    discriminator_field,
                    discriminator_mapping,
                },
            })
        }
        Schema::AnyOf(any_of) => {
            let discriminator = any_of.discriminator.clone();
            let discriminator_field = discriminator.as_ref().map(|d| d.property_name.clone());
            let discriminator_mapping = discriminator
                .map(|d| resolve_discriminator_mapping(d.mapping))
                .unwrap_or_default();

            let mut variants = Vec::new();
            for item in &any_of.items {
                variants.push(variant_name(item, components)?);
            }
            variants.sort();
            variants.dedup();

            Ok(TypeDef {
                name: name.to_string(),
                description: any_of.description.clone(),
                shape: TypeShape::Union {
                    variants,
                    discriminator_field,
                    discriminator_mapping,
                },
            })
        }
        Schema::Object(obj) => {
            if let Some(values) = &obj.enum_values {
                let mut values: Vec<String> = values
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect();
                values.sort();
                return Ok(TypeDef {
                    name: name.to_string(),
                    description: obj.description.clone(),
                    shape: TypeShape::Enum { values },
                });
            }

            let mut prop_names: Vec<&String> = obj.properties.keys().collect();
            prop_names.sort();

            let mut properties = Vec::with_capacity(prop_names.len());
            for prop_name in prop_names {
                let node = obj.properties.get(prop_name).expect("key from keys()");
                let required = obj.required.iter().any(|r| r == prop_name);
                let nullable = nullable_props
                    .map(|set| set.contains(prop_name))
                    .unwrap_or(false);
                let property =
                    resolve_property(prop_name, node, required, nullable, components)?;
                properties.push(property);
            }

            Ok(TypeDef {
                name: name.to_string(),
                description: obj.description.clone(),
                shape: TypeShape::Object { properties },
            })
        }
        other => Err(GenError::UnsupportedSchemaShape {
            path: format!("components.schemas.{name}"),
            reason: format!("unsupported top-level schema shape: {other:?}"),
        }),
    }
}

fn variant_name(item: &RefOr<Schema>, components: &Components) -> GenResult<String> {
    match item {
        RefOr::Ref(r) => {
            let target = extract_ref_name(&r.ref_location).ok_or_else(|| {
                GenError::UnsupportedSchemaShape {
                    path: "oneOf/anyOf".into(),
                    reason: format!(
                        "malformed reference '{}': unions must reference named schemas",
                        r.ref_location
                    ),
                }
            })?;
            if !components.schemas.contains_key(&target) {
                return Err(GenError::UnresolvedReference { name: target });
            }
            Ok(target)
        }
        RefOr::T(_) => Err(GenError::UnsupportedSchemaShape {
            path: "oneOf/anyOf".into(),
            reason: "inline (non-$ref) union variants are not supported".into(),
        }),
    }
}

fn resolve_property(
    name: &str,
    node: &RefOr<Schema>,
    required: bool,
    nullable: bool,
    components: &Components,
) -> GenResult<Property> {
    let ident_name = to_camel(name);
    let use_pointer = nullable && !required;

    let mut prop = Property {
        name: name.to_string(),
        ident_name,
        go_type: "any".to_string(),
        description: None,
        required,
        nullable,
        use_pointer,
        is_ref: false,
        ref_type: None,
        is_array: false,
        array_item_type: None,
        is_array_of_ref: false,
        array_item_use_pointer: false,
        is_map: false,
        map_value_type: None,
        is_enum: false,
        enum_values: Vec::new(),
        default: None,
    };

    match node {
        RefOr::Ref(r) => {
            let target = extract_ref_name(&r.ref_location).ok_or_else(|| {
                GenError::UnresolvedReference {
                    name: r.ref_location.clone(),
                }
            })?;
            let Some(referent) = components.schemas.get(&target) else {
                return Err(GenError::UnresolvedReference { name: target });
            };
            // A $ref to a promoted top-level enum carries no object shape of
            // its own to deserialize through FromMap/ToMap: it renders the
            // same as an inline enum constraint (spec §3's PropertyNode is
            // "either an inline SchemaNode or a Reference" — a reference to
            // an Enum SchemaNode still ends up a plain string property).
            if let Some(values) = promoted_enum_values(referent) {
                prop.is_enum = true;
                prop.enum_values = values;
                prop.go_type = "string".to_string();
            } else {
                prop.is_ref = true;
                prop.go_type = target.clone();
                prop.ref_type = Some(target);
            }
        }
        RefOr::T(Schema::Array(arr)) => {
            prop.is_array = true;
            prop.description = arr.description.clone();
            match &arr.items {
                ArrayItems::RefOrSchema(inner) => match inner.as_ref() {
                    RefOr::Ref(r) => {
                        let target = extract_ref_name(&r.ref_location).ok_or_else(|| {
                            GenError::UnresolvedReference {
                                name: r.ref_location.clone(),
                            }
                        })?;
                        let Some(referent) = components.schemas.get(&target) else {
                            return Err(GenError::UnresolvedReference { name: target });
                        };
                        if promoted_enum_values(referent).is_some() {
                            prop.array_item_type = Some("string".to_string());
                            prop.go_type = "[]string".to_string();
                        } else {
                            prop.is_array_of_ref = true;
                            prop.array_item_type = Some(target.clone());
                            prop.go_type = format!("[]{target}");
                        }
                    }
                    RefOr::T(inner_schema) => {
                        let item_type = resolve_inline_type(inner_schema, components)?;
                        prop.array_item_type = Some(item_type.clone());
                        prop.go_type = format!("[]{item_type}");
                    }
                },
                _ => {
                    return Err(GenError::UnsupportedSchemaShape {
                        path: name.to_string(),
                        reason: "unsupported array 'items' shape".into(),
                    })
                }
            }
        }
        RefOr::T(Schema::Object(obj)) => {
            prop.description = obj.description.clone();
            prop.default = obj.default.as_ref().map(format_default_value);

            if let Some(values) = &obj.enum_values {
                let mut literals: Vec<String> = values
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect();
                literals.sort();
                prop.is_enum = true;
                prop.enum_values = literals;
                prop.go_type = "string".to_string();
            } else if obj.properties.is_empty() && obj.additional_properties.is_some() {
                let value_type = match obj.additional_properties.as_deref() {
                    Some(AdditionalProperties::FreeForm(true)) => "any".to_string(),
                    Some(AdditionalProperties::RefOr(inner)) => match inner {
                        RefOr::Ref(r) => {
                            let target = extract_ref_name(&r.ref_location).ok_or_else(|| {
                                GenError::UnresolvedReference {
                                    name: r.ref_location.clone(),
                                }
                            })?;
                            let Some(referent) = components.schemas.get(&target) else {
                                return Err(GenError::UnresolvedReference { name: target });
                            };
                            if promoted_enum_values(referent).is_some() {
                                "string".to_string()
                            } else {
                                target
                            }
                        }
                        RefOr::T(inner_schema) => resolve_inline_type(inner_schema, components)?,
                    },
                    _ => "any".to_string(),
                };
                prop.is_map = true;
                prop.map_value_type = Some(value_type.clone());
                prop.go_type = format!("map[string]{value_type}");
            } else if obj.properties.is_empty() {
                prop.go_type = primitive_type_string(obj);
            } else {
                // Inline nested object definitions are treated as opaque
                // (spec §4.3: "Object-treated-as-`any`").
                prop.go_type = "any".to_string();
            }
        }
        RefOr::T(_) => {
            // Inline oneOf/anyOf/allOf at property position: unsupported.
            return Err(GenError::UnsupportedSchemaShape {
                path: name.to_string(),
                reason: "inline composition (oneOf/anyOf/allOf) is not supported at property position".into(),
            });
        }
    }

    Ok(prop)
}

/// Resolves a bare type string for a schema that is not itself a named
/// reference (used for array items and map values).
fn resolve_inline_type(schema: &Schema, components: &Components) -> GenResult<String> {
    match schema {
        Schema::Object(obj) => {
            if obj.enum_values.is_some() {
                Ok("string".to_string())
            } else if obj.properties.is_empty() && obj.additional_properties.is_some() {
                let value_type = match obj.additional_properties.as_deref() {
                    Some(AdditionalProperties::FreeForm(true)) => "any".to_string(),
                    Some(AdditionalProperties::RefOr(RefOr::Ref(r))) => {
                        resolve_ref_type_string(r, components)?
                    }
                    Some(AdditionalProperties::RefOr(RefOr::T(inner))) => {
                        resolve_inline_type(inner, components)?
                    }
                    _ => "any".to_string(),
                };
                Ok(format!("map[string]{value_type}"))
            } else if obj.properties.is_empty() {
                Ok(primitive_type_string(obj))
            } else {
                Ok("any".to_string())
            }
        }
        Schema::Array(arr) => match &arr.items {
            ArrayItems::RefOrSchema(inner) => match inner.as_ref() {
                RefOr::Ref(r) => Ok(format!("[]{}", resolve_ref_type_string(r, components)?)),
                RefOr::T(inner_schema) => {
                    Ok(format!("[]{}", resolve_inline_type(inner_schema, components)?))
                }
            },
            _ => Ok("[]any".to_string()),
        },
        _ => Ok("any".to_string()),
    }
}

/// Resolves a `$ref` at a non-property position (array item, map value) to
/// its bare type string: `string` when the referent is a promoted enum (it
/// has no object shape to round-trip through `FromMap`/`ToMap`), otherwise
/// the referenced type's own name.
fn resolve_ref_type_string(r: &utoipa::openapi::Ref, components: &Components) -> GenResult<String> {
    let target = extract_ref_name(&r.ref_location).ok_or_else(|| GenError::UnresolvedReference {
        name: r.ref_location.clone(),
    })?;
    let Some(referent) = components.schemas.get(&target) else {
        return Err(GenError::UnresolvedReference { name: target });
    };
    if promoted_enum_values(referent).is_some() {
        Ok("string".to_string())
    } else {
        Ok(target)
    }
}

/// Returns the sorted enum literal values if `node` resolves to a promoted
/// top-level enum schema (an object with no properties and an `enum` list).
fn promoted_enum_values(node: &RefOr<Schema>) -> Option<Vec<String>> {
    match node {
        RefOr::T(Schema::Object(obj)) if obj.properties.is_empty() => {
            obj.enum_values.as_ref().map(|values| {
                let mut literals: Vec<String> = values
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect();
                literals.sort();
                literals
            })
        }
        _ => None,
    }
}

/// Renders a schema's `default` value as a literal for documentation: a
/// string default is unquoted, everything else uses its JSON text.
fn format_default_value(value: &serde_json::Value) -> String {
    match value.as_str() {
        Some(s) => s.to_string(),
        None => value.to_string(),
    }
}

fn primitive_type_string(obj: &utoipa::openapi::schema::Object) -> String {
    match obj.schema_type {
        SchemaType::Type(Type::String) => "string".to_string(),
        SchemaType::Type(Type::Boolean) => "bool".to_string(),
        SchemaType::Type(Type::Integer) => match &obj.format {
            Some(SchemaFormat::KnownFormat(KnownFormat::Int32)) => "int32".to_string(),
            Some(SchemaFormat::KnownFormat(KnownFormat::Int64)) => "int64".to_string(),
            _ => "int".to_string(),
        },
        SchemaType::Type(Type::Number) => match &obj.format {
            Some(SchemaFormat::KnownFormat(KnownFormat::Float)) => "float32".to_string(),
            _ => "float64".to_string(),
        },
        _ => "any".to_string(),
    }
}

/// Resolves a discriminator's `mapping` values to bare schema names: OpenAPI
/// allows a mapping value to be either a full `#/components/schemas/<Name>`
/// reference (utoipa stores it exactly as authored) or a bare schema name.
/// The emitted code always needs the bare name (spec §3: "discriminatorMapping:
/// value->type name").
fn resolve_discriminator_mapping(
    mapping: impl IntoIterator<Item = (String, String)>,
) -> BTreeMap<String, String> {
    mapping
        .into_iter()
        .map(|(value, target)| (value, extract_ref_name(&target).unwrap_or(target)))
        .collect()
}

fn extract_ref_name(ref_location: &str) -> Option<String> {
    ref_location
        .strip_prefix("#/components/schemas/")
        .filter(|n| !n.is_empty() && !n.contains('/'))
        .map(str::to_string)
}

/// CamelCase-converts a JSON field name for code emission (e.g. `user_id` /
/// `user-id` / `userId` all become `UserId`).
pub fn to_camel(name: &str) -> String {
    name.to_upper_camel_case()
}

/// Scans the raw document for OAS-3.0-style `nullable: true` flags on
/// `components.schemas.<name>.properties.<prop>`.
fn collect_nullable_markers(raw: &serde_json::Value) -> BTreeMap<String, BTreeSet<String>> {
    let mut result = BTreeMap::new();
    let Some(schemas) = raw
        .get("components")
        .and_then(|c| c.get("schemas"))
        .and_then(|s| s.as_object())
    else {
        return result;
    };

    for (schema_name, schema) in schemas {
        let Some(properties) = schema.get("properties").and_then(|p| p.as_object()) else {
            continue;
        };
        let mut nullable_props = BTreeSet::new();
        for (prop_name, prop_schema) in properties {
            if prop_schema.get("nullable").and_then(|v| v.as_bool()) == Some(true) {
                nullable_props.insert(prop_name.clone());
            }
        }
        if !nullable_props.is_empty() {
            result.insert(schema_name.clone(), nullable_props);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::document::load_document;

    const HEADER: &str = "info:\n  title: t\n  version: '1'\npaths: {}";

    fn model(schemas_yaml: &str) -> Vec<TypeDef> {
        let yaml = format!("openapi: 3.1.0\n{HEADER}\ncomponents:\n  schemas:\n{schemas_yaml}");
        let doc = load_document(&yaml).unwrap();
        model_components(&doc.components, &doc.raw).unwrap()
    }

    #[test]
    fn properties_are_sorted_by_json_name() {
        let defs = model(
            "    Spec:\n      type: object\n      properties:\n        zeta: { type: string }\n        alpha: { type: string }\n",
        );
        let spec = defs.iter().find(|d| d.name == "Spec").unwrap();
        let names: Vec<&str> = spec.properties().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn required_and_nullable_drive_use_pointer() {
        let defs = model(
            "    Spec:\n      type: object\n      properties:\n        name: { type: string, nullable: true }\n        id: { type: string, nullable: true }\n      required: [id]\n",
        );
        let spec = defs.iter().find(|d| d.name == "Spec").unwrap();
        let name_prop = spec.properties().iter().find(|p| p.name == "name").unwrap();
        let id_prop = spec.properties().iter().find(|p| p.name == "id").unwrap();
        assert!(name_prop.use_pointer, "nullable and not required => pointer");
        assert!(!id_prop.use_pointer, "required overrides nullable");
    }

    #[test]
    fn array_of_ref_is_flagged() {
        let defs = model(
            "    Node:\n      type: object\n      properties:\n        value: { type: string }\n    Spec:\n      type: object\n      properties:\n        nodes:\n          type: array\n          items: { $ref: '#/components/schemas/Node' }\n",
        );
        let spec = defs.iter().find(|d| d.name == "Spec").unwrap();
        let nodes = spec.properties().iter().find(|p| p.name == "nodes").unwrap();
        assert!(nodes.is_array_of_ref);
        assert_eq!(nodes.array_item_type.as_deref(), Some("Node"));
    }

    #[test]
    fn union_with_discriminator_sorts_variants() {
        let defs = model(
            "    Square:\n      type: object\n      properties:\n        side: { type: integer }\n    Circle:\n      type: object\n      properties:\n        radius: { type: integer }\n    Spec:\n      oneOf:\n        - $ref: '#/components/schemas/Square'\n        - $ref: '#/components/schemas/Circle'\n      discriminator:\n        propertyName: kind\n        mapping:\n          c: '#/components/schemas/Circle'\n          s: '#/components/schemas/Square'\n",
        );
        let spec = defs.iter().find(|d| d.name == "Spec").unwrap();
        match &spec.shape {
            TypeShape::Union { variants, discriminator_field, .. } => {
                assert_eq!(variants, &vec!["Circle".to_string(), "Square".to_string()]);
                assert_eq!(discriminator_field.as_deref(), Some("kind"));
            }
            _ => panic!("expected union"),
        }
    }

    #[test]
    fn discriminator_mapping_values_are_stripped_to_bare_names() {
        let defs = model(
            "    Square:\n      type: object\n      properties:\n        side: { type: integer }\n    Circle:\n      type: object\n      properties:\n        radius: { type: integer }\n    Spec:\n      oneOf:\n        - $ref: '#/components/schemas/Square'\n        - $ref: '#/components/schemas/Circle'\n      discriminator:\n        propertyName: kind\n        mapping:\n          c: '#/components/schemas/Circle'\n          s: Square\n",
        );
        let spec = defs.iter().find(|d| d.name == "Spec").unwrap();
        match &spec.shape {
            TypeShape::Union {
                discriminator_mapping,
                ..
            } => {
                assert_eq!(
                    discriminator_mapping.get("c").map(String::as_str),
                    Some("Circle")
                );
                assert_eq!(
                    discriminator_mapping.get("s").map(String::as_str),
                    Some("Square")
                );
            }
            _ => panic!("expected union"),
        }
    }

    #[test]
    fn dangling_union_variant_is_reported() {
        let yaml = format!(
            "openapi: 3.1.0\n{HEADER}\ncomponents:\n  schemas:\n    Spec:\n      oneOf:\n        - $ref: '#/components/schemas/Ghost'\n"
        );
        let doc = load_document(&yaml).unwrap();
        let err = model_components(&doc.components, &doc.raw).unwrap_err();
        assert!(matches!(err, GenError::UnresolvedReference { .. }));
    }

    #[test]
    fn dangling_reference_is_reported() {
        let yaml = format!(
            "openapi: 3.1.0\n{HEADER}\ncomponents:\n  schemas:\n    Spec:\n      type: object\n      properties:\n        missing:\n          $ref: '#/components/schemas/Ghost'\n"
        );
        let doc = load_document(&yaml).unwrap();
        let err = model_components(&doc.components, &doc.raw).unwrap_err();
        assert!(matches!(err, GenError::UnresolvedReference { .. }));
    }

    #[test]
    fn ref_to_promoted_enum_is_modelled_as_inline_enum_not_object_ref() {
        let defs = model(
            "    Status:\n      type: string\n      enum: [active, retired]\n    Spec:\n      type: object\n      properties:\n        status: { $ref: '#/components/schemas/Status' }\n      required: [status]\n",
        );
        let spec = defs.iter().find(|d| d.name == "Spec").unwrap();
        let status = spec.properties().iter().find(|p| p.name == "status").unwrap();
        assert!(status.is_enum);
        assert!(!status.is_ref);
        assert_eq!(status.go_type, "string");
        assert_eq!(status.enum_values, vec!["active".to_string(), "retired".to_string()]);
    }

    #[test]
    fn array_of_refs_to_a_promoted_enum_is_a_plain_string_slice() {
        let defs = model(
            "    Status:\n      type: string\n      enum: [active, retired]\n    Spec:\n      type: object\n      properties:\n        statuses:\n          type: array\n          items: { $ref: '#/components/schemas/Status' }\n",
        );
        let spec = defs.iter().find(|d| d.name == "Spec").unwrap();
        let statuses = spec.properties().iter().find(|p| p.name == "statuses").unwrap();
        assert!(!statuses.is_array_of_ref);
        assert_eq!(statuses.array_item_type.as_deref(), Some("string"));
        assert_eq!(statuses.go_type, "[]string");
    }

    #[test]
    fn declared_default_is_captured() {
        let defs = model(
            "    Spec:\n      type: object\n      properties:\n        retries: { type: integer, default: 3 }\n        mode: { type: string, default: fast }\n",
        );
        let spec = defs.iter().find(|d| d.name == "Spec").unwrap();
        let retries = spec.properties().iter().find(|p| p.name == "retries").unwrap();
        let mode = spec.properties().iter().find(|p| p.name == "mode").unwrap();
        assert_eq!(retries.default.as_deref(), Some("3"));
        assert_eq!(mode.default.as_deref(), Some("fast"));
    }
}

//! Shape Descriptor Builder — reflects a JSON model definition into the
//! descriptor tree.
//!
//! The definition dialect is a JSON-Schema-like subset: `object` with
//! `properties`/`required`/`title`, `array` with `items`, the four scalar
//! types, `enum`, and `oneOf`/`anyOf` unions of titled objects. Construction
//! is deterministic and side-effect-free; the result for a given definition
//! never changes within a process, so callers may cache it freely.

use serde_json::{Map, Value};

use crate::error::SchemaError;
use crate::shape::{Field, ObjectShape, PrimitiveKind, Shape};

/// Build the descriptor for a model definition.
///
/// Fails if the definition contains a construct the tag dialect cannot
/// address — most notably a list whose item type is a bare primitive, which
/// has no element name of its own to repeat under.
pub fn build_descriptor(definition: &Value) -> Result<Shape, SchemaError> {
    build_shape(definition, "#", None)
}

fn build_shape(def: &Value, path: &str, name_hint: Option<&str>) -> Result<Shape, SchemaError> {
    let obj = def.as_object().ok_or_else(|| SchemaError::Invalid {
        path: path.to_string(),
        message: "definition must be a JSON object".to_string(),
    })?;

    if let Some(variants) = obj.get("enum") {
        return build_enumeration(variants, obj, path, name_hint);
    }
    if let Some(branches) = obj.get("oneOf").or_else(|| obj.get("anyOf")) {
        return build_alternatives(branches, path);
    }

    match obj.get("type").and_then(Value::as_str) {
        Some("object") => build_object(obj, path, name_hint),
        Some("array") => build_list(obj, path, name_hint),
        Some("string") => Ok(Shape::Primitive {
            kind: PrimitiveKind::String,
        }),
        Some("integer") => Ok(Shape::Primitive {
            kind: PrimitiveKind::Integer,
        }),
        Some("number") => Ok(Shape::Primitive {
            kind: PrimitiveKind::Float,
        }),
        Some("boolean") => Ok(Shape::Primitive {
            kind: PrimitiveKind::Boolean,
        }),
        Some(other) => Err(SchemaError::Unsupported {
            path: path.to_string(),
            feature: format!("type \"{other}\""),
        }),
        None => Err(SchemaError::Invalid {
            path: path.to_string(),
            message: "definition needs a type, enum, oneOf, or anyOf".to_string(),
        }),
    }
}

fn build_object(
    obj: &Map<String, Value>,
    path: &str,
    name_hint: Option<&str>,
) -> Result<Shape, SchemaError> {
    let name = tag_for(obj, path, name_hint, "object")?;

    let required: Vec<&str> = obj
        .get("required")
        .and_then(Value::as_array)
        .map(|entries| entries.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let mut fields = Vec::new();
    if let Some(properties) = obj.get("properties").and_then(Value::as_object) {
        for (key, prop) in properties {
            let child_path = format!("{path}/properties/{key}");
            let shape = build_shape(prop, &child_path, Some(key))?;
            fields.push(Field {
                name: key.clone(),
                shape,
                optional: !required.contains(&key.as_str()),
                description: prop
                    .get("description")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            });
        }
    }

    Ok(Shape::Object(ObjectShape { name, fields }))
}

fn build_list(
    obj: &Map<String, Value>,
    path: &str,
    name_hint: Option<&str>,
) -> Result<Shape, SchemaError> {
    let name = tag_for(obj, path, name_hint, "array")?;

    let items = obj.get("items").ok_or_else(|| SchemaError::Invalid {
        path: path.to_string(),
        message: "array definition is missing items".to_string(),
    })?;
    let item_path = format!("{path}/items");
    let item = build_shape(items, &item_path, None)?;

    match &item {
        Shape::Primitive { .. } => {
            return Err(SchemaError::PrimitiveListItem {
                path: item_path.clone(),
            })
        }
        Shape::Alternatives { .. } => {}
        other if other.tag_name().is_empty() => {
            return Err(SchemaError::Invalid {
                path: item_path.clone(),
                message: "list items must declare a title (their element tag)".to_string(),
            })
        }
        _ => {}
    }

    Ok(Shape::List {
        name,
        item: Box::new(item),
    })
}

fn build_enumeration(
    variants: &Value,
    obj: &Map<String, Value>,
    path: &str,
    name_hint: Option<&str>,
) -> Result<Shape, SchemaError> {
    let entries = variants.as_array().ok_or_else(|| SchemaError::Invalid {
        path: path.to_string(),
        message: "enum must be an array".to_string(),
    })?;
    if entries.is_empty() {
        return Err(SchemaError::Invalid {
            path: path.to_string(),
            message: "enumeration needs at least one variant".to_string(),
        });
    }
    let mut names = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry.as_str() {
            Some(s) => names.push(s.to_string()),
            None => {
                return Err(SchemaError::Unsupported {
                    path: path.to_string(),
                    feature: "non-string enumeration variants".to_string(),
                })
            }
        }
    }

    let name = obj
        .get("title")
        .and_then(Value::as_str)
        .map(derive_tag)
        .or_else(|| name_hint.map(str::to_string))
        .unwrap_or_default();

    Ok(Shape::Enumeration {
        name,
        variants: names,
    })
}

fn build_alternatives(branches: &Value, path: &str) -> Result<Shape, SchemaError> {
    let entries = branches.as_array().ok_or_else(|| SchemaError::Invalid {
        path: path.to_string(),
        message: "oneOf/anyOf must be an array".to_string(),
    })?;

    let mut out = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        let branch_path = format!("{path}/oneOf/{i}");
        match build_shape(entry, &branch_path, None)? {
            Shape::Object(object) => out.push(object),
            _ => {
                return Err(SchemaError::Unsupported {
                    path: branch_path,
                    feature: "alternative branches must be titled object definitions".to_string(),
                })
            }
        }
    }
    Ok(Shape::Alternatives { branches: out })
}

/// The element tag for a definition: its snake_cased `title`, the owning
/// field's name, or `root` for the document root.
fn tag_for(
    obj: &Map<String, Value>,
    path: &str,
    name_hint: Option<&str>,
    what: &str,
) -> Result<String, SchemaError> {
    if let Some(title) = obj.get("title").and_then(Value::as_str) {
        return Ok(derive_tag(title));
    }
    if let Some(hint) = name_hint {
        return Ok(hint.to_string());
    }
    if path == "#" {
        return Ok("root".to_string());
    }
    Err(SchemaError::Invalid {
        path: path.to_string(),
        message: format!("{what} definition must declare a title"),
    })
}

/// Deterministic CamelCase → snake_case tag derivation.
fn derive_tag(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
            prev_lower = false;
        } else {
            prev_lower = ch.is_ascii_lowercase() || ch.is_ascii_digit();
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_derive_tag() {
        assert_eq!(derive_tag("Movie"), "movie");
        assert_eq!(derive_tag("ResponseObject"), "response_object");
        assert_eq!(derive_tag("CreateAction"), "create_action");
        assert_eq!(derive_tag("already_snake"), "already_snake");
    }

    #[test]
    fn test_builds_nested_object_descriptor() {
        let shape = build_descriptor(&json!({
            "type": "object",
            "title": "Response",
            "properties": {
                "objective": { "type": "string", "description": "What to find" },
                "results": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "title": "SearchResult",
                        "properties": {
                            "chunk_id": { "type": "string" },
                            "score": { "type": "number" }
                        },
                        "required": ["chunk_id", "score"]
                    }
                }
            },
            "required": ["objective", "results"]
        }))
        .unwrap();

        let Shape::Object(object) = &shape else {
            panic!("expected an object descriptor")
        };
        assert_eq!(object.name, "response");
        assert_eq!(object.fields.len(), 2);
        assert_eq!(object.fields[0].name, "objective");
        assert_eq!(
            object.fields[0].description.as_deref(),
            Some("What to find")
        );

        let Shape::List { item, .. } = &object.fields[1].shape else {
            panic!("expected a list descriptor")
        };
        assert_eq!(item.tag_name(), "search_result");
    }

    #[test]
    fn test_optionality_follows_required() {
        let shape = build_descriptor(&json!({
            "type": "object",
            "properties": {
                "name": { "type": "string" },
                "nickname": { "type": "string" }
            },
            "required": ["name"]
        }))
        .unwrap();

        let Shape::Object(object) = &shape else {
            panic!("expected an object descriptor")
        };
        assert!(!object.fields[0].optional);
        assert!(object.fields[1].optional);
    }

    #[test]
    fn test_bare_primitive_list_item_is_rejected() {
        let result = build_descriptor(&json!({
            "type": "object",
            "properties": {
                "movies": { "type": "array", "items": { "type": "string" } }
            }
        }));
        assert!(matches!(
            result,
            Err(SchemaError::PrimitiveListItem { path }) if path == "#/properties/movies/items"
        ));
    }

    #[test]
    fn test_untitled_list_item_object_is_rejected() {
        let result = build_descriptor(&json!({
            "type": "array",
            "title": "Entries",
            "items": { "type": "object", "properties": {} }
        }));
        assert!(matches!(result, Err(SchemaError::Invalid { .. })));
    }

    #[test]
    fn test_enumeration_keeps_declared_order() {
        let shape = build_descriptor(&json!({
            "type": "object",
            "properties": {
                "file_operation": { "enum": ["open", "edit", "create"] }
            },
            "required": ["file_operation"]
        }))
        .unwrap();

        let Shape::Object(object) = &shape else {
            panic!("expected an object descriptor")
        };
        assert_eq!(
            object.fields[0].shape,
            Shape::enumeration("file_operation", ["open", "edit", "create"])
        );
    }

    #[test]
    fn test_alternatives_require_titled_objects() {
        let result = build_descriptor(&json!({
            "type": "object",
            "properties": {
                "value": { "oneOf": [ { "type": "string" } ] }
            }
        }));
        assert!(matches!(result, Err(SchemaError::Unsupported { .. })));
    }

    #[test]
    fn test_alternatives_branch_tags() {
        let shape = build_descriptor(&json!({
            "type": "object",
            "properties": {
                "actions": {
                    "type": "array",
                    "items": { "oneOf": [
                        {
                            "type": "object",
                            "title": "CreateAction",
                            "properties": { "new_file_path": { "type": "string" } },
                            "required": ["new_file_path"]
                        },
                        {
                            "type": "object",
                            "title": "RunCommand",
                            "properties": { "command": { "type": "string" } },
                            "required": ["command"]
                        }
                    ] }
                }
            },
            "required": ["actions"]
        }))
        .unwrap();

        let Shape::Object(object) = &shape else {
            panic!("expected an object descriptor")
        };
        let Shape::List { item, .. } = &object.fields[0].shape else {
            panic!("expected a list descriptor")
        };
        let Shape::Alternatives { branches } = item.as_ref() else {
            panic!("expected alternatives")
        };
        let tags: Vec<&str> = branches.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(tags, vec!["create_action", "run_command"]);
    }

    #[test]
    fn test_unknown_type_is_unsupported() {
        let result = build_descriptor(&json!({ "type": "null" }));
        assert!(matches!(result, Err(SchemaError::Unsupported { .. })));
    }
}

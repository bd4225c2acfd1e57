//! Default Completion — fills every required, unobserved field with a
//! type-appropriate empty value so a structurally valid result can always be
//! handed to the caller, no matter how little of the buffer was consumable.

use serde_json::{Map, Value};

use crate::shape::{ObjectShape, Shape};

/// Complete a possibly-absent value against its descriptor. `Null` stands
/// for "nothing observed".
pub(crate) fn complete_value(value: Value, shape: &Shape) -> Value {
    if value.is_null() {
        return default_value(shape);
    }
    complete_present(value, shape)
}

/// The zero value for an unobserved required slot.
pub(crate) fn default_value(shape: &Shape) -> Value {
    match shape {
        Shape::Primitive { kind } => kind.zero_value(),
        Shape::Enumeration { variants, .. } => {
            Value::String(variants.first().cloned().unwrap_or_default())
        }
        Shape::Object(object) => complete_object(Map::new(), object),
        Shape::List { .. } => Value::Array(Vec::new()),
        // Mirrors the enumeration default: the first branch, fully completed.
        Shape::Alternatives { branches } => match branches.first() {
            Some(branch) => complete_object(Map::new(), branch),
            None => Value::Object(Map::new()),
        },
    }
}

/// Recurse into a value that was actually observed, so the guarantee covers
/// the descriptor's full closure and not just the top level.
fn complete_present(value: Value, shape: &Shape) -> Value {
    match (shape, value) {
        (Shape::Object(object), Value::Object(map)) => complete_object(map, object),
        (Shape::List { item, .. }, Value::Array(values)) => Value::Array(
            values
                .into_iter()
                .map(|v| complete_present(v, item))
                .collect(),
        ),
        (Shape::Alternatives { branches }, Value::Object(map)) => {
            complete_alternatives(map, branches)
        }
        (_, other) => other,
    }
}

/// Fill the gaps of a partially populated object map. Optional unobserved
/// fields stay absent; everything else gets its zero value.
pub(crate) fn complete_object(mut map: Map<String, Value>, object: &ObjectShape) -> Value {
    for field in &object.fields {
        match map.get(&field.name) {
            Some(present) if !present.is_null() => {
                let completed = complete_present(present.clone(), &field.shape);
                map.insert(field.name.clone(), completed);
            }
            Some(_) if field.optional => {
                map.remove(&field.name);
            }
            None if field.optional => {}
            _ => {
                map.insert(field.name.clone(), default_value(&field.shape));
            }
        }
    }
    Value::Object(map)
}

/// Complete a value occupying an alternatives slot. The branch is chosen by
/// field-name overlap with what was observed, defaulting to the first.
pub(crate) fn complete_alternatives(map: Map<String, Value>, branches: &[ObjectShape]) -> Value {
    let branch = branches
        .iter()
        .find(|b| b.fields.iter().any(|f| map.contains_key(&f.name)))
        .or_else(|| branches.first());
    match branch {
        Some(branch) => complete_object(map, branch),
        None => Value::Object(map),
    }
}

//! Shape Descriptor — the static typed tree describing the target result
//! structure.
//!
//! Built once per target model (see [`crate::builder`]) and read-only
//! thereafter; the incremental matcher walks it on every call but never
//! mutates it, so a descriptor may be cached and shared across threads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Primitive leaf kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    String,
    Integer,
    Float,
    Boolean,
}

impl PrimitiveKind {
    /// The value an unobserved required field of this kind completes to.
    pub fn zero_value(self) -> Value {
        match self {
            PrimitiveKind::String => Value::String(String::new()),
            PrimitiveKind::Integer => Value::from(0),
            PrimitiveKind::Float => Value::from(0.0),
            PrimitiveKind::Boolean => Value::Bool(false),
        }
    }
}

/// One named slot of an object shape.
///
/// The field name doubles as the element tag delimiting the slot in the text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub shape: Shape,
    /// Optional slots are omitted from the result when unobserved instead of
    /// being filled with a zero value.
    #[serde(default)]
    pub optional: bool,
    /// Free-text description carried into rendered format instructions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Field {
    pub fn required(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
            optional: false,
            description: None,
        }
    }

    pub fn optional(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
            optional: true,
            description: None,
        }
    }
}

/// An object shape with ordered fields.
///
/// `name` is the element tag this object occupies when it appears as a list
/// item or an alternative branch; as a field, the field name is the tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectShape {
    pub name: String,
    pub fields: Vec<Field>,
}

impl ObjectShape {
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }
}

/// A node of the descriptor tree.
///
/// Serializes as an internally tagged variant tree, so descriptors can be
/// stored or shipped alongside the prompts that reference them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Primitive {
        kind: PrimitiveKind,
    },
    /// Ordered variants; `"1"` in the text selects the first, and the first
    /// is the default for unobserved or unparseable values.
    Enumeration {
        name: String,
        variants: Vec<String>,
    },
    Object(ObjectShape),
    List {
        name: String,
        item: Box<Shape>,
    },
    /// Exactly one of several object shapes may occupy the slot; the branch
    /// is selected by which branch's own tag actually opens in the text.
    Alternatives {
        branches: Vec<ObjectShape>,
    },
}

impl Shape {
    pub fn string() -> Self {
        Shape::Primitive {
            kind: PrimitiveKind::String,
        }
    }

    pub fn integer() -> Self {
        Shape::Primitive {
            kind: PrimitiveKind::Integer,
        }
    }

    pub fn float() -> Self {
        Shape::Primitive {
            kind: PrimitiveKind::Float,
        }
    }

    pub fn boolean() -> Self {
        Shape::Primitive {
            kind: PrimitiveKind::Boolean,
        }
    }

    pub fn enumeration(
        name: impl Into<String>,
        variants: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Shape::Enumeration {
            name: name.into(),
            variants: variants.into_iter().map(Into::into).collect(),
        }
    }

    pub fn object(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Shape::Object(ObjectShape::new(name, fields))
    }

    pub fn list(name: impl Into<String>, item: Shape) -> Self {
        Shape::List {
            name: name.into(),
            item: Box::new(item),
        }
    }

    pub fn alternatives(branches: Vec<ObjectShape>) -> Self {
        Shape::Alternatives { branches }
    }

    /// The element tag intrinsic to this shape — what delimits it as a list
    /// item or alternative branch. Empty for shapes that are only ever
    /// addressed through a field slot.
    pub fn tag_name(&self) -> &str {
        match self {
            Shape::Object(object) => &object.name,
            Shape::List { name, .. } => name,
            Shape::Enumeration { name, .. } => name,
            Shape::Primitive { .. } | Shape::Alternatives { .. } => "",
        }
    }
}

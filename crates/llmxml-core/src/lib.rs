//! Schema-directed incremental parser for the XML-ish tag soup LLMs emit
//! while streaming structured output.
//!
//! A JSON model definition is reflected once into a [`Shape`] descriptor;
//! every buffer snapshot is then parsed from scratch against it. Parsing is
//! total: whatever the buffer looks like, the result is a JSON value whose
//! required fields are all present, with unobserved ones filled in with
//! type-appropriate defaults.
//!
//! ```
//! use serde_json::json;
//!
//! let shape = llmxml_core::build_descriptor(&json!({
//!     "type": "object",
//!     "title": "Response",
//!     "properties": {
//!         "movies": {
//!             "type": "array",
//!             "items": {
//!                 "type": "object",
//!                 "title": "Movie",
//!                 "properties": { "title": { "type": "string" } },
//!                 "required": ["title"]
//!             }
//!         }
//!     },
//!     "required": ["movies"]
//! }))?;
//!
//! let value = llmxml_core::parse(
//!     &shape,
//!     "<movies><movie><title>Heat</title></movie></movies>",
//! );
//! assert_eq!(value, json!({ "movies": [ { "title": "Heat" } ] }));
//! # Ok::<(), llmxml_core::SchemaError>(())
//! ```

pub mod builder;
pub mod error;
pub mod prompt;
pub mod shape;

mod candidates;
mod complete;
mod matcher;
mod normalize;
mod scalar;

pub use builder::build_descriptor;
pub use error::SchemaError;
pub use prompt::{render_instructions, render_schema};
pub use shape::{Field, ObjectShape, PrimitiveKind, Shape};

use serde_json::Value;

use candidates::NodeView;

/// Parse a buffer snapshot against a descriptor.
///
/// Never fails. The buffer is normalized first; if the strict pass yields no
/// usable content from a non-empty buffer, a lenient pass auto-closes
/// dangling tags and tries again. The result is always completed to the
/// descriptor's full required closure.
pub fn parse(shape: &Shape, buffer: &str) -> Value {
    let cleaned = normalize::strict_clean(buffer);
    let view = NodeView::of(shape);
    let (mut value, _, has_content) = matcher::match_node(cleaned, shape.tag_name(), view, 0);

    if !has_content && !cleaned.is_empty() {
        tracing::debug!(len = cleaned.len(), "strict pass found no content, retrying leniently");
        let repaired = normalize::close_dangling(cleaned);
        let (retried, _, retried_content) =
            matcher::match_node(&repaired, shape.tag_name(), view, 0);
        if retried_content {
            value = retried;
        }
    }

    complete::complete_value(value, shape)
}

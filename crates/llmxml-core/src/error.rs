//! Error types for descriptor construction.

use thiserror::Error;

/// The only error surfaced to callers.
///
/// Parsing itself never fails — anything wrong with the buffer degrades to a
/// partial or default value — so this covers descriptor construction alone,
/// where it indicates the target model itself is unsupported.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema error at {path}: {message}")]
    Invalid { path: String, message: String },

    #[error(
        "bare-primitive list item at {path}: list items must be addressable by a tag; \
         wrap the value in a named object"
    )]
    PrimitiveListItem { path: String },

    #[error("unsupported definition at {path}: {feature}")]
    Unsupported { path: String, feature: String },
}

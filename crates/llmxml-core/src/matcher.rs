//! Incremental Matcher — recursive descent over a partial buffer against a
//! descriptor node.
//!
//! Re-invoked from scratch on every buffer growth; no parser state is carried
//! between calls. The matcher never fails: malformed input degrades to
//! truncation handling or to empty values that default completion fills in.

use serde_json::{Map, Value};

use crate::candidates::{candidates, Candidate, NodeView};
use crate::complete;
use crate::scalar;

/// Match `buffer[pos..]` against the node occupying the element `tag`.
///
/// Returns the reconstructed value, the cursor position after the consumed
/// input, and whether the subtree produced observed (non-default) content —
/// the bit a list consults to decide whether a just-parsed item is kept.
pub(crate) fn match_node(
    buffer: &str,
    tag: &str,
    view: NodeView<'_>,
    mut pos: usize,
) -> (Value, usize, bool) {
    let cands = candidates(view, &[tag]);
    let open_needles: Vec<(String, Candidate<'_>)> = cands
        .iter()
        .map(|c| (format!("<{}>", c.tag), *c))
        .collect();
    let open_tag = format!("<{}>", tag);
    let close_tag = format!("</{}>", tag);

    let mut fields: Map<String, Value> = Map::new();
    let mut items: Vec<Value> = Vec::new();
    let mut has_child_content = false;

    while pos < buffer.len() {
        let open_match = open_needles
            .iter()
            .filter_map(|(needle, cand)| {
                buffer[pos..]
                    .find(needle.as_str())
                    .map(|i| (pos + i, needle.len(), *cand))
            })
            .min_by_key(|(at, _, _)| *at);
        let close_at = buffer[pos..].find(close_tag.as_str()).map(|i| pos + i);

        // A legal child opens before this node closes: descend into it.
        if let Some((at, needle_len, cand)) =
            open_match.filter(|(at, _, _)| close_at.map_or(true, |c| *at < c))
        {
            let (value, new_pos, child_content) =
                match_node(buffer, cand.tag, cand.view, at + needle_len);
            has_child_content |= child_content;
            match view {
                NodeView::List(_) => {
                    if child_content {
                        items.push(value);
                    }
                }
                _ => {
                    // A later empty observation never overwrites an earlier
                    // richer one.
                    if !is_empty_value(&value) {
                        fields.insert(cand.key.to_string(), value);
                    }
                }
            }
            pos = new_pos;
            continue;
        }

        // Our own closing tag arrives first: this subtree is complete.
        if let Some(at) = close_at {
            let end = at + close_tag.len();
            return match view {
                // An empty closed list is still a found list, unlike the
                // unresolved empty list of the truncated case below.
                NodeView::List(_) => (Value::Array(items), end, true),
                NodeView::Object(_) | NodeView::Alternatives(_) => {
                    (Value::Object(fields), end, true)
                }
                NodeView::Primitive(kind) => {
                    let raw = raw_text(buffer, &open_tag, pos, at);
                    (
                        scalar::coerce_primitive(kind, raw).unwrap_or(Value::Null),
                        end,
                        true,
                    )
                }
                NodeView::Enumeration(variants) => {
                    let raw = raw_text(buffer, &open_tag, pos, at);
                    (
                        scalar::coerce_variant(variants, raw).unwrap_or(Value::Null),
                        end,
                        true,
                    )
                }
            };
        }

        // Neither tag occurs again: the buffer was truncated mid-subtree.
        return match view {
            NodeView::List(item) => {
                if items.is_empty() {
                    (Value::Array(items), buffer.len(), false)
                } else {
                    // The final item was cut off mid-way; backfill its gaps.
                    let last = items.len() - 1;
                    let cut = items[last].take();
                    items[last] = complete::complete_value(cut, item);
                    (Value::Array(items), buffer.len(), false)
                }
            }
            NodeView::Object(object) => {
                (complete::complete_object(fields, object), buffer.len(), false)
            }
            NodeView::Alternatives(branches) => (
                complete::complete_alternatives(fields, branches),
                buffer.len(),
                false,
            ),
            // No closing tag yet: the value is in progress, take everything
            // after this node's last opening tag.
            NodeView::Primitive(kind) => {
                let raw = raw_text(buffer, &open_tag, pos, buffer.len());
                (
                    scalar::coerce_primitive(kind, raw).unwrap_or(Value::Null),
                    buffer.len(),
                    true,
                )
            }
            NodeView::Enumeration(variants) => {
                let raw = raw_text(buffer, &open_tag, pos, buffer.len());
                (
                    scalar::coerce_variant(variants, raw).unwrap_or(Value::Null),
                    buffer.len(),
                    true,
                )
            }
        };
    }

    // The buffer ran out exactly at a consumption boundary.
    match view {
        NodeView::List(_) => (Value::Array(items), buffer.len(), has_child_content),
        NodeView::Object(object) => (
            complete::complete_object(fields, object),
            buffer.len(),
            has_child_content,
        ),
        NodeView::Alternatives(branches) => (
            complete::complete_alternatives(fields, branches),
            buffer.len(),
            has_child_content,
        ),
        NodeView::Primitive(_) | NodeView::Enumeration(_) => (Value::Null, buffer.len(), false),
    }
}

/// Text between the last occurrence of `open_tag` before `end` and `end`.
fn raw_text<'a>(buffer: &'a str, open_tag: &str, fallback: usize, end: usize) -> &'a str {
    let start = buffer[..end]
        .rfind(open_tag)
        .map(|i| i + open_tag.len())
        .unwrap_or(fallback);
    &buffer[start.min(end)..end]
}

/// The conservative assignment rule: `""`, `[]`, `{}`, and null are empty;
/// numbers and booleans never are.
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Number(_) | Value::Bool(_) => false,
    }
}

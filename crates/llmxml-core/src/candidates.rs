//! Candidate Tag Resolver — which element names may legally open beneath a
//! descriptor node.
//!
//! A pure function of the descriptor; no parsing state. Alternative branches
//! are flattened one level into the scope of the field (or list) that owns
//! them — deeper alternatives resolve when the matcher descends into a
//! branch, not eagerly.

use crate::shape::{ObjectShape, PrimitiveKind, Shape};

/// Borrowed view of a descriptor node as the matcher descends. Alternative
/// branches surface as plain object views, so the matcher never has to
/// resolve a union itself.
#[derive(Clone, Copy)]
pub(crate) enum NodeView<'a> {
    Primitive(PrimitiveKind),
    Enumeration(&'a [String]),
    Object(&'a ObjectShape),
    List(&'a Shape),
    Alternatives(&'a [ObjectShape]),
}

impl<'a> NodeView<'a> {
    pub(crate) fn of(shape: &'a Shape) -> Self {
        match shape {
            Shape::Primitive { kind } => NodeView::Primitive(*kind),
            Shape::Enumeration { variants, .. } => NodeView::Enumeration(variants),
            Shape::Object(object) => NodeView::Object(object),
            Shape::List { item, .. } => NodeView::List(item),
            Shape::Alternatives { branches } => NodeView::Alternatives(branches),
        }
    }
}

/// One legally openable child element.
#[derive(Clone, Copy)]
pub(crate) struct Candidate<'a> {
    /// Element name that opens this child.
    pub tag: &'a str,
    /// Key the child's value is stored under in the parent map: the field
    /// name, which for a flattened alternative branch is the owning field's
    /// name rather than the branch tag.
    pub key: &'a str,
    pub view: NodeView<'a>,
}

/// The tag names legally openable as an immediate child of `view`, in
/// declaration order, minus `excluding` (always at minimum the current
/// node's own tag, so a node never matches itself as a child).
///
/// Tag-name collisions within one scope are undefined behavior; the matcher
/// simply takes whichever candidate occurs earliest in the buffer.
pub(crate) fn candidates<'a>(view: NodeView<'a>, excluding: &[&str]) -> Vec<Candidate<'a>> {
    let mut out = Vec::new();
    match view {
        NodeView::Object(object) => {
            for field in &object.fields {
                push_field(&mut out, &field.name, &field.shape);
            }
        }
        NodeView::List(item) => push_item(&mut out, item),
        NodeView::Alternatives(branches) => push_branches(&mut out, branches, None),
        NodeView::Primitive(_) | NodeView::Enumeration(_) => {}
    }
    out.retain(|c| !excluding.contains(&c.tag));
    out
}

fn push_field<'a>(out: &mut Vec<Candidate<'a>>, key: &'a str, shape: &'a Shape) {
    match shape {
        Shape::Alternatives { branches } => push_branches(out, branches, Some(key)),
        other => out.push(Candidate {
            tag: key,
            key,
            view: NodeView::of(other),
        }),
    }
}

fn push_item<'a>(out: &mut Vec<Candidate<'a>>, item: &'a Shape) {
    match item {
        Shape::Alternatives { branches } => push_branches(out, branches, None),
        other => {
            let tag = other.tag_name();
            // Bare-primitive items are rejected at build time; an empty tag
            // here means there is nothing addressable to open.
            if !tag.is_empty() {
                out.push(Candidate {
                    tag,
                    key: tag,
                    view: NodeView::of(other),
                });
            }
        }
    }
}

fn push_branches<'a>(out: &mut Vec<Candidate<'a>>, branches: &'a [ObjectShape], key: Option<&'a str>) {
    for branch in branches {
        out.push(Candidate {
            tag: &branch.name,
            key: key.unwrap_or(&branch.name),
            view: NodeView::Object(branch),
        });
    }
}

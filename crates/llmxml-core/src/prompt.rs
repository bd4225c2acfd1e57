//! Prompt rendering — turns a descriptor into the tag-format instructions a
//! model is shown before it is asked to stream a response.
//!
//! The rendered text mirrors what the parser accepts: one element per field,
//! nested for objects, a single item template for lists, and numbered option
//! blocks for alternatives.

use std::fmt::Write;

use crate::shape::{Field, ObjectShape, Shape};

const FORMAT_RULES: &str = "\
Respond using the XML-style tag format described below.
- Wrap every value in its opening and closing tags, e.g. <title>Heat</title>.
- Emit list items by repeating the item element inside the list element.
- For enumerated fields you may answer with the choice itself or with its
  1-based index into the listed choices.
- Do not emit any tags that are not part of the schema.
";

/// Render the full instruction block for a descriptor, wrapped in
/// `<response_instructions>`.
pub fn render_instructions(shape: &Shape) -> String {
    let mut out = String::new();
    out.push_str("<response_instructions>\n");
    out.push_str(FORMAT_RULES);
    out.push_str("\nRequested Response Schema:\n\n");
    out.push_str(&render_schema(shape));
    out.push_str(
        "\nMake sure to return an instance of the output, NOT the schema \
         itself. Begin your response with the opening tag of the root \
         element.\n",
    );
    out.push_str("</response_instructions>\n");
    out
}

/// Render just the schema skeleton, without the surrounding instructions.
pub fn render_schema(shape: &Shape) -> String {
    let mut out = String::new();
    render_shape(&mut out, shape, shape.tag_name(), 0);
    out
}

fn render_shape(out: &mut String, shape: &Shape, tag: &str, depth: usize) {
    match shape {
        Shape::Object(object) => render_element(out, tag, depth, |out, depth| {
            for field in &object.fields {
                render_field(out, field, depth);
            }
        }),
        Shape::List { item, .. } => render_element(out, tag, depth, |out, depth| {
            render_shape(out, item, item.tag_name(), depth);
        }),
        Shape::Alternatives { branches } => render_branches(out, branches, depth),
        Shape::Primitive { .. } | Shape::Enumeration { .. } => {
            render_element(out, tag, depth, |out, depth| {
                annotate(out, depth, &type_info(shape));
            })
        }
    }
}

fn render_field(out: &mut String, field: &Field, depth: usize) {
    if let Shape::Alternatives { branches } = &field.shape {
        render_element(out, &field.name, depth, |out, depth| {
            field_annotations(out, field, depth);
            render_branches(out, branches, depth);
        });
        return;
    }
    render_element(out, &field.name, depth, |out, depth| {
        field_annotations(out, field, depth);
        match &field.shape {
            Shape::Object(object) => {
                for child in &object.fields {
                    render_field(out, child, depth);
                }
            }
            Shape::List { item, .. } => render_shape(out, item, item.tag_name(), depth),
            _ => {}
        }
    });
}

fn field_annotations(out: &mut String, field: &Field, depth: usize) {
    annotate(out, depth, &type_info(&field.shape));
    annotate(out, depth, if field.optional { "optional" } else { "required" });
    if let Some(description) = &field.description {
        annotate(out, depth, description);
    }
}

fn render_branches(out: &mut String, branches: &[ObjectShape], depth: usize) {
    for (i, branch) in branches.iter().enumerate() {
        if i > 0 {
            indent(out, depth);
            out.push_str("OR\n");
        }
        indent(out, depth);
        let _ = writeln!(out, "# Option {}: {}", i + 1, branch.name);
        render_shape(out, &Shape::Object(branch.clone()), &branch.name, depth);
    }
}

fn render_element(
    out: &mut String,
    tag: &str,
    depth: usize,
    body: impl FnOnce(&mut String, usize),
) {
    indent(out, depth);
    let _ = writeln!(out, "<{tag}>");
    body(out, depth + 1);
    indent(out, depth);
    let _ = writeln!(out, "</{tag}>");
}

fn annotate(out: &mut String, depth: usize, text: &str) {
    indent(out, depth);
    let _ = writeln!(out, "[{text}]");
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

/// Human-readable type tag shown in field annotations.
fn type_info(shape: &Shape) -> String {
    use crate::shape::PrimitiveKind;
    match shape {
        Shape::Primitive { kind } => match kind {
            PrimitiveKind::String => "type: str".to_string(),
            PrimitiveKind::Integer => "type: int".to_string(),
            PrimitiveKind::Float => "type: float".to_string(),
            PrimitiveKind::Boolean => "type: bool".to_string(),
        },
        Shape::Enumeration { variants, .. } => {
            format!("type: one of [{}]", variants.join(", "))
        }
        Shape::List { item, .. } => format!("type: list of {}", item.tag_name()),
        Shape::Object(_) => "type: object".to_string(),
        Shape::Alternatives { .. } => "type: one of the options below".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Field;

    fn action_shape() -> Shape {
        Shape::object(
            "plan",
            vec![
                Field::required("thinking", Shape::string()),
                Field::required(
                    "actions",
                    Shape::list(
                        "actions",
                        Shape::alternatives(vec![
                            ObjectShape::new(
                                "create_action",
                                vec![Field::required("new_file_path", Shape::string())],
                            ),
                            ObjectShape::new(
                                "run_command",
                                vec![Field::required("command", Shape::string())],
                            ),
                        ]),
                    ),
                ),
            ],
        )
    }

    #[test]
    fn test_schema_renders_nested_elements() {
        let rendered = render_schema(&action_shape());
        assert!(rendered.contains("<plan>"));
        assert!(rendered.contains("<thinking>"));
        assert!(rendered.contains("[type: str]"));
        assert!(rendered.contains("[required]"));
        assert!(rendered.contains("<create_action>"));
        assert!(rendered.contains("# Option 2: run_command"));
        assert!(rendered.contains("OR"));
    }

    #[test]
    fn test_instructions_wrap_schema() {
        let rendered = render_instructions(&action_shape());
        assert!(rendered.starts_with("<response_instructions>"));
        assert!(rendered.trim_end().ends_with("</response_instructions>"));
        assert!(rendered.contains("Requested Response Schema:"));
        assert!(rendered.contains("NOT the schema itself"));
        assert!(rendered.contains("1-based index"));
    }

    #[test]
    fn test_enum_and_optional_annotations() {
        let shape = Shape::object(
            "query",
            vec![
                Field::required(
                    "file_operation",
                    Shape::enumeration("file_operation", ["open", "edit", "create"]),
                ),
                Field::optional("nickname", Shape::string()),
            ],
        );
        let rendered = render_schema(&shape);
        assert!(rendered.contains("[type: one of [open, edit, create]]"));
        assert!(rendered.contains("[optional]"));
    }
}

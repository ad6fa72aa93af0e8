use super::{Control, RenderedField};

/// Plain-text rendition of a rendered form, one block per field
pub fn to_text(fields: &[RenderedField]) -> String {
    let mut out = String::new();
    for field in fields {
        out.push_str(&field.label);
        if field.required {
            out.push_str(" *");
        }
        out.push('\n');

        match &field.control {
            Control::TextInput { value }
            | Control::NumberInput { value }
            | Control::DateInput { value }
            | Control::TextArea { value } => {
                let shown = match (value.is_empty(), &field.placeholder) {
                    (true, Some(p)) => format!("({})", p),
                    _ => value.clone(),
                };
                out.push_str(&format!("  [{}]\n", shown));
            }
            Control::Select { prompt, choices } => {
                match choices.iter().find(|c| c.selected) {
                    Some(c) => out.push_str(&format!("  < {} >\n", c.label)),
                    None => out.push_str(&format!("  < {} >\n", prompt)),
                }
                for c in choices {
                    out.push_str(&format!("    - {} ({})\n", c.label, c.value));
                }
            }
            Control::Checklist { choices } => {
                for c in choices {
                    let mark = if c.selected { "x" } else { " " };
                    out.push_str(&format!("  [{}] {}\n", mark, c.label));
                }
            }
            Control::Switch { on, caption } => {
                let knob = if *on { "(-o)" } else { "(o-)" };
                out.push_str(&format!("  {} {}\n", knob, caption));
            }
        }

        if field.has_error() {
            out.push_str(&format!("  ! {}\n", field.errors.join(", ")));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{render_form, FieldState};
    use crate::schema;
    use crate::value::FieldValue;
    use std::collections::HashMap;

    #[test]
    fn renders_labels_placeholders_and_errors() {
        let schema = schema::builtin().unwrap();
        let mut states = HashMap::new();
        states.insert(
            "skills".to_string(),
            FieldState::with_value(FieldValue::List(vec!["node".into()])),
        );
        states.insert(
            "age".to_string(),
            FieldState {
                value: Some(FieldValue::Number(12.0)),
                errors: vec![Some("Min value is 18".into())],
            },
        );

        let text = to_text(&render_form(&schema, &states));
        assert!(text.contains("Full Name *\n  [(John Doe)]"));
        assert!(text.contains("  [12]\n  ! Min value is 18"));
        assert!(text.contains("  [x] Node.js"));
        assert!(text.contains("  [ ] SQL"));
        assert!(text.contains("< Select an option... >"));
        assert!(text.contains("(o-) No"));
    }
}

//! Pretty-printed, highlighted JSON.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::render::{Color, Style, Text};

const INDENT: &str = "  ";

struct Palette {
    brace: Style,
    key: Style,
    string: Style,
    number: Style,
    r#true: Style,
    r#false: Style,
    null: Style,
}

impl Palette {
    fn new() -> Self {
        Self {
            brace: Style::new().bold(),
            key: Style::new().bold().fg(Color::Standard(4)),
            string: Style::new().fg(Color::Standard(2)),
            number: Style::new().bold().fg(Color::Standard(6)),
            r#true: Style::new().italic().fg(Color::Standard(10)),
            r#false: Style::new().italic().fg(Color::Standard(9)),
            null: Style::new().italic().fg(Color::Standard(5)),
        }
    }
}

fn quoted(value: &str) -> String {
    Value::String(value.to_string()).to_string()
}

fn write_value(value: &Value, depth: usize, palette: &Palette, out: &mut Text) {
    match value {
        Value::Null => out.append("null", palette.null.clone()),
        Value::Bool(true) => out.append("true", palette.r#true.clone()),
        Value::Bool(false) => out.append("false", palette.r#false.clone()),
        Value::Number(number) => out.append(&number.to_string(), palette.number.clone()),
        Value::String(string) => out.append(&quoted(string), palette.string.clone()),
        Value::Array(items) if items.is_empty() => out.append("[]", palette.brace.clone()),
        Value::Object(map) if map.is_empty() => out.append("{}", palette.brace.clone()),
        Value::Array(items) => {
            out.append("[", palette.brace.clone());
            for (index, item) in items.iter().enumerate() {
                out.push_str(if index == 0 { "\n" } else { ",\n" });
                out.push_str(&INDENT.repeat(depth + 1));
                write_value(item, depth + 1, palette, out);
            }
            out.push_str("\n");
            out.push_str(&INDENT.repeat(depth));
            out.append("]", palette.brace.clone());
        }
        Value::Object(map) => {
            out.append("{", palette.brace.clone());
            for (index, (key, item)) in map.iter().enumerate() {
                out.push_str(if index == 0 { "\n" } else { ",\n" });
                out.push_str(&INDENT.repeat(depth + 1));
                out.append(&quoted(key), palette.key.clone());
                out.push_str(": ");
                write_value(item, depth + 1, palette, out);
            }
            out.push_str("\n");
            out.push_str(&INDENT.repeat(depth));
            out.append("}", palette.brace.clone());
        }
    }
}

/// Highlight an already parsed value.
pub fn highlight(value: &Value) -> Text {
    let mut text = Text::new();
    write_value(value, 0, &Palette::new(), &mut text);
    text.no_wrap = true;
    text
}

/// Parse and highlight JSON text; `resource` names the input in errors.
pub fn build(source: &str, resource: &str) -> Result<Text> {
    let value: Value = serde_json::from_str(source).map_err(|e| Error::parse("json", resource, e))?;
    Ok(highlight(&value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_prints_with_two_space_indent() {
        let text = build(r#"{"name":"cat","tags":["a",1,true,null],"empty":{}}"#, "cats.json").unwrap();
        assert_eq!(
            text.as_str(),
            "{\n  \"name\": \"cat\",\n  \"tags\": [\n    \"a\",\n    1,\n    true,\n    null\n  ],\n  \"empty\": {}\n}"
        );
    }

    #[test]
    fn keys_keep_document_order() {
        let text = build(r#"{"z":1,"a":2}"#, "x").unwrap();
        assert!(text.as_str().find("\"z\"") < text.as_str().find("\"a\""));
    }

    #[test]
    fn strings_are_escaped() {
        let text = build(r#"["a\"b\n"]"#, "x").unwrap();
        assert!(text.as_str().contains(r#""a\"b\n""#));
    }

    #[test]
    fn malformed_json_names_the_resource() {
        let err = build("{nope", "broken.json").unwrap_err();
        assert_eq!(err.to_string(), "unable to parse json in broken.json");
    }

    #[test]
    fn values_are_styled_by_type() {
        let runs = build("[false, 2]", "x").unwrap().runs();
        assert!(runs.iter().any(|(text, style)| text == "false" && *style == Style::new().italic().fg(Color::Standard(9))));
        assert!(runs.iter().any(|(text, style)| text == "2" && *style == Style::new().bold().fg(Color::Standard(6))));
    }
}

//! Plain-text rendering of the chat components stored in sign lines.

use serde_json::{Map, Value};

/// Renders one raw sign field. Empty and `null` fields are blank lines, JSON
/// is rendered as a chat component, anything else is legacy plain text.
pub fn sign_line(raw: &str) -> String {
    if raw.is_empty() || raw == "null" {
        return String::new();
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => to_plain(&value),
        Err(_) => raw.to_string(),
    }
}

/// Joins four rendered lines the way `Block::sign_text` reports them.
pub fn sign_text<S: AsRef<str>>(raw_lines: &[S]) -> String {
    raw_lines
        .iter()
        .map(|line| sign_line(line.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn to_plain(component: &Value) -> String {
    let mut out = String::new();
    render(component, &mut out);
    out
}

fn strip_quotes(text: &str) -> &str {
    let text = text.strip_prefix('"').unwrap_or(text);
    text.strip_suffix('"').unwrap_or(text)
}

fn render(component: &Value, out: &mut String) {
    match component {
        Value::Null => {}
        Value::String(text) => out.push_str(strip_quotes(text)),
        Value::Array(parts) => parts.iter().for_each(|part| render(part, out)),
        Value::Object(fields) => render_object(fields, out),
        other => out.push_str(&other.to_string()),
    }
}

fn render_object(fields: &Map<String, Value>, out: &mut String) {
    match (fields.get("text"), fields.get("translate")) {
        (Some(Value::String(text)), _) => out.push_str(strip_quotes(text)),
        (Some(text @ (Value::Number(_) | Value::Bool(_))), _) => out.push_str(&text.to_string()),
        (_, Some(Value::String(key))) => {
            let args: Vec<String> = match fields.get("with") {
                Some(Value::Array(args)) => args.iter().map(to_plain).collect(),
                _ => Vec::new(),
            };
            out.push_str(&translate(key, &args));
        }
        _ => {}
    }

    if let Some(Value::Array(extra)) = fields.get("extra") {
        extra.iter().for_each(|part| render(part, out));
    }
}

/// Substitutes `%s` (in order) and `%N$s` (by position) with `args`.
/// There is no language table, so the key itself is the template.
fn translate(template: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut next_arg = 0;
    let mut rest = template;

    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let spec = &rest[start + 1..];

        if let Some(after) = spec.strip_prefix('s') {
            if let Some(arg) = args.get(next_arg) {
                out.push_str(arg);
            }
            next_arg += 1;
            rest = after;
        } else if let Some(after) = spec.strip_prefix('%') {
            out.push('%');
            rest = after;
        } else {
            let digits = spec.bytes().take_while(u8::is_ascii_digit).count();
            let positional = spec[digits..].starts_with("$s") && digits > 0;
            match spec[..digits].parse::<usize>() {
                Ok(index) if positional => {
                    if let Some(arg) = index.checked_sub(1).and_then(|i| args.get(i)) {
                        out.push_str(arg);
                    }
                    rest = &spec[digits + 2..];
                }
                _ => {
                    out.push('%');
                    rest = spec;
                }
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blank_lines() {
        assert_eq!(sign_line(""), "");
        assert_eq!(sign_line("null"), "");
        assert_eq!(sign_line("\"\""), "");
    }

    #[test]
    fn test_legacy_text_is_verbatim() {
        assert_eq!(sign_line("Hello there"), "Hello there");
        assert_eq!(sign_line("{not json"), "{not json");
    }

    #[test]
    fn test_json_components() {
        assert_eq!(sign_line(r#""Welcome""#), "Welcome");
        assert_eq!(sign_line(r#"{"text":"Shop"}"#), "Shop");
        assert_eq!(sign_line(r#"{"text":"\"quoted\""}"#), "quoted");
        assert_eq!(
            sign_line(r#"{"text":"a","extra":["b",{"text":"c","bold":true}]}"#),
            "abc"
        );
        assert_eq!(sign_line("42"), "42");
    }

    #[test]
    fn test_translate() {
        let component = json!({
            "translate": "%s and %s",
            "with": ["cats", {"text": "dogs"}]
        });
        assert_eq!(to_plain(&component), "cats and dogs");
        assert_eq!(translate("%2$s then %1$s", &["a".into(), "b".into()]), "b then a");
        assert_eq!(translate("100%% sure", &[]), "100% sure");
        assert_eq!(translate("lone % sign", &[]), "lone % sign");
    }

    #[test]
    fn test_sign_text() {
        let lines = ["", r#"{"text":"Hi"}"#, "null", "plain"];
        assert_eq!(sign_text(&lines), "\nHi\n\nplain");
    }
}

//! YAML frontmatter: a leading `---` line, the YAML body, and a closing
//! `---` (or `...`) line.

use serde_yaml::Value;

/// Splits a body into its frontmatter YAML (if any) and the remaining text.
pub fn split(body: &str) -> (Option<&str>, &str) {
    let Some(rest) = strip_delimiter_line(body, "---") else {
        return (None, body);
    };

    let mut offset = 0usize;
    for line in rest.split_inclusive('\n') {
        let bare = line.trim_end_matches(['\r', '\n']);
        if bare.trim_end() == "---" || bare.trim_end() == "..." {
            let yaml = &rest[..offset];
            return (Some(yaml), &rest[offset + line.len()..]);
        }
        offset += line.len();
    }

    (None, body)
}

/// Body text with any frontmatter removed.
pub fn strip(body: &str) -> &str {
    split(body).1
}

/// String values of `key` in the frontmatter: a scalar yields one value, a
/// sequence yields each scalar element. Missing keys and malformed YAML yield
/// nothing.
pub fn property_values(body: &str, key: &str) -> Vec<String> {
    let Some(yaml) = split(body).0 else {
        return vec![];
    };
    let parsed: Value = match serde_yaml::from_str(yaml) {
        Ok(v) => v,
        Err(e) => {
            log::debug!("Ignoring malformed frontmatter: {e}");
            return vec![];
        }
    };

    let Some(value) = parsed.get(key) else {
        return vec![];
    };
    if let Some(link) = wikilink_value(value) {
        return vec![link];
    }
    match value {
        Value::Sequence(items) => items
            .iter()
            .filter_map(|item| scalar_string(item).or_else(|| wikilink_value(item)))
            .collect(),
        _ => scalar_string(value).into_iter().collect(),
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    let s = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!s.is_empty()).then_some(s)
}

/// An unquoted `[[target]]` parses as a sequence holding a one-element sequence.
fn wikilink_value(value: &Value) -> Option<String> {
    let Value::Sequence(outer) = value else {
        return None;
    };
    let [Value::Sequence(inner)] = outer.as_slice() else {
        return None;
    };
    let [target] = inner.as_slice() else {
        return None;
    };
    scalar_string(target).map(|s| format!("[[{s}]]"))
}

fn strip_delimiter_line<'a>(body: &'a str, delimiter: &str) -> Option<&'a str> {
    let rest = body.strip_prefix(delimiter)?;
    let rest = rest.trim_start_matches([' ', '\t']);
    rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))
}

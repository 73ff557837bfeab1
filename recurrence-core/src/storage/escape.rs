//! Field escaping for the tab-separated record format.

/// Escape backslash, tab, newline and carriage return so a field contains
/// neither separators nor line breaks.
pub fn escape_field(field: &str) -> String {
    let mut escaped = String::with_capacity(field.len());
    for c in field.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\t' => escaped.push_str("\\t"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Reverse `escape_field`. Returns the offending sequence on an unknown
/// escape or a dangling trailing backslash.
pub fn unescape_field(field: &str) -> Result<String, String> {
    let mut unescaped = String::with_capacity(field.len());
    let mut chars = field.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => unescaped.push('\\'),
            Some('t') => unescaped.push('\t'),
            Some('n') => unescaped.push('\n'),
            Some('r') => unescaped.push('\r'),
            Some(other) => return Err(format!("\\{}", other)),
            None => return Err("\\".to_string()),
        }
    }
    Ok(unescaped)
}

fn escape_with(value: &str, mut replace: impl FnMut(char, &mut String) -> bool) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if !replace(ch, &mut escaped) {
            escaped.push(ch);
        }
    }
    escaped
}

/// Escapes a value for use inside a double-quoted HTML attribute.
pub fn escape_html_attr(value: &str) -> String {
    escape_with(value, |ch, out| {
        let entity = match ch {
            '&' => "&amp;",
            '<' => "&lt;",
            '>' => "&gt;",
            '"' => "&quot;",
            '\'' => "&#39;",
            _ => return false,
        };
        out.push_str(entity);
        true
    })
}

/// Escapes the `[text]` part of a Markdown link.
pub fn escape_link_text(value: &str) -> String {
    escape_with(value, |ch, out| {
        if matches!(ch, '\\' | '[' | ']') {
            out.push('\\');
            out.push(ch);
            return true;
        }
        false
    })
}

/// Escapes the `(destination)` part of a Markdown link.
pub fn escape_link_destination(value: &str) -> String {
    escape_with(value, |ch, out| {
        if matches!(ch, '\\' | '(' | ')' | ' ') {
            out.push('\\');
            out.push(ch);
            return true;
        }
        false
    })
}

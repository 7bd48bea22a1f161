use unicode_width::UnicodeWidthStr;

pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Word-wraps a label so no line exceeds `max_width` display columns.
///
/// Words wider than the limit stay whole on their own line. A `max_width`
/// of 0 returns the label unchanged.
pub fn wrap_label(label: &str, max_width: usize) -> String {
    if max_width == 0 || display_width(label) <= max_width {
        return label.to_string();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in label.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if display_width(&current) + 1 + display_width(word) <= max_width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines.join("\n")
}

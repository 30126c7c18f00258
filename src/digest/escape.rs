/// Characters Telegram MarkdownV2 treats as markup
pub const RESERVED_CHARS: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

/// Escape every reserved character with a backslash.
///
/// Not idempotent: escaping already escaped text escapes it again, so raw
/// text must pass through here exactly once.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if RESERVED_CHARS.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Escape and wrap in bold delimiters
pub fn bold(text: &str) -> String {
    format!("*{}*", escape(text))
}

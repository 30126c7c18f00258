use super::escape::escape;

/// Classification of one description line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutlineLine<'a> {
    /// `<1-2 digits>. <text>` starts a new item
    NewItem { number: &'a str, text: &'a str },
    /// Anything else continues the current item
    Continuation(&'a str),
}

/// Classify a line as a numbered item start or a continuation
pub fn classify_line(line: &str) -> OutlineLine<'_> {
    let trimmed = line.trim_start();
    let digits = trimmed
        .char_indices()
        .take_while(|(_, c)| c.is_ascii_digit())
        .count();

    if (1..=2).contains(&digits) {
        let (number, rest) = trimmed.split_at(digits);
        if let Some(after_dot) = rest.strip_prefix('.') {
            if after_dot.starts_with(char::is_whitespace) {
                return OutlineLine::NewItem {
                    number,
                    text: after_dot.trim_start(),
                };
            }
        }
    }

    OutlineLine::Continuation(line.trim())
}

/// Item being accumulated while scanning
#[derive(Debug, Default)]
struct PendingItem {
    number: String,
    parts: Vec<String>,
}

impl PendingItem {
    fn start(number: &str, text: &str) -> Self {
        let mut item = Self {
            number: number.to_string(),
            parts: Vec::new(),
        };
        item.push(text);
        item
    }

    fn push(&mut self, text: &str) {
        let text = text.trim();
        if !text.is_empty() {
            self.parts.push(text.to_string());
        }
    }

    fn render(&self) -> String {
        escape(&format!("{}. {}", self.number, self.parts.join(" ")))
    }
}

/// Rebuild the numbered outline of a description.
///
/// Returned lines are already escaped for MarkdownV2. Text before the first
/// numbered item is dropped; no numbered item means no output.
pub fn parse_outline(text: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut current: Option<PendingItem> = None;

    for line in text.trim().lines() {
        match classify_line(line.trim_end()) {
            OutlineLine::NewItem { number, text } => {
                if let Some(item) = current.take() {
                    result.push(item.render());
                }
                current = Some(PendingItem::start(number, text));
            }
            OutlineLine::Continuation(text) => {
                if let Some(item) = current.as_mut() {
                    item.push(text);
                }
            }
        }
    }

    if let Some(item) = current {
        result.push(item.render());
    }

    result
}

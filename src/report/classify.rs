//! Line classification for report sections.
//!
//! Reports arrive as markdown-ish text. Each line maps to exactly one
//! [`Block`]; there is no multi-line state, so a malformed line can
//! only ever damage itself.

use crate::consts::MODEL_NAMES;

/// A classified report line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// `#` to `####` followed by whitespace. Five or more hashes is
    /// just a paragraph.
    Heading { level: u8, text: String },
    /// A known model name, a colon, then prose. `GPT-4` must win over
    /// `GPT`, which is why [`MODEL_NAMES`] is ordered longest first.
    Labeled { model: String, text: String },
    /// `- item` or `1. item`.
    ListItem { text: String },
    Paragraph { spans: Vec<Span> },
    Blank,
}

/// A fragment of styled inline text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Text(String),
    Bold(String),
    Link { label: String, url: String },
}

/// Classify a single line. Leading and trailing whitespace never
/// affects the outcome.
pub fn classify_line(line: &str) -> Block {
    let line = line.trim();
    if line.is_empty() {
        return Block::Blank;
    }
    if let Some((level, text)) = heading_text(line) {
        return Block::Heading { level, text };
    }
    for model in MODEL_NAMES {
        if let Some(rest) = line.strip_prefix(model)
            && let Some(text) = rest.strip_prefix(':')
        {
            return Block::Labeled {
                model: (*model).to_string(),
                text: text.trim_start().to_string(),
            };
        }
    }
    if let Some(text) = list_text(line) {
        return Block::ListItem { text };
    }
    Block::Paragraph {
        spans: parse_spans(line),
    }
}

fn heading_text(line: &str) -> Option<(u8, String)> {
    let hashes = line.bytes().take_while(|b| *b == b'#').count();
    if !(1..=4).contains(&hashes) {
        return None;
    }
    let rest = &line[hashes..];
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some((hashes as u8, rest.trim_start().to_string()))
}

fn list_text(line: &str) -> Option<String> {
    if let Some(rest) = line.strip_prefix("- ") {
        return Some(rest.trim_start().to_string());
    }
    let digits = line.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits > 0 && line.as_bytes().get(digits) == Some(&b'.') {
        return Some(line[digits + 1..].trim_start().to_string());
    }
    None
}

/// Break a line into styled spans.
///
/// At most one `[label](url)` construct is honored per line, http and
/// https schemes only. The construct is lifted out of the text and the
/// link comes back as the final span, so callers can always number
/// links after the prose they belong to. `**bold**` runs must be
/// paired; an unmatched `**` stays literal.
pub fn parse_spans(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    match find_link(text) {
        Some(link) => {
            let remainder = format!("{}{}", &text[..link.start], &text[link.end..]);
            bold_runs(remainder.trim(), &mut spans);
            spans.push(Span::Link {
                label: link.label,
                url: link.url,
            });
        }
        None => bold_runs(text, &mut spans),
    }
    spans
}

struct FoundLink {
    start: usize,
    end: usize,
    label: String,
    url: String,
}

fn find_link(text: &str) -> Option<FoundLink> {
    let mut search = 0;
    while let Some(offset) = text[search..].find('[') {
        let open = search + offset;
        if let Some(close_offset) = text[open + 1..].find(']') {
            let close = open + 1 + close_offset;
            let after = &text[close + 1..];
            if let Some(url_body) = after.strip_prefix('(')
                && (url_body.starts_with("http://") || url_body.starts_with("https://"))
                && let Some(url_len) = url_body.find(')')
            {
                let url = &url_body[..url_len];
                if !url.contains(char::is_whitespace) {
                    return Some(FoundLink {
                        start: open,
                        // "](" plus the url plus the closing paren.
                        end: close + 2 + url_len + 1,
                        label: text[open + 1..close].to_string(),
                        url: url.to_string(),
                    });
                }
            }
        }
        search = open + 1;
    }
    None
}

fn bold_runs(text: &str, spans: &mut Vec<Span>) {
    let mut rest = text;
    loop {
        let Some(start) = rest.find("**") else { break };
        let Some(inner_len) = rest[start + 2..].find("**") else {
            break;
        };
        if start > 0 {
            spans.push(Span::Text(rest[..start].to_string()));
        }
        let inner = &rest[start + 2..start + 2 + inner_len];
        if !inner.is_empty() {
            spans.push(Span::Bold(inner.to_string()));
        }
        rest = &rest[start + 2 + inner_len + 2..];
    }
    if !rest.is_empty() {
        spans.push(Span::Text(rest.to_string()));
    }
}

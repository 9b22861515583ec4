//! Terminal rendering for classified report blocks.

use crate::report::classify::{Block, Span, classify_line, parse_spans};
use crate::report::splitter::split_sections;

const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const UNDERLINE: &str = "\x1b[4m";
const RESET: &str = "\x1b[0m";

const SECTION_RULE: &str = "──────────────────────────────────────";

/// A link surfaced by a report, in display order. The number printed
/// next to its label is `index + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLink {
    pub label: String,
    pub url: String,
}

/// A report laid out for the terminal.
pub struct Rendered {
    pub text: String,
    pub links: Vec<ReportLink>,
}

/// Lay out a raw report for terminal display.
///
/// Sections are split on `---` lines, each line classified on its own,
/// and links numbered in the order they appear so the caller can offer
/// to open them afterwards.
pub fn render_report(report: &str) -> Rendered {
    let mut out = String::new();
    let mut links = Vec::new();
    let mut printed = 0;
    for section in split_sections(report) {
        if section.is_empty() {
            continue;
        }
        if printed > 0 {
            out.push('\n');
            out.push_str(DIM);
            out.push_str(SECTION_RULE);
            out.push_str(RESET);
            out.push('\n');
        }
        for line in section.lines() {
            render_block(&classify_line(line), &mut out, &mut links);
        }
        printed += 1;
    }
    Rendered { text: out, links }
}

fn render_block(block: &Block, out: &mut String, links: &mut Vec<ReportLink>) {
    match block {
        Block::Heading { level, text } => {
            out.push('\n');
            // Bold styling spans the whole heading, so inline markup is
            // flattened to its text instead of nesting escape codes.
            let flat = flatten_spans(&parse_spans(text), links);
            if *level <= 2 {
                out.push_str(&format!("{BOLD}{UNDERLINE}{flat}{RESET}\n"));
            } else {
                out.push_str(&format!("{BOLD}{flat}{RESET}\n"));
            }
        }
        Block::Labeled { model, text } => {
            out.push_str(&format!("{BOLD}{model}:{RESET} "));
            render_spans(&parse_spans(text), out, links);
            out.push('\n');
        }
        Block::ListItem { text } => {
            out.push_str("  • ");
            render_spans(&parse_spans(text), out, links);
            out.push('\n');
        }
        Block::Paragraph { spans } => {
            render_spans(spans, out, links);
            out.push('\n');
        }
        Block::Blank => out.push('\n'),
    }
}

fn render_spans(spans: &[Span], out: &mut String, links: &mut Vec<ReportLink>) {
    for span in spans {
        match span {
            Span::Text(text) => out.push_str(text),
            Span::Bold(text) => out.push_str(&format!("{BOLD}{text}{RESET}")),
            Span::Link { label, url } => {
                let shown = if label.is_empty() { url } else { label };
                links.push(ReportLink {
                    label: label.clone(),
                    url: url.clone(),
                });
                out.push_str(&format!("{UNDERLINE}{shown}{RESET} [{}]", links.len()));
            }
        }
    }
}

fn flatten_spans(spans: &[Span], links: &mut Vec<ReportLink>) -> String {
    let mut flat = String::new();
    for span in spans {
        match span {
            Span::Text(text) | Span::Bold(text) => flat.push_str(text),
            Span::Link { label, url } => {
                let shown = if label.is_empty() { url } else { label };
                links.push(ReportLink {
                    label: label.clone(),
                    url: url.clone(),
                });
                flat.push_str(&format!("{shown} [{}]", links.len()));
            }
        }
    }
    flat
}

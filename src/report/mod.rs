//! Synthesized report handling.
//!
//! A report is plain text with light markdown: `---` section breaks,
//! `#`-headings, list items, `**bold**` runs and `[label](url)` links.
//! [`splitter`] cuts it into sections, [`classify`] types each line,
//! and [`render`] lays the result out for the terminal.

pub mod classify;
pub mod render;
pub mod splitter;

pub use classify::{Block, Span, classify_line, parse_spans};
pub use render::{Rendered, ReportLink, render_report};
pub use splitter::split_sections;

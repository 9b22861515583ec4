//! Project-wide constants.

pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
pub const HOMEPAGE: &str = env!("CARGO_PKG_HOMEPAGE");
pub const REPO: &str = env!("CARGO_PKG_REPOSITORY");

/// Default backend base URL when none is given.
pub const DEFAULT_SERVER: &str = "http://localhost:8080";

/// How many complete answers one question is expected to produce.
/// Three model providers answer concurrently.
pub const EXPECTED_ANSWER_COUNT: usize = 3;

/// Client-side cap on question length.
pub const QUESTION_MAX_CHARS: usize = 500;

/// How many re-asks a tester gets within one session.
pub const MAX_REASKS: u32 = 1;

/// Answer stream endpoint. Query carries nickname, phonenumber, question.
pub const ANALYZE_PATH: &str = "/api/ai/analyze";

/// Report synthesis endpoint. The question id is appended as a path segment.
pub const SYNTHESIZE_PATH: &str = "/api/ai/synthesize";

/// Feedback submission endpoint.
pub const FEEDBACK_PATH: &str = "/api/feedback";

/// Model names recognized as labeled-block prefixes in reports,
/// longest first so "GPT-4" is tried before "GPT".
pub const MODEL_NAMES: &[&str] = &["Perplexity", "ChatGPT", "Claude", "Gemini", "GPT-4", "GPT"];

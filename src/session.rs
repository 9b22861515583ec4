//! Per-flow session context. The browser client kept this state in
//! tab-scoped key-value storage that every page reached into; here it
//! is one owned struct handed down the page flow, created on entry and
//! cleared on completion.

use crate::consts::MAX_REASKS;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub nickname: Option<String>,
    /// Digits only. Hyphenate with [`format_phone`] for display.
    pub phone_number: Option<String>,
    pub question: Option<String>,
    /// Server-assigned, announced by the stream's init envelope.
    pub question_id: Option<u64>,
    /// Re-asks used so far, capped at [`MAX_REASKS`].
    pub retry_count: u32,
    /// Report blob cached after the first successful synthesis.
    pub report: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wipe everything. The browser client cleared its storage once
    /// feedback landed; the thank-you page does it again to be sure.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Drop question-scoped state ahead of a re-ask. A new question
    /// gets a new stream and a new report; registration and the
    /// retry count survive.
    pub fn reset_question(&mut self) {
        self.question = None;
        self.question_id = None;
        self.report = None;
    }

    pub fn can_retry(&self) -> bool {
        self.retry_count < MAX_REASKS
    }
}

/// Strip a phone input down to its digits, keeping at most eleven.
pub fn normalize_phone(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).take(11).collect()
}

/// Hyphenate a phone number the way the signup form displayed it: up
/// to 3 digits bare, up to 7 as 3-rest, beyond that as 3-4-4. Input
/// that is not already digits-only gets normalized first.
pub fn format_phone(input: &str) -> String {
    let digits = normalize_phone(input);
    match digits.len() {
        0..=3 => digits,
        4..=7 => format!("{}-{}", &digits[..3], &digits[3..]),
        _ => format!("{}-{}-{}", &digits[..3], &digits[3..7], &digits[7..]),
    }
}

//! Error taxonomy. Typed errors live here; the page layer wraps them
//! with anyhow context where it needs to.

use thiserror::Error;

/// Longest payload excerpt an [`EnvelopeError`] carries for logging.
const PAYLOAD_EXCERPT: usize = 200;

/// Failures from the non-streaming backend calls.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never completed.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Synthesis produced nothing to render. Kept apart from transport
    /// failures so the report page can offer a retry instead of a refresh.
    #[error("report came back empty")]
    EmptyReport,
}

/// Transport-level failure on the answer stream: the connection died or
/// closed before the expected number of answers arrived. The user
/// recovers by re-entering the answer page; nothing retries on its own.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    #[error("stream transport failed: {0}")]
    Transport(String),

    #[error("stream closed after {got} of {want} answers")]
    ClosedEarly { got: usize, want: usize },
}

/// One event payload that would not decode. The envelope is dropped and
/// the connection keeps going; reducer state is never touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("bad envelope: {reason} (payload: {payload})")]
pub struct EnvelopeError {
    pub reason: String,
    /// Excerpt of the offending payload, truncated to keep logs sane.
    pub payload: String,
}

impl EnvelopeError {
    pub fn new(reason: impl Into<String>, payload: &str) -> Self {
        let payload = if payload.chars().count() > PAYLOAD_EXCERPT {
            let cut: String = payload.chars().take(PAYLOAD_EXCERPT).collect();
            format!("{cut}…")
        } else {
            payload.to_string()
        };
        Self {
            reason: reason.into(),
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_error_keeps_short_payloads() {
        let err = EnvelopeError::new("not json", "{oops");
        assert_eq!(err.payload, "{oops");
        assert!(err.to_string().contains("not json"));
        assert!(err.to_string().contains("{oops"));
    }

    #[test]
    fn envelope_error_truncates_long_payloads() {
        let long = "x".repeat(500);
        let err = EnvelopeError::new("too big", &long);
        assert!(err.payload.chars().count() <= PAYLOAD_EXCERPT + 1);
        assert!(err.payload.ends_with('…'));
    }

    #[test]
    fn envelope_error_truncates_on_char_boundary() {
        // Multi-byte text must not get sliced mid-character.
        let long = "한".repeat(300);
        let err = EnvelopeError::new("too big", &long);
        assert_eq!(err.payload.chars().count(), PAYLOAD_EXCERPT + 1);
    }

    #[test]
    fn closed_early_mentions_both_counts() {
        let err = StreamError::ClosedEarly { got: 1, want: 3 };
        let text = err.to_string();
        assert!(text.contains('1'));
        assert!(text.contains('3'));
    }
}

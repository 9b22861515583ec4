//! Wire codec for one answer-stream payload.
//!
//! The backend has spoken three dialects over its life: an init message
//! tagged `INIT` (earlier `questionId`), a rich answer message with
//! `aiId`/`aiName`/`isComplete`, and a legacy bare `{content}` shape
//! with no tag at all. Everything normalizes into [`Envelope`]; anything
//! else is an [`EnvelopeError`] for the caller to log and drop.

use serde::Deserialize;

use crate::error::EnvelopeError;

/// One decoded stream message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope {
    /// Stream opener carrying the server-assigned question id.
    Init { question_id: u64 },
    /// A piece of one model's answer.
    Answer(Fragment),
}

/// An answer payload, normalized across dialects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Upstream answer id. `None` marks the legacy bare shape, which
    /// can never be matched by a later fragment.
    pub id: Option<String>,
    /// Model display name when the upstream sent one.
    pub model: Option<String>,
    pub content: String,
    pub complete: bool,
}

/// Every field the union of dialects can carry.
#[derive(Debug, Deserialize)]
struct RawEnvelope {
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(rename = "questionId")]
    question_id: Option<u64>,
    #[serde(rename = "aiId")]
    ai_id: Option<String>,
    #[serde(rename = "aiName")]
    ai_name: Option<String>,
    model: Option<String>,
    content: Option<String>,
    #[serde(rename = "isComplete")]
    is_complete: Option<bool>,
}

/// Decode one `data:` payload.
pub fn parse(payload: &str) -> Result<Envelope, EnvelopeError> {
    let raw: RawEnvelope = serde_json::from_str(payload)
        .map_err(|e| EnvelopeError::new(e.to_string(), payload))?;

    match raw.kind.as_deref() {
        Some("INIT") | Some("questionId") => {
            let question_id = raw
                .question_id
                .ok_or_else(|| EnvelopeError::new("init without questionId", payload))?;
            Ok(Envelope::Init { question_id })
        }
        Some("answer") => {
            let id = raw
                .ai_id
                .ok_or_else(|| EnvelopeError::new("answer without aiId", payload))?;
            Ok(Envelope::Answer(Fragment {
                id: Some(id),
                model: raw.ai_name.or(raw.model),
                content: raw.content.unwrap_or_default(),
                complete: raw.is_complete.unwrap_or(false),
            }))
        }
        Some(other) => Err(EnvelopeError::new(
            format!("unknown envelope type {other:?}"),
            payload,
        )),
        None => {
            // Legacy bare shape: its whole meaning is the content, so an
            // absent or empty one has nothing to say.
            let content = raw
                .content
                .filter(|c| !c.is_empty())
                .ok_or_else(|| EnvelopeError::new("bare envelope without content", payload))?;
            Ok(Envelope::Answer(Fragment {
                id: None,
                model: raw.model,
                content,
                complete: true,
            }))
        }
    }
}

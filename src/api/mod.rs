//! Backend access.
//!
//! Everything the flow needs from a server sits behind [`Backend`]:
//! opening the answer stream, fetching the synthesized report, and
//! submitting feedback. [`http::HttpBackend`] talks to a live server
//! while [`demo::DemoBackend`] replays a canned session offline.

pub mod demo;
pub mod http;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::stream::AnswerFeed;

/// What the analyze endpoint needs to open an answer stream.
#[derive(Debug, Clone)]
pub struct QuestionContext {
    pub nickname: String,
    /// Digits only, empty when the user skipped it.
    pub phone_number: String,
    pub question: String,
}

/// A completed feedback form, ready to submit.
#[derive(Debug, Clone)]
pub struct FeedbackForm {
    pub nickname: String,
    pub phone_number: String,
    /// 1 to 5.
    pub convenience_rating: u8,
    /// 1 to 5.
    pub intention_rating: u8,
    pub comment: String,
}

/// The server as the flow sees it. Could be live HTTP or a canned script.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Open the streaming answer feed for a question.
    async fn open_answer_feed(
        &self,
        context: &QuestionContext,
    ) -> Result<Box<dyn AnswerFeed>, ApiError>;

    /// Fetch the synthesized report for an answered question.
    async fn synthesize_report(&self, question_id: u64) -> Result<String, ApiError>;

    /// Submit the user's feedback form.
    async fn submit_feedback(&self, form: &FeedbackForm) -> Result<(), ApiError>;
}

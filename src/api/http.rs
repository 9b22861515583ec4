use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::consts::{ANALYZE_PATH, FEEDBACK_PATH, SYNTHESIZE_PATH};
use crate::error::ApiError;
use crate::stream::AnswerFeed;
use crate::stream::sse::SseFeed;

use super::{Backend, FeedbackForm, QuestionContext};

/// Talks to a live AIQ server over HTTP.
pub struct HttpBackend {
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpBackend {
    /// The timeout bounds the report and feedback calls. The answer
    /// stream is long-lived and exempt from it.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            timeout,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn checked(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn open_answer_feed(
        &self,
        context: &QuestionContext,
    ) -> Result<Box<dyn AnswerFeed>, ApiError> {
        // The browser client used EventSource, which can only GET, so
        // the server expects the question in the query string.
        let response = self
            .client
            .get(self.url(ANALYZE_PATH))
            .query(&[
                ("nickname", context.nickname.as_str()),
                ("phonenumber", context.phone_number.as_str()),
                ("question", context.question.as_str()),
            ])
            .header("accept", "text/event-stream")
            .send()
            .await?;
        let response = Self::checked(response).await?;
        Ok(Box::new(SseFeed::new(response)))
    }

    async fn synthesize_report(&self, question_id: u64) -> Result<String, ApiError> {
        let url = format!("{}/{question_id}", self.url(SYNTHESIZE_PATH));
        let response = self.client.post(url).timeout(self.timeout).send().await?;
        let response = Self::checked(response).await?;
        let body: ReportBody = response.json().await?;
        let report = body.into_text();
        if report.trim().is_empty() {
            return Err(ApiError::EmptyReport);
        }
        Ok(report)
    }

    async fn submit_feedback(&self, form: &FeedbackForm) -> Result<(), ApiError> {
        let body = FeedbackRequest {
            nickname: &form.nickname,
            phonenumber: &form.phone_number,
            convenience_rating: form.convenience_rating,
            intention_rating: form.intention_rating,
            feedback: &form.comment,
        };
        let response = self
            .client
            .post(self.url(FEEDBACK_PATH))
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?;
        Self::checked(response).await?;
        Ok(())
    }
}

// --- API types ---

#[derive(Serialize)]
struct FeedbackRequest<'a> {
    nickname: &'a str,
    phonenumber: &'a str,
    #[serde(rename = "convenienceRating")]
    convenience_rating: u8,
    #[serde(rename = "intentionRating")]
    intention_rating: u8,
    feedback: &'a str,
}

/// The synthesize response is a bare string on some deployments and a
/// `{report}` or `{content}` object on others.
#[derive(Deserialize)]
#[serde(untagged)]
enum ReportBody {
    Text(String),
    Fields {
        report: Option<String>,
        content: Option<String>,
    },
}

impl ReportBody {
    fn into_text(self) -> String {
        match self {
            ReportBody::Text(text) => text,
            ReportBody::Fields { report, content } => report.or(content).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_text(json: &str) -> String {
        serde_json::from_str::<ReportBody>(json)
            .expect("report body should parse")
            .into_text()
    }

    #[test]
    fn report_body_accepts_a_bare_string() {
        assert_eq!(report_text(r#""보고서 본문""#), "보고서 본문");
    }

    #[test]
    fn report_field_wins_over_content() {
        assert_eq!(report_text(r#"{"report":"R","content":"C"}"#), "R");
    }

    #[test]
    fn content_field_is_the_fallback() {
        assert_eq!(report_text(r#"{"content":"C"}"#), "C");
    }

    #[test]
    fn object_without_either_field_is_empty() {
        assert_eq!(report_text(r#"{"status":"ok"}"#), "");
    }

    #[test]
    fn feedback_request_uses_the_wire_field_names() {
        let body = FeedbackRequest {
            nickname: "홍길동",
            phonenumber: "01012345678",
            convenience_rating: 5,
            intention_rating: 4,
            feedback: "좋았어요",
        };
        let json = serde_json::to_value(&body).expect("feedback body should serialize");
        assert_eq!(json["nickname"], "홍길동");
        assert_eq!(json["phonenumber"], "01012345678");
        assert_eq!(json["convenienceRating"], 5);
        assert_eq!(json["intentionRating"], 4);
        assert_eq!(json["feedback"], "좋았어요");
    }

    #[test]
    fn base_url_trailing_slashes_are_trimmed() {
        let backend = HttpBackend::new("http://localhost:8080/", Duration::from_secs(10));
        assert_eq!(
            backend.url(ANALYZE_PATH),
            "http://localhost:8080/api/ai/analyze"
        );
    }
}

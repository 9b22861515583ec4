//! Answer-stream consumption: the feed seam, the wire codec, and the
//! reducer that folds envelopes into the answer list.

pub mod envelope;
pub mod mock;
pub mod reducer;
pub mod sse;

use async_trait::async_trait;
use tracing::warn;

use crate::error::{EnvelopeError, StreamError};

use envelope::Envelope;
use reducer::{AnswerBoard, Applied};

/// One decoded item off the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    Envelope(Envelope),
    /// Payload that would not decode. Logged and dropped downstream;
    /// the connection itself keeps going.
    Malformed(EnvelopeError),
}

/// Where one stream connection stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Connecting,
    Streaming,
    Complete,
    Errored,
}

impl Phase {
    /// Terminal for this connection attempt. Errored never retries by
    /// itself; the user re-enters the page instead.
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Complete | Phase::Errored)
    }

    /// Where a finished [`pump`] leaves the connection.
    pub fn from_pump(outcome: &Result<(), StreamError>) -> Self {
        match outcome {
            Ok(()) => Phase::Complete,
            Err(_) => Phase::Errored,
        }
    }
}

/// A source of answer-stream events. One value is one connection.
/// Could be a live SSE response or a script.
#[async_trait]
pub trait AnswerFeed: Send {
    /// Next event in arrival order. `Ok(None)` means the server closed
    /// the stream.
    async fn next_event(&mut self) -> Result<Option<FeedEvent>, StreamError>;
}

/// Pump `feed` into `board` until `expected` answers are complete.
///
/// Malformed payloads are logged and dropped without touching the
/// board. A stream that ends before completion is a transport failure.
/// Once the board completes, pumping stops even if the server keeps
/// the connection open; dropping the feed closes it.
pub async fn pump(
    feed: &mut dyn AnswerFeed,
    board: &mut AnswerBoard,
    expected: usize,
    mut on_applied: impl FnMut(Applied, &AnswerBoard),
) -> Result<(), StreamError> {
    while !board.is_complete(expected) {
        match feed.next_event().await? {
            Some(FeedEvent::Envelope(envelope)) => {
                let applied = board.apply(envelope);
                on_applied(applied, board);
            }
            Some(FeedEvent::Malformed(err)) => {
                warn!(%err, "dropping malformed stream payload");
            }
            None => {
                return Err(StreamError::ClosedEarly {
                    got: board.complete_count(),
                    want: expected,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::envelope::Fragment;
    use super::mock::{ScriptedEvent, ScriptedFeed};
    use super::*;

    fn complete_answer(id: &str, model: &str, content: &str) -> Envelope {
        Envelope::Answer(Fragment {
            id: Some(id.to_string()),
            model: Some(model.to_string()),
            content: content.to_string(),
            complete: true,
        })
    }

    #[tokio::test]
    async fn pump_runs_to_completion() {
        let mut feed = ScriptedFeed::envelopes(vec![
            Envelope::Init { question_id: 12345 },
            complete_answer("ai1", "GPT-4", "a"),
            complete_answer("ai2", "Gemini", "b"),
            complete_answer("ai3", "Perplexity", "c"),
        ]);
        let mut board = AnswerBoard::default();
        let mut seen = 0;

        pump(&mut feed, &mut board, 3, |_, _| seen += 1)
            .await
            .unwrap();

        assert_eq!(seen, 4);
        assert!(board.is_complete(3));
        assert_eq!(board.question_id(), Some(12345));
    }

    #[tokio::test]
    async fn pump_stops_once_complete_and_leaves_the_rest() {
        let mut feed = ScriptedFeed::envelopes(vec![
            complete_answer("ai1", "GPT-4", "a"),
            complete_answer("ai2", "Gemini", "b"),
            complete_answer("ai3", "Perplexity", "c"),
            complete_answer("ai4", "Claude", "never consumed"),
        ]);
        let mut board = AnswerBoard::default();

        pump(&mut feed, &mut board, 3, |_, _| {}).await.unwrap();

        assert_eq!(board.answers().len(), 3);
        // The fourth envelope is still in the feed.
        assert!(feed.next_event().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn pump_skips_malformed_payloads_without_touching_state() {
        let mut feed = ScriptedFeed::new(vec![
            ScriptedEvent::Event(FeedEvent::Envelope(complete_answer("ai1", "GPT-4", "a"))),
            ScriptedEvent::Event(FeedEvent::Malformed(EnvelopeError::new(
                "not json", "{oops",
            ))),
            ScriptedEvent::Event(FeedEvent::Envelope(complete_answer("ai2", "Gemini", "b"))),
            ScriptedEvent::Event(FeedEvent::Envelope(complete_answer(
                "ai3",
                "Perplexity",
                "c",
            ))),
        ]);
        let mut board = AnswerBoard::default();
        let mut applied_count = 0;

        pump(&mut feed, &mut board, 3, |_, _| applied_count += 1)
            .await
            .unwrap();

        // The malformed payload neither reached the board nor the observer.
        assert_eq!(applied_count, 3);
        assert_eq!(board.answers().len(), 3);
        assert!(board.is_complete(3));
    }

    #[tokio::test]
    async fn early_close_is_a_transport_failure() {
        let mut feed = ScriptedFeed::envelopes(vec![complete_answer("ai1", "GPT-4", "a")]);
        let mut board = AnswerBoard::default();

        let err = pump(&mut feed, &mut board, 3, |_, _| {}).await.unwrap_err();

        assert_eq!(err, StreamError::ClosedEarly { got: 1, want: 3 });
        // The one answer that did land is kept for display.
        assert_eq!(board.answers().len(), 1);
    }

    #[tokio::test]
    async fn transport_failure_mid_stream_propagates() {
        let mut feed = ScriptedFeed::new(vec![
            ScriptedEvent::Event(FeedEvent::Envelope(complete_answer("ai1", "GPT-4", "a"))),
            ScriptedEvent::Fail("connection reset".to_string()),
        ]);
        let mut board = AnswerBoard::default();

        let err = pump(&mut feed, &mut board, 3, |_, _| {}).await.unwrap_err();
        assert!(matches!(err, StreamError::Transport(_)));
    }

    #[test]
    fn terminal_phases() {
        assert!(!Phase::Connecting.is_terminal());
        assert!(!Phase::Streaming.is_terminal());
        assert!(Phase::Complete.is_terminal());
        assert!(Phase::Errored.is_terminal());
    }

    #[tokio::test]
    async fn pump_outcomes_map_to_terminal_phases() {
        let mut feed = ScriptedFeed::envelopes(vec![
            complete_answer("ai1", "GPT-4", "a"),
            complete_answer("ai2", "Gemini", "b"),
            complete_answer("ai3", "Perplexity", "c"),
        ]);
        let mut board = AnswerBoard::default();
        let outcome = pump(&mut feed, &mut board, 3, |_, _| {}).await;
        assert_eq!(Phase::from_pump(&outcome), Phase::Complete);

        let mut feed = ScriptedFeed::envelopes(vec![complete_answer("ai1", "GPT-4", "a")]);
        let mut board = AnswerBoard::default();
        let outcome = pump(&mut feed, &mut board, 3, |_, _| {}).await;
        assert_eq!(Phase::from_pump(&outcome), Phase::Errored);
    }
}

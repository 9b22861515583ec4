use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::StreamError;

use super::{AnswerFeed, FeedEvent};

/// One step of a scripted stream.
#[derive(Debug, Clone)]
pub enum ScriptedEvent {
    Event(FeedEvent),
    /// Pause before the next event. Demo pacing; tests leave it out.
    Delay(Duration),
    /// Transport failure at this point in the stream.
    Fail(String),
}

/// A scripted feed for tests and demo mode. Yields pre-defined events
/// in order, then reports a closed stream.
pub struct ScriptedFeed {
    events: VecDeque<ScriptedEvent>,
}

impl ScriptedFeed {
    pub fn new(events: Vec<ScriptedEvent>) -> Self {
        Self {
            events: events.into(),
        }
    }

    /// Shorthand for a script that is nothing but well-formed envelopes.
    pub fn envelopes(envelopes: Vec<super::envelope::Envelope>) -> Self {
        Self::new(
            envelopes
                .into_iter()
                .map(|e| ScriptedEvent::Event(FeedEvent::Envelope(e)))
                .collect(),
        )
    }
}

#[async_trait]
impl AnswerFeed for ScriptedFeed {
    async fn next_event(&mut self) -> Result<Option<FeedEvent>, StreamError> {
        loop {
            match self.events.pop_front() {
                Some(ScriptedEvent::Event(event)) => return Ok(Some(event)),
                Some(ScriptedEvent::Delay(pause)) => tokio::time::sleep(pause).await,
                Some(ScriptedEvent::Fail(reason)) => return Err(StreamError::Transport(reason)),
                None => return Ok(None),
            }
        }
    }
}

//! Server-sent-events transport for the answer stream.
//!
//! Chunks off the wire land in a [`LineBuffer`] that reassembles them
//! into lines; `data:` lines carry the JSON payloads the codec decodes.
//! Comment lines, event names, and blank keepalives are skipped at this
//! layer so the rest of the crate only ever sees payloads.

use std::collections::VecDeque;

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::BoxStream;
use tracing::debug;

use crate::error::StreamError;

use super::{AnswerFeed, FeedEvent, envelope};

/// Reassembles payload lines from arbitrary byte chunks.
///
/// Buffers bytes, not text: a chunk boundary can land in the middle of
/// a multi-byte character, and UTF-8 conversion must wait until the
/// line is whole. Newlines never occur inside a UTF-8 sequence, so
/// splitting on them first is always safe.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk, collect every payload completed by it. A line
    /// split across chunks stays buffered until its newline arrives.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);

        let mut payloads = Vec::new();
        while let Some(end) = self.buf.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.buf.drain(..=end).collect();
            let line = String::from_utf8_lossy(&raw);
            let line = line.trim();

            if let Some(payload) = line.strip_prefix("data: ")
                && !payload.is_empty()
                && payload != "[DONE]"
            {
                payloads.push(payload.to_string());
            }
        }
        payloads
    }
}

/// Live SSE connection to the analyze endpoint.
pub struct SseFeed {
    chunks: BoxStream<'static, Result<Vec<u8>, reqwest::Error>>,
    lines: LineBuffer,
    pending: VecDeque<String>,
}

impl SseFeed {
    /// Wrap an already-connected response. The caller has checked the
    /// status; from here on the body is ours until it ends or fails.
    pub fn new(response: reqwest::Response) -> Self {
        let chunks = response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()))
            .boxed();
        Self {
            chunks,
            lines: LineBuffer::new(),
            pending: VecDeque::new(),
        }
    }
}

#[async_trait]
impl AnswerFeed for SseFeed {
    async fn next_event(&mut self) -> Result<Option<FeedEvent>, StreamError> {
        loop {
            if let Some(payload) = self.pending.pop_front() {
                return Ok(Some(match envelope::parse(&payload) {
                    Ok(envelope) => FeedEvent::Envelope(envelope),
                    Err(err) => FeedEvent::Malformed(err),
                }));
            }

            match self.chunks.next().await {
                Some(Ok(chunk)) => self.pending.extend(self.lines.push(&chunk)),
                Some(Err(e)) => return Err(StreamError::Transport(e.to_string())),
                None => {
                    debug!("answer stream closed by server");
                    return Ok(None);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_chunk_single_payload() {
        let mut buffer = LineBuffer::new();
        let payloads = buffer.push(b"data: {\"content\":\"hi\"}\n\n");
        assert_eq!(payloads, [r#"{"content":"hi"}"#]);
    }

    #[test]
    fn payload_split_across_chunks_reassembles() {
        let mut buffer = LineBuffer::new();
        assert!(buffer.push(b"data: {\"conte").is_empty());
        let payloads = buffer.push(b"nt\":\"hi\"}\n");
        assert_eq!(payloads, [r#"{"content":"hi"}"#]);
    }

    #[test]
    fn multiple_payloads_in_one_chunk() {
        let mut buffer = LineBuffer::new();
        let payloads = buffer.push(b"data: 1\n\ndata: 2\n\ndata: 3\n");
        assert_eq!(payloads, ["1", "2", "3"]);
    }

    #[test]
    fn crlf_line_endings_are_tolerated() {
        let mut buffer = LineBuffer::new();
        let payloads = buffer.push(b"data: {\"a\":1}\r\n\r\n");
        assert_eq!(payloads, [r#"{"a":1}"#]);
    }

    #[test]
    fn non_data_lines_are_skipped() {
        let mut buffer = LineBuffer::new();
        let payloads = buffer.push(b": keepalive\nevent: message\nid: 3\nretry: 100\ndata: x\n");
        assert_eq!(payloads, ["x"]);
    }

    #[test]
    fn done_marker_and_empty_data_are_skipped() {
        let mut buffer = LineBuffer::new();
        let payloads = buffer.push(b"data: \ndata: [DONE]\ndata: real\n");
        assert_eq!(payloads, ["real"]);
    }

    #[test]
    fn unterminated_tail_stays_buffered() {
        let mut buffer = LineBuffer::new();
        assert!(buffer.push(b"data: no newline yet").is_empty());
        let payloads = buffer.push(b"\n");
        assert_eq!(payloads, ["no newline yet"]);
    }

    #[test]
    fn chunk_boundary_inside_a_multibyte_character_is_harmless() {
        let mut buffer = LineBuffer::new();
        let bytes = "data: {\"content\":\"안녕하세요\"}\n".as_bytes();
        // 20 lands inside the three bytes of '안'.
        let (a, b) = bytes.split_at(20);
        assert!(buffer.push(a).is_empty());
        let payloads = buffer.push(b);
        assert_eq!(payloads, ["{\"content\":\"안녕하세요\"}"]);
    }

    #[test]
    fn byte_by_byte_delivery_still_yields_whole_payloads() {
        let mut buffer = LineBuffer::new();
        let mut payloads = Vec::new();
        for byte in "data: {\"a\":1}\ndata: {\"b\":2}\n".as_bytes() {
            payloads.extend(buffer.push(&[*byte]));
        }
        assert_eq!(payloads, [r#"{"a":1}"#, r#"{"b":2}"#]);
    }
}

//!
//! Server-sent event accumulation for streaming completions.
//!
//! Folds the `data: {json}` events of a streaming chat completion into a single reply
//! string. Malformed events are skipped rather than aborting the stream, and raw byte
//! chunks may split lines anywhere.
//!
//! Authors:
//!   Jaro <yarenty@gmail.com>
//!
//! Copyright (c) 2026 SkyCorp

/* --- uses ------------------------------------------------------------------------------------ */

use bytes::Bytes;
use futures::{Stream, StreamExt};
use serde_json::Value;

/* --- constants ------------------------------------------------------------------------------ */

/** Prefix of SSE data lines */
const DATA_PREFIX: &str = "data: ";

/** Terminal sentinel line */
const DONE_SENTINEL: &str = "data: [DONE]";

/* --- types ----------------------------------------------------------------------------------- */

///
/// Accumulates incremental `delta.content` text from streamed chunks.
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    /** accumulated reply text */
    content: String,
    /** raw bytes of the incomplete trailing line, decoded only once the line is whole */
    buffer: Vec<u8>,
    /** number of events that failed to decode */
    skipped: usize,
}

/* --- start of code -------------------------------------------------------------------------- */

impl StreamAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    ///
    /// Feed a raw byte chunk; complete lines are processed, the remainder is buffered.
    ///
    /// # Arguments
    ///  * `chunk` - bytes as received from the network
    pub fn push_chunk(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);

        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.push_line(&String::from_utf8_lossy(&line));
        }
    }

    ///
    /// Process one complete line of the event stream.
    ///
    /// Empty lines, non-data lines and the `[DONE]` sentinel are ignored. Events whose JSON
    /// does not parse are counted and skipped.
    pub fn push_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() || line == DONE_SENTINEL {
            return;
        }
        let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
            return;
        };

        match serde_json::from_str::<Value>(payload) {
            Ok(event) => {
                if let Some(delta) = delta_content(&event) {
                    self.content.push_str(delta);
                }
            }
            Err(e) => {
                self.skipped += 1;
                tracing::debug!("Skipping malformed stream event: {} - data: {}", e, payload);
            }
        }
    }

    /// Number of events skipped so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    ///
    /// Flush any buffered partial line and return the accumulated text.
    pub fn finish(mut self) -> String {
        if !self.buffer.is_empty() {
            let rest = std::mem::take(&mut self.buffer);
            self.push_line(&String::from_utf8_lossy(&rest));
        }
        if self.skipped > 0 {
            tracing::debug!("Stream finished with {} skipped event(s)", self.skipped);
        }
        self.content
    }
}

/// `choices[0].delta.content`, if present and non-empty.
fn delta_content(event: &Value) -> Option<&str> {
    event
        .get("choices")?
        .get(0)?
        .get("delta")?
        .get("content")?
        .as_str()
        .filter(|s| !s.is_empty())
}

///
/// Drain a byte stream into one accumulated reply.
///
/// # Arguments
///  * `stream` - chunk stream, typically `reqwest::Response::bytes_stream()`
///
/// # Returns
///  * accumulated text
///  * the first stream error; chunk decoding problems are not errors
pub async fn accumulate<S, E>(stream: S) -> std::result::Result<String, E>
where
    S: Stream<Item = std::result::Result<Bytes, E>>,
{
    let mut accumulator = StreamAccumulator::new();
    let mut stream = std::pin::pin!(stream);

    while let Some(chunk) = stream.next().await {
        accumulator.push_chunk(&chunk?);
    }

    Ok(accumulator.finish())
}

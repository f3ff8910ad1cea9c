//! Recording transport for testing.

use crate::application::ports::{Transport, TransportError};
use crate::domain::envelope::{Envelope, SubmissionResponse};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
enum Reply {
    /// Answer `doc-<n>` for the n-th envelope
    Numbered,
    Fixed(SubmissionResponse),
    Fail(String),
}

/// Transport double that records every envelope it is handed.
///
/// Clones share the recorded envelopes, so keep a clone to inspect what the
/// code under test sent.
#[derive(Debug, Clone)]
pub struct RecordingTransport {
    sent: Arc<Mutex<Vec<Envelope>>>,
    reply: Reply,
}

impl RecordingTransport {
    /// Accept every envelope, answering `doc-1`, `doc-2`, ...
    pub fn new() -> Self {
        Self::with_reply(Reply::Numbered)
    }

    /// Accept every envelope with the same response.
    pub fn responding(response: SubmissionResponse) -> Self {
        Self::with_reply(Reply::Fixed(response))
    }

    /// Fail every send with `TransportError::Other(message)`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_reply(Reply::Fail(message.into()))
    }

    fn with_reply(reply: Reply) -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            reply,
        }
    }

    /// Envelopes handed to the transport so far, in order.
    pub fn sent(&self) -> Vec<Envelope> {
        self.sent
            .lock()
            .expect("RecordingTransport mutex poisoned - a test thread panicked while holding the lock")
            .clone()
    }

    /// Number of envelopes handed to the transport so far.
    pub fn count(&self) -> usize {
        self.sent
            .lock()
            .expect("RecordingTransport mutex poisoned - a test thread panicked while holding the lock")
            .len()
    }
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, envelope: &Envelope) -> Result<SubmissionResponse, TransportError> {
        let count = {
            let mut sent = self
                .sent
                .lock()
                .expect("RecordingTransport mutex poisoned - a test thread panicked while holding the lock");
            sent.push(envelope.clone());
            sent.len()
        };

        match &self.reply {
            Reply::Numbered => Ok(SubmissionResponse::accepted(format!("doc-{}", count))),
            Reply::Fixed(response) => Ok(response.clone()),
            Reply::Fail(message) => Err(TransportError::Other(message.clone())),
        }
    }
}

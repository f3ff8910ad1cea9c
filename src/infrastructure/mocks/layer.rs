//! Capturing tracing layer for testing.

use std::fmt::Write as _;
use std::sync::{Arc, Mutex};
use tracing::Level;
use tracing_subscriber::Layer;

/// Layer that captures every event, including all of its fields.
#[derive(Clone, Default)]
pub struct CaptureLayer {
    captured: Arc<Mutex<Vec<CapturedEvent>>>,
}

/// Captured event information.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct CapturedEvent {
    pub level: Level,
    pub target: String,
    pub message: String,
    /// Every non-message field rendered as `name=value`
    pub fields: Vec<String>,
}

impl CapturedEvent {
    /// Message and fields joined into one line.
    pub fn rendered(&self) -> String {
        let mut line = self.message.clone();
        for field in &self.fields {
            let _ = write!(line, " {}", field);
        }
        line
    }
}

impl CaptureLayer {
    /// Create a new capture layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all captured events.
    pub fn get_captured(&self) -> Vec<CapturedEvent> {
        self.captured
            .lock()
            .expect("CaptureLayer mutex poisoned - a test thread panicked while holding the lock")
            .clone()
    }

    /// Get the count of captured events.
    pub fn count(&self) -> usize {
        self.captured
            .lock()
            .expect("CaptureLayer mutex poisoned - a test thread panicked while holding the lock")
            .len()
    }

    /// Check whether any captured message or field value contains `needle`.
    pub fn contains_text(&self, needle: &str) -> bool {
        self.get_captured()
            .iter()
            .any(|event| event.rendered().contains(needle))
    }

    /// Clear all captured events.
    pub fn clear(&self) {
        self.captured
            .lock()
            .expect("CaptureLayer mutex poisoned - a test thread panicked while holding the lock")
            .clear();
    }
}

impl<S> Layer<S> for CaptureLayer
where
    S: tracing::Subscriber,
{
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        self.captured
            .lock()
            .expect("CaptureLayer mutex poisoned - a test thread panicked while holding the lock")
            .push(CapturedEvent {
                level: *event.metadata().level(),
                target: event.metadata().target().to_string(),
                message: visitor.message,
                fields: visitor.fields,
            });
    }
}

#[derive(Default)]
struct EventVisitor {
    message: String,
    fields: Vec<String>,
}

impl tracing::field::Visit for EventVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }
}

//! Demo of rate-gated submission.
//!
//! Submits 7 documents through a gate that admits 3 per second. The
//! transport only logs what it would send, so the timestamps in the output
//! show the gate holding back every submission past the third.
//!
//! Run with `RUST_LOG=debug` to see gate admissions as well.

use async_trait::async_trait;
use registry_throttle::{
    DocumentFormat, DocumentSubmitter, Envelope, SubmissionResponse, TimeUnit, Transport,
    TransportError,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

/// Transport that logs envelopes instead of sending them.
#[derive(Debug, Default)]
struct LoggingTransport {
    next_id: AtomicUsize,
}

#[async_trait]
impl Transport for LoggingTransport {
    async fn send(&self, envelope: &Envelope) -> Result<SubmissionResponse, TransportError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        info!(
            id,
            format = %envelope.document_format(),
            kind = %envelope.kind(),
            payload = envelope.encoded_payload(),
            "envelope delivered"
        );
        Ok(SubmissionResponse::accepted(format!("demo-{}", id)))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let submitter = DocumentSubmitter::builder()
        .with_time_unit(TimeUnit::Seconds)
        .with_request_limit(3)
        .with_product_group("shoes")
        .with_transport(Arc::new(LoggingTransport::default()))
        .build()?;

    println!("=== Rate-Gated Submission Demo ===\n");
    println!("Gate: 3 submissions per second, 7 documents\n");

    let mut handles = Vec::new();
    for n in 1..=7 {
        let submitter = submitter.clone();
        handles.push(tokio::spawn(async move {
            let document = json!({"participant_inn": "7700000000", "n": n});
            submitter
                .submit(&document, "demo-signature", DocumentFormat::Manual)
                .await
        }));
    }

    for handle in handles {
        let response = handle.await??;
        println!("accepted: {:?}", response.value);
    }

    // No encoder handles CSV, so this fails after using a permit
    match submitter
        .submit(&json!({}), "demo-signature", DocumentFormat::Csv)
        .await
    {
        Ok(_) => println!("unexpected success"),
        Err(e) => println!("\nCSV submission failed: {}", e),
    }

    let snapshot = submitter.metrics().snapshot();
    println!("\nadmitted: {}", snapshot.admissions);
    println!("delivered: {}", snapshot.delivered);
    println!("unsupported: {}", snapshot.unsupported_formats);

    submitter.shutdown().await?;
    println!("\n=== Demo Complete ===");
    Ok(())
}

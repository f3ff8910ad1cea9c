//! Integration tests for graceful shutdown of the gate and submitter.

use async_trait::async_trait;
use registry_throttle::{
    DocumentFormat, DocumentSubmitter, Envelope, GateConfig, GateError, RateGate,
    SubmissionResponse, SubmitError, Transport, TransportError,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Default)]
struct CountingTransport {
    sent: AtomicUsize,
}

#[async_trait]
impl Transport for CountingTransport {
    async fn send(&self, _envelope: &Envelope) -> Result<SubmissionResponse, TransportError> {
        self.sent.fetch_add(1, Ordering::SeqCst);
        Ok(SubmissionResponse::default())
    }
}

#[tokio::test]
async fn test_explicit_shutdown_in_application() {
    // Simulates an application that owns a submitter and shuts it down on exit
    struct Application {
        submitter: DocumentSubmitter,
    }

    impl Application {
        async fn shutdown(self) {
            self.submitter
                .shutdown()
                .await
                .expect("gate release task panicked");
        }
    }

    let transport = Arc::new(CountingTransport::default());
    let app = Application {
        submitter: DocumentSubmitter::builder()
            .with_request_limit(10)
            .with_transport(Arc::clone(&transport) as Arc<dyn Transport>)
            .build()
            .unwrap(),
    };

    for i in 0..5 {
        app.submitter
            .submit(&json!({"n": i}), "sig", DocumentFormat::Manual)
            .await
            .unwrap();
    }
    assert_eq!(transport.sent.load(Ordering::SeqCst), 5);

    let gate = Arc::clone(app.submitter.gate());
    app.shutdown().await;
    assert!(gate.is_closed());
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_fails_blocked_submissions() {
    let transport = Arc::new(CountingTransport::default());
    let submitter = DocumentSubmitter::builder()
        .with_interval(Duration::from_secs(60))
        .with_request_limit(1)
        .with_transport(Arc::clone(&transport) as Arc<dyn Transport>)
        .build()
        .unwrap();

    submitter
        .submit(&json!({}), "sig", DocumentFormat::Manual)
        .await
        .unwrap();

    let mut blocked = Vec::new();
    for _ in 0..3 {
        let submitter = submitter.clone();
        blocked.push(tokio::spawn(async move {
            submitter.submit(&json!({}), "sig", DocumentFormat::Manual).await
        }));
    }
    tokio::time::sleep(Duration::from_secs(1)).await;

    submitter.shutdown().await.unwrap();

    for handle in blocked {
        let result = handle.await.unwrap();
        assert!(matches!(result, Err(SubmitError::Gate(GateError::Closed))));
    }
    assert_eq!(transport.sent.load(Ordering::SeqCst), 1);
    assert_eq!(submitter.metrics().snapshot().gate_rejections, 3);
}

#[tokio::test]
async fn test_concurrent_shutdown_safety() {
    let gate = Arc::new(RateGate::new(
        GateConfig::new(Duration::from_secs(1), 4).unwrap(),
    ));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let gate = Arc::clone(&gate);
        handles.push(tokio::spawn(async move { gate.shutdown().await }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    assert!(gate.is_closed());
    assert!(matches!(gate.acquire().await, Err(GateError::Closed)));
}

#[tokio::test]
async fn test_drop_without_shutdown() {
    let gate = RateGate::new(GateConfig::new(Duration::from_millis(10), 1).unwrap());
    let _admission = gate.acquire().await.unwrap();

    // Dropping with a release still scheduled must not panic or leak the task
    drop(gate);
    tokio::time::sleep(Duration::from_millis(20)).await;
}

use async_trait::async_trait;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use registry_throttle::{
    DocumentEncoder, DocumentFormat, DocumentSubmitter, Envelope, GateConfig, JsonDocumentEncoder,
    RateGate, SubmissionResponse, Transport, TransportError,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug)]
struct NoopTransport;

#[async_trait]
impl Transport for NoopTransport {
    async fn send(&self, _envelope: &Envelope) -> Result<SubmissionResponse, TransportError> {
        Ok(SubmissionResponse::default())
    }
}

fn document(products: usize) -> Value {
    let products: Vec<Value> = (0..products)
        .map(|i| {
            json!({
                "uit_code": format!("0104630034070012{:05}", i),
                "tnved_code": "6401",
                "production_date": "2024-01-31",
            })
        })
        .collect();

    json!({
        "participant_inn": "7700000000",
        "producer_inn": "7700000000",
        "production_type": "OWN_PRODUCTION",
        "products": products,
    })
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap()
}

/// Benchmark JSON encoding for documents of growing size
fn bench_json_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("json_encoding");
    let encoder = JsonDocumentEncoder::new();

    for products in [1, 10, 100, 1000] {
        let doc = document(products);
        group.throughput(Throughput::Elements(products as u64));
        group.bench_with_input(BenchmarkId::from_parameter(products), &doc, |b, doc| {
            b.iter(|| encoder.encode(black_box(doc), black_box("signature")))
        });
    }

    group.finish();
}

/// Benchmark uncontended gate admission
fn bench_gate_acquire(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("gate_acquire");

    group.bench_function("uncontended", |b| {
        // Large enough that the benchmark never saturates the gate
        let gate = rt.block_on(async {
            RateGate::new(GateConfig::new(Duration::from_millis(1), 1 << 20).unwrap())
        });
        b.iter(|| rt.block_on(async { black_box(gate.acquire().await.unwrap()) }))
    });

    group.finish();
}

/// Benchmark the full pipeline with a no-op transport
fn bench_submit(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("submit");

    let submitter = rt.block_on(async {
        DocumentSubmitter::builder()
            .with_interval(Duration::from_millis(1))
            .with_request_limit(1 << 20)
            .with_transport(Arc::new(NoopTransport))
            .build()
            .unwrap()
    });

    for products in [1, 100] {
        let doc = document(products);
        group.bench_with_input(BenchmarkId::from_parameter(products), &doc, |b, doc| {
            b.iter(|| {
                rt.block_on(submitter.submit(black_box(doc), "signature", DocumentFormat::Manual))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_json_encoding, bench_gate_acquire, bench_submit);
criterion_main!(benches);

use super::*;
use aeolus_core::adapters::{CapabilityCall, FakeCapabilities};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// A writer that captures log output for testing
#[derive(Clone, Default)]
struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    fn new() -> Self {
        Self::default()
    }

    fn contents(&self) -> String {
        let logs = self.logs.lock().unwrap();
        String::from_utf8_lossy(&logs).to_string()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run a test with captured tracing output
fn with_tracing<T>(f: impl FnOnce() -> T) -> (String, T) {
    let logs = CapturedLogs::new();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(logs.clone())
        .with_ansi(false)
        .without_time()
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    (logs.contents(), result)
}

// =============================================================================
// Pass-through
// =============================================================================

#[test]
fn traced_producer_delegates_to_inner() {
    let fakes = FakeCapabilities::new();
    fakes.set_producer_output(ProducerOutput {
        stdout: "specs".to_string(),
        stderr: String::new(),
        exit_code: 0,
    });
    let traced = TracedPlanSpecProducer::new(fakes.producer());

    let output = traced.produce("e30=").unwrap();

    assert_eq!(output.stdout, "specs");
    assert_eq!(
        fakes.calls(),
        vec![CapabilityCall::Produce {
            encoded: "e30=".to_string()
        }]
    );
}

#[test]
fn traced_fetcher_rejects_blank_key_without_fetching() {
    let fakes = FakeCapabilities::new();
    let traced = TracedPlanGraphFetcher::new(fakes.fetcher());

    let result = traced.fetch("  ");

    assert!(matches!(result, Err(FetchError::NotFound(_))));
    assert!(fakes.calls().is_empty());
}

// =============================================================================
// Tracing output verification tests
// =============================================================================

#[test]
fn traced_producer_logs_span_and_timing() {
    let (logs, result) = with_tracing(|| {
        let fakes = FakeCapabilities::new();
        TracedPlanSpecProducer::new(fakes.producer()).produce("e30=")
    });

    assert!(result.is_ok(), "produce should succeed: {:?}", result);
    assert!(
        logs.contains("producer.produce"),
        "Should log span name. Logs:\n{}",
        logs
    );
    assert!(
        logs.contains("producer finished"),
        "Should log completion. Logs:\n{}",
        logs
    );
    assert!(
        logs.contains("elapsed_ms"),
        "Should log timing. Logs:\n{}",
        logs
    );
}

#[test]
fn traced_producer_logs_launch_failure() {
    let (logs, result) = with_tracing(|| {
        let fakes = FakeCapabilities::new();
        fakes.set_producer_launch_fails(true);
        TracedPlanSpecProducer::new(fakes.producer()).produce("e30=")
    });

    assert!(result.is_err());
    assert!(
        logs.contains("producer failed to run"),
        "Should log failure. Logs:\n{}",
        logs
    );
}

#[test]
fn traced_fetcher_logs_plan_key_and_size() {
    let (logs, result) = with_tracing(|| {
        let fakes = FakeCapabilities::new();
        fakes.add_plan("PROJ-BUILD", "plan: {}");
        TracedPlanGraphFetcher::new(fakes.fetcher()).fetch("PROJ-BUILD")
    });

    assert_eq!(result.unwrap(), "plan: {}");
    assert!(
        logs.contains("bamboo.fetch"),
        "Should log span name. Logs:\n{}",
        logs
    );
    assert!(
        logs.contains("PROJ-BUILD"),
        "Should log plan key. Logs:\n{}",
        logs
    );
    assert!(
        logs.contains("plan fetched"),
        "Should log completion. Logs:\n{}",
        logs
    );
}

#[test]
fn traced_fetcher_warns_on_missing_plan() {
    let (logs, result) = with_tracing(|| {
        let fakes = FakeCapabilities::new();
        TracedPlanGraphFetcher::new(fakes.fetcher()).fetch("NOPE")
    });

    assert!(matches!(result, Err(FetchError::NotFound(_))));
    assert!(
        logs.contains("WARN") && logs.contains("plan not found"),
        "Should warn about the missing plan. Logs:\n{}",
        logs
    );
}

//! tests/common/harness.rs
use async_trait::async_trait;
use lifecycle_worker::{
    WorkError,
    worker::{FnConfigFactory, WorkExecutor, WorkReporter},
};
use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex, Once,
        atomic::{AtomicU32, Ordering},
    },
    time::Duration,
};
use tracing_subscriber::fmt::format::FmtSpan;

/// Initializes tracing for tests, ensuring it's only done once.
pub fn init_tracing() {
    static TRACING_INIT: Once = Once::new();
    TRACING_INIT.call_once(|| {
        let filter = std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "lifecycle_worker=debug".to_string());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::FULL)
            .with_test_writer()
            .init();
    });
}

pub type TestFactory = FnConfigFactory<
    Box<dyn Fn() -> Result<String, WorkError> + Send>,
    Box<dyn Fn() -> Result<String, WorkError> + Send>,
>;

/// A factory numbering its requests `open-N` and `close-N`.
pub fn numbered_factory() -> TestFactory {
    let opened = Arc::new(AtomicU32::new(0));
    let closed = Arc::new(AtomicU32::new(0));
    FnConfigFactory::new(
        Box::new(move || Ok(format!("open-{}", opened.fetch_add(1, Ordering::SeqCst)))),
        Box::new(move || Ok(format!("close-{}", closed.fetch_add(1, Ordering::SeqCst)))),
    )
}

/// One call received by the `MockExecutor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Start(String),
    Stop(String),
    ForceStop(String),
}

/// A scripted executor. Start attempts consume scripted failures first and
/// succeed once the script runs out.
#[derive(Clone, Default)]
pub struct MockExecutor {
    calls: Arc<Mutex<Vec<Call>>>,
    log: Arc<Mutex<Vec<String>>>,
    start_failures: Arc<Mutex<VecDeque<WorkError>>>,
    reporters: Arc<Mutex<Vec<WorkReporter<u32>>>>,
    start_delay: Duration,
    fail_stops: bool,
    next_response: Arc<AtomicU32>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// The first `count` start attempts fail.
    pub fn failing_starts(self, count: usize) -> Self {
        {
            let mut failures = self.start_failures.lock().unwrap();
            for i in 0..count {
                failures.push_back(WorkError::new(format!("refused #{}", i)));
            }
        }
        self
    }

    /// Every graceful stop fails.
    pub fn failing_stops(mut self) -> Self {
        self.fail_stops = true;
        self
    }

    /// Every start attempt takes `delay` before reporting.
    pub fn with_start_delay(mut self, delay: Duration) -> Self {
        self.start_delay = delay;
        self
    }

    /// Shares a log that records each call as it begins.
    pub fn with_log(mut self, log: Arc<Mutex<Vec<String>>>) -> Self {
        self.log = log;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn start_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Start(_)))
            .count()
    }

    /// The reporter handed to the `index`-th start attempt.
    pub fn reporter(&self, index: usize) -> WorkReporter<u32> {
        self.reporters.lock().unwrap()[index].clone()
    }

    fn record(&self, call: Call) {
        self.log.lock().unwrap().push(format!("call:{:?}", call));
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl WorkExecutor for MockExecutor {
    type Request = String;
    type Response = u32;

    async fn start_work(
        &self,
        request: String,
        reporter: WorkReporter<u32>,
    ) -> Result<u32, WorkError> {
        self.record(Call::Start(request));
        self.reporters.lock().unwrap().push(reporter);
        if !self.start_delay.is_zero() {
            tokio::time::sleep(self.start_delay).await;
        }
        let failure = self.start_failures.lock().unwrap().pop_front();
        match failure {
            Some(error) => Err(error),
            None => Ok(self.next_response.fetch_add(1, Ordering::SeqCst)),
        }
    }

    async fn stop_work(&self, request: String) -> Result<u32, WorkError> {
        self.record(Call::Stop(request));
        if self.fail_stops {
            return Err(WorkError::new("close refused"));
        }
        Ok(1000)
    }

    async fn force_stop_work(&self, request: String) {
        self.record(Call::ForceStop(request));
    }
}

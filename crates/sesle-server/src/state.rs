//! Application state shared by both HTTP front-ends.

use std::sync::Arc;

use sesle_core::SpeechRuntime;
use tokio::sync::Semaphore;

/// Shared application state with backpressure.
#[derive(Clone)]
pub struct AppState {
    /// Runtime reference - using Arc for cheap clones
    pub runtime: Arc<SpeechRuntime>,
    /// Concurrency limiter to prevent resource exhaustion
    pub request_semaphore: Arc<Semaphore>,
    /// Request timeout configuration (seconds)
    pub request_timeout_secs: u64,
}

impl AppState {
    pub fn new(runtime: SpeechRuntime) -> Self {
        Self::with_runtime(Arc::new(runtime))
    }

    pub fn with_runtime(runtime: Arc<SpeechRuntime>) -> Self {
        // Limit concurrent requests to prevent overwhelming the system
        let max_concurrent = std::env::var("MAX_CONCURRENT_REQUESTS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(100);

        let timeout = std::env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(300); // 5 minutes default

        Self {
            runtime,
            request_semaphore: Arc::new(Semaphore::new(max_concurrent)),
            request_timeout_secs: timeout,
        }
    }

    /// Acquire a permit for concurrent request processing
    pub async fn acquire_permit(&self) -> tokio::sync::SemaphorePermit<'_> {
        self.request_semaphore
            .acquire()
            .await
            .expect("Semaphore should never be closed")
    }
}

//! REST API handlers.

pub mod curriculum;
pub mod health;
pub mod tutor;

use std::time::Instant;

/// Per-request id and start time for the response envelope.
pub(crate) struct RequestClock {
    pub request_id: String,
    start: Instant,
}

impl RequestClock {
    pub fn start() -> Self {
        Self {
            request_id: uuid::Uuid::now_v7().to_string(),
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

use std::thread;
use std::time::Duration;

use crate::config::PacingConfig;
use crate::model::error::remote_errors::RemoteError;

/// Keeps remote calls under the store's rate limit.
///
/// Every call waits `call_delay` first. Transient failures (rate limits, timeouts) wait `backoff` and
/// retry the exact same call, up to `max_retries` times, after which the last error is handed back
#[derive(Debug, Clone)]
pub struct Pacing {
    pub call_delay: Duration,
    pub backoff: Duration,
    pub max_retries: u32,
}

impl Pacing {
    pub fn new(call_delay: Duration, backoff: Duration, max_retries: u32) -> Self {
        Self {
            call_delay,
            backoff,
            max_retries,
        }
    }

    /// runs `op` with the configured delay and transient-error retries
    ///
    /// * `description` - what the call is doing, only used for log messages
    pub fn call<T, F>(&self, description: &str, mut op: F) -> Result<T, RemoteError>
    where
        F: FnMut() -> Result<T, RemoteError>,
    {
        let mut attempt: u32 = 0;
        loop {
            if !self.call_delay.is_zero() {
                thread::sleep(self.call_delay);
            }
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    log::warn!(
                        "{description} failed ({e}), retrying in {}ms (attempt {attempt} of {})",
                        self.backoff.as_millis(),
                        self.max_retries
                    );
                    thread::sleep(self.backoff);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl From<&PacingConfig> for Pacing {
    fn from(value: &PacingConfig) -> Self {
        Self::new(value.call_delay(), value.backoff(), value.max_retries)
    }
}

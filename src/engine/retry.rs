//! # engine::retry
//!
//! **Retry Controller**: runs the full two-page fetch up to
//! `max_attempts` times.
//!
//! ```text
//! attempt ──ok──▶ ReadingSet
//!    │
//!   err ──▶ source.release()  (poisoned session is never reused)
//!    │
//!    ├─ attempts left ─▶ sleep(backoff) ─▶ attempt
//!    └─ exhausted ─────▶ RetryExhausted   (never zeros)
//! ```

use std::time::Duration;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::fetch::{collect_readings, CellSource, FetchError, PageSpec};
use crate::models::ReadingSet;

#[derive(Debug, Error)]
#[error("no OI data after {attempts} attempt(s): {last_error}")]
pub struct RetryExhausted {
    pub attempts: u32,
    pub last_error: FetchError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Pause between a failed attempt and the next one.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    pub async fn run(
        &self,
        source: &mut dyn CellSource,
        layout: &[PageSpec],
    ) -> Result<ReadingSet, RetryExhausted> {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match collect_readings(source, layout).await {
                Ok(readings) => {
                    if attempt > 1 {
                        info!(attempt, "OI fetch recovered after retry");
                    }
                    return Ok(readings);
                }
                Err(e) => {
                    warn!(
                        attempt,
                        max_attempts,
                        backend = source.backend(),
                        error = %e,
                        "OI fetch attempt failed — releasing fetch resource"
                    );
                    source.release().await;

                    if attempt >= max_attempts {
                        error!(attempts = max_attempts, "OI fetch retries exhausted");
                        return Err(RetryExhausted {
                            attempts: max_attempts,
                            last_error: e,
                        });
                    }

                    tokio::time::sleep(self.backoff).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::fake::FakeSource;
    use crate::fetch::COINALYZE;

    #[tokio::test(start_paused = true)]
    async fn test_first_attempt_succeeds() {
        let mut source = FakeSource::with_values("100", "60", "50");
        let stats = source.stats();

        let readings = RetryPolicy::default().run(&mut source, COINALYZE).await.unwrap();

        assert_eq!(readings, ReadingSet::new(100.0, 60.0, 50.0));
        assert_eq!(stats.releases(), 0);
        assert_eq!(stats.page_fetches(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_third_attempt() {
        let mut source = FakeSource::with_values("100", "60", "50").failing_first(2);
        let stats = source.stats();
        let started = tokio::time::Instant::now();

        let readings = RetryPolicy::default().run(&mut source, COINALYZE).await.unwrap();

        assert_eq!(readings, ReadingSet::new(100.0, 60.0, 50.0));
        assert_eq!(stats.releases(), 2);
        assert!(started.elapsed() >= Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_is_explicit_failure() {
        let mut source = FakeSource::with_values("100", "60", "50").failing_first(u32::MAX);
        let stats = source.stats();

        let err = RetryPolicy::default().run(&mut source, COINALYZE).await.unwrap_err();

        assert_eq!(err.attempts, 3);
        assert!(matches!(err.last_error, FetchError::Session(_)));
        // Released after every failure, including the last one.
        assert_eq!(stats.releases(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_attempts_still_tries_once() {
        let policy = RetryPolicy { max_attempts: 0, backoff: Duration::ZERO };
        let mut source = FakeSource::with_values("1", "2", "3");
        assert!(policy.run(&mut source, COINALYZE).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_cells_are_not_retried() {
        let mut source = FakeSource::with_values("100", "60", "50").missing(crate::models::Asset::Alt);
        let stats = source.stats();

        let readings = RetryPolicy::default().run(&mut source, COINALYZE).await.unwrap();

        assert_eq!(readings.alt, 0.0);
        assert_eq!(stats.releases(), 0);
    }
}

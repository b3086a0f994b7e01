use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cancelled while waiting for the rate limiter")]
pub struct Cancelled;

/// Token bucket with a burst of one.
///
/// Each caller reserves the next free slot under the lock and then sleeps
/// outside of it, so concurrent callers are released one `interval` apart.
pub struct RateLimiter {
    next_slot: Mutex<Instant>,
    interval: Duration,
}

impl RateLimiter {
    pub fn new(per_second: u32) -> Self {
        Self {
            next_slot: Mutex::new(Instant::now()),
            interval: Duration::from_secs(1) / per_second.max(1),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits for a token. Returns promptly with [`Cancelled`] if `cancel` fires first.
    pub async fn acquire(&self, cancel: &CancellationToken) -> Result<(), Cancelled> {
        if cancel.is_cancelled() {
            return Err(Cancelled);
        }

        let ready_at = {
            let mut next_slot = self.next_slot.lock().await;
            let ready_at = (*next_slot).max(Instant::now());
            *next_slot = ready_at + self.interval;
            ready_at
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Cancelled),
            _ = sleep_until(ready_at) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn first_token_is_immediate() {
        let limiter = RateLimiter::new(5);
        let cancel = CancellationToken::new();
        let start = Instant::now();

        limiter.acquire(&cancel).await.unwrap();

        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn spaces_tokens_by_refill_interval() {
        let limiter = RateLimiter::new(5);
        let cancel = CancellationToken::new();
        let start = Instant::now();

        for _ in 0..3 {
            limiter.acquire(&cancel).await.unwrap();
        }

        assert_eq!(limiter.interval(), Duration::from_millis(200));
        assert!(start.elapsed() >= Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn shared_between_concurrent_callers() {
        let limiter = Arc::new(RateLimiter::new(3));
        let cancel = CancellationToken::new();
        let start = Instant::now();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                let cancel = cancel.clone();
                tokio::spawn(async move { limiter.acquire(&cancel).await })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        // Four tokens at 3/s: the last one is released three intervals after the first.
        assert!(start.elapsed() >= limiter.interval() * 3);
    }

    #[tokio::test(start_paused = true)]
    async fn already_cancelled_fails_without_waiting() {
        let limiter = RateLimiter::new(1);
        let cancel = CancellationToken::new();
        cancel.cancel();

        assert_eq!(limiter.acquire(&cancel).await, Err(Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_interrupts_a_pending_wait() {
        let limiter = RateLimiter::new(1);
        let cancel = CancellationToken::new();
        limiter.acquire(&cancel).await.unwrap();

        let (waited, _) = tokio::join!(limiter.acquire(&cancel), async { cancel.cancel() });

        assert_eq!(waited, Err(Cancelled));
    }
}

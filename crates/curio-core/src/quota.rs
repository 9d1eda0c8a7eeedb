use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Per-provider courtesy budget, distinct from the process-wide pacer.
///
/// The public collection API asks anonymous clients to stay under a
/// per-minute budget; this tracker spreads that budget across the window so
/// a burst at the top of a minute cannot consume it all at once.
#[derive(Clone)]
pub struct ProviderQuota {
    limiter: Arc<DirectRateLimiter>,
    window: Duration,
    limit: u32,
}

impl ProviderQuota {
    pub fn new(window: Duration, limit: u32) -> Self {
        Self {
            limiter: Arc::new(RateLimiter::direct(quota_from_window(window, limit))),
            window,
            limit,
        }
    }

    /// Default budget for the Art Institute of Chicago public API: 60 calls
    /// per minute for anonymous use.
    pub fn artic_default() -> Self {
        Self::new(Duration::from_secs(60), 60)
    }

    pub const fn window(&self) -> Duration {
        self.window
    }

    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Consumes one budget cell if available.
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }

    /// Waits until a budget cell is available, then consumes it.
    pub async fn acquire(&self) {
        self.limiter.until_ready().await;
    }
}

impl std::fmt::Debug for ProviderQuota {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderQuota")
            .field("window", &self.window)
            .field("limit", &self.limit)
            .finish()
    }
}

fn quota_from_window(window: Duration, limit: u32) -> Quota {
    let safe_limit = limit.max(1);
    let burst = NonZeroU32::new(safe_limit).expect("safe limit must be non-zero");

    let seconds_per_cell = (window.as_secs_f64() / f64::from(safe_limit)).max(0.001);
    let period = Duration::from_secs_f64(seconds_per_cell);

    Quota::with_period(period)
        .expect("period is always greater than zero")
        .allow_burst(burst)
}

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Ceiling configuration for the process-wide call pacer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleConfig {
    pub max_calls_per_window: u32,
    pub window: Duration,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            max_calls_per_window: 80,
            window: Duration::from_secs(1),
        }
    }
}

#[derive(Debug)]
struct WindowState {
    started: Instant,
    calls: u32,
}

/// Process-wide outbound call pacer shared by every call site.
///
/// Acquisition cannot fail, only delay. The check-and-increment runs under a
/// single mutex so two concurrent callers can never both observe a free slot
/// and push the count past the ceiling; tokio's mutex hands the lock to
/// waiters in FIFO order, which keeps acquisition fair under bursts.
#[derive(Debug, Clone)]
pub struct CallThrottle {
    config: ThrottleConfig,
    window: Arc<Mutex<WindowState>>,
}

impl Default for CallThrottle {
    fn default() -> Self {
        Self::new(ThrottleConfig::default())
    }
}

impl CallThrottle {
    pub fn new(config: ThrottleConfig) -> Self {
        let config = ThrottleConfig {
            max_calls_per_window: config.max_calls_per_window.max(1),
            window: config.window,
        };
        Self {
            config,
            window: Arc::new(Mutex::new(WindowState {
                started: Instant::now(),
                calls: 0,
            })),
        }
    }

    pub const fn config(&self) -> ThrottleConfig {
        self.config
    }

    /// Resolves when it is safe to issue one call.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut window = self.window.lock().await;
                let now = Instant::now();
                let elapsed = now.duration_since(window.started);

                if elapsed >= self.config.window {
                    window.started = now;
                    window.calls = 0;
                }

                if window.calls < self.config.max_calls_per_window {
                    window.calls += 1;
                    return;
                }

                // Ceiling reached: sleep out the remainder of the window,
                // then re-check from scratch.
                self.config.window - elapsed
            };

            tokio::time::sleep(wait).await;
        }
    }
}

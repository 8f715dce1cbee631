use crate::domain::model::{Address, GeocodeOutcome};
use crate::domain::ports::Geocoder;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Enforces a minimum spacing between requests per key (usually one key
/// per upstream endpoint). Clones share the same state; keys never wait on
/// each other.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    min_interval: Duration,
    next_slot: Arc<Mutex<HashMap<String, Instant>>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_slot: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Reserves the next free slot for `key` and waits until it starts.
    /// Concurrent callers on the same key get consecutive slots.
    pub async fn acquire(&self, key: &str) {
        let slot = {
            let mut next_slot = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = match next_slot.get(key) {
                Some(reserved) if *reserved > now => *reserved,
                _ => now,
            };
            next_slot.insert(key.to_string(), slot + self.min_interval);
            slot
        };

        let now = Instant::now();
        if slot > now {
            tracing::debug!("Rate limit for '{}': waiting {:?}", key, slot - now);
            tokio::time::sleep_until(slot).await;
        }
    }
}

/// Wraps any [`Geocoder`] so every lookup first passes through a shared
/// [`RateLimiter`].
pub struct RateLimitedGeocoder<G: Geocoder> {
    inner: G,
    limiter: RateLimiter,
    key: String,
}

impl<G: Geocoder> RateLimitedGeocoder<G> {
    pub fn new(inner: G, limiter: RateLimiter, key: impl Into<String>) -> Self {
        Self {
            inner,
            limiter,
            key: key.into(),
        }
    }
}

#[async_trait]
impl<G: Geocoder> Geocoder for RateLimitedGeocoder<G> {
    async fn geocode(&self, address: &Address) -> Result<GeocodeOutcome> {
        self.limiter.acquire(&self.key).await;
        self.inner.geocode(address).await
    }
}

//! Redis-backed fixed-window rate limiter.

use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};

use crate::config::{Config, CACHE_PREFIX_RATE_LIMIT};
use crate::errors::AppResult;

/// Outcome of a single rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub count: u64,
    pub limit: u64,
    pub allowed: bool,
}

impl RateLimitDecision {
    fn new(count: u64, limit: u64) -> Self {
        Self {
            count,
            limit,
            allowed: count <= limit,
        }
    }

    pub fn remaining(&self) -> u64 {
        self.limit.saturating_sub(self.count)
    }
}

/// Counter store shared by every rate-limited route group.
#[derive(Clone)]
pub struct RateLimiter {
    connection: ConnectionManager,
    trust_proxy_headers: bool,
}

impl RateLimiter {
    /// Connect to Redis, returning an error instead of panicking.
    pub async fn try_connect(config: &Config) -> Result<Self, RedisError> {
        let client = Client::open(config.redis_url.as_str())?;
        let connection = ConnectionManager::new(client).await?;

        tracing::info!("Rate limiter connected to Redis");

        Ok(Self {
            connection,
            trust_proxy_headers: config.trust_proxy_headers,
        })
    }

    /// Whether clients may be identified by proxy-supplied headers
    pub fn trusts_proxy_headers(&self) -> bool {
        self.trust_proxy_headers
    }

    /// Count one request against `identifier`'s current window.
    ///
    /// The window starts with the first request and expires after
    /// `window_seconds`; the counter is not reset by later requests. A
    /// counter found without a TTL (a previous `EXPIRE` never landed) gets
    /// one on the next request, so a window can never become permanent.
    pub async fn check(
        &self,
        identifier: &str,
        max_requests: u64,
        window_seconds: u64,
    ) -> AppResult<RateLimitDecision> {
        let key = format!("{}{}", CACHE_PREFIX_RATE_LIMIT, identifier);
        let mut conn = self.connection.clone();

        let (count, ttl): (u64, i64) = redis::pipe()
            .atomic()
            .incr(&key, 1u64)
            .ttl(&key)
            .query_async(&mut conn)
            .await?;

        if needs_expiry(ttl) {
            let _: () = conn.expire(&key, window_seconds as i64).await?;
        }

        Ok(RateLimitDecision::new(count, max_requests))
    }

    /// Check connectivity
    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

/// `TTL` answers -1 for a key that exists without an expiry
fn needs_expiry(ttl: i64) -> bool {
    ttl == -1
}

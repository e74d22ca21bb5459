//! Per-client rate limiting for the proxy routes.

use crate::{config::RateLimitConfig, error::ApiError};
use actix_web::HttpRequest;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
    time::{Duration, Instant},
};

/// Simple in-memory rate limiter
///
/// Counts requests per key in fixed windows of `period_seconds`. Expired
/// windows are dropped on every check so the map only holds active clients.
#[derive(Clone)]
pub struct SimpleRateLimiter {
    config: RateLimitConfig,
    storage: Arc<Mutex<HashMap<String, (usize, Instant)>>>,
}

impl SimpleRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            storage: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns `true` if the request should be allowed, `false` if rate limited.
    pub fn check_rate_limit(&self, key: &str) -> bool {
        let mut storage = self.storage.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        let period = Duration::from_secs(self.config.period_seconds);

        storage.retain(|_, (_, started)| now.duration_since(*started) < period);

        match storage.get_mut(key) {
            Some((count, _)) if *count >= self.config.requests_per_window => false,
            Some((count, _)) => {
                *count += 1;
                true
            }
            None => {
                storage.insert(key.to_string(), (1, now));
                true
            }
        }
    }
}

/// Check the caller's peer address against `limiter`.
///
/// The peer address is used rather than forwarding headers, which the
/// client controls.
pub fn rate_limit_middleware(
    req: &HttpRequest,
    limiter: &SimpleRateLimiter,
) -> Result<(), ApiError> {
    let ip = req
        .connection_info()
        .peer_addr()
        .unwrap_or("unknown")
        .to_string();

    if !limiter.check_rate_limit(&ip) {
        tracing::warn!(ip_address = %ip, "Rate limit exceeded");
        return Err(ApiError::RateLimited);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn limiter(requests: usize, period_seconds: u64) -> SimpleRateLimiter {
        SimpleRateLimiter::new(RateLimitConfig {
            requests_per_window: requests,
            period_seconds,
        })
    }

    #[test]
    fn blocks_after_quota() {
        let limiter = limiter(2, 60);
        assert!(limiter.check_rate_limit("10.0.0.1"));
        assert!(limiter.check_rate_limit("10.0.0.1"));
        assert!(!limiter.check_rate_limit("10.0.0.1"));
        // Other clients keep their own window
        assert!(limiter.check_rate_limit("10.0.0.2"));
    }

    #[test]
    fn window_expires() {
        let limiter = limiter(1, 0);
        assert!(limiter.check_rate_limit("a"));
        assert!(limiter.check_rate_limit("a"));
    }

    #[test]
    fn middleware_returns_429_error() {
        let limiter = limiter(1, 60);
        let req = TestRequest::default()
            .peer_addr("192.0.2.1:4000".parse().unwrap())
            .to_http_request();

        assert!(rate_limit_middleware(&req, &limiter).is_ok());
        assert!(matches!(
            rate_limit_middleware(&req, &limiter),
            Err(ApiError::RateLimited)
        ));
    }
}

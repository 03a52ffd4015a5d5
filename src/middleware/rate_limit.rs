use axum::{
    Json,
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::{
    net::{IpAddr, SocketAddr},
    sync::{Arc, Mutex},
};
use tracing::warn;

use crate::response::ErrorResponse;

/// Fixed-window request counter per client IP.
#[derive(Clone)]
pub struct RateLimit {
    store: Arc<DashMap<IpAddr, RateLimitData>>,
    last_sweep: Arc<Mutex<DateTime<Utc>>>,
    max_requests: u32,
    window: Duration,
}

#[derive(Debug, Clone)]
struct RateLimitData {
    count: u32,
    window_start: DateTime<Utc>,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_seconds: i64) -> Self {
        Self {
            store: Arc::new(DashMap::new()),
            last_sweep: Arc::new(Mutex::new(Utc::now())),
            max_requests,
            window: Duration::seconds(window_seconds),
        }
    }

    /// Counts one request from `ip` at `now`; false once the window is spent.
    pub fn check(&self, ip: IpAddr, now: DateTime<Utc>) -> bool {
        self.sweep(now);

        let mut entry = self.store.entry(ip).or_insert_with(|| RateLimitData {
            count: 0,
            window_start: now,
        });
        let data = entry.value_mut();

        if now.signed_duration_since(data.window_start) >= self.window {
            data.count = 0;
            data.window_start = now;
        }

        data.count = data.count.saturating_add(1);
        data.count <= self.max_requests
    }

    /// Number of clients currently holding a window.
    pub fn tracked_clients(&self) -> usize {
        self.store.len()
    }

    /// Drops expired windows, at most once per window. Contended calls skip it.
    fn sweep(&self, now: DateTime<Utc>) {
        let Ok(mut last_sweep) = self.last_sweep.try_lock() else {
            return;
        };
        if now.signed_duration_since(*last_sweep) < self.window {
            return;
        }
        *last_sweep = now;
        drop(last_sweep);

        let window = self.window;
        self.store
            .retain(|_, data| now.signed_duration_since(data.window_start) < window);
    }
}

/// IP-based rate limiting middleware. Needs `into_make_service_with_connect_info`.
pub async fn rate_limit_middleware(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(rate_limit): State<RateLimit>,
    req: Request,
    next: Next,
) -> Response {
    if !rate_limit.check(addr.ip(), Utc::now()) {
        warn!(ip = %addr.ip(), "rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(ErrorResponse::new("too many requests")),
        )
            .into_response();
    }

    next.run(req).await
}

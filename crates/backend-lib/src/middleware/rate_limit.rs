// ============================
// crates/backend-lib/src/middleware/rate_limit.rs
// ============================
//! Fixed-window per-client rate limiting for credential endpoints.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::AppError;
use crate::storage::Store;
use crate::AppState;

/// Rate limit entry for a client
#[derive(Debug)]
pub struct RateLimitEntry {
    requests: u32,
    window_start: Instant,
}

/// Rate limiter middleware
pub async fn rate_limit<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let client_ip = request
        .headers()
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let max_requests = state.settings.rate_limit.max_requests;
    let window = Duration::from_secs(state.settings.rate_limit.window_secs);

    {
        let mut entry = state
            .rate_limits
            .entry(client_ip)
            .or_insert_with(|| RateLimitEntry {
                requests: 0,
                window_start: Instant::now(),
            });

        if entry.window_start.elapsed() > window {
            entry.requests = 0;
            entry.window_start = Instant::now();
        }

        if entry.requests >= max_requests {
            return Err(AppError::RateLimitExceeded);
        }
        entry.requests += 1;
    }

    Ok(next.run(request).await)
}

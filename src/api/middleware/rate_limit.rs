//! Per-client rate limiting using the token bucket algorithm.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Replenish one request slot every this many milliseconds.
const REPLENISH_INTERVAL_MS: u64 = 100;
/// Requests a single client may burst before being throttled.
const BURST_SIZE: u32 = 50;

/// Creates a rate limiter keyed by the socket peer address.
///
/// Requests exceeding the limit receive `429 Too Many Requests`. Requires the
/// server to be started with connect info.
pub fn layer() -> GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>
{
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_millisecond(REPLENISH_INTERVAL_MS)
            .burst_size(BURST_SIZE)
            .finish()
            .expect("rate limiter period and burst size are non-zero"),
    );

    GovernorLayer::new(governor_conf)
}

/// Creates a rate limiter keyed by the client address reported by a reverse proxy.
///
/// Reads `X-Forwarded-For`, `X-Real-IP` and `Forwarded` before falling back
/// to the peer address. Only use behind a trusted proxy, since clients can
/// set these headers themselves.
pub fn proxied_layer()
-> GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(SmartIpKeyExtractor)
            .per_millisecond(REPLENISH_INTERVAL_MS)
            .burst_size(BURST_SIZE)
            .finish()
            .expect("rate limiter period and burst size are non-zero"),
    );

    GovernorLayer::new(governor_conf)
}

// src/utils/rate_limit.rs

use std::{sync::Arc, time::Duration};

use axum::routing::MethodRouter;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};

/// Replenish interval that spreads `per_minute` requests over a minute.
pub fn replenish_interval(per_minute: u32) -> Duration {
    let per_minute = u64::from(per_minute.max(1));
    Duration::from_millis((60_000 / per_minute).max(1))
}

/// Gives `route` a limiter of its own, keyed by peer IP, so each endpoint has
/// a separate quota per caller: `per_minute` requests per minute with the
/// whole quota available as a burst.
///
/// The peer IP is read from `ConnectInfo<SocketAddr>`. Spawns a task that
/// purges idle keys every minute, so it must be called inside a Tokio
/// runtime.
pub fn rate_limited<S>(route: MethodRouter<S>, per_minute: u32) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    let replenish_ms = replenish_interval(per_minute).as_millis() as u64;

    let governor_conf = GovernorConfigBuilder::default()
        .per_millisecond(replenish_ms)
        .burst_size(per_minute.max(1))
        .finish()
        .expect("replenish interval and burst size are non-zero");

    let governor_limiter = governor_conf.limiter().clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            governor_limiter.retain_recent();
            tracing::debug!(keys = governor_limiter.len(), "Rate limiter pruned");
        }
    });

    route.layer(GovernorLayer::new(Arc::new(governor_conf)))
}

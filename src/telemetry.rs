use std::time::Duration;

use anyhow::{anyhow, Context};
use axum::{
    body::Body,
    http::{Request, Response},
};
use tracing::{field, Span};
use tracing_subscriber::EnvFilter;

use crate::config::{LogConfig, LogFormat};

/// Installs the global subscriber. Fails if the filter does not parse or a
/// subscriber is already set.
pub fn init(cfg: &LogConfig) -> anyhow::Result<()> {
    let fmt = tracing_subscriber::fmt().with_env_filter(env_filter(cfg)?);
    match cfg.format {
        LogFormat::Json => fmt.with_target(false).json().try_init(),
        LogFormat::Pretty => fmt.try_init(),
    }
    .map_err(|e| anyhow!("install tracing subscriber: {e}"))
}

fn env_filter(cfg: &LogConfig) -> anyhow::Result<EnvFilter> {
    EnvFilter::try_new(&cfg.filter).with_context(|| format!("invalid RUST_LOG {:?}", cfg.filter))
}

pub fn request_span(req: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        method = %req.method(),
        path = %req.uri().path(),
        status = field::Empty,
    )
}

pub fn record_response(res: &Response<Body>, latency: Duration, span: &Span) {
    let status = res.status();
    span.record("status", status.as_u16());
    let elapsed_ms = latency.as_millis() as u64;
    match status.as_u16() {
        500.. => tracing::error!(status = status.as_u16(), elapsed_ms, "request failed"),
        400..=499 => tracing::warn!(status = status.as_u16(), elapsed_ms, "request rejected"),
        _ => tracing::info!(status = status.as_u16(), elapsed_ms, "request finished"),
    }
}

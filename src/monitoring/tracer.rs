/*!
 * Structured Tracing
 * Subscriber setup and spans for policy resolution and compilation
 *
 * Features:
 * - Launch IDs for log correlation
 * - JSON-formatted logs for structured parsing
 * - Timing recorded on span close
 */

use std::time::Instant;
use tracing::{debug, info, span, warn, Level};
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Enables JSON output when set to `1` or `true`
pub const TRACE_JSON_ENV: &str = "SANDBOX_TRACE_JSON";

/// Initialize structured tracing on stderr
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - SANDBOX_TRACE_JSON: Enable JSON output (default: false)
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var(TRACE_JSON_ENV)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    // try_init: a second call (tests, embedding callers) keeps the first subscriber
    if use_json {
        let _ = registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init();
    } else {
        let _ = registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init();
    }
    debug!(json = use_json, "tracing initialized");
}

/// Span around one policy compilation
pub struct CompileSpan {
    span: tracing::Span,
    start: Instant,
}

impl CompileSpan {
    pub fn new(level: impl std::fmt::Display) -> Self {
        let span = span!(
            Level::DEBUG,
            "compile",
            level = %level,
            directives = tracing::field::Empty,
            duration_us = tracing::field::Empty,
            result = tracing::field::Empty,
            error = tracing::field::Empty,
        );
        Self {
            span,
            start: Instant::now(),
        }
    }

    /// Record the number of emitted directives
    pub fn record_directives(&self, count: usize) {
        self.span.record("directives", count);
        self.span.record("result", "success");
    }

    pub fn record_error(&self, error: &str) {
        self.span.record("error", error);
        self.span.record("result", "error");
    }

    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}

impl Drop for CompileSpan {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        self.span.record("duration_us", duration.as_micros());
        let _entered = self.span.enter();
        if duration.as_millis() > 50 {
            warn!(duration_ms = duration.as_millis(), slow = true, "slow policy compile");
        }
    }
}

/// Span carrying a launch id through resolution and argv rendering
pub struct LaunchSpan {
    span: tracing::Span,
}

impl LaunchSpan {
    pub fn new(app: &str, launch_id: impl std::fmt::Display) -> Self {
        let span = span!(Level::INFO, "launch", app = app, launch_id = %launch_id);
        {
            let _entered = span.enter();
            info!("launch plan started");
        }
        Self { span }
    }

    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}

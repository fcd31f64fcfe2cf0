// crates/fusion-observe/src/lib.rs
// ============================================================================
// Module: Governance Observer
// Description: Span and event instrumentation around governance operations.
// Purpose: Wrap governance calls in tracing spans plus structured sink events.
// Dependencies: serde, tracing
// ============================================================================

//! ## Overview
//! The observer wraps synchronous and async governance operations. Each
//! observed call opens a `mcp.governance` tracing span carrying the
//! operation name, and on completion emits one [`GovernanceEvent`] to the
//! configured sink: outcome, duration, and failure detail. The tracing
//! layer and the sink are independent; both fire when configured. A
//! disabled observer invokes the wrapped function with no instrumentation
//! at all.
//!
//! This crate is intentionally dependency-light so deployments can plug in
//! Prometheus or OpenTelemetry exporters without redesign.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Display;
use std::sync::Arc;
use std::time::Instant;

use serde::Deserialize;
use serde::Serialize;
use tracing::Instrument as _;

// ============================================================================
// SECTION: Events
// ============================================================================

/// Outcome label for a governance event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GovernanceOutcome {
    /// Operation completed.
    Success,
    /// Operation failed; `detail` carries the error message.
    Failure,
}

impl GovernanceOutcome {
    /// Returns the stable label for the outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

/// Event kind discriminator; always `governance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GovernanceEventKind {
    /// Governance operation record.
    Governance,
}

/// Structured record emitted for each observed operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernanceEvent {
    /// Event kind; always `governance`.
    #[serde(rename = "type")]
    pub kind: GovernanceEventKind,
    /// Observed operation name.
    pub operation: String,
    /// Operation outcome.
    pub outcome: GovernanceOutcome,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
    /// Failure detail when the outcome is `failure`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

// ============================================================================
// SECTION: Sink
// ============================================================================

/// Sink for governance events.
pub trait GovernanceSink: Send + Sync {
    /// Records one governance event.
    fn record(&self, event: &GovernanceEvent);
}

/// No-op sink.
///
/// # Invariants
/// - Events are intentionally discarded.
pub struct NoopSink;

impl GovernanceSink for NoopSink {
    fn record(&self, _event: &GovernanceEvent) {}
}

// ============================================================================
// SECTION: Observer
// ============================================================================

/// Observer wrapping governance operations in spans and sink events.
pub struct GovernanceObserver {
    /// Configured event sink.
    sink: Arc<dyn GovernanceSink>,
    /// When `false`, observed calls run with no instrumentation.
    enabled: bool,
}

impl GovernanceObserver {
    /// Creates an observer emitting to the provided sink.
    #[must_use]
    pub fn new(sink: Arc<dyn GovernanceSink>) -> Self {
        Self {
            sink,
            enabled: true,
        }
    }

    /// Creates an observer that emits spans only.
    #[must_use]
    pub fn spans_only() -> Self {
        Self::new(Arc::new(NoopSink))
    }

    /// Creates a disabled observer that just invokes wrapped functions.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            sink: Arc::new(NoopSink),
            enabled: false,
        }
    }

    /// Observes a synchronous operation.
    ///
    /// # Errors
    ///
    /// Propagates the wrapped function's error unchanged after recording
    /// the failure.
    pub fn observe<T, E: Display>(
        &self,
        operation: &str,
        description: &str,
        operation_fn: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E> {
        if !self.enabled {
            return operation_fn();
        }
        let span = governance_span(operation, description);
        let started = Instant::now();
        let result = span.in_scope(operation_fn);
        self.finish(&span, operation, started, &result);
        result
    }

    /// Observes an asynchronous operation.
    ///
    /// # Errors
    ///
    /// Propagates the wrapped future's error unchanged after recording the
    /// failure.
    pub async fn observe_async<T, E: Display, F>(
        &self,
        operation: &str,
        description: &str,
        future: F,
    ) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
    {
        if !self.enabled {
            return future.await;
        }
        let span = governance_span(operation, description);
        let started = Instant::now();
        let result = future.instrument(span.clone()).await;
        self.finish(&span, operation, started, &result);
        result
    }

    /// Records span status and emits the sink event for a finished call.
    fn finish<T, E: Display>(
        &self,
        span: &tracing::Span,
        operation: &str,
        started: Instant,
        result: &Result<T, E>,
    ) {
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        match result {
            Ok(_) => {
                span.record("otel.status_code", "OK");
                tracing::debug!(
                    target: "governance",
                    operation,
                    outcome = "success",
                    duration_ms,
                    "governance operation completed",
                );
                self.sink.record(&GovernanceEvent {
                    kind: GovernanceEventKind::Governance,
                    operation: operation.to_string(),
                    outcome: GovernanceOutcome::Success,
                    duration_ms,
                    detail: None,
                });
            }
            Err(error) => {
                let detail = error.to_string();
                span.record("otel.status_code", "ERROR");
                span.record("otel.status_description", detail.as_str());
                tracing::debug!(
                    target: "governance",
                    operation,
                    outcome = "failure",
                    duration_ms,
                    detail = %detail,
                    "governance operation failed",
                );
                self.sink.record(&GovernanceEvent {
                    kind: GovernanceEventKind::Governance,
                    operation: operation.to_string(),
                    outcome: GovernanceOutcome::Failure,
                    duration_ms,
                    detail: Some(detail),
                });
            }
        }
    }
}

/// Opens the governance span for one operation.
fn governance_span(operation: &str, description: &str) -> tracing::Span {
    tracing::debug_span!(
        "mcp.governance",
        otel.name = %format!("mcp.governance.{operation}"),
        otel.status_code = tracing::field::Empty,
        otel.status_description = tracing::field::Empty,
        mcp.governance.operation = %operation,
        description = %description,
    )
}

//! Observer hooks for store operations.
//!
//! [`crate::store::DatasetStore`] reports the outcome of every operation to an optional
//! [`StoreObserver`]. Failures are classified by [`OperationSeverity`]; when the severity meets
//! the store's alert threshold, [`StoreObserver::on_alert`] is invoked as well.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::error::DataError;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OperationSeverity {
    /// The caller asked for something that does not exist.
    Warning,
    /// The operation was rejected.
    Error,
    /// Reserved for failures that are not the caller's fault.
    Critical,
}

impl OperationSeverity {
    /// Severity for a failed operation.
    pub fn for_error(err: &DataError) -> Self {
        match err {
            DataError::NotFound { .. } => Self::Warning,
            DataError::ColumnNotFound { .. }
            | DataError::InvalidOperation { .. }
            | DataError::Validation { .. } => Self::Error,
        }
    }
}

/// Which store operation ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    List,
    Create,
    Get,
    Delete,
    Filter,
    Aggregate,
    Stats,
}

impl OperationKind {
    /// Operations that change the store.
    pub fn is_mutation(&self) -> bool {
        matches!(self, Self::Create | Self::Delete)
    }
}

/// Context about an operation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationContext {
    /// Operation that ran.
    pub operation: OperationKind,
    /// Dataset the operation targeted (empty for `List`).
    pub dataset: String,
}

/// Stats reported on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationStats {
    /// Rows produced or touched by the operation.
    pub rows: usize,
}

/// Observer interface for store operations.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait StoreObserver: Send + Sync {
    /// Called when an operation succeeds.
    fn on_success(&self, _ctx: &OperationContext, _stats: OperationStats) {}

    /// Called when an operation fails.
    fn on_failure(&self, _ctx: &OperationContext, _severity: OperationSeverity, _error: &DataError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &OperationContext, severity: OperationSeverity, error: &DataError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn StoreObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn StoreObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl StoreObserver for CompositeObserver {
    fn on_success(&self, ctx: &OperationContext, stats: OperationStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &OperationContext, severity: OperationSeverity, error: &DataError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &OperationContext, severity: OperationSeverity, error: &DataError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Emits store events through `tracing`.
///
/// Mutations log at `info`, reads at `debug`; failures log at `warn` (missing dataset) or
/// `error`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl StoreObserver for TracingObserver {
    fn on_success(&self, ctx: &OperationContext, stats: OperationStats) {
        if ctx.operation.is_mutation() {
            info!(operation = ?ctx.operation, dataset = %ctx.dataset, rows = stats.rows, "store operation ok");
        } else {
            debug!(operation = ?ctx.operation, dataset = %ctx.dataset, rows = stats.rows, "store operation ok");
        }
    }

    fn on_failure(&self, ctx: &OperationContext, severity: OperationSeverity, error: &DataError) {
        if severity <= OperationSeverity::Warning {
            warn!(operation = ?ctx.operation, dataset = %ctx.dataset, err = %error, "store operation failed");
        } else {
            error!(operation = ?ctx.operation, dataset = %ctx.dataset, ?severity, err = %error, "store operation failed");
        }
    }

    fn on_alert(&self, ctx: &OperationContext, severity: OperationSeverity, error: &DataError) {
        error!(operation = ?ctx.operation, dataset = %ctx.dataset, ?severity, err = %error, "ALERT store operation failed");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Counting {
        ok: Mutex<usize>,
        failed: Mutex<usize>,
    }

    impl StoreObserver for Counting {
        fn on_success(&self, _ctx: &OperationContext, _stats: OperationStats) {
            *self.ok.lock().unwrap() += 1;
        }

        fn on_failure(&self, _ctx: &OperationContext, _severity: OperationSeverity, _error: &DataError) {
            *self.failed.lock().unwrap() += 1;
        }
    }

    #[test]
    fn severity_classification() {
        assert_eq!(
            OperationSeverity::for_error(&DataError::not_found("x")),
            OperationSeverity::Warning
        );
        assert_eq!(
            OperationSeverity::for_error(&DataError::validation("bad")),
            OperationSeverity::Error
        );
        assert!(OperationSeverity::Error < OperationSeverity::Critical);
    }

    #[test]
    fn composite_fans_out_and_default_alert_forwards_to_failure() {
        let a = Arc::new(Counting::default());
        let b = Arc::new(Counting::default());
        let composite = CompositeObserver::new(vec![a.clone() as Arc<dyn StoreObserver>, b.clone()]);
        let ctx = OperationContext {
            operation: OperationKind::Get,
            dataset: "sample".to_string(),
        };

        composite.on_success(&ctx, OperationStats { rows: 5 });
        composite.on_alert(&ctx, OperationSeverity::Critical, &DataError::not_found("sample"));

        assert_eq!(*a.ok.lock().unwrap(), 1);
        assert_eq!(*b.ok.lock().unwrap(), 1);
        assert_eq!(*a.failed.lock().unwrap(), 1);
        assert_eq!(*b.failed.lock().unwrap(), 1);
    }
}

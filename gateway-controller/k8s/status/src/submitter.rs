use crate::metrics::ControllerMetrics;
use elbv2_gateway_controller_core::status::RouteStatusUpdate;
use prometheus_client::metrics::counter::Counter;
use tokio::sync::mpsc;

/// Creates the status-update queue shared by route loaders (producers) and
/// the [`Controller`](crate::Controller) (consumer). Dropped updates count
/// against the metrics' overflow counter.
pub fn channel(
    capacity: usize,
    metrics: &ControllerMetrics,
) -> (StatusSubmitter, mpsc::Receiver<RouteStatusUpdate>) {
    let (updates, rx) = mpsc::channel(capacity);
    let submitter = StatusSubmitter {
        updates,
        overflow: metrics.queue_overflow.clone(),
    };
    (submitter, rx)
}

/// Non-blocking enqueue handle for route-status updates.
///
/// The queue is bounded; when it is full the update is dropped with a
/// warning. That is safe because the next reconcile of the same gateway
/// recomputes every route's status from scratch.
#[derive(Clone, Debug)]
pub struct StatusSubmitter {
    updates: mpsc::Sender<RouteStatusUpdate>,
    overflow: Counter,
}

impl StatusSubmitter {
    pub fn enqueue(&self, update: RouteStatusUpdate) {
        match self.updates.try_send(update) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(update)) => {
                self.overflow.inc();
                tracing::warn!(route = %update.route, "status queue is full; dropping update");
            }
            Err(mpsc::error::TrySendError::Closed(update)) => {
                self.overflow.inc();
                tracing::warn!(route = %update.route, "status controller has shut down; dropping update");
            }
        }
    }
}

use prometheus_client::{metrics::counter::Counter, registry::Registry};

#[derive(Clone, Debug, Default)]
pub struct ControllerMetrics {
    pub(crate) patch_succeeded: Counter,
    pub(crate) patch_failed: Counter,
    pub(crate) patch_deduped: Counter,
    pub(crate) queue_overflow: Counter,
}

impl ControllerMetrics {
    pub fn register(prom: &mut Registry) -> Self {
        let patch_succeeded = Counter::default();
        prom.register(
            "route_status_patch_succeeded",
            "Number of successful route status patches",
            patch_succeeded.clone(),
        );

        let patch_failed = Counter::default();
        prom.register(
            "route_status_patch_failed",
            "Number of failed route status patches",
            patch_failed.clone(),
        );

        let patch_deduped = Counter::default();
        prom.register(
            "route_status_patch_deduplicated",
            "Number of route status updates dropped by first-write-wins deduplication",
            patch_deduped.clone(),
        );

        let queue_overflow = Counter::default();
        prom.register(
            "route_status_queue_overflow",
            "Number of route status updates dropped because the queue was full or closed",
            queue_overflow.clone(),
        );

        Self {
            patch_succeeded,
            patch_failed,
            patch_deduped,
            queue_overflow,
        }
    }
}

use crate::{
    conditions::RouteConditionReason,
    routes::{GroupKindNamespaceName, ParentRef, ResourceId, RouteKind},
};

/// A pending route-status write for one (route, gateway) pair.
///
/// Updates are produced by the loader during a reconcile and drained by the
/// status controller, which deduplicates them by [`RouteStatusUpdate::dedup_key`]
/// with first-enqueued-wins semantics. The loader enqueues failures before
/// acceptances so a route that both failed and attached keeps the failure.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteStatusUpdate {
    pub route: GroupKindNamespaceName,
    pub kind: RouteKind,
    pub generation: Option<i64>,
    pub gateway: ResourceId,
    /// The parent reference through which the route claimed the gateway,
    /// echoed verbatim into the status parent entry.
    pub parent_ref: ParentRef,
    pub accepted: bool,
    pub resolved_refs: bool,
    pub reason: RouteConditionReason,
    pub message: String,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct UpdateKey {
    pub route_name: String,
    pub route_namespace: String,
    pub route_kind: RouteKind,
    pub gateway_name: String,
    pub gateway_namespace: String,
}

impl RouteStatusUpdate {
    pub fn dedup_key(&self) -> UpdateKey {
        UpdateKey {
            route_name: self.route.name.to_string(),
            route_namespace: self.route.namespace.to_string(),
            route_kind: self.kind,
            gateway_name: self.gateway.name.clone(),
            gateway_namespace: self.gateway.namespace.clone(),
        }
    }
}

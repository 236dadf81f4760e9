use crate::{
    accumulator::ResolveContext,
    discovery::{self, RouteKindFilter},
    error::{LoadError, RuleLoadError},
    mapper,
    reader::ClusterReader,
    routes::{ResolvedRule, RouteResource},
    validation::{ListenerOutcome, ListenerValidator},
};
use ahash::{AHashMap, AHashSet};
use chrono::{DateTime, Utc};
use elbv2_gateway_controller_core::{
    conditions::RouteConditionReason,
    routes::{GroupKindNamespaceName, ParentRef, ResourceId, RouteKind},
    status::RouteStatusUpdate,
};
use elbv2_gateway_controller_k8s_api::{gateway::Gateway, ResourceExt};
use elbv2_gateway_controller_k8s_status::StatusSubmitter;
use std::{collections::BTreeMap, sync::Arc};

/// A route that attached to the gateway, with its rules resolved and its
/// per-port compatible hostnames fixed. The hostname map is written once by
/// the loader; consumers treat the whole value as immutable.
#[derive(Clone, Debug)]
pub struct ResolvedRoute {
    pub id: GroupKindNamespaceName,
    pub kind: RouteKind,
    pub generation: Option<i64>,
    pub creation_timestamp: Option<DateTime<Utc>>,
    /// The route's raw spec hostnames.
    pub hostnames: Vec<String>,
    pub rules: Vec<ResolvedRule>,
    pub compatible_hostnames_by_port: AHashMap<i32, Vec<String>>,
}

/// What the load-balancer model builder consumes for one gateway reconcile.
#[derive(Debug, Default)]
pub struct LoaderResult {
    /// Attached, fully resolved routes per listener port. A route attached
    /// through several listeners on one port appears once.
    pub routes_by_port: BTreeMap<i32, Vec<Arc<ResolvedRoute>>>,
    /// Acceptance counts per listener section name.
    pub attached_count_by_listener: AHashMap<String, usize>,
    pub listener_outcomes: Vec<ListenerOutcome>,
}

/// Resolves the routes attached to a gateway and emits their status updates.
///
/// Failure updates are enqueued before acceptance updates; combined with the
/// submitter's first-write-wins deduplication this keeps the informative
/// update when a route both fails somewhere and attaches elsewhere.
/// Cancellation is by dropping the future: updates are enqueued only after
/// resolution completes, so a cancelled reconcile publishes nothing.
pub async fn load_routes_for_gateway<R: ClusterReader>(
    reader: &R,
    gateway: &Gateway,
    filter: RouteKindFilter,
    controller_name: &str,
    validator: &dyn ListenerValidator,
    submitter: &StatusSubmitter,
) -> Result<LoaderResult, LoadError> {
    let gateway_namespace = gateway.namespace().expect("Gateway must have a namespace");
    let gateway_name = gateway.name_unchecked();
    let gateway_id = ResourceId::new(gateway_namespace, gateway_name);

    let routes = discovery::list_routes(reader, filter).await?;
    tracing::debug!(
        gateway = %gateway_id,
        routes = routes.len(),
        "listed candidate routes",
    );

    let listener_outcomes = validator.validate(gateway, controller_name);
    let mapped = mapper::map_routes(reader, gateway, &routes).await?;

    // Resolve each mapped route's child resources exactly once per key, in
    // the deterministic per-port order the mapper produced.
    let mut cx = ResolveContext::new(reader);
    let mut order: Vec<GroupKindNamespaceName> = Vec::new();
    let mut resolutions: AHashMap<GroupKindNamespaceName, (Vec<ResolvedRule>, Vec<RuleLoadError>)> =
        AHashMap::new();
    for route in mapped.routes_by_port.values().flatten() {
        let id = route.id();
        if resolutions.contains_key(&id) {
            continue;
        }
        let resolution = route.resolve_rules(&mut cx).await?;
        resolutions.insert(id.clone(), resolution);
        order.push(id);
    }

    // Rule errors become failure updates; a fatal error drops the route from
    // the result while the reconcile carries on with the remaining routes.
    let mut failures = mapped.rejections.clone();
    let mut dropped: AHashSet<GroupKindNamespaceName> = AHashSet::new();
    for id in &order {
        let (_, errors) = &resolutions[id];
        let Some(route) = route_by_id(&mapped.routes_by_port, id) else {
            continue;
        };
        for error in errors {
            failures.push(RouteStatusUpdate {
                route: id.clone(),
                kind: route.kind(),
                generation: route.generation(),
                gateway: gateway_id.clone(),
                parent_ref: accepted_parent(&mapped.accepted_parents, id),
                accepted: false,
                resolved_refs: false,
                reason: error.error.route_reason,
                message: error.error.route_message.clone(),
            });
            if error.fatal {
                tracing::info!(route = %id, error = %error, "dropping route");
                dropped.insert(id.clone());
            }
        }
    }

    // Materialize the surviving routes, fixing each route's compatible
    // hostnames across every port it attached to.
    let mut built: AHashMap<GroupKindNamespaceName, Arc<ResolvedRoute>> = AHashMap::new();
    let mut routes_by_port: BTreeMap<i32, Vec<Arc<ResolvedRoute>>> = BTreeMap::new();
    for (port, routes) in &mapped.routes_by_port {
        for route in routes {
            let id = route.id();
            if dropped.contains(&id) {
                continue;
            }
            let resolved = match built.get(&id) {
                Some(resolved) => Arc::clone(resolved),
                None => {
                    let (rules, _) = resolutions
                        .remove(&id)
                        .expect("every mapped route resolves before materialization");
                    let mut compatible_hostnames_by_port = AHashMap::new();
                    for (port, hostnames) in &mapped.hostnames_by_port {
                        if let Some(hostnames) = hostnames.get(&id) {
                            compatible_hostnames_by_port.insert(*port, hostnames.clone());
                        }
                    }
                    let resolved = Arc::new(ResolvedRoute {
                        id: id.clone(),
                        kind: route.kind(),
                        generation: route.generation(),
                        creation_timestamp: route.creation_timestamp(),
                        hostnames: route.hostnames(),
                        rules,
                        compatible_hostnames_by_port,
                    });
                    built.insert(id.clone(), Arc::clone(&resolved));
                    resolved
                }
            };
            routes_by_port.entry(*port).or_default().push(resolved);
        }
    }

    // Acceptance updates for every surviving route.
    let mut acceptances = Vec::new();
    for id in &order {
        if dropped.contains(id) {
            continue;
        }
        let Some(route) = route_by_id(&mapped.routes_by_port, id) else {
            continue;
        };
        acceptances.push(RouteStatusUpdate {
            route: id.clone(),
            kind: route.kind(),
            generation: route.generation(),
            gateway: gateway_id.clone(),
            parent_ref: accepted_parent(&mapped.accepted_parents, id),
            accepted: true,
            resolved_refs: true,
            reason: RouteConditionReason::Accepted,
            message: String::new(),
        });
    }

    for update in failures {
        submitter.enqueue(update);
    }
    for update in acceptances {
        submitter.enqueue(update);
    }

    Ok(LoaderResult {
        routes_by_port,
        attached_count_by_listener: mapped.attached_count_by_listener,
        listener_outcomes,
    })
}

fn route_by_id<'m>(
    routes_by_port: &'m BTreeMap<i32, Vec<Arc<RouteResource>>>,
    id: &GroupKindNamespaceName,
) -> Option<&'m Arc<RouteResource>> {
    routes_by_port
        .values()
        .flatten()
        .find(|route| route.id() == *id)
}

fn accepted_parent(
    parents: &AHashMap<GroupKindNamespaceName, ParentRef>,
    id: &GroupKindNamespaceName,
) -> ParentRef {
    parents.get(id).cloned().unwrap_or_default()
}

//! Maps routes onto a gateway's listeners: filters by gateway claim, runs
//! the per-listener attachment checks, enforces cross-kind hostname
//! uniqueness, and aggregates acceptances per port.

use crate::{
    attachment,
    reader::{ClusterReader, ReadError},
    routes::RouteResource,
};
use ahash::{AHashMap, AHashSet};
use elbv2_gateway_controller_core::{
    conditions::RouteConditionReason,
    hostname,
    routes::{GroupKindNamespaceName, ParentRef, ResourceId, RouteKind},
    status::RouteStatusUpdate,
};
use elbv2_gateway_controller_k8s_api::{gateway::Gateway, ResourceExt};
use std::{collections::BTreeMap, sync::Arc};

#[derive(Debug, Default)]
pub(crate) struct MapperOutput {
    /// Accepted routes per listener port, deduplicated, in listener-then-route
    /// order.
    pub routes_by_port: BTreeMap<i32, Vec<Arc<RouteResource>>>,
    /// Union of compatible hostnames per (port, route).
    pub hostnames_by_port: AHashMap<i32, AHashMap<GroupKindNamespaceName, Vec<String>>>,
    /// The parent ref each accepted route claimed the gateway through.
    pub accepted_parents: AHashMap<GroupKindNamespaceName, ParentRef>,
    /// Acceptance counts per listener section name.
    pub attached_count_by_listener: AHashMap<String, usize>,
    /// One rejection update per (listener, route) reject decision.
    pub rejections: Vec<RouteStatusUpdate>,
}

pub(crate) async fn map_routes<R: ClusterReader>(
    reader: &R,
    gateway: &Gateway,
    routes: &[Arc<RouteResource>],
) -> Result<MapperOutput, ReadError> {
    let gateway_namespace = gateway.namespace().expect("Gateway must have a namespace");
    let gateway_name = gateway.name_unchecked();
    let gateway_id = ResourceId::new(gateway_namespace.clone(), gateway_name.clone());

    // Routes that claim this gateway through at least one parent ref. The
    // input is already sorted by (namespace, name, kind), which fixes the
    // route iteration order below.
    let claimed: Vec<(&Arc<RouteResource>, Vec<ParentRef>)> = routes
        .iter()
        .filter_map(|route| {
            let parents = attachment::gateway_parent_refs(route, &gateway_namespace, &gateway_name);
            if parents.is_empty() {
                None
            } else {
                Some((route, parents))
            }
        })
        .collect();

    let mut out = MapperOutput::default();
    let mut seen_by_port: AHashMap<i32, AHashSet<GroupKindNamespaceName>> = AHashMap::new();

    for listener in &gateway.spec.listeners {
        let allowed_namespaces = attachment::allowed_namespaces(reader, listener).await?;
        out.attached_count_by_listener
            .entry(listener.name.clone())
            .or_insert(0);

        // Hostnames claimed on this listener so far, per route kind. Only
        // HTTPRoute and GRPCRoute contend with each other.
        let mut claimed_hostnames: AHashMap<RouteKind, Vec<(GroupKindNamespaceName, Vec<String>)>> =
            AHashMap::new();

        for (route, parents) in &claimed {
            let Some(parent_ref) = parents
                .iter()
                .find(|parent| attachment::parent_ref_selects_listener(parent, listener))
            else {
                continue;
            };

            let id = route.id();
            let reject = |reason: RouteConditionReason, message: String| RouteStatusUpdate {
                route: id.clone(),
                kind: route.kind(),
                generation: route.generation(),
                gateway: gateway_id.clone(),
                parent_ref: parent_ref.clone(),
                accepted: false,
                resolved_refs: false,
                reason,
                message,
            };

            if !allowed_namespaces.contains(&route.namespace(), &gateway_namespace) {
                out.rejections.push(reject(
                    RouteConditionReason::NotAllowedByListeners,
                    "namespace does not match".to_string(),
                ));
                continue;
            }

            if !attachment::kind_allowed(listener, route.kind()) {
                out.rejections.push(reject(
                    RouteConditionReason::NotAllowedByListeners,
                    "kind does not match".to_string(),
                ));
                continue;
            }

            let (compatible, effective) = if route.kind().has_hostnames() {
                let route_hostnames = route.hostnames();
                match attachment::compatible_hostnames(
                    listener.hostname.as_deref(),
                    &route_hostnames,
                ) {
                    Ok(compatible) => {
                        let effective = if route_hostnames.is_empty() {
                            compatible.clone()
                        } else {
                            route_hostnames
                        };
                        (compatible, effective)
                    }
                    Err(status) => {
                        out.rejections
                            .push(reject(status.route_reason, status.route_message));
                        continue;
                    }
                }
            } else {
                (Vec::new(), Vec::new())
            };

            if let Some(conflict) = conflicting_route(&claimed_hostnames, route.kind(), &effective)
            {
                let message = format!(
                    "hostname conflicts with {kind} {name} attached to listener {listener}",
                    kind = conflict.kind,
                    name = conflict.namespaced_name(),
                    listener = listener.name,
                );
                out.rejections
                    .push(reject(RouteConditionReason::NotAllowedByListeners, message));
                continue;
            }

            // Accepted on this listener.
            if seen_by_port
                .entry(listener.port)
                .or_default()
                .insert(id.clone())
            {
                out.routes_by_port
                    .entry(listener.port)
                    .or_default()
                    .push(Arc::clone(route));
            }

            let hostnames = out
                .hostnames_by_port
                .entry(listener.port)
                .or_default()
                .entry(id.clone())
                .or_default();
            for compatible_hostname in compatible {
                if !hostnames.contains(&compatible_hostname) {
                    hostnames.push(compatible_hostname);
                }
            }

            *out.attached_count_by_listener
                .entry(listener.name.clone())
                .or_insert(0) += 1;
            out.accepted_parents
                .entry(id.clone())
                .or_insert_with(|| parent_ref.clone());

            if matches!(route.kind(), RouteKind::Http | RouteKind::Grpc) {
                claimed_hostnames
                    .entry(route.kind())
                    .or_default()
                    .push((id, effective));
            }
        }
    }

    Ok(out)
}

/// Finds an already-attached route of the contending kind whose claimed
/// hostnames are wildcard-compatible with the candidate's.
fn conflicting_route<'c>(
    claimed: &'c AHashMap<RouteKind, Vec<(GroupKindNamespaceName, Vec<String>)>>,
    kind: RouteKind,
    hostnames: &[String],
) -> Option<&'c GroupKindNamespaceName> {
    let contender = match kind {
        RouteKind::Http => RouteKind::Grpc,
        RouteKind::Grpc => RouteKind::Http,
        _ => return None,
    };
    claimed.get(&contender)?.iter().find_map(|(id, theirs)| {
        let overlap = hostnames
            .iter()
            .any(|ours| theirs.iter().any(|h| hostname::overlaps(ours, h)));
        overlap.then_some(id)
    })
}

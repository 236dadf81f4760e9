//! The layered attachment checks between a route and a (gateway, listener)
//! pair: parentRef→gateway identity, listener section/port selection,
//! allowed namespaces, allowed kinds with TLS-mode gating, and hostname
//! compatibility.

use crate::{
    error::RouteStatusError,
    reader::{ClusterReader, ReadError},
    routes::RouteResource,
};
use ahash::AHashSet;
use elbv2_gateway_controller_core::{
    conditions::RouteConditionReason,
    hostname,
    routes::{ParentRef, RouteKind},
};
use elbv2_gateway_controller_k8s_api::{gateway, Namespace, NamespaceSelector};

/// The parent refs through which a route claims the given gateway, in spec
/// order. Empty when the route does not claim it at all.
pub(crate) fn gateway_parent_refs(
    route: &RouteResource,
    gateway_namespace: &str,
    gateway_name: &str,
) -> Vec<ParentRef> {
    let route_namespace = route.namespace();
    route
        .parent_refs()
        .into_iter()
        .filter(|parent_ref| {
            parent_ref_matches_gateway(parent_ref, gateway_namespace, gateway_name, &route_namespace)
        })
        .collect()
}

fn parent_ref_matches_gateway(
    parent_ref: &ParentRef,
    gateway_namespace: &str,
    gateway_name: &str,
    route_namespace: &str,
) -> bool {
    let group_ok = parent_ref
        .group
        .as_deref()
        .map(|g| g.is_empty() || g == RouteKind::GATEWAY_API_GROUP)
        .unwrap_or(true);
    let kind_ok = parent_ref
        .kind
        .as_deref()
        .map(|k| k == "Gateway")
        .unwrap_or(true);
    // A parent ref without a namespace refers to the route's own namespace.
    let namespace = parent_ref.namespace.as_deref().unwrap_or(route_namespace);
    group_ok && kind_ok && parent_ref.name == gateway_name && namespace == gateway_namespace
}

/// Whether a parent ref selects the given listener: `sectionName` and `port`
/// restrict the selection when set, otherwise every listener matches.
pub(crate) fn parent_ref_selects_listener(
    parent_ref: &ParentRef,
    listener: &gateway::GatewayListeners,
) -> bool {
    parent_ref
        .section_name
        .as_deref()
        .map(|section| section == listener.name)
        .unwrap_or(true)
        && parent_ref.port.map(|port| port == listener.port).unwrap_or(true)
}

/// Which route namespaces a listener admits.
#[derive(Clone, Debug)]
pub(crate) enum AllowedNamespaces {
    /// Only the gateway's own namespace (the Gateway API default).
    Same,
    All,
    Set(AHashSet<String>),
}

impl AllowedNamespaces {
    pub(crate) fn contains(&self, route_namespace: &str, gateway_namespace: &str) -> bool {
        match self {
            Self::Same => route_namespace == gateway_namespace,
            Self::All => true,
            Self::Set(namespaces) => namespaces.contains(route_namespace),
        }
    }
}

/// Materializes a listener's allowed-namespace policy. A `Selector` policy
/// without a selector admits nothing.
pub(crate) async fn allowed_namespaces<R: ClusterReader>(
    reader: &R,
    listener: &gateway::GatewayListeners,
) -> Result<AllowedNamespaces, ReadError> {
    let Some(namespaces) = listener
        .allowed_routes
        .as_ref()
        .and_then(|allowed| allowed.namespaces.as_ref())
    else {
        return Ok(AllowedNamespaces::Same);
    };

    match &namespaces.from {
        None | Some(gateway::GatewayListenersAllowedRoutesNamespacesFrom::Same) => {
            Ok(AllowedNamespaces::Same)
        }
        Some(gateway::GatewayListenersAllowedRoutesNamespacesFrom::All) => {
            Ok(AllowedNamespaces::All)
        }
        Some(gateway::GatewayListenersAllowedRoutesNamespacesFrom::Selector) => {
            let Some(selector) = namespaces.selector.as_ref() else {
                return Ok(AllowedNamespaces::Set(AHashSet::new()));
            };
            let selector = NamespaceSelector::from(selector);
            let namespaces: Vec<Namespace> = reader.list_all().await?;
            Ok(AllowedNamespaces::Set(
                namespaces
                    .into_iter()
                    .filter(|ns| selector.matches(ns.metadata.labels.as_ref()))
                    .filter_map(|ns| ns.metadata.name)
                    .collect(),
            ))
        }
    }
}

/// Whether the listener admits the route kind, including the TLS-mode
/// sub-rule for TLS-protocol listeners.
pub(crate) fn kind_allowed(listener: &gateway::GatewayListeners, kind: RouteKind) -> bool {
    let explicit = listener
        .allowed_routes
        .as_ref()
        .and_then(|allowed| allowed.kinds.as_ref())
        .filter(|kinds| !kinds.is_empty());

    let allowed = match explicit {
        Some(kinds) => kinds.iter().any(|k| {
            k.kind == kind.kind_str()
                && k.group
                    .as_deref()
                    .map(|g| g.is_empty() || g == RouteKind::GATEWAY_API_GROUP)
                    .unwrap_or(true)
        }),
        None => default_kinds(&listener.protocol).contains(&kind),
    };

    if !allowed {
        return false;
    }
    if listener.protocol == "TLS" {
        return tls_mode_allows(listener, kind);
    }
    true
}

fn default_kinds(protocol: &str) -> &'static [RouteKind] {
    match protocol {
        "HTTP" | "HTTPS" => &[RouteKind::Http],
        "GRPC" => &[RouteKind::Grpc],
        "TLS" => &[RouteKind::Tcp, RouteKind::Tls],
        "TCP" => &[RouteKind::Tcp],
        "UDP" => &[RouteKind::Udp],
        _ => &[],
    }
}

// A terminating TLS listener forwards plain TCP; a passthrough listener
// forwards TLS opaquely and only TLSRoute can match on SNI.
fn tls_mode_allows(listener: &gateway::GatewayListeners, kind: RouteKind) -> bool {
    let mode = listener.tls.as_ref().and_then(|tls| tls.mode.as_ref());
    match kind {
        RouteKind::Tcp => matches!(
            mode,
            None | Some(gateway::GatewayListenersTlsMode::Terminate)
        ),
        RouteKind::Tls => matches!(mode, Some(gateway::GatewayListenersTlsMode::Passthrough)),
        _ => false,
    }
}

/// Computes the hostnames under which a route is reachable through a
/// listener.
///
/// A route without hostnames inherits the listener hostname; a listener
/// without a hostname imposes no restriction, so the route's own valid
/// hostnames pass through. Invalid route hostnames are skipped; an invalid
/// listener hostname rejects the route with `UnsupportedValue`.
pub(crate) fn compatible_hostnames(
    listener_hostname: Option<&str>,
    route_hostnames: &[String],
) -> Result<Vec<String>, RouteStatusError> {
    let Some(listener_hostname) = listener_hostname else {
        let mut compatible = Vec::new();
        for route_hostname in route_hostnames {
            if hostname::validate(route_hostname).is_err() {
                continue;
            }
            if !compatible.contains(route_hostname) {
                compatible.push(route_hostname.clone());
            }
        }
        return Ok(compatible);
    };

    if let Err(error) = hostname::validate(listener_hostname) {
        return Err(RouteStatusError::route(
            RouteConditionReason::UnsupportedValue,
            format!("listener hostname {listener_hostname:?} is invalid: {error}"),
        ));
    }

    if route_hostnames.is_empty() {
        return Ok(vec![listener_hostname.to_string()]);
    }

    let mut compatible = Vec::new();
    for route_hostname in route_hostnames {
        if hostname::validate(route_hostname).is_err() {
            continue;
        }
        if let Some(intersection) = hostname::intersect(listener_hostname, route_hostname) {
            if !compatible.contains(&intersection) {
                compatible.push(intersection);
            }
        }
    }

    if compatible.is_empty() {
        return Err(RouteStatusError::route(
            RouteConditionReason::NoMatchingListenerHostname,
            format!("no route hostname is compatible with listener hostname {listener_hostname:?}"),
        ));
    }
    Ok(compatible)
}

use crate::conditions;
use anyhow::Result;
use elbv2_gateway_controller_core::{routes::RouteKind, status::RouteStatusUpdate};
use elbv2_gateway_controller_k8s_api::{self as k8s, gateway, Resource};

/// Builds the merge patch that replaces the route's status with this
/// controller's view of the given (route, gateway) pair.
pub(crate) fn make_patch(
    update: &RouteStatusUpdate,
    controller_name: &str,
) -> Result<k8s::Patch<serde_json::Value>> {
    let conditions = vec![conditions::accepted(update), conditions::resolved_refs(update)];

    let (api_version, kind, status) = match update.kind {
        RouteKind::Http => (
            gateway::HTTPRoute::api_version(&()),
            gateway::HTTPRoute::kind(&()),
            serde_json::to_value(http_status(update, conditions, controller_name))?,
        ),
        RouteKind::Grpc => (
            gateway::GRPCRoute::api_version(&()),
            gateway::GRPCRoute::kind(&()),
            serde_json::to_value(grpc_status(update, conditions, controller_name))?,
        ),
        RouteKind::Tls => (
            gateway::TLSRoute::api_version(&()),
            gateway::TLSRoute::kind(&()),
            serde_json::to_value(tls_status(update, conditions, controller_name))?,
        ),
        RouteKind::Tcp => (
            gateway::TCPRoute::api_version(&()),
            gateway::TCPRoute::kind(&()),
            serde_json::to_value(tcp_status(update, conditions, controller_name))?,
        ),
        RouteKind::Udp => (
            gateway::UDPRoute::api_version(&()),
            gateway::UDPRoute::kind(&()),
            serde_json::to_value(udp_status(update, conditions, controller_name))?,
        ),
    };

    let patch = serde_json::json!({
        "apiVersion": api_version,
        "kind": kind,
        "name": update.route.name,
        "status": status,
    });
    Ok(k8s::Patch::Merge(patch))
}

fn http_status(
    update: &RouteStatusUpdate,
    conditions: Vec<k8s::Condition>,
    controller_name: &str,
) -> gateway::HTTPRouteStatus {
    gateway::HTTPRouteStatus {
        parents: vec![gateway::HTTPRouteStatusParents {
            conditions: Some(conditions),
            controller_name: controller_name.to_string(),
            parent_ref: gateway::HTTPRouteStatusParentsParentRef {
                group: update.parent_ref.group.clone(),
                kind: update.parent_ref.kind.clone(),
                namespace: update.parent_ref.namespace.clone(),
                name: update.parent_ref.name.clone(),
                section_name: update.parent_ref.section_name.clone(),
                port: update.parent_ref.port,
            },
        }],
    }
}

fn grpc_status(
    update: &RouteStatusUpdate,
    conditions: Vec<k8s::Condition>,
    controller_name: &str,
) -> gateway::GRPCRouteStatus {
    gateway::GRPCRouteStatus {
        parents: vec![gateway::GRPCRouteStatusParents {
            conditions: Some(conditions),
            controller_name: controller_name.to_string(),
            parent_ref: gateway::GRPCRouteStatusParentsParentRef {
                group: update.parent_ref.group.clone(),
                kind: update.parent_ref.kind.clone(),
                namespace: update.parent_ref.namespace.clone(),
                name: update.parent_ref.name.clone(),
                section_name: update.parent_ref.section_name.clone(),
                port: update.parent_ref.port,
            },
        }],
    }
}

fn tls_status(
    update: &RouteStatusUpdate,
    conditions: Vec<k8s::Condition>,
    controller_name: &str,
) -> gateway::TLSRouteStatus {
    gateway::TLSRouteStatus {
        parents: vec![gateway::TLSRouteStatusParents {
            conditions: Some(conditions),
            controller_name: controller_name.to_string(),
            parent_ref: gateway::TLSRouteStatusParentsParentRef {
                group: update.parent_ref.group.clone(),
                kind: update.parent_ref.kind.clone(),
                namespace: update.parent_ref.namespace.clone(),
                name: update.parent_ref.name.clone(),
                section_name: update.parent_ref.section_name.clone(),
                port: update.parent_ref.port,
            },
        }],
    }
}

fn tcp_status(
    update: &RouteStatusUpdate,
    conditions: Vec<k8s::Condition>,
    controller_name: &str,
) -> gateway::TCPRouteStatus {
    gateway::TCPRouteStatus {
        parents: vec![gateway::TCPRouteStatusParents {
            conditions: Some(conditions),
            controller_name: controller_name.to_string(),
            parent_ref: gateway::TCPRouteStatusParentsParentRef {
                group: update.parent_ref.group.clone(),
                kind: update.parent_ref.kind.clone(),
                namespace: update.parent_ref.namespace.clone(),
                name: update.parent_ref.name.clone(),
                section_name: update.parent_ref.section_name.clone(),
                port: update.parent_ref.port,
            },
        }],
    }
}

fn udp_status(
    update: &RouteStatusUpdate,
    conditions: Vec<k8s::Condition>,
    controller_name: &str,
) -> gateway::UDPRouteStatus {
    gateway::UDPRouteStatus {
        parents: vec![gateway::UDPRouteStatusParents {
            conditions: Some(conditions),
            controller_name: controller_name.to_string(),
            parent_ref: gateway::UDPRouteStatusParentsParentRef {
                group: update.parent_ref.group.clone(),
                kind: update.parent_ref.kind.clone(),
                namespace: update.parent_ref.namespace.clone(),
                name: update.parent_ref.name.clone(),
                section_name: update.parent_ref.section_name.clone(),
                port: update.parent_ref.port,
            },
        }],
    }
}

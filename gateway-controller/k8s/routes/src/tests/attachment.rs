use super::helpers::{
    http_parent, make_http_route, make_listener, make_namespace, make_tcp_route,
};
use crate::{
    attachment::{
        allowed_namespaces, compatible_hostnames, gateway_parent_refs, kind_allowed,
        parent_ref_selects_listener, AllowedNamespaces,
    },
    routes::RouteResource,
    tests::helpers::FakeReader,
};
use elbv2_gateway_controller_core::{
    conditions::RouteConditionReason,
    routes::{ParentRef, RouteKind},
};
use elbv2_gateway_controller_k8s_api::gateway;
use pretty_assertions::assert_eq;

fn hostnames(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn route_claims_gateway_through_matching_parent() {
    let route = RouteResource::Http(make_http_route(
        "ns-1",
        "route",
        &[],
        http_parent("gw", None),
        None,
    ));
    assert_eq!(
        gateway_parent_refs(&route, "ns-1", "gw"),
        vec![ParentRef {
            name: "gw".to_string(),
            ..Default::default()
        }],
    );

    // Wrong name, wrong namespace, or a non-Gateway kind do not claim it.
    assert!(gateway_parent_refs(&route, "ns-1", "other").is_empty());
    assert!(gateway_parent_refs(&route, "ns-2", "gw").is_empty());

    let service_parent = RouteResource::Http(make_http_route(
        "ns-1",
        "route",
        &[],
        gateway::HTTPRouteParentRefs {
            kind: Some("Service".to_string()),
            ..http_parent("gw", None)
        },
        None,
    ));
    assert!(gateway_parent_refs(&service_parent, "ns-1", "gw").is_empty());
}

#[test]
fn parent_namespace_defaults_to_route_namespace() {
    let route = RouteResource::Http(make_http_route(
        "ns-2",
        "route",
        &[],
        http_parent("gw", Some("ns-1")),
        None,
    ));
    assert_eq!(gateway_parent_refs(&route, "ns-1", "gw").len(), 1);
    assert!(gateway_parent_refs(&route, "ns-2", "gw").is_empty());
}

#[test]
fn section_name_and_port_restrict_listener_selection() {
    let listener = make_listener("web", 80, "HTTP");

    let unrestricted = ParentRef {
        name: "gw".to_string(),
        ..Default::default()
    };
    assert!(parent_ref_selects_listener(&unrestricted, &listener));

    let by_section = ParentRef {
        section_name: Some("web".to_string()),
        ..unrestricted.clone()
    };
    assert!(parent_ref_selects_listener(&by_section, &listener));

    let wrong_section = ParentRef {
        section_name: Some("api".to_string()),
        ..unrestricted.clone()
    };
    assert!(!parent_ref_selects_listener(&wrong_section, &listener));

    let by_port = ParentRef {
        port: Some(80),
        ..unrestricted.clone()
    };
    assert!(parent_ref_selects_listener(&by_port, &listener));

    let wrong_port = ParentRef {
        port: Some(8080),
        ..unrestricted
    };
    assert!(!parent_ref_selects_listener(&wrong_port, &listener));
}

#[test]
fn protocol_defaults_decide_route_kinds() {
    assert!(kind_allowed(&make_listener("l", 80, "HTTP"), RouteKind::Http));
    assert!(!kind_allowed(&make_listener("l", 80, "HTTP"), RouteKind::Grpc));
    assert!(kind_allowed(&make_listener("l", 443, "HTTPS"), RouteKind::Http));
    assert!(kind_allowed(&make_listener("l", 50051, "GRPC"), RouteKind::Grpc));
    assert!(kind_allowed(&make_listener("l", 5432, "TCP"), RouteKind::Tcp));
    assert!(!kind_allowed(&make_listener("l", 5432, "TCP"), RouteKind::Udp));
    assert!(kind_allowed(&make_listener("l", 53, "UDP"), RouteKind::Udp));
}

#[test]
fn explicit_kinds_override_protocol_defaults() {
    let mut listener = make_listener("l", 80, "HTTP");
    super::helpers::allow_route_kinds(&mut listener, &["GRPCRoute"]);
    assert!(!kind_allowed(&listener, RouteKind::Http));
    assert!(kind_allowed(&listener, RouteKind::Grpc));
}

#[test]
fn tls_listener_mode_gates_route_kinds() {
    let mut listener = make_listener("l", 443, "TLS");

    // No TLS block: terminate semantics.
    assert!(kind_allowed(&listener, RouteKind::Tcp));
    assert!(!kind_allowed(&listener, RouteKind::Tls));

    listener.tls = Some(gateway::GatewayListenersTls {
        mode: Some(gateway::GatewayListenersTlsMode::Terminate),
        ..Default::default()
    });
    assert!(kind_allowed(&listener, RouteKind::Tcp));
    assert!(!kind_allowed(&listener, RouteKind::Tls));

    listener.tls = Some(gateway::GatewayListenersTls {
        mode: Some(gateway::GatewayListenersTlsMode::Passthrough),
        ..Default::default()
    });
    assert!(!kind_allowed(&listener, RouteKind::Tcp));
    assert!(kind_allowed(&listener, RouteKind::Tls));
}

#[test]
fn route_inherits_listener_hostname() {
    assert_eq!(
        compatible_hostnames(Some("gw.example.com"), &[]),
        Ok(hostnames(&["gw.example.com"])),
    );
}

#[test]
fn unconstrained_listener_passes_route_hostnames_through() {
    assert_eq!(compatible_hostnames(None, &[]), Ok(vec![]));
    assert_eq!(
        compatible_hostnames(None, &hostnames(&["a.com", "not..valid", "b.com"])),
        Ok(hostnames(&["a.com", "b.com"])),
    );
}

#[test]
fn wildcard_listener_intersects_route_hostnames() {
    assert_eq!(
        compatible_hostnames(
            Some("*.api.example.com"),
            &hostnames(&["v1.api.example.com", "other.com"]),
        ),
        Ok(hostnames(&["v1.api.example.com"])),
    );
}

#[test]
fn disjoint_hostnames_reject_with_no_matching_listener_hostname() {
    let error = compatible_hostnames(Some("gw.example.com"), &hostnames(&["other.com"]))
        .expect_err("hostnames are disjoint");
    assert_eq!(
        error.route_reason,
        RouteConditionReason::NoMatchingListenerHostname,
    );
    assert!(error.route_message.contains("gw.example.com"));
}

#[test]
fn invalid_listener_hostname_rejects_with_unsupported_value() {
    let long_label = format!("{}.example.com", "a".repeat(64));
    let error = compatible_hostnames(Some(&long_label), &hostnames(&["a.example.com"]))
        .expect_err("listener hostname is invalid");
    assert_eq!(error.route_reason, RouteConditionReason::UnsupportedValue);
}

#[tokio::test]
async fn listeners_default_to_the_gateway_namespace() {
    let reader = FakeReader::default();
    let listener = make_listener("l", 80, "HTTP");
    let allowed = allowed_namespaces(&reader, &listener).await.unwrap();
    assert!(allowed.contains("ns-1", "ns-1"));
    assert!(!allowed.contains("ns-2", "ns-1"));
}

#[tokio::test]
async fn selector_namespaces_are_materialized_from_the_cluster() {
    let mut reader = FakeReader::default();
    reader.insert(make_namespace("ns-prod", &[("team", "payments")]));
    reader.insert(make_namespace("ns-dev", &[("team", "search")]));

    let mut listener = make_listener("l", 80, "HTTP");
    listener.allowed_routes = Some(gateway::GatewayListenersAllowedRoutes {
        kinds: None,
        namespaces: Some(gateway::GatewayListenersAllowedRoutesNamespaces {
            from: Some(gateway::GatewayListenersAllowedRoutesNamespacesFrom::Selector),
            selector: Some(gateway::GatewayListenersAllowedRoutesNamespacesSelector {
                match_labels: Some(
                    [("team".to_string(), "payments".to_string())]
                        .into_iter()
                        .collect(),
                ),
                match_expressions: None,
            }),
        }),
    });

    let allowed = allowed_namespaces(&reader, &listener).await.unwrap();
    assert!(allowed.contains("ns-prod", "ns-gw"));
    assert!(!allowed.contains("ns-dev", "ns-gw"));
}

#[tokio::test]
async fn selector_policy_without_a_selector_admits_nothing() {
    let reader = FakeReader::default();
    let mut listener = make_listener("l", 80, "HTTP");
    listener.allowed_routes = Some(gateway::GatewayListenersAllowedRoutes {
        kinds: None,
        namespaces: Some(gateway::GatewayListenersAllowedRoutesNamespaces {
            from: Some(gateway::GatewayListenersAllowedRoutesNamespacesFrom::Selector),
            selector: None,
        }),
    });

    let allowed = allowed_namespaces(&reader, &listener).await.unwrap();
    assert!(matches!(&allowed, AllowedNamespaces::Set(set) if set.is_empty()));
    assert!(!allowed.contains("ns-1", "ns-1"));
}

#[test]
fn tcp_routes_carry_no_hostnames() {
    let route = RouteResource::Tcp(make_tcp_route("ns-1", "route", "gw", None));
    assert!(route.hostnames().is_empty());
    assert!(!route.kind().has_hostnames());
}

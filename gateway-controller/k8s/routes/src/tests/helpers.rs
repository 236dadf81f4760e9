use crate::{
    loader::{load_routes_for_gateway, LoaderResult},
    reader::{ClusterReader, ReadError},
    validation::DefaultListenerValidator,
    LoadError, RouteKindFilter,
};
use ahash::AHashSet;
use async_trait::async_trait;
use elbv2_gateway_controller_core::{status::RouteStatusUpdate, ALB_GATEWAY_CONTROLLER_NAME};
use elbv2_gateway_controller_k8s_api::{
    self as k8s,
    elbv2::{
        TargetGroupConfiguration, TargetGroupConfigurationSpec, TargetGroupProps, TargetReference,
    },
    gateway, NamespaceResourceScope,
};
use serde::{de::DeserializeOwned, Serialize};
use std::{collections::BTreeMap, fmt::Debug};

/// In-memory stand-in for the cluster cache, with per-kind read-failure
/// injection.
#[derive(Default)]
pub(crate) struct FakeReader {
    objects: BTreeMap<(String, String, String), serde_json::Value>,
    list_failures: AHashSet<String>,
    get_failures: AHashSet<String>,
}

impl FakeReader {
    pub(crate) fn insert<K>(&mut self, object: K)
    where
        K: k8s::Resource<DynamicType = ()> + Serialize,
    {
        let kind = K::kind(&()).to_string();
        let namespace = object.meta().namespace.clone().unwrap_or_default();
        let name = object.meta().name.clone().expect("object must be named");
        let value = serde_json::to_value(&object).expect("object serializes");
        self.objects.insert((kind, namespace, name), value);
    }

    pub(crate) fn fail_lists_of(&mut self, kind: &str) {
        self.list_failures.insert(kind.to_string());
    }

    pub(crate) fn fail_gets_of(&mut self, kind: &str) {
        self.get_failures.insert(kind.to_string());
    }

    fn read<K: DeserializeOwned>(value: &serde_json::Value) -> K {
        serde_json::from_value(value.clone()).expect("object deserializes")
    }
}

#[async_trait]
impl ClusterReader for FakeReader {
    async fn get<K>(&self, namespace: &str, name: &str) -> Result<Option<K>, ReadError>
    where
        K: k8s::Resource<Scope = NamespaceResourceScope, DynamicType = ()>
            + DeserializeOwned
            + Clone
            + Debug
            + Send
            + 'static,
    {
        let kind = K::kind(&()).to_string();
        if self.get_failures.contains(&kind) {
            return Err(ReadError {
                verb: "get",
                kind,
                message: "injected failure".to_string(),
            });
        }
        Ok(self
            .objects
            .get(&(kind, namespace.to_string(), name.to_string()))
            .map(|value| Self::read(value)))
    }

    async fn list_namespaced<K>(&self, namespace: &str) -> Result<Vec<K>, ReadError>
    where
        K: k8s::Resource<Scope = NamespaceResourceScope, DynamicType = ()>
            + DeserializeOwned
            + Clone
            + Debug
            + Send
            + 'static,
    {
        let kind = K::kind(&()).to_string();
        if self.list_failures.contains(&kind) {
            return Err(ReadError {
                verb: "list",
                kind,
                message: "injected failure".to_string(),
            });
        }
        Ok(self
            .objects
            .iter()
            .filter(|((k, ns, _), _)| *k == kind && ns == namespace)
            .map(|(_, value)| Self::read(value))
            .collect())
    }

    async fn list_all<K>(&self) -> Result<Vec<K>, ReadError>
    where
        K: k8s::Resource<DynamicType = ()> + DeserializeOwned + Clone + Debug + Send + 'static,
    {
        let kind = K::kind(&()).to_string();
        if self.list_failures.contains(&kind) {
            return Err(ReadError {
                verb: "list",
                kind,
                message: "injected failure".to_string(),
            });
        }
        Ok(self
            .objects
            .iter()
            .filter(|((k, _, _), _)| *k == kind)
            .map(|(_, value)| Self::read(value))
            .collect())
    }
}

pub(crate) fn make_gateway(
    namespace: &str,
    name: &str,
    listeners: Vec<gateway::GatewayListeners>,
) -> gateway::Gateway {
    gateway::Gateway {
        metadata: k8s::ObjectMeta {
            namespace: Some(namespace.to_string()),
            name: Some(name.to_string()),
            ..Default::default()
        },
        spec: gateway::GatewaySpec {
            gateway_class_name: "aws-alb".to_string(),
            listeners,
            ..Default::default()
        },
        status: None,
    }
}

pub(crate) fn make_listener(name: &str, port: i32, protocol: &str) -> gateway::GatewayListeners {
    gateway::GatewayListeners {
        name: name.to_string(),
        port,
        protocol: protocol.to_string(),
        ..Default::default()
    }
}

pub(crate) fn allow_route_kinds(
    listener: &mut gateway::GatewayListeners,
    kinds: &[&str],
) {
    let kinds = kinds
        .iter()
        .map(|kind| gateway::GatewayListenersAllowedRoutesKinds {
            group: None,
            kind: kind.to_string(),
        })
        .collect();
    listener.allowed_routes = Some(gateway::GatewayListenersAllowedRoutes {
        kinds: Some(kinds),
        namespaces: None,
    });
}

pub(crate) fn make_service(namespace: &str, name: &str, port: i32) -> k8s::Service {
    k8s::Service {
        metadata: k8s::ObjectMeta {
            namespace: Some(namespace.to_string()),
            name: Some(name.to_string()),
            ..Default::default()
        },
        spec: Some(k8s::ServiceSpec {
            ports: Some(vec![k8s::ServicePort {
                port,
                ..Default::default()
            }]),
            ..Default::default()
        }),
        status: None,
    }
}

pub(crate) fn make_namespace(name: &str, labels: &[(&str, &str)]) -> k8s::Namespace {
    k8s::Namespace {
        metadata: k8s::ObjectMeta {
            name: Some(name.to_string()),
            labels: Some(
                labels
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ),
            ..Default::default()
        },
        ..Default::default()
    }
}

pub(crate) fn make_reference_grant(
    namespace: &str,
    name: &str,
    from_kind: &str,
    from_namespace: &str,
    to_name: Option<&str>,
) -> gateway::ReferenceGrant {
    gateway::ReferenceGrant {
        metadata: k8s::ObjectMeta {
            namespace: Some(namespace.to_string()),
            name: Some(name.to_string()),
            ..Default::default()
        },
        spec: gateway::ReferenceGrantSpec {
            from: vec![gateway::ReferenceGrantFrom {
                group: "gateway.networking.k8s.io".to_string(),
                kind: from_kind.to_string(),
                namespace: from_namespace.to_string(),
            }],
            to: vec![gateway::ReferenceGrantTo {
                group: "".to_string(),
                kind: "Service".to_string(),
                name: to_name.map(|n| n.to_string()),
            }],
        },
    }
}

pub(crate) fn make_target_group_config(
    namespace: &str,
    name: &str,
    service_name: &str,
    props: TargetGroupProps,
) -> TargetGroupConfiguration {
    TargetGroupConfiguration {
        metadata: k8s::ObjectMeta {
            namespace: Some(namespace.to_string()),
            name: Some(name.to_string()),
            ..Default::default()
        },
        spec: TargetGroupConfigurationSpec {
            target_reference: TargetReference {
                group: None,
                kind: None,
                name: service_name.to_string(),
            },
            default_configuration: Some(props),
            route_configurations: None,
        },
    }
}

pub(crate) fn http_parent(gateway_name: &str, namespace: Option<&str>) -> gateway::HTTPRouteParentRefs {
    gateway::HTTPRouteParentRefs {
        group: None,
        kind: None,
        namespace: namespace.map(|ns| ns.to_string()),
        name: gateway_name.to_string(),
        section_name: None,
        port: None,
    }
}

pub(crate) fn http_backend(name: &str, port: Option<i32>, weight: Option<i32>) -> gateway::HTTPRouteRulesBackendRefs {
    gateway::HTTPRouteRulesBackendRefs {
        group: None,
        kind: None,
        name: name.to_string(),
        namespace: None,
        port,
        weight,
        filters: None,
    }
}

pub(crate) fn make_http_route(
    namespace: &str,
    name: &str,
    hostnames: &[&str],
    parent: gateway::HTTPRouteParentRefs,
    backends: Option<Vec<gateway::HTTPRouteRulesBackendRefs>>,
) -> gateway::HTTPRoute {
    gateway::HTTPRoute {
        metadata: k8s::ObjectMeta {
            namespace: Some(namespace.to_string()),
            name: Some(name.to_string()),
            generation: Some(1),
            ..Default::default()
        },
        spec: gateway::HTTPRouteSpec {
            parent_refs: Some(vec![parent]),
            hostnames: hostnames_of(hostnames),
            rules: Some(vec![gateway::HTTPRouteRules {
                backend_refs: backends,
                ..Default::default()
            }]),
        },
        status: None,
    }
}

pub(crate) fn make_grpc_route(
    namespace: &str,
    name: &str,
    hostnames: &[&str],
    gateway_name: &str,
) -> gateway::GRPCRoute {
    gateway::GRPCRoute {
        metadata: k8s::ObjectMeta {
            namespace: Some(namespace.to_string()),
            name: Some(name.to_string()),
            generation: Some(1),
            ..Default::default()
        },
        spec: gateway::GRPCRouteSpec {
            parent_refs: Some(vec![gateway::GRPCRouteParentRefs {
                group: None,
                kind: None,
                namespace: None,
                name: gateway_name.to_string(),
                section_name: None,
                port: None,
            }]),
            hostnames: hostnames_of(hostnames),
            rules: None,
        },
        status: None,
    }
}

pub(crate) fn make_tls_route(
    namespace: &str,
    name: &str,
    hostnames: &[&str],
    gateway_name: &str,
    backend: Option<(&str, i32)>,
) -> gateway::TLSRoute {
    let backend_refs = backend.map(|(service, port)| {
        vec![gateway::TLSRouteRulesBackendRefs {
            group: None,
            kind: None,
            name: service.to_string(),
            namespace: None,
            port: Some(port),
            weight: None,
        }]
    });
    gateway::TLSRoute {
        metadata: k8s::ObjectMeta {
            namespace: Some(namespace.to_string()),
            name: Some(name.to_string()),
            generation: Some(1),
            ..Default::default()
        },
        spec: gateway::TLSRouteSpec {
            parent_refs: Some(vec![gateway::TLSRouteParentRefs {
                group: None,
                kind: None,
                namespace: None,
                name: gateway_name.to_string(),
                section_name: None,
                port: None,
            }]),
            hostnames: hostnames_of(hostnames),
            rules: vec![gateway::TLSRouteRules {
                name: None,
                backend_refs,
            }],
        },
        status: None,
    }
}

pub(crate) fn make_tcp_route(
    namespace: &str,
    name: &str,
    gateway_name: &str,
    backend: Option<(&str, i32)>,
) -> gateway::TCPRoute {
    let backend_refs = backend.map(|(service, port)| {
        vec![gateway::TCPRouteRulesBackendRefs {
            group: None,
            kind: None,
            name: service.to_string(),
            namespace: None,
            port: Some(port),
            weight: None,
        }]
    });
    gateway::TCPRoute {
        metadata: k8s::ObjectMeta {
            namespace: Some(namespace.to_string()),
            name: Some(name.to_string()),
            generation: Some(1),
            ..Default::default()
        },
        spec: gateway::TCPRouteSpec {
            parent_refs: Some(vec![gateway::TCPRouteParentRefs {
                group: None,
                kind: None,
                namespace: None,
                name: gateway_name.to_string(),
                section_name: None,
                port: None,
            }]),
            rules: vec![gateway::TCPRouteRules {
                name: None,
                backend_refs,
            }],
        },
        status: None,
    }
}

pub(crate) fn make_udp_route(
    namespace: &str,
    name: &str,
    gateway_name: &str,
    backend: Option<(&str, i32)>,
) -> gateway::UDPRoute {
    let backend_refs = backend.map(|(service, port)| {
        vec![gateway::UDPRouteRulesBackendRefs {
            group: None,
            kind: None,
            name: service.to_string(),
            namespace: None,
            port: Some(port),
            weight: None,
        }]
    });
    gateway::UDPRoute {
        metadata: k8s::ObjectMeta {
            namespace: Some(namespace.to_string()),
            name: Some(name.to_string()),
            generation: Some(1),
            ..Default::default()
        },
        spec: gateway::UDPRouteSpec {
            parent_refs: Some(vec![gateway::UDPRouteParentRefs {
                group: None,
                kind: None,
                namespace: None,
                name: gateway_name.to_string(),
                section_name: None,
                port: None,
            }]),
            rules: vec![gateway::UDPRouteRules {
                name: None,
                backend_refs,
            }],
        },
        status: None,
    }
}

fn hostnames_of(hostnames: &[&str]) -> Option<Vec<String>> {
    if hostnames.is_empty() {
        None
    } else {
        Some(hostnames.iter().map(|h| h.to_string()).collect())
    }
}

/// Runs the loader against the fake cluster and drains the emitted status
/// updates.
pub(crate) async fn load(
    reader: &FakeReader,
    gateway: &gateway::Gateway,
    filter: RouteKindFilter,
) -> Result<(LoaderResult, Vec<RouteStatusUpdate>), LoadError> {
    let metrics =
        elbv2_gateway_controller_k8s_status::ControllerMetrics::register(&mut Default::default());
    let (submitter, mut updates_rx) = elbv2_gateway_controller_k8s_status::channel(64, &metrics);
    let result = load_routes_for_gateway(
        reader,
        gateway,
        filter,
        ALB_GATEWAY_CONTROLLER_NAME,
        &DefaultListenerValidator,
        &submitter,
    )
    .await?;

    let mut updates = Vec::new();
    while let Ok(update) = updates_rx.try_recv() {
        updates.push(update);
    }
    Ok((result, updates))
}

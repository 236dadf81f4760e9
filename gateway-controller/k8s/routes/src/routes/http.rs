use super::{gkn_for_resource, ResolvedRule, RuleSpec};
use crate::{
    accumulator::{self, ResolveContext, RouteRule},
    backend::BackendRef,
    error::RuleLoadError,
    reader::{ClusterReader, ReadError},
    rule_config::ExtensionRef,
};
use elbv2_gateway_controller_core::routes::{ParentRef, RouteKind};
use elbv2_gateway_controller_k8s_api::{gateway, ResourceExt};

pub(crate) fn parent_refs(route: &gateway::HTTPRoute) -> Vec<ParentRef> {
    route
        .spec
        .parent_refs
        .iter()
        .flatten()
        .map(to_parent_ref)
        .collect()
}

fn to_parent_ref(parent_ref: &gateway::HTTPRouteParentRefs) -> ParentRef {
    ParentRef {
        group: parent_ref.group.clone(),
        kind: parent_ref.kind.clone(),
        namespace: parent_ref.namespace.clone(),
        name: parent_ref.name.clone(),
        section_name: parent_ref.section_name.clone(),
        port: parent_ref.port,
    }
}

impl RouteRule for gateway::HTTPRouteRules {
    fn backend_refs(&self) -> Vec<BackendRef> {
        self.backend_refs
            .iter()
            .flatten()
            .map(|backend_ref| BackendRef {
                group: backend_ref.group.clone(),
                kind: backend_ref.kind.clone(),
                name: backend_ref.name.clone(),
                namespace: backend_ref.namespace.clone(),
                port: backend_ref.port,
                weight: backend_ref.weight,
            })
            .collect()
    }

    fn extension_refs(&self) -> Vec<ExtensionRef> {
        self.filters
            .iter()
            .flatten()
            .filter(|filter| {
                matches!(filter.r#type, gateway::HTTPRouteRulesFiltersType::ExtensionRef)
            })
            .filter_map(|filter| filter.extension_ref.as_ref())
            .map(|reference| ExtensionRef {
                group: reference.group.clone(),
                kind: reference.kind.clone(),
                name: reference.name.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn backendrefs_from_rule() {
        let rule = gateway::HTTPRouteRules {
            backend_refs: Some(vec![
                gateway::HTTPRouteRulesBackendRefs {
                    group: None,
                    kind: None,
                    name: "ref-1".to_string(),
                    namespace: Some("default".to_string()),
                    port: Some(8080),
                    weight: Some(2),
                    filters: None,
                },
                gateway::HTTPRouteRulesBackendRefs {
                    group: Some("core".to_string()),
                    kind: Some("Service".to_string()),
                    name: "ref-2".to_string(),
                    namespace: None,
                    port: None,
                    weight: None,
                    filters: None,
                },
            ]),
            ..Default::default()
        };

        assert_eq!(
            rule.backend_refs(),
            vec![
                BackendRef {
                    group: None,
                    kind: None,
                    name: "ref-1".to_string(),
                    namespace: Some("default".to_string()),
                    port: Some(8080),
                    weight: Some(2),
                },
                BackendRef {
                    group: Some("core".to_string()),
                    kind: Some("Service".to_string()),
                    name: "ref-2".to_string(),
                    namespace: None,
                    port: None,
                    weight: None,
                },
            ],
        );
    }

    #[test]
    fn extension_refs_skip_other_filter_types() {
        let rule: gateway::HTTPRouteRules = serde_json::from_value(serde_json::json!({
            "filters": [
                {
                    "type": "RequestHeaderModifier",
                    "requestHeaderModifier": {"set": [{"name": "x-env", "value": "prod"}]},
                },
                {
                    "type": "ExtensionRef",
                    "extensionRef": {
                        "group": "gateway.k8s.aws",
                        "kind": "ListenerRuleConfiguration",
                        "name": "auth",
                    },
                },
            ],
        }))
        .expect("rule deserializes");

        assert_eq!(
            rule.extension_refs(),
            vec![ExtensionRef {
                group: "gateway.k8s.aws".to_string(),
                kind: "ListenerRuleConfiguration".to_string(),
                name: "auth".to_string(),
            }],
        );
    }

    #[test]
    fn parentrefs_from_route() {
        let route = gateway::HTTPRoute {
            metadata: elbv2_gateway_controller_k8s_api::ObjectMeta {
                namespace: Some("ns-1".to_string()),
                name: Some("route".to_string()),
                ..Default::default()
            },
            spec: gateway::HTTPRouteSpec {
                parent_refs: Some(vec![gateway::HTTPRouteParentRefs {
                    group: None,
                    kind: Some("Gateway".to_string()),
                    namespace: None,
                    name: "gw".to_string(),
                    section_name: Some("web".to_string()),
                    port: Some(80),
                }]),
                hostnames: None,
                rules: None,
            },
            status: None,
        };

        assert_eq!(
            parent_refs(&route),
            vec![ParentRef {
                group: None,
                kind: Some("Gateway".to_string()),
                namespace: None,
                name: "gw".to_string(),
                section_name: Some("web".to_string()),
                port: Some(80),
            }],
        );
    }
}

pub(crate) async fn resolve_rules<R: ClusterReader>(
    cx: &mut ResolveContext<'_, R>,
    route: &gateway::HTTPRoute,
) -> Result<(Vec<ResolvedRule>, Vec<RuleLoadError>), ReadError> {
    let id = gkn_for_resource(route)
        .namespaced(route.namespace().expect("HTTPRoute must have a namespace"));
    accumulator::accumulate(
        cx,
        &id,
        RouteKind::Http,
        route.spec.rules.iter().flatten(),
        |rule, backends, config| ResolvedRule {
            spec: RuleSpec::Http {
                matches: rule.matches.clone(),
                filters: rule.filters.clone(),
            },
            backends,
            config,
        },
    )
    .await
}

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

pub(crate) fn parent_refs(route: &gateway::TCPRoute) -> Vec<ParentRef> {
    route
        .spec
        .parent_refs
        .iter()
        .flatten()
        .map(to_parent_ref)
        .collect()
}

fn to_parent_ref(parent_ref: &gateway::TCPRouteParentRefs) -> ParentRef {
    ParentRef {
        group: parent_ref.group.clone(),
        kind: parent_ref.kind.clone(),
        namespace: parent_ref.namespace.clone(),
        name: parent_ref.name.clone(),
        section_name: parent_ref.section_name.clone(),
        port: parent_ref.port,
    }
}

impl RouteRule for gateway::TCPRouteRules {
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

    // TCPRoute rules carry no filters.
    fn extension_refs(&self) -> Vec<ExtensionRef> {
        Vec::new()
    }
}


pub(crate) async fn resolve_rules<R: ClusterReader>(
    cx: &mut ResolveContext<'_, R>,
    route: &gateway::TCPRoute,
) -> Result<(Vec<ResolvedRule>, Vec<RuleLoadError>), ReadError> {
    let id = gkn_for_resource(route)
        .namespaced(route.namespace().expect("TCPRoute must have a namespace"));
    accumulator::accumulate(
        cx,
        &id,
        RouteKind::Tcp,
        route.spec.rules.iter(),
        |_rule, backends, config| ResolvedRule {
            spec: RuleSpec::Tcp,
            backends,
            config,
        },
    )
    .await
}

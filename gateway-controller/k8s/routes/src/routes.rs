use crate::{
    accumulator::ResolveContext,
    backend::Backend,
    error::RuleLoadError,
    reader::{ClusterReader, ReadError},
};
use chrono::{DateTime, Utc};
use elbv2_gateway_controller_core::routes::{
    GroupKindName, GroupKindNamespaceName, ParentRef, RouteKind,
};
use elbv2_gateway_controller_k8s_api::{
    elbv2::ListenerRuleConfiguration, gateway, Resource, ResourceExt, Time,
};
use std::sync::Arc;

pub(crate) mod grpc;
pub(crate) mod http;
pub(crate) mod tcp;
pub(crate) mod tls;
pub(crate) mod udp;

/// A route object of any supported kind, exposing the uniform metadata
/// surface the listener mapper works against. Rule resolution is deferred
/// until the mapper has decided the route attaches somewhere.
#[derive(Clone, Debug)]
pub enum RouteResource {
    Http(gateway::HTTPRoute),
    Grpc(gateway::GRPCRoute),
    Tls(gateway::TLSRoute),
    Tcp(gateway::TCPRoute),
    Udp(gateway::UDPRoute),
}

/// The kind-specific payload of a resolved rule: the raw match and filter
/// specification the model builder translates into listener rules.
#[derive(Clone, Debug)]
pub enum RuleSpec {
    Http {
        matches: Option<Vec<gateway::HTTPRouteRulesMatches>>,
        filters: Option<Vec<gateway::HTTPRouteRulesFilters>>,
    },
    Grpc {
        matches: Option<Vec<gateway::GRPCRouteRulesMatches>>,
        filters: Option<Vec<gateway::GRPCRouteRulesFilters>>,
    },
    Tls,
    Tcp,
    Udp,
}

/// One route rule with its backends resolved and its rule configuration
/// loaded. Rule order and per-rule backend order are preserved from the
/// route spec; downstream precedence depends on both.
#[derive(Clone, Debug)]
pub struct ResolvedRule {
    pub spec: RuleSpec,
    pub backends: Vec<Backend>,
    pub config: Option<Arc<ListenerRuleConfiguration>>,
}

impl RouteResource {
    pub fn kind(&self) -> RouteKind {
        match self {
            Self::Http(_) => RouteKind::Http,
            Self::Grpc(_) => RouteKind::Grpc,
            Self::Tls(_) => RouteKind::Tls,
            Self::Tcp(_) => RouteKind::Tcp,
            Self::Udp(_) => RouteKind::Udp,
        }
    }

    pub fn name(&self) -> String {
        match self {
            Self::Http(route) => route.name_unchecked(),
            Self::Grpc(route) => route.name_unchecked(),
            Self::Tls(route) => route.name_unchecked(),
            Self::Tcp(route) => route.name_unchecked(),
            Self::Udp(route) => route.name_unchecked(),
        }
    }

    pub fn namespace(&self) -> String {
        match self {
            Self::Http(route) => route.namespace(),
            Self::Grpc(route) => route.namespace(),
            Self::Tls(route) => route.namespace(),
            Self::Tcp(route) => route.namespace(),
            Self::Udp(route) => route.namespace(),
        }
        .expect("route must have a namespace")
    }

    pub fn generation(&self) -> Option<i64> {
        self.metadata().generation
    }

    pub fn creation_timestamp(&self) -> Option<DateTime<Utc>> {
        self.metadata()
            .creation_timestamp
            .clone()
            .map(|Time(t)| t)
    }

    pub fn id(&self) -> GroupKindNamespaceName {
        match self {
            Self::Http(route) => gkn_for_resource(route),
            Self::Grpc(route) => gkn_for_resource(route),
            Self::Tls(route) => gkn_for_resource(route),
            Self::Tcp(route) => gkn_for_resource(route),
            Self::Udp(route) => gkn_for_resource(route),
        }
        .namespaced(self.namespace())
    }

    /// The route's spec hostnames. TCPRoute and UDPRoute carry none.
    pub fn hostnames(&self) -> Vec<String> {
        match self {
            Self::Http(route) => route.spec.hostnames.clone().unwrap_or_default(),
            Self::Grpc(route) => route.spec.hostnames.clone().unwrap_or_default(),
            Self::Tls(route) => route.spec.hostnames.clone().unwrap_or_default(),
            Self::Tcp(_) | Self::Udp(_) => Vec::new(),
        }
    }

    pub fn parent_refs(&self) -> Vec<ParentRef> {
        match self {
            Self::Http(route) => http::parent_refs(route),
            Self::Grpc(route) => grpc::parent_refs(route),
            Self::Tls(route) => tls::parent_refs(route),
            Self::Tcp(route) => tcp::parent_refs(route),
            Self::Udp(route) => udp::parent_refs(route),
        }
    }

    /// Resolves the route's rules: backends under reference grants, plus any
    /// rule configuration. Warnings accumulate in the returned error list; a
    /// fatal error truncates resolution.
    pub(crate) async fn resolve_rules<R: ClusterReader>(
        &self,
        cx: &mut ResolveContext<'_, R>,
    ) -> Result<(Vec<ResolvedRule>, Vec<RuleLoadError>), ReadError> {
        match self {
            Self::Http(route) => http::resolve_rules(cx, route).await,
            Self::Grpc(route) => grpc::resolve_rules(cx, route).await,
            Self::Tls(route) => tls::resolve_rules(cx, route).await,
            Self::Tcp(route) => tcp::resolve_rules(cx, route).await,
            Self::Udp(route) => udp::resolve_rules(cx, route).await,
        }
    }

    fn metadata(&self) -> &elbv2_gateway_controller_k8s_api::ObjectMeta {
        match self {
            Self::Http(route) => &route.metadata,
            Self::Grpc(route) => &route.metadata,
            Self::Tls(route) => &route.metadata,
            Self::Tcp(route) => &route.metadata,
            Self::Udp(route) => &route.metadata,
        }
    }
}

pub(crate) fn gkn_for_resource<T>(t: &T) -> GroupKindName
where
    T: Resource<DynamicType = ()>,
{
    let kind = T::kind(&());
    let group = T::group(&());
    let name = t.name_unchecked().into();
    GroupKindName { group, kind, name }
}

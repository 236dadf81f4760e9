use crate::{
    error::LoadError,
    reader::{ClusterReader, ReadError},
    routes::RouteResource,
};
use elbv2_gateway_controller_core::{
    routes::RouteKind, ALB_GATEWAY_CONTROLLER_NAME, NLB_GATEWAY_CONTROLLER_NAME,
};
use elbv2_gateway_controller_k8s_api::gateway;
use std::sync::Arc;

/// Restricts which route kinds a gateway resolves. The ALB controller serves
/// the L7 kinds, the NLB controller the L4 kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RouteKindFilter {
    Layer4,
    Layer7,
}

impl RouteKindFilter {
    pub fn kinds(&self) -> &'static [RouteKind] {
        match self {
            Self::Layer7 => &[RouteKind::Http, RouteKind::Grpc],
            Self::Layer4 => &[RouteKind::Tcp, RouteKind::Udp, RouteKind::Tls],
        }
    }

    pub fn for_controller(controller_name: &str) -> Option<Self> {
        match controller_name {
            ALB_GATEWAY_CONTROLLER_NAME => Some(Self::Layer7),
            NLB_GATEWAY_CONTROLLER_NAME => Some(Self::Layer4),
            _ => None,
        }
    }
}

/// Lists every route of the filtered kinds, in stable lexicographic
/// (namespace, name, kind) order. A failure listing any kind fails the whole
/// reconcile, annotated with every kind that failed.
pub(crate) async fn list_routes<R: ClusterReader>(
    reader: &R,
    filter: RouteKindFilter,
) -> Result<Vec<Arc<RouteResource>>, LoadError> {
    let mut routes = Vec::new();
    let mut failures: Vec<(RouteKind, ReadError)> = Vec::new();

    for kind in filter.kinds() {
        match kind {
            RouteKind::Http => match reader.list_all::<gateway::HTTPRoute>().await {
                Ok(items) => {
                    routes.extend(items.into_iter().map(|r| Arc::new(RouteResource::Http(r))))
                }
                Err(error) => failures.push((*kind, error)),
            },
            RouteKind::Grpc => match reader.list_all::<gateway::GRPCRoute>().await {
                Ok(items) => {
                    routes.extend(items.into_iter().map(|r| Arc::new(RouteResource::Grpc(r))))
                }
                Err(error) => failures.push((*kind, error)),
            },
            RouteKind::Tls => match reader.list_all::<gateway::TLSRoute>().await {
                Ok(items) => {
                    routes.extend(items.into_iter().map(|r| Arc::new(RouteResource::Tls(r))))
                }
                Err(error) => failures.push((*kind, error)),
            },
            RouteKind::Tcp => match reader.list_all::<gateway::TCPRoute>().await {
                Ok(items) => {
                    routes.extend(items.into_iter().map(|r| Arc::new(RouteResource::Tcp(r))))
                }
                Err(error) => failures.push((*kind, error)),
            },
            RouteKind::Udp => match reader.list_all::<gateway::UDPRoute>().await {
                Ok(items) => {
                    routes.extend(items.into_iter().map(|r| Arc::new(RouteResource::Udp(r))))
                }
                Err(error) => failures.push((*kind, error)),
            },
        }
    }

    if !failures.is_empty() {
        return Err(LoadError::Listing { failures });
    }

    routes.sort_by_cached_key(|route| route.id());
    Ok(routes)
}

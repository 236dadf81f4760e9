use crate::{
    accumulator::ResolveContext,
    error::{RouteStatusError, RuleLoadError},
    reader::{ClusterReader, ReadError},
    reference_grant::{GrantFrom, GrantTo},
};
use elbv2_gateway_controller_core::{
    conditions::RouteConditionReason,
    routes::{GroupKindNamespaceName, RouteKind},
};
use elbv2_gateway_controller_k8s_api::{
    self as k8s,
    elbv2::{self, TargetGroupConfiguration, TargetGroupProps},
    ResourceExt,
};

/// Weights above this are rejected; the ELBv2 API caps forward-action weights
/// at 999 but the Gateway API range is what routes are validated against.
const MAX_WEIGHT: i32 = 1000;

/// A backend reference, normalized across the five route kinds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BackendRef {
    pub group: Option<String>,
    pub kind: Option<String>,
    pub name: String,
    pub namespace: Option<String>,
    pub port: Option<i32>,
    pub weight: Option<i32>,
}

/// A fully resolved backend: the Service snapshot, the matched service port,
/// the normalized weight, and any target-group customization for the model
/// builder.
#[derive(Clone, Debug)]
pub struct Backend {
    pub service: k8s::Service,
    pub service_port: k8s::ServicePort,
    pub weight: i32,
    pub target_group_props: Option<TargetGroupProps>,
    pub backend_ref: BackendRef,
}

impl Backend {
    /// A zero-weight backend is resolved but receives no traffic.
    pub fn is_in_data_path(&self) -> bool {
        self.weight != 0
    }
}

pub(crate) enum BackendOutcome {
    Resolved(Backend),
    Omitted(RuleLoadError),
}

pub(crate) async fn resolve_backend<R: ClusterReader>(
    cx: &mut ResolveContext<'_, R>,
    route: &GroupKindNamespaceName,
    route_kind: RouteKind,
    backend_ref: &BackendRef,
) -> Result<BackendOutcome, ReadError> {
    let Some(port) = backend_ref.port else {
        return Ok(omitted_warning(
            RouteConditionReason::UnsupportedValue,
            format!(
                "backend Service {name} does not specify a port",
                name = backend_ref.name,
            ),
        ));
    };

    let namespace = backend_ref
        .namespace
        .as_deref()
        .unwrap_or(&route.namespace);

    if !is_service(backend_ref.group.as_deref(), backend_ref.kind.as_deref()) {
        return Ok(omitted_warning(
            RouteConditionReason::InvalidKind,
            format!(
                "backend {name} has unsupported kind {group}/{kind}; only Service is supported",
                name = backend_ref.name,
                group = backend_ref.group.as_deref().unwrap_or("core"),
                kind = backend_ref.kind.as_deref().unwrap_or("Service"),
            ),
        ));
    }

    if namespace != route.namespace {
        let allowed = cx
            .grants
            .allows(
                cx.reader,
                GrantFrom {
                    group: RouteKind::GATEWAY_API_GROUP,
                    kind: route_kind.kind_str(),
                    namespace: &route.namespace,
                },
                GrantTo {
                    group: "",
                    kind: "Service",
                    namespace,
                    name: &backend_ref.name,
                },
            )
            .await?;
        if !allowed {
            return Ok(omitted_warning(
                RouteConditionReason::RefNotPermitted,
                format!(
                    "backend Service {namespace}/{name} is not permitted by any ReferenceGrant",
                    name = backend_ref.name,
                ),
            ));
        }
    }

    let Some(service) = cx
        .reader
        .get::<k8s::Service>(namespace, &backend_ref.name)
        .await?
    else {
        return Ok(omitted_warning(
            RouteConditionReason::BackendNotFound,
            format!(
                "backend Service {namespace}/{name} not found",
                name = backend_ref.name,
            ),
        ));
    };

    let Some(service_port) = service
        .spec
        .as_ref()
        .and_then(|spec| spec.ports.as_ref())
        .and_then(|ports| ports.iter().find(|p| p.port == port))
        .cloned()
    else {
        return Ok(omitted_warning(
            RouteConditionReason::BackendNotFound,
            format!(
                "backend Service {namespace}/{name} has no port {port}",
                name = backend_ref.name,
            ),
        ));
    };

    let target_group_props =
        lookup_target_group_props(cx.reader, namespace, &backend_ref.name, route, route_kind)
            .await?;

    let weight = backend_ref.weight.unwrap_or(1);
    if !(0..=MAX_WEIGHT).contains(&weight) {
        return Ok(BackendOutcome::Omitted(RuleLoadError::fatal(
            RouteStatusError::route(
                RouteConditionReason::UnsupportedValue,
                format!(
                    "backend Service {namespace}/{name} weight {weight} is outside the supported range [0, {MAX_WEIGHT}]",
                    name = backend_ref.name,
                ),
            ),
        )));
    }

    Ok(BackendOutcome::Resolved(Backend {
        service,
        service_port,
        weight,
        target_group_props,
        backend_ref: backend_ref.clone(),
    }))
}

/// Finds the TargetGroupConfiguration targeting the Service, if any, and
/// applies the route-specific overrides over its default configuration.
/// Several matching configurations tie-break deterministically by
/// (namespace, name).
async fn lookup_target_group_props<R: ClusterReader>(
    reader: &R,
    namespace: &str,
    service_name: &str,
    route: &GroupKindNamespaceName,
    route_kind: RouteKind,
) -> Result<Option<TargetGroupProps>, ReadError> {
    let mut configs: Vec<TargetGroupConfiguration> = reader.list_namespaced(namespace).await?;
    configs.retain(|config| targets_service(config, service_name));
    configs.sort_by_cached_key(|config| {
        (
            config.namespace().unwrap_or_default(),
            config.name_unchecked(),
        )
    });

    if configs.len() > 1 {
        tracing::debug!(
            %namespace,
            service = %service_name,
            "multiple TargetGroupConfigurations target the Service; using the lexicographically first",
        );
    }

    let Some(config) = configs.into_iter().next() else {
        return Ok(None);
    };

    let route_props = config
        .spec
        .route_configurations
        .as_ref()
        .and_then(|route_configs| {
            route_configs
                .iter()
                .find(|rc| identifies_route(&rc.route_identifier, route, route_kind))
        })
        .map(|rc| rc.target_group_props.clone());

    Ok(match (route_props, config.spec.default_configuration) {
        (Some(route_props), Some(default)) => Some(route_props.merged_over(&default)),
        (Some(route_props), None) => Some(route_props),
        (None, default) => default,
    })
}

fn identifies_route(
    identifier: &elbv2::RouteIdentifier,
    route: &GroupKindNamespaceName,
    route_kind: RouteKind,
) -> bool {
    identifier
        .kind
        .as_deref()
        .map(|kind| kind == route_kind.kind_str())
        .unwrap_or(true)
        && identifier
            .namespace
            .as_deref()
            .map(|namespace| namespace == route.namespace)
            .unwrap_or(true)
        && identifier
            .name
            .as_deref()
            .map(|name| name == route.name)
            .unwrap_or(true)
}

fn targets_service(config: &TargetGroupConfiguration, service_name: &str) -> bool {
    let target = &config.spec.target_reference;
    let group_ok = target
        .group
        .as_deref()
        .map(|g| g.is_empty() || g.eq_ignore_ascii_case("core"))
        .unwrap_or(true);
    let kind_ok = target.kind.as_deref().unwrap_or("Service") == "Service";
    group_ok && kind_ok && target.name == service_name
}

fn omitted_warning(reason: RouteConditionReason, message: String) -> BackendOutcome {
    BackendOutcome::Omitted(RuleLoadError::warning(RouteStatusError::route(
        reason, message,
    )))
}

#[inline]
fn is_service(group: Option<&str>, kind: Option<&str>) -> bool {
    // If the group is not specified or empty, assume it's 'core'. Backends
    // default to `Service` if no kind is specified.
    group
        .map(|g| g.eq_ignore_ascii_case("core") || g.is_empty())
        .unwrap_or(true)
        && kind.unwrap_or("Service").eq_ignore_ascii_case("Service")
}

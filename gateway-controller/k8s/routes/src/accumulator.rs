use crate::{
    backend::{self, Backend, BackendOutcome, BackendRef},
    error::RuleLoadError,
    reader::{ClusterReader, ReadError},
    reference_grant::GrantCache,
    rule_config::{self, ExtensionRef, RuleConfigOutcome},
};
use elbv2_gateway_controller_core::routes::{GroupKindNamespaceName, RouteKind};
use elbv2_gateway_controller_k8s_api::elbv2::ListenerRuleConfiguration;
use std::sync::Arc;

/// Read-side context for one reconcile's rule resolution. The grant cache
/// lives here so every route in the reconcile shares one ReferenceGrant list
/// per target namespace.
pub(crate) struct ResolveContext<'a, R> {
    pub(crate) reader: &'a R,
    pub(crate) grants: GrantCache,
}

impl<'a, R: ClusterReader> ResolveContext<'a, R> {
    pub(crate) fn new(reader: &'a R) -> Self {
        Self {
            reader,
            grants: GrantCache::default(),
        }
    }
}

/// The kind-specific slice of a route rule the accumulator needs.
pub(crate) trait RouteRule {
    fn backend_refs(&self) -> Vec<BackendRef>;
    fn extension_refs(&self) -> Vec<ExtensionRef>;
}

/// Resolves a route's rules in order, preserving the order of backends
/// within each rule. Warnings accumulate without stopping the rule; a fatal
/// error aborts the route's resolution.
pub(crate) async fn accumulate<'r, R, Rule, T, F>(
    cx: &mut ResolveContext<'_, R>,
    route: &GroupKindNamespaceName,
    route_kind: RouteKind,
    rules: impl Iterator<Item = &'r Rule>,
    mut make: F,
) -> Result<(Vec<T>, Vec<RuleLoadError>), ReadError>
where
    R: ClusterReader,
    Rule: RouteRule + 'r,
    F: FnMut(&Rule, Vec<Backend>, Option<Arc<ListenerRuleConfiguration>>) -> T,
{
    let mut resolved = Vec::new();
    let mut errors = Vec::new();

    for rule in rules {
        let mut backends = Vec::new();
        for backend_ref in rule.backend_refs() {
            match backend::resolve_backend(cx, route, route_kind, &backend_ref).await? {
                BackendOutcome::Resolved(backend) => backends.push(backend),
                BackendOutcome::Omitted(error) => {
                    let fatal = error.fatal;
                    errors.push(error);
                    if fatal {
                        return Ok((resolved, errors));
                    }
                }
            }
        }

        let config = match rule_config::resolve_rule_config(cx.reader, route, &rule.extension_refs())
            .await?
        {
            RuleConfigOutcome::Resolved(config) => Some(config),
            RuleConfigOutcome::Absent => None,
            RuleConfigOutcome::Omitted(error) => {
                errors.push(error);
                None
            }
        };

        resolved.push(make(rule, backends, config));
    }

    Ok((resolved, errors))
}

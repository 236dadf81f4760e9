use crate::{
    error::{RouteStatusError, RuleLoadError},
    reader::{ClusterReader, ReadError},
};
use elbv2_gateway_controller_core::{conditions::RouteConditionReason, routes::GroupKindNamespaceName};
use elbv2_gateway_controller_k8s_api::elbv2::{self, ListenerRuleConfiguration};
use std::sync::Arc;

/// An `extensionRef` filter reference, projected out of a route rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ExtensionRef {
    pub group: String,
    pub kind: String,
    pub name: String,
}

pub(crate) enum RuleConfigOutcome {
    Resolved(Arc<ListenerRuleConfiguration>),
    Absent,
    Omitted(RuleLoadError),
}

/// Resolves a rule's extension references to its ListenerRuleConfiguration.
/// At most one reference per rule is supported; the referent must live in the
/// route's namespace.
pub(crate) async fn resolve_rule_config<R: ClusterReader>(
    reader: &R,
    route: &GroupKindNamespaceName,
    refs: &[ExtensionRef],
) -> Result<RuleConfigOutcome, ReadError> {
    let reference = match refs {
        [] => return Ok(RuleConfigOutcome::Absent),
        [reference] => reference,
        refs => {
            return Ok(RuleConfigOutcome::Omitted(RuleLoadError::warning(
                RouteStatusError::route(
                    RouteConditionReason::UnsupportedValue,
                    format!(
                        "rule references {count} rule configurations ({names}); at most one is supported",
                        count = refs.len(),
                        names = refs
                            .iter()
                            .map(|r| r.name.as_str())
                            .collect::<Vec<_>>()
                            .join(", "),
                    ),
                ),
            )));
        }
    };

    if reference.group != elbv2::GROUP || reference.kind != "ListenerRuleConfiguration" {
        return Ok(RuleConfigOutcome::Omitted(RuleLoadError::warning(
            RouteStatusError::route(
                RouteConditionReason::InvalidKind,
                format!(
                    "filter extensionRef {name} has unsupported kind {group}/{kind}",
                    name = reference.name,
                    group = reference.group,
                    kind = reference.kind,
                ),
            ),
        )));
    }

    match reader
        .get::<ListenerRuleConfiguration>(&route.namespace, &reference.name)
        .await?
    {
        Some(config) => Ok(RuleConfigOutcome::Resolved(Arc::new(config))),
        None => Ok(RuleConfigOutcome::Omitted(RuleLoadError::warning(
            RouteStatusError::route(
                RouteConditionReason::BackendNotFound,
                format!(
                    "ListenerRuleConfiguration {namespace}/{name} not found",
                    namespace = route.namespace,
                    name = reference.name,
                ),
            ),
        ))),
    }
}

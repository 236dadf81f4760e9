//! Evaluation of a listener's `allowedRoutes.namespaces.selector` block
//! against namespace labels.

use crate::gateway;
use std::collections::BTreeMap;

/// A namespace label selector, compiled from the Gateway API wire form into
/// a flat list of requirements. All requirements must hold for a namespace
/// to be selected; a selector with no requirements selects every namespace.
#[derive(Clone, Debug, Default)]
pub struct NamespaceSelector {
    requirements: Vec<Requirement>,
}

#[derive(Clone, Debug)]
enum Requirement {
    HasValue { key: String, value: String },
    In { key: String, values: Vec<String> },
    NotIn { key: String, values: Vec<String> },
    Exists { key: String },
    DoesNotExist { key: String },
    /// An operator this controller does not understand. Selects nothing, so
    /// an unintelligible selector fails closed.
    Unintelligible,
}

impl NamespaceSelector {
    pub fn matches(&self, labels: Option<&BTreeMap<String, String>>) -> bool {
        self.requirements
            .iter()
            .all(|requirement| requirement.holds(labels))
    }
}

impl From<&gateway::GatewayListenersAllowedRoutesNamespacesSelector> for NamespaceSelector {
    fn from(selector: &gateway::GatewayListenersAllowedRoutesNamespacesSelector) -> Self {
        let mut requirements = Vec::new();

        for (key, value) in selector.match_labels.iter().flatten() {
            requirements.push(Requirement::HasValue {
                key: key.clone(),
                value: value.clone(),
            });
        }

        for expression in selector.match_expressions.iter().flatten() {
            let key = expression.key.clone();
            let values = || expression.values.clone().unwrap_or_default();
            requirements.push(match expression.operator.as_str() {
                "In" => Requirement::In {
                    key,
                    values: values(),
                },
                "NotIn" => Requirement::NotIn {
                    key,
                    values: values(),
                },
                "Exists" => Requirement::Exists { key },
                "DoesNotExist" => Requirement::DoesNotExist { key },
                operator => {
                    tracing::warn!(%key, %operator, "unknown selector operator");
                    Requirement::Unintelligible
                }
            });
        }

        Self { requirements }
    }
}

impl Requirement {
    fn holds(&self, labels: Option<&BTreeMap<String, String>>) -> bool {
        let label = |key: &String| labels.and_then(|labels| labels.get(key));
        match self {
            Self::HasValue { key, value } => label(key) == Some(value),
            Self::In { key, values } => label(key).is_some_and(|v| values.contains(v)),
            Self::NotIn { key, values } => label(key).is_none_or(|v| !values.contains(v)),
            Self::Exists { key } => label(key).is_some(),
            Self::DoesNotExist { key } => label(key).is_none(),
            Self::Unintelligible => false,
        }
    }
}

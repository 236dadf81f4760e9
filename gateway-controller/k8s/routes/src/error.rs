use crate::reader::ReadError;
use elbv2_gateway_controller_core::{
    conditions::{GatewayConditionReason, RouteConditionReason},
    routes::RouteKind,
};

/// A failure that should manifest as route (and possibly gateway) status
/// conditions rather than abort the reconcile.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{route_message}")]
pub struct RouteStatusError {
    pub route_reason: RouteConditionReason,
    pub route_message: String,
    pub gateway_reason: Option<GatewayConditionReason>,
    pub gateway_message: Option<String>,
}

impl RouteStatusError {
    pub fn route(reason: RouteConditionReason, message: impl Into<String>) -> Self {
        Self {
            route_reason: reason,
            route_message: message.into(),
            gateway_reason: None,
            gateway_message: None,
        }
    }

    pub fn with_gateway(mut self, reason: GatewayConditionReason, message: impl Into<String>) -> Self {
        self.gateway_reason = Some(reason);
        self.gateway_message = Some(message.into());
        self
    }
}

/// An error collected while resolving a route's rules.
///
/// Warnings leave the rule in place with the offending backend or rule
/// configuration omitted; a fatal error drops the whole route from the
/// reconcile's result. Either way the error's reason and message surface as
/// an `Accepted=False, ResolvedRefs=False` status update.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{error}")]
pub struct RuleLoadError {
    pub error: RouteStatusError,
    pub fatal: bool,
}

impl RuleLoadError {
    pub fn warning(error: RouteStatusError) -> Self {
        Self {
            error,
            fatal: false,
        }
    }

    pub fn fatal(error: RouteStatusError) -> Self {
        Self { error, fatal: true }
    }
}

/// A reconcile-fatal failure: no partial result is produced and the caller
/// is expected to retry.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to list routes for kinds [{}]", .failures.iter().map(|(kind, _)| kind.kind_str()).collect::<Vec<_>>().join(", "))]
    Listing { failures: Vec<(RouteKind, ReadError)> },

    #[error(transparent)]
    Read(#[from] ReadError),
}

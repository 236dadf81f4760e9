//! The Gateway API condition vocabulary emitted by the engine. The strings
//! here are wire-visible: they land in `RouteStatus` conditions and must
//! match what conformance tooling expects.

/// Condition type reporting whether a route attached to a parent.
pub const CONDITION_ACCEPTED: &str = "Accepted";

/// Condition type reporting whether a route's references all resolved.
pub const CONDITION_RESOLVED_REFS: &str = "ResolvedRefs";

#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub enum RouteConditionReason {
    Accepted,
    ResolvedRefs,
    BackendNotFound,
    RefNotPermitted,
    InvalidKind,
    UnsupportedValue,
    NotAllowedByListeners,
    NoMatchingListenerHostname,
}

#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub enum GatewayConditionReason {
    Accepted,
    ListenersNotValid,
    UnsupportedValue,
}

// === impl RouteConditionReason ===

impl RouteConditionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "Accepted",
            Self::ResolvedRefs => "ResolvedRefs",
            Self::BackendNotFound => "BackendNotFound",
            Self::RefNotPermitted => "RefNotPermitted",
            Self::InvalidKind => "InvalidKind",
            Self::UnsupportedValue => "UnsupportedValue",
            Self::NotAllowedByListeners => "NotAllowedByListeners",
            Self::NoMatchingListenerHostname => "NoMatchingListenerHostname",
        }
    }
}

impl std::fmt::Display for RouteConditionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// === impl GatewayConditionReason ===

impl GatewayConditionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "Accepted",
            Self::ListenersNotValid => "ListenersNotValid",
            Self::UnsupportedValue => "UnsupportedValue",
        }
    }
}

impl std::fmt::Display for GatewayConditionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

use std::borrow::Cow;

/// The route kinds the gateway controller resolves against listeners.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum RouteKind {
    Http,
    Grpc,
    Tls,
    Tcp,
    Udp,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct GroupKindName {
    pub group: Cow<'static, str>,
    pub kind: Cow<'static, str>,
    pub name: Cow<'static, str>,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct GroupKindNamespaceName {
    pub group: Cow<'static, str>,
    pub kind: Cow<'static, str>,
    pub namespace: Cow<'static, str>,
    pub name: Cow<'static, str>,
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ResourceId {
    pub namespace: String,
    pub name: String,
}

/// A route's parent reference, normalized across the five route kinds.
///
/// Field optionality follows the Gateway API wire shape so the reference can
/// be echoed verbatim into the route's status.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq)]
pub struct ParentRef {
    pub group: Option<String>,
    pub kind: Option<String>,
    pub namespace: Option<String>,
    pub name: String,
    pub section_name: Option<String>,
    pub port: Option<i32>,
}

// === impl RouteKind ===

impl RouteKind {
    pub const GATEWAY_API_GROUP: &'static str = "gateway.networking.k8s.io";

    pub fn kind_str(&self) -> &'static str {
        match self {
            Self::Http => "HTTPRoute",
            Self::Grpc => "GRPCRoute",
            Self::Tls => "TLSRoute",
            Self::Tcp => "TCPRoute",
            Self::Udp => "UDPRoute",
        }
    }

    /// Kinds that carry spec hostnames.
    pub fn has_hostnames(&self) -> bool {
        matches!(self, Self::Http | Self::Grpc | Self::Tls)
    }

    /// Kinds whose rules may carry an ExtensionRef rule configuration.
    pub fn has_rule_config(&self) -> bool {
        matches!(self, Self::Http | Self::Grpc)
    }
}

impl std::fmt::Display for RouteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.kind_str())
    }
}

// === impl GroupKindName ===

impl Ord for GroupKindName {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name.cmp(&other.name).then(
            self.group
                .cmp(&other.group)
                .then(self.kind.cmp(&other.kind)),
        )
    }
}

impl PartialOrd for GroupKindName {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl GroupKindName {
    pub fn namespaced(self, namespace: String) -> GroupKindNamespaceName {
        GroupKindNamespaceName {
            group: self.group,
            kind: self.kind,
            namespace: namespace.into(),
            name: self.name,
        }
    }
}

// === impl GroupKindNamespaceName ===

impl GroupKindNamespaceName {
    /// `namespace/name` rendering used in user-facing condition messages.
    pub fn namespaced_name(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }
}

impl std::fmt::Display for GroupKindNamespaceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}/{}",
            self.kind, self.namespace, self.name
        )
    }
}

// Listener mapping iterates routes in lexicographic (namespace, name, kind)
// order; this ordering is part of the engine's determinism contract.
impl Ord for GroupKindNamespaceName {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.namespace.cmp(&other.namespace).then(
            self.name
                .cmp(&other.name)
                .then(self.kind.cmp(&other.kind).then(self.group.cmp(&other.group))),
        )
    }
}

impl PartialOrd for GroupKindNamespaceName {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// === impl ResourceId ===

impl ResourceId {
    pub fn new(namespace: String, name: String) -> Self {
        Self { namespace, name }
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

//! The `gateway.k8s.aws` CRDs the route engine resolves: per-Service target
//! group configuration and per-rule listener configuration. The engine only
//! loads these and hands them to the load-balancer model builder.

use std::collections::BTreeMap;

/// API group of the load-balancer configuration CRDs.
pub const GROUP: &str = "gateway.k8s.aws";

/// Customizes the AWS target group provisioned for a Service.
#[derive(
    Clone,
    Debug,
    PartialEq,
    kube::CustomResource,
    serde::Deserialize,
    serde::Serialize,
    schemars::JsonSchema,
)]
#[kube(
    group = "gateway.k8s.aws",
    version = "v1beta1",
    kind = "TargetGroupConfiguration",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct TargetGroupConfigurationSpec {
    /// The Service this configuration applies to. Only same-namespace
    /// references are supported.
    pub target_reference: TargetReference,
    pub default_configuration: Option<TargetGroupProps>,
    /// Per-route overrides, merged field-wise over the default
    /// configuration for backends of a matching route.
    pub route_configurations: Option<Vec<RouteConfiguration>>,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteConfiguration {
    pub route_identifier: RouteIdentifier,
    pub target_group_props: TargetGroupProps,
}

/// Selects the routes a [`RouteConfiguration`] applies to. Unset fields
/// match everything.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize, schemars::JsonSchema,
)]
#[serde(rename_all = "camelCase")]
pub struct RouteIdentifier {
    pub kind: Option<String>,
    pub namespace: Option<String>,
    pub name: Option<String>,
}

impl TargetGroupProps {
    /// Overlays `self` onto `base`: set fields win, unset fields fall back.
    pub fn merged_over(&self, base: &TargetGroupProps) -> TargetGroupProps {
        TargetGroupProps {
            target_type: self.target_type.or(base.target_type),
            ip_address_type: self.ip_address_type.or(base.ip_address_type),
            protocol: self.protocol.or(base.protocol),
            protocol_version: self.protocol_version.or(base.protocol_version),
            health_check: self.health_check.clone().or_else(|| base.health_check.clone()),
            target_group_attributes: self
                .target_group_attributes
                .clone()
                .or_else(|| base.target_group_attributes.clone()),
            tags: self.tags.clone().or_else(|| base.tags.clone()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TargetReference {
    /// Defaults to the core group.
    pub group: Option<String>,
    /// Defaults to `Service`.
    pub kind: Option<String>,
    pub name: String,
}

#[derive(
    Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize, schemars::JsonSchema,
)]
#[serde(rename_all = "camelCase")]
pub struct TargetGroupProps {
    pub target_type: Option<TargetType>,
    pub ip_address_type: Option<TargetGroupIpAddressType>,
    pub protocol: Option<TargetGroupProtocol>,
    pub protocol_version: Option<ProtocolVersion>,
    pub health_check: Option<HealthCheckProps>,
    pub target_group_attributes: Option<Vec<TargetGroupAttribute>>,
    pub tags: Option<BTreeMap<String, String>>,
}

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize, schemars::JsonSchema,
)]
pub enum TargetType {
    #[serde(rename = "instance")]
    Instance,
    #[serde(rename = "ip")]
    Ip,
}

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize, schemars::JsonSchema,
)]
pub enum TargetGroupIpAddressType {
    #[serde(rename = "ipv4")]
    Ipv4,
    #[serde(rename = "ipv6")]
    Ipv6,
}

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize, schemars::JsonSchema,
)]
pub enum TargetGroupProtocol {
    #[serde(rename = "HTTP")]
    Http,
    #[serde(rename = "HTTPS")]
    Https,
    #[serde(rename = "TCP")]
    Tcp,
    #[serde(rename = "UDP")]
    Udp,
    #[serde(rename = "TLS")]
    Tls,
    #[serde(rename = "TCP_UDP")]
    TcpUdp,
}

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize, schemars::JsonSchema,
)]
pub enum ProtocolVersion {
    #[serde(rename = "HTTP1")]
    Http1,
    #[serde(rename = "HTTP2")]
    Http2,
    #[serde(rename = "GRPC")]
    Grpc,
}

#[derive(
    Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize, schemars::JsonSchema,
)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckProps {
    pub path: Option<String>,
    pub port: Option<i32>,
    pub protocol: Option<TargetGroupProtocol>,
    pub interval_seconds: Option<i32>,
    pub timeout_seconds: Option<i32>,
    pub healthy_threshold_count: Option<i32>,
    pub unhealthy_threshold_count: Option<i32>,
    pub matcher: Option<HealthCheckMatcher>,
}

#[derive(
    Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize, schemars::JsonSchema,
)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckMatcher {
    pub http_code: Option<String>,
    pub grpc_code: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TargetGroupAttribute {
    pub key: String,
    pub value: String,
}

/// Additional conditions and pre-routing actions for the listener rules a
/// route materializes into, referenced from HTTPRoute/GRPCRoute filters via
/// `extensionRef`.
#[derive(
    Clone,
    Debug,
    PartialEq,
    kube::CustomResource,
    serde::Deserialize,
    serde::Serialize,
    schemars::JsonSchema,
)]
#[kube(
    group = "gateway.k8s.aws",
    version = "v1beta1",
    kind = "ListenerRuleConfiguration",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct ListenerRuleConfigurationSpec {
    pub actions: Option<Vec<RuleAction>>,
    pub conditions: Option<Vec<RuleCondition>>,
    pub tags: Option<BTreeMap<String, String>>,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RuleAction {
    #[serde(rename = "type")]
    pub type_: RuleActionType,
    pub authenticate_cognito_config: Option<AuthenticateCognitoConfig>,
    pub authenticate_oidc_config: Option<AuthenticateOidcConfig>,
    pub fixed_response_config: Option<FixedResponseConfig>,
    pub redirect_config: Option<RedirectConfig>,
}

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize, schemars::JsonSchema,
)]
pub enum RuleActionType {
    #[serde(rename = "authenticate-cognito")]
    AuthenticateCognito,
    #[serde(rename = "authenticate-oidc")]
    AuthenticateOidc,
    #[serde(rename = "fixed-response")]
    FixedResponse,
    #[serde(rename = "redirect")]
    Redirect,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticateOidcConfig {
    pub issuer: String,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub user_info_endpoint: String,
    /// Name of a same-namespace Secret holding `clientID` and `clientSecret`.
    pub secret_name: String,
    pub scope: Option<String>,
    pub session_cookie_name: Option<String>,
    pub session_timeout: Option<i64>,
    pub on_unauthenticated_request: Option<String>,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticateCognitoConfig {
    pub user_pool_arn: String,
    pub user_pool_client_id: String,
    pub user_pool_domain: String,
    pub scope: Option<String>,
    pub session_cookie_name: Option<String>,
    pub session_timeout: Option<i64>,
    pub on_unauthenticated_request: Option<String>,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FixedResponseConfig {
    pub content_type: Option<String>,
    pub message_body: Option<String>,
    pub status_code: i32,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RedirectConfig {
    pub host: Option<String>,
    pub path: Option<String>,
    pub port: Option<String>,
    pub protocol: Option<String>,
    pub query: Option<String>,
    pub status_code: String,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RuleCondition {
    pub field: RuleConditionField,
    pub source_ip_config: Option<SourceIpConfig>,
}

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize, schemars::JsonSchema,
)]
pub enum RuleConditionField {
    #[serde(rename = "source-ip")]
    SourceIp,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SourceIpConfig {
    /// Source CIDRs, e.g. `10.0.0.0/8`.
    pub values: Vec<String>,
}

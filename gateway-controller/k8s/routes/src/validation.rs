use elbv2_gateway_controller_core::conditions::GatewayConditionReason;
use elbv2_gateway_controller_k8s_api::gateway::Gateway;

/// Per-listener validation outcome, surfaced to the gateway-status writer
/// alongside the loader result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListenerOutcome {
    pub name: String,
    pub port: i32,
    pub valid: bool,
    pub reason: Option<GatewayConditionReason>,
    pub message: String,
}

impl ListenerOutcome {
    fn valid(name: &str, port: i32) -> Self {
        Self {
            name: name.to_string(),
            port,
            valid: true,
            reason: None,
            message: String::new(),
        }
    }

    fn invalid(name: &str, port: i32, message: String) -> Self {
        Self {
            name: name.to_string(),
            port,
            valid: false,
            reason: Some(GatewayConditionReason::ListenersNotValid),
            message,
        }
    }
}

/// Validates a gateway's listeners. Routes are mapped regardless of the
/// outcomes; the gateway-status writer consumes them.
pub trait ListenerValidator: Send + Sync {
    fn validate(&self, gateway: &Gateway, controller_name: &str) -> Vec<ListenerOutcome>;
}

/// Checks each listener's protocol is one this controller can provision and
/// that its TLS block is coherent with the protocol.
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultListenerValidator;

impl ListenerValidator for DefaultListenerValidator {
    fn validate(&self, gateway: &Gateway, _controller_name: &str) -> Vec<ListenerOutcome> {
        gateway
            .spec
            .listeners
            .iter()
            .map(|listener| {
                match listener.protocol.as_str() {
                    "HTTP" | "GRPC" | "TCP" | "UDP" => {
                        if listener.tls.is_some() {
                            ListenerOutcome::invalid(
                                &listener.name,
                                listener.port,
                                format!(
                                    "listener {name} must not configure tls with protocol {protocol}",
                                    name = listener.name,
                                    protocol = listener.protocol,
                                ),
                            )
                        } else {
                            ListenerOutcome::valid(&listener.name, listener.port)
                        }
                    }
                    "HTTPS" | "TLS" => {
                        if listener.tls.is_none() {
                            ListenerOutcome::invalid(
                                &listener.name,
                                listener.port,
                                format!(
                                    "listener {name} requires a tls block with protocol {protocol}",
                                    name = listener.name,
                                    protocol = listener.protocol,
                                ),
                            )
                        } else {
                            ListenerOutcome::valid(&listener.name, listener.port)
                        }
                    }
                    unsupported => ListenerOutcome::invalid(
                        &listener.name,
                        listener.port,
                        format!(
                            "listener {name} has unsupported protocol {unsupported}",
                            name = listener.name,
                        ),
                    ),
                }
            })
            .collect()
    }
}

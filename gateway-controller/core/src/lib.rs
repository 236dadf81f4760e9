#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod conditions;
pub mod hostname;
pub mod routes;
pub mod status;

/// Controller name claimed by the ALB (L7) flavor of the gateway controller.
pub const ALB_GATEWAY_CONTROLLER_NAME: &str = "gateway.k8s.aws/alb-gateway-controller";

/// Controller name claimed by the NLB (L4) flavor of the gateway controller.
pub const NLB_GATEWAY_CONTROLLER_NAME: &str = "gateway.k8s.aws/nlb-gateway-controller";

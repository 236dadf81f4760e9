#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod elbv2;
pub mod selector;

pub use self::selector::NamespaceSelector;

/// Flattened re-export of the experimental Gateway API types, mirroring how
/// the generated modules are referenced throughout this workspace.
pub mod gateway {
    pub use gateway_api::apis::experimental::constants::*;
    pub use gateway_api::apis::experimental::gatewayclasses::*;
    pub use gateway_api::apis::experimental::gateways::*;
    pub use gateway_api::apis::experimental::grpcroutes::*;
    pub use gateway_api::apis::experimental::httproutes::*;
    pub use gateway_api::apis::experimental::referencegrants::*;
    pub use gateway_api::apis::experimental::tcproutes::*;
    pub use gateway_api::apis::experimental::tlsroutes::*;
    pub use gateway_api::apis::experimental::udproutes::*;
}
pub use k8s_openapi::{
    api::core::v1::{Namespace, Service, ServicePort, ServiceSpec},
    apimachinery::pkg::apis::meta::v1::{Condition, Time},
    NamespaceResourceScope,
};
pub use kube::{
    api::{Api, ListParams, ObjectMeta, Patch, PatchParams, Resource, ResourceExt},
    error::ErrorResponse,
    Client, Error,
};

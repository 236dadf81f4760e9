mod conditions;
mod controller;
mod metrics;
mod patch;
mod submitter;


pub use self::{
    controller::Controller,
    metrics::ControllerMetrics,
    submitter::{channel, StatusSubmitter},
};

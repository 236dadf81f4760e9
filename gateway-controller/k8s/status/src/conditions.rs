use chrono::offset::Utc;
use elbv2_gateway_controller_core::{
    conditions::{RouteConditionReason, CONDITION_ACCEPTED, CONDITION_RESOLVED_REFS},
    status::RouteStatusUpdate,
};
use elbv2_gateway_controller_k8s_api as k8s;

pub(crate) fn accepted(update: &RouteStatusUpdate) -> k8s::Condition {
    if update.accepted {
        condition(
            CONDITION_ACCEPTED,
            "True",
            RouteConditionReason::Accepted.as_str(),
            "".to_string(),
            update.generation,
        )
    } else {
        condition(
            CONDITION_ACCEPTED,
            "False",
            update.reason.as_str(),
            update.message.clone(),
            update.generation,
        )
    }
}

pub(crate) fn resolved_refs(update: &RouteStatusUpdate) -> k8s::Condition {
    if update.resolved_refs {
        condition(
            CONDITION_RESOLVED_REFS,
            "True",
            RouteConditionReason::ResolvedRefs.as_str(),
            "".to_string(),
            update.generation,
        )
    } else {
        condition(
            CONDITION_RESOLVED_REFS,
            "False",
            update.reason.as_str(),
            update.message.clone(),
            update.generation,
        )
    }
}

fn condition(
    type_: &str,
    status: &str,
    reason: &str,
    message: String,
    observed_generation: Option<i64>,
) -> k8s::Condition {
    k8s::Condition {
        last_transition_time: k8s::Time(Utc::now()),
        message,
        observed_generation,
        reason: reason.to_string(),
        status: status.to_string(),
        type_: type_.to_string(),
    }
}

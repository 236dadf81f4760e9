use crate::{metrics::ControllerMetrics, patch::make_patch};
use ahash::AHashSet;
use elbv2_gateway_controller_core::{routes::RouteKind, status::RouteStatusUpdate};
use elbv2_gateway_controller_k8s_api::{self as k8s, gateway};
use serde::de::DeserializeOwned;
use tokio::sync::mpsc;

/// Drains the status-update queue and patches route statuses.
///
/// Updates are processed in drain cycles: everything queued at wakeup is
/// taken as one batch and deduplicated by (route name, route namespace, route
/// kind, gateway name, gateway namespace) with first-enqueued-wins semantics.
/// Loaders rely on this by enqueuing failures before acceptances.
pub struct Controller {
    client: k8s::Client,
    controller_name: String,
    patch_params: k8s::PatchParams,
    updates: mpsc::Receiver<RouteStatusUpdate>,
    metrics: ControllerMetrics,
}

impl Controller {
    pub fn new(
        client: k8s::Client,
        controller_name: String,
        updates: mpsc::Receiver<RouteStatusUpdate>,
        metrics: ControllerMetrics,
    ) -> Self {
        let patch_params = k8s::PatchParams::apply(&controller_name);
        Self {
            client,
            controller_name,
            patch_params,
            updates,
            metrics,
        }
    }

    pub async fn process_updates(mut self) {
        while let Some(first) = self.updates.recv().await {
            let mut batch = vec![first];
            while let Ok(update) = self.updates.try_recv() {
                batch.push(update);
            }

            let total = batch.len();
            let retained = dedup_first_wins(batch);
            self.metrics
                .patch_deduped
                .inc_by((total - retained.len()) as u64);

            for update in retained {
                self.apply(update).await;
            }
        }
        tracing::debug!("status update channel closed");
    }

    async fn apply(&self, update: RouteStatusUpdate) {
        let patch = match make_patch(&update, &self.controller_name) {
            Ok(patch) => patch,
            Err(error) => {
                tracing::error!(route = %update.route, %error, "failed to encode status patch");
                return;
            }
        };

        match update.kind {
            RouteKind::Http => self.patch_route::<gateway::HTTPRoute>(&update, patch).await,
            RouteKind::Grpc => self.patch_route::<gateway::GRPCRoute>(&update, patch).await,
            RouteKind::Tls => self.patch_route::<gateway::TLSRoute>(&update, patch).await,
            RouteKind::Tcp => self.patch_route::<gateway::TCPRoute>(&update, patch).await,
            RouteKind::Udp => self.patch_route::<gateway::UDPRoute>(&update, patch).await,
        }
    }

    async fn patch_route<K>(&self, update: &RouteStatusUpdate, patch: k8s::Patch<serde_json::Value>)
    where
        K: k8s::Resource<Scope = k8s::NamespaceResourceScope, DynamicType = ()>
            + DeserializeOwned
            + Clone
            + std::fmt::Debug,
    {
        let api = k8s::Api::<K>::namespaced(self.client.clone(), &update.route.namespace);
        match api
            .patch_status(&update.route.name, &self.patch_params, &patch)
            .await
        {
            Ok(_) => {
                self.metrics.patch_succeeded.inc();
            }
            Err(error) => {
                self.metrics.patch_failed.inc();
                tracing::error!(route = %update.route, %error, "failed to patch route status");
            }
        }
    }
}

pub(crate) fn dedup_first_wins(batch: Vec<RouteStatusUpdate>) -> Vec<RouteStatusUpdate> {
    let mut seen = AHashSet::new();
    batch
        .into_iter()
        .filter(|update| seen.insert(update.dedup_key()))
        .collect()
}

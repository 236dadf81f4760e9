use crate::reader::{ClusterReader, ReadError};
use ahash::AHashMap;
use elbv2_gateway_controller_k8s_api::gateway;

/// The identity a cross-namespace reference originates from.
#[derive(Copy, Clone, Debug)]
pub(crate) struct GrantFrom<'a> {
    pub group: &'a str,
    pub kind: &'a str,
    pub namespace: &'a str,
}

/// The object a cross-namespace reference points at.
#[derive(Copy, Clone, Debug)]
pub(crate) struct GrantTo<'a> {
    pub group: &'a str,
    pub kind: &'a str,
    pub namespace: &'a str,
    pub name: &'a str,
}

/// Decides whether cross-namespace references are permitted by the target
/// namespace's ReferenceGrants. Grants are listed at most once per target
/// namespace per reconcile; nothing is cached beyond that.
#[derive(Debug, Default)]
pub(crate) struct GrantCache {
    by_namespace: AHashMap<String, Vec<gateway::ReferenceGrant>>,
}

impl GrantCache {
    pub(crate) async fn allows<R: ClusterReader>(
        &mut self,
        reader: &R,
        from: GrantFrom<'_>,
        to: GrantTo<'_>,
    ) -> Result<bool, ReadError> {
        if from.namespace == to.namespace {
            return Ok(true);
        }

        if !self.by_namespace.contains_key(to.namespace) {
            let grants = reader
                .list_namespaced::<gateway::ReferenceGrant>(to.namespace)
                .await?;
            self.by_namespace.insert(to.namespace.to_string(), grants);
        }

        let grants = &self.by_namespace[to.namespace];
        Ok(grants.iter().any(|grant| {
            let from_permitted = grant.spec.from.iter().any(|f| {
                group_eq(&f.group, from.group) && f.kind == from.kind && f.namespace == from.namespace
            });
            let to_permitted = grant.spec.to.iter().any(|t| {
                group_eq(&t.group, to.group)
                    && t.kind == to.kind
                    && t.name.as_deref().is_none_or(|name| name == to.name)
            });
            from_permitted && to_permitted
        }))
    }
}

// ReferenceGrants spell the core group as "" while backend refs may carry
// "core"; both mean the same group.
fn group_eq(a: &str, b: &str) -> bool {
    normalize_group(a) == normalize_group(b)
}

fn normalize_group(group: &str) -> &str {
    if group.eq_ignore_ascii_case("core") {
        ""
    } else {
        group
    }
}

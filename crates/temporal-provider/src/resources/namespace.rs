// Copyright (C) 2025 Temporal Provider contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! `temporal_namespace` resource.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::context::OperationContext;
use crate::diagnostics::Outcome;
use crate::error::{ProviderError, Result};
use crate::mapping::namespace::{model_from_describe, register_request, update_request};
use crate::services::NamespaceService;
use crate::types::NamespaceModel;

/// Managed namespace lifecycle.
#[derive(Clone)]
pub struct NamespaceResource {
    service: Arc<dyn NamespaceService>,
}

impl NamespaceResource {
    pub fn new(service: Arc<dyn NamespaceService>) -> Self {
        Self { service }
    }

    async fn describe(&self, ctx: &OperationContext, name: &str) -> Result<NamespaceModel> {
        let response = ctx
            .run("describe namespace", self.service.describe_namespace(name))
            .await?;
        Ok(model_from_describe(&response))
    }

    /// Register the namespace, then read back the server's view of it.
    #[instrument(skip(self, ctx, plan), fields(namespace = %plan.name))]
    pub async fn create(
        &self,
        ctx: &OperationContext,
        plan: &NamespaceModel,
    ) -> Result<Outcome<NamespaceModel>> {
        let request = register_request(plan)?;
        debug!(
            retention_days = plan.retention,
            is_global = plan.is_global_namespace,
            "Registering namespace"
        );

        ctx.run("register namespace", self.service.register_namespace(request))
            .await?;
        info!("Namespace registered");

        let mut state = self.describe(ctx, &plan.name).await?;
        keep_unmanaged_clusters(plan, &mut state);
        Ok(Outcome::new(state))
    }

    /// Refresh state. A namespace that no longer exists leaves `state`
    /// untouched and adds a warning.
    #[instrument(skip(self, ctx, state), fields(namespace = %state.name))]
    pub async fn read(
        &self,
        ctx: &OperationContext,
        state: &NamespaceModel,
    ) -> Result<Outcome<NamespaceModel>> {
        match self.describe(ctx, &state.name).await {
            Ok(mut fresh) => {
                keep_unmanaged_clusters(state, &mut fresh);
                Ok(Outcome::new(fresh))
            }
            Err(ProviderError::NotFound(message)) => {
                warn!(%message, "Namespace not found, keeping prior state");
                Ok(Outcome::new(state.clone()).with_warning(
                    "Namespace not found",
                    format!(
                        "namespace {:?} was not found on the server; state was left unchanged",
                        state.name
                    ),
                ))
            }
            Err(err) => Err(err),
        }
    }

    /// Apply `planned` over `prior`. Cluster changes are validated before
    /// anything is sent.
    #[instrument(skip(self, ctx, prior, planned), fields(namespace = %planned.name))]
    pub async fn update(
        &self,
        ctx: &OperationContext,
        prior: &NamespaceModel,
        planned: &NamespaceModel,
    ) -> Result<Outcome<NamespaceModel>> {
        if prior.name != planned.name {
            return Err(ProviderError::validation(
                "name",
                "a namespace cannot be renamed; replace it instead",
            ));
        }

        let baseline = self.cluster_baseline(ctx, prior, planned).await?;
        let request = update_request(&baseline, planned)?;
        debug!(
            replication_change = request.replication_config.is_some(),
            "Updating namespace"
        );

        ctx.run("update namespace", self.service.update_namespace(request))
            .await?;
        info!("Namespace updated");

        let mut state = self.describe(ctx, &planned.name).await?;
        keep_unmanaged_clusters(planned, &mut state);
        Ok(Outcome::new(state))
    }

    /// Prior state with unmanaged cluster fields taken from the server, so a
    /// new active cluster is checked against the live replica list.
    async fn cluster_baseline(
        &self,
        ctx: &OperationContext,
        prior: &NamespaceModel,
        planned: &NamespaceModel,
    ) -> Result<NamespaceModel> {
        let new_active = planned
            .active_cluster_name
            .as_deref()
            .filter(|a| !a.is_empty() && Some(*a) != prior.active_cluster_name.as_deref());
        let unmanaged = prior.clusters.is_none() || prior.active_cluster_name.is_none();
        if new_active.is_none() || !unmanaged {
            return Ok(prior.clone());
        }

        let current = self.describe(ctx, &prior.name).await?;
        debug!(
            clusters = ?current.clusters,
            active = ?current.active_cluster_name,
            "Checking failover against server replica list"
        );
        Ok(NamespaceModel {
            clusters: prior.clusters.clone().or(current.clusters),
            active_cluster_name: prior
                .active_cluster_name
                .clone()
                .or(current.active_cluster_name),
            ..prior.clone()
        })
    }

    #[instrument(skip(self, ctx, state), fields(namespace = %state.name))]
    pub async fn delete(&self, ctx: &OperationContext, state: &NamespaceModel) -> Result<()> {
        ctx.run("delete namespace", self.service.delete_namespace(&state.name))
            .await?;
        info!("Namespace deleted");
        Ok(())
    }

    /// Import by namespace name.
    #[instrument(skip(self, ctx))]
    pub async fn import(&self, ctx: &OperationContext, name: &str) -> Result<Outcome<NamespaceModel>> {
        if name.is_empty() {
            return Err(ProviderError::InvalidImportId {
                id: name.to_string(),
                expected: "namespace name".to_string(),
            });
        }
        let state = self.describe(ctx, name).await?;
        info!("Namespace imported");
        Ok(Outcome::new(state))
    }
}

/// Cluster fields are only tracked when the configuration manages them.
fn keep_unmanaged_clusters(config: &NamespaceModel, state: &mut NamespaceModel) {
    if config.clusters.is_none() {
        state.clusters = None;
    }
    if config.active_cluster_name.is_none() {
        state.active_cluster_name = None;
    }
}

// Copyright (C) 2025 Temporal Provider contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! `temporal_search_attribute` resource.
//!
//! Adding a search attribute is asynchronous on the server: the call returns
//! before the attribute is visible in the list response. Create therefore
//! polls until it shows up, or until the caller gives up.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, instrument, warn};

use crate::context::OperationContext;
use crate::diagnostics::Outcome;
use crate::error::{ProviderError, Result};
use crate::import::parse_import_id;
use crate::mapping::search_attribute::{find_custom, SearchAttributeType};
use crate::services::SearchAttributeService;
use crate::types::SearchAttributeModel;

/// Fixed delay between list calls while waiting for a new attribute.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Block until `name` is listed as a custom attribute of `namespace`.
///
/// The first list happens one [`POLL_INTERVAL`] after the call. A failing
/// list call ends the wait with that error; there is no retry.
#[instrument(skip(service, ctx))]
pub async fn await_search_attribute(
    service: &dyn SearchAttributeService,
    ctx: &OperationContext,
    namespace: &str,
    name: &str,
) -> Result<()> {
    let mut ticker = interval_at(Instant::now() + POLL_INTERVAL, POLL_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;

            _ = ctx.token().cancelled() => {
                return Err(ProviderError::Cancelled(format!(
                    "waiting for search attribute {:?}",
                    name
                )));
            }
            _ = ctx.deadline_elapsed() => {
                return Err(ProviderError::DeadlineExceeded(format!(
                    "waiting for search attribute {:?}",
                    name
                )));
            }
            _ = ticker.tick() => {
                let response = ctx
                    .run("list search attributes", service.list_search_attributes(namespace))
                    .await?;
                if find_custom(&response, name).is_some() {
                    debug!("Search attribute is visible");
                    return Ok(());
                }
                debug!("Search attribute not visible yet");
            }
        }
    }
}

#[derive(Clone)]
pub struct SearchAttributeResource {
    service: Arc<dyn SearchAttributeService>,
}

impl SearchAttributeResource {
    pub fn new(service: Arc<dyn SearchAttributeService>) -> Self {
        Self { service }
    }

    /// Add the attribute and wait until the server lists it.
    #[instrument(skip(self, ctx, plan), fields(namespace = %plan.namespace, name = %plan.name))]
    pub async fn create(
        &self,
        ctx: &OperationContext,
        plan: &SearchAttributeModel,
    ) -> Result<Outcome<SearchAttributeModel>> {
        let value_type: SearchAttributeType = plan.value_type.parse()?;

        let existing = ctx
            .run(
                "list search attributes",
                self.service.list_search_attributes(&plan.namespace),
            )
            .await?;
        if let Some(current) = find_custom(&existing, &plan.name) {
            return Err(ProviderError::AlreadyExists(format!(
                "search attribute {:?} already exists in namespace {:?} with type {}",
                plan.name, plan.namespace, current
            )));
        }

        let attributes = HashMap::from([(plan.name.clone(), value_type.to_wire())]);
        ctx.run(
            "add search attribute",
            self.service
                .add_search_attributes(&plan.namespace, attributes),
        )
        .await?;
        debug!(%value_type, "Search attribute added, waiting for it to become visible");

        await_search_attribute(self.service.as_ref(), ctx, &plan.namespace, &plan.name).await?;
        info!("Search attribute created");

        Ok(Outcome::new(SearchAttributeModel {
            value_type: value_type.to_string(),
            ..plan.clone()
        }))
    }

    /// `None` when the attribute no longer exists and should leave state.
    #[instrument(skip(self, ctx, state), fields(namespace = %state.namespace, name = %state.name))]
    pub async fn read(
        &self,
        ctx: &OperationContext,
        state: &SearchAttributeModel,
    ) -> Result<Option<SearchAttributeModel>> {
        let response = ctx
            .run(
                "list search attributes",
                self.service.list_search_attributes(&state.namespace),
            )
            .await?;

        match find_custom(&response, &state.name) {
            Some(value_type) => Ok(Some(SearchAttributeModel {
                value_type: value_type.to_string(),
                ..state.clone()
            })),
            None => {
                info!("Search attribute not found, removing from state");
                Ok(None)
            }
        }
    }

    /// Search attributes cannot be modified; prior state is kept.
    #[instrument(skip(self, _ctx, prior, _planned), fields(namespace = %prior.namespace, name = %prior.name))]
    pub async fn update(
        &self,
        _ctx: &OperationContext,
        prior: &SearchAttributeModel,
        _planned: &SearchAttributeModel,
    ) -> Result<Outcome<SearchAttributeModel>> {
        warn!("Search attributes cannot be updated in place");
        Ok(Outcome::new(prior.clone()).with_warning(
            "Update not supported",
            "search attributes cannot be updated; delete and recreate the attribute to change it",
        ))
    }

    #[instrument(skip(self, ctx, state), fields(namespace = %state.namespace, name = %state.name))]
    pub async fn delete(&self, ctx: &OperationContext, state: &SearchAttributeModel) -> Result<()> {
        ctx.run(
            "remove search attribute",
            self.service
                .remove_search_attributes(&state.namespace, vec![state.name.clone()]),
        )
        .await?;
        info!("Search attribute deleted");
        Ok(())
    }

    /// Import from `namespace:name` or a bare `name`. Only custom attributes
    /// can be imported.
    #[instrument(skip(self, ctx))]
    pub async fn import(
        &self,
        ctx: &OperationContext,
        id: &str,
    ) -> Result<Outcome<SearchAttributeModel>> {
        let (namespace, name) = parse_import_id(id, "name")?;
        let response = ctx
            .run(
                "list search attributes",
                self.service.list_search_attributes(&namespace),
            )
            .await?;

        let value_type = find_custom(&response, &name).ok_or_else(|| {
            ProviderError::NotFound(format!(
                "custom search attribute {:?} in namespace {:?}",
                name, namespace
            ))
        })?;
        info!(%namespace, %name, "Search attribute imported");

        Ok(Outcome::new(SearchAttributeModel {
            name,
            namespace,
            value_type: value_type.to_string(),
        }))
    }
}

// Copyright (C) 2025 Temporal Provider contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! `temporal_schedule` resource.

use std::sync::Arc;

use temporal_protocol::proto::workflowservice::{CreateScheduleRequest, UpdateScheduleRequest};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::context::OperationContext;
use crate::diagnostics::Outcome;
use crate::error::{ProviderError, Result};
use crate::import::parse_import_id;
use crate::mapping::schedule::{model_from_describe, requires_replace, to_memo, to_schedule};
use crate::services::{IDENTITY, ScheduleService};
use crate::types::ScheduleModel;

#[derive(Clone)]
pub struct ScheduleResource {
    service: Arc<dyn ScheduleService>,
}

impl ScheduleResource {
    pub fn new(service: Arc<dyn ScheduleService>) -> Self {
        Self { service }
    }

    /// Create the schedule. State is the plan itself; the server's
    /// normalised spec only shows up on the next read.
    #[instrument(skip(self, ctx, plan), fields(namespace = %plan.namespace, schedule_id = %plan.schedule_id))]
    pub async fn create(
        &self,
        ctx: &OperationContext,
        plan: &ScheduleModel,
    ) -> Result<Outcome<ScheduleModel>> {
        let schedule = to_schedule(plan)?;
        let memo = to_memo(plan.memo.as_ref())?;

        let request = CreateScheduleRequest {
            namespace: plan.namespace.clone(),
            schedule_id: plan.schedule_id.clone(),
            schedule: Some(schedule),
            identity: IDENTITY.to_string(),
            request_id: Uuid::new_v4().to_string(),
            memo,
        };
        debug!(request_id = %request.request_id, "Creating schedule");

        ctx.run("create schedule", self.service.create_schedule(request))
            .await?;
        info!("Schedule created");
        Ok(Outcome::new(plan.clone()))
    }

    #[instrument(skip(self, ctx, state), fields(namespace = %state.namespace, schedule_id = %state.schedule_id))]
    pub async fn read(
        &self,
        ctx: &OperationContext,
        state: &ScheduleModel,
    ) -> Result<Outcome<ScheduleModel>> {
        self.describe(ctx, &state.namespace, &state.schedule_id).await
    }

    async fn describe(
        &self,
        ctx: &OperationContext,
        namespace: &str,
        schedule_id: &str,
    ) -> Result<Outcome<ScheduleModel>> {
        let response = ctx
            .run(
                "describe schedule",
                self.service.describe_schedule(namespace, schedule_id),
            )
            .await?;
        model_from_describe(namespace, schedule_id, &response)
    }

    /// Update in place. Changes to the key or memo must go through replace.
    #[instrument(skip(self, ctx, prior, planned), fields(namespace = %planned.namespace, schedule_id = %planned.schedule_id))]
    pub async fn update(
        &self,
        ctx: &OperationContext,
        prior: &ScheduleModel,
        planned: &ScheduleModel,
    ) -> Result<Outcome<ScheduleModel>> {
        if requires_replace(prior, planned) {
            return Err(ProviderError::validation(
                "memo",
                "namespace, schedule_id and memo cannot be changed in place; replace the schedule",
            ));
        }

        let request = UpdateScheduleRequest {
            namespace: planned.namespace.clone(),
            schedule_id: planned.schedule_id.clone(),
            schedule: Some(to_schedule(planned)?),
            conflict_token: Vec::new(),
            identity: IDENTITY.to_string(),
            request_id: Uuid::new_v4().to_string(),
        };
        debug!(request_id = %request.request_id, "Updating schedule");

        ctx.run("update schedule", self.service.update_schedule(request))
            .await?;
        info!("Schedule updated");
        Ok(Outcome::new(planned.clone()))
    }

    #[instrument(skip(self, ctx, state), fields(namespace = %state.namespace, schedule_id = %state.schedule_id))]
    pub async fn delete(&self, ctx: &OperationContext, state: &ScheduleModel) -> Result<()> {
        ctx.run(
            "delete schedule",
            self.service
                .delete_schedule(&state.namespace, &state.schedule_id),
        )
        .await?;
        info!("Schedule deleted");
        Ok(())
    }

    /// Import from `namespace:schedule_id` or a bare `schedule_id`. The
    /// schedule must exist.
    #[instrument(skip(self, ctx))]
    pub async fn import(&self, ctx: &OperationContext, id: &str) -> Result<Outcome<ScheduleModel>> {
        let (namespace, schedule_id) = parse_import_id(id, "schedule_id")?;
        let outcome = self.describe(ctx, &namespace, &schedule_id).await?;
        info!(%namespace, %schedule_id, "Schedule imported");
        Ok(outcome)
    }
}

// Copyright (C) 2025 Temporal Provider contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! `temporal_search_attribute` data source.
//!
//! Unlike the resource, the lookup also sees system attributes such as
//! `WorkflowId`; a custom attribute of the same name wins.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::context::OperationContext;
use crate::error::{ProviderError, Result};
use crate::mapping::search_attribute::find_any;
use crate::services::SearchAttributeService;
use crate::types::SearchAttributeModel;

#[derive(Clone)]
pub struct SearchAttributeDataSource {
    service: Arc<dyn SearchAttributeService>,
}

impl SearchAttributeDataSource {
    pub fn new(service: Arc<dyn SearchAttributeService>) -> Self {
        Self { service }
    }

    #[instrument(skip(self, ctx))]
    pub async fn read(
        &self,
        ctx: &OperationContext,
        namespace: &str,
        name: &str,
    ) -> Result<SearchAttributeModel> {
        let response = ctx
            .run(
                "list search attributes",
                self.service.list_search_attributes(namespace),
            )
            .await?;

        let value_type = find_any(&response, name).ok_or_else(|| {
            ProviderError::NotFound(format!(
                "search attribute {:?} in namespace {:?}",
                name, namespace
            ))
        })?;
        debug!(%value_type, "Search attribute found");

        Ok(SearchAttributeModel {
            name: name.to_string(),
            namespace: namespace.to_string(),
            value_type: value_type.to_string(),
        })
    }
}

// Copyright (C) 2025 Temporal Provider contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! `temporal_namespace` data source.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::context::OperationContext;
use crate::error::Result;
use crate::mapping::namespace::data_model_from_describe;
use crate::services::NamespaceService;
use crate::types::NamespaceDataModel;

#[derive(Clone)]
pub struct NamespaceDataSource {
    service: Arc<dyn NamespaceService>,
}

impl NamespaceDataSource {
    pub fn new(service: Arc<dyn NamespaceService>) -> Self {
        Self { service }
    }

    /// Look up a namespace by name, including state and failover history.
    #[instrument(skip(self, ctx))]
    pub async fn read(&self, ctx: &OperationContext, name: &str) -> Result<NamespaceDataModel> {
        let response = ctx
            .run("describe namespace", self.service.describe_namespace(name))
            .await?;
        let data = data_model_from_describe(&response);
        debug!(state = %data.state, "Namespace found");
        Ok(data)
    }
}

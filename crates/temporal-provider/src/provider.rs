// Copyright (C) 2025 Temporal Provider contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configured provider: one connection shared by every resource.

use std::sync::Arc;

use temporal_protocol::{connect, fetch_token};
use tracing::{info, instrument};

use crate::config::{ProviderConfig, ResolvedConfig};
use crate::data_sources::{NamespaceDataSource, SearchAttributeDataSource};
use crate::error::Result;
use crate::resources::{NamespaceResource, ScheduleResource, SearchAttributeResource};
use crate::services::{NamespaceService, ScheduleService, SearchAttributeService, TemporalServices};

/// Entry point handing out resources and data sources.
#[derive(Clone)]
pub struct Provider {
    namespaces: Arc<dyn NamespaceService>,
    schedules: Arc<dyn ScheduleService>,
    search_attributes: Arc<dyn SearchAttributeService>,
}

impl Provider {
    /// Resolve `config`, fetch an access token when client credentials are
    /// configured, and build a lazily-connecting channel.
    #[instrument(skip(config))]
    pub async fn configure(config: &ProviderConfig) -> Result<Self> {
        let resolved = config.resolve()?;
        Self::connect(&resolved).await
    }

    #[instrument(skip(resolved), fields(endpoint = %resolved.endpoint(), insecure = resolved.insecure))]
    pub async fn connect(resolved: &ResolvedConfig) -> Result<Self> {
        let bearer_token = match &resolved.credentials {
            Some(credentials) => Some(fetch_token(credentials).await?.access_token),
            None => None,
        };

        let channel = connect(&resolved.transport_config(bearer_token))?;
        info!(
            mtls = resolved.tls.is_some(),
            oauth = resolved.credentials.is_some(),
            "Provider configured"
        );
        Ok(Self::from_services(Arc::new(TemporalServices::new(channel))))
    }

    /// Provider over a single implementation of every capability.
    pub fn from_services<S>(services: Arc<S>) -> Self
    where
        S: NamespaceService + ScheduleService + SearchAttributeService + 'static,
    {
        Self {
            namespaces: services.clone(),
            schedules: services.clone(),
            search_attributes: services,
        }
    }

    pub fn namespace_resource(&self) -> NamespaceResource {
        NamespaceResource::new(self.namespaces.clone())
    }

    pub fn schedule_resource(&self) -> ScheduleResource {
        ScheduleResource::new(self.schedules.clone())
    }

    pub fn search_attribute_resource(&self) -> SearchAttributeResource {
        SearchAttributeResource::new(self.search_attributes.clone())
    }

    pub fn namespace_data_source(&self) -> NamespaceDataSource {
        NamespaceDataSource::new(self.namespaces.clone())
    }

    pub fn search_attribute_data_source(&self) -> SearchAttributeDataSource {
        SearchAttributeDataSource::new(self.search_attributes.clone())
    }
}

// Copyright (C) 2025 Temporal Provider contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Temporal Provider
//!
//! Declarative management of a Temporal cluster's control plane: namespaces,
//! schedules and custom search attributes, plus read-only lookups of
//! namespaces and search attributes.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌─────────────────────────┐
//! │  resources   │──▶│   mapping    │   │  services (traits)      │
//! │  data_sources│──────────────────────▶  NamespaceService       │
//! └──────────────┘   └──────────────┘   │  ScheduleService        │
//!                                       │  SearchAttributeService │
//!                                       └────────────┬────────────┘
//!                                                    │ TemporalServices
//!                                          temporal-protocol (gRPC)
//! ```
//!
//! Mapping is pure: it turns configuration models into wire requests and
//! responses back into models. Resources sequence the remote calls and
//! classify failures. The remote service is only reached through the
//! capability traits, so any of them can be replaced by a fake.
//!
//! # Example
//!
//! ```no_run
//! use temporal_provider::{OperationContext, Provider, ProviderConfig, SearchAttributeModel};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = Provider::configure(&ProviderConfig::new().with_insecure(true)).await?;
//! let ctx = OperationContext::new().with_timeout(std::time::Duration::from_secs(60));
//!
//! let plan = SearchAttributeModel {
//!     name: "CustomerId".to_string(),
//!     namespace: "default".to_string(),
//!     value_type: "Keyword".to_string(),
//! };
//! let created = provider.search_attribute_resource().create(&ctx, &plan).await?;
//! println!("created {:?}", created.value);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod context;
pub mod data_sources;
pub mod diagnostics;
pub mod error;
pub mod import;
pub mod mapping;
pub mod provider;
pub mod resources;
pub mod services;
pub mod types;

pub use config::{ProviderConfig, ResolvedConfig, TlsConfig};
pub use context::OperationContext;
pub use diagnostics::{Diagnostic, Diagnostics, Outcome, Severity};
pub use error::{ProviderError, Result};
pub use import::parse_import_id;
pub use provider::Provider;
pub use services::{NamespaceService, ScheduleService, SearchAttributeService, TemporalServices};
pub use types::{
    ArchivalState, CalendarModel, IntervalModel, NamespaceDataModel, NamespaceModel,
    NamespaceState, OverlapPolicy, ScheduleActionModel, ScheduleModel, SchedulePolicyModel,
    ScheduleSpecModel, ScheduleStateModel, SearchAttributeModel, WorkflowActionModel,
};

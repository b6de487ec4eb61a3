// Copyright (C) 2025 Temporal Provider contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Remote service capabilities.
//!
//! Resources talk to the server only through these traits, one per service
//! area, so tests can substitute in-memory fakes. Methods return the raw
//! gRPC [`Status`]; classification into [`crate::ProviderError`] happens in
//! the resource that knows which operation failed.

use std::collections::HashMap;

use async_trait::async_trait;
use temporal_protocol::proto::enums::IndexedValueType;
use temporal_protocol::proto::operatorservice::{
    AddSearchAttributesRequest, DeleteNamespaceRequest, ListSearchAttributesRequest,
    ListSearchAttributesResponse, RemoveSearchAttributesRequest,
};
use temporal_protocol::proto::workflowservice::{
    CreateScheduleRequest, DeleteScheduleRequest, DescribeNamespaceRequest,
    DescribeNamespaceResponse, DescribeScheduleRequest, DescribeScheduleResponse,
    RegisterNamespaceRequest, UpdateNamespaceRequest, UpdateNamespaceResponse,
    UpdateScheduleRequest,
};
use temporal_protocol::{
    AuthChannel, OperatorServiceClient, Response, Status, WorkflowServiceClient,
};

/// Identity reported to the server on schedule mutations.
pub const IDENTITY: &str = concat!("temporal-provider/", env!("CARGO_PKG_VERSION"));

/// Namespace registration and lifecycle.
#[async_trait]
pub trait NamespaceService: Send + Sync {
    async fn register_namespace(&self, request: RegisterNamespaceRequest) -> Result<(), Status>;

    async fn describe_namespace(&self, name: &str) -> Result<DescribeNamespaceResponse, Status>;

    async fn update_namespace(
        &self,
        request: UpdateNamespaceRequest,
    ) -> Result<UpdateNamespaceResponse, Status>;

    async fn delete_namespace(&self, name: &str) -> Result<(), Status>;
}

/// Schedule CRUD.
#[async_trait]
pub trait ScheduleService: Send + Sync {
    async fn create_schedule(&self, request: CreateScheduleRequest) -> Result<(), Status>;

    async fn describe_schedule(
        &self,
        namespace: &str,
        schedule_id: &str,
    ) -> Result<DescribeScheduleResponse, Status>;

    async fn update_schedule(&self, request: UpdateScheduleRequest) -> Result<(), Status>;

    async fn delete_schedule(&self, namespace: &str, schedule_id: &str) -> Result<(), Status>;
}

/// Search attribute registration.
#[async_trait]
pub trait SearchAttributeService: Send + Sync {
    async fn add_search_attributes(
        &self,
        namespace: &str,
        attributes: HashMap<String, IndexedValueType>,
    ) -> Result<(), Status>;

    async fn remove_search_attributes(
        &self,
        namespace: &str,
        names: Vec<String>,
    ) -> Result<(), Status>;

    async fn list_search_attributes(
        &self,
        namespace: &str,
    ) -> Result<ListSearchAttributesResponse, Status>;
}

/// gRPC-backed implementation of every capability.
///
/// Generated clients take `&mut self`; they are cheap clones of the shared
/// channel, so each call works on its own copy.
#[derive(Debug, Clone)]
pub struct TemporalServices {
    workflow: WorkflowServiceClient,
    operator: OperatorServiceClient,
}

impl TemporalServices {
    pub fn new(channel: AuthChannel) -> Self {
        Self {
            workflow: WorkflowServiceClient::new(channel.clone()),
            operator: OperatorServiceClient::new(channel),
        }
    }
}

#[async_trait]
impl NamespaceService for TemporalServices {
    async fn register_namespace(&self, request: RegisterNamespaceRequest) -> Result<(), Status> {
        self.workflow.clone().register_namespace(request).await.map(|_| ())
    }

    async fn describe_namespace(&self, name: &str) -> Result<DescribeNamespaceResponse, Status> {
        self.workflow
            .clone()
            .describe_namespace(DescribeNamespaceRequest {
                namespace: name.to_string(),
                ..Default::default()
            })
            .await
            .map(Response::into_inner)
    }

    async fn update_namespace(
        &self,
        request: UpdateNamespaceRequest,
    ) -> Result<UpdateNamespaceResponse, Status> {
        self.workflow
            .clone()
            .update_namespace(request)
            .await
            .map(Response::into_inner)
    }

    async fn delete_namespace(&self, name: &str) -> Result<(), Status> {
        self.operator
            .clone()
            .delete_namespace(DeleteNamespaceRequest {
                namespace: name.to_string(),
                ..Default::default()
            })
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl ScheduleService for TemporalServices {
    async fn create_schedule(&self, request: CreateScheduleRequest) -> Result<(), Status> {
        self.workflow.clone().create_schedule(request).await.map(|_| ())
    }

    async fn describe_schedule(
        &self,
        namespace: &str,
        schedule_id: &str,
    ) -> Result<DescribeScheduleResponse, Status> {
        self.workflow
            .clone()
            .describe_schedule(DescribeScheduleRequest {
                namespace: namespace.to_string(),
                schedule_id: schedule_id.to_string(),
            })
            .await
            .map(Response::into_inner)
    }

    async fn update_schedule(&self, request: UpdateScheduleRequest) -> Result<(), Status> {
        self.workflow.clone().update_schedule(request).await.map(|_| ())
    }

    async fn delete_schedule(&self, namespace: &str, schedule_id: &str) -> Result<(), Status> {
        self.workflow
            .clone()
            .delete_schedule(DeleteScheduleRequest {
                namespace: namespace.to_string(),
                schedule_id: schedule_id.to_string(),
                identity: IDENTITY.to_string(),
            })
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl SearchAttributeService for TemporalServices {
    async fn add_search_attributes(
        &self,
        namespace: &str,
        attributes: HashMap<String, IndexedValueType>,
    ) -> Result<(), Status> {
        self.operator
            .clone()
            .add_search_attributes(AddSearchAttributesRequest {
                search_attributes: attributes
                    .into_iter()
                    .map(|(name, value_type)| (name, value_type as i32))
                    .collect(),
                namespace: namespace.to_string(),
            })
            .await
            .map(|_| ())
    }

    async fn remove_search_attributes(
        &self,
        namespace: &str,
        names: Vec<String>,
    ) -> Result<(), Status> {
        self.operator
            .clone()
            .remove_search_attributes(RemoveSearchAttributesRequest {
                search_attributes: names,
                namespace: namespace.to_string(),
            })
            .await
            .map(|_| ())
    }

    async fn list_search_attributes(
        &self,
        namespace: &str,
    ) -> Result<ListSearchAttributesResponse, Status> {
        self.operator
            .clone()
            .list_search_attributes(ListSearchAttributesRequest {
                namespace: namespace.to_string(),
            })
            .await
            .map(Response::into_inner)
    }
}

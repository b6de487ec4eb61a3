// Copyright (C) 2025 Temporal Provider contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! In-memory Temporal frontend for resource tests.
//!
//! Implements every capability trait over plain maps and records the name
//! of each call, so tests can assert that validation failures never reach
//! the server.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use temporal_protocol::Status;
use temporal_protocol::proto::enums::IndexedValueType;
use temporal_protocol::proto::namespace::{NamespaceConfig, NamespaceInfo};
use temporal_protocol::proto::replication::NamespaceReplicationConfig;
use temporal_protocol::proto::operatorservice::ListSearchAttributesResponse;
use temporal_protocol::proto::workflowservice::{
    CreateScheduleRequest, DescribeNamespaceResponse, DescribeScheduleResponse,
    RegisterNamespaceRequest, UpdateNamespaceRequest, UpdateNamespaceResponse,
    UpdateScheduleRequest,
};
use temporal_provider::{NamespaceService, Provider, ScheduleService, SearchAttributeService};

#[derive(Default)]
struct State {
    calls: Vec<String>,
    namespaces: HashMap<String, DescribeNamespaceResponse>,
    schedules: HashMap<(String, String), DescribeScheduleResponse>,
    created_schedules: Vec<CreateScheduleRequest>,
    updated_schedules: Vec<UpdateScheduleRequest>,
    updated_namespaces: Vec<UpdateNamespaceRequest>,
    custom_attributes: HashMap<String, i32>,
    system_attributes: HashMap<String, i32>,
    /// Added attributes not yet visible, with the number of list calls
    /// that still miss them.
    pending_attributes: HashMap<String, (i32, usize)>,
    visibility_delay: usize,
    list_error_after_add: Option<Status>,
    add_error: Option<Status>,
}

/// Fake frontend shared between test and provider.
#[derive(Clone, Default)]
pub struct FakeTemporal {
    state: Arc<Mutex<State>>,
}

impl FakeTemporal {
    pub fn new() -> Self {
        let fake = Self::default();
        fake.with_state(|s| {
            s.system_attributes
                .insert("WorkflowId".to_string(), IndexedValueType::Keyword as i32);
            s.system_attributes
                .insert("StartTime".to_string(), IndexedValueType::Datetime as i32);
        });
        fake
    }

    pub fn provider(&self) -> Provider {
        Provider::from_services(Arc::new(self.clone()))
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut State) -> T) -> T {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    fn record(&self, call: &str) {
        self.with_state(|s| s.calls.push(call.to_string()));
    }

    pub fn calls(&self) -> Vec<String> {
        self.with_state(|s| s.calls.clone())
    }

    pub fn call_count(&self, call: &str) -> usize {
        self.with_state(|s| s.calls.iter().filter(|c| *c == call).count())
    }

    /// Number of list calls after an add that still miss the new attribute.
    pub fn set_visibility_delay(&self, lists: usize) {
        self.with_state(|s| s.visibility_delay = lists);
    }

    pub fn fail_lists_after_add(&self, status: Status) {
        self.with_state(|s| s.list_error_after_add = Some(status));
    }

    pub fn fail_add(&self, status: Status) {
        self.with_state(|s| s.add_error = Some(status));
    }

    pub fn insert_custom_attribute(&self, name: &str, value_type: IndexedValueType) {
        self.with_state(|s| {
            s.custom_attributes
                .insert(name.to_string(), value_type as i32)
        });
    }

    pub fn insert_namespace(&self, response: DescribeNamespaceResponse) {
        let name = response
            .namespace_info
            .as_ref()
            .map(|i| i.name.clone())
            .unwrap_or_default();
        self.with_state(|s| s.namespaces.insert(name, response));
    }

    pub fn insert_schedule(&self, namespace: &str, id: &str, response: DescribeScheduleResponse) {
        self.with_state(|s| {
            s.schedules
                .insert((namespace.to_string(), id.to_string()), response)
        });
    }

    pub fn created_schedules(&self) -> Vec<CreateScheduleRequest> {
        self.with_state(|s| s.created_schedules.clone())
    }

    pub fn updated_schedules(&self) -> Vec<UpdateScheduleRequest> {
        self.with_state(|s| s.updated_schedules.clone())
    }

    pub fn updated_namespaces(&self) -> Vec<UpdateNamespaceRequest> {
        self.with_state(|s| s.updated_namespaces.clone())
    }
}

fn describe_from_register(request: &RegisterNamespaceRequest) -> DescribeNamespaceResponse {
    DescribeNamespaceResponse {
        namespace_info: Some(NamespaceInfo {
            name: request.namespace.clone(),
            state: 1,
            description: request.description.clone(),
            owner_email: request.owner_email.clone(),
            id: format!("{}-id", request.namespace),
            ..Default::default()
        }),
        config: Some(NamespaceConfig {
            workflow_execution_retention_ttl: request.workflow_execution_retention_period.clone(),
            history_archival_state: request.history_archival_state,
            history_archival_uri: request.history_archival_uri.clone(),
            visibility_archival_state: request.visibility_archival_state,
            visibility_archival_uri: request.visibility_archival_uri.clone(),
            ..Default::default()
        }),
        replication_config: Some(NamespaceReplicationConfig {
            active_cluster_name: if request.active_cluster_name.is_empty() {
                "active".to_string()
            } else {
                request.active_cluster_name.clone()
            },
            clusters: request.clusters.clone(),
            ..Default::default()
        }),
        is_global_namespace: request.is_global_namespace,
        ..Default::default()
    }
}

#[async_trait]
impl NamespaceService for FakeTemporal {
    async fn register_namespace(&self, request: RegisterNamespaceRequest) -> Result<(), Status> {
        self.record("register_namespace");
        self.with_state(|s| {
            if s.namespaces.contains_key(&request.namespace) {
                return Err(Status::already_exists("Namespace already exists."));
            }
            s.namespaces
                .insert(request.namespace.clone(), describe_from_register(&request));
            Ok(())
        })
    }

    async fn describe_namespace(&self, name: &str) -> Result<DescribeNamespaceResponse, Status> {
        self.record("describe_namespace");
        self.with_state(|s| {
            s.namespaces
                .get(name)
                .cloned()
                .ok_or_else(|| Status::not_found(format!("Namespace {} is not found.", name)))
        })
    }

    async fn update_namespace(
        &self,
        request: UpdateNamespaceRequest,
    ) -> Result<UpdateNamespaceResponse, Status> {
        self.record("update_namespace");
        self.with_state(|s| {
            s.updated_namespaces.push(request.clone());
            let current = s
                .namespaces
                .get_mut(&request.namespace)
                .ok_or_else(|| Status::not_found("namespace not found"))?;
            if let (Some(info), Some(update)) = (current.namespace_info.as_mut(), &request.update_info) {
                info.description = update.description.clone();
                info.owner_email = update.owner_email.clone();
            }
            if let (Some(config), Some(update)) = (current.config.as_mut(), &request.config) {
                config.workflow_execution_retention_ttl = update.workflow_execution_retention_ttl.clone();
            }
            if let (Some(replication), Some(update)) =
                (current.replication_config.as_mut(), &request.replication_config)
            {
                if !update.active_cluster_name.is_empty() {
                    replication.active_cluster_name = update.active_cluster_name.clone();
                }
                if !update.clusters.is_empty() {
                    replication.clusters = update.clusters.clone();
                }
            }
            Ok(UpdateNamespaceResponse::default())
        })
    }

    async fn delete_namespace(&self, name: &str) -> Result<(), Status> {
        self.record("delete_namespace");
        self.with_state(|s| match s.namespaces.remove(name) {
            Some(_) => Ok(()),
            None => Err(Status::not_found(format!("Namespace {} is not found.", name))),
        })
    }
}

#[async_trait]
impl ScheduleService for FakeTemporal {
    async fn create_schedule(&self, request: CreateScheduleRequest) -> Result<(), Status> {
        self.record("create_schedule");
        self.with_state(|s| {
            let key = (request.namespace.clone(), request.schedule_id.clone());
            if s.schedules.contains_key(&key) {
                return Err(Status::already_exists("schedule is already registered"));
            }
            s.schedules.insert(
                key,
                DescribeScheduleResponse {
                    schedule: request.schedule.clone(),
                    memo: request.memo.clone(),
                    conflict_token: vec![1],
                },
            );
            s.created_schedules.push(request);
            Ok(())
        })
    }

    async fn describe_schedule(
        &self,
        namespace: &str,
        schedule_id: &str,
    ) -> Result<DescribeScheduleResponse, Status> {
        self.record("describe_schedule");
        self.with_state(|s| {
            s.schedules
                .get(&(namespace.to_string(), schedule_id.to_string()))
                .cloned()
                .ok_or_else(|| Status::not_found("schedule not found"))
        })
    }

    async fn update_schedule(&self, request: UpdateScheduleRequest) -> Result<(), Status> {
        self.record("update_schedule");
        self.with_state(|s| {
            let key = (request.namespace.clone(), request.schedule_id.clone());
            let current = s
                .schedules
                .get_mut(&key)
                .ok_or_else(|| Status::not_found("schedule not found"))?;
            current.schedule = request.schedule.clone();
            s.updated_schedules.push(request);
            Ok(())
        })
    }

    async fn delete_schedule(&self, namespace: &str, schedule_id: &str) -> Result<(), Status> {
        self.record("delete_schedule");
        self.with_state(|s| {
            match s
                .schedules
                .remove(&(namespace.to_string(), schedule_id.to_string()))
            {
                Some(_) => Ok(()),
                None => Err(Status::not_found("schedule not found")),
            }
        })
    }
}

#[async_trait]
impl SearchAttributeService for FakeTemporal {
    async fn add_search_attributes(
        &self,
        _namespace: &str,
        attributes: HashMap<String, IndexedValueType>,
    ) -> Result<(), Status> {
        self.record("add_search_attributes");
        self.with_state(|s| {
            if let Some(status) = s.add_error.take() {
                return Err(status);
            }
            for (name, value_type) in attributes {
                if s.visibility_delay == 0 {
                    s.custom_attributes.insert(name, value_type as i32);
                } else {
                    s.pending_attributes
                        .insert(name, (value_type as i32, s.visibility_delay));
                }
            }
            Ok(())
        })
    }

    async fn remove_search_attributes(
        &self,
        _namespace: &str,
        names: Vec<String>,
    ) -> Result<(), Status> {
        self.record("remove_search_attributes");
        self.with_state(|s| {
            for name in names {
                if s.custom_attributes.remove(&name).is_none() {
                    return Err(Status::not_found(format!(
                        "Search attribute {} doesn't exist.",
                        name
                    )));
                }
            }
            Ok(())
        })
    }

    async fn list_search_attributes(
        &self,
        _namespace: &str,
    ) -> Result<ListSearchAttributesResponse, Status> {
        self.record("list_search_attributes");
        self.with_state(|s| {
            let added = s.calls.iter().any(|c| c == "add_search_attributes");
            if added {
                if let Some(status) = s.list_error_after_add.clone() {
                    return Err(status);
                }
            }

            let mut visible = Vec::new();
            for (name, (value_type, remaining)) in s.pending_attributes.iter_mut() {
                if *remaining == 0 {
                    visible.push((name.clone(), *value_type));
                } else {
                    *remaining -= 1;
                }
            }
            for (name, value_type) in visible {
                s.pending_attributes.remove(&name);
                s.custom_attributes.insert(name, value_type);
            }

            Ok(ListSearchAttributesResponse {
                custom_attributes: s.custom_attributes.clone(),
                system_attributes: s.system_attributes.clone(),
                storage_schema: HashMap::new(),
            })
        })
    }
}

// Copyright (C) 2025 Temporal Provider contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Namespace model <-> wire mapping.

use chrono::{DateTime, SecondsFormat, Utc};
use temporal_protocol::proto::namespace::{NamespaceConfig, UpdateNamespaceInfo};
use temporal_protocol::proto::replication::{
    ClusterReplicationConfig, FailoverStatus, NamespaceReplicationConfig,
};
use temporal_protocol::proto::workflowservice::{
    DescribeNamespaceResponse, RegisterNamespaceRequest, UpdateNamespaceRequest,
};

use crate::diagnostics::Diagnostics;
use crate::error::{ProviderError, Result};
use crate::types::{ArchivalState, NamespaceDataModel, NamespaceModel, NamespaceState};

const SECONDS_PER_DAY: i64 = 86_400;

/// Retention in days to the wire duration.
pub fn retention_duration(days: i64) -> prost_types::Duration {
    prost_types::Duration {
        seconds: days * SECONDS_PER_DAY,
        nanos: 0,
    }
}

/// Wire retention back to days: whole hours divided by 24, truncating.
pub fn retention_days(ttl: Option<&prost_types::Duration>) -> i64 {
    match ttl {
        Some(d) => (d.seconds / 3_600) / 24,
        None => 0,
    }
}

fn parse_archival_state(
    attribute: &str,
    value: Option<&str>,
    diags: &mut Diagnostics,
) -> ArchivalState {
    match value {
        None | Some("") => ArchivalState::Unspecified,
        Some(s) => match s.parse() {
            Ok(state) => state,
            Err(message) => {
                diags.add_attribute_error(attribute, "Invalid Archival State", message);
                ArchivalState::Unspecified
            }
        },
    }
}

fn cluster_configs(clusters: &[String]) -> Vec<ClusterReplicationConfig> {
    clusters
        .iter()
        .map(|name| ClusterReplicationConfig {
            cluster_name: name.clone(),
        })
        .collect()
}

/// Build the registration request for a new namespace.
pub fn register_request(model: &NamespaceModel) -> Result<RegisterNamespaceRequest> {
    let mut diags = Diagnostics::new();

    let history = parse_archival_state(
        "history_archival_state",
        model.history_archival_state.as_deref(),
        &mut diags,
    );
    let visibility = parse_archival_state(
        "visibility_archival_state",
        model.visibility_archival_state.as_deref(),
        &mut diags,
    );

    let active = model.active_cluster_name.clone().unwrap_or_default();
    let clusters = model.clusters.clone().unwrap_or_default();
    if !active.is_empty() && !clusters.is_empty() && !clusters.contains(&active) {
        diags.add_attribute_error(
            "active_cluster_name",
            "Invalid Active Cluster",
            format!(
                "active cluster {:?} is not one of the replica clusters {:?}",
                active, clusters
            ),
        );
    }

    let request = RegisterNamespaceRequest {
        namespace: model.name.clone(),
        description: model.description.clone(),
        owner_email: model.owner_email.clone(),
        workflow_execution_retention_period: Some(retention_duration(model.retention)),
        clusters: cluster_configs(&clusters),
        active_cluster_name: active,
        is_global_namespace: model.is_global_namespace,
        history_archival_state: history as i32,
        history_archival_uri: model.history_archival_uri.clone().unwrap_or_default(),
        visibility_archival_state: visibility as i32,
        visibility_archival_uri: model.visibility_archival_uri.clone().unwrap_or_default(),
        ..Default::default()
    };

    diags.into_result(request)
}

/// Replication fields an update is allowed to send.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterChange {
    pub active_cluster_name: Option<String>,
    pub clusters: Option<Vec<String>>,
}

impl ClusterChange {
    pub fn is_empty(&self) -> bool {
        self.active_cluster_name.is_none() && self.clusters.is_none()
    }
}

/// Work out which replication fields change between `prior` and `planned`.
///
/// The server rejects an update that moves the active cluster and edits the
/// replica list at once. A new replica list must still contain the current
/// active cluster, and a new active cluster must already be a replica.
pub fn validate_cluster_change(
    prior: &NamespaceModel,
    planned: &NamespaceModel,
) -> Result<ClusterChange> {
    let prior_active = prior.active_cluster_name.as_deref().unwrap_or("");
    let prior_clusters = prior.clusters.as_deref().unwrap_or(&[]);

    let new_active = planned
        .active_cluster_name
        .as_deref()
        .filter(|a| !a.is_empty() && *a != prior_active);
    let new_clusters = planned
        .clusters
        .as_deref()
        .filter(|c| *c != prior_clusters);

    match (new_active, new_clusters) {
        (Some(_), Some(_)) => Err(ProviderError::validation(
            "active_cluster_name",
            "active_cluster_name and clusters cannot be changed in the same update",
        )),
        (None, Some(clusters)) => {
            if !prior_active.is_empty() && !clusters.iter().any(|c| c == prior_active) {
                return Err(ProviderError::validation(
                    "clusters",
                    format!(
                        "active cluster {:?} must remain in the replica cluster list",
                        prior_active
                    ),
                ));
            }
            Ok(ClusterChange {
                active_cluster_name: None,
                clusters: Some(clusters.to_vec()),
            })
        }
        (Some(active), None) => {
            if !prior_clusters.is_empty() && !prior_clusters.iter().any(|c| c == active) {
                return Err(ProviderError::validation(
                    "active_cluster_name",
                    format!(
                        "cluster {:?} is not one of the current replica clusters {:?}",
                        active, prior_clusters
                    ),
                ));
            }
            Ok(ClusterChange {
                active_cluster_name: Some(active.to_string()),
                clusters: None,
            })
        }
        (None, None) => Ok(ClusterChange::default()),
    }
}

/// Build an update request moving `prior` to `planned`.
///
/// Empty strings and unspecified enums leave the server-side value alone, so
/// attributes the plan does not set are not cleared.
pub fn update_request(
    prior: &NamespaceModel,
    planned: &NamespaceModel,
) -> Result<UpdateNamespaceRequest> {
    let change = validate_cluster_change(prior, planned)?;

    let mut diags = Diagnostics::new();
    let history = parse_archival_state(
        "history_archival_state",
        planned.history_archival_state.as_deref(),
        &mut diags,
    );
    let visibility = parse_archival_state(
        "visibility_archival_state",
        planned.visibility_archival_state.as_deref(),
        &mut diags,
    );

    let replication_config = if change.is_empty() {
        None
    } else {
        Some(NamespaceReplicationConfig {
            active_cluster_name: change.active_cluster_name.unwrap_or_default(),
            clusters: cluster_configs(&change.clusters.unwrap_or_default()),
            ..Default::default()
        })
    };

    let request = UpdateNamespaceRequest {
        namespace: planned.name.clone(),
        update_info: Some(UpdateNamespaceInfo {
            description: planned.description.clone(),
            owner_email: planned.owner_email.clone(),
            ..Default::default()
        }),
        config: Some(NamespaceConfig {
            workflow_execution_retention_ttl: Some(retention_duration(planned.retention)),
            history_archival_state: history as i32,
            history_archival_uri: planned.history_archival_uri.clone().unwrap_or_default(),
            visibility_archival_state: visibility as i32,
            visibility_archival_uri: planned.visibility_archival_uri.clone().unwrap_or_default(),
            ..Default::default()
        }),
        replication_config,
        promote_namespace: planned.is_global_namespace,
        ..Default::default()
    };

    diags.into_result(request)
}

fn cluster_names(response: &DescribeNamespaceResponse) -> Vec<String> {
    response
        .replication_config
        .as_ref()
        .map(|r| r.clusters.iter().map(|c| c.cluster_name.clone()).collect())
        .unwrap_or_default()
}

fn active_cluster(response: &DescribeNamespaceResponse) -> String {
    response
        .replication_config
        .as_ref()
        .map(|r| r.active_cluster_name.clone())
        .unwrap_or_default()
}

/// Managed-resource state from a describe response.
pub fn model_from_describe(response: &DescribeNamespaceResponse) -> NamespaceModel {
    let info = response.namespace_info.clone().unwrap_or_default();
    let config = response.config.clone().unwrap_or_default();

    NamespaceModel {
        name: info.name,
        id: Some(info.id),
        description: info.description,
        owner_email: info.owner_email,
        retention: retention_days(config.workflow_execution_retention_ttl.as_ref()),
        active_cluster_name: Some(active_cluster(response)),
        clusters: Some(cluster_names(response)),
        history_archival_state: Some(
            ArchivalState::from(config.history_archival_state).to_string(),
        ),
        history_archival_uri: Some(config.history_archival_uri),
        visibility_archival_state: Some(
            ArchivalState::from(config.visibility_archival_state).to_string(),
        ),
        visibility_archival_uri: Some(config.visibility_archival_uri),
        is_global_namespace: response.is_global_namespace,
    }
}

fn format_failover(status: &FailoverStatus) -> String {
    let time = status
        .failover_time
        .as_ref()
        .and_then(|t| DateTime::<Utc>::from_timestamp(t.seconds, t.nanos.max(0) as u32));
    match time {
        Some(time) => format!(
            "{}@{}",
            status.failover_version,
            time.to_rfc3339_opts(SecondsFormat::AutoSi, true)
        ),
        None => status.failover_version.to_string(),
    }
}

/// Lookup result from a describe response.
pub fn data_model_from_describe(response: &DescribeNamespaceResponse) -> NamespaceDataModel {
    let info = response.namespace_info.clone().unwrap_or_default();
    let config = response.config.clone().unwrap_or_default();

    NamespaceDataModel {
        name: info.name,
        id: info.id,
        description: info.description,
        owner_email: info.owner_email,
        state: NamespaceState::from(info.state).to_string(),
        active_cluster_name: active_cluster(response),
        clusters: cluster_names(response),
        history_archival_state: ArchivalState::from(config.history_archival_state).to_string(),
        visibility_archival_state: ArchivalState::from(config.visibility_archival_state)
            .to_string(),
        is_global_namespace: response.is_global_namespace,
        failover_version: response.failover_version,
        failover_history: response.failover_history.iter().map(format_failover).collect(),
    }
}

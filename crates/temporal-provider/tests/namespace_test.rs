// Copyright (C) 2025 Temporal Provider contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Namespace resource and data source against the in-memory frontend.

mod common;

use temporal_protocol::proto::enums::ArchivalState;
use temporal_protocol::proto::namespace::{NamespaceConfig, NamespaceInfo};
use temporal_protocol::proto::replication::{
    ClusterReplicationConfig, FailoverStatus, NamespaceReplicationConfig,
};
use temporal_protocol::proto::workflowservice::DescribeNamespaceResponse;
use temporal_provider::{NamespaceModel, OperationContext, ProviderError};

use common::FakeTemporal;

fn replicated(name: &str, active: &str, clusters: &[&str]) -> DescribeNamespaceResponse {
    DescribeNamespaceResponse {
        namespace_info: Some(NamespaceInfo {
            name: name.to_string(),
            id: format!("{}-id", name),
            state: 1,
            ..Default::default()
        }),
        config: Some(NamespaceConfig {
            workflow_execution_retention_ttl: Some(prost_types::Duration {
                seconds: 3 * 86_400,
                nanos: 0,
            }),
            ..Default::default()
        }),
        replication_config: Some(NamespaceReplicationConfig {
            active_cluster_name: active.to_string(),
            clusters: clusters
                .iter()
                .map(|c| ClusterReplicationConfig {
                    cluster_name: c.to_string(),
                })
                .collect(),
            ..Default::default()
        }),
        is_global_namespace: true,
        ..Default::default()
    }
}

fn managed(name: &str, active: &str, clusters: &[&str]) -> NamespaceModel {
    NamespaceModel {
        active_cluster_name: Some(active.to_string()),
        clusters: Some(clusters.iter().map(|c| c.to_string()).collect()),
        is_global_namespace: true,
        ..NamespaceModel::new(name)
    }
}

#[tokio::test]
async fn test_create_registers_then_reads_back() {
    let fake = FakeTemporal::new();
    let resource = fake.provider().namespace_resource();

    let plan = NamespaceModel {
        description: "Order processing".to_string(),
        owner_email: "orders@example.com".to_string(),
        retention: 14,
        history_archival_state: Some("Enabled".to_string()),
        history_archival_uri: Some("s3://archive/orders".to_string()),
        ..NamespaceModel::new("orders")
    };
    let state = resource
        .create(&OperationContext::new(), &plan)
        .await
        .unwrap()
        .into_value();

    assert_eq!(fake.calls(), vec!["register_namespace", "describe_namespace"]);
    assert_eq!(state.id.as_deref(), Some("orders-id"));
    assert_eq!(state.retention, 14);
    assert_eq!(state.description, "Order processing");
    assert_eq!(state.history_archival_state.as_deref(), Some("Enabled"));
    assert_eq!(state.visibility_archival_state.as_deref(), Some("Unspecified"));
    assert!(state.clusters.is_none());
}

#[tokio::test]
async fn test_create_without_cluster_config_leaves_cluster_fields_unset() {
    let fake = FakeTemporal::new();
    let resource = fake.provider().namespace_resource();

    let state = resource
        .create(&OperationContext::new(), &NamespaceModel::new("orders"))
        .await
        .unwrap()
        .into_value();

    // The server reports its default cluster, but nothing in config asked for it.
    assert!(state.active_cluster_name.is_none());
    assert!(state.clusters.is_none());
}

#[tokio::test]
async fn test_read_keeps_unmanaged_active_cluster_unset() {
    let fake = FakeTemporal::new();
    fake.insert_namespace(replicated("orders", "east", &["east", "west"]));
    let resource = fake.provider().namespace_resource();

    let prior = NamespaceModel {
        id: Some("orders-id".to_string()),
        ..NamespaceModel::new("orders")
    };
    let state = resource
        .read(&OperationContext::new(), &prior)
        .await
        .unwrap()
        .into_value();

    assert!(state.active_cluster_name.is_none());
    assert!(state.clusters.is_none());
    assert_eq!(state.retention, 3);
}

#[tokio::test]
async fn test_create_existing_is_already_exists() {
    let fake = FakeTemporal::new();
    fake.insert_namespace(replicated("orders", "active", &["active"]));
    let resource = fake.provider().namespace_resource();

    let err = resource
        .create(&OperationContext::new(), &NamespaceModel::new("orders"))
        .await
        .unwrap_err();
    assert!(err.is_already_exists());
}

#[tokio::test]
async fn test_invalid_archival_state_makes_no_calls() {
    let fake = FakeTemporal::new();
    let resource = fake.provider().namespace_resource();

    let plan = NamespaceModel {
        visibility_archival_state: Some("Sometimes".to_string()),
        ..NamespaceModel::new("orders")
    };
    let err = resource
        .create(&OperationContext::new(), &plan)
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Diagnostics(_)));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_update_changing_active_and_clusters_makes_no_calls() {
    let fake = FakeTemporal::new();
    fake.insert_namespace(replicated("orders", "east", &["east", "west"]));
    let resource = fake.provider().namespace_resource();

    let prior = managed("orders", "east", &["east", "west"]);
    let planned = managed("orders", "west", &["west", "central"]);
    let err = resource
        .update(&OperationContext::new(), &prior, &planned)
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Validation { .. }));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_update_dropping_active_cluster_makes_no_calls() {
    let fake = FakeTemporal::new();
    let resource = fake.provider().namespace_resource();

    let prior = managed("orders", "east", &["east", "west"]);
    let planned = managed("orders", "east", &["west"]);
    assert!(
        resource
            .update(&OperationContext::new(), &prior, &planned)
            .await
            .is_err()
    );
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_update_failover_sends_active_cluster_only() {
    let fake = FakeTemporal::new();
    fake.insert_namespace(replicated("orders", "east", &["east", "west"]));
    let resource = fake.provider().namespace_resource();

    let prior = managed("orders", "east", &["east", "west"]);
    let planned = managed("orders", "west", &["east", "west"]);
    let state = resource
        .update(&OperationContext::new(), &prior, &planned)
        .await
        .unwrap()
        .into_value();

    let sent = fake.updated_namespaces();
    let replication = sent[0].replication_config.as_ref().unwrap();
    assert_eq!(replication.active_cluster_name, "west");
    assert!(replication.clusters.is_empty());
    assert!(sent[0].promote_namespace);
    assert_eq!(state.active_cluster_name.as_deref(), Some("west"));
}

#[tokio::test]
async fn test_update_failover_to_unknown_cluster_with_unmanaged_clusters_is_rejected() {
    let fake = FakeTemporal::new();
    fake.insert_namespace(replicated("orders", "east", &["east", "west"]));
    let resource = fake.provider().namespace_resource();

    let prior = NamespaceModel {
        active_cluster_name: Some("east".to_string()),
        is_global_namespace: true,
        ..NamespaceModel::new("orders")
    };
    let planned = NamespaceModel {
        active_cluster_name: Some("nowhere".to_string()),
        ..prior.clone()
    };
    let err = resource
        .update(&OperationContext::new(), &prior, &planned)
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Validation { .. }));
    assert_eq!(fake.calls(), vec!["describe_namespace"]);
    assert!(fake.updated_namespaces().is_empty());
}

#[tokio::test]
async fn test_update_failover_with_unmanaged_clusters_uses_server_replicas() {
    let fake = FakeTemporal::new();
    fake.insert_namespace(replicated("orders", "east", &["east", "west"]));
    let resource = fake.provider().namespace_resource();

    let prior = NamespaceModel {
        active_cluster_name: Some("east".to_string()),
        is_global_namespace: true,
        ..NamespaceModel::new("orders")
    };
    let planned = NamespaceModel {
        active_cluster_name: Some("west".to_string()),
        ..prior.clone()
    };
    let state = resource
        .update(&OperationContext::new(), &prior, &planned)
        .await
        .unwrap()
        .into_value();

    assert_eq!(
        fake.calls(),
        vec!["describe_namespace", "update_namespace", "describe_namespace"]
    );
    let sent = fake.updated_namespaces();
    let replication = sent[0].replication_config.as_ref().unwrap();
    assert_eq!(replication.active_cluster_name, "west");
    assert!(replication.clusters.is_empty());
    assert_eq!(state.active_cluster_name.as_deref(), Some("west"));
    assert!(state.clusters.is_none());
}

#[tokio::test]
async fn test_update_description_keeps_replication_untouched() {
    let fake = FakeTemporal::new();
    fake.insert_namespace(replicated("orders", "east", &["east"]));
    let resource = fake.provider().namespace_resource();

    let prior = managed("orders", "east", &["east"]);
    let planned = NamespaceModel {
        description: "updated".to_string(),
        ..prior.clone()
    };
    let state = resource
        .update(&OperationContext::new(), &prior, &planned)
        .await
        .unwrap()
        .into_value();

    assert!(fake.updated_namespaces()[0].replication_config.is_none());
    assert_eq!(state.description, "updated");
    assert_eq!(fake.calls(), vec!["update_namespace", "describe_namespace"]);
}

#[tokio::test]
async fn test_read_missing_keeps_state_with_warning() {
    let fake = FakeTemporal::new();
    let resource = fake.provider().namespace_resource();
    let prior = NamespaceModel {
        id: Some("old-id".to_string()),
        ..NamespaceModel::new("vanished")
    };

    let outcome = resource
        .read(&OperationContext::new(), &prior)
        .await
        .unwrap();
    assert_eq!(outcome.value, prior);
    assert_eq!(outcome.diagnostics.warnings().count(), 1);
}

#[tokio::test]
async fn test_delete_missing_is_not_found() {
    let fake = FakeTemporal::new();
    let resource = fake.provider().namespace_resource();

    let err = resource
        .delete(&OperationContext::new(), &NamespaceModel::new("vanished"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_import_by_name() {
    let fake = FakeTemporal::new();
    fake.insert_namespace(replicated("orders", "east", &["east", "west"]));
    let resource = fake.provider().namespace_resource();

    let state = resource
        .import(&OperationContext::new(), "orders")
        .await
        .unwrap()
        .into_value();
    assert_eq!(state.name, "orders");
    assert_eq!(
        state.clusters,
        Some(vec!["east".to_string(), "west".to_string()])
    );
    assert_eq!(state.retention, 3);
}

#[tokio::test]
async fn test_data_source_lookup() {
    let fake = FakeTemporal::new();
    let mut response = replicated("orders", "east", &["east", "west"]);
    response.failover_version = 4;
    response.failover_history = vec![FailoverStatus {
        failover_time: Some(prost_types::Timestamp {
            seconds: 0,
            nanos: 0,
        }),
        failover_version: 2,
    }];
    if let Some(config) = response.config.as_mut() {
        config.history_archival_state = ArchivalState::Disabled as i32;
    }
    fake.insert_namespace(response);

    let data = fake
        .provider()
        .namespace_data_source()
        .read(&OperationContext::new(), "orders")
        .await
        .unwrap();

    assert_eq!(data.id, "orders-id");
    assert_eq!(data.state, "Registered");
    assert_eq!(data.history_archival_state, "Disabled");
    assert_eq!(data.failover_version, 4);
    assert_eq!(data.failover_history, vec!["2@1970-01-01T00:00:00Z"]);
}

// Copyright (C) 2025 Temporal Provider contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Temporal Protocol - gRPC + Protobuf communication layer
//!
//! This crate provides the wire protocol used by the provider to talk to a
//! Temporal frontend:
//! - Namespace and schedule RPCs (`WorkflowService`)
//! - Namespace deletion and search-attribute RPCs (`OperatorService`)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    temporal-protocol                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Service clients: WorkflowService / OperatorService         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Serialization: Protobuf (prost)                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Transport: HTTP/2 gRPC (tonic), TLS, bearer token          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use temporal_protocol::{TransportConfig, WorkflowServiceClient, connect};
//! use temporal_protocol::proto::workflowservice::DescribeNamespaceRequest;
//!
//! let channel = connect(&TransportConfig { insecure: true, ..Default::default() })?;
//! let mut client = WorkflowServiceClient::new(channel);
//!
//! let response = client
//!     .describe_namespace(DescribeNamespaceRequest {
//!         namespace: "default".to_string(),
//!         ..Default::default()
//!     })
//!     .await?
//!     .into_inner();
//! ```

pub mod auth;
pub mod client;
pub mod proto;

pub use auth::{AccessToken, ClientCredentials, fetch_token};
pub use client::{AuthChannel, BearerAuth, ClientError, TlsMaterial, TransportConfig, connect};

/// Generated `WorkflowService` client over the authenticated channel.
pub type WorkflowServiceClient =
    proto::workflowservice::workflow_service_client::WorkflowServiceClient<AuthChannel>;

/// Generated `OperatorService` client over the authenticated channel.
pub type OperatorServiceClient =
    proto::operatorservice::operator_service_client::OperatorServiceClient<AuthChannel>;

pub use tonic::{Code, Response, Status};

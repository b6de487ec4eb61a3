// Copyright (C) 2025 Temporal Provider contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Managed resources.
//!
//! Each resource owns a capability handle and exposes create, read, update,
//! delete and import. Every operation takes an [`OperationContext`] for
//! cancellation.
//!
//! [`OperationContext`]: crate::context::OperationContext

pub mod namespace;
pub mod schedule;
pub mod search_attribute;

pub use namespace::NamespaceResource;
pub use schedule::ScheduleResource;
pub use search_attribute::{await_search_attribute, SearchAttributeResource, POLL_INTERVAL};

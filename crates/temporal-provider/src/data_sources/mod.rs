// Copyright (C) 2025 Temporal Provider contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Read-only lookups.

pub mod namespace;
pub mod search_attribute;

pub use namespace::NamespaceDataSource;
pub use search_attribute::SearchAttributeDataSource;

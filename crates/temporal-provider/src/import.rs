// Copyright (C) 2025 Temporal Provider contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Import identifiers.

use crate::error::{ProviderError, Result};

/// Namespace used when an import id carries no namespace part.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Split `namespace:id` or a bare `id` into `(namespace, id)`.
///
/// `kind` names the object in the error message, e.g. `schedule_id`.
pub fn parse_import_id(id: &str, kind: &str) -> Result<(String, String)> {
    let parts: Vec<&str> = id.split(':').collect();
    let invalid = || ProviderError::InvalidImportId {
        id: id.to_string(),
        expected: format!("namespace:{kind} or {kind}"),
    };

    match parts.as_slice() {
        [name] if !name.is_empty() => Ok((DEFAULT_NAMESPACE.to_string(), name.to_string())),
        [namespace, name] if !namespace.is_empty() && !name.is_empty() => {
            Ok((namespace.to_string(), name.to_string()))
        }
        _ => Err(invalid()),
    }
}

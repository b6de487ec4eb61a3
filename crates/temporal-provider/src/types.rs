// Copyright (C) 2025 Temporal Provider contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configuration models and the enumerations they refer to.
//!
//! Models are what a user writes and what is persisted as state. Fields the
//! server computes are `Option` so a plan can leave them unknown; fields with
//! a schema default carry it through `serde(default)` and `Default`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use temporal_protocol::proto::enums;

use crate::error::ProviderError;

// ============================================================================
// Enumerations
// ============================================================================

/// Archival state for history or visibility records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchivalState {
    Unspecified,
    Disabled,
    Enabled,
}

impl ArchivalState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArchivalState::Unspecified => "Unspecified",
            ArchivalState::Disabled => "Disabled",
            ArchivalState::Enabled => "Enabled",
        }
    }
}

impl FromStr for ArchivalState {
    type Err = String;

    /// Accepts `Enabled`, `enabled` or `ARCHIVAL_STATE_ENABLED`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.strip_prefix("ARCHIVAL_STATE_").unwrap_or(s);
        match name.to_ascii_lowercase().as_str() {
            "unspecified" => Ok(ArchivalState::Unspecified),
            "disabled" => Ok(ArchivalState::Disabled),
            "enabled" => Ok(ArchivalState::Enabled),
            _ => Err(format!(
                "unknown archival state {:?}; expected one of Unspecified, Disabled, Enabled",
                s
            )),
        }
    }
}

impl From<i32> for ArchivalState {
    fn from(value: i32) -> Self {
        match enums::ArchivalState::try_from(value) {
            Ok(state) => state.into(),
            Err(_) => ArchivalState::Unspecified,
        }
    }
}

impl From<enums::ArchivalState> for ArchivalState {
    fn from(value: enums::ArchivalState) -> Self {
        match value {
            enums::ArchivalState::Unspecified => ArchivalState::Unspecified,
            enums::ArchivalState::Disabled => ArchivalState::Disabled,
            enums::ArchivalState::Enabled => ArchivalState::Enabled,
        }
    }
}

impl From<ArchivalState> for enums::ArchivalState {
    fn from(value: ArchivalState) -> Self {
        match value {
            ArchivalState::Unspecified => enums::ArchivalState::Unspecified,
            ArchivalState::Disabled => enums::ArchivalState::Disabled,
            ArchivalState::Enabled => enums::ArchivalState::Enabled,
        }
    }
}

impl fmt::Display for ArchivalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Namespace lifecycle state as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamespaceState {
    Unspecified,
    Registered,
    Deprecated,
    Deleted,
}

impl NamespaceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            NamespaceState::Unspecified => "Unspecified",
            NamespaceState::Registered => "Registered",
            NamespaceState::Deprecated => "Deprecated",
            NamespaceState::Deleted => "Deleted",
        }
    }
}

impl From<i32> for NamespaceState {
    fn from(value: i32) -> Self {
        match enums::NamespaceState::try_from(value) {
            Ok(enums::NamespaceState::Registered) => NamespaceState::Registered,
            Ok(enums::NamespaceState::Deprecated) => NamespaceState::Deprecated,
            Ok(enums::NamespaceState::Deleted) => NamespaceState::Deleted,
            Ok(enums::NamespaceState::Unspecified) | Err(_) => NamespaceState::Unspecified,
        }
    }
}

impl fmt::Display for NamespaceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the server resolves a schedule firing while the previous run is
/// still open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlapPolicy {
    Unspecified,
    Skip,
    BufferOne,
    BufferAll,
    CancelOther,
    TerminateOther,
    AllowAll,
}

impl OverlapPolicy {
    /// Values a configuration may name.
    pub const ACCEPTED: [OverlapPolicy; 6] = [
        OverlapPolicy::Skip,
        OverlapPolicy::BufferOne,
        OverlapPolicy::BufferAll,
        OverlapPolicy::CancelOther,
        OverlapPolicy::TerminateOther,
        OverlapPolicy::AllowAll,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OverlapPolicy::Unspecified => "Unspecified",
            OverlapPolicy::Skip => "Skip",
            OverlapPolicy::BufferOne => "BufferOne",
            OverlapPolicy::BufferAll => "BufferAll",
            OverlapPolicy::CancelOther => "CancelOther",
            OverlapPolicy::TerminateOther => "TerminateOther",
            OverlapPolicy::AllowAll => "AllowAll",
        }
    }
}

impl FromStr for OverlapPolicy {
    type Err = ProviderError;

    /// Exact, case-sensitive match against [`OverlapPolicy::ACCEPTED`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OverlapPolicy::ACCEPTED
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<_> = OverlapPolicy::ACCEPTED.iter().map(|p| p.as_str()).collect();
                ProviderError::validation(
                    "overlap_policy",
                    format!(
                        "invalid overlap policy value {:?}; allowed values are {}",
                        s,
                        allowed.join(", ")
                    ),
                )
            })
    }
}

impl From<i32> for OverlapPolicy {
    fn from(value: i32) -> Self {
        match enums::ScheduleOverlapPolicy::try_from(value) {
            Ok(policy) => policy.into(),
            Err(_) => OverlapPolicy::Unspecified,
        }
    }
}

impl From<enums::ScheduleOverlapPolicy> for OverlapPolicy {
    fn from(value: enums::ScheduleOverlapPolicy) -> Self {
        use enums::ScheduleOverlapPolicy as Wire;
        match value {
            Wire::Unspecified => OverlapPolicy::Unspecified,
            Wire::Skip => OverlapPolicy::Skip,
            Wire::BufferOne => OverlapPolicy::BufferOne,
            Wire::BufferAll => OverlapPolicy::BufferAll,
            Wire::CancelOther => OverlapPolicy::CancelOther,
            Wire::TerminateOther => OverlapPolicy::TerminateOther,
            Wire::AllowAll => OverlapPolicy::AllowAll,
        }
    }
}

impl From<OverlapPolicy> for enums::ScheduleOverlapPolicy {
    fn from(value: OverlapPolicy) -> Self {
        use enums::ScheduleOverlapPolicy as Wire;
        match value {
            OverlapPolicy::Unspecified => Wire::Unspecified,
            OverlapPolicy::Skip => Wire::Skip,
            OverlapPolicy::BufferOne => Wire::BufferOne,
            OverlapPolicy::BufferAll => Wire::BufferAll,
            OverlapPolicy::CancelOther => Wire::CancelOther,
            OverlapPolicy::TerminateOther => Wire::TerminateOther,
            OverlapPolicy::AllowAll => Wire::AllowAll,
        }
    }
}

impl fmt::Display for OverlapPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Namespace
// ============================================================================

fn default_retention() -> i64 {
    3
}

/// Managed namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamespaceModel {
    pub name: String,
    /// Server-assigned identifier.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub owner_email: String,
    /// Workflow execution retention in days.
    #[serde(default = "default_retention")]
    pub retention: i64,
    #[serde(default)]
    pub active_cluster_name: Option<String>,
    /// Replica clusters.
    #[serde(default)]
    pub clusters: Option<Vec<String>>,
    #[serde(default)]
    pub history_archival_state: Option<String>,
    #[serde(default)]
    pub history_archival_uri: Option<String>,
    #[serde(default)]
    pub visibility_archival_state: Option<String>,
    #[serde(default)]
    pub visibility_archival_uri: Option<String>,
    #[serde(default)]
    pub is_global_namespace: bool,
}

impl NamespaceModel {
    /// Model with only the name set and schema defaults elsewhere.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            description: String::new(),
            owner_email: String::new(),
            retention: default_retention(),
            active_cluster_name: None,
            clusters: None,
            history_archival_state: None,
            history_archival_uri: None,
            visibility_archival_state: None,
            visibility_archival_uri: None,
            is_global_namespace: false,
        }
    }
}

/// Read-only namespace lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamespaceDataModel {
    pub name: String,
    pub id: String,
    pub description: String,
    pub owner_email: String,
    pub state: String,
    pub active_cluster_name: String,
    pub clusters: Vec<String>,
    pub history_archival_state: String,
    pub visibility_archival_state: String,
    pub is_global_namespace: bool,
    pub failover_version: i64,
    /// `<failover version>@<RFC3339 time>` per failover.
    pub failover_history: Vec<String>,
}

// ============================================================================
// Schedule
// ============================================================================

fn default_time_zone() -> String {
    "UTC".to_string()
}

fn default_wildcard() -> String {
    "*".to_string()
}

fn default_day_of_week() -> String {
    "0-6".to_string()
}

fn default_zero() -> String {
    "0".to_string()
}

fn default_overlap_policy() -> String {
    OverlapPolicy::Skip.as_str().to_string()
}

pub(crate) fn default_catchup_window() -> String {
    "5m".to_string()
}

/// Managed schedule, keyed by `(namespace, schedule_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleModel {
    pub namespace: String,
    pub schedule_id: String,
    /// Non-indexed metadata; changing it requires replacing the schedule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<BTreeMap<String, String>>,
    pub spec: ScheduleSpecModel,
    pub action: ScheduleActionModel,
    #[serde(default)]
    pub state: ScheduleStateModel,
    #[serde(default, rename = "policy_config")]
    pub policy: SchedulePolicyModel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSpecModel {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub intervals: Vec<IntervalModel>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub calendar_items: Vec<CalendarModel>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cron_items: Vec<String>,
    /// RFC3339.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    /// RFC3339.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jitter: Option<String>,
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
}

impl Default for ScheduleSpecModel {
    fn default() -> Self {
        Self {
            intervals: Vec::new(),
            calendar_items: Vec::new(),
            cron_items: Vec::new(),
            start_time: None,
            end_time: None,
            jitter: None,
            time_zone: default_time_zone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalModel {
    pub every: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,
}

/// Calendar expression. Unset fields are permissive: every year, month and
/// day, at 00:00:00.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarModel {
    #[serde(default = "default_wildcard")]
    pub year: String,
    #[serde(default = "default_wildcard")]
    pub month: String,
    #[serde(default = "default_wildcard")]
    pub day_of_month: String,
    #[serde(default = "default_day_of_week")]
    pub day_of_week: String,
    #[serde(default = "default_zero")]
    pub hour: String,
    #[serde(default = "default_zero")]
    pub minute: String,
    #[serde(default = "default_zero")]
    pub second: String,
    #[serde(default)]
    pub comment: String,
}

impl Default for CalendarModel {
    fn default() -> Self {
        Self {
            year: default_wildcard(),
            month: default_wildcard(),
            day_of_month: default_wildcard(),
            day_of_week: default_day_of_week(),
            hour: default_zero(),
            minute: default_zero(),
            second: default_zero(),
            comment: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleActionModel {
    pub workflow: WorkflowActionModel,
}

/// Start-workflow action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowActionModel {
    pub workflow_id: String,
    pub workflow_type: String,
    pub task_queue: String,
    /// Pre-serialized workflow input, sent as-is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_timeout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_timeout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_timeout: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleStateModel {
    #[serde(default)]
    pub paused: bool,
    #[serde(default)]
    pub limited_actions: bool,
    #[serde(default)]
    pub remaining_actions: i64,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulePolicyModel {
    #[serde(default = "default_overlap_policy")]
    pub overlap_policy: String,
    #[serde(default = "default_catchup_window")]
    pub catchup_window: String,
    #[serde(default)]
    pub pause_on_failure: bool,
}

impl Default for SchedulePolicyModel {
    fn default() -> Self {
        Self {
            overlap_policy: default_overlap_policy(),
            catchup_window: default_catchup_window(),
            pause_on_failure: false,
        }
    }
}

// ============================================================================
// Search attributes
// ============================================================================

/// Managed custom search attribute, keyed by `(namespace, name)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchAttributeModel {
    pub name: String,
    pub namespace: String,
    #[serde(rename = "type")]
    pub value_type: String,
}

// Copyright (C) 2025 Temporal Provider contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Schedule model <-> wire mapping.
//!
//! Outbound functions push one diagnostic per bad field and return a best
//! effort wire value; callers decide whether to send it by checking the
//! collected diagnostics. Inbound functions render wire values into the same
//! textual form a user would write, so a read after an apply shows no drift.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, SecondsFormat, Utc};
use temporal_protocol::proto::common::{Memo, Payload, Payloads, WorkflowType};
use temporal_protocol::proto::enums::{ScheduleOverlapPolicy, TaskQueueKind};
use temporal_protocol::proto::schedule::{
    schedule_action, CalendarSpec, IntervalSpec, Schedule, ScheduleAction, SchedulePolicies,
    ScheduleSpec, ScheduleState, StructuredCalendarSpec,
};
use temporal_protocol::proto::taskqueue::TaskQueue;
use temporal_protocol::proto::workflow::NewWorkflowExecutionInfo;
use temporal_protocol::proto::workflowservice::DescribeScheduleResponse;
use tracing::warn;

use crate::diagnostics::{Diagnostics, Outcome};
use crate::error::{ProviderError, Result};
use crate::mapping::calendar::format_ranges;
use crate::mapping::duration::{format_proto_duration, parse_proto_duration};
use crate::types::{
    default_catchup_window, CalendarModel, IntervalModel, OverlapPolicy, ScheduleActionModel,
    ScheduleModel, SchedulePolicyModel, ScheduleSpecModel, ScheduleStateModel,
    WorkflowActionModel,
};

const ENCODING_KEY: &str = "encoding";
const ENCODING_JSON: &[u8] = b"json/plain";

// ============================================================================
// Outbound
// ============================================================================

fn duration_field(
    attribute: &str,
    summary: &str,
    value: &str,
    diags: &mut Diagnostics,
) -> Option<prost_types::Duration> {
    match parse_proto_duration(value) {
        Ok(d) => Some(d),
        Err(err) => {
            diags.add_attribute_error(attribute, summary, err.to_string());
            None
        }
    }
}

fn optional_duration_field(
    attribute: &str,
    summary: &str,
    value: Option<&str>,
    diags: &mut Diagnostics,
) -> Option<prost_types::Duration> {
    match value {
        None | Some("") => None,
        Some(v) => duration_field(attribute, summary, v, diags),
    }
}

fn timestamp_field(
    attribute: &str,
    summary: &str,
    value: Option<&str>,
    diags: &mut Diagnostics,
) -> Option<prost_types::Timestamp> {
    let value = value.filter(|v| !v.is_empty())?;
    match DateTime::parse_from_rfc3339(value) {
        Ok(time) => Some(prost_types::Timestamp {
            seconds: time.timestamp(),
            nanos: time.timestamp_subsec_nanos() as i32,
        }),
        Err(err) => {
            diags.add_attribute_error(
                attribute,
                summary,
                format!("{:?} is not an RFC3339 timestamp: {}", value, err),
            );
            None
        }
    }
}

fn to_calendar_spec(item: &CalendarModel) -> CalendarSpec {
    CalendarSpec {
        second: item.second.clone(),
        minute: item.minute.clone(),
        hour: item.hour.clone(),
        day_of_month: item.day_of_month.clone(),
        month: item.month.clone(),
        year: item.year.clone(),
        day_of_week: item.day_of_week.clone(),
        comment: item.comment.clone(),
    }
}

/// Translate the `spec` block.
pub fn to_schedule_spec(spec: &ScheduleSpecModel, diags: &mut Diagnostics) -> ScheduleSpec {
    let interval = spec
        .intervals
        .iter()
        .enumerate()
        .map(|(i, item)| IntervalSpec {
            interval: duration_field(
                &format!("spec.intervals[{}].every", i),
                "Invalid Interval",
                &item.every,
                diags,
            ),
            phase: optional_duration_field(
                &format!("spec.intervals[{}].offset", i),
                "Invalid Interval Offset",
                item.offset.as_deref(),
                diags,
            ),
        })
        .collect();

    ScheduleSpec {
        calendar: spec.calendar_items.iter().map(to_calendar_spec).collect(),
        interval,
        cron_string: spec.cron_items.clone(),
        start_time: timestamp_field(
            "spec.start_time",
            "Invalid Start Time",
            spec.start_time.as_deref(),
            diags,
        ),
        end_time: timestamp_field(
            "spec.end_time",
            "Invalid End Time",
            spec.end_time.as_deref(),
            diags,
        ),
        jitter: optional_duration_field(
            "spec.jitter",
            "Invalid Jitter",
            spec.jitter.as_deref(),
            diags,
        ),
        timezone_name: spec.time_zone.clone(),
        ..Default::default()
    }
}

/// Translate the start-workflow action. The input string is forwarded as
/// a single payload without inspection.
pub fn to_schedule_action(action: &ScheduleActionModel, diags: &mut Diagnostics) -> ScheduleAction {
    let workflow = &action.workflow;

    let input = workflow
        .input
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|s| Payloads {
            payloads: vec![Payload {
                metadata: HashMap::from([(ENCODING_KEY.to_string(), ENCODING_JSON.to_vec())]),
                data: s.as_bytes().to_vec(),
            }],
        });

    let info = NewWorkflowExecutionInfo {
        workflow_id: workflow.workflow_id.clone(),
        workflow_type: Some(WorkflowType {
            name: workflow.workflow_type.clone(),
        }),
        task_queue: Some(TaskQueue {
            name: workflow.task_queue.clone(),
            kind: TaskQueueKind::Normal as i32,
            normal_name: String::new(),
        }),
        input,
        workflow_execution_timeout: optional_duration_field(
            "action.workflow.execution_timeout",
            "Invalid Execution Timeout",
            workflow.execution_timeout.as_deref(),
            diags,
        ),
        workflow_run_timeout: optional_duration_field(
            "action.workflow.run_timeout",
            "Invalid Run Timeout",
            workflow.run_timeout.as_deref(),
            diags,
        ),
        workflow_task_timeout: optional_duration_field(
            "action.workflow.task_timeout",
            "Invalid Task Timeout",
            workflow.task_timeout.as_deref(),
            diags,
        ),
        memo: None,
    };

    ScheduleAction {
        action: Some(schedule_action::Action::StartWorkflow(info)),
    }
}

/// Translate the `policy_config` block.
pub fn to_schedule_policies(policy: &SchedulePolicyModel, diags: &mut Diagnostics) -> SchedulePolicies {
    let overlap = match policy.overlap_policy.parse::<OverlapPolicy>() {
        Ok(p) => ScheduleOverlapPolicy::from(p),
        Err(err) => {
            diags.add_attribute_error(
                "policy_config.overlap_policy",
                "Invalid Overlap Policy",
                err.to_string(),
            );
            ScheduleOverlapPolicy::Unspecified
        }
    };

    SchedulePolicies {
        overlap_policy: overlap as i32,
        catchup_window: duration_field(
            "policy_config.catchup_window",
            "Invalid Catchup Window",
            &policy.catchup_window,
            diags,
        ),
        pause_on_failure: policy.pause_on_failure,
        keep_original_workflow_id: false,
    }
}

pub fn to_schedule_state(state: &ScheduleStateModel) -> ScheduleState {
    ScheduleState {
        notes: state.notes.clone(),
        paused: state.paused,
        limited_actions: state.limited_actions,
        remaining_actions: state.remaining_actions,
    }
}

/// Full wire schedule, or every field error found in `model`.
pub fn to_schedule(model: &ScheduleModel) -> Result<Schedule> {
    let mut diags = Diagnostics::new();
    let schedule = Schedule {
        spec: Some(to_schedule_spec(&model.spec, &mut diags)),
        action: Some(to_schedule_action(&model.action, &mut diags)),
        policies: Some(to_schedule_policies(&model.policy, &mut diags)),
        state: Some(to_schedule_state(&model.state)),
    };
    diags.into_result(schedule)
}

/// Encode each memo value as its own JSON payload.
pub fn to_memo(memo: Option<&BTreeMap<String, String>>) -> Result<Option<Memo>> {
    let Some(memo) = memo.filter(|m| !m.is_empty()) else {
        return Ok(None);
    };

    let mut fields = HashMap::with_capacity(memo.len());
    for (key, value) in memo {
        let data = serde_json::to_vec(value)?;
        fields.insert(
            key.clone(),
            Payload {
                metadata: HashMap::from([(ENCODING_KEY.to_string(), ENCODING_JSON.to_vec())]),
                data,
            },
        );
    }
    Ok(Some(Memo { fields }))
}

/// Decode a memo back into strings. Every undecodable key is reported.
pub fn from_memo(memo: &Memo) -> Result<BTreeMap<String, String>> {
    let mut diags = Diagnostics::new();
    let mut out = BTreeMap::new();
    for (key, payload) in &memo.fields {
        match serde_json::from_slice::<String>(&payload.data) {
            Ok(value) => {
                out.insert(key.clone(), value);
            }
            Err(err) => diags.add_attribute_error(
                format!("memo.{}", key),
                "Invalid Memo Value",
                format!("memo field {:?} is not a JSON string: {}", key, err),
            ),
        }
    }
    diags.into_result(out)
}

// ============================================================================
// Inbound
// ============================================================================

fn format_timestamp(ts: &prost_types::Timestamp) -> Option<String> {
    DateTime::<Utc>::from_timestamp(ts.seconds, ts.nanos.max(0) as u32)
        .map(|t| t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

fn calendar_from_structured(cal: &StructuredCalendarSpec) -> CalendarModel {
    CalendarModel {
        year: format_ranges(&cal.year),
        month: format_ranges(&cal.month),
        day_of_month: format_ranges(&cal.day_of_month),
        day_of_week: format_ranges(&cal.day_of_week),
        hour: format_ranges(&cal.hour),
        minute: format_ranges(&cal.minute),
        second: format_ranges(&cal.second),
        comment: cal.comment.clone(),
    }
}

/// Render the server's view of a spec.
///
/// The server compiles calendar items into structured ranges, and may fold
/// them into cron strings. When only cron strings come back a warning is
/// attached so a diff on `calendar_items` is explainable.
pub fn spec_from_wire(spec: &ScheduleSpec) -> Outcome<ScheduleSpecModel> {
    let intervals = spec
        .interval
        .iter()
        .map(|i| IntervalModel {
            every: i
                .interval
                .as_ref()
                .map(format_proto_duration)
                .unwrap_or_else(|| "0s".to_string()),
            offset: i
                .phase
                .as_ref()
                .filter(|p| p.seconds != 0 || p.nanos != 0)
                .map(format_proto_duration),
        })
        .collect();

    let model = ScheduleSpecModel {
        intervals,
        calendar_items: spec
            .structured_calendar
            .iter()
            .map(calendar_from_structured)
            .collect(),
        cron_items: spec.cron_string.clone(),
        start_time: spec.start_time.as_ref().and_then(format_timestamp),
        end_time: spec.end_time.as_ref().and_then(format_timestamp),
        jitter: spec.jitter.as_ref().map(format_proto_duration),
        time_zone: if spec.timezone_name.is_empty() {
            "UTC".to_string()
        } else {
            spec.timezone_name.clone()
        },
    };

    let mut outcome = Outcome::new(model);
    if !spec.cron_string.is_empty() && spec.structured_calendar.is_empty() {
        warn!(
            cron_items = spec.cron_string.len(),
            "schedule has cron strings but no calendar items"
        );
        outcome = outcome.with_warning(
            "Calendar items converted",
            "the server returned cron strings without calendar items; calendar items may have been converted to cron strings",
        );
    }
    outcome
}

/// Render the start-workflow action.
pub fn action_from_wire(action: &ScheduleAction) -> Result<ScheduleActionModel> {
    let info = match &action.action {
        Some(schedule_action::Action::StartWorkflow(info)) => info,
        None => {
            return Err(ProviderError::Serialization(
                "schedule has no start-workflow action".to_string(),
            ));
        }
    };

    let input = info
        .input
        .as_ref()
        .and_then(|p| p.payloads.first())
        .map(|p| String::from_utf8_lossy(&p.data).into_owned());

    Ok(ScheduleActionModel {
        workflow: WorkflowActionModel {
            workflow_id: info.workflow_id.clone(),
            workflow_type: info
                .workflow_type
                .as_ref()
                .map(|t| t.name.clone())
                .unwrap_or_default(),
            task_queue: info
                .task_queue
                .as_ref()
                .map(|q| q.name.clone())
                .unwrap_or_default(),
            input,
            execution_timeout: info.workflow_execution_timeout.as_ref().map(format_proto_duration),
            run_timeout: info.workflow_run_timeout.as_ref().map(format_proto_duration),
            task_timeout: info.workflow_task_timeout.as_ref().map(format_proto_duration),
        },
    })
}

pub fn policy_from_wire(policies: &SchedulePolicies) -> SchedulePolicyModel {
    SchedulePolicyModel {
        overlap_policy: OverlapPolicy::from(policies.overlap_policy).to_string(),
        catchup_window: policies
            .catchup_window
            .as_ref()
            .map(format_proto_duration)
            .unwrap_or_else(default_catchup_window),
        pause_on_failure: policies.pause_on_failure,
    }
}

pub fn state_from_wire(state: &ScheduleState) -> ScheduleStateModel {
    ScheduleStateModel {
        paused: state.paused,
        limited_actions: state.limited_actions,
        remaining_actions: state.remaining_actions,
        notes: state.notes.clone(),
    }
}

/// Managed-resource state from a describe response.
pub fn model_from_describe(
    namespace: &str,
    schedule_id: &str,
    response: &DescribeScheduleResponse,
) -> Result<Outcome<ScheduleModel>> {
    let schedule = response.schedule.clone().unwrap_or_default();

    let spec = spec_from_wire(&schedule.spec.unwrap_or_default());
    let action = action_from_wire(&schedule.action.unwrap_or_default())?;
    let memo = match response.memo.as_ref().filter(|m| !m.fields.is_empty()) {
        Some(memo) => Some(from_memo(memo)?),
        None => None,
    };

    let model = ScheduleModel {
        namespace: namespace.to_string(),
        schedule_id: schedule_id.to_string(),
        memo,
        spec: spec.value,
        action,
        state: state_from_wire(&schedule.state.unwrap_or_default()),
        policy: policy_from_wire(&schedule.policies.unwrap_or_default()),
    };
    Ok(Outcome::with_diagnostics(model, spec.diagnostics))
}

/// Attributes that cannot be changed in place.
pub fn requires_replace(prior: &ScheduleModel, planned: &ScheduleModel) -> bool {
    prior.namespace != planned.namespace
        || prior.schedule_id != planned.schedule_id
        || prior.memo != planned.memo
}

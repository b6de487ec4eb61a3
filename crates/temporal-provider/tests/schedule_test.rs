// Copyright (C) 2025 Temporal Provider contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Schedule resource against the in-memory frontend.

mod common;

use std::collections::BTreeMap;

use temporal_protocol::proto::enums::ScheduleOverlapPolicy;
use temporal_protocol::proto::schedule::{
    Range, Schedule, ScheduleSpec, StructuredCalendarSpec, schedule_action,
};
use temporal_protocol::proto::workflowservice::DescribeScheduleResponse;
use temporal_provider::mapping::schedule::to_schedule;
use temporal_provider::{
    CalendarModel, IntervalModel, OperationContext, ProviderError, ScheduleActionModel,
    ScheduleModel, SchedulePolicyModel, ScheduleSpecModel, ScheduleStateModel,
    WorkflowActionModel,
};
use uuid::Uuid;

use common::FakeTemporal;

fn nightly() -> ScheduleModel {
    ScheduleModel {
        namespace: "default".to_string(),
        schedule_id: "nightly".to_string(),
        memo: Some(BTreeMap::from([("team".to_string(), "billing".to_string())])),
        spec: ScheduleSpecModel {
            calendar_items: vec![CalendarModel {
                hour: "2".to_string(),
                ..Default::default()
            }],
            intervals: vec![IntervalModel {
                every: "12h".to_string(),
                offset: None,
            }],
            ..Default::default()
        },
        action: ScheduleActionModel {
            workflow: WorkflowActionModel {
                workflow_id: "nightly-report".to_string(),
                workflow_type: "Report".to_string(),
                task_queue: "reports".to_string(),
                input: Some(r#"["2025-01-01"]"#.to_string()),
                run_timeout: Some("1h".to_string()),
                ..Default::default()
            },
        },
        state: ScheduleStateModel {
            notes: "managed".to_string(),
            ..Default::default()
        },
        policy: SchedulePolicyModel {
            overlap_policy: "BufferOne".to_string(),
            ..Default::default()
        },
    }
}

#[tokio::test]
async fn test_create_sends_full_request() {
    let fake = FakeTemporal::new();
    let resource = fake.provider().schedule_resource();

    let state = resource
        .create(&OperationContext::new(), &nightly())
        .await
        .unwrap()
        .into_value();
    assert_eq!(state, nightly());

    let sent = &fake.created_schedules()[0];
    assert!(Uuid::parse_str(&sent.request_id).is_ok());
    assert!(sent.identity.starts_with("temporal-provider/"));
    assert_eq!(sent.memo.as_ref().unwrap().fields["team"].data, br#""billing""#.to_vec());

    let schedule = sent.schedule.as_ref().unwrap();
    let policies = schedule.policies.as_ref().unwrap();
    assert_eq!(policies.overlap_policy, ScheduleOverlapPolicy::BufferOne as i32);
    assert_eq!(policies.catchup_window.as_ref().unwrap().seconds, 300);
    assert_eq!(schedule.state.as_ref().unwrap().notes, "managed");

    let spec = schedule.spec.as_ref().unwrap();
    assert_eq!(spec.calendar[0].hour, "2");
    assert_eq!(spec.calendar[0].day_of_week, "0-6");
    assert_eq!(spec.interval[0].interval.as_ref().unwrap().seconds, 43_200);
    assert_eq!(spec.timezone_name, "UTC");
}

#[tokio::test]
async fn test_invalid_overlap_policy_makes_no_calls() {
    let fake = FakeTemporal::new();
    let resource = fake.provider().schedule_resource();

    let mut plan = nightly();
    plan.policy.overlap_policy = "Invalid".to_string();
    let err = resource
        .create(&OperationContext::new(), &plan)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("overlap_policy"));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_all_field_errors_reported_together() {
    let fake = FakeTemporal::new();
    let resource = fake.provider().schedule_resource();

    let mut plan = nightly();
    plan.spec.jitter = Some("a bit".to_string());
    plan.spec.end_time = Some("tomorrow".to_string());
    plan.policy.catchup_window = "a while".to_string();
    plan.action.workflow.task_timeout = Some("10 seconds".to_string());

    match resource.create(&OperationContext::new(), &plan).await {
        Err(ProviderError::Diagnostics(diags)) => assert_eq!(diags.errors().count(), 4),
        other => panic!("expected diagnostics, got {:?}", other),
    }
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_read_renders_server_spec() {
    let fake = FakeTemporal::new();
    let mut schedule: Schedule = to_schedule(&nightly()).unwrap();
    schedule.spec = Some(ScheduleSpec {
        structured_calendar: vec![StructuredCalendarSpec {
            second: vec![Range { start: 0, end: 0, step: 1 }],
            minute: vec![Range { start: 0, end: 0, step: 1 }],
            hour: vec![Range { start: 2, end: 0, step: 1 }],
            day_of_week: vec![Range { start: 0, end: 6, step: 1 }],
            ..Default::default()
        }],
        timezone_name: "Europe/Warsaw".to_string(),
        ..Default::default()
    });
    fake.insert_schedule(
        "default",
        "nightly",
        DescribeScheduleResponse {
            schedule: Some(schedule),
            memo: None,
            conflict_token: vec![],
        },
    );

    let outcome = fake
        .provider()
        .schedule_resource()
        .read(&OperationContext::new(), &nightly())
        .await
        .unwrap();
    let state = outcome.value;

    let cal = &state.spec.calendar_items[0];
    assert_eq!(cal.hour, "2");
    assert_eq!(cal.minute, "0");
    assert_eq!(cal.day_of_week, "0-6");
    assert_eq!(state.spec.time_zone, "Europe/Warsaw");
    assert_eq!(state.policy.overlap_policy, "BufferOne");
    assert_eq!(state.policy.catchup_window, "5m");
    assert_eq!(state.action.workflow.run_timeout.as_deref(), Some("1h"));
    assert_eq!(state.action.workflow.input.as_deref(), Some(r#"["2025-01-01"]"#));
    assert!(state.memo.is_none());
}

#[tokio::test]
async fn test_update_in_place() {
    let fake = FakeTemporal::new();
    let resource = fake.provider().schedule_resource();
    let ctx = OperationContext::new();
    resource.create(&ctx, &nightly()).await.unwrap();

    let mut planned = nightly();
    planned.state.paused = true;
    planned.spec.jitter = Some("30s".to_string());
    resource.update(&ctx, &nightly(), &planned).await.unwrap();

    let sent = &fake.updated_schedules()[0];
    let schedule = sent.schedule.as_ref().unwrap();
    assert!(schedule.state.as_ref().unwrap().paused);
    assert_eq!(schedule.spec.as_ref().unwrap().jitter.as_ref().unwrap().seconds, 30);
    assert_ne!(sent.request_id, fake.created_schedules()[0].request_id);
}

#[tokio::test]
async fn test_memo_change_requires_replace() {
    let fake = FakeTemporal::new();
    let resource = fake.provider().schedule_resource();

    let mut planned = nightly();
    planned.memo = None;
    let err = resource
        .update(&OperationContext::new(), &nightly(), &planned)
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Validation { .. }));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_import_verifies_existence() {
    let fake = FakeTemporal::new();
    let resource = fake.provider().schedule_resource();
    let ctx = OperationContext::new();

    let err = resource.import(&ctx, "nightly").await.unwrap_err();
    assert!(err.is_not_found());

    resource.create(&ctx, &nightly()).await.unwrap();
    let imported = resource.import(&ctx, "nightly").await.unwrap().into_value();
    assert_eq!(imported.namespace, "default");
    assert_eq!(imported.schedule_id, "nightly");
    assert_eq!(imported.memo, nightly().memo);

    let Some(schedule_action::Action::StartWorkflow(_)) = to_schedule(&imported)
        .unwrap()
        .action
        .and_then(|a| a.action)
    else {
        panic!("imported schedule lost its action");
    };
}

#[tokio::test]
async fn test_import_rejects_extra_colons() {
    let fake = FakeTemporal::new();
    let resource = fake.provider().schedule_resource();

    let err = resource
        .import(&OperationContext::new(), "default:nightly:extra")
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::InvalidImportId { .. }));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_delete() {
    let fake = FakeTemporal::new();
    let resource = fake.provider().schedule_resource();
    let ctx = OperationContext::new();

    resource.create(&ctx, &nightly()).await.unwrap();
    resource.delete(&ctx, &nightly()).await.unwrap();
    assert!(resource.delete(&ctx, &nightly()).await.unwrap_err().is_not_found());
}

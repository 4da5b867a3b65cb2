#![allow(clippy::unwrap_used, clippy::expect_used)]

use canspec_core::analysis::{analyze_spec_diff, analyze_spec_diff_with_context};
use canspec_core::config::EngineConfig;
use canspec_core::diff::{compute_diff, DiffOptions};
use canspec_core::errors::CanSpecError;
use canspec_core::logging_facility::test_capture::init_test_capture;
use canspec_core::model::{CanSpecMessage, MessageId};
use canspec_core::ops::{run_import, ImportRequest};
use canspec_core::{log_op_end, log_op_error, log_op_start};
use canspec_core::RequestContext;
use canspec_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_ANALYSIS_ID, FIELD_DURATION_MS,
    FIELD_ERR_CODE, FIELD_ERR_KIND, FIELD_FORMAT, FIELD_IMPORT_ID, FIELD_MESSAGE_COUNT,
    FIELD_REQUEST_ID, FIELD_SIGNAL_COUNT, FIELD_TRACE_ID,
};
use canspec_core_types::{RequestId, TraceId};

// ===== Macros =====

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name, format = "CSV");

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_START));
    assert_eq!(events[0].field("format"), Some("CSV"));
    assert!(events[0]
        .component
        .as_deref()
        .unwrap()
        .starts_with("logging_facility_tests"));
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42, message_count = 7usize);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1, "Should have exactly one end event");
    assert_eq!(events[0].event.as_deref(), Some(EVENT_END));
    assert_eq!(events[0].field(FIELD_DURATION_MS), Some("42"));
    assert_eq!(events[0].field("message_count"), Some("7"));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = CanSpecError::InvalidDlc {
        message_id: MessageId::new(0x10),
        dlc: 12,
    };
    log_op_error!(op_name, err, duration_ms = 10);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1, "Should have exactly one error event");
    let error_event = &events[0];
    assert_eq!(error_event.event.as_deref(), Some(EVENT_END_ERROR));
    assert_eq!(error_event.field(FIELD_ERR_CODE), Some("ERR_INVALID_DLC"));
    assert_eq!(error_event.field(FIELD_ERR_KIND), Some("InvalidDlc"));
    assert_eq!(error_event.field(FIELD_REQUEST_ID), None);
    assert_eq!(error_event.level, tracing::Level::ERROR);
}

#[test]
#[should_panic(expected = "Expected event")]
fn test_capture_assert_event_exists_fails() {
    let capture = init_test_capture();
    capture.assert_event_exists("nonexistent_op_truly_unique_999", EVENT_START);
}

// ===== Engine operations =====

#[test]
fn test_import_emits_start_and_end_with_counts() {
    let capture = init_test_capture();

    let outcome = run_import(
        &EngineConfig::default(),
        ImportRequest::new(
            "log.csv",
            "csv",
            &b"0x1,A,0,8,false,false,0,1,1,0,\n0x2,B,0,8,false,false,0,1,1,0,\n"[..],
            "tester",
        ),
    )
    .unwrap();
    let id = outcome.import.id().to_string();

    let events: Vec<_> = capture
        .events_for_op("import")
        .into_iter()
        .filter(|e| e.field(FIELD_IMPORT_ID) == Some(id.as_str()))
        .collect();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_START));
    assert_eq!(events[0].field(FIELD_FORMAT), Some("CSV"));
    assert_eq!(events[1].event.as_deref(), Some(EVENT_END));
    assert_eq!(events[1].field(FIELD_MESSAGE_COUNT), Some("2"));
    assert_eq!(events[1].field(FIELD_SIGNAL_COUNT), Some("2"));
    assert!(events[1].field(FIELD_DURATION_MS).is_some());
}

#[test]
fn test_failed_import_emits_end_error() {
    let capture = init_test_capture();

    let outcome = run_import(
        &EngineConfig::default(),
        ImportRequest::new("bad.json", "json", &b"[1, 2"[..], "tester"),
    )
    .unwrap();
    let id = outcome.import.id().to_string();

    let events: Vec<_> = capture
        .events_for_op("import")
        .into_iter()
        .filter(|e| e.field(FIELD_IMPORT_ID) == Some(id.as_str()))
        .collect();
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].event.as_deref(), Some(EVENT_END_ERROR));
    assert_eq!(events[1].field(FIELD_ERR_CODE), Some("ERR_MALFORMED_JSON"));
}

#[test]
fn test_analysis_emits_boundaries() {
    let capture = init_test_capture();

    let old = vec![CanSpecMessage::new(MessageId::new(0x42), "Gone", 8)];
    let diff = compute_diff(&old, &[], &DiffOptions::default());
    let analysis = analyze_spec_diff("a", "b", "tester", &diff);

    let count = |event: &str| {
        capture.count_events(|e| {
            e.op.as_deref() == Some("analyze")
                && e.event.as_deref() == Some(event)
                && e.field(FIELD_ANALYSIS_ID) == Some(analysis.id())
        })
    };
    assert_eq!(count(EVENT_START), 1);
    assert_eq!(count(EVENT_END), 1);

    capture.assert_event_exists("compute_diff", EVENT_END);
}

#[test]
fn test_import_events_carry_request_id() {
    let capture = init_test_capture();
    let context = RequestContext::with_request_id(RequestId::from_string("req-import-logged"));

    run_import(
        &EngineConfig::default(),
        ImportRequest::new("ctx.csv", "csv", &b"0x7,A,0,8,false,false,0,1,1,0,\n"[..], "tester")
            .with_context(context),
    )
    .unwrap();

    let events: Vec<_> = capture
        .events_for_op("import")
        .into_iter()
        .filter(|e| e.field(FIELD_REQUEST_ID) == Some("req-import-logged"))
        .collect();
    let kinds: Vec<_> = events.iter().map(|e| e.event.as_deref()).collect();
    assert_eq!(kinds, vec![Some(EVENT_START), Some(EVENT_END)]);
}

#[test]
fn test_rejected_import_error_carries_correlation_ids() {
    let capture = init_test_capture();
    let context = RequestContext::with_request_id(RequestId::from_string("req-rejected-logged"))
        .with_trace_id(TraceId::from_string("trace-rejected-logged"));

    let err = run_import(
        &EngineConfig::default(),
        ImportRequest::new("bus.dbc", "dbc", &b"BO_ 1"[..], "tester").with_context(context),
    )
    .unwrap_err();
    assert!(matches!(err, CanSpecError::UnsupportedFormat { .. }));

    let events: Vec<_> = capture
        .events_for_op("import")
        .into_iter()
        .filter(|e| e.field(FIELD_REQUEST_ID) == Some("req-rejected-logged"))
        .collect();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_END_ERROR));
    assert_eq!(events[0].field(FIELD_ERR_CODE), Some("ERR_UNSUPPORTED_FORMAT"));
    assert_eq!(events[0].field(FIELD_TRACE_ID), Some("trace-rejected-logged"));
}

#[test]
fn test_analysis_events_carry_request_id() {
    let capture = init_test_capture();
    let context = RequestContext::with_request_id(RequestId::from_string("req-analysis-logged"));

    let diff = compute_diff(&[], &[], &DiffOptions::default());
    analyze_spec_diff_with_context(&context, "a", "b", "tester", &diff);

    let count = capture.count_events(|e| {
        e.op.as_deref() == Some("analyze") && e.field(FIELD_REQUEST_ID) == Some("req-analysis-logged")
    });
    assert_eq!(count, 2);
}

use scantool::core::diagnostics::{collect_events, LogSource, Severity};
use scantool::DiagError;

use super::fake_probe::{log_entry, FakeProbe};

/// System: 3 errors and 2 warnings interleaved. Application: 5 errors.
fn mixed_probe() -> FakeProbe {
    let mut probe = FakeProbe::new();
    probe.system_log = vec![
        log_entry(1, 50, Severity::Error),
        log_entry(2, 45, Severity::Warning),
        log_entry(3, 40, Severity::Error),
        log_entry(4, 35, Severity::Warning),
        log_entry(5, 30, Severity::Error),
    ];
    probe.application_log = vec![
        log_entry(101, 55, Severity::Error),
        log_entry(102, 42, Severity::Error),
        log_entry(103, 33, Severity::Error),
        log_entry(104, 20, Severity::Error),
        log_entry(105, 10, Severity::Error),
    ];
    probe
}

#[test]
fn test_event_budget_is_split_between_sources() {
    let probe = mixed_probe();

    let events = collect_events(&probe, Severity::Error, 4).unwrap();

    assert_eq!(events.len(), 4);
    let from_system = events.iter().filter(|e| e.log_name == LogSource::System).count();
    assert!(from_system <= 2);
    assert_eq!(from_system, 2);
    assert!(events
        .windows(2)
        .all(|pair| pair[0].time_generated >= pair[1].time_generated));
    assert_eq!(events[0].event_id, 101);
}

#[test]
fn test_application_fills_unused_system_budget() {
    let mut probe = mixed_probe();
    probe.system_log.clear();

    let events = collect_events(&probe, Severity::Error, 4).unwrap();

    assert_eq!(events.len(), 4);
    assert!(events.iter().all(|e| e.log_name == LogSource::Application));
}

#[test]
fn test_only_requested_severity_is_returned() {
    let probe = mixed_probe();

    let warnings = collect_events(&probe, Severity::Warning, 10).unwrap();
    assert_eq!(warnings.len(), 2);
    assert!(warnings.iter().all(|e| e.level == Severity::Warning));

    let errors = collect_events(&probe, Severity::Error, 50).unwrap();
    assert_eq!(errors.len(), 8);
    assert!(errors.iter().all(|e| e.level == Severity::Error));
}

#[test]
fn test_zero_budget_returns_nothing() {
    let probe = mixed_probe();
    assert!(collect_events(&probe, Severity::Error, 0).unwrap().is_empty());
}

#[test]
fn test_unreadable_source_fails_without_partial_results() {
    let probe = mixed_probe();
    probe.fail("application_log");

    let err = collect_events(&probe, Severity::Warning, 10).unwrap_err();
    assert!(matches!(err, DiagError::Collection { what: "system warnings", .. }));
    assert!(err.to_string().starts_with("Failed to retrieve system warnings"));
}

#[test]
fn test_equal_timestamps_keep_system_first() {
    let mut probe = FakeProbe::new();
    probe.system_log = vec![log_entry(1, 30, Severity::Error), log_entry(2, 30, Severity::Error)];
    probe.application_log = vec![
        log_entry(101, 30, Severity::Error),
        log_entry(102, 30, Severity::Error),
    ];

    let events = collect_events(&probe, Severity::Error, 10).unwrap();

    let order: Vec<(i64, LogSource)> = events.iter().map(|e| (e.event_id, e.log_name)).collect();
    assert_eq!(
        order,
        vec![
            (1, LogSource::System),
            (2, LogSource::System),
            (101, LogSource::Application),
            (102, LogSource::Application),
        ]
    );
}

use std::io::Write;

use raptor_router::search::{RaptorTuning, RoutingError};

#[test]
fn tuning_from_file_fills_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"threads": 2, "search_window": {{"min_window_mins": 30, "step_mins": 5}}}}"#
    )
    .unwrap();

    let tuning = RaptorTuning::from_file(file.path()).unwrap();
    assert_eq!(tuning.threads, 2);
    assert_eq!(tuning.search_window.min_window_mins, 30);
    assert_eq!(tuning.search_window.step_mins, 5);
    assert_eq!(tuning.search_window.max_window_mins, 180);
    assert!(!tuning.min_transfer_time_is_definitive);
}

#[test]
fn invalid_tuning_file_is_a_config_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"search_window": {{"min_window_mins": 200}}}}"#).unwrap();
    assert!(matches!(
        RaptorTuning::from_file(file.path()),
        Err(RoutingError::Config(_))
    ));

    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("raptor.json");
    let err = RaptorTuning::from_file(&missing).unwrap_err();
    assert!(err.to_string().contains("raptor.json"));
}

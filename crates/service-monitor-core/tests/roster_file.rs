#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::fs;

use service_monitor_core::roster::{self, Roster, DEFAULT_ROSTER_TOML};
use service_monitor_core::ErrorKind;

#[test]
fn parses_both_lists_in_order() {
    let r = roster::load_from_str(
        r#"
up_services = ["api-gateway", "auth-service"]
down_services = ["notification-service"]
"#,
    )
    .expect("must parse");

    assert_eq!(r.up, vec!["api-gateway", "auth-service"]);
    assert_eq!(r.down, vec!["notification-service"]);
}

#[test]
fn missing_keys_default_to_empty() {
    let r = roster::load_from_str(r#"up_services = ["solo"]"#).expect("must parse");
    assert_eq!(r.up, vec!["solo"]);
    assert!(r.down.is_empty());
}

#[test]
fn malformed_content_is_parse_failure() {
    let err = roster::load_from_str("up_services = [\"unterminated").expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::ParseFailure);

    let err = roster::load_from_str("up_services = \"not-a-list\"").expect_err("must fail");
    assert_eq!(err.kind().as_str(), "PARSE_FAILURE");
}

#[test]
fn unknown_keys_are_ignored() {
    let r = roster::load_from_str(
        "title = \"prod\"\nup_services = [\"a\"]\ndown_services = []\n\n[owner]\nteam = \"sre\"\n",
    )
    .expect("must parse");
    assert_eq!(r.up, vec!["a"]);
    assert!(r.down.is_empty());
}

#[test]
fn invalid_utf8_file_is_parse_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, b"up_services = [\"\xff\xfe\"]").unwrap();

    let err = roster::load_from_file(&path).expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::ParseFailure);

    let err = roster::load_from_bytes(b"\xff\xfe", &path).expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::ParseFailure);
}

#[test]
fn missing_file_is_io_failure() {
    let dir = tempfile::tempdir().unwrap();
    let err = roster::load_from_file(dir.path().join("nope.toml")).expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::IoFailure);
}

#[test]
fn malformed_file_is_parse_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "down_services = [1, 2]").unwrap();

    let err = roster::load_from_file(&path).expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::ParseFailure);
    assert!(err.to_string().contains("config.toml"));
}

#[test]
fn default_document_is_a_valid_roster() {
    let r = roster::load_from_str(DEFAULT_ROSTER_TOML).expect("must parse");
    assert_eq!(
        r.up,
        vec!["api-gateway", "auth-service", "user-service", "payment-service"]
    );
    assert_eq!(r.down, vec!["notification-service", "recommendation-engine"]);
    assert!(r.overlapping().is_empty());
}

#[test]
fn overlap_is_reported_not_rejected() {
    let r = Roster::new(["a", "b", "c"], ["c", "a"]);
    assert_eq!(r.overlapping(), vec!["a", "c"]);
}

#[test]
fn display_lists_counts_and_names() {
    let r = Roster::new(["api-gateway", "auth-service"], ["notification-service"]);
    assert_eq!(
        r.to_string(),
        "UP SERVICES (2):\n- api-gateway\n- auth-service\n\nDOWN SERVICES (1):\n- notification-service\n"
    );
}

#[test]
fn write_default_creates_missing_file_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/config/config.toml");

    assert!(roster::ensure_parent_dir(&path).unwrap());
    assert!(!roster::ensure_parent_dir(&path).unwrap());

    assert!(roster::write_default_if_missing(&path).unwrap());
    assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_ROSTER_TOML);

    fs::write(&path, "up_services = [\"kept\"]").unwrap();
    assert!(!roster::write_default_if_missing(&path).unwrap());
    assert_eq!(roster::load_from_file(&path).unwrap().up, vec!["kept"]);
}

#[test]
fn fallback_has_single_up_service() {
    let r = Roster::fallback();
    assert_eq!(r.up, vec!["default-service"]);
    assert!(r.down.is_empty());
}

//! Integration tests for argument parsing, global options and exit codes.

mod common;

use common::{booking_body, TestEnv};
use predicates::prelude::*;
use serde_json::json;
use std::fs;

#[test]
fn test_help_lists_commands() {
    let env = TestEnv::new();
    env.command_bare()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("create-hotel"))
        .stdout(predicate::str::contains("availability"))
        .stdout(predicate::str::contains("delete-hotel"));
}

#[test]
fn test_version() {
    let env = TestEnv::new();
    env.command_bare()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("innkeep"));
}

#[test]
fn test_no_subcommand_is_usage_error() {
    let env = TestEnv::new();
    env.command_bare().assert().failure().code(2);
}

#[test]
fn test_body_from_stdin() {
    let env = TestEnv::new();
    let output = env
        .command()
        .arg("create-hotel")
        .write_stdin(r#"{"name": "Piped Inn"}"#)
        .output()
        .unwrap();

    assert!(output.status.success());
    let response = common::parse_json(&output.stdout);
    assert_eq!(response["hotel"]["name"], "Piped Inn");
    assert_eq!(response["roomsTable"], "rooms_hotel_1");
}

#[test]
fn test_empty_body_is_invalid_arguments() {
    let env = TestEnv::new();
    env.command()
        .arg("create-hotel")
        .write_stdin("")
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("no request body"));
}

#[test]
fn test_malformed_json_is_bad_request() {
    let env = TestEnv::new();
    let output = env
        .command()
        .args(["create-hotel", "--json", "{not json"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let response = common::parse_json(&output.stdout);
    assert_eq!(response["success"], false);
    assert_eq!(response["error"], "bad_request");
}

#[test]
fn test_missing_field_names_it() {
    let env = TestEnv::new();
    let (hotel, rooms) = env.provision("Fields Inn", &[("101", 100.0)]);

    let (code, response) = env.call(
        "availability",
        &json!({ "hotelId": hotel, "roomId": rooms[0], "checkinDate": "2099-06-01" }),
    );
    assert_eq!(code, 1);
    assert_eq!(response["error"], "bad_request");
    assert!(response["message"]
        .as_str()
        .unwrap()
        .contains("checkoutDate"));
}

#[test]
fn test_disable_autoinit_without_database() {
    let env = TestEnv::new();
    env.command()
        .arg("--disable-autoinit")
        .args(["create-hotel", "--json", r#"{"name": "Nowhere"}"#])
        .assert()
        .failure()
        .code(3);
    assert!(!env.database_path().exists());
}

#[test]
fn test_disable_autoinit_from_env() {
    let env = TestEnv::new();
    env.command()
        .env("INNKEEP_DISABLE_AUTOINIT", "true")
        .args(["create-hotel", "--json", r#"{"name": "Nowhere"}"#])
        .assert()
        .code(3);
}

#[test]
fn test_autoinit_creates_database() {
    let env = TestEnv::new();
    env.call_ok("create-hotel", &json!({ "name": "Fresh Inn" }));
    assert!(env.database_path().exists());
}

#[test]
fn test_invalid_config_file() {
    let env = TestEnv::new();
    fs::create_dir_all(&env.data_dir).unwrap();
    fs::write(
        env.data_dir.join("config.yaml"),
        "maximum_lock_wait_seconds: [not, a, number",
    )
    .unwrap();

    env.command()
        .args(["create-hotel", "--json", r#"{"name": "Broken"}"#])
        .assert()
        .failure()
        .code(7);
}

#[test]
fn test_invalid_hotel_scope_flag() {
    let env = TestEnv::new();
    env.command()
        .args(["--role", "manager", "--hotel", "0"])
        .args(["list-rooms", "--json", r#"{"hotelId": 1}"#])
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("--hotel"));
}

#[test]
fn test_manager_cannot_create_hotel() {
    let env = TestEnv::new();
    let output = env
        .command()
        .args(["--user", "mira", "--role", "manager"])
        .args(["create-hotel", "--json", r#"{"name": "Sneaky Inn"}"#])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let response = common::parse_json(&output.stdout);
    assert_eq!(response["error"], "unauthorized");
}

#[test]
fn test_manager_is_limited_to_scoped_hotel() {
    let env = TestEnv::new();
    let (first, _) = env.provision("First Inn", &[("101", 100.0)]);
    let (second, second_rooms) = env.provision("Second Inn", &[("201", 100.0)]);

    env.command()
        .args(["--role", "manager", "--hotel", &first.to_string()])
        .args(["list-rooms", "--json", &json!({ "hotelId": first }).to_string()])
        .assert()
        .success();

    let output = env
        .command()
        .args(["--role", "manager", "--hotel", &first.to_string()])
        .arg("book")
        .arg("--json")
        .arg(booking_body(second, second_rooms[0], "2099-06-01", "2099-06-03").to_string())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(common::parse_json(&output.stdout)["error"], "unauthorized");

    let output = env
        .command()
        .args(["--role", "manager", "--hotel", &first.to_string()])
        .arg("availability")
        .arg("--json")
        .arg(
            json!({
                "hotelId": second,
                "roomId": second_rooms[0],
                "checkinDate": "2099-06-01",
                "checkoutDate": "2099-06-03"
            })
            .to_string(),
        )
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let response = common::parse_json(&output.stdout);
    assert_eq!(response["error"], "unauthorized");
    assert!(response.get("conflicts").is_none());
}

#[test]
fn test_verbose_logs_to_stderr() {
    let env = TestEnv::new();
    env.command()
        .arg("--verbose")
        .args(["create-hotel", "--json", r#"{"name": "Loud Inn"}"#])
        .assert()
        .success()
        .stderr(predicate::str::is_empty().not());
}

#[test]
fn test_quiet_suppresses_log_output() {
    let env = TestEnv::new();
    env.command()
        .arg("--quiet")
        .args(["create-hotel", "--json", r#"{"name": "Quiet Inn"}"#])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Test environment setup with temporary directories
//! - Command builders that send a JSON body
//! - Fixtures for a provisioned hotel

use assert_cmd::Command;
use serde_json::{json, Value};
use std::path::PathBuf;
use tempfile::TempDir;

/// Environment variables the binary reads; cleared so the host cannot leak in.
const INNKEEP_ENV: &[&str] = &[
    "INNKEEP_DATA_DIR",
    "INNKEEP_BUSY_TIMEOUT",
    "INNKEEP_DISABLE_AUTOINIT",
    "INNKEEP_USER",
    "INNKEEP_ROLE",
    "INNKEEP_HOTEL",
    "INNKEEP_UTC_OFFSET",
    "INNKEEP_CURRENCY",
    "INNKEEP_DEFAULT_CHECKIN_TIME",
    "INNKEEP_DEFAULT_CHECKOUT_TIME",
    "INNKEEP_LOG_MODE",
    "INNKEEP_MAXIMUM_LOCK_WAIT_SECONDS",
];

/// Test environment with isolated data directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory
    pub temp_path: PathBuf,
    /// Path to the innkeep data directory (not created until first use)
    pub data_dir: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();
        let data_dir = temp_path.join("innkeep-data");

        Self {
            temp_dir,
            temp_path,
            data_dir,
        }
    }

    /// A command with only the innkeep binary and a clean environment.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("innkeep").expect("Failed to find innkeep binary");
        for var in INNKEEP_ENV {
            cmd.env_remove(var);
        }
        cmd
    }

    /// A command with `--data-dir` pointing at this environment.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--data-dir").arg(&self.data_dir);
        cmd
    }

    /// Path of the database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("innkeep.db")
    }

    /// Runs `subcommand --json body` and returns the exit code and parsed
    /// stdout.
    pub fn call(&self, subcommand: &str, body: &Value) -> (i32, Value) {
        let output = self
            .command()
            .arg(subcommand)
            .arg("--json")
            .arg(body.to_string())
            .output()
            .expect("Failed to run innkeep");
        let code = output.status.code().expect("terminated by signal");
        (code, parse_json(&output.stdout))
    }

    /// Runs a command that must succeed and returns its response.
    pub fn call_ok(&self, subcommand: &str, body: &Value) -> Value {
        let (code, response) = self.call(subcommand, body);
        assert_eq!(code, 0, "{subcommand} failed: {response}");
        assert_eq!(response["success"], true, "{response}");
        response
    }

    /// Creates a hotel with the given rooms and returns `(hotel, rooms)`.
    pub fn provision(&self, name: &str, rooms: &[(&str, f64)]) -> (i64, Vec<i64>) {
        let created = self.call_ok("create-hotel", &json!({ "name": name }));
        let hotel = created["hotel"]["id"].as_i64().expect("hotel id");

        let room_ids = rooms
            .iter()
            .map(|(number, price)| {
                let added = self.call_ok(
                    "add-room",
                    &json!({ "hotelId": hotel, "roomNumber": number, "price": price }),
                );
                added["room"]["id"].as_i64().expect("room id")
            })
            .collect();
        (hotel, room_ids)
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses command stdout as JSON.
#[allow(dead_code)]
pub fn parse_json(stdout: &[u8]) -> Value {
    serde_json::from_slice(stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON ({e}): {}",
            String::from_utf8_lossy(stdout)
        )
    })
}

/// A booking body far enough in the future to never be "in the past".
#[allow(dead_code)]
pub fn booking_body(hotel: i64, room: i64, checkin: &str, checkout: &str) -> Value {
    json!({
        "hotelId": hotel,
        "roomId": room,
        "guestName": "Ada Guest",
        "guestPhone": "555-0100",
        "checkinDate": checkin,
        "checkoutDate": checkout,
    })
}

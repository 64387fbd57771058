//! Binary tests for the client-visible rejection paths.
//!
//! Every case stops before exec, so no git binary is needed.

#![allow(deprecated)] // Command::cargo_bin deprecation only affects custom build dirs

mod common;

use assert_cmd::Command;
use assert_fs::TempDir;
use common::Fixture;
use predicates::prelude::*;

fn gate(fx: &Fixture) -> Command {
    let mut cmd = Command::cargo_bin("git-ssh-gate").expect("failed to find binary");
    cmd.env_remove("RUST_LOG")
        .env_remove("SRHT_PUSH")
        .env_remove("SSH_ORIGINAL_COMMAND")
        .arg("--config")
        .arg(fx.write_config())
        .arg("--log-file")
        .arg(fx.log_file());
    cmd
}

#[test]
fn missing_arguments_fail() {
    let temp = TempDir::new().unwrap();
    Command::cargo_bin("git-ssh-gate")
        .expect("failed to find binary")
        .env("GIT_SSH_GATE_LOG", temp.path().join("shell.log"))
        .arg("7")
        .assert()
        .failure()
        .code(1);
}

#[test]
fn interactive_shell_is_refused_with_greeting() {
    let fx = Fixture::new();
    fx.add_user(7, "alice");

    gate(&fx)
        .args(["7", "alice"])
        .assert()
        .code(128)
        .stderr(predicate::str::contains(
            "Hi alice! You've successfully authenticated, but I do not provide an interactive shell.",
        ));
}

#[test]
fn access_denied_exits_128() {
    let fx = Fixture::new();
    fx.add_user(7, "alice");
    fx.add_user(9, "bob");
    fx.add_repo(7, "alice", "proj", "private");

    gate(&fx)
        .env("SSH_ORIGINAL_COMMAND", "git-receive-pack '~alice/proj'")
        .args(["9", "bob"])
        .assert()
        .code(128)
        .stderr(predicate::str::contains("Access denied."))
        .stderr(predicate::str::contains("private").not());
}

#[test]
fn missing_repository_exits_128() {
    let fx = Fixture::new();
    fx.add_user(9, "bob");

    gate(&fx)
        .env("SSH_ORIGINAL_COMMAND", "git-upload-pack '~bob/missing'")
        .args(["9", "bob"])
        .assert()
        .code(128)
        .stderr(predicate::str::contains("Repository not found."));
}

#[test]
fn foreign_namespace_push_exits_128() {
    let fx = Fixture::new();
    fx.add_user(7, "alice");
    fx.add_user(9, "bob");

    gate(&fx)
        .env("SSH_ORIGINAL_COMMAND", "git-receive-pack '~alice/newproj'")
        .args(["9", "bob"])
        .assert()
        .code(128)
        .stderr(predicate::str::contains("Repository not found."));

    assert!(!fx.repo_path("alice", "newproj").exists());
}

#[test]
fn suspended_account_sees_notice_and_contact() {
    let fx = Fixture::new();
    fx.add_suspended_user(7, "alice", "Abuse of service");
    fx.add_repo(7, "alice", "proj", "private");

    gate(&fx)
        .env("SSH_ORIGINAL_COMMAND", "git-upload-pack '~alice/proj'")
        .args(["7", "alice"])
        .assert()
        .code(128)
        .stderr(predicate::str::contains("Your account has been suspended"))
        .stderr(predicate::str::contains("\tAbuse of service"))
        .stderr(predicate::str::contains(
            "Please contact support: Example Admin <admin@example.org>",
        ));
}

#[test]
fn decisions_are_logged_to_the_operator_log() {
    let fx = Fixture::new();
    fx.add_user(9, "bob");

    gate(&fx)
        .env("SSH_ORIGINAL_COMMAND", "git-upload-pack '~bob/missing'")
        .env("SRHT_PUSH", "5a9c2a9e-push")
        .args(["9", "bob"])
        .assert()
        .code(128)
        .stderr(predicate::str::contains("Looking up repo").not());

    let log = std::fs::read_to_string(fx.log_file()).expect("read log");
    assert!(log.contains("Running shell for push 5a9c2a9e-push"));
    assert!(log.contains("Looking up repo: pusher ID 9"));
}

#[test]
fn missing_config_is_fatal() {
    let fx = Fixture::new();

    Command::cargo_bin("git-ssh-gate")
        .expect("failed to find binary")
        .env_remove("RUST_LOG")
        .env("SSH_ORIGINAL_COMMAND", "git-upload-pack '~bob/proj'")
        .arg("--config")
        .arg(fx.temp_dir.path().join("absent.ini"))
        .arg("--log-file")
        .arg(fx.log_file())
        .args(["9", "bob"])
        .assert()
        .failure()
        .code(1);

    let log = std::fs::read_to_string(fx.log_file()).expect("read log");
    assert!(log.contains("Failed to load config file"));
}

// End-to-end runs of the `codejudge` binary

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// Nothing listens on the discard port; commands that must not touch the
// network point here.
const UNREACHABLE: &str = "http://127.0.0.1:9/api/v1/";

/// A command with its own config directory and no inherited overrides.
fn codejudge(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("codejudge").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env_remove("CODEJUDGE_API_URL")
        .env_remove("CODEJUDGE_PROFILE")
        .env_remove("CODEJUDGE_PASSWORD")
        .env_remove("RUST_LOG")
        .arg("--no-color");
    cmd
}

async fn run(mut cmd: Command) -> assert_cmd::assert::Assert {
    tokio::task::spawn_blocking(move || cmd.assert())
        .await
        .unwrap()
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    codejudge(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("tasks"))
        .stdout(predicate::str::contains("submit"));
}

#[test]
fn test_unsupported_page_size_is_rejected() {
    let home = TempDir::new().unwrap();
    codejudge(&home)
        .args(["--api-url", UNREACHABLE, "tasks", "list", "--page-size", "15"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported page size"));
}

#[test]
fn test_invalid_task_shows_field_errors() {
    let home = TempDir::new().unwrap();
    codejudge(&home)
        .args(["--api-url", UNREACHABLE, "tasks", "create", "--difficulty", "Easy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Title is required"))
        .stderr(predicate::str::contains("At least one tag is required"));
}

#[test]
fn test_submit_missing_file() {
    let home = TempDir::new().unwrap();
    codejudge(&home)
        .args(["--api-url", UNREACHABLE, "submit", "3", "does-not-exist.py"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn test_config_set_and_get() {
    let home = TempDir::new().unwrap();
    codejudge(&home)
        .args(["config", "set", "settings.page_size", "20"])
        .assert()
        .success();
    codejudge(&home)
        .args(["config", "get", "settings.page_size"])
        .assert()
        .success()
        .stdout(predicate::str::diff("20\n"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_tasks_list_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tasks/"))
        .and(query_param("page", "2"))
        .and(query_param("page_size", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"id": 11, "title": "Knapsack", "difficulty": {"name": "Hard"}, "tags": []}],
            "count": 11
        })))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let mut cmd = codejudge(&home);
    cmd.args(["--api-url", &format!("{}/api/v1/", server.uri())])
        .args(["--output", "json", "tasks", "list", "--page", "2"]);

    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("\"number\": 11"))
        .stdout(predicate::str::contains("Knapsack"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_empty_catalog_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tasks/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": [], "count": 0})))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let mut cmd = codejudge(&home);
    cmd.args(["--api-url", &format!("{}/api/v1/", server.uri())])
        .args(["tasks", "list"]);

    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains(
            "No tasks available. Create a new task to get started!",
        ))
        .stdout(predicate::str::contains("Page 1 of 1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_submit_without_server_shows_generic_message() {
    let home = TempDir::new().unwrap();
    let solution = home.path().join("solution.py");
    std::fs::write(&solution, "print(1)").unwrap();

    let mut cmd = codejudge(&home);
    cmd.args(["--api-url", UNREACHABLE, "submit", "3"])
        .arg(&solution);

    run(cmd)
        .await
        .failure()
        .stderr(predicate::str::contains("Submission failed"));
}

#[cfg(target_os = "linux")]
#[tokio::test(flavor = "multi_thread")]
async fn test_login_persists_token_for_later_commands() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/users/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "jwt-123"})))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let api_url = format!("{}/api/v1/", server.uri());

    let mut login = codejudge(&home);
    login
        .args(["--api-url", &api_url, "auth", "login", "--email", "ada@example.com"])
        .env("CODEJUDGE_PASSWORD", "secret");
    run(login).await.success();

    let credentials = home.path().join("config/codejudge-cli/credentials.toml");
    let stored = std::fs::read_to_string(&credentials).unwrap();
    assert!(stored.contains("jwt-123"));

    let mut status = codejudge(&home);
    status.args(["--api-url", &api_url, "auth", "status"]);
    run(status)
        .await
        .success()
        .stdout(predicate::str::contains("Session: logged in"));

    let mut logout = codejudge(&home);
    logout.args(["auth", "logout"]);
    run(logout).await.success();
    assert!(!std::fs::read_to_string(&credentials).unwrap().contains("jwt-123"));
}

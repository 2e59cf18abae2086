use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::str::contains;
use std::fs;
use tempfile::{tempdir, TempDir};

fn runqctl_bare(cfg_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("runqctl").expect("runqctl binary");
    cmd.env_remove("RUN_NAME")
        .env_remove("RUNQ_BASE_URL")
        .env_remove("RUNQ_SERVICE_NAME")
        .env_remove("RUNQ_AUTH_TOKEN")
        .arg("--config")
        .arg(cfg_dir.path().join("config.json"));
    cmd
}

fn runqctl(server: &MockServer, cfg_dir: &TempDir) -> Command {
    let mut cmd = runqctl_bare(cfg_dir);
    cmd.arg("--base-url").arg(server.base_url());
    cmd
}

#[test]
fn run_list_prints_pretty_json() {
    let server = MockServer::start();
    let cfg = tempdir().expect("tempdir");
    let list = server.mock(|when, then| {
        when.method(GET).path("/service/queue/v1/runs");
        then.status(200)
            .json_body_obj(&serde_json::json!({"runs": ["a", "b"]}));
    });

    runqctl(&server, &cfg)
        .args(["run", "list"])
        .assert()
        .success()
        .stdout("{\n  \"runs\": [\n    \"a\",\n    \"b\"\n  ]\n}\n");

    list.assert();
}

#[test]
fn run_add_posts_multipart_spec_file() {
    let server = MockServer::start();
    let cfg = tempdir().expect("tempdir");
    let spec = cfg.path().join("nightly.yml");
    fs::write(&spec, "name: nightly\ncount: 3\n").expect("write");

    let add = server.mock(|when, then| {
        when.method(POST)
            .path("/service/queue/v1/runs")
            .header_exists("content-type")
            .body_contains("Content-Disposition: form-data; name=\"type\"\r\n\r\nspark\r\n")
            .body_contains("name=\"file\"; filename=\"nightly.yml\"")
            .body_contains("name: nightly\ncount: 3\n");
        then.status(200)
            .json_body_obj(&serde_json::json!({"name": "nightly", "status": "queued"}));
    });

    runqctl(&server, &cfg)
        .args(["run", "add", "spark", spec.to_str().expect("path")])
        .assert()
        .success()
        .stdout(contains("\"name\": \"nightly\""));

    add.assert();
}

#[test]
fn run_add_reads_spec_from_stdin() {
    let server = MockServer::start();
    let cfg = tempdir().expect("tempdir");

    let add = server.mock(|when, then| {
        when.method(POST)
            .path("/service/queue/v1/runs")
            .body_contains("spark\r\n")
            .body_contains("filename=\"stdin\"")
            .body_contains("name: piped\n");
        then.status(200)
            .json_body_obj(&serde_json::json!({"name": "piped"}));
    });

    runqctl(&server, &cfg)
        .args(["runs", "add", "spark", "stdin"])
        .write_stdin("name: piped\n")
        .assert()
        .success()
        .stderr(contains("Reading spec file from stdin..."))
        .stdout(contains("\"name\": \"piped\""));

    add.assert();
}

#[test]
fn run_add_with_missing_file_sends_nothing() {
    let server = MockServer::start();
    let cfg = tempdir().expect("tempdir");
    let missing = cfg.path().join("missing.yml");

    let any = server.mock(|_when, then| {
        then.status(200).json_body_obj(&serde_json::json!({}));
    });

    runqctl(&server, &cfg)
        .args(["run", "add", "spark", missing.to_str().expect("path")])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("Failed to read specified run spec file"))
        .stderr(contains("missing.yml"));

    assert_eq!(any.hits(), 0, "no request may be sent for an unreadable spec");
}

#[test]
fn run_remove_deletes_named_run() {
    let server = MockServer::start();
    let cfg = tempdir().expect("tempdir");
    let remove = server.mock(|when, then| {
        when.method(DELETE).path("/service/queue/v1/runs/myrun");
        then.status(200)
            .json_body_obj(&serde_json::json!({"message": "Run myrun removed"}));
    });

    runqctl(&server, &cfg)
        .args(["run", "remove", "myrun"])
        .assert()
        .success()
        .stdout(contains("\"message\": \"Run myrun removed\""));

    remove.assert();
}

#[test]
fn transport_errors_pass_through() {
    let server = MockServer::start();
    let cfg = tempdir().expect("tempdir");
    let remove = server.mock(|when, then| {
        when.method(DELETE).path("/service/queue/v1/runs/ghost");
        then.status(404)
            .json_body_obj(&serde_json::json!({"message": "Run ghost not found"}));
    });

    runqctl(&server, &cfg)
        .args(["run", "remove", "ghost"])
        .assert()
        .failure()
        .code(4)
        .stderr(contains("status=404"))
        .stderr(contains("Run ghost not found"));

    remove.assert();
}

#[test]
fn auth_token_is_forwarded() {
    let server = MockServer::start();
    let cfg = tempdir().expect("tempdir");
    let list = server.mock(|when, then| {
        when.method(GET)
            .path("/service/queue/v1/runs")
            .header("authorization", "token=secret");
        then.status(200).json_body_obj(&serde_json::json!({"runs": []}));
    });

    runqctl(&server, &cfg)
        .args(["--token", "secret", "run", "list"])
        .assert()
        .success();

    list.assert();
}

#[test]
fn service_name_selects_service_path() {
    let server = MockServer::start();
    let cfg = tempdir().expect("tempdir");
    let list = server.mock(|when, then| {
        when.method(GET).path("/service/batch-queue/v1/runs");
        then.status(200).json_body_obj(&serde_json::json!({"runs": []}));
    });

    runqctl(&server, &cfg)
        .args(["--service-name", "batch-queue", "run", "list"])
        .assert()
        .success();

    list.assert();
}

#[test]
fn missing_base_url_is_usage_error() {
    let cfg = tempdir().expect("tempdir");
    runqctl_bare(&cfg)
        .args(["run", "list"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("Missing cluster base URL"));
}

#[test]
fn saved_config_supplies_base_url() {
    let server = MockServer::start();
    let cfg = tempdir().expect("tempdir");
    let list = server.mock(|when, then| {
        when.method(GET).path("/service/queue/v1/runs");
        then.status(200).json_body_obj(&serde_json::json!({"runs": []}));
    });

    runqctl(&server, &cfg)
        .args(["--save-config", "run", "list"])
        .assert()
        .success();
    runqctl_bare(&cfg)
        .args(["run", "list"])
        .assert()
        .success();

    assert_eq!(list.hits(), 2);
    let saved = fs::read_to_string(cfg.path().join("config.json")).expect("config");
    assert!(saved.contains(&server.base_url()));
}

#[test]
fn run_remove_rejects_dot_and_empty_names() {
    let server = MockServer::start();
    let cfg = tempdir().expect("tempdir");
    let any = server.mock(|_when, then| {
        then.status(200)
            .json_body_obj(&serde_json::json!({"deleted": "collection"}));
    });

    for name in [".", "..", ""] {
        runqctl(&server, &cfg)
            .args(["run", "remove", name])
            .assert()
            .failure()
            .code(2)
            .stderr(contains("invalid name"));
    }

    assert_eq!(any.hits(), 0);
}

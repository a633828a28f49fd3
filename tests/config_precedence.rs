use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::atomic::{AtomicU64, Ordering};

const ARTIFACT: &str = r#"
{
  "body": {
    "spec": { "qa_categories": [{ "name": "accuracy" }] },
    "results": {
      "accuracy": {
        "e1": {
          "type": "Success",
          "metadata": { "measurement_type": "Accuracy", "identifier": { "name": "e1" } },
          "message": "ok"
        },
        "e2": {
          "type": "Failure",
          "metadata": { "measurement_type": "Accuracy", "identifier": { "name": "e2" } },
          "message": "below threshold"
        },
        "e3": {
          "type": "Info",
          "metadata": { "measurement_type": "Accuracy", "identifier": { "name": "e3" } },
          "message": "see details"
        }
      }
    }
  }
}
"#;

fn speclens_cmd(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_speclens"));
    cmd.env("HOME", home);
    cmd.env_remove("SPECLENS_CONFIG");
    cmd.env_remove("SPECLENS_UI_COLOR");
    cmd.env_remove("SPECLENS_UI_MAX_TABLE_ROWS");
    cmd.env_remove("SPECLENS_REPORT_INCLUDE_MESSAGES");
    cmd
}

fn run(home: &Path, args: &[&str]) -> Output {
    speclens_cmd(home)
        .args(args)
        .output()
        .expect("run speclens")
}

fn make_temp_home() -> PathBuf {
    static HOME_SEQ: AtomicU64 = AtomicU64::new(0);
    let seq = HOME_SEQ.fetch_add(1, Ordering::Relaxed);
    let home =
        std::env::temp_dir().join(format!("speclens-config-test-{}-{seq}", std::process::id()));
    let _ = std::fs::remove_dir_all(&home);
    std::fs::create_dir_all(&home).expect("create home");
    home
}

fn write_file(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("mkdirs");
    }
    std::fs::write(path, bytes).expect("write");
}

fn write_artifact(home: &Path) -> PathBuf {
    let path = home.join("artifact.json");
    write_file(path.as_path(), ARTIFACT.as_bytes());
    path
}

#[test]
fn config_max_table_rows_caps_findings_table() {
    let home = make_temp_home();
    let artifact = write_artifact(&home);
    write_file(
        home.join(".config/speclens/config.toml").as_path(),
        br#"
[ui]
max_table_rows = 1
"#,
    );

    let out = run(&home, &["findings", "--input", artifact.to_str().unwrap()]);
    assert!(
        out.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&out.stderr)
    );

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.contains("Findings (1 of 3 shown):"),
        "stdout={stdout}"
    );

    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn config_can_exclude_messages_from_report() {
    let home = make_temp_home();
    let artifact = write_artifact(&home);
    write_file(
        home.join(".config/speclens/config.toml").as_path(),
        br#"
[report]
include_messages = false
"#,
    );

    let out = run(&home, &["report", "--input", artifact.to_str().unwrap()]);
    assert!(out.status.success());

    let v: serde_json::Value = serde_json::from_slice(&out.stdout).expect("parse json");
    let findings = v
        .get("findings")
        .and_then(|f| f.as_array())
        .expect("findings array");
    assert_eq!(findings.len(), 3);
    for f in findings {
        assert_eq!(f.get("message").and_then(|m| m.as_str()), Some(""));
    }

    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn cli_config_path_overrides_env_config_path() {
    let home = make_temp_home();
    let artifact = write_artifact(&home);

    let cfg_env = home.join("env-config.toml");
    let cfg_cli = home.join("cli-config.toml");
    write_file(
        cfg_env.as_path(),
        br#"
[ui]
max_table_rows = 1
"#,
    );
    write_file(
        cfg_cli.as_path(),
        br#"
[ui]
max_table_rows = 2
"#,
    );

    let out = {
        let mut cmd = speclens_cmd(&home);
        cmd.env("SPECLENS_CONFIG", &cfg_env);
        cmd.args(["findings", "--input"]);
        cmd.arg(&artifact);
        cmd.args(["--config"]);
        cmd.arg(&cfg_cli);
        cmd.output().expect("run speclens")
    };
    assert!(out.status.success());

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.contains("Findings (2 of 3 shown):"),
        "stdout={stdout}"
    );

    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn config_show_emits_effective_config() {
    let home = make_temp_home();
    write_file(
        home.join(".config/speclens/config.toml").as_path(),
        br#"
[ui]
max_table_rows = 3
"#,
    );

    let out = run(&home, &["config", "--show"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("max_table_rows = 3"), "stdout={stdout}");
    assert!(stdout.contains("config_path"), "stdout={stdout}");

    let _ = std::fs::remove_dir_all(&home);
}

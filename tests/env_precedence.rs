use std::path::{Path, PathBuf};
use std::process::Command;
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

fn base_cmd(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_speclens"));
    cmd.env("HOME", home);
    cmd.env_remove("SPECLENS_CONFIG");
    cmd.env_remove("SPECLENS_UI_COLOR");
    cmd.env_remove("SPECLENS_UI_MAX_TABLE_ROWS");
    cmd.env_remove("SPECLENS_REPORT_INCLUDE_MESSAGES");
    cmd
}

fn make_temp_home() -> PathBuf {
    static HOME_SEQ: AtomicU64 = AtomicU64::new(0);
    let seq = HOME_SEQ.fetch_add(1, Ordering::Relaxed);
    let home = std::env::temp_dir().join(format!("speclens-env-test-{}-{seq}", std::process::id()));
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

#[test]
fn env_overrides_config_file() {
    let home = make_temp_home();
    let artifact = home.join("artifact.json");
    write_file(artifact.as_path(), ARTIFACT.as_bytes());
    write_file(
        home.join(".config/speclens/config.toml").as_path(),
        br#"
[ui]
max_table_rows = 5
"#,
    );

    let out = {
        let mut cmd = base_cmd(&home);
        cmd.env("SPECLENS_UI_MAX_TABLE_ROWS", "1");
        cmd.args(["findings", "--input"]);
        cmd.arg(&artifact);
        cmd.output().expect("run speclens")
    };
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
fn invalid_env_boolean_exits_2() {
    let home = make_temp_home();

    let out = {
        let mut cmd = base_cmd(&home);
        cmd.env("SPECLENS_UI_COLOR", "sometimes");
        cmd.args(["config", "--show"]);
        cmd.output().expect("run speclens")
    };
    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("SPECLENS_UI_COLOR"), "stderr={stderr}");

    let _ = std::fs::remove_dir_all(&home);
}

//! Shared test infrastructure for integration tests.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// A scratch directory holding a config file and a workbook path, so the
/// binary never touches the user's real config or data directories.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn create() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        std::fs::write(
            dir.path().join("config.json"),
            br#"{"schema_version": 1, "max_prompt_attempts": 3}"#,
        )
        .expect("write config");
        Self { dir }
    }

    pub fn workbook(&self) -> PathBuf {
        self.dir.path().join("pool.json")
    }

    pub fn config(&self) -> PathBuf {
        self.dir.path().join("config.json")
    }

    /// Run `redeploy` with `args`, feeding `stdin` lines and capturing output.
    pub fn redeploy(&self, args: &[&str], stdin: &[&str]) -> Output {
        let mut command = Command::new(env!("CARGO_BIN_EXE_redeploy"));
        command
            .args(args)
            .arg("--config")
            .arg(self.config())
            .arg("--workbook")
            .arg(self.workbook())
            .env_remove("RUST_LOG")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if stdin.is_empty() {
            return command
                .stdin(Stdio::null())
                .output()
                .expect("run redeploy");
        }

        let mut child = command
            .stdin(Stdio::piped())
            .spawn()
            .expect("spawn redeploy");
        let mut input = stdin.join("\n");
        input.push('\n');
        let mut pipe = child.stdin.take().expect("stdin piped");
        // The session may end before it reads every scripted line.
        if let Err(err) = pipe.write_all(input.as_bytes()) {
            assert_eq!(err.kind(), std::io::ErrorKind::BrokenPipe, "write stdin: {err}");
        }
        drop(pipe);
        child.wait_with_output().expect("wait for redeploy")
    }

    pub fn read_workbook(&self) -> serde_json::Value {
        read_json(&self.workbook())
    }
}

fn read_json(path: &Path) -> serde_json::Value {
    let text = std::fs::read_to_string(path).expect("read workbook");
    serde_json::from_str(&text).expect("parse workbook")
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

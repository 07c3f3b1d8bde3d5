//! Thin wrapper around external command invocation.
//!
//! Every pipeline step that shells out goes through [`run`], which captures
//! output and turns a spawn failure or non-zero exit into a descriptive
//! message. Callers map that message into their own step error variant.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

/// Captured output of a completed external command.
#[derive(Debug)]
pub struct CmdOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Render a command line for log and error messages.
pub fn render(program: &str, args: &[String]) -> String {
    let mut line = String::from(program);
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

/// Run an external command to completion, capturing stdout and stderr.
///
/// Returns a human-readable error string when the command cannot be
/// spawned or exits non-zero; the tail of stderr is included so the
/// underlying tool's message survives into the step failure.
pub async fn run(
    program: &str,
    args: &[String],
    cwd: Option<&Path>,
) -> std::result::Result<CmdOutput, String> {
    let line = render(program, args);
    debug!(command = %line, cwd = ?cwd, "running external command");

    let mut command = Command::new(program);
    command.args(args).stdin(Stdio::null());
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    let output = command
        .output()
        .await
        .map_err(|e| format!("failed to run `{line}`: {e}"))?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        return Err(format!(
            "`{line}` exited with {}: {}",
            output.status,
            tail(&stderr, 20)
        ));
    }

    Ok(CmdOutput { stdout, stderr })
}

/// Last `max_lines` lines of a command's stderr, trimmed.
fn tail(text: &str, max_lines: usize) -> String {
    let trimmed = text.trim();
    let lines: Vec<&str> = trimmed.lines().collect();
    if lines.len() <= max_lines {
        trimmed.to_string()
    } else {
        lines[lines.len() - max_lines..].join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn run_captures_stdout() {
        let out = run("echo", &["hello".to_string()], None).await.unwrap();
        assert_eq!(out.stdout.trim(), "hello");
    }

    #[tokio::test]
    async fn run_reports_nonzero_exit() {
        let err = run("false", &[], None).await.unwrap_err();
        assert!(err.contains("exited with"), "unexpected message: {err}");
    }

    #[tokio::test]
    async fn run_reports_spawn_failure() {
        let err = run("docforge-no-such-binary-437", &[], None)
            .await
            .unwrap_err();
        assert!(err.contains("failed to run"), "unexpected message: {err}");
    }

    #[test]
    fn render_joins_program_and_args() {
        let args = vec!["clone".to_string(), "url".to_string()];
        assert_eq!(render("git", &args), "git clone url");
    }

    #[test]
    fn tail_keeps_last_lines() {
        let text = (0..30).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        let tailed = tail(&text, 20);
        assert!(tailed.starts_with("10"));
        assert!(tailed.ends_with("29"));
    }
}

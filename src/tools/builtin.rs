//! Built-in harness tools.
//!
//! The named capabilities the environment-setup agent is wired with: `shell`
//! (subprocess executor), `read_file` / `write_file` (file helpers), and
//! `run_dockerfile` (container build-and-run executor). Each is constructed
//! via [`AgentTool::new`] and returned as `Arc<dyn Tool>`; each returns its
//! result as model-visible JSON text.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use super::tool::{AgentTool, Tool, ToolError};
use super::types::ToolParameters;

const SHELL_OUTPUT_MAX_BYTES: usize = 32_768;
const READ_FILE_MAX_BYTES: usize = 65_536;
const DOCKER_OUTPUT_MAX_BYTES: usize = 32_768;
const SHELL_TIMEOUT: Duration = Duration::from_secs(30);
const DOCKER_BUILD_TIMEOUT: Duration = Duration::from_secs(1500);
const DOCKER_RUN_TIMEOUT: Duration = Duration::from_secs(60);

fn truncate_utf8(s: &str, max_bytes: usize) -> String {
    if s.len() <= max_bytes {
        return s.to_string();
    }

    let mut cutoff = max_bytes;
    while cutoff > 0 && !s.is_char_boundary(cutoff) {
        cutoff -= 1;
    }
    s[..cutoff].to_string()
}

fn capped(stdout: &[u8], stderr: &[u8], max_bytes: usize) -> (String, bool) {
    let stdout = String::from_utf8_lossy(stdout);
    let stderr = String::from_utf8_lossy(stderr);
    let mut combined = format!("{stdout}{stderr}");
    let truncated = combined.len() > max_bytes;
    if truncated {
        combined = truncate_utf8(&combined, max_bytes);
        combined.push_str("\n... (truncated)");
    }
    (combined, truncated)
}

async fn run_command(
    tool_name: &str,
    mut command: tokio::process::Command,
    timeout: Duration,
) -> Result<std::process::Output, ToolError> {
    match tokio::time::timeout(timeout, command.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => Err(ToolError::execution(format!("{tool_name}: {e}"))),
        Err(_) => Err(ToolError::execution(format!(
            "{tool_name} timed out after {}s",
            timeout.as_secs()
        ))),
    }
}

/// Create the `shell` tool — executes a shell command via `sh -c`.
///
/// Captures stdout and stderr, applies a 30-second timeout, and truncates
/// output beyond 32 KB to prevent context explosion.
pub fn shell_tool() -> Arc<dyn Tool> {
    Arc::new(AgentTool::new(
        "shell",
        "Execute a shell command and return its output",
        ToolParameters::object()
            .string("command", "The shell command to execute", true)
            .build(),
        |args| async move {
            let command = args.get_str("command")?;

            let mut cmd = tokio::process::Command::new("sh");
            cmd.arg("-c").arg(command);
            let output = run_command("shell", cmd, SHELL_TIMEOUT).await?;

            let (combined, truncated) =
                capped(&output.stdout, &output.stderr, SHELL_OUTPUT_MAX_BYTES);
            Ok(serde_json::json!({
                "exit_code": output.status.code(),
                "output": combined,
                "truncated": truncated,
            })
            .to_string())
        },
    ))
}

/// Create the `read_file` tool — reads a file as UTF-8 text.
///
/// Returns the content, the byte count, and a truncation flag. Content is
/// capped at 64 KB with a trailing note when truncated.
pub fn read_file_tool() -> Arc<dyn Tool> {
    Arc::new(AgentTool::new(
        "read_file",
        "Read a file's contents as UTF-8 text",
        ToolParameters::object()
            .string("path", "Path to the file to read", true)
            .build(),
        |args| async move {
            let path = args.get_str("path")?;

            let content = tokio::fs::read_to_string(path)
                .await
                .map_err(|e| ToolError::execution(format!("{path}: {e}")))?;

            let total_bytes = content.len();
            let truncated = total_bytes > READ_FILE_MAX_BYTES;
            let display = if truncated {
                let mut s = truncate_utf8(&content, READ_FILE_MAX_BYTES);
                s.push_str("\n... (truncated)");
                s
            } else {
                content
            };

            Ok(serde_json::json!({
                "content": display,
                "bytes": total_bytes,
                "truncated": truncated,
            })
            .to_string())
        },
    ))
}

/// Create the `write_file` tool — writes content to a file.
///
/// Creates parent directories when they do not exist. Returns the written
/// byte count and the resolved path.
pub fn write_file_tool() -> Arc<dyn Tool> {
    Arc::new(AgentTool::new(
        "write_file",
        "Write content to a file, creating parent directories if needed",
        ToolParameters::object()
            .string("path", "Path to the file to write", true)
            .string("content", "Content to write to the file", true)
            .build(),
        |args| async move {
            let path = args.get_str("path")?.to_string();
            let content = args.get_str("content")?.to_string();

            if let Some(parent) = Path::new(&path).parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await.map_err(|e| {
                        ToolError::execution(format!(
                            "failed to create directories for {path}: {e}"
                        ))
                    })?;
                }
            }

            let bytes = content.len();
            tokio::fs::write(&path, content)
                .await
                .map_err(|e| ToolError::execution(format!("{path}: {e}")))?;

            Ok(serde_json::json!({
                "success": true,
                "path": path,
                "bytes_written": bytes,
            })
            .to_string())
        },
    ))
}

/// Create the `run_dockerfile` tool — builds an image from a Dockerfile and
/// runs it once.
///
/// The image is tagged from the Dockerfile's stem, the container runs with
/// `--rm`, and the combined build+run log is written to `log.txt` next to
/// the Dockerfile. Build is capped at 25 minutes, the run at 60 seconds;
/// the returned log is truncated to 32 KB.
pub fn run_dockerfile_tool() -> Arc<dyn Tool> {
    Arc::new(AgentTool::new(
        "run_dockerfile",
        "Build a Docker image from a Dockerfile, run it, and capture the logs",
        ToolParameters::object()
            .string("dockerfile", "Path to the Dockerfile to build", true)
            .string("context", "Build context directory (defaults to the current directory)", false)
            .build(),
        |args| async move {
            let dockerfile = args.get_str("dockerfile")?.to_string();
            let context = args.opt_str("context").unwrap_or(".").to_string();

            let dockerfile_path = Path::new(&dockerfile);
            if !dockerfile_path.exists() {
                return Err(ToolError::execution(format!(
                    "Dockerfile not found: {dockerfile}"
                )));
            }

            let image_name = format!(
                "envgym_{}",
                dockerfile_path
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_lowercase())
                    .unwrap_or_else(|| "build".to_string())
            );

            let mut build = tokio::process::Command::new("docker");
            build
                .args(["build", "-t", &image_name, "-f", &dockerfile])
                .arg(&context);
            let build_output = run_command("run_dockerfile", build, DOCKER_BUILD_TIMEOUT).await?;
            let (build_log, _) = capped(
                &build_output.stdout,
                &build_output.stderr,
                DOCKER_OUTPUT_MAX_BYTES,
            );
            let build_success = build_output.status.success();

            let (run_log, run_success) = if build_success {
                let mut run = tokio::process::Command::new("docker");
                run.args(["run", "--rm", &image_name]);
                let run_output = run_command("run_dockerfile", run, DOCKER_RUN_TIMEOUT).await?;
                let (log, _) = capped(
                    &run_output.stdout,
                    &run_output.stderr,
                    DOCKER_OUTPUT_MAX_BYTES,
                );
                (log, run_output.status.success())
            } else {
                (String::new(), false)
            };

            let log_path = dockerfile_path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| p.join("log.txt"))
                .unwrap_or_else(|| "log.txt".into());
            let full_log = format!("=== build ===\n{build_log}\n=== run ===\n{run_log}\n");
            tokio::fs::write(&log_path, &full_log)
                .await
                .map_err(|e| ToolError::execution(format!("{}: {e}", log_path.display())))?;

            Ok(serde_json::json!({
                "success": build_success && run_success,
                "build_success": build_success,
                "run_success": run_success,
                "image_name": image_name,
                "log_file": log_path.display().to_string(),
                "log": full_log,
            })
            .to_string())
        },
    ))
}

/// All built-in tools, in the order the harness registers them.
pub fn all_tools() -> Vec<Arc<dyn Tool>> {
    vec![
        shell_tool(),
        read_file_tool(),
        write_file_tool(),
        run_dockerfile_tool(),
    ]
}

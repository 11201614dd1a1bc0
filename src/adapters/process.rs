use crate::domain::model::{Invocation, ToolStatus};
use crate::domain::ports::Compressor;
use crate::utils::error::{CompressError, Result};
use std::path::Path;
use tokio::process::Command;

const STDERR_TAIL_LINES: usize = 20;

/// Runs the compression tool as a child process and waits for it to exit.
#[derive(Debug, Clone, Default)]
pub struct ProcessCompressor;

impl ProcessCompressor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl Compressor for ProcessCompressor {
    async fn compress(&self, working_dir: &Path, invocation: &Invocation) -> Result<ToolStatus> {
        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(working_dir)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| CompressError::ToolLaunchError {
                program: invocation.program.clone(),
                source,
            })?;

        // 工具輸出僅在除錯模式記錄
        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            tracing::debug!("{} stdout:\n{}", invocation.program, stdout.trim_end());
        }

        Ok(ToolStatus {
            exit_code: output.status.code(),
            success: output.status.success(),
            stderr: tail(&String::from_utf8_lossy(&output.stderr), STDERR_TAIL_LINES),
        })
    }
}

/// Last `lines` non-empty lines of `text`.
fn tail(text: &str, lines: usize) -> String {
    let kept: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = kept.len().saturating_sub(lines);
    kept[start..].join("\n")
}

//! Claude CLI連携
//!
//! `claude -p` に画像パスを含むプロンプトを渡し、標準出力を応答とする。

use super::VisionClient;
use crate::error::{CityConnectError, Result};
use crate::scanner::ImageInput;
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, Default)]
pub struct ClaudeCli;

impl ClaudeCli {
    pub fn new() -> Self {
        Self
    }
}

impl VisionClient for ClaudeCli {
    async fn describe_image(&self, image: &ImageInput, prompt: &str) -> Result<String> {
        let abs_path = std::fs::canonicalize(&image.path)?;
        let full_prompt = build_cli_prompt(&abs_path.display().to_string(), prompt);

        debug!(prompt_len = full_prompt.len(), "running claude cli");
        let response = run_claude_cli(&full_prompt).await?;
        debug!(response_len = response.len(), "claude cli finished");

        Ok(response)
    }
}

/// 改行をスペースに置換した1行のプロンプトを作る
///
/// `"` のエスケープは cmd /c を経由する Windows のみ。
/// それ以外は引数としてそのまま渡るのでエスケープしない。
fn build_cli_prompt(image_path: &str, prompt: &str) -> String {
    let raw_prompt = format!(
        "Read the following image file and analyze it: {}\n\n{}",
        image_path.replace('\\', "/"),
        prompt
    );
    let single_line = raw_prompt.replace('\n', " ");

    #[cfg(windows)]
    let single_line = single_line.replace('"', "\\\"");

    single_line
}

async fn run_claude_cli(prompt: &str) -> Result<String> {
    // Windowsではcmd /c経由
    #[cfg(windows)]
    let output = Command::new("cmd")
        .args(["/c", "claude", "-p", prompt, "--output-format", "text"])
        .output()
        .await
        .map_err(|e| CityConnectError::CliExecution(format!("Claude CLI実行エラー: {}", e)))?;

    #[cfg(not(windows))]
    let output = Command::new("claude")
        .args(["-p", prompt, "--output-format", "text"])
        .output()
        .await
        .map_err(|e| CityConnectError::CliExecution(format!("Claude CLI実行エラー: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CityConnectError::CliExecution(format!(
            "Claude CLI failed (code {:?}): {}",
            output.status.code(),
            stderr
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

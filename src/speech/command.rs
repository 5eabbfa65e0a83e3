//! External player and synthesizer processes

use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::SpeechError;

/// Placeholder replaced by the text to speak
const TEXT_PLACEHOLDER: &str = "{text}";

/// A program plus arguments, parsed from a config string such as
/// `espeak-ng -v th -s 140 {text}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    pub fn parse(line: &str) -> Result<Self, SpeechError> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or(SpeechError::NoCommand)?;
        Ok(Self { program, args: parts.collect() })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments with `{text}` substituted, or the text appended when the
    /// placeholder is absent
    pub fn args_for(&self, text: &str) -> Vec<String> {
        if self.args.iter().any(|a| a.contains(TEXT_PLACEHOLDER)) {
            self.args.iter().map(|a| a.replace(TEXT_PLACEHOLDER, text)).collect()
        } else {
            let mut args = self.args.clone();
            args.push(text.to_string());
            args
        }
    }

    /// Run with `text` as an argument and wait for it to finish
    pub async fn run(&self, text: &str) -> Result<(), SpeechError> {
        let mut command = Command::new(&self.program);
        command.args(self.args_for(text)).stdin(Stdio::null());
        self.wait(command, None).await
    }

    /// Run with `input` piped to stdin (audio bytes for a player)
    pub async fn run_with_input(&self, input: &[u8]) -> Result<(), SpeechError> {
        let mut command = Command::new(&self.program);
        command.args(&self.args).stdin(Stdio::piped());
        self.wait(command, Some(input)).await
    }

    async fn wait(&self, mut command: Command, input: Option<&[u8]>) -> Result<(), SpeechError> {
        let mut child = command
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| SpeechError::Spawn { program: self.program.clone(), source })?;

        if let (Some(input), Some(mut stdin)) = (input, child.stdin.take()) {
            stdin.write_all(input).await?;
            // Dropping stdin closes the pipe so the player sees EOF
        }

        let status = child.wait().await?;
        if status.success() {
            Ok(())
        } else {
            Err(SpeechError::Exit { program: self.program.clone(), code: status.code() })
        }
    }
}

//! Error types for pronunciation playback

use thiserror::Error;

/// Errors from a single pronunciation attempt
#[derive(Debug, Error)]
pub enum SpeechError {
    /// Nothing to say
    #[error("Nothing to pronounce")]
    EmptyText,

    /// The command line in the config is empty
    #[error("No command configured")]
    NoCommand,

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The TTS service answered with a non-success status
    #[error("TTS service responded with {0}")]
    Status(u16),

    /// A player or synthesizer could not be started
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    /// A player or synthesizer exited unsuccessfully
    #[error("{program} exited with status {code:?}")]
    Exit {
        program: String,
        code: Option<i32>,
    },

    /// Piping audio to the player failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpeechError {
    /// Whether trying the same path again could succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SpeechError::Request(_) | SpeechError::Status(_))
    }

    /// Whether the failure is a missing or broken local setup
    pub fn is_misconfigured(&self) -> bool {
        matches!(self, SpeechError::NoCommand | SpeechError::Spawn { .. })
    }
}

//! Configuration management for swipedeck

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::deck::Filter;
use crate::nav::CardOptions;
use crate::theme::Theme;

/// Pronunciation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Whether `p` pronounces the current card
    pub enabled: bool,

    /// Remote TTS endpoint returning MP3 audio
    pub tts_endpoint: String,

    /// Language code sent to the TTS service
    pub language: String,

    /// Player that reads audio from stdin
    pub player: String,

    /// Local synthesizer used when the remote path fails; `{text}` is
    /// replaced by the text to speak
    pub synth: String,

    /// Hard limit for one pronunciation attempt, fallback included
    pub timeout_ms: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tts_endpoint: "https://translate.google.com/translate_tts".to_string(),
            language: "th".to_string(),
            player: "mpv --no-video --really-quiet -".to_string(),
            synth: "espeak-ng -v th -s 140 {text}".to_string(),
            timeout_ms: 5000,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Selected theme name
    pub theme: String,

    /// Animation speed multiplier (1.0 = normal, 0.0 = instant)
    pub animation_speed: f32,

    /// Vim mode enabled (h/l navigate as well as the arrows)
    pub vim_mode: bool,

    /// Minimum swipe, in units, that navigates
    pub swipe_threshold: f32,

    /// Exit animation length at normal speed
    pub exit_duration_ms: u64,

    /// Units per terminal column when measuring drags
    pub units_per_column: f32,

    /// Browse mode wraps from the last card to the first
    pub browse_wrap_around: bool,

    /// Filter used for the first deck
    pub default_filter: Filter,

    pub audio: AudioConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "Tokyo Night".to_string(),
            animation_speed: 1.0,
            vim_mode: true,
            swipe_threshold: 80.0,
            exit_duration_ms: 200,
            units_per_column: 8.0,
            browse_wrap_around: true,
            default_filter: Filter::All,
            audio: AudioConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from disk, or create default if not exists
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config from {:?}", config_path))?;
            serde_json::from_str(&contents).with_context(|| "Failed to parse config.json")
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let contents =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        std::fs::write(&config_path, contents)
            .with_context(|| format!("Failed to write config to {:?}", config_path))?;

        Ok(())
    }

    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("", "", "swipedeck")
            .context("Failed to determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.json"))
    }

    /// Get the data directory path
    pub fn data_dir() -> Result<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("", "", "swipedeck").context("Failed to determine data directory")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    /// Where the log file goes (the TUI owns stdout)
    pub fn log_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("swipedeck.log"))
    }

    /// Exit duration scaled by the animation speed
    pub fn exit_duration(&self) -> Duration {
        let speed = f64::from(self.animation_speed.max(0.0));
        Duration::from_millis((self.exit_duration_ms as f64 * speed).round() as u64)
    }

    /// Card options for browse mode
    pub fn browse_options(&self) -> CardOptions {
        CardOptions { wrap_around: self.browse_wrap_around, ..self.practice_options() }
    }

    /// Card options for practice mode (never wraps; a session runs out)
    pub fn practice_options(&self) -> CardOptions {
        CardOptions {
            wrap_around: false,
            threshold: self.swipe_threshold,
            exit_duration: self.exit_duration(),
            units_per_column: self.units_per_column,
        }
    }

    /// Get the active theme
    pub fn active_theme(&self) -> Theme {
        Theme::by_name(&self.theme)
    }
}

//! Pronunciation playback
//!
//! The core only sees [`Pronounce`]. [`FallbackSpeaker`] is the adapter the
//! app uses: remote TTS first, local synthesis once if that fails, and a
//! hard timeout over both so the busy indicator always clears.

pub mod command;
pub mod error;
pub mod remote;

use std::future::Future;
use std::time::{Duration, Instant};

pub use command::CommandLine;
pub use error::SpeechError;
pub use remote::RemoteTts;

use crate::config::AudioConfig;

/// Something that can say a piece of text out loud
pub trait Pronounce {
    fn play(&self, text: &str) -> impl Future<Output = Result<(), SpeechError>> + Send;
}

/// Local synthesizer, e.g. `espeak-ng`
#[derive(Debug, Clone)]
pub struct LocalSynth {
    command: CommandLine,
}

impl LocalSynth {
    pub fn new(command: CommandLine) -> Self {
        Self { command }
    }
}

impl Pronounce for LocalSynth {
    async fn play(&self, text: &str) -> Result<(), SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::EmptyText);
        }
        self.command.run(text).await
    }
}

/// How a pronunciation attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Primary,
    Fallback,
    Failed,
    TimedOut,
    Cancelled,
}

impl PlayOutcome {
    pub fn is_success(self) -> bool {
        matches!(self, PlayOutcome::Primary | PlayOutcome::Fallback)
    }
}

/// Primary path, one fallback, bounded by a timeout. Never returns an error.
#[derive(Debug, Clone)]
pub struct FallbackSpeaker<P, S> {
    primary: P,
    secondary: S,
    timeout: Duration,
}

impl<P: Pronounce, S: Pronounce> FallbackSpeaker<P, S> {
    pub fn new(primary: P, secondary: S, timeout: Duration) -> Self {
        Self { primary, secondary, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn play(&self, text: &str) -> PlayOutcome {
        let attempt = async {
            let Err(e) = self.primary.play(text).await else {
                return PlayOutcome::Primary;
            };
            tracing::warn!(
                error = %e,
                recoverable = e.is_recoverable(),
                "primary pronunciation failed, falling back"
            );

            match self.secondary.play(text).await {
                Ok(()) => PlayOutcome::Fallback,
                Err(e) => {
                    tracing::warn!(error = %e, "fallback pronunciation failed");
                    PlayOutcome::Failed
                }
            }
        };

        match tokio::time::timeout(self.timeout, attempt).await {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::warn!(timeout_ms = self.timeout.as_millis() as u64, "pronunciation timed out");
                PlayOutcome::TimedOut
            }
        }
    }
}

/// The speaker built from the audio config
pub type Speaker = FallbackSpeaker<RemoteTts, LocalSynth>;

impl Speaker {
    pub fn from_config(config: &AudioConfig) -> Result<Self, SpeechError> {
        let timeout = Duration::from_millis(config.timeout_ms);
        let remote = RemoteTts::new(
            config.tts_endpoint.clone(),
            config.language.clone(),
            CommandLine::parse(&config.player)?,
            timeout,
        )?;
        let synth = LocalSynth::new(CommandLine::parse(&config.synth)?);
        Ok(FallbackSpeaker::new(remote, synth, timeout))
    }
}

/// Busy indicator for pronunciation. Cleared on completion, or forcibly
/// once `limit` has passed so it can never stick.
///
/// Each request gets a ticket; a late outcome from an expired request
/// carries a stale ticket and leaves the current one alone.
#[derive(Debug, Clone)]
pub struct SpeechStatus {
    active: Option<(u64, Instant)>,
    issued: u64,
    limit: Duration,
}

impl SpeechStatus {
    pub fn new(limit: Duration) -> Self {
        Self { active: None, issued: 0, limit }
    }

    pub fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    /// Mark busy and hand out the request's ticket. Refused for empty text
    /// or while already playing.
    pub fn begin(&mut self, text: &str, now: Instant) -> Option<u64> {
        if text.trim().is_empty() || self.is_busy() {
            return None;
        }
        self.issued = self.issued.wrapping_add(1);
        self.active = Some((self.issued, now));
        Some(self.issued)
    }

    /// Clear the indicator if `ticket` is the request in flight
    pub fn finish(&mut self, ticket: u64) -> bool {
        match self.active {
            Some((current, _)) if current == ticket => {
                self.active = None;
                true
            }
            _ => false,
        }
    }

    /// Clear a busy flag held longer than the limit. Returns true if cleared.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.active {
            Some((_, started)) if now.duration_since(started) >= self.limit => {
                self.active = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Succeeds or fails on demand and counts calls
    struct Fake {
        ok: bool,
        calls: AtomicUsize,
    }

    impl Fake {
        fn new(ok: bool) -> Self {
            Self { ok, calls: AtomicUsize::new(0) }
        }
    }

    impl Pronounce for Fake {
        async fn play(&self, _text: &str) -> Result<(), SpeechError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.ok { Ok(()) } else { Err(SpeechError::Status(500)) }
        }
    }

    /// Never finishes
    struct Hang;

    impl Pronounce for Hang {
        async fn play(&self, _text: &str) -> Result<(), SpeechError> {
            std::future::pending().await
        }
    }

    const LONG: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn primary_success_skips_fallback() {
        let speaker = FallbackSpeaker::new(Fake::new(true), Fake::new(true), LONG);
        assert_eq!(speaker.play("ก").await, PlayOutcome::Primary);
        assert_eq!(speaker.secondary.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn primary_failure_falls_back_once() {
        let speaker = FallbackSpeaker::new(Fake::new(false), Fake::new(true), LONG);
        assert_eq!(speaker.play("ก").await, PlayOutcome::Fallback);
        assert_eq!(speaker.primary.calls.load(Ordering::SeqCst), 1);
        assert_eq!(speaker.secondary.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn both_failing_is_reported_not_raised() {
        let speaker = FallbackSpeaker::new(Fake::new(false), Fake::new(false), LONG);
        let outcome = speaker.play("ก").await;
        assert_eq!(outcome, PlayOutcome::Failed);
        assert!(!outcome.is_success());
    }

    #[tokio::test]
    async fn hung_player_times_out() {
        let speaker = FallbackSpeaker::new(Hang, Fake::new(true), Duration::from_millis(20));
        assert_eq!(speaker.play("ก").await, PlayOutcome::TimedOut);
    }

    #[test]
    fn status_refuses_empty_text_and_overlap() {
        let now = Instant::now();
        let mut status = SpeechStatus::new(Duration::from_secs(3));
        assert_eq!(status.begin("  ", now), None);
        let ticket = status.begin("น้ำ", now).unwrap();
        assert_eq!(status.begin("ข้าว", now), None);
        assert!(status.finish(ticket));
        assert!(!status.is_busy());
    }

    #[test]
    fn late_outcome_leaves_newer_request_busy() {
        let now = Instant::now();
        let mut status = SpeechStatus::new(Duration::from_secs(3));
        let first = status.begin("น้ำ", now).unwrap();
        assert!(status.expire(now + Duration::from_secs(3)));

        let second = status.begin("ข้าว", now + Duration::from_secs(4)).unwrap();
        assert_ne!(first, second);
        assert!(!status.finish(first));
        assert!(status.is_busy());
        assert!(status.finish(second));
        assert!(!status.is_busy());
    }

    #[test]
    fn status_expires_after_limit() {
        let now = Instant::now();
        let mut status = SpeechStatus::new(Duration::from_secs(3));
        status.begin("น้ำ", now);
        assert!(!status.expire(now + Duration::from_secs(1)));
        assert!(status.expire(now + Duration::from_secs(3)));
        assert!(!status.is_busy());
    }

    #[tokio::test]
    async fn local_synth_refuses_blank_text() {
        let synth = LocalSynth::new(CommandLine::parse("true").unwrap());
        assert!(matches!(synth.play(" ").await, Err(SpeechError::EmptyText)));
    }

    #[test]
    fn speaker_builds_from_default_config() {
        let speaker = Speaker::from_config(&AudioConfig::default()).unwrap();
        assert_eq!(speaker.timeout(), Duration::from_millis(AudioConfig::default().timeout_ms));
    }
}

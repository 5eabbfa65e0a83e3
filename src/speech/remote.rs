//! Remote text-to-speech: fetch an MP3 and pipe it into a local player

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{REFERER, USER_AGENT};

use super::command::CommandLine;
use super::{Pronounce, SpeechError};

/// Primary pronunciation path
#[derive(Debug, Clone)]
pub struct RemoteTts {
    client: Client,
    endpoint: String,
    language: String,
    player: CommandLine,
}

impl RemoteTts {
    /// Browser-like headers; the public endpoint rejects bare clients
    const USER_AGENT: &'static str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
        AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
    const REFERER: &'static str = "https://translate.google.com/";

    pub fn new(
        endpoint: impl Into<String>,
        language: impl Into<String>,
        player: CommandLine,
        timeout: Duration,
    ) -> Result<Self, SpeechError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint: endpoint.into(), language: language.into(), player })
    }

    /// The GET request for `text`
    pub fn request(&self, text: &str) -> Result<reqwest::Request, SpeechError> {
        let request = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", self.language.as_str()),
                ("q", text),
            ])
            .header(USER_AGENT, Self::USER_AGENT)
            .header(REFERER, Self::REFERER)
            .build()?;
        Ok(request)
    }

    /// Download the audio for `text`
    pub async fn fetch(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::EmptyText);
        }
        let response = self.client.execute(self.request(text)?).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpeechError::Status(status.as_u16()));
        }

        let audio = response.bytes().await?;
        tracing::debug!(bytes = audio.len(), "fetched pronunciation audio");
        Ok(audio.to_vec())
    }
}

impl Pronounce for RemoteTts {
    async fn play(&self, text: &str) -> Result<(), SpeechError> {
        let audio = self.fetch(text).await?;
        self.player.run_with_input(&audio).await
    }
}

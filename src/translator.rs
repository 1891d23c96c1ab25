//! Rate-limited DeepL client.
//!
//! The HTTP call and the passage of time are both behind traits so the
//! limiter can be driven by a fake clock and a canned transport in tests.

use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::Deserialize;

use crate::config::Config;

/// Anything that can turn source-language text into target-language text.
pub trait Translate {
    fn translate(&mut self, text: &str) -> String;
}

pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A single form-encoded POST to the translation endpoint.
pub trait Transport {
    fn post_form(&self, fields: &[(&str, &str)]) -> Result<HttpReply>;
}

#[derive(Debug)]
pub struct DeepLTransport {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl DeepLTransport {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

impl Transport for DeepLTransport {
    fn post_form(&self, fields: &[(&str, &str)]) -> Result<HttpReply> {
        let response = self
            .client
            .post(&self.endpoint)
            .form(fields)
            .send()
            .context("Failed to reach DeepL")?;

        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(HttpReply { status, body })
    }
}

#[derive(Debug, Clone)]
pub struct TranslatorSettings {
    pub api_key: String,
    pub source_lang: String,
    pub target_lang: String,
    pub min_interval: Duration,
}

impl TranslatorSettings {
    pub fn from_config(config: &Config, api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            source_lang: config.source_lang.clone(),
            target_lang: config.target_lang.clone(),
            min_interval: config.min_interval(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DeepLResponse {
    translations: Vec<DeepLTranslation>,
}

#[derive(Debug, Deserialize)]
struct DeepLTranslation {
    text: String,
}

#[derive(Debug)]
pub struct Translator<T: Transport, C: Clock = SystemClock> {
    transport: T,
    clock: C,
    settings: TranslatorSettings,
    last_call: Option<Instant>,
}

impl<T: Transport> Translator<T, SystemClock> {
    pub fn new(transport: T, settings: TranslatorSettings) -> Self {
        Self::with_clock(transport, settings, SystemClock)
    }
}

impl<T: Transport, C: Clock> Translator<T, C> {
    pub fn with_clock(transport: T, settings: TranslatorSettings, clock: C) -> Self {
        Self {
            transport,
            clock,
            settings,
            last_call: None,
        }
    }

    fn wait_for_slot(&self) {
        if let Some(last) = self.last_call {
            let elapsed = self.clock.now().saturating_duration_since(last);
            if elapsed < self.settings.min_interval {
                let wait = self.settings.min_interval - elapsed;
                debug!("Rate limit: waiting {:?} before next translation", wait);
                self.clock.sleep(wait);
            }
        }
    }

    fn request(&self, text: &str) -> Result<Option<String>> {
        let fields = [
            ("auth_key", self.settings.api_key.as_str()),
            ("text", text),
            ("source_lang", self.settings.source_lang.as_str()),
            ("target_lang", self.settings.target_lang.as_str()),
        ];
        let reply = self.transport.post_form(&fields)?;

        if !reply.is_success() {
            warn!("DeepL returned HTTP {} for '{}', keeping original", reply.status, text);
            return Ok(None);
        }

        let parsed: DeepLResponse =
            serde_json::from_str(&reply.body).context("Unexpected DeepL response body")?;
        Ok(parsed.translations.into_iter().next().map(|t| t.text))
    }
}

impl<T: Transport, C: Clock> Translate for Translator<T, C> {
    /// Never fails: any problem yields `text` unchanged.
    fn translate(&mut self, text: &str) -> String {
        self.wait_for_slot();
        let result = self.request(text);
        self.last_call = Some(self.clock.now());

        match result {
            Ok(Some(translated)) => translated,
            Ok(None) => text.to_string(),
            Err(e) => {
                warn!("Translation of '{}' failed: {:#}", text, e);
                text.to_string()
            }
        }
    }
}

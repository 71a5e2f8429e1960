/// Free Dictionary API client
use super::{clean_word, PronunciationLookup};
use crate::config::PronunciationConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// One entry of a dictionary API response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DictionaryEntry {
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub phonetic: Option<String>,
    #[serde(default)]
    pub phonetics: Vec<Phonetic>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Phonetic {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub audio: Option<String>,
}

impl Phonetic {
    fn ipa(&self) -> Option<String> {
        let text = self.text.as_deref()?.trim().trim_matches('/').trim();
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }

    fn is_us(&self) -> bool {
        self.audio
            .as_deref()
            .map(|audio| audio.to_lowercase().contains("-us."))
            .unwrap_or(false)
    }
}

/// Pick a pronunciation from an API response.
///
/// Within each entry a US recording wins, otherwise the first phonetic with
/// text. Surrounding slashes are removed.
pub fn select_pronunciation(entries: &[DictionaryEntry]) -> Option<String> {
    entries.iter().find_map(|entry| {
        entry
            .phonetics
            .iter()
            .filter(|p| p.is_us())
            .find_map(Phonetic::ipa)
            .or_else(|| entry.phonetics.iter().find_map(Phonetic::ipa))
    })
}

/// HTTP lookup against a Free Dictionary compatible endpoint
#[derive(Clone)]
pub struct DictionaryApiClient {
    client: Client,
    endpoint: String,
    max_retries: u32,
}

impl DictionaryApiClient {
    pub fn new(config: &PronunciationConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            max_retries: config.max_retries,
        })
    }

    /// Request URL for a (cleaned) word
    pub fn word_url(&self, word: &str) -> String {
        format!("{}/{}", self.endpoint, urlencoding::encode(word))
    }
}

#[async_trait]
impl PronunciationLookup for DictionaryApiClient {
    async fn lookup(&self, word: &str) -> Result<Option<String>> {
        let clean = clean_word(word);
        if clean.is_empty() {
            return Ok(None);
        }
        let url = self.word_url(&clean);

        let mut attempt = 0;
        let response = loop {
            debug!("Requesting pronunciation for '{}' (attempt {})", clean, attempt + 1);
            match self.client.get(&url).send().await {
                Ok(response) => break response,
                Err(e) if attempt < self.max_retries => {
                    attempt += 1;
                    warn!("Lookup for '{}' failed: {}, retrying", clean, e);
                    tokio::time::sleep(Duration::from_millis(250 * attempt as u64)).await;
                }
                Err(e) => return Err(Error::Http(e)),
            }
        };

        if !response.status().is_success() {
            debug!("No dictionary entry for '{}' ({})", clean, response.status());
            return Ok(None);
        }

        let entries: Vec<DictionaryEntry> = response.json().await?;
        Ok(select_pronunciation(&entries))
    }
}

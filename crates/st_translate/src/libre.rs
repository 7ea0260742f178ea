//! LibreTranslate HTTP client.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::TranslateError;
use crate::translator::Translator;

/// `POST /translate` body.
#[derive(Debug, Serialize)]
pub struct TranslateRequest<'a> {
    pub q: &'a str,
    pub source: &'a str,
    pub target: &'a str,
    pub format: &'static str,
    pub alternatives: u32,
    pub api_key: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct TranslateResponse {
    #[serde(rename = "translatedText")]
    pub translated_text: String,
    #[serde(rename = "detectedLanguage", default)]
    pub detected_language: Option<DetectedLanguage>,
}

/// `POST /detect` body.
#[derive(Debug, Serialize)]
pub struct DetectRequest<'a> {
    pub q: &'a str,
    pub api_key: &'a str,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DetectedLanguage {
    pub confidence: f32,
    pub language: String,
}

/// Connection settings for [`LibreTranslateClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Base URL, e.g. `http://localhost:5000`.
    pub endpoint: String,
    /// Source language code or `auto`.
    pub source_language: String,
    pub target_language: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:5000".to_string(),
            source_language: "auto".to_string(),
            target_language: "es".to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Long-lived LibreTranslate client. The inner `reqwest::Client` pools connections and is
/// safe to share between workers.
pub struct LibreTranslateClient {
    client: reqwest::Client,
    options: ClientOptions,
}

impl LibreTranslateClient {
    pub fn new(options: ClientOptions) -> Result<Self, TranslateError> {
        let client = reqwest::Client::builder()
            .timeout(options.timeout)
            .build()?;
        Ok(Self { client, options })
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.options.endpoint.trim_end_matches('/'), path)
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, TranslateError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(TranslateError::Status {
                status: status.as_u16(),
                body: response_text,
            });
        }

        Ok(serde_json::from_str(&response_text)?)
    }
}

impl Translator for LibreTranslateClient {
    async fn translate(&self, text: &str) -> Result<String, TranslateError> {
        let request = TranslateRequest {
            q: text,
            source: &self.options.source_language,
            target: &self.options.target_language,
            format: "text",
            alternatives: 0,
            api_key: &self.options.api_key,
        };
        let response: TranslateResponse = self.post("translate", &request).await?;

        if let Some(detected) = &response.detected_language {
            log::trace!(
                "{text:?} detected as {} ({:.0}%)",
                detected.language,
                detected.confidence
            );
        }
        Ok(response.translated_text)
    }

    async fn detect_language(&self, text: &str) -> Result<String, TranslateError> {
        let request = DetectRequest {
            q: text,
            api_key: &self.options.api_key,
        };
        let candidates: Vec<DetectedLanguage> = self.post("detect", &request).await?;
        best_candidate(candidates)
    }
}

/// Highest-confidence candidate from a `/detect` response.
pub fn best_candidate(candidates: Vec<DetectedLanguage>) -> Result<String, TranslateError> {
    candidates
        .into_iter()
        .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
        .map(|c| c.language)
        .ok_or(TranslateError::Undetermined)
}

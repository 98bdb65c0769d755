//! Translation of non-ASCII text columns
//!
//! Only `Job Name` and `Company Name` are translated, and only when they
//! contain non-ASCII text. A failed translation keeps the original text.

use crate::config::TranslationConfig;
use crate::output::dataset::Dataset;
use crate::record::{COMPANY_NAME, JOB_NAME};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors reported by a translator
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("Translation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Translation service answered HTTP {0}")]
    Status(u16),

    #[error("Translation response contained no result")]
    NoResult,

    #[error("Invalid translation endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// Text translation service
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translates `text` into the language `target` (e.g. `"en"`)
    async fn translate(&self, text: &str, target: &str) -> Result<String, TranslateError>;
}

/// Translator backed by the Google Translate mobile page
#[derive(Debug, Clone)]
pub struct GoogleTranslator {
    client: Client,
    endpoint: Url,
}

impl GoogleTranslator {
    pub fn new(config: &TranslationConfig, user_agent: &str) -> Result<Self, TranslateError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        let endpoint = Url::parse(&config.endpoint)?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, target: &str) -> Result<String, TranslateError> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("tl", target)
            .append_pair("sl", "auto")
            .append_pair("q", text);

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(TranslateError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        extract_translation(&body).ok_or(TranslateError::NoResult)
    }
}

/// Reads the translated text out of the mobile translate page
fn extract_translation(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("div.result-container").ok()?;
    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Returns a copy of `dataset` with its non-ASCII names translated
///
/// Failures are logged and leave the cell unchanged.
pub async fn translate_dataset<T>(dataset: &Dataset, translator: &T, target: &str) -> Dataset
where
    T: Translator + ?Sized,
{
    let mut translated = dataset.clone();
    let columns: Vec<(&str, usize)> = [JOB_NAME, COMPANY_NAME]
        .into_iter()
        .filter_map(|name| dataset.column_index(name).map(|idx| (name, idx)))
        .collect();

    for row in translated.rows_mut() {
        for (name, idx) in &columns {
            let Some(cell) = row.get_mut(*idx) else {
                continue;
            };
            if cell.is_ascii() {
                continue;
            }
            match translator.translate(cell, target).await {
                Ok(text) => *cell = text,
                Err(e) => tracing::error!("Translation error for {}: {}", name, e),
            }
        }
    }

    translated
}

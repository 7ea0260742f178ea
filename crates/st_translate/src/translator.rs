use std::future::Future;

use crate::error::TranslateError;

/// Translator contract.
///
/// One long-lived instance is shared by all workers and called concurrently.
pub trait Translator: Send + Sync + 'static {
    /// Translate `text` into the configured target language.
    fn translate(&self, text: &str) -> impl Future<Output = Result<String, TranslateError>> + Send;

    /// Detect the dominant language of `text` as a language code (e.g. `"es"`).
    fn detect_language(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<String, TranslateError>> + Send;
}

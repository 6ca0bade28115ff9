use pagecheck_core::Translator;
use std::time::Duration;

pub use imp::HttpTranslator;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpTranslatorOptions {
    pub endpoint: String,
    pub source_lang: String,
    pub target_lang: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

/// Prefers the page's precomputed translation and only then asks the
/// fallback translator.
pub struct PageTranslator<'a> {
    precomputed: Option<&'a str>,
    fallback: Option<&'a dyn Translator>,
}

impl<'a> PageTranslator<'a> {
    pub fn new(precomputed: Option<&'a str>, fallback: Option<&'a dyn Translator>) -> Self {
        Self {
            precomputed,
            fallback,
        }
    }
}

impl Translator for PageTranslator<'_> {
    fn translate(&self, text: &str) -> Option<String> {
        if let Some(precomputed) = self.precomputed {
            return Some(precomputed.to_string());
        }
        self.fallback.and_then(|fallback| fallback.translate(text))
    }
}

#[cfg(feature = "http-translate")]
mod imp {
    use super::HttpTranslatorOptions;
    use crate::error::{IngestError, Result};
    use pagecheck_core::Translator;
    use reqwest::blocking::Client;
    use serde::{Deserialize, Serialize};
    use std::time::Duration;
    use tracing::{debug, warn};
    use url::Url;

    #[derive(Debug, Serialize)]
    struct TranslateRequest<'a> {
        q: &'a str,
        source: &'a str,
        target: &'a str,
        format: &'static str,
        #[serde(skip_serializing_if = "Option::is_none")]
        api_key: Option<&'a str>,
    }

    #[derive(Debug, Deserialize)]
    struct TranslateResponse {
        #[serde(rename = "translatedText")]
        translated_text: String,
    }

    /// Client for a LibreTranslate-compatible `/translate` endpoint.
    #[derive(Debug, Clone)]
    pub struct HttpTranslator {
        client: Client,
        endpoint: Url,
        source_lang: String,
        target_lang: String,
        api_key: Option<String>,
    }

    impl HttpTranslator {
        pub fn new(options: HttpTranslatorOptions) -> Result<Self> {
            let endpoint = Url::parse(&options.endpoint)?;
            let local = matches!(
                endpoint.host_str(),
                Some("localhost") | Some("127.0.0.1") | Some("[::1]")
            );
            if endpoint.scheme() != "https" && !(endpoint.scheme() == "http" && local) {
                return Err(IngestError::Parse(
                    "translation endpoint must use https".to_string(),
                ));
            }
            let client = Client::builder()
                .user_agent("pagecheck")
                .timeout(options.timeout)
                .connect_timeout(Duration::from_secs(10))
                .build()?;
            Ok(Self {
                client,
                endpoint,
                source_lang: options.source_lang,
                target_lang: options.target_lang,
                api_key: options.api_key,
            })
        }

        pub fn request(&self, text: &str) -> Result<String> {
            let body = serde_json::to_string(&TranslateRequest {
                q: text,
                source: &self.source_lang,
                target: &self.target_lang,
                format: "text",
                api_key: self.api_key.as_deref(),
            })?;
            let response = self
                .client
                .post(self.endpoint.clone())
                .header("Content-Type", "application/json")
                .header("Accept", "application/json")
                .body(body)
                .send()?
                .error_for_status()?;
            let parsed: TranslateResponse = serde_json::from_str(&response.text()?)?;
            Ok(parsed.translated_text)
        }
    }

    impl Translator for HttpTranslator {
        fn translate(&self, text: &str) -> Option<String> {
            if text.trim().is_empty() {
                return None;
            }
            match self.request(text) {
                Ok(translated) if !translated.trim().is_empty() => {
                    debug!(chars = translated.len(), "translation received");
                    Some(translated)
                }
                Ok(_) => {
                    warn!(endpoint = %self.endpoint, "translation returned empty text");
                    None
                }
                Err(err) => {
                    warn!(endpoint = %self.endpoint, error = %err, "translation unavailable");
                    None
                }
            }
        }
    }
}

#[cfg(not(feature = "http-translate"))]
mod imp {
    use super::HttpTranslatorOptions;
    use crate::error::{IngestError, Result};
    use pagecheck_core::Translator;

    #[derive(Debug, Clone)]
    pub struct HttpTranslator;

    impl HttpTranslator {
        pub fn new(_options: HttpTranslatorOptions) -> Result<Self> {
            Err(IngestError::Unavailable(
                "http translation support not enabled".to_string(),
            ))
        }
    }

    impl Translator for HttpTranslator {
        fn translate(&self, _text: &str) -> Option<String> {
            None
        }
    }
}

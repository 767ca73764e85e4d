//! Suggestion adapter: HTTP provider with a canned local fallback.

use serde_json::json;
use std::time::Duration;

use crate::error::ServiceError;
use crate::storage::SuggestionConfig;

/// Every suggestion source implements this trait.
pub trait SuggestionProvider: Send + Sync {
    /// Unique identifier (e.g. "http", "canned").
    fn name(&self) -> &str;

    /// Produce a suggestion for the given prompt.
    fn generate(&self, prompt: &str) -> Result<String, ServiceError>;
}

/// HTTP-backed provider. POSTs `{"prompt": ...}` to the configured
/// endpoint and reads the suggestion back from the `text` field.
pub struct HttpSuggestionProvider {
    api_url: url::Url,
    api_key: Option<String>,
    timeout: Duration,
}

impl HttpSuggestionProvider {
    /// Build from configuration. Returns `None` when the adapter is
    /// disabled or has no valid endpoint.
    pub fn from_config(config: &SuggestionConfig) -> Option<Self> {
        if !config.enabled {
            return None;
        }
        let raw = config.api_url.as_deref()?;
        let api_url = match url::Url::parse(raw) {
            Ok(u) => u,
            Err(e) => {
                log::warn!("ignoring invalid suggestion endpoint '{raw}': {e}");
                return None;
            }
        };
        let api_key = std::env::var(&config.api_key_env).ok();
        Some(Self {
            api_url,
            api_key,
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    /// Build directly from an endpoint, for tests and embedding callers.
    pub fn with_endpoint(api_url: url::Url, api_key: Option<String>) -> Self {
        Self {
            api_url,
            api_key,
            timeout: Duration::from_secs(30),
        }
    }
}

impl SuggestionProvider for HttpSuggestionProvider {
    fn name(&self) -> &str {
        "http"
    }

    fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let body = json!({ "prompt": prompt });
        let response: serde_json::Value = runtime.block_on(async {
            let mut request = reqwest::Client::new()
                .post(self.api_url.clone())
                .timeout(self.timeout)
                .json(&body);
            if let Some(ref key) = self.api_key {
                request = request.bearer_auth(key);
            }
            request.send().await?.error_for_status()?.json().await
        })?;

        response["text"]
            .as_str()
            .or_else(|| response["suggestion"].as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ServiceError::UnexpectedResponse {
                service: "http".to_string(),
                message: "no text field in response".to_string(),
            })
    }
}

/// Deterministic local fallback used when no HTTP provider is available.
pub struct CannedSuggestionProvider;

const CANNED: &[&str] = &[
    "Pick the smallest next step and schedule it for tomorrow morning.",
    "Pair this habit with one you already keep, right after it.",
    "Shrink the goal until missing it would feel silly.",
    "Block ten minutes on your calendar and stop when the timer ends.",
    "Track it for one week before changing anything.",
];

impl SuggestionProvider for CannedSuggestionProvider {
    fn name(&self) -> &str {
        "canned"
    }

    fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        // Stable pick per prompt so repeated calls agree.
        let pick = prompt.len() % CANNED.len();
        Ok(CANNED[pick].to_string())
    }
}

/// Generate a suggestion, preferring the configured HTTP provider and
/// degrading to the canned provider on any failure.
pub fn generate_with_fallback(config: &SuggestionConfig, prompt: &str) -> String {
    if let Some(provider) = HttpSuggestionProvider::from_config(config) {
        match provider.generate(prompt) {
            Ok(text) => return text,
            Err(e) => log::warn!("suggestion provider '{}' failed: {e}", provider.name()),
        }
    }
    // Canned provider cannot fail.
    CannedSuggestionProvider
        .generate(prompt)
        .unwrap_or_else(|_| CANNED[0].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canned_is_deterministic() {
        let provider = CannedSuggestionProvider;
        let a = provider.generate("help me stretch more").unwrap();
        let b = provider.generate("help me stretch more").unwrap();
        assert_eq!(a, b);
        assert!(!a.is_empty());
    }

    #[test]
    fn disabled_config_yields_no_http_provider() {
        let config = SuggestionConfig {
            api_url: Some("http://localhost:9".to_string()),
            enabled: false,
            ..SuggestionConfig::default()
        };
        assert!(HttpSuggestionProvider::from_config(&config).is_none());
    }

    #[test]
    fn invalid_endpoint_yields_no_http_provider() {
        let config = SuggestionConfig {
            api_url: Some("not a url".to_string()),
            ..SuggestionConfig::default()
        };
        assert!(HttpSuggestionProvider::from_config(&config).is_none());
    }

    #[test]
    fn http_provider_reads_text_field() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/suggest")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"text": "Start with five minutes."}"#)
            .create();

        let endpoint = url::Url::parse(&format!("{}/suggest", server.url())).unwrap();
        let provider = HttpSuggestionProvider::with_endpoint(endpoint, None);
        let text = provider.generate("keep me moving").unwrap();

        mock.assert();
        assert_eq!(text, "Start with five minutes.");
    }

    #[test]
    fn http_provider_rejects_empty_payload() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/suggest")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"something": "else"}"#)
            .create();

        let endpoint = url::Url::parse(&format!("{}/suggest", server.url())).unwrap();
        let provider = HttpSuggestionProvider::with_endpoint(endpoint, None);
        assert!(matches!(
            provider.generate("hi"),
            Err(ServiceError::UnexpectedResponse { .. })
        ));
    }

    #[test]
    fn fallback_uses_canned_when_unconfigured() {
        let config = SuggestionConfig::default();
        let text = generate_with_fallback(&config, "anything");
        assert!(CANNED.contains(&text.as_str()));
    }
}

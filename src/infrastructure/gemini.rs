//! Remote persona classification through the Gemini API.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::application::{ClassificationSample, PersonaClassifier};
use crate::domain::{AppError, ClassifierConfig, PersonaAnalysis, Result};

/// Response from the `generateContent` endpoint
#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Classifies assistant personas with a Gemini model.
pub struct GeminiClassifier {
    client: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GeminiClassifier {
    /// Create a classifier using the API key from the configured
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns error if the key is missing or the client cannot be built
    pub fn from_config(config: &ClassifierConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).unwrap_or_default();
        Self::new(api_key, config)
    }

    /// Create a classifier with an explicit API key
    ///
    /// # Errors
    ///
    /// Returns error if the key is empty or the client cannot be built
    pub fn new(api_key: String, config: &ClassifierConfig) -> Result<Self> {
        if api_key.is_empty() {
            return Err(AppError::classifier(format!(
                "API key not configured (set {})",
                config.api_key_env
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::classifier(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

#[async_trait]
impl PersonaClassifier for GeminiClassifier {
    async fn classify(&self, sample: &ClassificationSample) -> Result<PersonaAnalysis> {
        tracing::debug!(
            model = %self.model,
            messages = sample.message_count,
            "starting remote persona analysis"
        );

        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": build_prompt(sample) }] }],
            "generationConfig": { "responseMimeType": "application/json" }
        });

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Gemini request failed");
                AppError::classifier(format!("request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Gemini API error");
            return Err(AppError::classifier(format!("Gemini API error {status}")));
        }

        let result: GenerateResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse response");
            AppError::classifier(format!("invalid response: {e}"))
        })?;

        let text = result
            .candidates
            .into_iter()
            .find_map(|c| c.content)
            .and_then(|c| c.parts.into_iter().find_map(|p| p.text))
            .ok_or_else(|| AppError::classifier("no response text"))?;

        parse_analysis(&text)
    }
}

/// Builds the analysis prompt around a sample.
fn build_prompt(sample: &ClassificationSample) -> String {
    format!(
        "Analyze the following conversation snippet, specifically the 'assistant' responses.\n\
         Determine the assistant's persona, tone, and style.\n\
         Return a JSON object with keys: \"tone\" (string), \"keywords\" (array of strings), \
         \"suggestedPrompt\" (string - a system instruction to replicate this persona).\n\n\
         Snippet:\n{}",
        sample.text
    )
}

/// Parses the model's JSON answer.
fn parse_analysis(text: &str) -> Result<PersonaAnalysis> {
    serde_json::from_str(text.trim())
        .map_err(|e| AppError::classifier(format!("malformed analysis JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_classifier_error() {
        let config = ClassifierConfig::default();
        let err = GeminiClassifier::new(String::new(), &config)
            .err()
            .unwrap();
        assert!(matches!(err, AppError::Classifier { .. }));
        assert!(err.to_string().contains("API_KEY"));
    }

    #[test]
    fn test_url() {
        let config = ClassifierConfig {
            endpoint: "https://example.test/v1beta/".into(),
            ..Default::default()
        };
        let classifier = GeminiClassifier::new("key".into(), &config).unwrap();
        assert_eq!(
            classifier.url(),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_parse_analysis() {
        let analysis = parse_analysis(
            r#"{"tone": "Warm", "keywords": ["Friendly", "Patient"], "suggestedPrompt": "Be warm."}"#,
        )
        .unwrap();

        assert_eq!(analysis.tone, "Warm");
        assert_eq!(analysis.keywords, vec!["Friendly", "Patient"]);
        assert_eq!(analysis.suggested_prompt, "Be warm.");
        assert!(!analysis.is_ai_generated);
    }

    #[test]
    fn test_parse_analysis_rejects_garbage() {
        assert!(parse_analysis("I think the tone is warm").is_err());
    }

    #[test]
    fn test_prompt_embeds_sample() {
        let sample = ClassificationSample {
            text: "assistant: Hello...".into(),
            message_count: 1,
        };
        let prompt = build_prompt(&sample);
        assert!(prompt.contains("\"suggestedPrompt\""));
        assert!(prompt.ends_with("Snippet:\nassistant: Hello..."));
    }
}

//! Assistant persona detection.
//!
//! A local word-count/keyword scan always works offline. A remote
//! classifier can be plugged in through [`PersonaClassifier`]; when it fails
//! the local scan is used instead.

use async_trait::async_trait;

use crate::domain::{ParsedMessage, PersonaAnalysis, Result, Role};

/// Excerpt of a conversation sent to a remote classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationSample {
    /// One `role: excerpt...` line per sampled message.
    pub text: String,
    /// Number of messages included.
    pub message_count: usize,
}

impl ClassificationSample {
    /// Takes the last `window` messages, each cut to `max_chars` characters.
    #[must_use]
    pub fn from_messages(messages: &[ParsedMessage], window: usize, max_chars: usize) -> Self {
        let start = messages.len().saturating_sub(window);
        let sampled = &messages[start..];

        let text = sampled
            .iter()
            .map(|m| {
                let excerpt: String = m.content.chars().take(max_chars).collect();
                format!("{}: {excerpt}...", m.role.as_str())
            })
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            text,
            message_count: sampled.len(),
        }
    }
}

/// Capability for remote persona classification.
#[async_trait]
pub trait PersonaClassifier: Send + Sync {
    /// Classifies the assistant's tone from a sample.
    ///
    /// # Errors
    /// Returns a `Classifier` error when the service is unconfigured or the
    /// call fails.
    async fn classify(&self, sample: &ClassificationSample) -> Result<PersonaAnalysis>;
}

/// Outcome of a persona analysis, including why the remote path was not
/// used when it failed.
#[derive(Debug, Clone)]
pub struct PersonaReport {
    /// The analysis, absent when there are no assistant messages.
    pub analysis: Option<PersonaAnalysis>,
    /// Reason the remote classifier was bypassed.
    pub fallback_reason: Option<String>,
}

impl PersonaReport {
    /// Report from the local scan alone.
    #[must_use]
    pub fn local(messages: &[ParsedMessage], fallback_reason: Option<String>) -> Self {
        Self {
            analysis: analyze_persona_local(messages),
            fallback_reason,
        }
    }
}

/// Runs the remote classifier when given, falling back to the local scan
/// on any failure.
pub async fn analyze_persona(
    messages: &[ParsedMessage],
    classifier: Option<&dyn PersonaClassifier>,
    sample: &ClassificationSample,
) -> PersonaReport {
    let Some(classifier) = classifier else {
        return PersonaReport::local(messages, None);
    };

    match classifier.classify(sample).await {
        Ok(mut analysis) => {
            analysis.is_ai_generated = true;
            PersonaReport {
                analysis: Some(analysis),
                fallback_reason: None,
            }
        }
        Err(e) => {
            tracing::warn!("Remote persona analysis failed, using local scan: {}", e);
            PersonaReport::local(messages, Some(e.to_string()))
        }
    }
}

/// Heuristic tone detection over assistant messages.
#[must_use]
pub fn analyze_persona_local(messages: &[ParsedMessage]) -> Option<PersonaAnalysis> {
    let assistant: Vec<&ParsedMessage> = messages
        .iter()
        .filter(|m| m.role == Role::Assistant)
        .collect();
    if assistant.is_empty() {
        return None;
    }

    let total_words: usize = assistant
        .iter()
        .map(|m| m.content.split_whitespace().count())
        .sum();
    #[allow(clippy::cast_precision_loss)]
    let avg_words = total_words as f64 / assistant.len() as f64;

    let has_code = assistant.iter().any(|m| m.content.contains("```"));
    let is_formal = assistant.iter().any(|m| {
        let lower = m.content.to_lowercase();
        lower.contains("certainly") || lower.contains("however")
    });

    let tone = if has_code {
        "Technical/Developer-focused"
    } else if is_formal && avg_words > 50.0 {
        "Formal & Detailed"
    } else if !is_formal && avg_words < 30.0 {
        "Concise & Casual"
    } else {
        "Neutral"
    };

    let keywords: &[&str] = if has_code {
        &["Coding", "Technical", "Structured"]
    } else {
        &["General", "Conversational"]
    };

    let focus = if has_code {
        "Prioritize clean code and explanation."
    } else {
        "Focus on clear, helpful dialogue."
    };

    Some(PersonaAnalysis {
        tone: tone.to_string(),
        keywords: keywords.iter().map(ToString::to_string).collect(),
        suggested_prompt: format!("Act as a {} assistant. {focus}", tone.to_lowercase()),
        is_ai_generated: false,
    })
}

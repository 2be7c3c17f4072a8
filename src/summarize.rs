//! Summarization capability: provider abstraction + heuristic fallback.
//!
//! The summary merge never talks to a model directly. It receives a
//! [`DynSummarizer`] and goes through [`summarize_news_item`], which always
//! produces text: model output when available, [`heuristic_summary`] otherwise.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::ai::AiConfig;

const HEURISTIC_MAX_CHARS: usize = 240;

/// What a summarizer gets to see about one news item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryInput {
    pub title: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub source_name: Option<String>,
}

impl SummaryInput {
    pub fn from_title(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Self::default()
        }
    }
}

/// Trait object used by the summary merge and tests.
pub trait Summarizer: Send + Sync {
    /// Return a 1-2 sentence summary, or `None` on any failure.
    fn summarize<'a>(
        &'a self,
        input: &'a SummaryInput,
    ) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>>;
    /// Provider name for diagnostics.
    fn provider_name(&self) -> &'static str;
}

pub type DynSummarizer = Arc<dyn Summarizer>;

/// Factory: OpenAI when enabled with a key, otherwise the disabled client.
pub fn build_summarizer(config: &AiConfig) -> DynSummarizer {
    if !config.enabled || config.api_key.trim().is_empty() {
        return Arc::new(DisabledSummarizer);
    }
    match config.provider.as_str() {
        "openai" => match OpenAiSummarizer::new(config.api_key.clone(), config.model.clone()) {
            Ok(s) => Arc::new(s),
            Err(e) => {
                tracing::warn!(error = %e, "could not build openai client; using heuristics");
                Arc::new(DisabledSummarizer)
            }
        },
        _ => Arc::new(DisabledSummarizer),
    }
}

/// Model summary with heuristic fallback. Never fails.
pub async fn summarize_news_item(summarizer: &dyn Summarizer, input: &SummaryInput) -> String {
    match summarizer.summarize(input).await {
        Some(s) if !s.trim().is_empty() => s.trim().to_string(),
        _ => heuristic_summary(input),
    }
}

/// Derive a pseudo-summary from description, content or title.
pub fn heuristic_summary(input: &SummaryInput) -> String {
    let base = input
        .description
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .or(input.content.as_deref().filter(|s| !s.trim().is_empty()))
        .unwrap_or(&input.title);
    let cleaned = base.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.chars().count() <= HEURISTIC_MAX_CHARS {
        return cleaned;
    }
    let head: String = cleaned.chars().take(HEURISTIC_MAX_CHARS - 3).collect();
    format!("{}...", head.trim_end())
}

// ------------------------------------------------------------
// Providers
// ------------------------------------------------------------

/// OpenAI provider (Chat Completions API).
pub struct OpenAiSummarizer {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenAiSummarizer {
    pub fn new(api_key: String, model: String) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("oneida-news-hub/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            http,
            api_key,
            model,
        })
    }

    async fn summarize_impl(&self, input: &SummaryInput) -> Option<String> {
        #[derive(Serialize)]
        struct Msg<'a> {
            role: &'a str,
            content: &'a str,
        }
        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            messages: Vec<Msg<'a>>,
            temperature: f32,
            max_tokens: u32,
        }
        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<Choice>,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: ChoiceMsg,
        }
        #[derive(Deserialize)]
        struct ChoiceMsg {
            content: Option<String>,
        }

        let prompt = build_prompt(input);
        let req = Req {
            model: &self.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: "You write concise, factual news summaries.",
                },
                Msg {
                    role: "user",
                    content: &prompt,
                },
            ],
            temperature: 0.4,
            max_tokens: 120,
        };

        let resp = match self
            .http
            .post("https://api.openai.com/v1/chat/completions")
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(target: "summaries", error = %e, "openai request failed");
                return None;
            }
        };
        if !resp.status().is_success() {
            tracing::warn!(target: "summaries", status = %resp.status(), "openai non-2xx");
            return None;
        }
        let body: Resp = resp.json().await.ok()?;
        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

fn build_prompt(input: &SummaryInput) -> String {
    let mut text = format!("Title: {}", input.title);
    if let Some(d) = input.description.as_deref().filter(|s| !s.is_empty()) {
        text.push_str(&format!("\nDescription: {d}"));
    }
    if let Some(c) = input.content.as_deref().filter(|s| !s.is_empty()) {
        text.push_str(&format!("\nContent: {c}"));
    }
    if let Some(src) = input.source_name.as_deref().filter(|s| !s.is_empty()) {
        text.push_str(&format!("\nSource: {src}"));
    }
    format!(
        "Summarize this item for readers of a community news site covering Oneida County, New York.\n\
         Use one or two neutral, factual sentences and stay under 45 words.\n\
         Do not add opinions or details that are not in the text; if the text is very short, just restate it clearly.\n\n\
         Text:\n{text}"
    )
}

impl Summarizer for OpenAiSummarizer {
    fn summarize<'a>(
        &'a self,
        input: &'a SummaryInput,
    ) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>> {
        Box::pin(self.summarize_impl(input))
    }
    fn provider_name(&self) -> &'static str {
        "openai"
    }
}

/// Returns `None` always; callers fall back to the heuristic.
pub struct DisabledSummarizer;

impl Summarizer for DisabledSummarizer {
    fn summarize<'a>(
        &'a self,
        _input: &'a SummaryInput,
    ) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>> {
        Box::pin(async { None })
    }
    fn provider_name(&self) -> &'static str {
        "disabled"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristic_prefers_description_and_collapses_ws() {
        let input = SummaryInput {
            title: "Title".into(),
            description: Some("  Road   closed\n on Genesee St. ".into()),
            ..Default::default()
        };
        assert_eq!(heuristic_summary(&input), "Road closed on Genesee St.");
    }

    #[test]
    fn heuristic_truncates_long_text() {
        let input = SummaryInput::from_title(&"word ".repeat(100));
        let out = heuristic_summary(&input);
        assert!(out.ends_with("..."));
        assert!(out.chars().count() <= HEURISTIC_MAX_CHARS);
    }

    #[test]
    fn heuristic_keeps_exactly_240_chars() {
        let title = "x".repeat(240);
        assert_eq!(heuristic_summary(&SummaryInput::from_title(&title)), title);
    }

    #[tokio::test]
    async fn disabled_falls_back_to_title() {
        let out = summarize_news_item(&DisabledSummarizer, &SummaryInput::from_title("Utica budget passes")).await;
        assert_eq!(out, "Utica budget passes");
    }

    #[test]
    fn disabled_config_builds_disabled_client() {
        let s = build_summarizer(&AiConfig::default());
        assert_eq!(s.provider_name(), "disabled");
    }
}

// src/services/summarizer.rs

//! Post summarization service.
//!
//! Builds a one-shot prompt from the diploma and initiative texts and asks
//! a text-generation oracle (Gemini) for a short social post.

use std::time::Duration;

use reqwest::blocking::{Client, Request};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{GeminiCredentials, PostContent, SummarizerConfig};

/// Posted when the oracle answers with no text.
pub const EMPTY_RESPONSE_SENTINEL: &str =
    "Error: Could not generate post content. The API returned an empty response.";

/// Posted when the oracle call fails.
pub const API_ERROR_SENTINEL: &str =
    "Error: An API error occurred while generating the post content.";

/// What happens to a run when summarization fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryFailurePolicy {
    /// Publish a fixed error string in place of the summary.
    PostSentinel,
    /// Publish nothing. The diploma is already marked, so it will not be retried.
    AbortRun,
}

/// Summarization failures still produce a (visibly erroneous) post.
pub const SUMMARY_FAILURE_POLICY: SummaryFailurePolicy = SummaryFailurePolicy::PostSentinel;

/// A text-generation oracle.
pub trait TextGenerator {
    /// Generate text for `prompt` with `model`. Blank output is
    /// reported as [`AppError::EmptyGeneration`].
    fn generate(&self, model: &str, prompt: &str) -> Result<String>;
}

/// Build the journalist prompt embedding both documents.
pub fn build_prompt(diploma_markdown: &str, context_markdown: &str) -> String {
    format!(
        "És um jornalista político cujo objetivo é ler o conteúdo e o contexto dos diplomas \
recentemente aprovados pelo parlamento português e produzir um post para o X que consiste num \
resumo conciso e direto do que foi aprovado. Menciona apenas o conteúdo relevante para um leitor \
comum, com base exclusivamente no conteúdo fornecido. O tom não deve ser eufórico nem humorístico, \
mas meramente informativo. Responde apenas com o texto do post, sem qualquer introdução. \
Aqui está um exemplo:

Redução do IRS em 2025 aprovada na generalidade pelo Parlamento.
A proposta do Governo para a descida do IRS foi aprovada pelo PSD, CHEGA e IL, com abstenção do \
Livre e do PS. PCP e BE votam contra.

Conteúdo do diploma aprovado:
{diploma_markdown}

Texto original da iniciativa (contexto do diploma):
{context_markdown}
"
    )
}

/// Map a summarization failure to the text posted in its place.
pub fn sentinel_for(error: &AppError) -> &'static str {
    match error {
        AppError::EmptyGeneration => EMPTY_RESPONSE_SENTINEL,
        _ => API_ERROR_SENTINEL,
    }
}

/// Turns two document texts into post content.
pub struct Summarizer<'a> {
    oracle: &'a dyn TextGenerator,
    model: String,
    failure_policy: SummaryFailurePolicy,
}

impl<'a> Summarizer<'a> {
    pub fn new(oracle: &'a dyn TextGenerator, config: &SummarizerConfig) -> Self {
        log::info!("Summarizer using model '{}'", config.model);
        Self {
            oracle,
            model: config.model.clone(),
            failure_policy: SUMMARY_FAILURE_POLICY,
        }
    }

    /// Override the failure policy.
    pub fn with_failure_policy(mut self, policy: SummaryFailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Generate post content for a diploma.
    ///
    /// Never raises: failures go through the failure policy, which either
    /// substitutes a sentinel string or returns `None`.
    pub fn get_post_content(
        &self,
        diploma_markdown: &str,
        context_markdown: &str,
    ) -> Option<PostContent> {
        let prompt = build_prompt(diploma_markdown, context_markdown);

        let generated = self.oracle.generate(&self.model, &prompt).and_then(|text| {
            let text = text.trim();
            if text.is_empty() {
                Err(AppError::EmptyGeneration)
            } else {
                Ok(text.to_string())
            }
        });

        match generated {
            Ok(text) => {
                log::info!("Successfully generated post content from the API.");
                Some(PostContent(text))
            }
            Err(e) => self.on_failure(&e),
        }
    }

    fn on_failure(&self, error: &AppError) -> Option<PostContent> {
        match error {
            AppError::EmptyGeneration => {
                log::warn!("API response was empty. This may be due to safety settings.")
            }
            _ => log::error!("An error occurred while calling the generation API: {}", error),
        }

        match self.failure_policy {
            SummaryFailurePolicy::PostSentinel => {
                Some(PostContent(sentinel_for(error).to_string()))
            }
            SummaryFailurePolicy::AbortRun => None,
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

/// Concatenate the text parts of the first candidate.
pub fn parse_generation(body: &str) -> Result<String> {
    let response: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| AppError::oracle(format!("malformed generation reply: {e}")))?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(AppError::EmptyGeneration);
    }
    Ok(text)
}

/// [`TextGenerator`] backed by the Gemini `generateContent` endpoint.
pub struct GeminiClient<'a> {
    client: &'a Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl<'a> GeminiClient<'a> {
    pub fn new(
        client: &'a Client,
        credentials: &GeminiCredentials,
        config: &SummarizerConfig,
    ) -> Self {
        Self {
            client,
            api_key: credentials.api_key.clone(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    /// Build the `generateContent` request, overriding the shared client's timeout.
    fn build_request(&self, model: &str, prompt: &str) -> Result<Request> {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        self.client
            .post(self.endpoint(model))
            .timeout(self.timeout)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .build()
            .map_err(AppError::oracle)
    }
}

impl TextGenerator for GeminiClient<'_> {
    fn generate(&self, model: &str, prompt: &str) -> Result<String> {
        let request = self.build_request(model, prompt)?;
        let response = self.client.execute(request).map_err(AppError::oracle)?;

        let status = response.status();
        let body = response.text().map_err(AppError::oracle)?;
        if !status.is_success() {
            return Err(AppError::oracle(format!("{status}: {body}")));
        }

        parse_generation(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fakes::{FakeGenerator, GeneratorReply};

    #[test]
    fn test_prompt_embeds_both_texts_in_order() {
        let prompt = build_prompt("TEXTO DO DIPLOMA", "TEXTO DA INICIATIVA");
        let diploma_at = prompt.find("TEXTO DO DIPLOMA").unwrap();
        let context_at = prompt.find("TEXTO DA INICIATIVA").unwrap();
        assert!(diploma_at < context_at);
        assert!(prompt.contains("sem qualquer introdução"));
    }

    #[test]
    fn test_summary_is_trimmed() {
        let oracle = FakeGenerator::new(GeneratorReply::Text("  Resumo do decreto.\n".into()));
        let summarizer = Summarizer::new(&oracle, &SummarizerConfig::default());

        let post = summarizer.get_post_content("d", "c").unwrap();
        assert_eq!(post.as_str(), "Resumo do decreto.");

        let calls = oracle.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "gemini-2.5-pro");
        assert!(calls[0].1.contains("Conteúdo do diploma aprovado:\nd\n"));
    }

    #[test]
    fn test_oracle_error_yields_api_sentinel() {
        let oracle = FakeGenerator::new(GeneratorReply::Fail("quota exceeded".into()));
        let summarizer = Summarizer::new(&oracle, &SummarizerConfig::default());

        let post = summarizer.get_post_content("d", "c").unwrap();
        assert_eq!(post.as_str(), API_ERROR_SENTINEL);
        assert!(!post.as_str().contains("quota"));
    }

    #[test]
    fn test_empty_response_yields_empty_sentinel() {
        let oracle = FakeGenerator::new(GeneratorReply::Text("   ".into()));
        let summarizer = Summarizer::new(&oracle, &SummarizerConfig::default());

        let post = summarizer.get_post_content("d", "c").unwrap();
        assert_eq!(post.as_str(), EMPTY_RESPONSE_SENTINEL);
    }

    #[test]
    fn test_abort_policy_returns_none() {
        let oracle = FakeGenerator::new(GeneratorReply::Fail("down".into()));
        let summarizer = Summarizer::new(&oracle, &SummarizerConfig::default())
            .with_failure_policy(SummaryFailurePolicy::AbortRun);

        assert!(summarizer.get_post_content("d", "c").is_none());
    }

    #[test]
    fn test_parse_generation_joins_parts() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"Parte 1. "},{"text":"Parte 2."}],"role":"model"}}]}"#;
        assert_eq!(parse_generation(body).unwrap(), "Parte 1. Parte 2.");
    }

    #[test]
    fn test_parse_generation_without_candidates() {
        let body = r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#;
        assert!(matches!(
            parse_generation(body),
            Err(AppError::EmptyGeneration)
        ));
    }

    #[test]
    fn test_parse_generation_malformed() {
        assert!(matches!(parse_generation("oops"), Err(AppError::Oracle(_))));
    }

    #[test]
    fn test_endpoint_includes_model() {
        let client = Client::new();
        let creds = GeminiCredentials {
            api_key: "k".into(),
        };
        let gemini = GeminiClient::new(&client, &creds, &SummarizerConfig::default());
        assert_eq!(
            gemini.endpoint("gemini-2.5-pro"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-pro:generateContent"
        );
    }

    #[test]
    fn test_request_carries_configured_timeout() {
        let client = Client::new();
        let creds = GeminiCredentials {
            api_key: "secret".into(),
        };
        let config = SummarizerConfig {
            timeout_secs: 600,
            ..SummarizerConfig::default()
        };
        let gemini = GeminiClient::new(&client, &creds, &config);

        let request = gemini.build_request("gemini-2.5-pro", "prompt").unwrap();
        assert_eq!(request.timeout(), Some(&Duration::from_secs(600)));
        assert_eq!(request.headers()["x-goog-api-key"], "secret");
        assert!(request.url().path().ends_with("/models/gemini-2.5-pro:generateContent"));
    }

    #[test]
    fn test_default_timeout_outlasts_client_default() {
        let client = Client::new();
        let creds = GeminiCredentials { api_key: "k".into() };
        let gemini = GeminiClient::new(&client, &creds, &SummarizerConfig::default());

        let request = gemini.build_request("m", "p").unwrap();
        assert_eq!(request.timeout(), Some(&Duration::from_secs(300)));
    }
}

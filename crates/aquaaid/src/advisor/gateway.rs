use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::config::AdvisorConfig;

/// Reply used when the upstream response carries no text.
pub const FALLBACK_REPLY: &str = "Sorry, I could not generate a response.";

/// Prompt pair sent upstream: the persona text and the user's latest turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisorPrompt {
    pub system_instructions: String,
    pub user_turn: String,
}

/// Text produced by the upstream model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantReply {
    pub content: String,
}

/// Failure talking to the advisor model service, classified by status code.
#[derive(Debug, thiserror::Error)]
pub enum AdvisorGatewayError {
    #[error("advisor API key is not configured")]
    MissingApiKey,
    #[error("Rate limits exceeded, please try again later")]
    RateLimited,
    #[error("Payment required to continue using the advisor")]
    PaymentRequired,
    #[error("advisor upstream error ({status}): {detail}")]
    Upstream { status: u16, detail: String },
    #[error("advisor request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Gateway to the text-generation service backing the advisor. One prompt
/// in, one reply out; retries and fallback answers are out of scope.
pub trait AdvisorGateway: Send + Sync {
    fn complete(
        &self,
        prompt: &AdvisorPrompt,
    ) -> impl Future<Output = Result<AssistantReply, AdvisorGatewayError>> + Send;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    top_k: u32,
    top_p: f64,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Debug, Deserialize)]
struct ReplyPart {
    text: Option<String>,
}

/// Production gateway posting `generateContent` requests to the Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(config: &AdvisorConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        }
    }
}

impl AdvisorGateway for GeminiClient {
    async fn complete(
        &self,
        prompt: &AdvisorPrompt,
    ) -> Result<AssistantReply, AdvisorGatewayError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AdvisorGatewayError::MissingApiKey)?;

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part {
                        text: &prompt.system_instructions,
                    },
                    Part {
                        text: &prompt.user_turn,
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: 0.7,
                top_k: 40,
                top_p: 0.95,
                max_output_tokens: 2048,
            },
        };

        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                429 => AdvisorGatewayError::RateLimited,
                402 => AdvisorGatewayError::PaymentRequired,
                code => AdvisorGatewayError::Upstream {
                    status: code,
                    detail,
                },
            });
        }

        let payload: GenerateContentResponse = response.json().await?;
        Ok(AssistantReply {
            content: extract_reply(payload),
        })
    }
}

fn extract_reply(payload: GenerateContentResponse) -> String {
    payload
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .unwrap_or_else(|| FALLBACK_REPLY.to_string())
}

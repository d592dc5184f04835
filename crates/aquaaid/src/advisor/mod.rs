//! Conversational water advisor backed by an external text-generation
//! service. The engine's only contribution is context: when a meter reading
//! pair arrives with the conversation, the computed bill is injected into
//! the system instructions before the model call.

pub mod gateway;
pub mod router;

use std::fmt::Write as _;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::engine::usage::{UsageValidationError, WaterBill};
use gateway::{AdvisorGateway, AdvisorGatewayError, AdvisorPrompt};

pub use gateway::{AssistantReply, GeminiClient, FALLBACK_REPLY};
pub use router::advisor_router;

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
}

/// One turn of the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

/// Chat request: the running conversation plus an optional meter reading
/// pair for bill context.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub previous_reading: Option<f64>,
    #[serde(default)]
    pub current_reading: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

/// Completion-style response shape the chat clients already consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatResponse {
    pub choices: Vec<ChatChoice>,
}

impl ChatResponse {
    fn from_reply(reply: AssistantReply) -> Self {
        Self {
            choices: vec![ChatChoice {
                message: ChatMessage {
                    role: MessageRole::Assistant,
                    content: reply.content,
                },
            }],
        }
    }
}

/// Error raised by the advisor service.
#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    #[error("conversation must contain at least one message")]
    EmptyConversation,
    #[error("the latest message must not be blank")]
    BlankMessage,
    #[error(transparent)]
    Billing(#[from] UsageValidationError),
    #[error(transparent)]
    Gateway(#[from] AdvisorGatewayError),
}

/// Service turning chat requests into upstream prompts.
pub struct AdvisorService<G> {
    gateway: Arc<G>,
}

impl<G> AdvisorService<G>
where
    G: AdvisorGateway + 'static,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Validate the conversation, build the prompt, and ask the model. Only
    /// the latest message travels upstream; earlier turns stay client-side.
    pub async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, AdvisorError> {
        let prompt = build_prompt(&request)?;
        let reply = self.gateway.complete(&prompt).await?;
        Ok(ChatResponse::from_reply(reply))
    }
}

fn build_prompt(request: &ChatRequest) -> Result<AdvisorPrompt, AdvisorError> {
    let latest = request
        .messages
        .last()
        .ok_or(AdvisorError::EmptyConversation)?;
    let user_turn = latest.content.trim();
    if user_turn.is_empty() {
        return Err(AdvisorError::BlankMessage);
    }

    let bill = match (request.previous_reading, request.current_reading) {
        (Some(previous), Some(current)) => Some(WaterBill::from_readings(previous, current)?),
        _ => None,
    };

    Ok(AdvisorPrompt {
        system_instructions: system_instructions(bill.as_ref()),
        user_turn: user_turn.to_string(),
    })
}

/// Persona text for the model. The bill line is appended to the billing
/// section exactly when a reading pair was supplied.
fn system_instructions(bill: Option<&WaterBill>) -> String {
    let mut text = String::new();
    writeln!(
        &mut text,
        "You are an expert SDG 6 (Clean Water and Sanitation) advisor with comprehensive \
         knowledge of water issues. Your expertise covers:"
    )
    .expect("write persona header");
    text.push('\n');

    writeln!(&mut text, "CORE SDG 6 TARGETS:").expect("write targets header");
    writeln!(
        &mut text,
        "- Universal access to safe and affordable drinking water"
    )
    .expect("write target");
    writeln!(
        &mut text,
        "- Adequate and equitable sanitation and hygiene for all"
    )
    .expect("write target");
    writeln!(
        &mut text,
        "- Improved water quality, water-use efficiency, and ecosystem protection"
    )
    .expect("write target");
    text.push('\n');

    writeln!(&mut text, "WATER CONSERVATION & QUALITY:").expect("write conservation header");
    writeln!(
        &mut text,
        "- Water-saving techniques for homes, farms, and businesses; leak detection; \
         rainwater harvesting"
    )
    .expect("write conservation");
    writeln!(
        &mut text,
        "- Treatment methods (boiling, filtration, chlorination, UV), quality parameters \
         (pH, turbidity, conductivity), and safe storage"
    )
    .expect("write quality");
    text.push('\n');

    writeln!(&mut text, "WATER BILL CALCULATIONS:").expect("write billing header");
    writeln!(
        &mut text,
        "- Calculate bills from meter readings at 200 shillings per unit"
    )
    .expect("write tariff");
    writeln!(
        &mut text,
        "- Analyze consumption patterns and suggest cost-saving improvements"
    )
    .expect("write billing advice");
    if let Some(bill) = bill {
        writeln!(&mut text, "Current calculation: {}", bill.summary_line())
            .expect("write bill context");
    }
    text.push('\n');

    writeln!(
        &mut text,
        "Provide detailed, practical, and actionable advice with specific examples and \
         step-by-step guidance for any water-related challenge."
    )
    .expect("write closing guidance");

    text
}

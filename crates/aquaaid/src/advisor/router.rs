use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::gateway::{AdvisorGateway, AdvisorGatewayError};
use super::{AdvisorError, AdvisorService, ChatRequest};

/// Router builder exposing the chat endpoint.
pub fn advisor_router<G>(service: Arc<AdvisorService<G>>) -> Router
where
    G: AdvisorGateway + 'static,
{
    Router::new()
        .route("/api/v1/advisor/chat", post(chat_handler::<G>))
        .with_state(service)
}

pub(crate) async fn chat_handler<G>(
    State(service): State<Arc<AdvisorService<G>>>,
    axum::Json(request): axum::Json<ChatRequest>,
) -> Response
where
    G: AdvisorGateway + 'static,
{
    match service.chat(request).await {
        Ok(response) => (StatusCode::OK, axum::Json(response)).into_response(),
        Err(error) => {
            let status = match &error {
                AdvisorError::EmptyConversation
                | AdvisorError::BlankMessage
                | AdvisorError::Billing(_) => StatusCode::UNPROCESSABLE_ENTITY,
                AdvisorError::Gateway(AdvisorGatewayError::MissingApiKey) => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                AdvisorError::Gateway(AdvisorGatewayError::RateLimited) => {
                    StatusCode::TOO_MANY_REQUESTS
                }
                AdvisorError::Gateway(AdvisorGatewayError::PaymentRequired) => {
                    StatusCode::PAYMENT_REQUIRED
                }
                AdvisorError::Gateway(_) => StatusCode::BAD_GATEWAY,
            };
            let payload = json!({
                "error": error.to_string(),
            });
            (status, axum::Json(payload)).into_response()
        }
    }
}

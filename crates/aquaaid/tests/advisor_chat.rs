//! Integration scenarios for the advisor: conversation validation, bill
//! context injection, upstream failure classification, and the HTTP surface.

mod common {
    use std::sync::{Arc, Mutex};

    use aquaaid::advisor::gateway::{
        AdvisorGateway, AdvisorGatewayError, AdvisorPrompt, AssistantReply,
    };
    use aquaaid::advisor::{AdvisorService, ChatMessage, ChatRequest, MessageRole};

    /// Gateway double that records every prompt and answers with canned text.
    pub(super) struct RecordingGateway {
        reply: String,
        prompts: Mutex<Vec<AdvisorPrompt>>,
    }

    impl RecordingGateway {
        pub(super) fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub(super) fn prompts(&self) -> Vec<AdvisorPrompt> {
            self.prompts.lock().expect("prompts mutex poisoned").clone()
        }
    }

    impl AdvisorGateway for RecordingGateway {
        async fn complete(
            &self,
            prompt: &AdvisorPrompt,
        ) -> Result<AssistantReply, AdvisorGatewayError> {
            self.prompts
                .lock()
                .expect("prompts mutex poisoned")
                .push(prompt.clone());
            Ok(AssistantReply {
                content: self.reply.clone(),
            })
        }
    }

    pub(super) enum CannedFailure {
        RateLimited,
        PaymentRequired,
        Unconfigured,
        Upstream,
    }

    pub(super) struct FailingGateway(pub(super) CannedFailure);

    impl AdvisorGateway for FailingGateway {
        async fn complete(
            &self,
            _prompt: &AdvisorPrompt,
        ) -> Result<AssistantReply, AdvisorGatewayError> {
            Err(match self.0 {
                CannedFailure::RateLimited => AdvisorGatewayError::RateLimited,
                CannedFailure::PaymentRequired => AdvisorGatewayError::PaymentRequired,
                CannedFailure::Unconfigured => AdvisorGatewayError::MissingApiKey,
                CannedFailure::Upstream => AdvisorGatewayError::Upstream {
                    status: 500,
                    detail: "model unavailable".to_string(),
                },
            })
        }
    }

    pub(super) fn build_service(
        reply: &str,
    ) -> (Arc<AdvisorService<RecordingGateway>>, Arc<RecordingGateway>) {
        let gateway = Arc::new(RecordingGateway::new(reply));
        (Arc::new(AdvisorService::new(gateway.clone())), gateway)
    }

    pub(super) fn user_turn(content: &str) -> ChatRequest {
        ChatRequest {
            messages: vec![ChatMessage {
                role: MessageRole::User,
                content: content.to_string(),
            }],
            previous_reading: None,
            current_reading: None,
        }
    }
}

mod conversation {
    use super::common::*;
    use aquaaid::advisor::{AdvisorError, ChatMessage, ChatRequest, MessageRole};

    #[tokio::test]
    async fn chat_answers_with_one_assistant_choice() {
        let (service, _) = build_service("Harvest rainwater from your roof.");
        let response = service
            .chat(user_turn("How can I save water at home?"))
            .await
            .expect("chat succeeds");

        assert_eq!(response.choices.len(), 1);
        let message = &response.choices[0].message;
        assert_eq!(message.role, MessageRole::Assistant);
        assert_eq!(message.content, "Harvest rainwater from your roof.");
    }

    #[tokio::test]
    async fn only_the_latest_turn_travels_upstream() {
        let (service, gateway) = build_service("ok");
        let request = ChatRequest {
            messages: vec![
                ChatMessage {
                    role: MessageRole::User,
                    content: "Is my water safe?".to_string(),
                },
                ChatMessage {
                    role: MessageRole::Assistant,
                    content: "Test its pH first.".to_string(),
                },
                ChatMessage {
                    role: MessageRole::User,
                    content: "The pH is 9, what now?".to_string(),
                },
            ],
            previous_reading: None,
            current_reading: None,
        };

        service.chat(request).await.expect("chat succeeds");

        let prompts = gateway.prompts();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].user_turn, "The pH is 9, what now?");
        assert!(!prompts[0].system_instructions.contains("Test its pH first."));
    }

    #[tokio::test]
    async fn empty_conversation_is_rejected() {
        let (service, gateway) = build_service("ok");
        let request = ChatRequest {
            messages: Vec::new(),
            previous_reading: None,
            current_reading: None,
        };

        let error = service
            .chat(request)
            .await
            .expect_err("empty conversation rejected");
        assert!(matches!(error, AdvisorError::EmptyConversation));
        assert_eq!(
            error.to_string(),
            "conversation must contain at least one message"
        );
        assert!(gateway.prompts().is_empty());
    }

    #[tokio::test]
    async fn blank_latest_message_is_rejected() {
        let (service, gateway) = build_service("ok");
        let error = service
            .chat(user_turn("   "))
            .await
            .expect_err("blank message rejected");

        assert!(matches!(error, AdvisorError::BlankMessage));
        assert!(gateway.prompts().is_empty());
    }
}

mod billing_context {
    use super::common::*;
    use aquaaid::advisor::AdvisorError;
    use aquaaid::engine::usage::UsageValidationError;

    #[tokio::test]
    async fn reading_pair_injects_the_bill_into_the_persona() {
        let (service, gateway) = build_service("Your bill is 10000 shillings.");
        let mut request = user_turn("Calculate my water bill");
        request.previous_reading = Some(1000.0);
        request.current_reading = Some(1050.0);

        service.chat(request).await.expect("chat succeeds");

        let prompts = gateway.prompts();
        assert!(prompts[0].system_instructions.contains(
            "Current calculation: Previous reading: 1000 units, Current reading: 1050 units, \
             Units used: 50 units, Total bill: 10000 shillings (@ 200 shillings/unit)"
        ));
    }

    #[tokio::test]
    async fn a_lone_reading_adds_no_bill_line() {
        let (service, gateway) = build_service("ok");
        let mut request = user_turn("Calculate my water bill");
        request.current_reading = Some(1050.0);

        service.chat(request).await.expect("chat succeeds");

        let prompts = gateway.prompts();
        assert!(!prompts[0].system_instructions.contains("Current calculation"));
    }

    #[tokio::test]
    async fn regressed_readings_never_reach_the_gateway() {
        let (service, gateway) = build_service("ok");
        let mut request = user_turn("Calculate my water bill");
        request.previous_reading = Some(1050.0);
        request.current_reading = Some(1000.0);

        let error = service
            .chat(request)
            .await
            .expect_err("regression rejected");
        assert!(matches!(
            error,
            AdvisorError::Billing(UsageValidationError::BillReadingsOutOfOrder)
        ));
        assert!(gateway.prompts().is_empty());
    }
}

mod routing {
    use super::common::*;
    use std::sync::Arc;

    use aquaaid::advisor::{advisor_router, AdvisorService};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn chat_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/advisor/chat")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).expect("serialize")))
            .expect("request")
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        serde_json::from_slice(&body).expect("json")
    }

    #[tokio::test]
    async fn chat_endpoint_returns_the_completion_shape() {
        let (service, _) = build_service("Fix the leaking joint first.");
        let router = advisor_router(service);

        let response = router
            .oneshot(chat_request(json!({
                "messages": [ { "role": "user", "content": "I found a leak" } ]
            })))
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);

        let payload = json_body(response).await;
        assert_eq!(
            payload["choices"][0]["message"]["content"],
            "Fix the leaking joint first."
        );
        assert_eq!(payload["choices"][0]["message"]["role"], "assistant");
    }

    #[tokio::test]
    async fn empty_conversation_returns_422() {
        let (service, _) = build_service("ok");
        let router = advisor_router(service);

        let response = router
            .oneshot(chat_request(json!({ "messages": [] })))
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let payload = json_body(response).await;
        assert_eq!(
            payload["error"],
            "conversation must contain at least one message"
        );
    }

    #[tokio::test]
    async fn upstream_failures_map_onto_status_codes() {
        for (failure, expected) in [
            (CannedFailure::RateLimited, StatusCode::TOO_MANY_REQUESTS),
            (CannedFailure::PaymentRequired, StatusCode::PAYMENT_REQUIRED),
            (CannedFailure::Unconfigured, StatusCode::SERVICE_UNAVAILABLE),
            (CannedFailure::Upstream, StatusCode::BAD_GATEWAY),
        ] {
            let service = Arc::new(AdvisorService::new(Arc::new(FailingGateway(failure))));
            let router = advisor_router(service);

            let response = router
                .oneshot(chat_request(json!({
                    "messages": [ { "role": "user", "content": "hello" } ]
                })))
                .await
                .expect("router dispatch");
            assert_eq!(response.status(), expected);

            let payload = json_body(response).await;
            assert!(payload.get("error").is_some());
        }
    }

    #[tokio::test]
    async fn rate_limit_message_is_surfaced_verbatim() {
        let service = Arc::new(AdvisorService::new(Arc::new(FailingGateway(
            CannedFailure::RateLimited,
        ))));
        let router = advisor_router(service);

        let response = router
            .oneshot(chat_request(json!({
                "messages": [ { "role": "user", "content": "hello" } ]
            })))
            .await
            .expect("router dispatch");

        let payload = json_body(response).await;
        assert_eq!(
            payload["error"],
            "Rate limits exceeded, please try again later"
        );
    }
}

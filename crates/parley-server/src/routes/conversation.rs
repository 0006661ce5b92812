use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use parley::conversation::{ConversationResult, DEFAULT_TURNS};
use serde::Deserialize;
use tracing::{error, info};

use crate::error::ErrorResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ConversationRequest {
    topic: String,
    #[serde(default)]
    turns: Option<i64>,
}

impl ConversationRequest {
    /// Requested turns, 3 when absent and never below zero
    fn turns(&self) -> usize {
        match self.turns {
            Some(turns) => usize::try_from(turns.max(0)).unwrap_or(usize::MAX),
            None => DEFAULT_TURNS,
        }
    }
}

async fn start_conversation(
    State(state): State<AppState>,
    payload: Result<Json<ConversationRequest>, JsonRejection>,
) -> Result<Json<ConversationResult>, ErrorResponse> {
    let Json(request) = payload.map_err(|rejection| {
        error!("Rejected conversation request: {}", rejection.body_text());
        ErrorResponse::new(rejection.body_text())
    })?;

    let turns = request.turns();
    info!(topic = %request.topic, turns, "Starting conversation");

    let result = state
        .conversation
        .run(&request.topic, turns)
        .await
        .map_err(|e| {
            error!("Conversation failed: {}", e);
            ErrorResponse::from(e)
        })?;

    Ok(Json(result))
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/conversation", post(start_conversation))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::routes::testing::app_with_reply;

    async fn post_json(app: Router, body: &str) -> Response {
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/conversation")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_single_turn_conversation() {
        let (provider, state) = app_with_reply(Ok("Qubits hold superpositions."));

        let response = post_json(
            routes(state),
            &json!({"topic": "quantum computing", "turns": 1}).to_string(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(
            body["conversation"],
            json!([
                {
                    "agent": "Researcher",
                    "message": "I'd like to learn about quantum computing. Can you teach me about it?"
                },
                {"agent": "Expert", "message": "Qubits hold superpositions."}
            ])
        );
        assert_eq!(body["notes"], json!([]));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_turns_default_to_three() {
        let (provider, state) = app_with_reply(Ok("ok"));

        let response = post_json(routes(state), r#"{"topic": "tides"}"#).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["conversation"].as_array().unwrap().len(), 6);
        assert_eq!(provider.calls(), 5);
    }

    #[tokio::test]
    async fn test_non_positive_turns_only_open() {
        for turns in [0, -4] {
            let (provider, state) = app_with_reply(Ok("ok"));

            let response = post_json(
                routes(state),
                &json!({"topic": "tides", "turns": turns}).to_string(),
            )
            .await;

            assert_eq!(response.status(), StatusCode::OK);
            let body = body_json(response).await;
            assert_eq!(body["conversation"].as_array().unwrap().len(), 1);
            assert_eq!(body["conversation"][0]["agent"], "Researcher");
            assert_eq!(provider.calls(), 0);
        }
    }

    #[tokio::test]
    async fn test_provider_failure_is_reported() {
        let (_, state) = app_with_reply(Err("Request failed: 401 Unauthorized - invalid x-api-key"));

        let response = post_json(routes(state), r#"{"topic": "tides", "turns": 2}"#).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(
            body,
            json!({"error": "Request failed: 401 Unauthorized - invalid x-api-key"})
        );
    }

    #[tokio::test]
    async fn test_missing_topic_is_an_error() {
        let (provider, state) = app_with_reply(Ok("ok"));

        let response = post_json(routes(state), r#"{"turns": 2}"#).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("topic"));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_malformed_body_is_an_error() {
        let (_, state) = app_with_reply(Ok("ok"));

        let response = post_json(routes(state), "{not json").await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(body["error"].is_string());
    }

    #[test]
    fn test_requested_turns() {
        let parse = |body: Value| serde_json::from_value::<ConversationRequest>(body).unwrap();

        assert_eq!(parse(json!({"topic": "t"})).turns(), 3);
        assert_eq!(parse(json!({"topic": "t", "turns": null})).turns(), 3);
        assert_eq!(parse(json!({"topic": "t", "turns": 5})).turns(), 5);
        assert_eq!(parse(json!({"topic": "t", "turns": -1})).turns(), 0);
    }
}

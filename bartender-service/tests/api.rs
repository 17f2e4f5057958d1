//! HTTP surface tests: the app runs on a random port with an in-memory
//! store and a mock chat provider; no Redis or upstream APIs needed.

use bartender_service::config::{
    BartenderConfig, ImageConfig, LlmConfig, RedisConfig, SessionConfig,
    DEFAULT_SESSION_TTL_SECONDS,
};
use bartender_service::services::providers::mock::MockChatProvider;
use bartender_service::services::MockStore;
use bartender_service::{AppState, Application};
use reqwest::Client;
use std::sync::Arc;

/// Structured reply the mock provider hands back for bartender runs.
const BARTENDER_REPLY: &str = r#"{
    "cocktail": {
        "name": "Negroni",
        "description": "A bittersweet Italian classic.",
        "match_reason": "Matches a contemplative mood.",
        "base_spirit": "gin",
        "alcohol_level": "high",
        "flavor_profiles": ["bitter", "herbal"],
        "ingredients": [
            {"name": "Gin", "amount": "30", "unit": "ml", "is_garnish": false},
            {"name": "Campari", "amount": "30", "unit": "ml", "is_garnish": false},
            {"name": "Sweet vermouth", "amount": "30", "unit": "ml", "is_garnish": false}
        ],
        "steps": [
            {"step_number": 1, "description": "Stir all ingredients with ice."},
            {"step_number": 2, "description": "Strain over a large ice cube."}
        ],
        "tools": [
            {"name": "Mixing glass", "alternative": "Sturdy jar"}
        ],
        "serving_glass": "Rocks glass"
    }
}"#;

fn test_config() -> BartenderConfig {
    BartenderConfig {
        common: service_core::config::Config {
            port: 0,
            log_level: "info".to_string(),
            environment: "test".to_string(),
        },
        redis: RedisConfig {
            url: "redis://localhost:6379".to_string(),
        },
        llm: LlmConfig {
            api_key: "test-key".to_string(),
            base_url: "http://127.0.0.1:9".to_string(),
            chat_model: "deepseek-v3-250324".to_string(),
        },
        image: ImageConfig {
            api_key: "test-key".to_string(),
            // Closed port: background image generation fails fast and is
            // swallowed, which is exactly the contract under test
            base_url: "http://127.0.0.1:9".to_string(),
            model: "black-forest-labs/FLUX.1-schnell".to_string(),
            image_size: "1024x1024".to_string(),
        },
        session: SessionConfig {
            ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
        },
        otlp_endpoint: None,
    }
}

async fn spawn_app(reply: &str) -> String {
    let state = AppState::new(
        test_config(),
        Arc::new(MockStore::new()),
        Arc::new(MockChatProvider::new(reply)),
    )
    .expect("failed to build state");

    let app = Application::with_state(state)
        .await
        .expect("failed to build application");
    let base_url = format!("http://127.0.0.1:{}", app.port());

    tokio::spawn(async move {
        let _ = app.run_until_stopped().await;
    });

    base_url
}

#[tokio::test]
async fn health_check_returns_ok() {
    let base = spawn_app("hi").await;
    let client = Client::new();

    let response = client
        .get(format!("{}/health", base))
        .send()
        .await
        .expect("request failed");

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.expect("invalid json");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "bartender-service");
}

#[tokio::test]
async fn session_create_verify_delete_flow() {
    let base = spawn_app("hi").await;
    let client = Client::new();

    // Create
    let response = client
        .post(format!("{}/api/v1/session", base))
        .json(&serde_json::json!({"user_id": 42}))
        .send()
        .await
        .expect("request failed");
    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.expect("invalid json");
    assert_eq!(body["expires_in"], 24 * 60 * 60);
    let session_id = body["session_id"].as_str().expect("missing session_id").to_string();

    // Verify true
    let response = client
        .post(format!("{}/api/v1/session/verify", base))
        .json(&serde_json::json!({"user_id": 42, "session_id": session_id}))
        .send()
        .await
        .expect("request failed");
    let body: serde_json::Value = response.json().await.expect("invalid json");
    assert_eq!(body["valid"], true);

    // Metadata fetch
    let response = client
        .get(format!("{}/api/v1/session/42/{}", base, session_id))
        .send()
        .await
        .expect("request failed");
    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.expect("invalid json");
    assert_eq!(body["user_id"], 42);

    // Delete, then verify false
    let response = client
        .delete(format!("{}/api/v1/session/42/{}", base, session_id))
        .send()
        .await
        .expect("request failed");
    assert!(response.status().is_success());

    let response = client
        .post(format!("{}/api/v1/session/verify", base))
        .json(&serde_json::json!({"user_id": 42, "session_id": session_id}))
        .send()
        .await
        .expect("request failed");
    let body: serde_json::Value = response.json().await.expect("invalid json");
    assert_eq!(body["valid"], false);

    // Delete again: still 200
    let response = client
        .delete(format!("{}/api/v1/session/42/{}", base, session_id))
        .send()
        .await
        .expect("request failed");
    assert!(response.status().is_success());
}

#[tokio::test]
async fn unknown_session_metadata_is_404() {
    let base = spawn_app("hi").await;
    let client = Client::new();

    let response = client
        .get(format!("{}/api/v1/session/1/never-created", base))
        .send()
        .await
        .expect("request failed");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn revoke_all_sessions_keeps_current_one() {
    let base = spawn_app("hi").await;
    let client = Client::new();

    let mut session_ids = Vec::new();
    for _ in 0..3 {
        let body: serde_json::Value = client
            .post(format!("{}/api/v1/session", base))
            .json(&serde_json::json!({"user_id": 9}))
            .send()
            .await
            .expect("request failed")
            .json()
            .await
            .expect("invalid json");
        session_ids.push(body["session_id"].as_str().expect("missing id").to_string());
    }

    let keep = &session_ids[1];
    let body: serde_json::Value = client
        .delete(format!("{}/api/v1/session/9?keep={}", base, keep))
        .send()
        .await
        .expect("request failed")
        .json()
        .await
        .expect("invalid json");
    assert_eq!(body["revoked"], 2);

    let body: serde_json::Value = client
        .post(format!("{}/api/v1/session/verify", base))
        .json(&serde_json::json!({"user_id": 9, "session_id": keep}))
        .send()
        .await
        .expect("request failed")
        .json()
        .await
        .expect("invalid json");
    assert_eq!(body["valid"], true);
}

#[tokio::test]
async fn cocktail_image_not_ready_is_404_with_message() {
    let base = spawn_app("hi").await;
    let client = Client::new();

    let response = client
        .get(format!(
            "{}/api/v1/agents/cocktail_image?user_id=7&session_id=nonexistent-session",
            base
        ))
        .send()
        .await
        .expect("request failed");
    assert_eq!(response.status(), 404);

    let body: serde_json::Value = response.json().await.expect("invalid json");
    assert_eq!(body["error"], "Image not found or not ready yet");
}

#[tokio::test]
async fn list_agents_returns_roster() {
    let base = spawn_app("hi").await;
    let client = Client::new();

    let body: serde_json::Value = client
        .get(format!("{}/api/v1/agents/list_agents", base))
        .send()
        .await
        .expect("request failed")
        .json()
        .await
        .expect("invalid json");

    assert_eq!(
        body,
        serde_json::json!(["classic_bartender", "creative_bartender", "casual_chat"])
    );
}

#[tokio::test]
async fn classic_bartender_returns_structured_recommendation() {
    let base = spawn_app(BARTENDER_REPLY).await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/v1/agents/classic_bartender", base))
        .json(&serde_json::json!({
            "message": "Feeling contemplative tonight",
            "user_id": 7,
            "session_id": "sess-1",
            "alcohol_level": "high"
        }))
        .send()
        .await
        .expect("request failed");
    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("invalid json");
    assert_eq!(body["cocktail"]["name"], "Negroni");
    assert_eq!(body["cocktail"]["base_spirit"], "gin");
}

#[tokio::test]
async fn bartender_with_unparseable_reply_is_502() {
    let base = spawn_app("this is not json").await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/v1/agents/creative_bartender", base))
        .json(&serde_json::json!({"message": "surprise me"}))
        .send()
        .await
        .expect("request failed");
    assert_eq!(response.status(), 502);
}

#[tokio::test]
async fn casual_chat_streams_event_stream() {
    let base = spawn_app("cheers!").await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/v1/agents/casual_chat", base))
        .json(&serde_json::json!({"message": "hello there"}))
        .send()
        .await
        .expect("request failed");
    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get("content-type")
            .and_then(|h| h.to_str().ok()),
        Some("text/event-stream")
    );

    let body = response.text().await.expect("stream read failed");
    assert!(body.contains("Mock stream: cheers!"));
}

#[tokio::test]
async fn make_image_returns_immediately_and_failure_is_swallowed() {
    let base = spawn_app("hi").await;
    let client = Client::new();

    let response = client
        .post(format!(
            "{}/api/v1/agents/make_image?user_id=7&session_id=sess-img",
            base
        ))
        .send()
        .await
        .expect("request failed");
    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.expect("invalid json");
    assert_eq!(body["status"], "generating");

    // Generation runs against a closed port and fails; the failure never
    // surfaces, the artifact just stays absent
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    let response = client
        .get(format!(
            "{}/api/v1/agents/cocktail_image?user_id=7&session_id=sess-img",
            base
        ))
        .send()
        .await
        .expect("request failed");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn invalid_session_request_is_rejected() {
    let base = spawn_app("hi").await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/v1/session", base))
        .json(&serde_json::json!({"user_id": 0}))
        .send()
        .await
        .expect("request failed");
    assert_eq!(response.status(), 422);
}

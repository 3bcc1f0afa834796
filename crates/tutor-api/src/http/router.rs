//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`, with `/health` also served at the root.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // AI tutor
        .route("/ai-tutor/chat", post(handlers::tutor::chat))
        .route("/ai-tutor/hint", post(handlers::tutor::hint))
        .route(
            "/ai-tutor/analyze-image",
            post(handlers::tutor::analyze_image),
        )
        // Curriculum
        .route("/curriculum/search", get(handlers::curriculum::search))
        .route("/health", get(handlers::health::health_check));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(handlers::health::health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use tempfile::TempDir;

    use tutor_infra::llm::offline::OFFLINE_REPLY;
    use tutor_types::config::AppConfig;
    use tutor_types::entity::NewLesson;

    /// Spawn the router on an ephemeral port; returns the base URL.
    async fn spawn_app(tmp: &TempDir) -> (String, AppState) {
        let state = AppState::build(AppConfig::default(), tmp.path())
            .await
            .unwrap();
        let router = build_router(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        (format!("http://{addr}"), state)
    }

    fn lesson(grade_level: i32, title: &str, content: &str) -> NewLesson {
        NewLesson {
            chapter_id: format!("grade-{grade_level}"),
            grade_level,
            title: String::new(),
            title_ar: title.to_string(),
            content: content.to_string(),
            order: 0,
        }
    }

    #[tokio::test]
    async fn chat_returns_offline_reply_in_envelope() {
        let tmp = TempDir::new().unwrap();
        let (base, _state) = spawn_app(&tmp).await;

        let response = reqwest::Client::new()
            .post(format!("{base}/api/v1/ai-tutor/chat"))
            .json(&json!({
                "message": "ما هو ٢+٢؟",
                "gradeLevel": 1,
                "chatHistory": [],
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["data"]["response"], OFFLINE_REPLY);
        assert!(body["meta"]["request_id"].is_string());
        assert!(body.get("errors").is_none());
    }

    #[tokio::test]
    async fn chat_rejects_out_of_range_grade() {
        let tmp = TempDir::new().unwrap();
        let (base, _state) = spawn_app(&tmp).await;

        let response = reqwest::Client::new()
            .post(format!("{base}/api/v1/ai-tutor/chat"))
            .json(&json!({"message": "مرحبا", "gradeLevel": 13}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 400);

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["errors"][0]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn chat_rejects_blank_message() {
        let tmp = TempDir::new().unwrap();
        let (base, _state) = spawn_app(&tmp).await;

        let response = reqwest::Client::new()
            .post(format!("{base}/api/v1/ai-tutor/chat"))
            .json(&json!({"message": "   ", "gradeLevel": 3}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 400);
    }

    #[tokio::test]
    async fn hint_returns_offline_reply() {
        let tmp = TempDir::new().unwrap();
        let (base, _state) = spawn_app(&tmp).await;

        let response = reqwest::Client::new()
            .post(format!("{base}/api/v1/ai-tutor/hint"))
            .json(&json!({"problem": "٣ × ٤ = ؟", "gradeLevel": 2}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["data"]["hint"], OFFLINE_REPLY);
    }

    #[tokio::test]
    async fn analyze_image_returns_structured_analysis() {
        let tmp = TempDir::new().unwrap();
        let (base, _state) = spawn_app(&tmp).await;

        let response = reqwest::Client::new()
            .post(format!("{base}/api/v1/ai-tutor/analyze-image"))
            .json(&json!({"image_base64": "data:image/png;base64,AAEC"}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        let body: Value = response.json().await.unwrap();
        assert!(body["data"]["problem_text"].is_string());
    }

    #[tokio::test]
    async fn analyze_image_rejects_missing_media_type() {
        let tmp = TempDir::new().unwrap();
        let (base, _state) = spawn_app(&tmp).await;

        let response = reqwest::Client::new()
            .post(format!("{base}/api/v1/ai-tutor/analyze-image"))
            .json(&json!({"image_base64": "AAEC"}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 400);
    }

    #[tokio::test]
    async fn curriculum_search_finds_imported_lesson() {
        let tmp = TempDir::new().unwrap();
        let (base, state) = spawn_app(&tmp).await;
        state
            .store
            .import_lessons(vec![
                lesson(1, "الجمع", "نجمع الأعداد الصغيرة"),
                lesson(2, "الطرح", "نطرح الأعداد"),
            ])
            .await
            .unwrap();

        let response = reqwest::Client::new()
            .get(format!("{base}/api/v1/curriculum/search"))
            .query(&[("q", "الجمع"), ("grade", "1")])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        let body: Value = response.json().await.unwrap();
        let items = body["data"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["title"], "الجمع");
    }

    #[tokio::test]
    async fn health_reports_gateway() {
        let tmp = TempDir::new().unwrap();
        let (base, _state) = spawn_app(&tmp).await;

        for path in ["/health", "/api/v1/health"] {
            let body: Value = reqwest::get(format!("{base}{path}"))
                .await
                .unwrap()
                .json()
                .await
                .unwrap();
            assert_eq!(body["status"], "ok");
            assert_eq!(body["gateway"], "offline");
            assert_eq!(body["lessons"], 0);
        }
    }
}

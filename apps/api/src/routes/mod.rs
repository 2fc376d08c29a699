pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::ingest::handlers as ingest_handlers;
use crate::lesson::handlers as lesson_handlers;
use crate::settings::handlers as settings_handlers;
use crate::state::AppState;

/// Headroom for the JSON envelope around a base64 PDF.
const ENVELOPE_BYTES: usize = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    // A PDF travels back as base64 inside JSON, which is 4/3 of the raw upload.
    let body_limit = state.config.max_upload_bytes / 3 * 4 + ENVELOPE_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/catalog", get(lesson_handlers::handle_catalog))
        .route(
            "/api/v1/files/process",
            post(ingest_handlers::handle_process_file),
        )
        .route("/api/v1/lesson-plans", post(lesson_handlers::handle_create))
        .route(
            "/api/v1/lesson-plans/enhance",
            post(lesson_handlers::handle_enhance),
        )
        .route(
            "/api/v1/settings/model",
            get(settings_handlers::handle_get_model).put(settings_handlers::handle_set_model),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::ingest::docx::tests::build_docx;
    use crate::lesson::service::tests::StubGenerator;
    use crate::lesson::service::GenerationSlot;
    use crate::llm_client::GenerationError;
    use crate::settings::{ModelStore, DEFAULT_MODEL};

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn test_config(dir: &TempDir) -> Config {
        Config {
            gemini_api_key: "test-key".to_string(),
            gemini_api_url: "http://127.0.0.1:1".to_string(),
            model_store_path: dir.path().join("model.json"),
            generation_timeout_secs: 5,
            max_upload_bytes: 1024 * 1024,
            port: 0,
            rust_log: "info".to_string(),
        }
    }

    async fn test_state(
        reply: Result<String, GenerationError>,
    ) -> (AppState, Arc<StubGenerator>, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);
        let generator = Arc::new(StubGenerator::replying(reply));
        let state = AppState {
            generator: generator.clone(),
            models: ModelStore::load(config.model_store_path.clone()).await,
            slot: GenerationSlot::default(),
            config,
        };
        (state, generator, dir)
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn upload_request(file_name: &str, content_type: &str, bytes: &[u8]) -> Request<Body> {
        let boundary = "lessonplan-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/v1/files/process")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 4 * 1_048_576)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_health() {
        let (state, _, _dir) = test_state(Ok(String::new())).await;
        let response = build_router(state)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_catalog_lists_taxonomy_and_defaults() {
        let (state, _, _dir) = test_state(Ok(String::new())).await;
        let response = build_router(state)
            .oneshot(Request::builder().uri("/api/v1/catalog").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["competencies"].as_array().unwrap().len(), 7);
        assert_eq!(body["competencies"][5]["items"][1]["id"], "6.2");
        assert_eq!(body["grades"].as_array().unwrap().len(), 7);
        assert_eq!(body["subjects"][0], "Toán");
        assert_eq!(body["defaults"]["grade"], "12");
    }

    #[tokio::test]
    async fn test_process_plain_text_upload() {
        let (state, _, _dir) = test_state(Ok(String::new())).await;
        let response = build_router(state)
            .oneshot(upload_request("notes.txt", "text/plain", "Đạo hàm cấp 1".as_bytes()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body, json!({"type": "text", "content": "Đạo hàm cấp 1", "fileName": "notes.txt"}));
    }

    #[tokio::test]
    async fn test_process_docx_upload() {
        let (state, _, _dir) = test_state(Ok(String::new())).await;
        let docx = build_docx(
            r#"<w:p><w:r><w:t>I. MỤC TIÊU</w:t></w:r></w:p><w:p><w:r><w:t>1. Kiến thức</w:t></w:r></w:p>"#,
        );
        let response = build_router(state)
            .oneshot(upload_request(
                "giao-an.docx",
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
                &docx,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["type"], "text");
        assert_eq!(body["content"], "I. MỤC TIÊU\n1. Kiến thức");
    }

    #[tokio::test]
    async fn test_process_pdf_upload_returns_pdf_part() {
        let (state, _, _dir) = test_state(Ok(String::new())).await;
        let response = build_router(state)
            .oneshot(upload_request("sgk.pdf", "application/pdf", b"%PDF-1.4\n%%EOF"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["type"], "pdf_part");
        assert_eq!(body["content"], "JVBERi0xLjQKJSVFT0Y=");
    }

    #[tokio::test]
    async fn test_process_unsupported_upload() {
        let (state, _, _dir) = test_state(Ok(String::new())).await;
        let response = build_router(state)
            .oneshot(upload_request("setup.exe", "application/octet-stream", b"MZ"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body_json(response).await["error"]["code"], "UNSUPPORTED_FORMAT");
    }

    #[tokio::test]
    async fn test_create_lesson_plan() {
        let (state, generator, _dir) = test_state(Ok("  Trường: ABC...  ".to_string())).await;
        let request = json_request(
            "POST",
            "/api/v1/lesson-plans",
            json!({
                "input": {"subject": "Toán", "grade": "12", "lessonName": "Đạo hàm", "selectedNls": []}
            }),
        );
        let response = build_router(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["content"], "Trường: ABC...");
        assert_eq!(body["model"], DEFAULT_MODEL);
        assert!(body["id"].is_string());
        assert!(body["generatedAt"].is_string());

        let calls = generator.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].0.contains("Đạo hàm"));
        assert!(calls[0].1.is_none());
    }

    #[tokio::test]
    async fn test_create_without_lesson_name_never_calls_model() {
        let (state, generator, _dir) = test_state(Ok("x".to_string())).await;
        let request = json_request(
            "POST",
            "/api/v1/lesson-plans",
            json!({"input": {"lessonName": "  "}}),
        );
        let response = build_router(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(generator.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_enhance_with_pdf_forwards_attachment() {
        let (state, generator, _dir) = test_state(Ok("Trường: XYZ".to_string())).await;
        let request = json_request(
            "POST",
            "/api/v1/lesson-plans/enhance",
            json!({
                "file": {"type": "pdf_part", "content": "JVBERi0xLjQKJSVFT0Y=", "fileName": "cu.pdf"}
            }),
        );
        let response = build_router(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let calls = generator.calls.lock().unwrap();
        let attachment = calls[0].1.as_ref().unwrap();
        assert_eq!(attachment.mime_type, "application/pdf");
        assert_eq!(attachment.data, "JVBERi0xLjQKJSVFT0Y=");
        assert!(calls[0].0.contains("cu.pdf"));
    }

    #[tokio::test]
    async fn test_upstream_message_is_forwarded() {
        let (state, _, _dir) = test_state(Err(GenerationError::Transport(
            "API key not valid. Please pass a valid API key.".to_string(),
        )))
        .await;
        let request = json_request(
            "POST",
            "/api/v1/lesson-plans/enhance",
            json!({"content": "Giáo án cũ"}),
        );
        let response = build_router(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "TRANSPORT_ERROR");
        assert_eq!(
            body["error"]["message"],
            "API key not valid. Please pass a valid API key."
        );
    }

    #[tokio::test]
    async fn test_empty_response_maps_to_retry_message() {
        let (state, _, _dir) = test_state(Err(GenerationError::EmptyResponse)).await;
        let request = json_request(
            "POST",
            "/api/v1/lesson-plans/enhance",
            json!({"content": "Giáo án cũ"}),
        );
        let response = build_router(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            body_json(response).await["error"]["message"],
            crate::errors::EMPTY_RESPONSE_MESSAGE
        );
    }

    #[tokio::test]
    async fn test_model_selection_round_trip() {
        let (state, generator, _dir) = test_state(Ok("ok".to_string())).await;
        let app = build_router(state);

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/v1/settings/model",
                json!({"model": "gemini-3-pro-preview"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["current"], "gemini-3-pro-preview");
        assert_eq!(body["available"].as_array().unwrap().len(), 3);

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/v1/settings/model",
                json!({"model": "not-a-model"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/lesson-plans",
                json!({"input": {"lessonName": "Đạo hàm"}}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["model"], "gemini-3-pro-preview");
        assert_eq!(generator.calls.lock().unwrap()[0].2, "gemini-3-pro-preview");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/settings/model")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(body_json(response).await["current"], "gemini-3-pro-preview");
    }
}

pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers as generation;
use crate::jobs::handlers as jobs;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Agent tools
        .route(
            "/api/v1/tools/career-crafter",
            post(generation::handle_career_crafter),
        )
        .route("/api/v1/tools/get-job", post(jobs::handle_get_job))
        // Direct artifact generation from job text
        .route("/api/v1/artifacts", post(generation::handle_generate_artifacts))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::config::GenerationSettings;
    use crate::generation::crafter::CareerCrafter;
    use crate::generation::generator::TemplateGenerator;
    use crate::jobs::JobSearchClient;
    use crate::ocr::OcrClient;

    const JOB_TEXT: &str = "Senior Rust Engineer at Acme Corp\n\
        Acme is a fintech startup. You will build Rust services on AWS with Docker \
        and collaborate closely with product.";

    fn app(ocr_server: &MockServer) -> Router {
        let timeout = Duration::from_secs(5);
        let state = AppState {
            ocr: OcrClient::new(
                "test-key".to_string(),
                format!("{}/parse/imageurl", ocr_server.uri()),
                timeout,
            )
            .unwrap()
            .with_backoff(Duration::from_millis(5)),
            jobs: JobSearchClient::new(None, format!("{}/api/jobs/", ocr_server.uri()), timeout)
                .unwrap(),
            crafter: Arc::new(CareerCrafter::new(
                Arc::new(TemplateGenerator),
                GenerationSettings::default(),
            )),
        };
        build_router(state)
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn mount_ocr(server: &MockServer, body: Value) {
        Mock::given(method("POST"))
            .and(path("/parse/imageurl"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_health() {
        let server = MockServer::start().await;
        let response = app(&server)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["service"], "careercrafter-api");
    }

    #[tokio::test]
    async fn test_career_crafter_end_to_end() {
        let server = MockServer::start().await;
        mount_ocr(
            &server,
            json!({"ParsedResults": [{"ParsedText": JOB_TEXT}], "IsErroredOnProcessing": false}),
        )
        .await;

        let (status, body) = post_json(
            app(&server),
            "/api/v1/tools/career-crafter",
            json!({"jobImage": "https://img.example.com/job.png", "userInfo": ""}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let letter = body["coverLetter"].as_str().unwrap();
        assert!(letter.starts_with("Dear Hiring Manager,"));
        assert!(letter.contains("Senior Rust Engineer position at Acme Corp"));
        assert!(letter.contains("[Your Name]"));
        let tips = body["interviewTips"].as_array().unwrap();
        assert!((3..=5).contains(&tips.len()));
    }

    #[tokio::test]
    async fn test_invalid_job_image_is_bad_request() {
        let server = MockServer::start().await;
        let (status, body) = post_json(
            app(&server),
            "/api/v1/tools/career-crafter",
            json!({"jobImage": "not a url", "userInfo": "Rust developer"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_ocr_processing_error_is_bad_gateway() {
        let server = MockServer::start().await;
        mount_ocr(
            &server,
            json!({"IsErroredOnProcessing": true, "ErrorMessage": ["File failed validation"]}),
        )
        .await;

        let (status, body) = post_json(
            app(&server),
            "/api/v1/tools/career-crafter",
            json!({"jobImage": "https://img.example.com/job.pdf", "userInfo": ""}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "OCR_SERVICE_FAILURE");
    }

    #[tokio::test]
    async fn test_artifacts_returns_full_result() {
        let server = MockServer::start().await;
        let (status, body) = post_json(
            app(&server),
            "/api/v1/artifacts",
            json!({"jobText": JOB_TEXT, "userInfo": "My name is Ada. I have 5 years of Rust experience."}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cache_hit"], false);
        assert_eq!(body["backend"], "template");
        assert!(body["cover_letter"]["body"]
            .as_str()
            .unwrap()
            .ends_with("Sincerely,\nAda"));
    }

    #[tokio::test]
    async fn test_artifacts_rejects_short_text() {
        let server = MockServer::start().await;
        let (status, body) = post_json(
            app(&server),
            "/api/v1/artifacts",
            json!({"jobText": "Rust dev", "userInfo": ""}),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "JOB_TEXT_EMPTY");
    }

    #[tokio::test]
    async fn test_get_job_requires_skills_or_location() {
        let server = MockServer::start().await;
        let (status, _) = post_json(
            app(&server),
            "/api/v1/tools/get-job",
            json!({"location": "", "skills": " ", "remote": true}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_job_without_api_key_is_configuration_error() {
        let server = MockServer::start().await;
        let (status, body) = post_json(
            app(&server),
            "/api/v1/tools/get-job",
            json!({"skills": "rust"}),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "CONFIGURATION_ERROR");
    }
}

//! # API REST
//!
//! REST API for LepCare.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI documentation (served as JSON at `/api-docs/openapi.json`)
//! - REST-specific concerns (JSON serialization, CORS, body limits, the analysis delay)
//!
//! All clinical logic lives in `lepcare-core`; handlers lock shared state, make one core call
//! and translate the result.

#![warn(rust_2018_idioms)]

pub mod dto;
mod handlers;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use lepcare_core::{
    CoreConfig, CoreError, FakeClassifier, PatientRoster, SampleData, SkinClassifier,
    TreatmentLedger,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;

/// Application state shared by all request handlers.
///
/// The roster and ledger are single-writer structures; each handler holds the lock for exactly
/// one core call.
#[derive(Clone)]
pub struct AppState {
    cfg: Arc<CoreConfig>,
    roster: Arc<Mutex<PatientRoster>>,
    ledger: Arc<Mutex<TreatmentLedger>>,
    classifier: Arc<dyn SkinClassifier + Send + Sync>,
}

impl AppState {
    /// State seeded from `data`, classifying images with [`FakeClassifier`].
    pub fn new(cfg: Arc<CoreConfig>, data: SampleData) -> Self {
        Self {
            cfg,
            roster: Arc::new(Mutex::new(data.roster)),
            ledger: Arc::new(Mutex::new(data.ledger)),
            classifier: Arc::new(FakeClassifier::new()),
        }
    }

    /// Replace the image classifier.
    pub fn with_classifier(mut self, classifier: Arc<dyn SkinClassifier + Send + Sync>) -> Self {
        self.classifier = classifier;
        self
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::list_questions,
        handlers::evaluate_answers,
        handlers::analyse_image,
        handlers::list_patients,
        handlers::create_patient,
        handlers::list_treatments,
        handlers::treatment_summary,
        handlers::treatments_due,
        handlers::complete_dose,
    ),
    components(schemas(
        dto::HealthRes,
        dto::QuestionRes,
        dto::QuestionsRes,
        dto::EvaluateReq,
        dto::AssessmentRes,
        dto::ImageAnalysisRes,
        dto::CreatePatientReq,
        dto::PatientRes,
        dto::ListPatientsRes,
        dto::TreatmentRes,
        dto::ListTreatmentsRes,
        dto::SummaryRes,
    ))
)]
pub struct ApiDoc;

/// Build the REST router over `state`.
///
/// Request bodies are capped at the configured image size limit.
pub fn router(state: AppState) -> Router {
    let body_limit = state.cfg.max_image_bytes();

    Router::new()
        .route("/health", get(handlers::health))
        .route("/screening/questions", get(handlers::list_questions))
        .route("/screening/evaluate", post(handlers::evaluate_answers))
        .route("/screening/image", post(handlers::analyse_image))
        .route("/patients", get(handlers::list_patients))
        .route("/patients", post(handlers::create_patient))
        .route("/treatments", get(handlers::list_treatments))
        .route("/treatments/summary", get(handlers::treatment_summary))
        .route("/treatments/due", get(handlers::treatments_due))
        .route("/treatments/:id/doses", post(handlers::complete_dose))
        .route("/api-docs/openapi.json", get(handlers::openapi_json))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub(crate) type ApiError = (StatusCode, String);

/// Map a core error to a status and message.
///
/// Caller mistakes are echoed back; anything else is logged and reported as an internal error.
pub(crate) fn api_error(context: &'static str, err: CoreError) -> ApiError {
    let status = match &err {
        CoreError::InvalidInput(_)
        | CoreError::Validation(_)
        | CoreError::InvalidImage(_)
        | CoreError::Id(_) => StatusCode::BAD_REQUEST,
        CoreError::NotFound(_) | CoreError::EmptyLedger => StatusCode::NOT_FOUND,
        CoreError::Fixture { .. } | CoreError::InvalidConfig(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    if status.is_server_error() {
        tracing::error!("{} error: {:?}", context, err);
        (status, "Internal error".into())
    } else {
        tracing::warn!("{} rejected: {}", context, err);
        (status, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use lepcare_core::{CoreResult, ImageFinding, SkinImage};
    use serde_json::{json, Value};
    use std::time::Duration;
    use tower::ServiceExt;

    const PNG_HEADER: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];
    const ADAMU_TREATMENT: &str = "a1b2c3d4e5f60718293a4b5c6d7e8f90";

    struct AlwaysHigh;

    impl SkinClassifier for AlwaysHigh {
        fn classify(&self, _image: &SkinImage) -> CoreResult<ImageFinding> {
            Ok(FakeClassifier::finding_for_draw(0.0))
        }
    }

    fn test_app() -> Router {
        let cfg = Arc::new(CoreConfig::new(14, Duration::ZERO, 1024).unwrap());
        let data = SampleData::builtin(&cfg).unwrap();
        router(AppState::new(cfg, data).with_classifier(Arc::new(AlwaysHigh)))
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, body)
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn json_req(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (status, body) = send(test_app(), get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn lists_five_questions_in_order() {
        let (status, body) = send(test_app(), get_req("/screening/questions")).await;
        assert_eq!(status, StatusCode::OK);
        let questions = body["questions"].as_array().unwrap();
        assert_eq!(questions.len(), 5);
        assert_eq!(questions[0]["index"], 0);
        assert_eq!(questions[0]["key"], "skin_patches");
        assert_eq!(body["options"], json!(["Yes", "No", "Not sure"]));
    }

    #[tokio::test]
    async fn evaluate_scores_answers() {
        let req = json_req(
            "/screening/evaluate",
            json!({ "answers": ["yes", "not sure", "not sure", "no", "no"] }),
        );
        let (status, body) = send(test_app(), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["level"], "Medium");
        assert_eq!(body["derived_from"], "questionnaire");
    }

    #[tokio::test]
    async fn evaluate_rejects_wrong_length_and_unknown_answers() {
        let short = json_req("/screening/evaluate", json!({ "answers": ["yes", "no"] }));
        let (status, body) = send(test_app(), short).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.as_str().unwrap().contains("expected 5 observations"));

        let odd = json_req(
            "/screening/evaluate",
            json!({ "answers": ["yes", "no", "maybe", "no", "no"] }),
        );
        let (status, _) = send(test_app(), odd).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn image_upload_passes_classifier_level_through() {
        let req = Request::post("/screening/image")
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .body(Body::from(PNG_HEADER.to_vec()))
            .unwrap();
        let (status, body) = send(test_app(), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["assessment"]["level"], "High");
        assert_eq!(body["assessment"]["derived_from"], "image_analysis");
        assert_eq!(body["media_type"], "image/png");
        assert_eq!(body["findings"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn image_upload_rejects_non_images_and_oversized_bodies() {
        let text = Request::post("/screening/image")
            .body(Body::from("not a picture"))
            .unwrap();
        let (status, _) = send(test_app(), text).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let mut big = PNG_HEADER.to_vec();
        big.resize(4096, 0);
        let oversized = Request::post("/screening/image")
            .body(Body::from(big))
            .unwrap();
        let (status, _) = send(test_app(), oversized).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn search_patients_by_location() {
        let (status, body) = send(test_app(), get_req("/patients?q=lagos")).await;
        assert_eq!(status, StatusCode::OK);
        let patients = body["patients"].as_array().unwrap();
        assert_eq!(patients.len(), 1);
        assert_eq!(patients[0]["name"], "Fatima Yusuf");

        let (_, all) = send(test_app(), get_req("/patients")).await;
        assert_eq!(all["patients"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn create_patient_then_find_it() {
        let app = test_app();
        let req = json_req(
            "/patients",
            json!({
                "name": "Amina Bello",
                "age": "41",
                "phone": "+234 805 000 1111",
                "location": "Kaduna, Nigeria",
                "stage": "Suspected",
                "today": "2024-06-10"
            }),
        );
        let (status, body) = send(app.clone(), req).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["next_appointment"], "2024-06-24");
        assert_eq!(body["risk_level"], "Medium");

        let (_, found) = send(app, get_req("/patients?q=amina")).await;
        assert_eq!(found["patients"][0]["id"], body["id"]);
    }

    #[tokio::test]
    async fn create_patient_rejects_bad_age() {
        let req = json_req(
            "/patients",
            json!({
                "name": "Amina Bello",
                "age": "forty",
                "phone": "+234 805 000 1111",
                "location": "Kaduna, Nigeria",
                "stage": "Suspected"
            }),
        );
        let (status, _) = send(test_app(), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn summary_counts_due_and_overdue() {
        let (status, body) = send(test_app(), get_req("/treatments/summary?today=2024-06-20")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["active_treatments"], 2);
        assert_eq!(body["average_adherence"], 92);
        assert_eq!(body["due_today"], 1);
        assert_eq!(body["overdue"], 1);

        let (_, due) = send(test_app(), get_req("/treatments/due?today=2024-06-20")).await;
        assert_eq!(due["treatments"][0]["patient_name"], "Fatima Yusuf");
    }

    #[tokio::test]
    async fn complete_dose_increments_and_maps_errors() {
        let app = test_app();
        let uri = format!("/treatments/{ADAMU_TREATMENT}/doses");
        let (status, body) = send(app.clone(), Request::post(uri).body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["completed_doses"], 17);

        let unknown = Request::post("/treatments/00000000000000000000000000000000/doses")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(app.clone(), unknown).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let malformed = Request::post("/treatments/not-an-id/doses")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(app, malformed).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn serves_openapi_document() {
        let (status, body) = send(test_app(), get_req("/api-docs/openapi.json")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/screening/evaluate"].is_object());
    }

    #[tokio::test]
    async fn summary_of_empty_ledger_reports_null_average() {
        let cfg = Arc::new(CoreConfig::new(14, Duration::ZERO, 1024).unwrap());
        let data = SampleData::parse("{}", &cfg).unwrap();
        let app = router(AppState::new(cfg, data));

        let (status, body) = send(app, get_req("/treatments/summary?today=2024-06-20")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["active_treatments"], 0);
        assert!(body["average_adherence"].is_null());
    }

    #[test]
    fn empty_ledger_maps_to_not_found() {
        let (status, message) = api_error("Summary", CoreError::EmptyLedger);
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(message, "treatment ledger is empty");
    }
}

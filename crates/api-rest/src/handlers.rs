use crate::dto::{
    AssessmentRes, CreatePatientReq, EvaluateReq, HealthRes, ImageAnalysisRes, ListPatientsRes,
    ListTreatmentsRes, PatientQuery, PatientRes, QuestionRes, QuestionsRes, SummaryRes,
    TodayQuery, TreatmentRes,
};
use crate::{api_error, ApiDoc, ApiError, AppState};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDate;
use lepcare_core::{
    Answer, CoreError, CoreResult, PatientInput, RecordId, RiskLevel, RiskRule, SkinImage,
    Symptom,
};
use utoipa::OpenApi;

fn today_or_local(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| chrono::Local::now().date_naive())
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for monitoring and load balancers.
#[axum::debug_handler]
pub(crate) async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "LepCare REST API is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/screening/questions",
    responses(
        (status = 200, description = "Screening questions in the order they are asked", body = QuestionsRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn list_questions(State(_state): State<AppState>) -> Json<QuestionsRes> {
    Json(QuestionsRes {
        questions: Symptom::ALL
            .iter()
            .copied()
            .map(QuestionRes::from_symptom)
            .collect(),
        options: Answer::ALL.iter().map(|a| a.label().to_string()).collect(),
    })
}

#[utoipa::path(
    post,
    path = "/screening/evaluate",
    request_body = EvaluateReq,
    responses(
        (status = 200, description = "Risk assessment for the answers", body = AssessmentRes),
        (status = 400, description = "Wrong number of answers or unrecognised answer")
    )
)]
/// Score a completed questionnaire.
///
/// # Errors
/// Returns `400 Bad Request` unless exactly five recognised answers are supplied.
#[axum::debug_handler]
pub(crate) async fn evaluate_answers(
    State(_state): State<AppState>,
    Json(req): Json<EvaluateReq>,
) -> Result<Json<AssessmentRes>, ApiError> {
    let answers = req
        .answers
        .iter()
        .map(|a| a.parse::<Answer>())
        .collect::<CoreResult<Vec<_>>>()
        .map_err(|e| api_error("Evaluate answers", e))?;

    let assessment = RiskRule::evaluate(&answers).map_err(|e| api_error("Evaluate answers", e))?;
    tracing::info!(level = %assessment.level, "questionnaire evaluated");
    Ok(Json(assessment.into()))
}

#[utoipa::path(
    post,
    path = "/screening/image",
    request_body(content = Vec<u8>, description = "Raw image bytes", content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Image finding and the assessment derived from it", body = ImageAnalysisRes),
        (status = 400, description = "Empty upload or not an image"),
        (status = 413, description = "Upload larger than the configured limit"),
        (status = 500, description = "Internal server error")
    )
)]
/// Analyse a skin photo.
///
/// The upload is checked, then the response is held back for the configured analysis delay
/// before the classifier runs.
#[axum::debug_handler]
pub(crate) async fn analyse_image(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ImageAnalysisRes>, ApiError> {
    let image = SkinImage::from_bytes(body.to_vec(), state.cfg.max_image_bytes())
        .map_err(|e| api_error("Analyse image", e))?;

    tokio::time::sleep(state.cfg.analysis_delay()).await;

    let finding = state
        .classifier
        .classify(&image)
        .map_err(|e| api_error("Analyse image", e))?;
    let assessment = RiskRule::passthrough_image_finding(&finding);
    tracing::info!(
        level = %assessment.level,
        media_type = image.media_type(),
        "image analysed"
    );
    Ok(Json(ImageAnalysisRes::new(
        &finding,
        assessment,
        image.media_type(),
    )))
}

#[utoipa::path(
    get,
    path = "/patients",
    params(PatientQuery),
    responses(
        (status = 200, description = "Matching patients in registration order", body = ListPatientsRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn list_patients(
    State(state): State<AppState>,
    Query(query): Query<PatientQuery>,
) -> Json<ListPatientsRes> {
    let roster = state.roster.lock().await;
    let patients = roster
        .search(query.q.as_deref().unwrap_or_default())
        .into_iter()
        .map(PatientRes::from)
        .collect();
    Json(ListPatientsRes { patients })
}

#[utoipa::path(
    post,
    path = "/patients",
    request_body = CreatePatientReq,
    responses(
        (status = 201, description = "Patient registered", body = PatientRes),
        (status = 400, description = "Missing or malformed field")
    )
)]
/// Register a patient.
///
/// # Errors
/// Returns `400 Bad Request` if a required field is blank, the age is not a positive whole
/// number, or the stage or risk level is not recognised.
#[axum::debug_handler]
pub(crate) async fn create_patient(
    State(state): State<AppState>,
    Json(req): Json<CreatePatientReq>,
) -> Result<(StatusCode, Json<PatientRes>), ApiError> {
    let risk_level = req
        .risk_level
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(str::parse::<RiskLevel>)
        .transpose()
        .map_err(|e| api_error("Create patient", e))?;

    let input = PatientInput {
        name: req.name,
        age: req.age,
        phone: req.phone,
        location: req.location,
        stage: req.stage,
        risk_level,
    };

    let mut roster = state.roster.lock().await;
    let record = roster
        .add(input, today_or_local(req.today))
        .map_err(|e| api_error("Create patient", e))?;
    Ok((StatusCode::CREATED, Json(PatientRes::from(&record))))
}

#[utoipa::path(
    get,
    path = "/treatments",
    responses(
        (status = 200, description = "All treatments in ledger order", body = ListTreatmentsRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn list_treatments(State(state): State<AppState>) -> Json<ListTreatmentsRes> {
    let ledger = state.ledger.lock().await;
    Json(ListTreatmentsRes {
        treatments: ledger.records().iter().map(TreatmentRes::from).collect(),
    })
}

#[utoipa::path(
    get,
    path = "/treatments/summary",
    params(TodayQuery),
    responses(
        (status = 200, description = "Tracker overview figures", body = SummaryRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn treatment_summary(
    State(state): State<AppState>,
    Query(query): Query<TodayQuery>,
) -> Json<SummaryRes> {
    let ledger = state.ledger.lock().await;
    Json(ledger.summary(today_or_local(query.today)).into())
}

#[utoipa::path(
    get,
    path = "/treatments/due",
    params(TodayQuery),
    responses(
        (status = 200, description = "Treatments whose next dose falls today", body = ListTreatmentsRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn treatments_due(
    State(state): State<AppState>,
    Query(query): Query<TodayQuery>,
) -> Json<ListTreatmentsRes> {
    let ledger = state.ledger.lock().await;
    Json(ListTreatmentsRes {
        treatments: ledger
            .due_today(today_or_local(query.today))
            .into_iter()
            .map(TreatmentRes::from)
            .collect(),
    })
}

#[utoipa::path(
    post,
    path = "/treatments/{id}/doses",
    params(
        ("id" = String, Path, description = "Treatment id (32 lowercase hex characters)")
    ),
    responses(
        (status = 200, description = "Dose recorded; unchanged if the course is complete", body = TreatmentRes),
        (status = 400, description = "Malformed treatment id"),
        (status = 404, description = "No treatment with this id")
    )
)]
/// Record one completed dose.
#[axum::debug_handler]
pub(crate) async fn complete_dose(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TreatmentRes>, ApiError> {
    let id = RecordId::parse(&id)
        .map_err(CoreError::from)
        .map_err(|e| api_error("Complete dose", e))?;

    let mut ledger = state.ledger.lock().await;
    let record = ledger
        .mark_completed(id)
        .map_err(|e| api_error("Complete dose", e))?;
    Ok(Json(TreatmentRes::from(&record)))
}

/// OpenAPI document for this API.
pub(crate) async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

//! JSON request and response bodies.
//!
//! Core types stay free of OpenAPI concerns; these mirror them for the wire and carry the
//! `utoipa` schemas.

use chrono::NaiveDate;
use lepcare_core::{
    AdherenceBand, AssessmentSource, ImageFinding, LedgerSummary, PatientRecord, ProgressBand,
    RiskAssessment, Symptom, TreatmentRecord,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuestionRes {
    pub index: usize,
    pub key: String,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuestionsRes {
    pub questions: Vec<QuestionRes>,
    /// Accepted answer labels.
    pub options: Vec<String>,
}

impl QuestionRes {
    pub(crate) fn from_symptom(symptom: Symptom) -> Self {
        let key = serde_json::to_value(symptom)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        Self {
            index: symptom.index(),
            key,
            text: symptom.question().to_string(),
        }
    }
}

/// Five answers in question order: `yes`, `no` or `not sure`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EvaluateReq {
    pub answers: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AssessmentRes {
    pub level: String,
    pub recommendation: String,
    pub derived_from: String,
}

impl From<RiskAssessment> for AssessmentRes {
    fn from(a: RiskAssessment) -> Self {
        let derived_from = match a.derived_from {
            AssessmentSource::Questionnaire => "questionnaire",
            AssessmentSource::ImageAnalysis => "image_analysis",
        };
        Self {
            level: a.level.to_string(),
            recommendation: a.recommendation.to_string(),
            derived_from: derived_from.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ImageAnalysisRes {
    pub assessment: AssessmentRes,
    pub confidence: f32,
    pub findings: Vec<String>,
    pub media_type: String,
}

impl ImageAnalysisRes {
    pub(crate) fn new(finding: &ImageFinding, assessment: RiskAssessment, media_type: &str) -> Self {
        Self {
            assessment: assessment.into(),
            confidence: finding.confidence(),
            findings: finding.findings().to_vec(),
            media_type: media_type.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PatientQuery {
    /// Case-insensitive substring of name or location. Omitted or blank lists everyone.
    pub q: Option<String>,
}

/// Registration form. `age` is taken as typed and must be a positive whole number.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePatientReq {
    pub name: String,
    pub age: String,
    pub phone: String,
    pub location: String,
    pub stage: String,
    #[serde(default)]
    pub risk_level: Option<String>,
    /// Registration date; defaults to the server's local date.
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PatientRes {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub phone: String,
    pub location: String,
    pub diagnosis_date: NaiveDate,
    pub stage: String,
    pub last_visit: NaiveDate,
    pub next_appointment: NaiveDate,
    pub risk_level: String,
}

impl From<&PatientRecord> for PatientRes {
    fn from(p: &PatientRecord) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name.to_string(),
            age: p.age.years(),
            phone: p.phone.to_string(),
            location: p.location.to_string(),
            diagnosis_date: p.diagnosis_date,
            stage: p.stage.to_string(),
            last_visit: p.last_visit,
            next_appointment: p.next_appointment,
            risk_level: p.risk_level.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListPatientsRes {
    pub patients: Vec<PatientRes>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TodayQuery {
    /// Reference date (`YYYY-MM-DD`); defaults to the server's local date.
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TreatmentRes {
    pub id: String,
    pub patient_name: String,
    pub medication: String,
    pub dosage: String,
    pub frequency: String,
    pub start_date: NaiveDate,
    pub duration_label: String,
    pub completed_doses: u32,
    pub total_doses: u32,
    pub next_dose_date: NaiveDate,
    pub adherence_percent: u8,
    pub adherence_band: String,
    pub dose_progress_percent: u8,
    pub progress_band: String,
}

impl From<&TreatmentRecord> for TreatmentRes {
    fn from(t: &TreatmentRecord) -> Self {
        let adherence_band = match t.adherence_band() {
            AdherenceBand::Good => "good",
            AdherenceBand::Fair => "fair",
            AdherenceBand::Poor => "poor",
        };
        let progress_band = match t.progress_band() {
            ProgressBand::OnTrack => "on_track",
            ProgressBand::Progressing => "progressing",
            ProgressBand::Early => "early",
        };
        Self {
            id: t.id.to_string(),
            patient_name: t.patient_name.to_string(),
            medication: t.medication.to_string(),
            dosage: t.dosage.to_string(),
            frequency: t.frequency.to_string(),
            start_date: t.start_date,
            duration_label: t.duration_label.to_string(),
            completed_doses: t.completed_doses(),
            total_doses: t.total_doses(),
            next_dose_date: t.next_dose_date,
            adherence_percent: t.adherence_percent.value(),
            adherence_band: adherence_band.to_string(),
            dose_progress_percent: t.dose_progress_percent(),
            progress_band: progress_band.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListTreatmentsRes {
    pub treatments: Vec<TreatmentRes>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SummaryRes {
    pub active_treatments: usize,
    /// `null` when no treatments are recorded.
    pub average_adherence: Option<u8>,
    pub due_today: usize,
    pub overdue: usize,
}

impl From<LedgerSummary> for SummaryRes {
    fn from(s: LedgerSummary) -> Self {
        Self {
            active_treatments: s.active_treatments,
            average_adherence: s.average_adherence,
            due_today: s.due_today,
            overdue: s.overdue,
        }
    }
}

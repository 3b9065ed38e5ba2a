//! # LepCare Core
//!
//! Core business logic for leprosy screening and community record-keeping.
//!
//! This crate contains pure, in-memory operations:
//! - Symptom questionnaire and the threshold rule that scores it ([`screening`])
//! - Image upload checks and the stand-in image classifier ([`classifier`])
//! - Patient roster with add and search ([`roster`])
//! - Treatment adherence ledger ([`ledger`])
//! - YAML sample data ([`fixtures`])
//!
//! **No presentation concerns**: HTTP servers, CLI parsing, clocks, delays and environment
//! variables belong in `api-rest`, `lepcare-cli` or the `lepcare-run` binary. Callers pass
//! "today" and a resolved [`CoreConfig`] in.

pub mod classifier;
pub mod config;
pub mod constants;
pub mod error;
pub mod fixtures;
pub mod ledger;
pub mod risk;
pub mod roster;
pub mod screening;
pub mod validation;

pub use classifier::{FakeClassifier, ImageFinding, SkinClassifier, SkinImage};
pub use config::CoreConfig;
pub use error::{CoreError, CoreResult};
pub use fixtures::SampleData;
pub use ledger::{
    AdherenceBand, LedgerSummary, ProgressBand, TreatmentInput, TreatmentLedger, TreatmentRecord,
};
pub use risk::{AssessmentSource, RiskAssessment, RiskLevel};
pub use roster::{DiseaseStage, PatientInput, PatientRecord, PatientRoster};
pub use screening::{Answer, ObservationSet, Questionnaire, RiskRule, Symptom};

pub use lepcare_types::{Age, NonEmptyText, Percent};
pub use lepcare_uuid::RecordId;

//! Constants used throughout the LepCare core crate.
//!
//! Thresholds and fixed texts live here so the screening rule, the ledger bands and the
//! presentation layers all read the same values.

/// Number of questions in the symptom questionnaire.
pub const QUESTION_COUNT: usize = 5;

/// Days between registration and the first follow-up appointment.
pub const DEFAULT_FOLLOW_UP_DAYS: i64 = 14;

/// Simulated duration of an image analysis, in milliseconds.
pub const DEFAULT_ANALYSIS_DELAY_MS: u64 = 3_000;

/// Largest accepted image upload (10 MiB).
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Yes-answers at or above which the questionnaire reports high risk.
pub const HIGH_RISK_YES_COUNT: usize = 3;

/// Yes-answers at or above which the questionnaire reports medium risk.
pub const MEDIUM_RISK_YES_COUNT: usize = 2;

/// Not-sure answers that lift a single yes to medium risk.
pub const MEDIUM_RISK_NOT_SURE_COUNT: usize = 2;

pub const HIGH_RISK_RECOMMENDATION: &str =
    "Immediate medical consultation recommended. Multiple symptoms suggest possible leprosy.";

pub const MEDIUM_RISK_RECOMMENDATION: &str =
    "Medical consultation advised within 1-2 weeks. Some symptoms require professional evaluation.";

pub const LOW_RISK_RECOMMENDATION: &str =
    "Continue monitoring symptoms. Consult healthcare provider if symptoms persist or worsen.";

/// Adherence at or above this is reported as good.
pub const GOOD_ADHERENCE_PERCENT: u8 = 90;

/// Adherence at or above this (and below good) is reported as fair.
pub const FAIR_ADHERENCE_PERCENT: u8 = 70;

/// Dose progress at or above this is on track.
pub const ON_TRACK_PROGRESS_PERCENT: u8 = 80;

/// Dose progress at or above this (and below on track) is progressing.
pub const PROGRESSING_PROGRESS_PERCENT: u8 = 50;

/// Fixture with the reference patients and treatments shipped with the application.
pub const SAMPLE_FIXTURE_YAML: &str = include_str!("../fixtures/sample.yaml");

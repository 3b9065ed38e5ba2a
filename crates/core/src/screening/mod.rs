//! Symptom screening: the five-question observation set, the threshold rule that turns it into
//! a [`RiskAssessment`](crate::RiskAssessment), and the step-by-step questionnaire state.

mod observation;
mod questionnaire;
mod rule;

pub use observation::{Answer, ObservationSet, Symptom};
pub use questionnaire::Questionnaire;
pub use rule::RiskRule;

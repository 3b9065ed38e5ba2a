//! Treatment adherence ledger.
//!
//! Tracks multidrug-therapy courses: how many doses have been given out of the prescribed total,
//! when the next dose falls due, and the adherence figure observed by the clinic.
//!
//! `adherence_percent` is stored as reported, not recomputed from dose counts. Dose progress is
//! a separate figure ([`TreatmentRecord::dose_progress_percent`]) so the two can never be
//! confused when displayed side by side.

use crate::constants::{
    FAIR_ADHERENCE_PERCENT, GOOD_ADHERENCE_PERCENT, ON_TRACK_PROGRESS_PERCENT,
    PROGRESSING_PROGRESS_PERCENT,
};
use crate::validation::{percent, required_text};
use crate::{CoreError, CoreResult};
use chrono::NaiveDate;
use lepcare_types::{NonEmptyText, Percent};
use lepcare_uuid::RecordId;
use serde::{Deserialize, Serialize};

/// How well a patient is keeping to the schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum AdherenceBand {
    Good,
    Fair,
    Poor,
}

/// How far through the course a patient is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ProgressBand {
    OnTrack,
    Progressing,
    Early,
}

/// One patient's course of treatment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TreatmentRecord {
    pub id: RecordId,
    pub patient_name: NonEmptyText,
    pub medication: NonEmptyText,
    pub dosage: NonEmptyText,
    pub frequency: NonEmptyText,
    pub start_date: NaiveDate,
    pub duration_label: NonEmptyText,
    completed_doses: u32,
    total_doses: u32,
    pub next_dose_date: NaiveDate,
    pub adherence_percent: Percent,
}

impl TreatmentRecord {
    pub fn completed_doses(&self) -> u32 {
        self.completed_doses
    }

    pub fn total_doses(&self) -> u32 {
        self.total_doses
    }

    pub fn is_complete(&self) -> bool {
        self.completed_doses >= self.total_doses
    }

    /// Completed doses as a share of the total, rounded to a whole percent.
    pub fn dose_progress_percent(&self) -> u8 {
        rounded_ratio(u64::from(self.completed_doses) * 100, u64::from(self.total_doses)) as u8
    }

    pub fn progress_band(&self) -> ProgressBand {
        let progress = self.dose_progress_percent();
        if progress >= ON_TRACK_PROGRESS_PERCENT {
            ProgressBand::OnTrack
        } else if progress >= PROGRESSING_PROGRESS_PERCENT {
            ProgressBand::Progressing
        } else {
            ProgressBand::Early
        }
    }

    pub fn adherence_band(&self) -> AdherenceBand {
        let adherence = self.adherence_percent.value();
        if adherence >= GOOD_ADHERENCE_PERCENT {
            AdherenceBand::Good
        } else if adherence >= FAIR_ADHERENCE_PERCENT {
            AdherenceBand::Fair
        } else {
            AdherenceBand::Poor
        }
    }

    /// The next dose was due before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.next_dose_date < today
    }
}

/// Raw input for enrolling a patient on a course of treatment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatmentInput {
    pub patient_name: String,
    pub medication: String,
    pub dosage: String,
    pub frequency: String,
    pub start_date: NaiveDate,
    pub duration_label: String,
    #[serde(default)]
    pub completed_doses: u32,
    pub total_doses: u32,
    pub next_dose_date: NaiveDate,
    pub adherence_percent: u32,
}

/// Aggregate figures for the tracker overview.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LedgerSummary {
    pub active_treatments: usize,
    /// `None` when the ledger is empty.
    pub average_adherence: Option<u8>,
    pub due_today: usize,
    pub overdue: usize,
}

/// Ordered, in-memory collection of treatment records.
#[derive(Clone, Debug, Default)]
pub struct TreatmentLedger {
    treatments: Vec<TreatmentRecord>,
}

impl TreatmentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enrol a course of treatment. `id` is allocated when not supplied.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if a text field is blank, `total_doses` is zero,
    /// `completed_doses` exceeds `total_doses`, adherence is above 100, or `id` is taken.
    pub fn add(
        &mut self,
        input: TreatmentInput,
        id: Option<RecordId>,
    ) -> CoreResult<TreatmentRecord> {
        if input.total_doses == 0 {
            return Err(CoreError::Validation(
                "total_doses must be greater than zero".into(),
            ));
        }
        if input.completed_doses > input.total_doses {
            return Err(CoreError::Validation(format!(
                "completed_doses ({}) exceeds total_doses ({})",
                input.completed_doses, input.total_doses
            )));
        }

        let id = id.unwrap_or_default();
        if self.get(id).is_some() {
            return Err(CoreError::Validation(format!("duplicate treatment id {id}")));
        }

        let record = TreatmentRecord {
            id,
            patient_name: required_text("patient_name", &input.patient_name)?,
            medication: required_text("medication", &input.medication)?,
            dosage: required_text("dosage", &input.dosage)?,
            frequency: required_text("frequency", &input.frequency)?,
            start_date: input.start_date,
            duration_label: required_text("duration_label", &input.duration_label)?,
            completed_doses: input.completed_doses,
            total_doses: input.total_doses,
            next_dose_date: input.next_dose_date,
            adherence_percent: percent("adherence_percent", input.adherence_percent)?,
        };

        tracing::debug!(treatment_id = %record.id, "treatment added to ledger");
        self.treatments.push(record.clone());
        Ok(record)
    }

    /// Record one more dose as given.
    ///
    /// At the prescribed total this is a no-op and the unchanged record is returned.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] if no treatment has this id.
    pub fn mark_completed(&mut self, id: RecordId) -> CoreResult<TreatmentRecord> {
        let record = self
            .treatments
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(CoreError::NotFound(id))?;

        if record.is_complete() {
            tracing::debug!(treatment_id = %id, "course already complete; dose not recorded");
        } else {
            record.completed_doses += 1;
            tracing::info!(
                treatment_id = %id,
                completed = record.completed_doses,
                total = record.total_doses,
                "dose recorded"
            );
        }

        Ok(record.clone())
    }

    /// Mean adherence across all treatments, rounded half up to a whole percent.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyLedger`] when there are no treatments.
    pub fn average_adherence(&self) -> CoreResult<u8> {
        if self.treatments.is_empty() {
            return Err(CoreError::EmptyLedger);
        }
        let sum: u64 = self
            .treatments
            .iter()
            .map(|t| u64::from(t.adherence_percent.value()))
            .sum();
        Ok(rounded_ratio(sum, self.treatments.len() as u64) as u8)
    }

    /// Treatments whose next dose falls on `today`, in ledger order.
    pub fn due_today(&self, today: NaiveDate) -> Vec<&TreatmentRecord> {
        self.treatments
            .iter()
            .filter(|t| t.next_dose_date == today)
            .collect()
    }

    /// Treatments whose next dose was due before `today`, in ledger order.
    pub fn overdue(&self, today: NaiveDate) -> Vec<&TreatmentRecord> {
        self.treatments
            .iter()
            .filter(|t| t.is_overdue(today))
            .collect()
    }

    pub fn summary(&self, today: NaiveDate) -> LedgerSummary {
        LedgerSummary {
            active_treatments: self.treatments.len(),
            average_adherence: self.average_adherence().ok(),
            due_today: self.due_today(today).len(),
            overdue: self.overdue(today).len(),
        }
    }

    pub fn get(&self, id: RecordId) -> Option<&TreatmentRecord> {
        self.treatments.iter().find(|t| t.id == id)
    }

    /// Read-only view in ledger order.
    pub fn records(&self) -> &[TreatmentRecord] {
        &self.treatments
    }

    pub fn len(&self) -> usize {
        self.treatments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.treatments.is_empty()
    }
}

/// `numerator / denominator` rounded half up. `denominator` must be non-zero.
fn rounded_ratio(numerator: u64, denominator: u64) -> u64 {
    (numerator * 2 + denominator) / (denominator * 2)
}

//! Patient roster.
//!
//! Holds the working set of patient records in insertion order for the lifetime of the process.
//! Records are appended by [`PatientRoster::add`] and never edited in place; there is no delete.

use crate::config::CoreConfig;
use crate::risk::RiskLevel;
use crate::validation::{parse_age, required_text};
use crate::{CoreError, CoreResult};
use chrono::NaiveDate;
use lepcare_types::{Age, NonEmptyText};
use lepcare_uuid::RecordId;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Clinical classification of a case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiseaseStage {
    Paucibacillary,
    Multibacillary,
    Suspected,
}

impl DiseaseStage {
    pub fn as_str(self) -> &'static str {
        match self {
            DiseaseStage::Paucibacillary => "Paucibacillary",
            DiseaseStage::Multibacillary => "Multibacillary",
            DiseaseStage::Suspected => "Suspected",
        }
    }
}

impl fmt::Display for DiseaseStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiseaseStage {
    type Err = CoreError;

    /// Accepts the full name or the clinical abbreviation (`PB`, `MB`), case-insensitively.
    fn from_str(s: &str) -> CoreResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paucibacillary" | "pb" => Ok(DiseaseStage::Paucibacillary),
            "multibacillary" | "mb" => Ok(DiseaseStage::Multibacillary),
            "suspected" => Ok(DiseaseStage::Suspected),
            "" => Err(CoreError::Validation("stage is required".into())),
            other => Err(CoreError::Validation(format!(
                "unknown stage '{other}' (expected Paucibacillary, Multibacillary or Suspected)"
            ))),
        }
    }
}

/// A registered patient.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PatientRecord {
    pub id: RecordId,
    pub name: NonEmptyText,
    pub age: Age,
    pub phone: NonEmptyText,
    pub location: NonEmptyText,
    pub diagnosis_date: NaiveDate,
    pub stage: DiseaseStage,
    pub last_visit: NaiveDate,
    pub next_appointment: NaiveDate,
    pub risk_level: RiskLevel,
}

impl PatientRecord {
    fn matches(&self, query_lower: &str) -> bool {
        self.name.contains_ignore_case(query_lower)
            || self.location.contains_ignore_case(query_lower)
    }
}

/// Raw registration form input, as typed by a user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientInput {
    pub name: String,
    pub age: String,
    pub phone: String,
    pub location: String,
    pub stage: String,
    /// Defaults to [`RiskLevel::Medium`] when not supplied.
    #[serde(default)]
    pub risk_level: Option<RiskLevel>,
}

/// Ordered, in-memory collection of patient records.
#[derive(Clone, Debug)]
pub struct PatientRoster {
    follow_up_interval: chrono::Duration,
    patients: Vec<PatientRecord>,
}

impl Default for PatientRoster {
    fn default() -> Self {
        Self::new(&CoreConfig::default())
    }
}

impl PatientRoster {
    /// Create an empty roster using the follow-up interval from `cfg`.
    pub fn new(cfg: &CoreConfig) -> Self {
        Self {
            follow_up_interval: cfg.follow_up_interval(),
            patients: Vec::new(),
        }
    }

    /// Register a new patient.
    ///
    /// The record gets a fresh id; diagnosis date and last visit are set to `today`, and the next
    /// appointment to `today` plus the follow-up interval.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if a required field is blank, the age is not a positive
    /// whole number, or the stage is not recognised.
    pub fn add(&mut self, input: PatientInput, today: NaiveDate) -> CoreResult<PatientRecord> {
        let name = required_text("name", &input.name)?;
        let age = parse_age(&input.age)?;
        let phone = required_text("phone", &input.phone)?;
        let location = required_text("location", &input.location)?;
        let stage = input.stage.parse::<DiseaseStage>()?;

        let next_appointment = today
            .checked_add_signed(self.follow_up_interval)
            .ok_or_else(|| CoreError::Validation("appointment date out of range".into()))?;

        let record = PatientRecord {
            id: RecordId::new(),
            name,
            age,
            phone,
            location,
            diagnosis_date: today,
            stage,
            last_visit: today,
            next_appointment,
            risk_level: input.risk_level.unwrap_or(RiskLevel::Medium),
        };

        tracing::info!(patient_id = %record.id, stage = %record.stage, "patient added to roster");
        self.patients.push(record.clone());
        Ok(record)
    }

    /// Append an existing record, e.g. from sample data.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if a record with the same id is already present.
    pub fn insert(&mut self, record: PatientRecord) -> CoreResult<()> {
        if self.get(record.id).is_some() {
            return Err(CoreError::Validation(format!(
                "duplicate patient id {}",
                record.id
            )));
        }
        self.patients.push(record);
        Ok(())
    }

    /// Case-insensitive substring search over name and location, in insertion order.
    ///
    /// The query is matched as typed, surrounding spaces included. An empty query matches every
    /// record.
    pub fn search(&self, query: &str) -> Vec<&PatientRecord> {
        let needle = query.to_lowercase();
        self.patients.iter().filter(|p| p.matches(&needle)).collect()
    }

    pub fn get(&self, id: RecordId) -> Option<&PatientRecord> {
        self.patients.iter().find(|p| p.id == id)
    }

    /// Read-only view in insertion order.
    pub fn records(&self) -> &[PatientRecord] {
        &self.patients
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }
}

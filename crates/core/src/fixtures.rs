//! Sample data fixtures.
//!
//! A fixture is a YAML document listing patients and treatments to preload into a fresh roster
//! and ledger. The schema is strict: unknown keys are rejected, and errors name the path of the
//! offending field (e.g. `treatments[1].total_doses`).
//!
//! ```yaml
//! patients:
//!   - name: Adamu Ibrahim
//!     age: 34
//!     phone: "+234 802 123 4567"
//!     location: Kano, Nigeria
//!     stage: Paucibacillary
//!     diagnosis_date: "2024-01-15"
//!     last_visit: "2024-06-10"
//!     next_appointment: "2024-06-25"
//!     risk_level: Medium
//! treatments: []
//! ```

use crate::config::CoreConfig;
use crate::constants::SAMPLE_FIXTURE_YAML;
use crate::ledger::{TreatmentInput, TreatmentLedger};
use crate::risk::RiskLevel;
use crate::roster::{DiseaseStage, PatientRecord, PatientRoster};
use crate::{CoreError, CoreResult};
use chrono::NaiveDate;
use lepcare_types::{Age, NonEmptyText};
use lepcare_uuid::RecordId;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FixtureWire {
    #[serde(default)]
    patients: Vec<PatientWire>,
    #[serde(default)]
    treatments: Vec<TreatmentWire>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PatientWire {
    #[serde(default)]
    id: Option<RecordId>,
    name: NonEmptyText,
    age: Age,
    phone: NonEmptyText,
    location: NonEmptyText,
    stage: DiseaseStage,
    diagnosis_date: NaiveDate,
    last_visit: NaiveDate,
    next_appointment: NaiveDate,
    #[serde(default = "default_risk_level")]
    risk_level: RiskLevel,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TreatmentWire {
    #[serde(default)]
    id: Option<RecordId>,
    patient_name: String,
    medication: String,
    dosage: String,
    frequency: String,
    start_date: NaiveDate,
    duration_label: String,
    #[serde(default)]
    completed_doses: u32,
    total_doses: u32,
    next_dose_date: NaiveDate,
    adherence_percent: u32,
}

fn default_risk_level() -> RiskLevel {
    RiskLevel::Medium
}

/// A roster and ledger populated from a fixture.
#[derive(Debug)]
pub struct SampleData {
    pub roster: PatientRoster,
    pub ledger: TreatmentLedger,
}

impl SampleData {
    /// Parse a fixture and load it into an empty roster and ledger.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Fixture`] if the YAML does not match the schema, or
    /// [`CoreError::Validation`] if a record is rejected (duplicate id, inconsistent doses).
    pub fn parse(yaml_text: &str, cfg: &CoreConfig) -> CoreResult<Self> {
        let deserializer = serde_yaml::Deserializer::from_str(yaml_text);
        let wire: FixtureWire = serde_path_to_error::deserialize(deserializer).map_err(|err| {
            let path = err.path().to_string();
            let path = if path.is_empty() || path == "." {
                "<root>".to_string()
            } else {
                path
            };
            CoreError::Fixture {
                path,
                message: err.into_inner().to_string(),
            }
        })?;

        let mut roster = PatientRoster::new(cfg);
        for p in wire.patients {
            roster.insert(PatientRecord {
                id: p.id.unwrap_or_default(),
                name: p.name,
                age: p.age,
                phone: p.phone,
                location: p.location,
                diagnosis_date: p.diagnosis_date,
                stage: p.stage,
                last_visit: p.last_visit,
                next_appointment: p.next_appointment,
                risk_level: p.risk_level,
            })?;
        }

        let mut ledger = TreatmentLedger::new();
        for t in wire.treatments {
            let input = TreatmentInput {
                patient_name: t.patient_name,
                medication: t.medication,
                dosage: t.dosage,
                frequency: t.frequency,
                start_date: t.start_date,
                duration_label: t.duration_label,
                completed_doses: t.completed_doses,
                total_doses: t.total_doses,
                next_dose_date: t.next_dose_date,
                adherence_percent: t.adherence_percent,
            };
            ledger.add(input, t.id)?;
        }

        tracing::debug!(
            patients = roster.len(),
            treatments = ledger.len(),
            "fixture loaded"
        );
        Ok(Self { roster, ledger })
    }

    /// The reference patients and treatments bundled with the crate.
    pub fn builtin(cfg: &CoreConfig) -> CoreResult<Self> {
        Self::parse(SAMPLE_FIXTURE_YAML, cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_fixture_loads_reference_records() {
        let data = SampleData::builtin(&CoreConfig::default()).expect("builtin fixture");
        assert_eq!(data.roster.len(), 2);
        assert_eq!(data.ledger.len(), 2);

        let fatima = &data.roster.search("lagos")[0];
        assert_eq!(fatima.name.as_str(), "Fatima Yusuf");
        assert_eq!(fatima.stage, DiseaseStage::Multibacillary);
        assert_eq!(fatima.risk_level, RiskLevel::High);

        assert_eq!(data.ledger.average_adherence().unwrap(), 92);
        let adamu = RecordId::parse("a1b2c3d4e5f60718293a4b5c6d7e8f90").unwrap();
        assert_eq!(data.ledger.get(adamu).unwrap().completed_doses(), 16);
    }

    #[test]
    fn ids_are_generated_when_omitted() {
        let yaml = r#"
patients:
  - name: Amina Bello
    age: 41
    phone: "+234 805 000 1111"
    location: Kaduna, Nigeria
    stage: Suspected
    diagnosis_date: "2024-05-01"
    last_visit: "2024-05-01"
    next_appointment: "2024-05-15"
"#;
        let data = SampleData::parse(yaml, &CoreConfig::default()).unwrap();
        let record = &data.roster.records()[0];
        assert!(RecordId::is_canonical(&record.id.to_string()));
        assert_eq!(record.risk_level, RiskLevel::Medium);
        assert!(data.ledger.is_empty());
    }

    #[test]
    fn rejects_unknown_keys_with_path() {
        let yaml = r#"
patients:
  - name: Amina Bello
    age: 41
    phone: "+234 805 000 1111"
    location: Kaduna, Nigeria
    stage: Suspected
    diagnosis_date: "2024-05-01"
    last_visit: "2024-05-01"
    next_appointment: "2024-05-15"
    blood_group: O+
"#;
        let err = SampleData::parse(yaml, &CoreConfig::default()).unwrap_err();
        match err {
            CoreError::Fixture { path, message } => {
                assert!(path.starts_with("patients[0]"), "path was {path}");
                assert!(message.contains("blood_group"), "message was {message}");
            }
            other => panic!("expected fixture error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_invalid_values() {
        let yaml = r#"
treatments:
  - patient_name: Amina Bello
    medication: MDT-PB
    dosage: Rifampicin 600mg
    frequency: Monthly
    start_date: "2024-05-01"
    duration_label: 6 months
    completed_doses: 30
    total_doses: 24
    next_dose_date: "2024-06-01"
    adherence_percent: 90
"#;
        let err = SampleData::parse(yaml, &CoreConfig::default()).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));

        let bad_age = "patients:\n  - name: X\n    age: 0\n";
        assert!(matches!(
            SampleData::parse(bad_age, &CoreConfig::default()),
            Err(CoreError::Fixture { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let yaml = r#"
treatments:
  - id: "a1b2c3d4e5f60718293a4b5c6d7e8f90"
    patient_name: A
    medication: M
    dosage: D
    frequency: F
    start_date: "2024-05-01"
    duration_label: 6 months
    total_doses: 24
    next_dose_date: "2024-06-01"
    adherence_percent: 90
  - id: "a1b2c3d4e5f60718293a4b5c6d7e8f90"
    patient_name: B
    medication: M
    dosage: D
    frequency: F
    start_date: "2024-05-01"
    duration_label: 6 months
    total_doses: 24
    next_dose_date: "2024-06-01"
    adherence_percent: 90
"#;
        let err = SampleData::parse(yaml, &CoreConfig::default()).unwrap_err();
        assert!(err.to_string().contains("duplicate treatment id"));
    }

    #[test]
    fn empty_document_yields_empty_collections() {
        let data = SampleData::parse("{}", &CoreConfig::default()).unwrap();
        assert!(data.roster.is_empty());
        assert!(data.ledger.is_empty());
    }
}

//! Command implementations.
//!
//! Each command writes its report to `out` so it can be exercised without a terminal. State is
//! rebuilt from the fixture on every invocation; nothing is written back.

use anyhow::Context;
use chrono::NaiveDate;
use lepcare_core::constants::QUESTION_COUNT;
use lepcare_core::{
    Answer, CoreConfig, FakeClassifier, PatientInput, PatientRecord, Questionnaire,
    RecordId, RiskAssessment, RiskLevel, RiskRule, SampleData, SkinClassifier, SkinImage,
    Symptom, TreatmentLedger, TreatmentRecord,
};
use std::io::{BufRead, Write};
use std::path::Path;
use std::time::Duration;

/// Load the roster and ledger from `fixture`, or the built-in sample data when `None`.
pub fn load_data(fixture: Option<&Path>, cfg: &CoreConfig) -> anyhow::Result<SampleData> {
    match fixture {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read fixture {}", path.display()))?;
            let data = SampleData::parse(&text, cfg)
                .with_context(|| format!("failed to load fixture {}", path.display()))?;
            tracing::debug!(fixture = %path.display(), "using fixture");
            Ok(data)
        }
        None => Ok(SampleData::builtin(cfg)?),
    }
}

pub fn print_questions<W: Write>(out: &mut W) -> anyhow::Result<()> {
    for symptom in Symptom::ALL {
        writeln!(out, "{}. {}", symptom.index() + 1, symptom.question())?;
    }
    Ok(())
}

/// Score comma-separated answers, e.g. `yes,no,not sure,no,no`.
pub fn screen_answers<W: Write>(answers: &str, out: &mut W) -> anyhow::Result<()> {
    let answers = answers
        .split(',')
        .map(str::parse::<Answer>)
        .collect::<Result<Vec<_>, _>>()?;
    let assessment = RiskRule::evaluate(&answers)?;
    print_assessment(&assessment, out)
}

/// Ask the questions one at a time on `input`.
///
/// `back` returns to the previous question. Returns `None` if input ends early.
pub fn run_wizard<R: BufRead, W: Write>(
    mut input: R,
    out: &mut W,
) -> anyhow::Result<Option<RiskAssessment>> {
    let mut wizard = Questionnaire::new();
    writeln!(
        out,
        "Answer yes, no or not sure. Type 'back' to return to the previous question."
    )?;

    while let Some(symptom) = wizard.current_question() {
        write!(
            out,
            "[{}/{}] {}",
            wizard.step_index() + 1,
            QUESTION_COUNT,
            symptom.question()
        )?;
        if let Some(previous) = wizard.previous_answer() {
            write!(out, " (was: {previous})")?;
        }
        write!(out, " ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(None);
        }
        let line = line.trim();

        if line.eq_ignore_ascii_case("back") {
            if !wizard.back() {
                writeln!(out, "Already at the first question.")?;
            }
            continue;
        }

        match line.parse::<Answer>() {
            Ok(answer) => {
                if let Some(assessment) = wizard.answer(answer)? {
                    print_assessment(&assessment, out)?;
                    return Ok(Some(assessment));
                }
            }
            Err(e) => writeln!(out, "{e}")?,
        }
    }

    Ok(None)
}

/// Validate an image file and run it through the stand-in classifier.
pub fn analyse_image<W: Write>(
    path: &Path,
    cfg: &CoreConfig,
    delay: Duration,
    out: &mut W,
) -> anyhow::Result<RiskAssessment> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let image = SkinImage::from_bytes(bytes, cfg.max_image_bytes())?;

    writeln!(out, "Analysing {} ({} bytes)...", image.media_type(), image.len())?;
    out.flush()?;
    std::thread::sleep(delay);

    let finding = FakeClassifier::new().classify(&image)?;
    let assessment = RiskRule::passthrough_image_finding(&finding);
    writeln!(out, "Confidence: {:.0}%", finding.confidence() * 100.0)?;
    for note in finding.findings() {
        writeln!(out, "  - {note}")?;
    }
    print_assessment(&assessment, out)?;
    Ok(assessment)
}

pub fn list_patients<W: Write>(
    data: &SampleData,
    search: Option<&str>,
    out: &mut W,
) -> anyhow::Result<()> {
    let patients = data.roster.search(search.unwrap_or_default());
    if patients.is_empty() {
        writeln!(out, "No patients found.")?;
    }
    for patient in patients {
        print_patient(patient, out)?;
    }
    Ok(())
}

pub fn add_patient<W: Write>(
    data: &mut SampleData,
    input: PatientInput,
    today: NaiveDate,
    out: &mut W,
) -> anyhow::Result<PatientRecord> {
    let record = data.roster.add(input, today)?;
    writeln!(out, "Registered patient:")?;
    print_patient(&record, out)?;
    Ok(record)
}

pub fn list_treatments<W: Write>(
    ledger: &TreatmentLedger,
    today: NaiveDate,
    out: &mut W,
) -> anyhow::Result<()> {
    let summary = ledger.summary(today);
    let average = summary
        .average_adherence
        .map(|a| format!("{a}%"))
        .unwrap_or_else(|| "n/a".into());
    writeln!(
        out,
        "Active: {}  Average adherence: {}  Due today: {}  Overdue: {}",
        summary.active_treatments, average, summary.due_today, summary.overdue
    )?;
    for treatment in ledger.records() {
        print_treatment(treatment, today, out)?;
    }
    Ok(())
}

pub fn complete_dose<W: Write>(
    ledger: &mut TreatmentLedger,
    id: &str,
    out: &mut W,
) -> anyhow::Result<TreatmentRecord> {
    let id = RecordId::parse(id)?;
    let before = ledger
        .get(id)
        .map(TreatmentRecord::completed_doses)
        .unwrap_or_default();
    let record = ledger.mark_completed(id)?;
    if record.completed_doses() == before {
        writeln!(out, "Course already complete; no dose recorded.")?;
    } else {
        writeln!(out, "Dose recorded.")?;
    }
    writeln!(
        out,
        "{}: {}/{} doses ({}%)",
        record.patient_name,
        record.completed_doses(),
        record.total_doses(),
        record.dose_progress_percent()
    )?;
    Ok(record)
}

/// Parse a `--risk-level` value.
pub fn parse_risk_level(value: Option<&str>) -> anyhow::Result<Option<RiskLevel>> {
    Ok(value.map(str::parse::<RiskLevel>).transpose()?)
}

fn print_assessment<W: Write>(assessment: &RiskAssessment, out: &mut W) -> anyhow::Result<()> {
    writeln!(out, "Risk level: {}", assessment.level)?;
    writeln!(out, "{}", assessment.recommendation)?;
    Ok(())
}

fn print_patient<W: Write>(p: &PatientRecord, out: &mut W) -> anyhow::Result<()> {
    writeln!(
        out,
        "{}  {} ({})  {}  {}  stage: {}  risk: {}  next visit: {}",
        p.id,
        p.name,
        p.age.years(),
        p.location,
        p.phone,
        p.stage,
        p.risk_level,
        p.next_appointment
    )?;
    Ok(())
}

fn print_treatment<W: Write>(
    t: &TreatmentRecord,
    today: NaiveDate,
    out: &mut W,
) -> anyhow::Result<()> {
    let flag = if t.is_overdue(today) {
        "  OVERDUE"
    } else if t.next_dose_date == today {
        "  DUE TODAY"
    } else {
        ""
    };
    writeln!(
        out,
        "{}  {}  {}  {}/{} doses ({}%)  adherence {}  next dose: {}{}",
        t.id,
        t.patient_name,
        t.medication,
        t.completed_doses(),
        t.total_doses(),
        t.dose_progress_percent(),
        t.adherence_percent,
        t.next_dose_date,
        flag
    )?;
    Ok(())
}

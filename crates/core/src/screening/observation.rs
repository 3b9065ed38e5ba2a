use crate::constants::QUESTION_COUNT;
use crate::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Answer to one screening question.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Answer {
    #[serde(alias = "Yes")]
    Yes,
    #[serde(alias = "No")]
    No,
    #[serde(alias = "NotSure", alias = "Not sure", alias = "not sure")]
    NotSure,
}

impl Answer {
    pub const ALL: [Answer; 3] = [Answer::Yes, Answer::No, Answer::NotSure];

    pub fn label(self) -> &'static str {
        match self {
            Answer::Yes => "Yes",
            Answer::No => "No",
            Answer::NotSure => "Not sure",
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Answer {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" => Ok(Answer::Yes),
            "no" | "n" => Ok(Answer::No),
            "not sure" | "not-sure" | "not_sure" | "notsure" | "unsure" => Ok(Answer::NotSure),
            other => Err(CoreError::InvalidInput(format!(
                "unrecognised answer '{other}' (expected yes, no or not sure)"
            ))),
        }
    }
}

/// The fixed screening questions, in the order they are asked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Symptom {
    SkinPatches,
    Numbness,
    ThickenedNerves,
    MuscleWeakness,
    PainlessWounds,
}

impl Symptom {
    pub const ALL: [Symptom; QUESTION_COUNT] = [
        Symptom::SkinPatches,
        Symptom::Numbness,
        Symptom::ThickenedNerves,
        Symptom::MuscleWeakness,
        Symptom::PainlessWounds,
    ];

    /// Position of this question in the observation set.
    pub fn index(self) -> usize {
        match self {
            Symptom::SkinPatches => 0,
            Symptom::Numbness => 1,
            Symptom::ThickenedNerves => 2,
            Symptom::MuscleWeakness => 3,
            Symptom::PainlessWounds => 4,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn question(self) -> &'static str {
        match self {
            Symptom::SkinPatches => {
                "Do you have patches of skin that are lighter or darker than normal?"
            }
            Symptom::Numbness => {
                "Have you noticed any patches of skin with reduced sensation (numbness)?"
            }
            Symptom::ThickenedNerves => "Do you have any thickened nerves under your skin?",
            Symptom::MuscleWeakness => "Have you experienced muscle weakness in hands or feet?",
            Symptom::PainlessWounds => "Do you have any painless wounds or ulcers?",
        }
    }
}

/// A complete set of five answers, indexed by [`Symptom::index`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ObservationSet([Answer; QUESTION_COUNT]);

impl ObservationSet {
    pub fn new(answers: [Answer; QUESTION_COUNT]) -> Self {
        Self(answers)
    }

    pub fn answers(&self) -> &[Answer; QUESTION_COUNT] {
        &self.0
    }

    pub fn answer_for(&self, symptom: Symptom) -> Answer {
        self.0[symptom.index()]
    }

    pub fn count(&self, answer: Answer) -> usize {
        self.0.iter().filter(|a| **a == answer).count()
    }
}

impl TryFrom<&[Answer]> for ObservationSet {
    type Error = CoreError;

    fn try_from(answers: &[Answer]) -> CoreResult<Self> {
        let array: [Answer; QUESTION_COUNT] = answers.try_into().map_err(|_| {
            CoreError::InvalidInput(format!(
                "expected {QUESTION_COUNT} observations, got {}",
                answers.len()
            ))
        })?;
        Ok(Self(array))
    }
}

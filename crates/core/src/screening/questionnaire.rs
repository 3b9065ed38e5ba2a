use super::{Answer, ObservationSet, RiskRule, Symptom};
use crate::constants::QUESTION_COUNT;
use crate::risk::RiskAssessment;
use crate::{CoreError, CoreResult};

/// Step-by-step state of the symptom questionnaire.
///
/// `step_index` is the question currently shown (`QUESTION_COUNT` once finished). `answers`
/// holds one entry per question answered so far; after [`back`](Self::back) it can be one
/// entry longer than `step_index`, keeping the earlier answer until it is overwritten.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Questionnaire {
    step_index: usize,
    answers: Vec<Answer>,
}

impl Questionnaire {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn is_complete(&self) -> bool {
        self.step_index >= QUESTION_COUNT
    }

    /// The question to show next, or `None` once all five are answered.
    pub fn current_question(&self) -> Option<Symptom> {
        Symptom::from_index(self.step_index)
    }

    /// Answer given earlier for the current question, kept after stepping back.
    pub fn previous_answer(&self) -> Option<Answer> {
        self.answers.get(self.step_index).copied()
    }

    /// Answers for the questions before the current one.
    pub fn answers(&self) -> &[Answer] {
        &self.answers[..self.step_index.min(self.answers.len())]
    }

    /// Share of questions answered, rounded to a whole percent.
    pub fn progress_percent(&self) -> u8 {
        let step = self.step_index.min(QUESTION_COUNT);
        ((step * 100 + QUESTION_COUNT / 2) / QUESTION_COUNT) as u8
    }

    /// Record `value` for the current question and advance one step.
    ///
    /// Returns the assessment when this was the last question.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidInput`] if the questionnaire is already complete.
    pub fn answer(&mut self, value: Answer) -> CoreResult<Option<RiskAssessment>> {
        if self.is_complete() {
            return Err(CoreError::InvalidInput(
                "questionnaire is already complete; reset to start again".into(),
            ));
        }

        if self.step_index < self.answers.len() {
            self.answers[self.step_index] = value;
        } else {
            self.answers.push(value);
        }
        self.step_index += 1;

        if self.is_complete() {
            return self.assessment().map(Some);
        }
        Ok(None)
    }

    /// Step back to the previous question. Returns whether the step changed.
    ///
    /// A finished questionnaire cannot step back; it can only be reset.
    pub fn back(&mut self) -> bool {
        if self.step_index == 0 || self.is_complete() {
            return false;
        }
        self.step_index -= 1;
        true
    }

    pub fn reset(&mut self) {
        self.step_index = 0;
        self.answers.clear();
    }

    /// The observation set of a completed questionnaire.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidInput`] while questions remain unanswered.
    pub fn observations(&self) -> CoreResult<ObservationSet> {
        if !self.is_complete() {
            return Err(CoreError::InvalidInput(format!(
                "questionnaire incomplete: {} of {} questions answered",
                self.step_index, QUESTION_COUNT
            )));
        }
        ObservationSet::try_from(self.answers.as_slice())
    }

    /// Re-evaluate a completed questionnaire, e.g. to display the result again.
    pub fn assessment(&self) -> CoreResult<RiskAssessment> {
        self.observations().map(|set| RiskRule::evaluate_set(&set))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::RiskLevel;
    use Answer::{No, NotSure, Yes};

    fn answer_all(q: &mut Questionnaire, answers: &[Answer]) -> Option<RiskAssessment> {
        let mut last = None;
        for a in answers {
            last = q.answer(*a).expect("questionnaire accepts answer");
        }
        last
    }

    #[test]
    fn walks_through_questions_in_order() {
        let mut q = Questionnaire::new();
        assert_eq!(q.current_question(), Some(Symptom::SkinPatches));
        assert_eq!(q.progress_percent(), 0);

        assert_eq!(q.answer(Yes).unwrap(), None);
        assert_eq!(q.current_question(), Some(Symptom::Numbness));
        assert_eq!(q.progress_percent(), 20);
        assert_eq!(q.answers(), &[Yes]);
    }

    #[test]
    fn fifth_answer_returns_assessment() {
        let mut q = Questionnaire::new();
        let result = answer_all(&mut q, &[Yes, Yes, Yes, No, No]).expect("assessment");
        assert_eq!(result.level, RiskLevel::High);
        assert!(q.is_complete());
        assert_eq!(q.current_question(), None);
        assert_eq!(q.progress_percent(), 100);
        assert_eq!(q.assessment().unwrap(), result);
    }

    #[test]
    fn answering_a_complete_questionnaire_fails() {
        let mut q = Questionnaire::new();
        answer_all(&mut q, &[No; 5]);
        assert!(matches!(q.answer(Yes), Err(CoreError::InvalidInput(_))));
    }

    #[test]
    fn back_keeps_previous_answer_until_overwritten() {
        let mut q = Questionnaire::new();
        answer_all(&mut q, &[Yes, No]);
        assert!(q.back());
        assert_eq!(q.step_index(), 1);
        assert_eq!(q.previous_answer(), Some(No));
        assert_eq!(q.answers(), &[Yes]);

        q.answer(NotSure).unwrap();
        assert_eq!(q.answers(), &[Yes, NotSure]);
        assert_eq!(q.previous_answer(), None);
    }

    #[test]
    fn back_is_refused_at_start_and_after_completion() {
        let mut q = Questionnaire::new();
        assert!(!q.back());
        answer_all(&mut q, &[No; 5]);
        assert!(!q.back());
        assert!(q.is_complete());
    }

    #[test]
    fn revised_answer_changes_outcome() {
        let mut q = Questionnaire::new();
        answer_all(&mut q, &[Yes, NotSure, NotSure, No]);
        assert!(q.back());
        assert!(q.back());
        // Replace the second NotSure with No: one yes, one not-sure is low risk.
        answer_all(&mut q, &[No, No]);
        let result = q.answer(No).unwrap().expect("assessment");
        assert_eq!(q.answers(), &[Yes, NotSure, No, No, No]);
        assert_eq!(result.level, RiskLevel::Low);
    }

    #[test]
    fn observations_require_completion() {
        let mut q = Questionnaire::new();
        answer_all(&mut q, &[Yes, Yes]);
        let err = q.observations().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid input: questionnaire incomplete: 2 of 5 questions answered"
        );
    }

    #[test]
    fn reset_discards_answers() {
        let mut q = Questionnaire::new();
        answer_all(&mut q, &[Yes; 5]);
        q.reset();
        assert_eq!(q, Questionnaire::new());
        assert_eq!(q.current_question(), Some(Symptom::SkinPatches));
    }
}

use super::{Answer, ObservationSet};
use crate::classifier::ImageFinding;
use crate::constants::{HIGH_RISK_YES_COUNT, MEDIUM_RISK_NOT_SURE_COUNT, MEDIUM_RISK_YES_COUNT};
use crate::risk::{AssessmentSource, RiskAssessment, RiskLevel};
use crate::CoreResult;

/// Threshold rule mapping screening observations to a risk level.
///
/// This is a zero-sized type used for namespacing; all methods are associated functions and
/// pure, so calling them again with the same input always yields the same assessment.
pub struct RiskRule;

impl RiskRule {
    /// Evaluate a questionnaire.
    ///
    /// Rules are checked in order and the first match wins:
    /// 1. three or more `Yes` answers: [`RiskLevel::High`]
    /// 2. two or more `Yes`, or one `Yes` with two or more `NotSure`: [`RiskLevel::Medium`]
    /// 3. anything else: [`RiskLevel::Low`]
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidInput`](crate::CoreError::InvalidInput) unless exactly five
    /// observations are supplied.
    pub fn evaluate(observations: &[Answer]) -> CoreResult<RiskAssessment> {
        let set = ObservationSet::try_from(observations)?;
        Ok(Self::evaluate_set(&set))
    }

    /// Evaluate an observation set already known to be complete.
    pub fn evaluate_set(observations: &ObservationSet) -> RiskAssessment {
        let yes = observations.count(Answer::Yes);
        let not_sure = observations.count(Answer::NotSure);

        let level = if yes >= HIGH_RISK_YES_COUNT {
            RiskLevel::High
        } else if yes >= MEDIUM_RISK_YES_COUNT
            || (yes >= 1 && not_sure >= MEDIUM_RISK_NOT_SURE_COUNT)
        {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        };

        RiskAssessment::new(level, AssessmentSource::Questionnaire)
    }

    /// Republish an image finding as an assessment, with the same per-level recommendation the
    /// questionnaire uses.
    pub fn passthrough_image_finding(finding: &ImageFinding) -> RiskAssessment {
        RiskAssessment::new(finding.risk_level(), AssessmentSource::ImageAnalysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{
        HIGH_RISK_RECOMMENDATION, LOW_RISK_RECOMMENDATION, MEDIUM_RISK_RECOMMENDATION,
    };
    use crate::CoreError;
    use proptest::prelude::*;
    use Answer::{No, NotSure, Yes};

    fn answer_strategy() -> impl Strategy<Value = Answer> {
        prop_oneof![Just(Yes), Just(No), Just(NotSure)]
    }

    fn observations() -> impl Strategy<Value = Vec<Answer>> {
        prop::collection::vec(answer_strategy(), 5)
    }

    /// Five answers with `yes` of them `Yes`, the rest drawn from `No`/`NotSure`, shuffled.
    fn with_yes_count(yes: impl Strategy<Value = usize>) -> impl Strategy<Value = Vec<Answer>> {
        (yes, prop::collection::vec(prop_oneof![Just(No), Just(NotSure)], 5))
            .prop_map(|(k, mut answers)| {
                answers[..k].fill(Yes);
                answers
            })
            .prop_shuffle()
    }

    fn count(answers: &[Answer], wanted: Answer) -> usize {
        answers.iter().filter(|a| **a == wanted).count()
    }

    #[test]
    fn three_yes_is_high_risk() {
        let a = RiskRule::evaluate(&[Yes, Yes, Yes, No, No]).unwrap();
        assert_eq!(a.level, RiskLevel::High);
        assert_eq!(a.recommendation, HIGH_RISK_RECOMMENDATION);
        assert_eq!(a.derived_from, AssessmentSource::Questionnaire);
    }

    #[test]
    fn one_yes_two_not_sure_is_medium_risk() {
        let a = RiskRule::evaluate(&[Yes, NotSure, NotSure, No, No]).unwrap();
        assert_eq!(a.level, RiskLevel::Medium);
        assert_eq!(a.recommendation, MEDIUM_RISK_RECOMMENDATION);
    }

    #[test]
    fn all_no_is_low_risk() {
        let a = RiskRule::evaluate(&[No; 5]).unwrap();
        assert_eq!(a.level, RiskLevel::Low);
        assert_eq!(a.recommendation, LOW_RISK_RECOMMENDATION);
    }

    #[test]
    fn all_not_sure_without_yes_stays_low() {
        let a = RiskRule::evaluate(&[NotSure; 5]).unwrap();
        assert_eq!(a.level, RiskLevel::Low);
    }

    #[test]
    fn wrong_length_is_invalid_input() {
        for len in [0, 1, 4, 6, 10] {
            let answers = vec![Yes; len];
            assert!(
                matches!(RiskRule::evaluate(&answers), Err(CoreError::InvalidInput(_))),
                "length {len} should be rejected"
            );
        }
    }

    #[test]
    fn passthrough_keeps_finding_level() {
        for level in [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High] {
            let finding = ImageFinding::new(level, 0.5, vec![]).unwrap();
            let a = RiskRule::passthrough_image_finding(&finding);
            assert_eq!(a.level, level);
            assert_eq!(a.recommendation, level.recommendation());
            assert_eq!(a.derived_from, AssessmentSource::ImageAnalysis);
        }
    }

    proptest! {
        #[test]
        fn at_least_three_yes_is_always_high(answers in with_yes_count(3usize..=5)) {
            prop_assert_eq!(RiskRule::evaluate(&answers).unwrap().level, RiskLevel::High);
        }

        #[test]
        fn exactly_two_yes_is_always_medium(answers in with_yes_count(Just(2usize))) {
            prop_assert_eq!(RiskRule::evaluate(&answers).unwrap().level, RiskLevel::Medium);
        }

        #[test]
        fn single_yes_depends_on_not_sure_count(answers in with_yes_count(Just(1usize))) {
            let expected = if count(&answers, NotSure) >= 2 {
                RiskLevel::Medium
            } else {
                RiskLevel::Low
            };
            prop_assert_eq!(RiskRule::evaluate(&answers).unwrap().level, expected);
        }

        #[test]
        fn no_yes_is_always_low(answers in with_yes_count(Just(0usize))) {
            prop_assert_eq!(RiskRule::evaluate(&answers).unwrap().level, RiskLevel::Low);
        }

        #[test]
        fn evaluation_is_deterministic(answers in observations()) {
            let first = RiskRule::evaluate(&answers).unwrap();
            let second = RiskRule::evaluate(&answers).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}

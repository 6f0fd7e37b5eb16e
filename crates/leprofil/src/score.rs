// Per-label probability scoring

use crate::artifact::ModelArtifact;
use crate::classifier::LabelClassifier;
use crate::error::{ArtifactError, ClassifierError, ScoringError};
use crate::labels::Label;
use crate::survey::SurveyResponse;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, error, warn};

/// Where a label's probability came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    /// Calibrated probability reported by the classifier
    Calibrated,
    /// Hard class decision cast to 0.0 or 1.0
    HardDecision,
}

/// Probability for a single label
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    /// Scored label
    pub label: Label,
    /// Probability in [0, 1]
    pub probability: f64,
    /// Calibrated or degraded
    pub source: ScoreSource,
}

impl LabelScore {
    /// Calibrated score
    pub fn calibrated(label: Label, probability: f64) -> Self {
        Self {
            label,
            probability,
            source: ScoreSource::Calibrated,
        }
    }
}

/// Scores for a set of labels, kept in label declaration order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LabelScores {
    scores: Vec<LabelScore>,
}

impl LabelScores {
    /// Build from scores in any order
    pub fn from_scores(mut scores: Vec<LabelScore>) -> Self {
        scores.sort_by_key(|s| s.label.declaration_index());
        Self { scores }
    }

    /// Build calibrated scores from `(label, probability)` pairs
    pub fn from_probabilities<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Label, f64)>,
    {
        Self::from_scores(
            pairs
                .into_iter()
                .map(|(label, p)| LabelScore::calibrated(label, p))
                .collect(),
        )
    }

    /// Iterate in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &LabelScore> {
        self.scores.iter()
    }

    /// Score for one label
    pub fn get(&self, label: Label) -> Option<&LabelScore> {
        self.scores.iter().find(|s| s.label == label)
    }

    /// Number of scored labels
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Whether no label was scored
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// True when any label fell back to a hard decision
    pub fn is_degraded(&self) -> bool {
        self.scores
            .iter()
            .any(|s| s.source == ScoreSource::HardDecision)
    }

    /// Label → probability mapping
    pub fn probabilities(&self) -> BTreeMap<Label, f64> {
        self.scores.iter().map(|s| (s.label, s.probability)).collect()
    }
}

/// Applies one binary classifier per label to a survey.
pub struct ScoreEngine {
    classifiers: Vec<(Label, Box<dyn LabelClassifier>)>,
}

impl ScoreEngine {
    /// Create an engine; every label needs exactly one classifier.
    pub fn new(mut classifiers: Vec<(Label, Box<dyn LabelClassifier>)>) -> Result<Self, ArtifactError> {
        classifiers.sort_by_key(|(label, _)| label.declaration_index());

        for pair in classifiers.windows(2) {
            if pair[0].0 == pair[1].0 {
                return Err(ArtifactError::InvalidClassifier {
                    label: pair[0].0,
                    reason: "duplicate classifier".to_string(),
                });
            }
        }
        for label in Label::ALL {
            if !classifiers.iter().any(|(l, _)| *l == label) {
                return Err(ArtifactError::MissingLabel(label));
            }
        }

        Ok(Self { classifiers })
    }

    /// Engine backed by the built-in labelling-rule artifact
    pub fn builtin() -> Result<Self, ArtifactError> {
        ModelArtifact::builtin().into_engine()
    }

    /// Score a survey.
    ///
    /// Any classifier failure aborts the whole call; no partial scores are
    /// returned.
    pub fn score(&self, survey: &SurveyResponse) -> Result<LabelScores, ScoringError> {
        let features = survey.features();
        let mut scores = Vec::with_capacity(self.classifiers.len());

        for (label, classifier) in &self.classifiers {
            let label = *label;
            let fail = |source: ClassifierError| {
                error!("Classifier for {} failed: {}", label, source);
                ScoringError::Classifier { label, source }
            };

            let (probability, source) = match classifier.predict_proba(&features).map_err(fail)? {
                Some(p) => (p, ScoreSource::Calibrated),
                None => {
                    let positive = classifier.predict(&features).map_err(fail)?;
                    warn!("Classifier for {} has no probability; using hard decision", label);
                    (if positive { 1.0 } else { 0.0 }, ScoreSource::HardDecision)
                }
            };

            if !(0.0..=1.0).contains(&probability) {
                error!("Classifier for {} returned {} outside [0, 1]", label, probability);
                return Err(ScoringError::OutOfBounds {
                    label,
                    value: probability,
                });
            }

            debug!("Scored {} = {:.4} ({:?})", label, probability, source);
            scores.push(LabelScore {
                label,
                probability,
                source,
            });
        }

        Ok(LabelScores { scores })
    }

    /// Labels the engine scores, in declaration order
    pub fn labels(&self) -> impl Iterator<Item = Label> + '_ {
        self.classifiers.iter().map(|(label, _)| *label)
    }
}

impl fmt::Debug for ScoreEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoreEngine")
            .field("labels", &self.labels().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{LogisticClassifier, ThresholdClassifier};
    use crate::survey::QUESTION_COUNT;

    struct Failing;

    impl LabelClassifier for Failing {
        fn predict_proba(&self, _: &[f64]) -> Result<Option<f64>, ClassifierError> {
            Err(ClassifierError::Other("model file corrupted".to_string()))
        }

        fn predict(&self, _: &[f64]) -> Result<bool, ClassifierError> {
            unreachable!("predict_proba already failed")
        }
    }

    struct Overconfident;

    impl LabelClassifier for Overconfident {
        fn predict_proba(&self, _: &[f64]) -> Result<Option<f64>, ClassifierError> {
            Ok(Some(1.5))
        }

        fn predict(&self, _: &[f64]) -> Result<bool, ClassifierError> {
            Ok(true)
        }
    }

    fn engine_with(target: Label, clf: Box<dyn LabelClassifier>) -> ScoreEngine {
        let mut clf = Some(clf);
        let classifiers = Label::ALL
            .iter()
            .map(|&label| {
                let taken = if label == target { clf.take() } else { None };
                let c: Box<dyn LabelClassifier> = match taken {
                    Some(c) => c,
                    None => Box::new(LogisticClassifier::new(vec![0.0; QUESTION_COUNT], 0.0)),
                };
                (label, c)
            })
            .collect();
        ScoreEngine::new(classifiers).unwrap()
    }

    fn survey(value: i64) -> SurveyResponse {
        SurveyResponse::from_answers(&[value; QUESTION_COUNT]).unwrap()
    }

    #[test]
    fn test_one_probability_per_label() {
        let engine = ScoreEngine::builtin().unwrap();
        for value in 1..=5 {
            let scores = engine.score(&survey(value)).unwrap();
            assert_eq!(scores.len(), Label::ALL.len());
            for (score, label) in scores.iter().zip(Label::ALL) {
                assert_eq!(score.label, label);
                assert!((0.0..=1.0).contains(&score.probability));
                assert_eq!(score.source, ScoreSource::Calibrated);
            }
        }
    }

    #[test]
    fn test_builtin_follows_labelling_rules() {
        let engine = ScoreEngine::builtin().unwrap();
        let high = engine.score(&survey(5)).unwrap();
        let low = engine.score(&survey(1)).unwrap();
        for label in Label::ALL {
            assert!(high.get(label).unwrap().probability > 0.9, "{label}");
            assert!(low.get(label).unwrap().probability < 0.1, "{label}");
        }
    }

    #[test]
    fn test_hard_decision_is_explicit() {
        let engine = engine_with(
            Label::Grc,
            Box::new(ThresholdClassifier::new(vec![20], 4.0)),
        );
        let scores = engine.score(&survey(5)).unwrap();
        let grc = scores.get(Label::Grc).unwrap();
        assert_eq!(grc.probability, 1.0);
        assert_eq!(grc.source, ScoreSource::HardDecision);
        assert!(scores.is_degraded());

        let scores = engine.score(&survey(3)).unwrap();
        assert_eq!(scores.get(Label::Grc).unwrap().probability, 0.0);
    }

    #[test]
    fn test_classifier_failure_aborts_request() {
        let engine = engine_with(Label::Malware, Box::new(Failing));
        let err = engine.score(&survey(4)).unwrap_err();
        assert!(matches!(
            err,
            ScoringError::Classifier {
                label: Label::Malware,
                ..
            }
        ));
    }

    #[test]
    fn test_out_of_bounds_probability_rejected() {
        let engine = engine_with(Label::Cloud, Box::new(Overconfident));
        assert!(matches!(
            engine.score(&survey(4)),
            Err(ScoringError::OutOfBounds {
                label: Label::Cloud,
                ..
            })
        ));
    }

    #[test]
    fn test_missing_classifier_rejected() {
        let classifiers: Vec<(Label, Box<dyn LabelClassifier>)> = vec![(
            Label::Offensive,
            Box::new(LogisticClassifier::new(vec![0.0; QUESTION_COUNT], 0.0)),
        )];
        assert!(matches!(
            ScoreEngine::new(classifiers),
            Err(ArtifactError::MissingLabel(Label::BlueTeam))
        ));
    }

    #[test]
    fn test_label_scores_keep_declaration_order() {
        let scores = LabelScores::from_probabilities([
            (Label::Grc, 0.1),
            (Label::Offensive, 0.2),
            (Label::Cloud, 0.3),
        ]);
        let labels: Vec<_> = scores.iter().map(|s| s.label).collect();
        assert_eq!(labels, vec![Label::Offensive, Label::Cloud, Label::Grc]);
        assert!(!scores.is_degraded());
    }
}

// Classifier artifact loading
//
// Artifacts are JSON documents holding one classifier description per label.

use crate::classifier::{LabelClassifier, LogisticClassifier, ThresholdClassifier};
use crate::error::ArtifactError;
use crate::labels::Label;
use crate::score::ScoreEngine;
use crate::survey::QUESTION_COUNT;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// Steepness of the built-in logistic rules
const BUILTIN_STEEPNESS: f64 = 4.0;

/// Survey labelling rules: questions averaged per label and the cut-off the
/// mean must exceed.
const LABELLING_RULES: [(Label, &[usize], f64); 9] = [
    (Label::Offensive, &[1, 2, 3, 4], 3.5),
    (Label::BlueTeam, &[5, 6, 7], 3.5),
    (Label::Malware, &[8, 9], 3.7),
    (Label::Forensics, &[10, 11], 3.5),
    (Label::Network, &[12, 13], 3.5),
    (Label::Cloud, &[14, 15], 3.5),
    (Label::Appsec, &[16, 17], 3.5),
    (Label::ThreatIntel, &[18, 19], 3.7),
    (Label::Grc, &[20], 4.0),
];

/// Serialized description of one label's classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierSpec {
    /// Calibrated logistic model over all answers
    Logistic {
        /// One weight per question
        weights: Vec<f64>,
        /// Intercept
        bias: f64,
    },
    /// Hard-decision rule over a subset of answers
    Threshold {
        /// 1-based question numbers
        questions: Vec<usize>,
        /// Mean the answers must exceed
        threshold: f64,
    },
}

impl ClassifierSpec {
    fn validate(&self, label: Label) -> Result<(), ArtifactError> {
        let invalid = |reason: String| ArtifactError::InvalidClassifier { label, reason };
        match self {
            ClassifierSpec::Logistic { weights, bias } => {
                if weights.len() != QUESTION_COUNT {
                    return Err(invalid(format!(
                        "expected {} weights, found {}",
                        QUESTION_COUNT,
                        weights.len()
                    )));
                }
                if !bias.is_finite() || weights.iter().any(|w| !w.is_finite()) {
                    return Err(invalid("coefficients must be finite".to_string()));
                }
            }
            ClassifierSpec::Threshold {
                questions,
                threshold,
            } => {
                if questions.is_empty() {
                    return Err(invalid("no questions listed".to_string()));
                }
                if let Some(q) = questions
                    .iter()
                    .find(|&&q| q == 0 || q > QUESTION_COUNT)
                {
                    return Err(invalid(format!("question {q} out of range")));
                }
                if !threshold.is_finite() {
                    return Err(invalid("threshold must be finite".to_string()));
                }
            }
        }
        Ok(())
    }

    fn build(&self) -> Box<dyn LabelClassifier> {
        match self {
            ClassifierSpec::Logistic { weights, bias } => {
                Box::new(LogisticClassifier::new(weights.clone(), *bias))
            }
            ClassifierSpec::Threshold {
                questions,
                threshold,
            } => Box::new(ThresholdClassifier::new(questions.clone(), *threshold)),
        }
    }
}

/// Classifier artifact covering every label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Classifier description keyed by label identifier
    pub labels: BTreeMap<String, ClassifierSpec>,
}

impl ModelArtifact {
    /// Load an artifact from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let artifact = Self::from_json_str(&content)?;
        info!(
            "Loaded model artifact from {} ({} labels)",
            path.display(),
            artifact.labels.len()
        );
        Ok(artifact)
    }

    /// Parse and validate an artifact from JSON text
    pub fn from_json_str(content: &str) -> Result<Self, ArtifactError> {
        let artifact: ModelArtifact = serde_json::from_str(content)?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Logistic approximation of the survey labelling rules.
    ///
    /// Each rule `mean(q_i) > t` becomes `sigmoid(s * (mean(q_i) - t))`.
    pub fn builtin() -> Self {
        let labels = LABELLING_RULES
            .iter()
            .map(|(label, questions, threshold)| {
                let share = BUILTIN_STEEPNESS / questions.len() as f64;
                let mut weights = vec![0.0; QUESTION_COUNT];
                for &q in *questions {
                    weights[q - 1] = share;
                }
                let spec = ClassifierSpec::Logistic {
                    weights,
                    bias: -BUILTIN_STEEPNESS * threshold,
                };
                (label.as_str().to_string(), spec)
            })
            .collect();
        Self { labels }
    }

    /// Check label coverage and classifier parameters
    pub fn validate(&self) -> Result<(), ArtifactError> {
        for name in self.labels.keys() {
            if Label::from_str_name(name).is_none() {
                return Err(ArtifactError::UnknownLabel(name.clone()));
            }
        }
        for label in Label::ALL {
            let spec = self
                .labels
                .get(label.as_str())
                .ok_or(ArtifactError::MissingLabel(label))?;
            spec.validate(label)?;
        }
        Ok(())
    }

    /// Build a score engine with one classifier per label
    pub fn into_engine(self) -> Result<ScoreEngine, ArtifactError> {
        self.validate()?;
        let classifiers = Label::ALL
            .iter()
            .map(|label| {
                let spec = &self.labels[label.as_str()];
                debug!("Building {} classifier for {}", spec_kind(spec), label);
                (*label, spec.build())
            })
            .collect();
        ScoreEngine::new(classifiers)
    }
}

fn spec_kind(spec: &ClassifierSpec) -> &'static str {
    match spec {
        ClassifierSpec::Logistic { .. } => "logistic",
        ClassifierSpec::Threshold { .. } => "threshold",
    }
}

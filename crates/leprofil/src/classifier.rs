// Per-label binary classifiers

use crate::error::ClassifierError;

/// A binary classifier for a single label.
///
/// Implementations that can only make a hard decision return `Ok(None)` from
/// [`LabelClassifier::predict_proba`]; the score engine then falls back to
/// [`LabelClassifier::predict`] and records the score as a hard decision.
pub trait LabelClassifier: Send + Sync {
    /// Calibrated probability of the positive class, if supported.
    fn predict_proba(&self, features: &[f64]) -> Result<Option<f64>, ClassifierError>;

    /// Hard class decision.
    fn predict(&self, features: &[f64]) -> Result<bool, ClassifierError>;
}

/// Logistic model: `sigmoid(w · x + b)`
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticClassifier {
    weights: Vec<f64>,
    bias: f64,
}

impl LogisticClassifier {
    /// Create a logistic classifier from its coefficients
    pub fn new(weights: Vec<f64>, bias: f64) -> Self {
        Self { weights, bias }
    }

    /// Input width
    pub fn width(&self) -> usize {
        self.weights.len()
    }

    fn logit(&self, features: &[f64]) -> Result<f64, ClassifierError> {
        if features.len() != self.weights.len() {
            return Err(ClassifierError::FeatureWidth {
                expected: self.weights.len(),
                actual: features.len(),
            });
        }
        let z = self
            .weights
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.bias;
        if !z.is_finite() {
            return Err(ClassifierError::NonFinite);
        }
        Ok(z)
    }
}

impl LabelClassifier for LogisticClassifier {
    fn predict_proba(&self, features: &[f64]) -> Result<Option<f64>, ClassifierError> {
        let z = self.logit(features)?;
        Ok(Some(1.0 / (1.0 + (-z).exp())))
    }

    fn predict(&self, features: &[f64]) -> Result<bool, ClassifierError> {
        Ok(self.logit(features)? >= 0.0)
    }
}

/// Rule classifier: positive when the mean of selected answers exceeds a
/// threshold. Exposes no calibrated probability.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdClassifier {
    /// 1-based question numbers averaged by the rule
    questions: Vec<usize>,
    threshold: f64,
}

impl ThresholdClassifier {
    /// Create a threshold rule over 1-based question numbers
    pub fn new(questions: Vec<usize>, threshold: f64) -> Self {
        Self {
            questions,
            threshold,
        }
    }
}

impl LabelClassifier for ThresholdClassifier {
    fn predict_proba(&self, _features: &[f64]) -> Result<Option<f64>, ClassifierError> {
        Ok(None)
    }

    fn predict(&self, features: &[f64]) -> Result<bool, ClassifierError> {
        if self.questions.is_empty() {
            return Err(ClassifierError::Other(
                "threshold rule has no questions".to_string(),
            ));
        }
        let mut sum = 0.0;
        for &q in &self.questions {
            let value = q
                .checked_sub(1)
                .and_then(|idx| features.get(idx))
                .ok_or(ClassifierError::FeatureWidth {
                    expected: q,
                    actual: features.len(),
                })?;
            sum += value;
        }
        Ok(sum / self.questions.len() as f64 > self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logistic_midpoint() {
        let clf = LogisticClassifier::new(vec![1.0, -1.0], 0.0);
        let p = clf.predict_proba(&[2.0, 2.0]).unwrap().unwrap();
        assert!((p - 0.5).abs() < 1e-12);
        assert!(clf.predict(&[2.0, 2.0]).unwrap());
        assert!(!clf.predict(&[1.0, 2.0]).unwrap());
    }

    #[test]
    fn test_logistic_width_mismatch() {
        let clf = LogisticClassifier::new(vec![1.0; 3], 0.0);
        assert_eq!(
            clf.predict_proba(&[1.0; 2]),
            Err(ClassifierError::FeatureWidth {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn test_logistic_non_finite() {
        let clf = LogisticClassifier::new(vec![f64::INFINITY], f64::NEG_INFINITY);
        assert_eq!(clf.predict_proba(&[1.0]), Err(ClassifierError::NonFinite));
    }

    #[test]
    fn test_threshold_has_no_probability() {
        let clf = ThresholdClassifier::new(vec![1, 2], 3.5);
        assert_eq!(clf.predict_proba(&[5.0, 5.0]).unwrap(), None);
        assert!(clf.predict(&[5.0, 4.0]).unwrap());
        assert!(!clf.predict(&[3.0, 4.0]).unwrap());
    }

    #[test]
    fn test_threshold_question_out_of_range() {
        let clf = ThresholdClassifier::new(vec![21], 3.5);
        assert!(clf.predict(&[5.0; 20]).is_err());
    }
}

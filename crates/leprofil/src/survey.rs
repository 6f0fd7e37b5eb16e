// Survey answers and validation

use crate::error::SurveyError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of survey questions
pub const QUESTION_COUNT: usize = 20;

/// Lowest answer on the ordinal scale
pub const MIN_ANSWER: i64 = 1;

/// Highest answer on the ordinal scale
pub const MAX_ANSWER: i64 = 5;

/// A validated survey: exactly [`QUESTION_COUNT`] answers, each in
/// `MIN_ANSWER..=MAX_ANSWER`.
///
/// The only way to obtain one is through the validating constructors, so a
/// `SurveyResponse` in hand is always safe to score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>", into = "Vec<i64>")]
pub struct SurveyResponse {
    answers: [u8; QUESTION_COUNT],
}

impl SurveyResponse {
    /// Build a survey from an ordered answer list
    pub fn from_answers(answers: &[i64]) -> Result<Self, SurveyError> {
        if answers.len() != QUESTION_COUNT {
            return Err(SurveyError::WrongLength {
                expected: QUESTION_COUNT,
                actual: answers.len(),
            });
        }

        let mut validated = [0u8; QUESTION_COUNT];
        for (idx, &value) in answers.iter().enumerate() {
            validated[idx] = check_range(idx + 1, value)?;
        }

        Ok(Self { answers: validated })
    }

    /// Build a survey from a JSON body.
    ///
    /// Accepts either an object keyed `q1`..`q20` (extra keys are ignored) or
    /// a plain array of twenty answers.
    pub fn from_json(body: &Value) -> Result<Self, SurveyError> {
        match body {
            Value::Object(map) => {
                let mut answers = Vec::with_capacity(QUESTION_COUNT);
                for question in 1..=QUESTION_COUNT {
                    let value = map
                        .get(&format!("q{question}"))
                        .ok_or(SurveyError::MissingAnswer { question })?;
                    answers.push(integer_answer(question, value)?);
                }
                Self::from_answers(&answers)
            }
            Value::Array(items) => {
                if items.len() != QUESTION_COUNT {
                    return Err(SurveyError::WrongLength {
                        expected: QUESTION_COUNT,
                        actual: items.len(),
                    });
                }
                let answers = items
                    .iter()
                    .enumerate()
                    .map(|(idx, value)| integer_answer(idx + 1, value))
                    .collect::<Result<Vec<_>, _>>()?;
                Self::from_answers(&answers)
            }
            _ => Err(SurveyError::NotAnObject {
                expected: QUESTION_COUNT,
            }),
        }
    }

    /// Answers in question order
    pub fn answers(&self) -> &[u8; QUESTION_COUNT] {
        &self.answers
    }

    /// Answer for a 1-based question number
    pub fn answer(&self, question: usize) -> Option<u8> {
        question
            .checked_sub(1)
            .and_then(|idx| self.answers.get(idx))
            .copied()
    }

    /// Feature vector handed to the classifiers
    pub fn features(&self) -> [f64; QUESTION_COUNT] {
        self.answers.map(f64::from)
    }
}

impl TryFrom<Vec<i64>> for SurveyResponse {
    type Error = SurveyError;

    fn try_from(answers: Vec<i64>) -> Result<Self, Self::Error> {
        Self::from_answers(&answers)
    }
}

impl From<SurveyResponse> for Vec<i64> {
    fn from(survey: SurveyResponse) -> Self {
        survey.answers.iter().map(|&a| i64::from(a)).collect()
    }
}

fn integer_answer(question: usize, value: &Value) -> Result<i64, SurveyError> {
    value
        .as_i64()
        .ok_or(SurveyError::NotAnInteger { question })
}

fn check_range(question: usize, value: i64) -> Result<u8, SurveyError> {
    if !(MIN_ANSWER..=MAX_ANSWER).contains(&value) {
        return Err(SurveyError::OutOfRange {
            question,
            value,
            min: MIN_ANSWER,
            max: MAX_ANSWER,
        });
    }
    // Range check above guarantees the narrowing is lossless
    Ok(value as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn object_with(value: Value) -> Value {
        let mut map = serde_json::Map::new();
        for q in 1..=QUESTION_COUNT {
            map.insert(format!("q{q}"), value.clone());
        }
        Value::Object(map)
    }

    #[test]
    fn test_from_object_all_fives() {
        let survey = SurveyResponse::from_json(&object_with(json!(5))).unwrap();
        assert!(survey.answers().iter().all(|&a| a == 5));
        assert_eq!(survey.features()[0], 5.0);
    }

    #[test]
    fn test_extra_keys_ignored() {
        let mut body = object_with(json!(3));
        body["name"] = json!("alice");
        assert!(SurveyResponse::from_json(&body).is_ok());
    }

    #[test]
    fn test_missing_key_names_question() {
        let mut body = object_with(json!(3));
        body.as_object_mut().unwrap().remove("q7");
        assert_eq!(
            SurveyResponse::from_json(&body),
            Err(SurveyError::MissingAnswer { question: 7 })
        );
    }

    #[rstest]
    #[case(json!("5"))]
    #[case(json!(4.5))]
    #[case(json!(null))]
    fn test_non_integer_rejected(#[case] value: Value) {
        let mut body = object_with(json!(3));
        body["q12"] = value;
        assert_eq!(
            SurveyResponse::from_json(&body),
            Err(SurveyError::NotAnInteger { question: 12 })
        );
    }

    #[rstest]
    #[case(0)]
    #[case(6)]
    #[case(-1)]
    fn test_out_of_range_rejected(#[case] value: i64) {
        let mut answers = vec![3; QUESTION_COUNT];
        answers[19] = value;
        assert!(matches!(
            SurveyResponse::from_answers(&answers),
            Err(SurveyError::OutOfRange { question: 20, .. })
        ));
    }

    #[rstest]
    #[case(19)]
    #[case(21)]
    #[case(0)]
    fn test_wrong_length_rejected(#[case] len: usize) {
        let answers = vec![3; len];
        assert_eq!(
            SurveyResponse::from_answers(&answers),
            Err(SurveyError::WrongLength {
                expected: QUESTION_COUNT,
                actual: len
            })
        );
    }

    #[test]
    fn test_array_body_accepted() {
        let body = json!([1, 2, 3, 4, 5, 1, 2, 3, 4, 5, 1, 2, 3, 4, 5, 1, 2, 3, 4, 5]);
        let survey = SurveyResponse::from_json(&body).unwrap();
        assert_eq!(survey.answer(1), Some(1));
        assert_eq!(survey.answer(20), Some(5));
        assert_eq!(survey.answer(21), None);
        assert_eq!(survey.answer(0), None);
    }

    #[test]
    fn test_scalar_body_rejected() {
        assert!(matches!(
            SurveyResponse::from_json(&json!("hello")),
            Err(SurveyError::NotAnObject { .. })
        ));
    }

    #[test]
    fn test_serde_validates() {
        let bad: Result<SurveyResponse, _> = serde_json::from_str("[1, 2, 3]");
        assert!(bad.is_err());
        let good: SurveyResponse = serde_json::from_value(json!(vec![2; QUESTION_COUNT])).unwrap();
        assert_eq!(serde_json::to_value(&good).unwrap(), json!(vec![2; QUESTION_COUNT]));
    }
}

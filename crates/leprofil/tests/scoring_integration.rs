// Scoring pipeline integration tests

use leprofil::{
    ClassifierSpec, Label, ModelArtifact, ScoreEngine, ScoreSource, SurveyResponse, SurveyError,
    TopKSelector, QUESTION_COUNT,
};
use serde_json::json;

fn offensive_profile() -> SurveyResponse {
    let mut answers = vec![1; QUESTION_COUNT];
    answers[..4].copy_from_slice(&[5, 5, 5, 5]);
    answers[7..9].copy_from_slice(&[4, 4]);
    SurveyResponse::from_answers(&answers).unwrap()
}

#[test]
fn test_offensive_profile_ranks_offensive_first() {
    let engine = ScoreEngine::builtin().unwrap();
    let scores = engine.score(&offensive_profile()).unwrap();
    let top = TopKSelector::default().select(&scores);

    assert_eq!(top[0].label, Label::Offensive);
    assert_eq!(top[1].label, Label::Malware);
    assert!(top[0].probability > top[1].probability);
}

#[test]
fn test_all_fives_top_three_is_deterministic() {
    let engine = ScoreEngine::builtin().unwrap();
    let survey = SurveyResponse::from_answers(&[5; QUESTION_COUNT]).unwrap();

    let first = TopKSelector::default().select(&engine.score(&survey).unwrap());
    for _ in 0..10 {
        let again = TopKSelector::default().select(&engine.score(&survey).unwrap());
        assert_eq!(first, again);
    }
    assert_eq!(first.len(), 3);
}

#[test]
fn test_degraded_artifact_marks_hard_decisions() {
    let mut artifact = ModelArtifact::builtin();
    artifact.labels.insert(
        "threatintel".to_string(),
        ClassifierSpec::Threshold {
            questions: vec![18, 19],
            threshold: 3.7,
        },
    );
    let engine = artifact.into_engine().unwrap();
    let scores = engine.score(&SurveyResponse::from_answers(&[4; QUESTION_COUNT]).unwrap()).unwrap();

    let ti = scores.get(Label::ThreatIntel).unwrap();
    assert_eq!(ti.source, ScoreSource::HardDecision);
    assert_eq!(ti.probability, 1.0);
    assert_eq!(
        scores.iter().filter(|s| s.source == ScoreSource::HardDecision).count(),
        1
    );
}

#[test]
fn test_invalid_survey_rejected_before_scoring() {
    let body = json!({"q1": 5, "q2": 5});
    assert_eq!(
        SurveyResponse::from_json(&body),
        Err(SurveyError::MissingAnswer { question: 3 })
    );
}

#[test]
fn test_artifact_from_json_text() {
    let mut labels = serde_json::Map::new();
    for label in Label::ALL {
        labels.insert(
            label.as_str().to_string(),
            json!({"kind": "logistic", "weights": vec![0.0; QUESTION_COUNT], "bias": 0.0}),
        );
    }
    let text = json!({ "labels": labels }).to_string();
    let engine = ModelArtifact::from_json_str(&text).unwrap().into_engine().unwrap();
    let scores = engine.score(&SurveyResponse::from_answers(&[3; QUESTION_COUNT]).unwrap()).unwrap();

    for score in scores.iter() {
        assert!((score.probability - 0.5).abs() < 1e-12);
    }
    // All tied: declaration order decides
    assert_eq!(
        TopKSelector::default().select_labels(&scores),
        vec![Label::Offensive, Label::BlueTeam, Label::Malware]
    );
}

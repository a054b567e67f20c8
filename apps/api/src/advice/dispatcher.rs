//! Advice dispatch: turns one validated chat input into exactly one `AdviceResponse`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::advice::artifact::{ArtifactError, ENCODER_FILE};
use crate::advice::classifier::{load_classifier, CareerClassifier, ClassifierBackend};
use crate::advice::encoder::LabelEncoder;
use crate::advice::keywords::advice_for;
use crate::advice::skills::SkillProfile;
use crate::errors::AppError;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Raw `/chat` body. Either field may be absent.
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    pub skills: Option<HashMap<String, f64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceKind {
    Recommendation,
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdviceResponse {
    #[serde(rename = "type")]
    pub kind: AdviceKind,
    pub message: String,
}

/// A chat request after validation: a skills assessment takes precedence over text.
#[derive(Debug, Clone)]
pub enum ChatInput {
    Skills(SkillProfile),
    Text(String),
}

impl ChatInput {
    /// An empty skills object counts as absent.
    pub fn from_request(request: ChatRequest) -> Result<Self, AppError> {
        if let Some(skills) = request.skills.filter(|s| !s.is_empty()) {
            let profile = SkillProfile::from_payload(skills).map_err(AppError::Validation)?;
            return Ok(ChatInput::Skills(profile));
        }

        request
            .message
            .map(ChatInput::Text)
            .ok_or(AppError::MissingInput)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Dispatcher
// ────────────────────────────────────────────────────────────────────────────

/// Read-only after construction; shared across requests behind an `Arc`.
pub struct AdviceDispatcher {
    encoder: LabelEncoder,
    classifier: Arc<dyn CareerClassifier>,
}

impl AdviceDispatcher {
    pub fn new(encoder: LabelEncoder, classifier: Arc<dyn CareerClassifier>) -> Self {
        Self {
            encoder,
            classifier,
        }
    }

    /// Loads the label encoder and the configured classifier from `model_dir`.
    pub fn load(model_dir: &Path, backend: ClassifierBackend) -> Result<Self, ArtifactError> {
        let encoder = LabelEncoder::load(&model_dir.join(ENCODER_FILE))?;
        let classifier = load_classifier(backend, model_dir, &encoder)?;
        Ok(Self::new(encoder, classifier))
    }

    pub fn backend(&self) -> &'static str {
        self.classifier.backend()
    }

    pub fn dispatch(&self, input: ChatInput) -> Result<AdviceResponse, AppError> {
        match input {
            ChatInput::Skills(profile) => self.recommend(&profile),
            ChatInput::Text(message) => Ok(AdviceResponse {
                kind: AdviceKind::Text,
                message: advice_for(&message).to_string(),
            }),
        }
    }

    fn recommend(&self, profile: &SkillProfile) -> Result<AdviceResponse, AppError> {
        let features = profile.features();
        let industry_id = self.encoder.transform(features.industry)?;

        let career = self.classifier.predict(&[
            features.technical_score,
            features.soft_score,
            industry_id as f64,
        ])?;

        debug!(
            technical = features.technical_score,
            soft = features.soft_score,
            industry = features.industry,
            backend = self.classifier.backend(),
            "Predicted career '{career}'"
        );

        Ok(AdviceResponse {
            kind: AdviceKind::Recommendation,
            message: format!(
                "Based on your skills, I recommend: {career}. Would you like more details or resume tips for this role?"
            ),
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advice::keywords::FALLBACK_PROMPT;

    fn bundled() -> AdviceDispatcher {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("models");
        AdviceDispatcher::load(&dir, ClassifierBackend::TreeEnsemble).unwrap()
    }

    fn skills(pairs: &[(&str, f64)]) -> ChatRequest {
        ChatRequest {
            message: None,
            skills: Some(pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()),
        }
    }

    /// Echoes the feature vector back as the label.
    struct EchoClassifier;

    impl CareerClassifier for EchoClassifier {
        fn predict(&self, features: &[f64; 3]) -> Result<String, AppError> {
            Ok(format!("{:?}", features))
        }

        fn backend(&self) -> &'static str {
            "echo"
        }
    }

    #[test]
    fn test_missing_message_and_skills() {
        let err = ChatInput::from_request(ChatRequest::default()).unwrap_err();
        assert!(matches!(err, AppError::MissingInput));
    }

    #[test]
    fn test_empty_skills_without_message_is_missing_input() {
        let err = ChatInput::from_request(skills(&[])).unwrap_err();
        assert!(matches!(err, AppError::MissingInput));
    }

    #[test]
    fn test_empty_skills_with_message_uses_text_path() {
        let mut request = skills(&[]);
        request.message = Some("hello".to_string());
        assert!(matches!(
            ChatInput::from_request(request).unwrap(),
            ChatInput::Text(_)
        ));
    }

    #[test]
    fn test_skills_take_precedence_over_message() {
        let mut request = skills(&[("programming", 3.0)]);
        request.message = Some("resume".to_string());
        assert!(matches!(
            ChatInput::from_request(request).unwrap(),
            ChatInput::Skills(_)
        ));
    }

    #[test]
    fn test_ratings_above_five_are_accepted() {
        let input = ChatInput::from_request(skills(&[("programming", 10.0), ("security", 5.0)]));
        match input.unwrap() {
            ChatInput::Skills(profile) => assert_eq!(profile.technical_score(), 3.0),
            other => panic!("expected skills input, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_skill_is_validation_error() {
        let err = ChatInput::from_request(skills(&[("cloud", -0.5)])).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_recommendation_message_format() {
        let input = ChatInput::from_request(skills(&[
            ("programming", 5.0),
            ("data-analysis", 5.0),
            ("web-development", 4.0),
            ("security", 4.0),
            ("cloud", 5.0),
            ("technology", 5.0),
        ]))
        .unwrap();

        let response = bundled().dispatch(input).unwrap();
        assert_eq!(response.kind, AdviceKind::Recommendation);
        assert_eq!(
            response.message,
            "Based on your skills, I recommend: Software Engineer. Would you like more details or resume tips for this role?"
        );
    }

    #[test]
    fn test_features_reach_classifier_in_order() {
        let encoder =
            LabelEncoder::new(vec!["finance".to_string(), "technology".to_string()]).unwrap();
        let dispatcher = AdviceDispatcher::new(encoder, Arc::new(EchoClassifier));

        let input = ChatInput::Skills(SkillProfile::new(
            [("programming", 10.0), ("security", 5.0), ("leadership", 5.0)]
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
        ));

        let response = dispatcher.dispatch(input).unwrap();
        // technical 3.0, soft 1.0, no industry rated → technology → id 1
        assert!(
            response.message.contains("[3.0, 1.0, 1.0]"),
            "{}",
            response.message
        );
    }

    #[test]
    fn test_unknown_industry_label_surfaces_as_error() {
        let encoder = LabelEncoder::new(vec!["finance".to_string()]).unwrap();
        let dispatcher = AdviceDispatcher::new(encoder, Arc::new(EchoClassifier));

        let err = dispatcher
            .dispatch(ChatInput::Skills(SkillProfile::default()))
            .unwrap_err();
        match err {
            AppError::UnknownLabel(e) => assert_eq!(e.label, "technology"),
            other => panic!("expected UnknownLabel, got {other:?}"),
        }
    }

    #[test]
    fn test_text_path() {
        let dispatcher = bundled();

        let response = dispatcher
            .dispatch(ChatInput::Text("Can you give me interview tips?".to_string()))
            .unwrap();
        assert_eq!(response.kind, AdviceKind::Text);
        assert!(response.message.contains("STAR method"));

        let response = dispatcher
            .dispatch(ChatInput::Text("hello".to_string()))
            .unwrap();
        assert_eq!(response.message, FALLBACK_PROMPT);
    }

    #[test]
    fn test_advice_response_json_round_trip() {
        let original = AdviceResponse {
            kind: AdviceKind::Recommendation,
            message: "Based on your skills, I recommend: Brand Manager.".to_string(),
        };
        let json = serde_json::to_value(&original).unwrap();
        assert_eq!(json["type"], "recommendation");

        let back: AdviceResponse = serde_json::from_value(json).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn test_rule_backend_dispatch() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("models");
        let dispatcher = AdviceDispatcher::load(&dir, ClassifierBackend::RuleBased).unwrap();
        assert_eq!(dispatcher.backend(), "rules");

        let input = ChatInput::from_request(skills(&[
            ("communication", 5.0),
            ("leadership", 5.0),
            ("problem-solving", 4.0),
            ("teamwork", 4.0),
            ("adaptability", 4.0),
            ("healthcare", 5.0),
        ]))
        .unwrap();
        let response = dispatcher.dispatch(input).unwrap();
        assert!(response.message.contains("Healthcare Administrator"));
    }
}

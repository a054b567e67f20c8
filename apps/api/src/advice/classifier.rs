//! Career classification: pluggable, trait-based predictor over the three skill features.
//!
//! Default: `TreeEnsembleClassifier` (decision trees exported by the training pipeline).
//! Alternative: `RuleBasedClassifier` (threshold tables from the assessment page).
//!
//! `AppState` holds an `Arc<dyn CareerClassifier>`, chosen at startup via config.

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::advice::artifact::{read_artifact, ArtifactError, CLASSIFIER_FILE};
use crate::advice::encoder::LabelEncoder;
use crate::errors::AppError;

/// `[technical_score, soft_score, encoded_industry]`
pub const FEATURE_COUNT: usize = 3;
pub type FeatureVector = [f64; FEATURE_COUNT];

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap prediction backends without touching the dispatcher.
///
/// Implementations are immutable after construction and shared across requests.
pub trait CareerClassifier: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<String, AppError>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierBackend {
    TreeEnsemble,
    RuleBased,
}

/// Builds the configured classifier. Artifact problems surface here, at startup.
pub fn load_classifier(
    backend: ClassifierBackend,
    model_dir: &Path,
    encoder: &LabelEncoder,
) -> Result<Arc<dyn CareerClassifier>, ArtifactError> {
    let classifier: Arc<dyn CareerClassifier> = match backend {
        ClassifierBackend::TreeEnsemble => {
            let model = TreeEnsembleClassifier::load(&model_dir.join(CLASSIFIER_FILE))?;
            info!(
                "Loaded career model: {} trees, {} classes",
                model.trees.len(),
                model.classes.len()
            );
            Arc::new(model)
        }
        ClassifierBackend::RuleBased => Arc::new(RuleBasedClassifier::new(encoder.clone())),
    };
    Ok(classifier)
}

// ────────────────────────────────────────────────────────────────────────────
// TreeEnsembleClassifier (default implementation)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// Go `left` when `features[feature] <= threshold`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        class: usize,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

/// On-disk shape of `career_model.json`.
#[derive(Debug, Deserialize)]
struct ModelArtifact {
    classes: Vec<String>,
    trees: Vec<DecisionTree>,
}

/// Majority vote over one or more decision trees. Ties go to the lowest class index.
#[derive(Debug, Clone)]
pub struct TreeEnsembleClassifier {
    classes: Vec<String>,
    trees: Vec<DecisionTree>,
}

impl TreeEnsembleClassifier {
    pub fn new(classes: Vec<String>, trees: Vec<DecisionTree>) -> Result<Self, ArtifactError> {
        let model = Self { classes, trees };
        model.validate()?;
        Ok(model)
    }

    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let artifact: ModelArtifact = read_artifact(path)?;
        Self::new(artifact.classes, artifact.trees)
    }

    /// Every child index must point forward, so a walk from the root always
    /// reaches a leaf.
    fn validate(&self) -> Result<(), ArtifactError> {
        if self.classes.is_empty() {
            return Err(ArtifactError::Invalid("career model has no classes".into()));
        }
        if self.trees.is_empty() {
            return Err(ArtifactError::Invalid("career model has no trees".into()));
        }

        for (t, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(ArtifactError::Invalid(format!("tree {t} has no nodes")));
            }
            let len = tree.nodes.len();
            for (i, node) in tree.nodes.iter().enumerate() {
                match *node {
                    TreeNode::Split {
                        feature,
                        threshold,
                        left,
                        right,
                    } => {
                        if feature >= FEATURE_COUNT {
                            return Err(ArtifactError::Invalid(format!(
                                "tree {t} node {i}: feature {feature} out of range"
                            )));
                        }
                        if !threshold.is_finite() {
                            return Err(ArtifactError::Invalid(format!(
                                "tree {t} node {i}: threshold is not finite"
                            )));
                        }
                        for child in [left, right] {
                            if child <= i || child >= len {
                                return Err(ArtifactError::Invalid(format!(
                                    "tree {t} node {i}: child {child} is not a later node"
                                )));
                            }
                        }
                    }
                    TreeNode::Leaf { class } => {
                        if class >= self.classes.len() {
                            return Err(ArtifactError::Invalid(format!(
                                "tree {t} node {i}: class {class} out of range"
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn walk(tree: &DecisionTree, features: &FeatureVector) -> usize {
        let mut i = 0;
        loop {
            match tree.nodes[i] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    i = if features[feature] <= threshold { left } else { right };
                }
                TreeNode::Leaf { class } => return class,
            }
        }
    }
}

impl CareerClassifier for TreeEnsembleClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<String, AppError> {
        let mut votes = vec![0u32; self.classes.len()];
        for tree in &self.trees {
            votes[Self::walk(tree, features)] += 1;
        }

        let mut winner = 0;
        for (class, &count) in votes.iter().enumerate() {
            if count > votes[winner] {
                winner = class;
            }
        }

        Ok(self.classes[winner].clone())
    }

    fn backend(&self) -> &'static str {
        "tree"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// RuleBasedClassifier (threshold tables, no artifact)
// ────────────────────────────────────────────────────────────────────────────

const HIGH_THRESHOLD: f64 = 4.0;
const LOW_THRESHOLD: f64 = 3.0;
const GENERIC_ROLE: &str = "Career Development Coach";

/// (industry, high-score role, mid-score role)
const TECHNICAL_ROLES: &[(&str, &str, &str)] = &[
    ("healthcare", "Healthcare IT Specialist", "Health Informatics Specialist"),
    ("finance", "Financial Systems Analyst", "Financial Technology Consultant"),
    ("technology", "Software Engineer", "IT Project Manager"),
    ("marketing", "Marketing Technology Specialist", "Digital Marketing Manager"),
    ("education", "Educational Technology Specialist", "Instructional Designer"),
];

const SOFT_ROLES: &[(&str, &str, &str)] = &[
    ("healthcare", "Healthcare Administrator", "Health Services Coordinator"),
    ("finance", "Financial Advisor", "Account Manager"),
    ("technology", "Technology Consultant", "Technical Product Manager"),
    ("marketing", "Brand Manager", "Marketing Coordinator"),
    ("education", "Education Administrator", "Academic Advisor"),
];

/// Technical strength wins over soft strength; below both thresholds the
/// generic coaching role is returned.
pub struct RuleBasedClassifier {
    encoder: LabelEncoder,
}

impl RuleBasedClassifier {
    pub fn new(encoder: LabelEncoder) -> Self {
        Self { encoder }
    }
}

fn role_for(
    table: &[(&str, &'static str, &'static str)],
    industry: &str,
    score: f64,
) -> Option<&'static str> {
    let &(_, high, mid) = table.iter().find(|(name, _, _)| *name == industry)?;
    if score >= HIGH_THRESHOLD {
        Some(high)
    } else if score >= LOW_THRESHOLD {
        Some(mid)
    } else {
        None
    }
}

impl CareerClassifier for RuleBasedClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<String, AppError> {
        let [technical, soft, encoded] = *features;
        let industry = self
            .encoder
            .inverse_transform(encoded as u32)
            .ok_or_else(|| anyhow::anyhow!("industry id {encoded} not in encoder vocabulary"))?;

        let role = role_for(TECHNICAL_ROLES, industry, technical)
            .or_else(|| role_for(SOFT_ROLES, industry, soft))
            .unwrap_or(GENERIC_ROLE);

        Ok(role.to_string())
    }

    fn backend(&self) -> &'static str {
        "rules"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

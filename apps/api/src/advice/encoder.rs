use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::advice::artifact::{read_artifact, ArtifactError};

/// Raised when a category string was not part of the encoder's training vocabulary.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Unknown industry label '{label}'")]
pub struct UnknownLabelError {
    pub label: String,
}

#[derive(Debug, Deserialize)]
struct EncoderArtifact {
    classes: Vec<String>,
}

/// Fixed category → integer id mapping. The id of a class is its position in
/// the trained `classes` list.
#[derive(Debug, Clone)]
pub struct LabelEncoder {
    classes: Vec<String>,
    index: HashMap<String, u32>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> Result<Self, ArtifactError> {
        if classes.is_empty() {
            return Err(ArtifactError::Invalid(
                "label encoder has no classes".to_string(),
            ));
        }

        let mut index = HashMap::with_capacity(classes.len());
        for (id, class) in classes.iter().enumerate() {
            if index.insert(class.clone(), id as u32).is_some() {
                return Err(ArtifactError::Invalid(format!(
                    "label encoder class '{class}' appears more than once"
                )));
            }
        }

        Ok(Self { classes, index })
    }

    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let artifact: EncoderArtifact = read_artifact(path)?;
        Self::new(artifact.classes)
    }

    pub fn transform(&self, label: &str) -> Result<u32, UnknownLabelError> {
        self.index
            .get(label)
            .copied()
            .ok_or_else(|| UnknownLabelError {
                label: label.to_string(),
            })
    }

    pub fn inverse_transform(&self, id: u32) -> Option<&str> {
        self.classes.get(id as usize).map(String::as_str)
    }
}

use std::fmt::Display;

use serde::{Deserialize, Serialize};

fn default_kind() -> String {
    "jar".to_string()
}

/// A published or requested artifact of a module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArtifactCoordinate {
    pub name: String,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
}

impl ArtifactCoordinate {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        ArtifactCoordinate {
            name: name.into(),
            kind: kind.into(),
            extension: None,
            classifier: None,
        }
    }

    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }

    /// The file extension, defaulting to the artifact type.
    pub fn extension(&self) -> &str {
        self.extension.as_deref().unwrap_or(&self.kind)
    }
}

impl Display for ArtifactCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.classifier {
            Some(classifier) => write!(f, "{}-{}.{}", self.name, classifier, self.extension()),
            None => write!(f, "{}.{}", self.name, self.extension()),
        }
    }
}

use serde::{Deserialize, Serialize};

use crate::models::{FieldSpec, Resource};

static ALGORITHM_SCHEMA: [FieldSpec; 3] = [
    FieldSpec::text("title", "Algorithm Title"),
    FieldSpec::text_area("description", "Algorithm Description"),
    FieldSpec::text("githubLink", "GitHub Link"),
];

/// Same shape as `Project`, stored in its own collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Algorithm {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub github_link: String,
}

impl Resource for Algorithm {
    const COLLECTION: &'static str = "algorithms";
    const LABEL: &'static str = "Algorithm";

    fn schema() -> &'static [FieldSpec] {
        &ALGORITHM_SCHEMA
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn text(&self, field: &str) -> Option<&str> {
        match field {
            "title" => Some(&self.title),
            "description" => Some(&self.description),
            "githubLink" => Some(&self.github_link),
            _ => None,
        }
    }

    fn text_mut(&mut self, field: &str) -> Option<&mut String> {
        match field {
            "title" => Some(&mut self.title),
            "description" => Some(&mut self.description),
            "githubLink" => Some(&mut self.github_link),
            _ => None,
        }
    }

    fn details(&self) -> Vec<String> {
        vec![self.description.clone(), format!("GitHub: {}", self.github_link)]
    }
}

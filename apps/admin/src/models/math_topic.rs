use serde::{Deserialize, Serialize};

use crate::models::{FieldSpec, Resource};

static MATH_TOPIC_SCHEMA: [FieldSpec; 4] = [
    FieldSpec::text("title", "Topic Title"),
    FieldSpec::text_area("description", "Topic Description"),
    FieldSpec::list("equations", "Equation"),
    FieldSpec::list("applications", "Application"),
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MathTopic {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub equations: Vec<String>,
    pub applications: Vec<String>,
}

impl Resource for MathTopic {
    const COLLECTION: &'static str = "math-topics";
    const LABEL: &'static str = "Math Topic";

    fn schema() -> &'static [FieldSpec] {
        &MATH_TOPIC_SCHEMA
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
            _ => None,
        }
    }

    fn text_mut(&mut self, field: &str) -> Option<&mut String> {
        match field {
            "title" => Some(&mut self.title),
            "description" => Some(&mut self.description),
            _ => None,
        }
    }

    fn entries(&self, field: &str) -> Option<&Vec<String>> {
        match field {
            "equations" => Some(&self.equations),
            "applications" => Some(&self.applications),
            _ => None,
        }
    }

    fn entries_mut(&mut self, field: &str) -> Option<&mut Vec<String>> {
        match field {
            "equations" => Some(&mut self.equations),
            "applications" => Some(&mut self.applications),
            _ => None,
        }
    }

    fn details(&self) -> Vec<String> {
        let mut lines = vec![self.description.clone()];
        if !self.equations.is_empty() {
            lines.push("Equations:".to_string());
            lines.extend(self.equations.iter().map(|eq| format!("  • {eq}")));
        }
        if !self.applications.is_empty() {
            lines.push("Applications:".to_string());
            lines.extend(self.applications.iter().map(|app| format!("  • {app}")));
        }
        lines
    }
}

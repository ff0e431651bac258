use serde::{Deserialize, Serialize};

use crate::models::{FieldSpec, Resource};

static PROJECT_SCHEMA: [FieldSpec; 3] = [
    FieldSpec::text("title", "Project Title"),
    FieldSpec::text_area("description", "Project Description"),
    FieldSpec::text("githubLink", "GitHub Link"),
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub github_link: String,
}

impl Resource for Project {
    const COLLECTION: &'static str = "projects";
    const LABEL: &'static str = "Project";

    fn schema() -> &'static [FieldSpec] {
        &PROJECT_SCHEMA
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

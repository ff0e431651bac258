use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata for the single stored resume file, as returned by
/// `GET /resume/current`. Unknown fields are kept verbatim for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeInfo {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResumeInfo {
    /// The backend answers with an object even when nothing is stored; a
    /// response carrying neither an id nor a filename means "no resume".
    pub fn is_present(&self) -> bool {
        self.id.is_some() || self.filename.is_some()
    }

    pub fn summary(&self) -> String {
        let name = self.filename.as_deref().unwrap_or("(unnamed file)");
        match &self.upload_date {
            Some(date) => format!("{name} (uploaded {date})"),
            None => name.to_string(),
        }
    }
}

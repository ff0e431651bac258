pub mod algorithm;
pub mod math_topic;
pub mod project;
pub mod resume;

use serde::{de::DeserializeOwned, Serialize};

pub use algorithm::Algorithm;
pub use math_topic::MathTopic;
pub use project::Project;
pub use resume::ResumeInfo;

/// How a form field is edited and validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Single-line text input.
    Text,
    /// Multi-line text input.
    TextArea,
    /// Ordered list of single-line entries, each independently editable.
    List,
}

/// One entry of a resource's field-schema descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name as typed on the console and sent on the wire.
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn text(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Text,
            required: true,
        }
    }

    pub const fn text_area(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::TextArea,
            required: true,
        }
    }

    pub const fn list(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::List,
            required: true,
        }
    }
}

/// A record kept in one of the backend's managed collections.
///
/// The generic form and the HTTP facade only ever see records through this
/// trait: the schema drives editing and validation, the accessors expose
/// field values by schema name, and `COLLECTION` names the REST path.
pub trait Resource:
    Clone + Default + std::fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Path segment under the base URL, e.g. `projects`.
    const COLLECTION: &'static str;
    /// Singular human name, e.g. `Project`.
    const LABEL: &'static str;

    fn schema() -> &'static [FieldSpec];

    /// Backend-assigned id; `None` until persisted.
    fn id(&self) -> Option<&str>;

    fn title(&self) -> &str;

    fn text(&self, field: &str) -> Option<&str>;

    fn text_mut(&mut self, field: &str) -> Option<&mut String>;

    fn entries(&self, _field: &str) -> Option<&Vec<String>> {
        None
    }

    fn entries_mut(&mut self, _field: &str) -> Option<&mut Vec<String>> {
        None
    }

    /// Extra lines shown under the title when the record is listed.
    fn details(&self) -> Vec<String>;

    fn field(name: &str) -> Option<&'static FieldSpec> {
        Self::schema().iter().find(|f| f.name == name)
    }
}

//! Generic resource form: one implementation for every managed collection,
//! driven by the resource's field-schema descriptor.
//!
//! State machine:
//! - `Idle(draft)` → field edit → `Idle(draft')`
//! - `Idle(draft)` → `begin_submit` → `Submitting`
//! - `Submitting` → `finish_submit(true)` → `Idle(empty)`
//! - `Submitting` → `finish_submit(false)` → `Idle(draft)` unchanged
//!
//! Deleting a listed record is two-step: `request_delete` opens a
//! confirmation, `confirm_delete` hands back the id, `cancel_delete` closes it.

pub mod render;

use std::future::Future;

use tracing::debug;

use crate::errors::AdminError;
use crate::models::{FieldKind, FieldSpec, Resource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Submitting,
}

/// An open delete confirmation for one persisted record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub id: String,
    pub title: String,
}

#[derive(Debug)]
pub struct ResourceForm<R: Resource> {
    draft: R,
    state: FormState,
    pending_delete: Option<PendingDelete>,
}

impl<R: Resource> Default for ResourceForm<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Resource> ResourceForm<R> {
    pub fn new() -> Self {
        Self {
            draft: R::default(),
            state: FormState::Idle,
            pending_delete: None,
        }
    }

    pub fn draft(&self) -> &R {
        &self.draft
    }

    #[cfg(test)]
    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn pending_delete(&self) -> Option<&PendingDelete> {
        self.pending_delete.as_ref()
    }

    fn spec(field: &str) -> Result<&'static FieldSpec, AdminError> {
        R::field(field).ok_or_else(|| AdminError::UnknownField(field.to_string()))
    }

    fn list_spec(field: &str) -> Result<&'static FieldSpec, AdminError> {
        let spec = Self::spec(field)?;
        if spec.kind != FieldKind::List {
            return Err(AdminError::Validation(format!(
                "'{field}' is not a list field"
            )));
        }
        Ok(spec)
    }

    /// Replaces the value of a text field.
    pub fn set_field(&mut self, field: &str, value: &str) -> Result<(), AdminError> {
        let spec = Self::spec(field)?;
        if spec.kind == FieldKind::List {
            return Err(AdminError::Validation(format!(
                "'{field}' is a list field; edit its entries by index"
            )));
        }
        let slot = self
            .draft
            .text_mut(field)
            .ok_or_else(|| AdminError::UnknownField(field.to_string()))?;
        *slot = value.to_string();
        Ok(())
    }

    /// Entries as rendered: never fewer than one slot, so an empty list
    /// still offers an input target at index 0.
    pub fn display_entries(&self, field: &str) -> Vec<String> {
        match self.draft.entries(field) {
            Some(entries) if !entries.is_empty() => entries.clone(),
            _ => vec![String::new()],
        }
    }

    /// Writes entry `index` of a list field. Index 0 of an empty list
    /// addresses the always-rendered slot and materialises it.
    pub fn set_entry(&mut self, field: &str, index: usize, value: &str) -> Result<(), AdminError> {
        Self::list_spec(field)?;
        let entries = self
            .draft
            .entries_mut(field)
            .ok_or_else(|| AdminError::UnknownField(field.to_string()))?;
        if entries.is_empty() && index == 0 {
            entries.push(String::new());
        }
        let slot = entries.get_mut(index).ok_or_else(|| {
            AdminError::Validation(format!("'{field}' has no entry {index}"))
        })?;
        *slot = value.to_string();
        Ok(())
    }

    /// Appends an empty entry. Returns the new entry's index.
    pub fn add_entry(&mut self, field: &str) -> Result<usize, AdminError> {
        Self::list_spec(field)?;
        let entries = self
            .draft
            .entries_mut(field)
            .ok_or_else(|| AdminError::UnknownField(field.to_string()))?;
        // The implicit display slot becomes a real entry before the new one.
        if entries.is_empty() {
            entries.push(String::new());
        }
        entries.push(String::new());
        Ok(entries.len() - 1)
    }

    /// Removes entry `index`, keeping the relative order of the rest.
    pub fn remove_entry(&mut self, field: &str, index: usize) -> Result<(), AdminError> {
        Self::list_spec(field)?;
        let entries = self
            .draft
            .entries_mut(field)
            .ok_or_else(|| AdminError::UnknownField(field.to_string()))?;
        if index >= entries.len() {
            return Err(AdminError::Validation(format!(
                "'{field}' has no entry {index}"
            )));
        }
        entries.remove(index);
        Ok(())
    }

    /// Every required input must be non-empty, as a browser enforces
    /// `required`: an empty string fails, whitespace does not. For list
    /// fields each rendered entry is an input, including the single slot
    /// shown for an empty list.
    pub fn validate(&self) -> Result<(), AdminError> {
        for spec in R::schema().iter().filter(|f| f.required) {
            match spec.kind {
                FieldKind::Text | FieldKind::TextArea => {
                    if self.draft.text(spec.name).map_or(true, str::is_empty) {
                        return Err(AdminError::Validation(format!("{} is required", spec.label)));
                    }
                }
                FieldKind::List => {
                    let entries = self.display_entries(spec.name);
                    if let Some(i) = entries.iter().position(String::is_empty) {
                        return Err(AdminError::Validation(format!(
                            "{} {i} is required",
                            spec.label
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// The draft as it is handed to the submit callback: blank list entries
    /// (empty after trimming) are dropped, order of the rest preserved.
    pub fn normalized(&self) -> R {
        let mut record = self.draft.clone();
        for spec in R::schema().iter().filter(|f| f.kind == FieldKind::List) {
            if let Some(entries) = record.entries_mut(spec.name) {
                entries.retain(|e| !e.trim().is_empty());
            }
        }
        record
    }

    /// Validates, locks the form and returns the normalized record.
    /// A second call before `finish_submit` is rejected.
    pub fn begin_submit(&mut self) -> Result<R, AdminError> {
        if self.state == FormState::Submitting {
            return Err(AdminError::SubmitInFlight);
        }
        self.validate()?;
        self.state = FormState::Submitting;
        Ok(self.normalized())
    }

    /// Unlocks the form. On success the draft resets to its empty shape;
    /// on failure it is kept so the user can retry.
    pub fn finish_submit(&mut self, succeeded: bool) {
        self.state = FormState::Idle;
        if succeeded {
            debug!("{} draft reset after submit", R::LABEL);
            self.draft = R::default();
        }
    }

    /// Runs a full submission through `on_submit`.
    pub async fn submit<F, Fut, T>(&mut self, on_submit: F) -> Result<T, AdminError>
    where
        F: FnOnce(R) -> Fut,
        Fut: Future<Output = Result<T, AdminError>>,
    {
        let record = self.begin_submit()?;
        let result = on_submit(record).await;
        self.finish_submit(result.is_ok());
        result
    }

    /// Opens the delete confirmation for the record at 1-based `position`.
    /// Records the backend has not assigned an id to cannot be deleted.
    pub fn request_delete(&mut self, records: &[R], position: usize) -> Result<(), AdminError> {
        let record = position
            .checked_sub(1)
            .and_then(|i| records.get(i))
            .ok_or_else(|| {
                AdminError::Validation(format!("No {} at position {position}", R::LABEL))
            })?;
        let id = record.id().ok_or_else(|| {
            AdminError::Validation(format!("\"{}\" has not been saved yet", record.title()))
        })?;
        self.pending_delete = Some(PendingDelete {
            id: id.to_string(),
            title: record.title().to_string(),
        });
        Ok(())
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Closes the confirmation and returns the id to delete.
    pub fn confirm_delete(&mut self) -> Result<PendingDelete, AdminError> {
        self.pending_delete.take().ok_or(AdminError::NoConfirmation)
    }
}

/// Draft-editing operations that do not depend on the record type, so the
/// controller can route console edits to whichever form is active.
pub trait DraftEditor {
    fn set_field(&mut self, field: &str, value: &str) -> Result<(), AdminError>;
    fn set_entry(&mut self, field: &str, index: usize, value: &str) -> Result<(), AdminError>;
    fn add_entry(&mut self, field: &str) -> Result<usize, AdminError>;
    fn remove_entry(&mut self, field: &str, index: usize) -> Result<(), AdminError>;
    fn cancel_delete(&mut self);
}

impl<R: Resource> DraftEditor for ResourceForm<R> {
    fn set_field(&mut self, field: &str, value: &str) -> Result<(), AdminError> {
        ResourceForm::set_field(self, field, value)
    }

    fn set_entry(&mut self, field: &str, index: usize, value: &str) -> Result<(), AdminError> {
        ResourceForm::set_entry(self, field, index, value)
    }

    fn add_entry(&mut self, field: &str) -> Result<usize, AdminError> {
        ResourceForm::add_entry(self, field)
    }

    fn remove_entry(&mut self, field: &str, index: usize) -> Result<(), AdminError> {
        ResourceForm::remove_entry(self, field, index)
    }

    fn cancel_delete(&mut self) {
        ResourceForm::cancel_delete(self)
    }
}

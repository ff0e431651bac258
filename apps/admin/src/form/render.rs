use crate::form::ResourceForm;
use crate::models::{FieldKind, Resource};

/// Plural heading for a resource list, e.g. `Existing Math Topics`.
fn plural(label: &str) -> String {
    format!("{label}s")
}

impl<R: Resource> ResourceForm<R> {
    /// Renders the draft, the existing records and any open confirmation.
    /// Listed records are numbered from 1; those positions feed `delete`.
    pub fn render(&self, records: &[R]) -> String {
        let mut out = format!("── New {} ──\n", R::LABEL);

        for spec in R::schema() {
            match spec.kind {
                FieldKind::Text | FieldKind::TextArea => {
                    let value = self.draft().text(spec.name).unwrap_or_default();
                    out.push_str(&format!("{} [{}]: {}\n", spec.label, spec.name, value));
                }
                FieldKind::List => {
                    out.push_str(&format!("{}s [{}]:\n", spec.label, spec.name));
                    for (i, entry) in self.display_entries(spec.name).iter().enumerate() {
                        out.push_str(&format!("  {i}: {entry}\n"));
                    }
                }
            }
        }

        out.push_str(&format!("\n── Existing {} ──\n", plural(R::LABEL)));
        if records.is_empty() {
            out.push_str("(none)\n");
        }
        for (i, record) in records.iter().enumerate() {
            let marker = if record.id().is_some() { "" } else { " (unsaved)" };
            out.push_str(&format!("{}. {}{}\n", i + 1, record.title(), marker));
            for line in record.details() {
                out.push_str(&format!("   {line}\n"));
            }
        }

        if let Some(pending) = self.pending_delete() {
            out.push_str(&format!(
                "\nDelete {}: Are you sure you want to delete \"{}\"? This action cannot be undone. (confirm / cancel)\n",
                R::LABEL,
                pending.title
            ));
        }

        out
    }
}

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use bytes::Bytes;
use tracing::info;

use crate::api_client::PortfolioApi;
use crate::errors::AdminError;
use crate::models::ResumeInfo;

/// Upload/delete/download view over the single stored resume file.
pub struct ResumeUploader<A: PortfolioApi> {
    api: Arc<A>,
    current: Option<ResumeInfo>,
}

impl<A: PortfolioApi> ResumeUploader<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api, current: None }
    }

    #[cfg(test)]
    pub fn current(&self) -> Option<&ResumeInfo> {
        self.current.as_ref()
    }

    /// Re-reads the stored resume's metadata.
    pub async fn refresh(&mut self) -> Result<Option<&ResumeInfo>, AdminError> {
        self.current = self.api.current_resume().await?;
        Ok(self.current.as_ref())
    }

    /// Uploads the file at `path` and returns the backend's message.
    pub async fn upload(&mut self, path: &Path) -> Result<String, AdminError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| AdminError::Validation(format!("{} is not a file", path.display())))?
            .to_string();
        let contents = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if contents.is_empty() {
            return Err(AdminError::Validation(format!("{file_name} is empty")));
        }

        let reply = self
            .api
            .upload_resume(&file_name, Bytes::from(contents))
            .await?;
        info!("Uploaded resume {file_name}");
        self.refresh().await?;
        Ok(message_of(&reply, "Resume uploaded successfully!"))
    }

    pub async fn delete(&mut self) -> Result<String, AdminError> {
        let reply = self.api.delete_resume().await?;
        self.current = None;
        info!("Deleted stored resume");
        Ok(message_of(&reply, "Resume deleted successfully!"))
    }

    /// Saves the stored resume to `dest`; returns the number of bytes written.
    pub async fn download(&self, dest: &Path) -> Result<usize, AdminError> {
        let bytes = self.api.download_resume().await?;
        tokio::fs::write(dest, &bytes)
            .await
            .with_context(|| format!("Failed to write {}", dest.display()))?;
        Ok(bytes.len())
    }

    pub fn download_url(&self) -> String {
        self.api.resume_download_url()
    }

    pub fn render(&self) -> String {
        let mut out = String::from("── Resume ──\n");
        match &self.current {
            Some(info) => out.push_str(&format!("Current: {}\n", info.summary())),
            None => out.push_str("No resume uploaded.\n"),
        }
        out.push_str(&format!("Download: {}\n", self.download_url()));
        out
    }
}

fn message_of(reply: &serde_json::Value, fallback: &str) -> String {
    reply
        .get("message")
        .and_then(|m| m.as_str())
        .unwrap_or(fallback)
        .to_string()
}

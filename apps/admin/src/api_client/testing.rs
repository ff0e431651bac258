//! In-memory stand-in for the portfolio backend, used by controller and
//! resume uploader tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::{json, Value};

use crate::api_client::{ApiError, PortfolioApi};
use crate::models::{Resource, ResumeInfo};

#[derive(Default)]
pub struct InMemoryBackend {
    collections: Mutex<HashMap<&'static str, Vec<Value>>>,
    resume: Mutex<Option<(String, Bytes)>>,
    /// Every call as `METHOD /path`, in order.
    pub calls: Mutex<Vec<String>>,
    /// JSON bodies of create calls, in order.
    pub bodies: Mutex<Vec<Value>>,
    pub fail_lists: AtomicBool,
    /// Fails only the list call for this collection.
    failing_list: Mutex<Option<&'static str>>,
    pub fail_creates: AtomicBool,
    pub fail_deletes: AtomicBool,
    pub reject_deletes: AtomicBool,
    next_id: AtomicU32,
}

impl InMemoryBackend {
    pub fn seed<R: Resource>(&self, records: &[R]) {
        let values = records
            .iter()
            .map(|r| serde_json::to_value(r).unwrap())
            .collect();
        self.collections
            .lock()
            .unwrap()
            .insert(R::COLLECTION, values);
    }

    pub fn fail_list_of(&self, collection: Option<&'static str>) {
        *self.failing_list.lock().unwrap() = collection;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn unreachable() -> ApiError {
        ApiError::Api {
            status: 503,
            message: "backend unreachable".to_string(),
        }
    }
}

#[async_trait]
impl PortfolioApi for InMemoryBackend {
    async fn list<R: Resource>(&self) -> Result<Vec<R>, ApiError> {
        self.record(format!("GET /{}", R::COLLECTION));
        if self.fail_lists.load(Ordering::SeqCst)
            || *self.failing_list.lock().unwrap() == Some(R::COLLECTION)
        {
            return Err(Self::unreachable());
        }
        let values = self
            .collections
            .lock()
            .unwrap()
            .get(R::COLLECTION)
            .cloned()
            .unwrap_or_default();
        Ok(serde_json::from_value(Value::Array(values))?)
    }

    async fn create<R: Resource>(&self, draft: &R) -> Result<Value, ApiError> {
        self.record(format!("POST /{}", R::COLLECTION));
        let body = serde_json::to_value(draft)?;
        self.bodies.lock().unwrap().push(body.clone());
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(Self::unreachable());
        }
        let mut created = body;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        created["_id"] = json!(format!("gen-{id}"));
        self.collections
            .lock()
            .unwrap()
            .entry(R::COLLECTION)
            .or_default()
            .push(created.clone());
        Ok(created)
    }

    async fn delete<R: Resource>(&self, id: &str) -> Result<bool, ApiError> {
        self.record(format!("DELETE /{}/{}", R::COLLECTION, id));
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(Self::unreachable());
        }
        if self.reject_deletes.load(Ordering::SeqCst) {
            return Ok(false);
        }
        let mut collections = self.collections.lock().unwrap();
        let records = collections.entry(R::COLLECTION).or_default();
        let before = records.len();
        records.retain(|r| r["_id"] != json!(id));
        Ok(records.len() != before)
    }

    async fn current_resume(&self) -> Result<Option<ResumeInfo>, ApiError> {
        self.record("GET /resume/current".to_string());
        Ok(self.resume.lock().unwrap().as_ref().map(|(name, _)| ResumeInfo {
            id: Some("resume-1".to_string()),
            filename: Some(name.clone()),
            ..Default::default()
        }))
    }

    async fn upload_resume(&self, file_name: &str, contents: Bytes) -> Result<Value, ApiError> {
        self.record("POST /resume/upload".to_string());
        *self.resume.lock().unwrap() = Some((file_name.to_string(), contents));
        Ok(json!({"message": "Resume uploaded successfully"}))
    }

    async fn delete_resume(&self) -> Result<Value, ApiError> {
        self.record("DELETE /resume/current".to_string());
        match self.resume.lock().unwrap().take() {
            Some(_) => Ok(json!({"message": "Resume deleted successfully"})),
            None => Err(ApiError::Api {
                status: 404,
                message: "No resume found".to_string(),
            }),
        }
    }

    async fn download_resume(&self) -> Result<Bytes, ApiError> {
        self.record("GET /resume/download".to_string());
        self.resume
            .lock()
            .unwrap()
            .as_ref()
            .map(|(_, bytes)| bytes.clone())
            .ok_or(ApiError::Api {
                status: 404,
                message: "No resume found".to_string(),
            })
    }

    fn resume_download_url(&self) -> String {
        "memory://resume/download".to_string()
    }
}

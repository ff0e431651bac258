//! Admin page controller: session, category routing and list synchronisation.
//!
//! Lists are never patched locally. Every successful create or delete
//! re-fetches all three collections, so what is shown is always the last
//! snapshot the backend returned.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::api_client::PortfolioApi;
use crate::auth::Authenticator;
use crate::errors::AdminError;
use crate::form::{DraftEditor, ResourceForm};
use crate::models::{Algorithm, MathTopic, Project, Resource};
use crate::resume::ResumeUploader;
use crate::storage::{SessionStore, AUTH_FLAG_KEY};

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const SUBMIT_FAILED: &str = "Failed to submit. Please try again.";
const DELETE_FAILED: &str = "Failed to delete. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    LoggedOut,
    LoggedIn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Projects,
    Mathematics,
    Algorithms,
    Resume,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Projects,
        Category::Mathematics,
        Category::Algorithms,
        Category::Resume,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Projects => "projects",
            Category::Mathematics => "mathematics",
            Category::Algorithms => "algorithms",
            Category::Resume => "resume",
        }
    }

    /// Capitalised name used in notices, e.g. `Mathematics`.
    pub fn title(&self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AdminError::Validation(format!("Unknown category '{s}'")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A blocking, user-facing message (the console prints these prominently).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Where the front end should go after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Home,
}

impl Navigation {
    pub fn route(&self) -> &'static str {
        match self {
            Navigation::Home => "/",
        }
    }
}

pub struct AdminController<A: PortfolioApi> {
    api: Arc<A>,
    auth: Arc<dyn Authenticator>,
    store: Arc<dyn SessionStore>,
    auth_state: AuthState,
    login_error: Option<String>,
    category: Category,
    projects: Vec<Project>,
    math_topics: Vec<MathTopic>,
    algorithms: Vec<Algorithm>,
    project_form: ResourceForm<Project>,
    math_topic_form: ResourceForm<MathTopic>,
    algorithm_form: ResourceForm<Algorithm>,
    resume: ResumeUploader<A>,
    notices: Vec<Notice>,
}

impl<A: PortfolioApi> AdminController<A> {
    pub fn new(api: Arc<A>, auth: Arc<dyn Authenticator>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            resume: ResumeUploader::new(api.clone()),
            api,
            auth,
            store,
            auth_state: AuthState::LoggedOut,
            login_error: None,
            category: Category::Projects,
            projects: Vec::new(),
            math_topics: Vec::new(),
            algorithms: Vec::new(),
            project_form: ResourceForm::new(),
            math_topic_form: ResourceForm::new(),
            algorithm_form: ResourceForm::new(),
            notices: Vec::new(),
        }
    }

    // ── Accessors ──────────────────────────────────────────────────────────

    pub fn auth_state(&self) -> AuthState {
        self.auth_state
    }

    #[cfg(test)]
    pub fn login_error(&self) -> Option<&str> {
        self.login_error.as_deref()
    }

    pub fn category(&self) -> Category {
        self.category
    }

    #[cfg(test)]
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    #[cfg(test)]
    pub fn math_topics(&self) -> &[MathTopic] {
        &self.math_topics
    }

    #[cfg(test)]
    pub fn algorithms(&self) -> &[Algorithm] {
        &self.algorithms
    }

    #[cfg(test)]
    pub fn project_form(&self) -> &ResourceForm<Project> {
        &self.project_form
    }

    #[cfg(test)]
    pub fn math_topic_form(&self) -> &ResourceForm<MathTopic> {
        &self.math_topic_form
    }

    #[cfg(test)]
    pub fn algorithm_form(&self) -> &ResourceForm<Algorithm> {
        &self.algorithm_form
    }

    /// Drains the notices raised since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push(Notice {
            level,
            message: message.into(),
        });
    }

    fn require_login(&self) -> Result<(), AdminError> {
        match self.auth_state {
            AuthState::LoggedIn => Ok(()),
            AuthState::LoggedOut => Err(AdminError::NotAuthenticated),
        }
    }

    // ── Session ────────────────────────────────────────────────────────────

    /// Startup: a stored flag of exactly `"true"` resumes the session and
    /// loads all lists. Anything else leaves the controller logged out.
    pub async fn restore(&mut self) -> Result<AuthState, AdminError> {
        let flag = self.store.get(AUTH_FLAG_KEY)?;
        if flag.as_deref() == Some("true") {
            info!("Resuming stored admin session");
            self.auth_state = AuthState::LoggedIn;
            self.refresh().await;
        } else {
            self.auth_state = AuthState::LoggedOut;
        }
        Ok(self.auth_state)
    }

    /// Returns whether the credentials were accepted. A rejection is not an
    /// error: it leaves the controller logged out with `login_error` set.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<bool, AdminError> {
        if !self.auth.verify(username, password).await? {
            warn!("Rejected admin login for '{username}'");
            self.login_error = Some(INVALID_CREDENTIALS.to_string());
            return Ok(false);
        }

        self.store.set(AUTH_FLAG_KEY, "true")?;
        self.auth_state = AuthState::LoggedIn;
        self.login_error = None;
        info!("Admin '{username}' logged in");
        self.refresh().await;
        Ok(true)
    }

    /// Ends the session. Everything the dashboard held is discarded: lists,
    /// drafts, open delete confirmations and the selected category.
    pub fn logout(&mut self) -> Result<Navigation, AdminError> {
        self.store.remove(AUTH_FLAG_KEY)?;
        self.auth_state = AuthState::LoggedOut;
        self.login_error = None;
        self.category = Category::Projects;
        self.projects.clear();
        self.math_topics.clear();
        self.algorithms.clear();
        self.project_form = ResourceForm::new();
        self.math_topic_form = ResourceForm::new();
        self.algorithm_form = ResourceForm::new();
        self.resume = ResumeUploader::new(self.api.clone());
        info!("Admin logged out");
        Ok(Navigation::Home)
    }

    // ── Navigation and lists ───────────────────────────────────────────────

    pub async fn select_category(&mut self, category: Category) -> Result<(), AdminError> {
        self.require_login()?;
        self.category = category;
        if category == Category::Resume {
            if let Err(e) = self.resume.refresh().await {
                error!("Error fetching resume: {e}");
            }
        }
        Ok(())
    }

    /// Fetches all three collections concurrently. Lists are replaced only
    /// if every fetch succeeds; a failure is logged and prior state is kept.
    pub async fn refresh(&mut self) -> bool {
        let api = &*self.api;
        let fetched = tokio::try_join!(
            api.list::<Project>(),
            api.list::<MathTopic>(),
            api.list::<Algorithm>(),
        );
        match fetched {
            Ok((projects, math_topics, algorithms)) => {
                self.projects = projects;
                self.math_topics = math_topics;
                self.algorithms = algorithms;
                true
            }
            Err(e) => {
                error!("Error fetching data: {e}");
                false
            }
        }
    }

    // ── Draft editing ──────────────────────────────────────────────────────

    fn active_editor(&mut self) -> Result<&mut dyn DraftEditor, AdminError> {
        self.require_login()?;
        match self.category {
            Category::Projects => Ok(&mut self.project_form),
            Category::Mathematics => Ok(&mut self.math_topic_form),
            Category::Algorithms => Ok(&mut self.algorithm_form),
            Category::Resume => Err(AdminError::UnsupportedCategory(
                self.category.to_string(),
            )),
        }
    }

    pub fn set_field(&mut self, field: &str, value: &str) -> Result<(), AdminError> {
        self.active_editor()?.set_field(field, value)
    }

    pub fn set_entry(&mut self, field: &str, index: usize, value: &str) -> Result<(), AdminError> {
        self.active_editor()?.set_entry(field, index, value)
    }

    pub fn add_entry(&mut self, field: &str) -> Result<usize, AdminError> {
        self.active_editor()?.add_entry(field)
    }

    pub fn remove_entry(&mut self, field: &str, index: usize) -> Result<(), AdminError> {
        self.active_editor()?.remove_entry(field, index)
    }

    // ── Mutations ──────────────────────────────────────────────────────────

    /// Submits the active form's draft to its collection.
    ///
    /// On success the draft resets and all lists are re-fetched. A backend
    /// failure raises an error notice and is returned to the caller; the
    /// draft is kept either way.
    pub async fn submit(&mut self) -> Result<(), AdminError> {
        self.require_login()?;
        let api = &*self.api;
        let result = match self.category {
            Category::Projects => create_from(api, &mut self.project_form).await,
            Category::Mathematics => create_from(api, &mut self.math_topic_form).await,
            Category::Algorithms => create_from(api, &mut self.algorithm_form).await,
            Category::Resume => {
                return Err(AdminError::UnsupportedCategory(self.category.to_string()))
            }
        };

        match result {
            Ok(()) => {
                self.notify(
                    NoticeLevel::Info,
                    format!("{} added successfully!", self.category.title()),
                );
                self.refresh().await;
                Ok(())
            }
            Err(e) => {
                if e.is_transport() {
                    error!("Error submitting data: {e}");
                    self.notify(NoticeLevel::Error, SUBMIT_FAILED);
                }
                Err(e)
            }
        }
    }

    /// Step one of a delete: opens the confirmation for the record at
    /// 1-based `position` in the active list.
    pub fn request_delete(&mut self, position: usize) -> Result<(), AdminError> {
        self.require_login()?;
        match self.category {
            Category::Projects => self.project_form.request_delete(&self.projects, position),
            Category::Mathematics => self
                .math_topic_form
                .request_delete(&self.math_topics, position),
            Category::Algorithms => self
                .algorithm_form
                .request_delete(&self.algorithms, position),
            Category::Resume => Err(AdminError::UnsupportedCategory(self.category.to_string())),
        }
    }

    pub fn cancel_delete(&mut self) -> Result<(), AdminError> {
        self.active_editor()?.cancel_delete();
        Ok(())
    }

    /// Step two of a delete. Returns whether the backend confirmed it with
    /// `204 No Content`. Only a confirmed delete triggers a re-fetch; a
    /// refused one leaves the list exactly as it was.
    pub async fn confirm_delete(&mut self) -> Result<bool, AdminError> {
        self.require_login()?;
        let api = &*self.api;
        let result = match self.category {
            Category::Projects => delete_from(api, &mut self.project_form).await,
            Category::Mathematics => delete_from(api, &mut self.math_topic_form).await,
            Category::Algorithms => delete_from(api, &mut self.algorithm_form).await,
            Category::Resume => {
                return Err(AdminError::UnsupportedCategory(self.category.to_string()))
            }
        };

        match result {
            Ok(true) => {
                self.notify(
                    NoticeLevel::Info,
                    format!("{} deleted successfully!", self.category.title()),
                );
                self.refresh().await;
                Ok(true)
            }
            Ok(false) => {
                self.notify(NoticeLevel::Error, DELETE_FAILED);
                Ok(false)
            }
            Err(e) => {
                if e.is_transport() {
                    error!("Error deleting item: {e}");
                    self.notify(NoticeLevel::Error, DELETE_FAILED);
                }
                Err(e)
            }
        }
    }

    // ── Resume ─────────────────────────────────────────────────────────────

    pub async fn upload_resume(&mut self, path: &Path) -> Result<(), AdminError> {
        self.require_login()?;
        match self.resume.upload(path).await {
            Ok(message) => {
                self.notify(NoticeLevel::Info, message);
                Ok(())
            }
            Err(e) => {
                error!("Error uploading resume: {e}");
                self.notify(NoticeLevel::Error, "Failed to upload resume. Please try again.");
                Err(e)
            }
        }
    }

    pub async fn delete_resume(&mut self) -> Result<(), AdminError> {
        self.require_login()?;
        match self.resume.delete().await {
            Ok(message) => {
                self.notify(NoticeLevel::Info, message);
                Ok(())
            }
            Err(e) => {
                error!("Error deleting resume: {e}");
                self.notify(NoticeLevel::Error, "Failed to delete resume. Please try again.");
                Err(e)
            }
        }
    }

    pub async fn download_resume(&mut self, dest: &Path) -> Result<usize, AdminError> {
        self.require_login()?;
        self.resume.download(dest).await
    }

    pub fn resume_download_url(&self) -> Result<String, AdminError> {
        self.require_login()?;
        Ok(self.resume.download_url())
    }

    // ── Rendering ──────────────────────────────────────────────────────────

    pub fn render(&self) -> String {
        match self.auth_state {
            AuthState::LoggedOut => {
                let mut out = String::from("── Admin Login ──\nlogin <username> <password>\n");
                if let Some(err) = &self.login_error {
                    out.push_str(&format!("! {err}\n"));
                }
                out
            }
            AuthState::LoggedIn => {
                let tabs = Category::ALL
                    .iter()
                    .map(|c| {
                        if *c == self.category {
                            format!("[{}]", c.title())
                        } else {
                            c.title()
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("  ");
                let body = match self.category {
                    Category::Projects => self.project_form.render(&self.projects),
                    Category::Mathematics => self.math_topic_form.render(&self.math_topics),
                    Category::Algorithms => self.algorithm_form.render(&self.algorithms),
                    Category::Resume => self.resume.render(),
                };
                format!("══ Admin Dashboard ══\n{tabs}\n\n{body}")
            }
        }
    }
}

async fn create_from<A: PortfolioApi, R: Resource>(
    api: &A,
    form: &mut ResourceForm<R>,
) -> Result<(), AdminError> {
    form.submit(|record| async move {
        let created = api.create(&record).await?;
        info!("Created {} {}", R::LABEL, created.get("_id").unwrap_or(&created));
        Ok::<_, AdminError>(())
    })
    .await
}

async fn delete_from<A: PortfolioApi, R: Resource>(
    api: &A,
    form: &mut ResourceForm<R>,
) -> Result<bool, AdminError> {
    let pending = form.confirm_delete()?;
    let deleted = api.delete::<R>(&pending.id).await?;
    if deleted {
        info!("Deleted {} {}", R::LABEL, pending.id);
    } else {
        warn!("Backend refused to delete {} {}", R::LABEL, pending.id);
    }
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use serde_json::json;

    use super::*;
    use crate::api_client::testing::InMemoryBackend;
    use crate::auth::StaticCredentials;
    use crate::form::FormState;
    use crate::storage::MemorySessionStore;

    fn controller() -> (
        AdminController<InMemoryBackend>,
        Arc<InMemoryBackend>,
        Arc<MemorySessionStore>,
    ) {
        let api = Arc::new(InMemoryBackend::default());
        let store = Arc::new(MemorySessionStore::default());
        let auth = Arc::new(StaticCredentials::new("admin", "hunter2"));
        let ctl = AdminController::new(api.clone(), auth, store.clone());
        (ctl, api, store)
    }

    async fn logged_in() -> (AdminController<InMemoryBackend>, Arc<InMemoryBackend>) {
        let (mut ctl, api, _) = controller();
        assert!(ctl.login("admin", "hunter2").await.unwrap());
        api.clear_calls();
        (ctl, api)
    }

    fn topic(id: &str, title: &str) -> MathTopic {
        MathTopic {
            id: Some(id.into()),
            title: title.into(),
            description: "d".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_login_with_configured_pair_persists_flag_and_loads_lists() {
        let (mut ctl, api, store) = controller();
        api.seed(&[topic("1", "Algebra")]);

        assert!(ctl.login("admin", "hunter2").await.unwrap());

        assert_eq!(ctl.auth_state(), AuthState::LoggedIn);
        assert_eq!(ctl.login_error(), None);
        assert_eq!(store.get(AUTH_FLAG_KEY).unwrap().as_deref(), Some("true"));
        assert_eq!(ctl.math_topics().len(), 1);
        let mut calls = api.calls();
        calls.sort();
        assert_eq!(
            calls,
            vec!["GET /algorithms", "GET /math-topics", "GET /projects"]
        );
    }

    #[tokio::test]
    async fn test_wrong_credentials_stay_logged_out_with_error() {
        let (mut ctl, api, store) = controller();
        for (user, pass) in [("admin", "nope"), ("root", "hunter2"), ("", "")] {
            assert!(!ctl.login(user, pass).await.unwrap());
            assert_eq!(ctl.auth_state(), AuthState::LoggedOut);
            assert!(!ctl.login_error().unwrap_or_default().is_empty());
        }
        assert_eq!(store.get(AUTH_FLAG_KEY).unwrap(), None);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_restore_requires_exact_true_flag() {
        let (mut ctl, _, store) = controller();
        store.set(AUTH_FLAG_KEY, "yes").unwrap();
        assert_eq!(ctl.restore().await.unwrap(), AuthState::LoggedOut);

        store.set(AUTH_FLAG_KEY, "true").unwrap();
        assert_eq!(ctl.restore().await.unwrap(), AuthState::LoggedIn);
    }

    #[tokio::test]
    async fn test_logout_clears_flag_and_next_load_is_logged_out() {
        let (mut ctl, _, store) = controller();
        ctl.login("admin", "hunter2").await.unwrap();

        let nav = ctl.logout().unwrap();
        assert_eq!(nav.route(), "/");
        assert_eq!(ctl.auth_state(), AuthState::LoggedOut);
        assert_ne!(store.get(AUTH_FLAG_KEY).unwrap().as_deref(), Some("true"));

        let auth = Arc::new(StaticCredentials::new("admin", "hunter2"));
        let mut next = AdminController::new(Arc::new(InMemoryBackend::default()), auth, store);
        assert_eq!(next.restore().await.unwrap(), AuthState::LoggedOut);
        assert!(next.render().contains("Admin Login"));
    }

    #[tokio::test]
    async fn test_logout_discards_drafts_and_open_confirmation() {
        let (mut ctl, api, _) = controller();
        api.seed(&[Project {
            id: Some("p1".into()),
            title: "Compiler".into(),
            description: "Toy compiler".into(),
            github_link: "https://g/c".into(),
        }]);
        ctl.login("admin", "hunter2").await.unwrap();
        ctl.set_field("title", "half-typed draft").unwrap();
        ctl.request_delete(1).unwrap();
        ctl.select_category(Category::Mathematics).await.unwrap();
        ctl.set_field("title", "Topology").unwrap();

        ctl.logout().unwrap();
        ctl.login("admin", "hunter2").await.unwrap();
        api.clear_calls();

        assert_eq!(ctl.category(), Category::Projects);
        assert_eq!(ctl.project_form().draft(), &Project::default());
        assert!(ctl.project_form().pending_delete().is_none());
        assert_eq!(ctl.math_topic_form().draft(), &MathTopic::default());
        assert!(matches!(
            ctl.confirm_delete().await,
            Err(AdminError::NoConfirmation)
        ));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_logout_clears_previous_login_error() {
        let (mut ctl, _, _) = controller();
        assert!(!ctl.login("admin", "wrong").await.unwrap());
        assert!(ctl.login("admin", "hunter2").await.unwrap());
        ctl.logout().unwrap();
        assert_eq!(ctl.login_error(), None);
        assert!(!ctl.render().contains(INVALID_CREDENTIALS));
    }

    #[tokio::test]
    async fn test_operations_require_login() {
        let (mut ctl, api, _) = controller();
        assert!(matches!(
            ctl.select_category(Category::Algorithms).await,
            Err(AdminError::NotAuthenticated)
        ));
        assert!(matches!(ctl.submit().await, Err(AdminError::NotAuthenticated)));
        assert!(matches!(
            ctl.set_field("title", "x"),
            Err(AdminError::NotAuthenticated)
        ));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_project_submit_posts_then_refetches_and_resets_draft() {
        let (mut ctl, api) = logged_in().await;
        ctl.set_field("title", "A").unwrap();
        ctl.set_field("description", "B").unwrap();
        ctl.set_field("githubLink", "https://x").unwrap();

        ctl.submit().await.unwrap();

        let calls = api.calls();
        assert_eq!(calls[0], "POST /projects");
        let mut refetch = calls[1..].to_vec();
        refetch.sort();
        assert_eq!(
            refetch,
            vec!["GET /algorithms", "GET /math-topics", "GET /projects"]
        );
        assert_eq!(
            api.bodies.lock().unwrap()[0],
            json!({"title": "A", "description": "B", "githubLink": "https://x"})
        );
        assert_eq!(ctl.project_form().draft(), &Project::default());
        assert_eq!(ctl.projects().len(), 1);
        assert_eq!(ctl.projects()[0].id(), Some("gen-1"));
        assert_eq!(
            ctl.take_notices(),
            vec![Notice {
                level: NoticeLevel::Info,
                message: "Projects added successfully!".into()
            }]
        );
    }

    #[tokio::test]
    async fn test_math_topic_submit_strips_blank_entries() {
        let (mut ctl, api) = logged_in().await;
        ctl.select_category(Category::Mathematics).await.unwrap();
        ctl.set_field("title", "Linear Algebra").unwrap();
        ctl.set_field("description", "Vectors").unwrap();
        ctl.set_entry("equations", 0, "Ax = b").unwrap();
        let i = ctl.add_entry("equations").unwrap();
        ctl.set_entry("equations", i, "  ").unwrap();
        let i = ctl.add_entry("equations").unwrap();
        ctl.set_entry("equations", i, "det(A) ≠ 0").unwrap();
        ctl.set_entry("applications", 0, " ").unwrap();

        ctl.submit().await.unwrap();

        assert_eq!(
            api.bodies.lock().unwrap()[0],
            json!({
                "title": "Linear Algebra",
                "description": "Vectors",
                "equations": ["Ax = b", "det(A) ≠ 0"],
                "applications": []
            })
        );
        assert!(ctl.math_topic_form().draft().equations.is_empty());
    }

    #[tokio::test]
    async fn test_failed_submit_alerts_keeps_draft_and_skips_refetch() {
        let (mut ctl, api) = logged_in().await;
        ctl.select_category(Category::Algorithms).await.unwrap();
        ctl.set_field("title", "Dijkstra").unwrap();
        ctl.set_field("description", "Shortest paths").unwrap();
        ctl.set_field("githubLink", "https://g/d").unwrap();
        api.fail_creates.store(true, Ordering::SeqCst);

        let err = ctl.submit().await.unwrap_err();

        assert!(err.is_transport());
        assert_eq!(ctl.algorithm_form().draft().title, "Dijkstra");
        assert_eq!(ctl.algorithm_form().state(), FormState::Idle);
        assert_eq!(api.calls(), vec!["POST /algorithms"]);
        let notices = ctl.take_notices();
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert_eq!(notices[0].message, SUBMIT_FAILED);
    }

    #[tokio::test]
    async fn test_invalid_draft_never_hits_backend() {
        let (mut ctl, api) = logged_in().await;
        ctl.set_field("title", "Half done").unwrap();
        assert!(matches!(ctl.submit().await, Err(AdminError::Validation(_))));
        assert!(api.calls().is_empty());
        assert!(ctl.take_notices().is_empty());
    }

    #[tokio::test]
    async fn test_delete_after_confirm_hits_endpoint_and_refetches() {
        let (mut ctl, api, _) = controller();
        api.seed(&[topic("41", "Set Theory"), topic("42", "Topology")]);
        ctl.login("admin", "hunter2").await.unwrap();
        ctl.select_category(Category::Mathematics).await.unwrap();
        api.clear_calls();

        ctl.request_delete(2).unwrap();
        assert!(api.calls().is_empty());
        assert!(ctl.confirm_delete().await.unwrap());

        let calls = api.calls();
        assert_eq!(calls[0], "DELETE /math-topics/42");
        assert_eq!(calls.len(), 4);
        assert_eq!(ctl.math_topics().len(), 1);
        assert_eq!(ctl.math_topics()[0].id(), Some("41"));
        assert_eq!(ctl.take_notices()[0].message, "Mathematics deleted successfully!");
    }

    #[tokio::test]
    async fn test_refused_delete_returns_false_and_keeps_list() {
        let (mut ctl, api, _) = controller();
        api.seed(&[topic("42", "Topology")]);
        ctl.login("admin", "hunter2").await.unwrap();
        ctl.select_category(Category::Mathematics).await.unwrap();
        api.reject_deletes.store(true, Ordering::SeqCst);
        api.clear_calls();

        ctl.request_delete(1).unwrap();
        assert!(!ctl.confirm_delete().await.unwrap());

        assert_eq!(api.calls(), vec!["DELETE /math-topics/42"]);
        assert_eq!(ctl.math_topics().len(), 1);
        let notices = ctl.take_notices();
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert_eq!(notices[0].message, DELETE_FAILED);
    }

    #[tokio::test]
    async fn test_cancelled_delete_never_calls_backend() {
        let (mut ctl, api, _) = controller();
        api.seed(&[topic("42", "Topology")]);
        ctl.login("admin", "hunter2").await.unwrap();
        ctl.select_category(Category::Mathematics).await.unwrap();
        api.clear_calls();

        ctl.request_delete(1).unwrap();
        ctl.cancel_delete().unwrap();
        assert!(matches!(
            ctl.confirm_delete().await,
            Err(AdminError::NoConfirmation)
        ));

        assert!(api.calls().is_empty());
        assert_eq!(ctl.math_topics().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_lists_silently() {
        let (mut ctl, api, _) = controller();
        api.seed(&[topic("1", "Algebra")]);
        ctl.login("admin", "hunter2").await.unwrap();
        assert_eq!(ctl.math_topics().len(), 1);

        api.seed::<MathTopic>(&[]);
        api.fail_lists.store(true, Ordering::SeqCst);
        assert!(!ctl.refresh().await);

        assert_eq!(ctl.math_topics().len(), 1);
        assert!(ctl.take_notices().is_empty());
    }

    #[tokio::test]
    async fn test_one_failed_fetch_leaves_every_list_untouched() {
        let (mut ctl, api, _) = controller();
        api.seed(&[topic("1", "Algebra")]);
        api.seed(&[Project {
            id: Some("p1".into()),
            title: "Compiler".into(),
            ..Default::default()
        }]);
        ctl.login("admin", "hunter2").await.unwrap();

        api.seed(&[topic("1", "Algebra"), topic("2", "Geometry")]);
        api.seed::<Project>(&[]);
        api.fail_list_of(Some(Algorithm::COLLECTION));
        assert!(!ctl.refresh().await);

        assert_eq!(ctl.math_topics().len(), 1);
        assert_eq!(ctl.projects().len(), 1);
        assert!(ctl.take_notices().is_empty());

        api.fail_list_of(None);
        assert!(ctl.refresh().await);
        assert_eq!(ctl.math_topics().len(), 2);
        assert!(ctl.projects().is_empty());
    }

    #[tokio::test]
    async fn test_delete_transport_failure_alerts_and_propagates() {
        let (mut ctl, api, _) = controller();
        api.seed(&[topic("42", "Topology")]);
        ctl.login("admin", "hunter2").await.unwrap();
        ctl.select_category(Category::Mathematics).await.unwrap();
        api.fail_deletes.store(true, Ordering::SeqCst);
        api.clear_calls();

        ctl.request_delete(1).unwrap();
        let err = ctl.confirm_delete().await.unwrap_err();

        assert!(err.is_transport());
        assert_eq!(api.calls(), vec!["DELETE /math-topics/42"]);
        assert_eq!(ctl.math_topics().len(), 1);
        let notices = ctl.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert_eq!(notices[0].message, DELETE_FAILED);
    }

    #[tokio::test]
    async fn test_resume_category_rejects_form_actions() {
        let (mut ctl, api) = logged_in().await;
        ctl.select_category(Category::Resume).await.unwrap();
        assert_eq!(api.calls(), vec!["GET /resume/current"]);
        assert!(matches!(
            ctl.submit().await,
            Err(AdminError::UnsupportedCategory(_))
        ));
        assert!(ctl.set_field("title", "x").is_err());
        assert!(ctl.render().contains("── Resume ──"));
    }

    #[test]
    fn test_category_parsing_and_titles() {
        assert_eq!("Mathematics".parse::<Category>().unwrap(), Category::Mathematics);
        assert!("math".parse::<Category>().is_err());
        assert_eq!(Category::Projects.title(), "Projects");
    }
}

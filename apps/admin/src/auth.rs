//! Admin credential check — pluggable, trait-based.
//!
//! Default: `StaticCredentials`, comparing against the pair supplied by
//! configuration. A delegated identity service can implement `Authenticator`
//! without touching the controller.

use async_trait::async_trait;

use crate::errors::AdminError;

#[async_trait]
pub trait Authenticator: Send + Sync {
    /// `Ok(true)` when the pair is accepted, `Ok(false)` when rejected.
    /// `Err` is reserved for failures of the check itself.
    async fn verify(&self, username: &str, password: &str) -> Result<bool, AdminError>;
}

/// Accepts exactly one configured username/password pair.
pub struct StaticCredentials {
    username: String,
    password: String,
}

impl StaticCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

#[async_trait]
impl Authenticator for StaticCredentials {
    async fn verify(&self, username: &str, password: &str) -> Result<bool, AdminError> {
        // Evaluate both comparisons so a username mismatch costs the same as a password one.
        let user_ok = constant_time_eq(username.as_bytes(), self.username.as_bytes());
        let pass_ok = constant_time_eq(password.as_bytes(), self.password.as_bytes());
        Ok(user_ok & pass_ok)
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

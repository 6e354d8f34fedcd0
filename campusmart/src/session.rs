//! Signed-in user persistence.

use log::debug;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::models::{is_college_email, UserSession};
use crate::storage::{Storage, StorageExt, SESSION_KEY};

/// How long a login is remembered.
pub const SESSION_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Keeps the current user across restarts.
#[derive(Debug, Clone)]
pub struct SessionStore {
    storage: Arc<dyn Storage>,
}

impl SessionStore {
    /// Create a session store over `storage`.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Remember `user` as signed in. Only college addresses are accepted.
    pub async fn login(&self, user: UserSession) -> Result<UserSession> {
        if user.id.is_empty() {
            return Err(Error::validation("user id is required"));
        }
        if !is_college_email(&user.email) {
            return Err(Error::validation(format!(
                "{} is not a college email address (username@collegename.edu.in)",
                user.email
            )));
        }
        self.storage
            .set_json(SESSION_KEY, &user, Some(SESSION_TTL))
            .await?;
        debug!("session stored for {}", user.id);
        Ok(user)
    }

    /// The signed-in user, if any.
    pub async fn current(&self) -> Result<Option<UserSession>> {
        self.storage.get_json(SESSION_KEY).await
    }

    /// The signed-in user, or an error if nobody is.
    pub async fn require(&self) -> Result<UserSession> {
        self.current()
            .await?
            .ok_or_else(|| Error::invalid("not logged in"))
    }

    /// Replace the stored profile of the signed-in user.
    pub async fn update(&self, user: UserSession) -> Result<UserSession> {
        let current = self.require().await?;
        if current.id != user.id {
            return Err(Error::invalid(format!(
                "cannot update {} while {} is signed in",
                user.id, current.id
            )));
        }
        self.login(user).await
    }

    /// Forget the signed-in user.
    pub async fn logout(&self) -> Result<()> {
        self.storage.remove(SESSION_KEY).await
    }
}

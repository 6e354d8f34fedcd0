//! User models.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::UserId;

lazy_static! {
    static ref COLLEGE_EMAIL: Regex =
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.edu\.in$").unwrap();
}

/// The signed-in user, as kept across reloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    /// User ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// College email address.
    pub email: String,
    /// College the user belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub college_id: Option<String>,
}

impl UserSession {
    /// Create a session for a user.
    pub fn new(id: impl Into<UserId>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            college_id: None,
        }
    }

    /// College name derived from the email domain.
    pub fn college_name(&self) -> String {
        college_name_from_email(&self.email)
    }
}

/// Whether `email` is a college address (`user@college.edu.in`).
pub fn is_college_email(email: &str) -> bool {
    COLLEGE_EMAIL.is_match(email)
}

/// Capitalised first label of the email's domain, or empty.
pub fn college_name_from_email(email: &str) -> String {
    let Some((_, domain)) = email.split_once('@') else {
        return String::new();
    };
    let college = domain.split('.').next().unwrap_or_default();
    let mut chars = college.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

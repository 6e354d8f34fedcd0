//! Type-safe ID wrappers.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($name:ident, $prefix:expr, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                $name(id.into())
            }

            /// Generate a fresh random ID.
            pub fn generate() -> Self {
                $name(format!("{}{}", $prefix, uuid::Uuid::new_v4().simple()))
            }

            /// Check if this ID is empty or blank.
            pub fn is_empty(&self) -> bool {
                self.0.trim().is_empty()
            }

            /// Get the inner string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(s.to_owned())
            }
        }

        impl From<&String> for $name {
            fn from(s: &String) -> Self {
                $name(s.clone())
            }
        }

        impl From<i64> for $name {
            fn from(n: i64) -> Self {
                $name(n.to_string())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId, "prod_", "A product listing identifier.");
define_id!(UserId, "user_", "A user identifier.");
define_id!(ChatId, "chat_", "A conversation thread identifier.");
define_id!(MessageId, "msg_", "A chat message identifier.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = ProductId::new("12345");
        assert_eq!(id.as_str(), "12345");
        assert_eq!(format!("{}", id), "12345");
    }

    #[test]
    fn test_id_from_int() {
        let id = UserId::from(7i64);
        assert_eq!(id.as_str(), "7");
    }

    #[test]
    fn test_id_is_empty() {
        assert!(ChatId::new("").is_empty());
        assert!(ChatId::new("  ").is_empty());
        assert!(!ChatId::new("chat1").is_empty());
    }

    #[test]
    fn test_generated_ids_are_prefixed_and_distinct() {
        let a = ChatId::generate();
        let b = ChatId::generate();
        assert!(a.as_str().starts_with("chat_"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&MessageId::new("msg1")).unwrap();
        assert_eq!(json, "\"msg1\"");
    }
}

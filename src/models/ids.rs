//! Strongly-typed ID wrappers for all entity types
//!
//! Using newtype wrappers prevents accidentally mixing up IDs from different
//! entity types at compile time. IDs are opaque strings: freshly created
//! entities get a random UUID, while records supplied by the sync layer may
//! carry any string (including the `shared` category sentinel).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Wrap an existing identifier
            pub fn from_string(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the identifier as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Short form used in terminal output
            pub fn short(&self) -> &str {
                match self.0.char_indices().nth(8) {
                    Some((idx, _)) => &self.0[..idx],
                    None => &self.0,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl FromStr for $name {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().to_string()))
            }
        }
    };
}

define_id!(UserId);
define_id!(ExpenseId);
define_id!(CategoryId);
define_id!(PersonalCategoryId);

/// Id of the household's pooled expense category
pub const SHARED_CATEGORY_ID: &str = "shared";

impl CategoryId {
    /// The sentinel id of the shared household category
    pub fn shared() -> Self {
        Self::from_string(SHARED_CATEGORY_ID)
    }

    /// Whether this is the shared household category
    pub fn is_shared(&self) -> bool {
        self.0 == SHARED_CATEGORY_ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ids_are_unique() {
        let id1 = ExpenseId::new();
        let id2 = ExpenseId::new();
        assert_ne!(id1, id2);
        assert_eq!(id1.as_str().len(), 36);
    }

    #[test]
    fn test_short_display() {
        let id = UserId::from_string("550e8400-e29b-41d4-a716-446655440000");
        assert_eq!(id.short(), "550e8400");
        assert_eq!(UserId::from("abc").short(), "abc");
    }

    #[test]
    fn test_shared_sentinel() {
        assert!(CategoryId::shared().is_shared());
        assert!(!CategoryId::from("groceries").is_shared());
    }

    #[test]
    fn test_id_serialization() {
        let id = CategoryId::from("rent");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"rent\"");
        let deserialized: CategoryId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_parse_trims() {
        let id: UserId = " alice ".parse().unwrap();
        assert_eq!(id.as_str(), "alice");
    }
}

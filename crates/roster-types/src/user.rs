use serde::{Deserialize, Serialize};

use std::fmt;

/// Unique identifier for a user, supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A user who can author pull requests and review them.
///
/// Users belong to exactly one team at a time. Membership is denormalized:
/// the team is referenced by name and is rewritten whenever a team containing
/// this user id is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "user_id")]
    pub id: UserId,
    pub username: String,
    pub team_name: String,
    /// Only active users are eligible for new reviewer assignments.
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_serializes_transparently() {
        let id = UserId::from("u1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"u1\"");
        let parsed: UserId = serde_json::from_str("\"u2\"").unwrap();
        assert_eq!(parsed.as_str(), "u2");
    }

    #[test]
    fn test_user_wire_field_names() {
        let user = User {
            id: UserId::from("u1"),
            username: "Alice".to_string(),
            team_name: "backend".to_string(),
            is_active: true,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["user_id"], "u1");
        assert_eq!(json["team_name"], "backend");
        assert_eq!(json["is_active"], true);
    }

    #[test]
    fn test_blank_user_id() {
        assert!(UserId::from("  ").is_blank());
        assert!(!UserId::from("u1").is_blank());
    }
}

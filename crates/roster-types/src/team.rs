use serde::{Deserialize, Serialize};

use crate::user::{User, UserId};

/// A team and its current members.
///
/// Team identity is its case-sensitive name. Members are not stored on the
/// team row: they are the users whose `team_name` equals this name at the
/// moment of reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    #[serde(rename = "team_name")]
    pub name: String,
    #[serde(default)]
    pub members: Vec<TeamMember>,
}

/// A member entry as supplied on team creation and returned on lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub user_id: UserId,
    pub username: String,
    pub is_active: bool,
}

impl TeamMember {
    /// The user record this member becomes once upserted into `team_name`.
    pub fn to_user(&self, team_name: &str) -> User {
        User {
            id: self.user_id.clone(),
            username: self.username.clone(),
            team_name: team_name.to_string(),
            is_active: self.is_active,
        }
    }
}

impl From<&User> for TeamMember {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            username: user.username.clone(),
            is_active: user.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_to_user_takes_team_name() {
        let member = TeamMember {
            user_id: UserId::from("u1"),
            username: "Alice".to_string(),
            is_active: false,
        };
        let user = member.to_user("payments");
        assert_eq!(user.team_name, "payments");
        assert_eq!(user.id, member.user_id);
        assert!(!user.is_active);
        assert_eq!(TeamMember::from(&user), member);
    }

    #[test]
    fn test_team_deserializes_without_members() {
        let team: Team = serde_json::from_str(r#"{"team_name": "empty"}"#).unwrap();
        assert_eq!(team.name, "empty");
        assert!(team.members.is_empty());
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub regno: String,
    pub name: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// A user that has not been persisted yet. The password is already hashed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewUser {
    pub regno: String,
    pub name: Option<String>,
    pub password_hash: String,
    pub is_admin: bool,
}

impl NewUser {
    pub fn new(regno: &str, name: Option<&str>, password_hash: String) -> Self {
        NewUser {
            regno: regno.trim().to_string(),
            name: name
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
            password_hash,
            is_admin: false,
        }
    }

    pub fn admin(mut self) -> Self {
        self.is_admin = true;
        self
    }
}

#[cfg(test)]
impl User {
    pub fn test_user(id: i64, regno: &str) -> Self {
        User {
            id,
            regno: regno.to_string(),
            name: Some("Test User".to_string()),
            password_hash: "not-a-real-hash".to_string(),
            is_admin: false,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_trims_fields() {
        let user = NewUser::new("  REG/001 ", Some("  Jane  "), "hash".to_string());
        assert_eq!(user.regno, "REG/001");
        assert_eq!(user.name.as_deref(), Some("Jane"));
        assert!(!user.is_admin);
    }

    #[test]
    fn test_blank_name_becomes_none() {
        let user = NewUser::new("REG/002", Some("   "), "hash".to_string());
        assert!(user.name.is_none());
    }

    #[test]
    fn test_password_hash_is_never_serialized() {
        let user = User::test_user(1, "REG/003");
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("not-a-real-hash"));
    }
}

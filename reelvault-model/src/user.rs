use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User role for role-based access control.
///
/// Declaration order is the single source of truth for the hierarchy:
/// `User < Admin < SuperAdmin` via the derived `Ord`. Route gates must go
/// through [`UserRole::has_permission_level`] rather than comparing strings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular user: can browse the catalog and stream media.
    #[default]
    User,
    /// Administrator: user management and catalog synchronization.
    Admin,
    /// Super administrator: destructive catalog and account operations.
    SuperAdmin,
}

impl UserRole {
    /// Whether this role meets or exceeds the required permission level.
    pub fn has_permission_level(&self, required: UserRole) -> bool {
        *self >= required
    }

    pub fn all() -> &'static [UserRole] {
        &[UserRole::User, UserRole::Admin, UserRole::SuperAdmin]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
            UserRole::SuperAdmin => "superadmin",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(UserRole::User),
            "admin" => Ok(UserRole::Admin),
            "superadmin" => Ok(UserRole::SuperAdmin),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

/// One account per user; `email` is the unique identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string. Never the plaintext; skipped on serialization so
    /// it cannot leak through an API response.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_levels_follow_declaration_order() {
        assert!(UserRole::SuperAdmin.has_permission_level(UserRole::User));
        assert!(UserRole::SuperAdmin.has_permission_level(UserRole::Admin));
        assert!(UserRole::SuperAdmin.has_permission_level(UserRole::SuperAdmin));

        assert!(UserRole::Admin.has_permission_level(UserRole::User));
        assert!(UserRole::Admin.has_permission_level(UserRole::Admin));
        assert!(!UserRole::Admin.has_permission_level(UserRole::SuperAdmin));

        assert!(UserRole::User.has_permission_level(UserRole::User));
        assert!(!UserRole::User.has_permission_level(UserRole::Admin));
        assert!(!UserRole::User.has_permission_level(UserRole::SuperAdmin));
    }

    #[test]
    fn string_conversion() {
        assert_eq!(UserRole::User.as_str(), "user");
        assert_eq!(UserRole::Admin.as_str(), "admin");
        assert_eq!(UserRole::SuperAdmin.as_str(), "superadmin");

        assert_eq!("user".parse::<UserRole>().unwrap(), UserRole::User);
        assert_eq!("Admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!(
            "superadmin".parse::<UserRole>().unwrap(),
            UserRole::SuperAdmin
        );
        assert!("moderator".parse::<UserRole>().is_err());
    }

    #[test]
    fn password_hash_never_serializes() {
        let user = User {
            id: Uuid::new_v4(),
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
            role: UserRole::User,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("password_hash").is_none());
        assert_eq!(value["role"], "user");
    }
}

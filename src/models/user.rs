use serde::Serialize;
use serde_json::Value;
use strum::{AsRefStr, EnumString};

use crate::db::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
}

/// The part of a user document that access control looks at.
#[derive(Debug, Clone)]
pub struct User {
    pub role: Option<Role>,
}

impl User {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            // Role matching is exact: "Admin" is not an admin
            role: doc
                .get("role")
                .and_then(Value::as_str)
                .and_then(|r| r.parse().ok()),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }
}

#[derive(Debug, Serialize)]
pub struct AdminStatus {
    pub admin: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAlreadyExists {
    pub message: &'static str,
    pub inserted_id: Option<String>,
}

impl Default for UserAlreadyExists {
    fn default() -> Self {
        Self {
            message: "Already exist the email",
            inserted_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user(value: Value) -> User {
        match value {
            Value::Object(map) => User::from_document(&map),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_admin_role_is_exact() {
        assert!(user(json!({"_id": "u1", "email": "a@x.com", "role": "admin"})).is_admin());
        assert!(!user(json!({"_id": "u1", "email": "a@x.com", "role": "Admin"})).is_admin());
        assert!(!user(json!({"_id": "u1", "email": "a@x.com", "role": "chef"})).is_admin());
        assert!(!user(json!({"_id": "u1", "email": "a@x.com"})).is_admin());
        assert!(!user(json!({"_id": "u1", "role": 1})).is_admin());
    }

    #[test]
    fn test_duplicate_response_shape() {
        let body = serde_json::to_value(UserAlreadyExists::default()).unwrap();
        assert_eq!(body, json!({"message": "Already exist the email", "insertedId": null}));
    }
}

use serde::{Deserialize, Serialize};

wire_enum! {
    Role {
        User => "USER",
        Owner => "OWNER",
        Admin => "ADMIN",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub role: Role,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email_or_phone: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

/// Payload of a successful login or registration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Partial profile update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.email.is_none() && self.phone.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_from_wire() {
        let user: User = serde_json::from_value(json!({
            "id": 3,
            "fullName": "Lan Pham",
            "email": "lan@example.com",
            "phone": "0901234567",
            "role": "OWNER",
            "createdAt": "2024-01-02T03:04:05"
        }))
        .unwrap();
        assert_eq!(user.full_name, "Lan Pham");
        assert_eq!(user.role, Role::Owner);
    }

    #[test]
    fn test_unknown_role_is_other() {
        let role: Role = serde_json::from_value(json!("SUPERVISOR")).unwrap();
        assert_eq!(role, Role::Other);
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse(" Owner "), Some(Role::Owner));
        assert_eq!(Role::parse("guest"), None);
        assert_eq!(Role::choices(), "USER|OWNER|ADMIN");
    }

    #[test]
    fn test_profile_update_skips_absent() {
        let update = ProfileUpdate {
            phone: Some("0911".to_string()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({ "phone": "0911" }));
    }
}

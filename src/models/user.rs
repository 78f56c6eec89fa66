//! Admin views of user accounts.

use super::auth::{Role, User};
use crate::api::{PageQuery, Query};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: User,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub last_login: Option<String>,
    #[serde(default)]
    pub total_bookings: u64,
    #[serde(default)]
    pub total_orders: u64,
    #[serde(default)]
    pub total_spent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreateRequest {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Partial update; absent fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserSearch {
    pub keyword: Option<String>,
    pub role: Option<Role>,
    pub active: Option<bool>,
    pub paging: PageQuery,
}

impl Default for UserSearch {
    fn default() -> Self {
        Self {
            keyword: None,
            role: None,
            active: None,
            paging: PageQuery::new(0, 10),
        }
    }
}

impl UserSearch {
    pub fn to_query(&self) -> Query {
        let mut query = Query::new()
            .with("page", self.paging.page)
            .with("size", self.paging.size)
            .with_opt("keyword", self.keyword.as_deref())
            .with_opt("role", self.role.map(|r| r.as_str()))
            .with_opt("active", self.active);
        if let Some(sort_by) = &self.paging.sort_by {
            query = query.with("sortBy", sort_by);
        }
        if let Some(dir) = self.paging.sort_dir {
            query = query.with("sortDirection", dir.as_str());
        }
        query
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatistics {
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub active_users: u64,
    #[serde(default)]
    pub inactive_users: u64,
    #[serde(default)]
    pub new_users_this_month: u64,
    #[serde(default)]
    pub users_by_role: RoleCounts,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleCounts {
    #[serde(rename = "USER", default)]
    pub user: u64,
    #[serde(rename = "OWNER", default)]
    pub owner: u64,
    #[serde(rename = "ADMIN", default)]
    pub admin: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::SortDir;
    use serde_json::json;

    #[test]
    fn test_user_detail_flattens() {
        let detail: UserDetail = serde_json::from_value(json!({
            "id": 4,
            "fullName": "Huy",
            "email": "huy@example.com",
            "phone": "0902",
            "role": "USER",
            "createdAt": "2024-01-01",
            "active": false,
            "totalBookings": 12,
            "totalOrders": 3,
            "totalSpent": 1500000
        }))
        .unwrap();
        assert_eq!(detail.user.id, 4);
        assert!(!detail.active);
        assert_eq!(detail.total_bookings, 12);
    }

    #[test]
    fn test_statistics_role_counts() {
        let stats: UserStatistics = serde_json::from_value(json!({
            "totalUsers": 10,
            "activeUsers": 8,
            "inactiveUsers": 2,
            "newUsersThisMonth": 1,
            "usersByRole": { "USER": 7, "OWNER": 2, "ADMIN": 1 }
        }))
        .unwrap();
        assert_eq!(stats.users_by_role.owner, 2);
    }

    #[test]
    fn test_search_query() {
        let search = UserSearch {
            keyword: Some("huy".to_string()),
            role: Some(Role::Owner),
            active: Some(true),
            paging: PageQuery::new(1, 25).sorted("createdAt", SortDir::Asc),
        };
        let pairs = search.to_query().into_pairs();
        let get = |k: &str| {
            pairs
                .iter()
                .find(|(key, _)| key == k)
                .map(|(_, v)| v.clone())
        };
        assert_eq!(get("page").as_deref(), Some("1"));
        assert_eq!(get("role").as_deref(), Some("OWNER"));
        assert_eq!(get("active").as_deref(), Some("true"));
        assert_eq!(get("sortDirection").as_deref(), Some("ASC"));
    }

    #[test]
    fn test_update_request_partial() {
        let update = UserUpdateRequest {
            active: Some(false),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({ "active": false })
        );
    }
}

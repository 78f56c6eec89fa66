use crate::api::{Ack, ApiClient, ApiError, ApiResponse, Page, Query};
use crate::models::user::{
    UserCreateRequest, UserDetail, UserSearch, UserStatistics, UserUpdateRequest,
};

pub struct AdminUserService<'a> {
    pub(super) api: &'a ApiClient,
}

impl AdminUserService<'_> {
    pub fn list(&self, search: &UserSearch) -> Result<ApiResponse<Page<UserDetail>>, ApiError> {
        self.api.get("admin/users", search.to_query())
    }

    pub fn get(&self, id: i64) -> Result<ApiResponse<UserDetail>, ApiError> {
        self.api.get(&format!("admin/users/{}", id), Query::new())
    }

    pub fn create(&self, request: &UserCreateRequest) -> Result<ApiResponse<UserDetail>, ApiError> {
        self.api.post("admin/users", request)
    }

    pub fn update(
        &self,
        id: i64,
        request: &UserUpdateRequest,
    ) -> Result<ApiResponse<UserDetail>, ApiError> {
        self.api.put(&format!("admin/users/{}", id), request)
    }

    pub fn delete(&self, id: i64) -> Result<Ack, ApiError> {
        self.api.delete(&format!("admin/users/{}", id))
    }

    pub fn set_active(&self, id: i64, active: bool) -> Result<ApiResponse<UserDetail>, ApiError> {
        self.api.patch(
            &format!("admin/users/{}/status", id),
            Query::new().with("active", active),
        )
    }

    pub fn statistics(&self) -> Result<ApiResponse<UserStatistics>, ApiError> {
        self.api.get("admin/users/statistics", Query::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::client;
    use crate::api::transport::mock::MockTransport;
    use crate::models::Role;
    use serde_json::json;

    #[test]
    fn test_list_filters() {
        let (api, requests, _dir) =
            client(MockTransport::new().reply(200, json!({ "success": true })));

        let search = UserSearch {
            keyword: Some("lan".to_string()),
            role: Some(Role::Owner),
            ..Default::default()
        };
        api.admin_users().list(&search).unwrap();

        let sent = requests.borrow();
        assert_eq!(sent[0].url, "http://backend.test/api/admin/users");
        assert_eq!(sent[0].query_value("keyword"), Some("lan"));
        assert_eq!(sent[0].query_value("role"), Some("OWNER"));
        assert_eq!(sent[0].query_value("size"), Some("10"));
        assert!(sent[0].query_value("active").is_none());
    }

    #[test]
    fn test_statistics_by_role() {
        let (api, _requests, _dir) = client(MockTransport::new().reply(
            200,
            json!({
                "success": true,
                "data": {
                    "totalUsers": 12, "activeUsers": 10, "inactiveUsers": 2,
                    "newUsersThisMonth": 3,
                    "usersByRole": { "USER": 9, "OWNER": 2, "ADMIN": 1 }
                }
            }),
        ));

        let stats = api.admin_users().statistics().unwrap().into_data().unwrap();
        assert_eq!(stats.users_by_role.owner, 2);
        assert_eq!(stats.new_users_this_month, 3);
    }

    #[test]
    fn test_set_active() {
        let (api, requests, _dir) =
            client(MockTransport::new().reply(200, json!({ "success": true })));

        api.admin_users().set_active(4, true).unwrap();
        assert_eq!(
            requests.borrow()[0].url,
            "http://backend.test/api/admin/users/4/status"
        );
        assert_eq!(requests.borrow()[0].query_value("active"), Some("true"));
    }
}

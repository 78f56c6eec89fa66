//! The signed-in user's own profile.

use crate::api::{Ack, ApiClient, ApiError, ApiResponse, Query};
use crate::models::auth::{ChangePasswordRequest, ProfileUpdate};
use crate::models::User;
use crate::session::SessionStore;

pub struct UserService<'a> {
    pub(super) api: &'a ApiClient,
}

impl UserService<'_> {
    fn session(&self) -> SessionStore {
        SessionStore::new(self.api.storage().clone())
    }

    pub fn me(&self) -> Result<ApiResponse<User>, ApiError> {
        self.api.get("users/me", Query::new())
    }

    /// Fetch the current user and refresh the cached record
    pub fn refresh(&self) -> Result<Option<User>, ApiError> {
        let resp = self.me()?;
        match (resp.success, resp.data) {
            (true, Some(user)) => {
                self.cache(&user)?;
                Ok(Some(user))
            }
            _ => Ok(None),
        }
    }

    /// Update the profile; on success the cached user record is replaced
    pub fn update_profile(&self, update: &ProfileUpdate) -> Result<ApiResponse<User>, ApiError> {
        let resp: ApiResponse<User> = self.api.put("users/profile", update)?;
        if let (true, Some(user)) = (resp.success, &resp.data) {
            self.cache(user)?;
        }
        Ok(resp)
    }

    pub fn change_password(
        &self,
        request: &ChangePasswordRequest,
    ) -> Result<Ack, ApiError> {
        self.api.put("users/change-password", request)
    }

    fn cache(&self, user: &User) -> Result<(), ApiError> {
        self.session()
            .save_user(user)
            .map_err(|e| ApiError::Invalid(format!("could not store user: {:#}", e)))
    }
}

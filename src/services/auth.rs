//! Login, registration and logout. Successful login or registration
//! persists the token and user record; logout only touches local state.

use crate::api::{ApiClient, ApiError, ApiResponse};
use crate::models::auth::{ForgotPasswordRequest, LoginRequest, RegisterRequest};
use crate::models::AuthPayload;
use crate::session::SessionStore;

pub struct AuthService<'a> {
    api: &'a ApiClient,
    session: SessionStore,
}

impl<'a> AuthService<'a> {
    pub fn new(api: &'a ApiClient) -> Self {
        Self {
            api,
            session: SessionStore::new(api.storage().clone()),
        }
    }

    pub fn login(&self, request: &LoginRequest) -> Result<ApiResponse<AuthPayload>, ApiError> {
        let resp = self.api.post("auth/login", request)?;
        self.remember(&resp)?;
        Ok(resp)
    }

    pub fn register(
        &self,
        request: &RegisterRequest,
    ) -> Result<ApiResponse<AuthPayload>, ApiError> {
        let resp = self.api.post("auth/register", request)?;
        self.remember(&resp)?;
        Ok(resp)
    }

    pub fn forgot_password(&self, email: &str) -> Result<ApiResponse<String>, ApiError> {
        self.api.post(
            "auth/forgot-password",
            &ForgotPasswordRequest {
                email: email.to_string(),
            },
        )
    }

    /// Drop stored credentials
    pub fn logout(&self) -> anyhow::Result<()> {
        self.session.clear()
    }

    fn remember(&self, resp: &ApiResponse<AuthPayload>) -> Result<(), ApiError> {
        if let (true, Some(payload)) = (resp.success, &resp.data) {
            self.session
                .save(payload)
                .map_err(|e| ApiError::Invalid(format!("could not store session: {:#}", e)))?;
            if let Some(activity) = self.api.activity() {
                let _ = activity
                    .borrow_mut()
                    .session_started(payload.user.id, payload.user.role.as_str());
            }
        }
        Ok(())
    }
}

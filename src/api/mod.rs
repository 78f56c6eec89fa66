//! REST client for the booking and shop backend.
//!
//! Every call goes through one interceptor: the stored bearer token is
//! attached to the outgoing request, and a 401/403 response clears the
//! stored credentials before surfacing `ApiError::Unauthorized`. There is
//! no retry, caching or deduplication.

pub mod envelope;
pub mod error;
pub mod transport;

pub use envelope::{Ack, ApiResponse, Page, PageQuery, Query, SortDir};
pub use error::ApiError;
pub use transport::{Body, HttpRequest, HttpResponse, HttpTransport, Method, UreqTransport};

use crate::activity::SharedActivity;
use crate::storage::{keys, Storage};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Instant;

pub struct ApiClient {
    base_url: String,
    transport: Box<dyn HttpTransport>,
    storage: Storage,
    activity: Option<SharedActivity>,
    verbose: bool,
}

impl ApiClient {
    pub fn new(base_url: &str, transport: Box<dyn HttpTransport>, storage: Storage) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
            storage,
            activity: None,
            verbose: false,
        }
    }

    pub fn with_activity(mut self, activity: SharedActivity) -> Self {
        self.activity = Some(activity);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn activity(&self) -> Option<&SharedActivity> {
        self.activity.as_ref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Query,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.send(Method::Get, path, query, None)
    }

    pub fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.send(Method::Post, path, Query::new(), Some(json_body(body)?))
    }

    /// POST with query parameters and no body
    pub fn post_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Query,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.send(Method::Post, path, query, None)
    }

    pub fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.send(Method::Put, path, Query::new(), Some(json_body(body)?))
    }

    /// PATCH with query parameters and no body
    pub fn patch<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Query,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.send(Method::Patch, path, query, None)
    }

    pub fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>, ApiError> {
        self.send(Method::Delete, path, Query::new(), None)
    }

    pub fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: Query,
        body: Option<Body>,
    ) -> Result<ApiResponse<T>, ApiError> {
        let mut request = HttpRequest::new(method, self.url(path));
        request.query = query.into_pairs();
        request.body = body;
        request
            .headers
            .push(("Accept".to_string(), "application/json".to_string()));
        let authenticated = self.attach_token(&mut request);

        if self.verbose {
            eprintln!("[api] {} {}", method.as_str(), request.url);
        }
        self.note(|log| log.api_request(method.as_str(), &request.url, authenticated));

        let started = Instant::now();
        let response = match self.transport.execute(&request) {
            Ok(response) => response,
            Err(e) => {
                let message = e.to_string();
                if self.verbose {
                    eprintln!("[api] {} {} failed: {}", method.as_str(), request.url, message);
                }
                self.note(|log| log.api_error(method.as_str(), &request.url, &message));
                return Err(ApiError::Transport(message));
            }
        };
        let elapsed = started.elapsed().as_millis() as u64;

        if self.verbose {
            eprintln!(
                "[api] {} {} -> {} ({}ms)",
                method.as_str(),
                request.url,
                response.status,
                elapsed
            );
        }
        self.note(|log| log.api_response(method.as_str(), &request.url, response.status, elapsed));

        self.intercept(response)
    }

    /// Attach the stored bearer token; returns whether one was attached
    fn attach_token(&self, request: &mut HttpRequest) -> bool {
        match self.storage.get(keys::TOKEN) {
            Ok(Some(token)) if !token.trim().is_empty() => {
                request.headers.push((
                    "Authorization".to_string(),
                    format!("Bearer {}", token.trim()),
                ));
                true
            }
            Ok(_) => false,
            Err(e) => {
                eprintln!("Warning: could not read stored token: {}", e);
                false
            }
        }
    }

    fn intercept<T: DeserializeOwned>(
        &self,
        response: HttpResponse,
    ) -> Result<ApiResponse<T>, ApiError> {
        let status = response.status;

        if status == 401 || status == 403 {
            self.clear_credentials();
            return Err(ApiError::Unauthorized { status });
        }

        if !(200..300).contains(&status) {
            return Err(ApiError::Status {
                status,
                message: envelope::envelope_message(&response.body),
            });
        }

        if response.body.trim().is_empty() {
            return Ok(ApiResponse::empty());
        }

        serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn clear_credentials(&self) {
        for key in [keys::TOKEN, keys::USER] {
            if let Err(e) = self.storage.remove(key) {
                eprintln!("Warning: could not clear '{}': {}", key, e);
            }
        }
        self.note(|log| log.session_cleared("unauthorized"));
    }

    fn note(&self, f: impl FnOnce(&mut crate::activity::ActivityLog) -> anyhow::Result<()>) {
        if let Some(activity) = &self.activity {
            if let Err(e) = f(&mut activity.borrow_mut()) {
                eprintln!("Warning: activity log write failed: {}", e);
            }
        }
    }
}

fn json_body<B: Serialize + ?Sized>(body: &B) -> Result<Body, ApiError> {
    serde_json::to_value(body)
        .map(Body::Json)
        .map_err(|e| ApiError::Invalid(format!("could not encode request: {}", e)))
}

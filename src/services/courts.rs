use crate::api::{Ack, ApiClient, ApiError, ApiResponse, Page, PageQuery, Query, SortDir};
use crate::models::court::{Court, CourtRequest, CourtSearch, CourtStatus};

pub struct CourtService<'a> {
    pub(super) api: &'a ApiClient,
}

impl CourtService<'_> {
    /// Listing default: first page of ten, newest first
    pub fn default_paging() -> PageQuery {
        PageQuery::new(0, 10).sorted("createdAt", SortDir::Desc)
    }

    pub fn list(&self, paging: &PageQuery) -> Result<ApiResponse<Page<Court>>, ApiError> {
        self.api.get("courts", paging.to_query())
    }

    pub fn search(&self, search: &CourtSearch) -> Result<ApiResponse<Page<Court>>, ApiError> {
        self.api.get("courts/search", search.to_query())
    }

    pub fn get(&self, id: i64) -> Result<ApiResponse<Court>, ApiError> {
        self.api.get(&format!("courts/{}", id), Query::new())
    }

    /// Courts owned by the signed-in owner
    pub fn mine(&self) -> Result<ApiResponse<Vec<Court>>, ApiError> {
        self.api.get("courts/my-courts", Query::new())
    }

    pub fn create(&self, request: &CourtRequest) -> Result<ApiResponse<Court>, ApiError> {
        self.api.post("courts", request)
    }

    pub fn update(&self, id: i64, request: &CourtRequest) -> Result<ApiResponse<Court>, ApiError> {
        self.api.put(&format!("courts/{}", id), request)
    }

    pub fn delete(&self, id: i64) -> Result<Ack, ApiError> {
        self.api.delete(&format!("courts/{}", id))
    }

    pub fn set_status(&self, id: i64, status: CourtStatus) -> Result<ApiResponse<Court>, ApiError> {
        self.api.patch(
            &format!("courts/{}/status", id),
            Query::new().with("status", status.as_str()),
        )
    }
}

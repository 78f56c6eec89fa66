use crate::api::{Ack, ApiClient, ApiError, ApiResponse, Query};
use crate::models::shop::{CategoryRequest, ProductCategory};

pub struct CategoryService<'a> {
    pub(super) api: &'a ApiClient,
}

impl CategoryService<'_> {
    pub fn all(&self) -> Result<ApiResponse<Vec<ProductCategory>>, ApiError> {
        self.api.get("shop/categories", Query::new())
    }

    pub fn active(&self) -> Result<ApiResponse<Vec<ProductCategory>>, ApiError> {
        self.api.get("shop/categories/active", Query::new())
    }

    pub fn get(&self, id: i64) -> Result<ApiResponse<ProductCategory>, ApiError> {
        self.api
            .get(&format!("shop/categories/{}", id), Query::new())
    }

    pub fn create(
        &self,
        request: &CategoryRequest,
    ) -> Result<ApiResponse<ProductCategory>, ApiError> {
        self.api.post("shop/categories", request)
    }

    pub fn update(
        &self,
        id: i64,
        request: &CategoryRequest,
    ) -> Result<ApiResponse<ProductCategory>, ApiError> {
        self.api.put(&format!("shop/categories/{}", id), request)
    }

    pub fn delete(&self, id: i64) -> Result<Ack, ApiError> {
        self.api.delete(&format!("shop/categories/{}", id))
    }

    pub fn set_active(&self, id: i64, active: bool) -> Result<Ack, ApiError> {
        self.api.patch(
            &format!("shop/categories/{}/status", id),
            Query::new().with("active", active),
        )
    }
}

use crate::api::{Ack, ApiClient, ApiError, ApiResponse, Page, PageQuery, Query, SortDir};
use crate::models::shop::{Product, ProductDetail, ProductRequest, ProductSearch, ProductStatus};

pub struct ProductService<'a> {
    pub(super) api: &'a ApiClient,
}

impl ProductService<'_> {
    /// Catalog default: first page of twenty, newest first
    pub fn default_paging() -> PageQuery {
        PageQuery::new(0, 20).sorted("createdAt", SortDir::Desc)
    }

    pub fn list(&self, paging: &PageQuery) -> Result<ApiResponse<Page<Product>>, ApiError> {
        self.api.get("shop/products", paging.to_query())
    }

    /// Filters travel as a JSON body, not as query parameters
    pub fn search(&self, search: &ProductSearch) -> Result<ApiResponse<Page<Product>>, ApiError> {
        self.api.post("shop/products/search", search)
    }

    pub fn get(&self, id: i64) -> Result<ApiResponse<ProductDetail>, ApiError> {
        self.api.get(&format!("shop/products/{}", id), Query::new())
    }

    pub fn by_category(
        &self,
        category_id: i64,
        page: u32,
        size: u32,
    ) -> Result<ApiResponse<Page<Product>>, ApiError> {
        self.api.get(
            &format!("shop/products/category/{}", category_id),
            PageQuery::new(page, size).to_query(),
        )
    }

    pub fn featured(&self) -> Result<ApiResponse<Vec<Product>>, ApiError> {
        self.api.get("shop/products/featured", Query::new())
    }

    pub fn best_selling(&self) -> Result<ApiResponse<Vec<Product>>, ApiError> {
        self.api.get("shop/products/best-selling", Query::new())
    }

    pub fn new_arrivals(&self) -> Result<ApiResponse<Vec<Product>>, ApiError> {
        self.api.get("shop/products/new-arrivals", Query::new())
    }

    pub fn create(&self, request: &ProductRequest) -> Result<ApiResponse<Product>, ApiError> {
        self.api.post("shop/products", request)
    }

    pub fn update(
        &self,
        id: i64,
        request: &ProductRequest,
    ) -> Result<ApiResponse<Product>, ApiError> {
        self.api.put(&format!("shop/products/{}", id), request)
    }

    pub fn delete(&self, id: i64) -> Result<Ack, ApiError> {
        self.api.delete(&format!("shop/products/{}", id))
    }

    pub fn set_status(
        &self,
        id: i64,
        status: ProductStatus,
    ) -> Result<ApiResponse<Product>, ApiError> {
        self.api.patch(
            &format!("shop/products/{}/status", id),
            Query::new().with("status", status.as_str()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::client;
    use crate::api::transport::mock::MockTransport;
    use crate::api::{Body, Method};
    use serde_json::json;

    #[test]
    fn test_list_defaults() {
        let (api, requests, _dir) =
            client(MockTransport::new().reply(200, json!({ "success": true })));

        api.products()
            .list(&ProductService::default_paging())
            .unwrap();

        let sent = requests.borrow();
        assert_eq!(sent[0].url, "http://backend.test/api/shop/products");
        assert_eq!(sent[0].query_value("size"), Some("20"));
        assert_eq!(sent[0].query_value("sortDir"), Some("DESC"));
    }

    #[test]
    fn test_search_posts_body() {
        let (api, requests, _dir) =
            client(MockTransport::new().reply(200, json!({ "success": true })));

        let search = ProductSearch {
            keyword: Some("astrox".to_string()),
            ..Default::default()
        };
        api.products().search(&search).unwrap();

        let sent = requests.borrow();
        assert_eq!(sent[0].method, Method::Post);
        assert!(sent[0].query.is_empty());
        match &sent[0].body {
            Some(Body::Json(v)) => {
                assert_eq!(v["keyword"], "astrox");
                assert_eq!(v["page"], 0);
                assert_eq!(v["size"], 20);
                assert!(v.get("categoryId").is_none());
            }
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[test]
    fn test_detail_decodes() {
        let (api, _requests, _dir) = client(MockTransport::new().reply(
            200,
            json!({
                "success": true,
                "data": {
                    "id": 11, "name": "Astrox 88", "price": 3200000,
                    "discountPrice": 2900000, "stock": 4, "status": "ACTIVE",
                    "warranty": "12 months"
                }
            }),
        ));

        let detail = api.products().get(11).unwrap().into_data().unwrap();
        assert_eq!(detail.product.effective_price(), 2900000.0);
        assert_eq!(detail.warranty.as_deref(), Some("12 months"));
    }

    #[test]
    fn test_collections_and_category() {
        let (api, requests, _dir) = client(
            MockTransport::new()
                .reply(200, json!({ "success": true, "data": [] }))
                .reply(200, json!({ "success": true, "data": [] }))
                .reply(200, json!({ "success": true, "data": [] }))
                .reply(200, json!({ "success": true })),
        );

        api.products().featured().unwrap();
        api.products().best_selling().unwrap();
        api.products().new_arrivals().unwrap();
        api.products().by_category(2, 1, 20).unwrap();

        let urls: Vec<String> = requests.borrow().iter().map(|r| r.url.clone()).collect();
        assert_eq!(
            urls,
            vec![
                "http://backend.test/api/shop/products/featured",
                "http://backend.test/api/shop/products/best-selling",
                "http://backend.test/api/shop/products/new-arrivals",
                "http://backend.test/api/shop/products/category/2",
            ]
        );
        assert_eq!(requests.borrow()[3].query_value("page"), Some("1"));
    }

    #[test]
    fn test_set_status() {
        let (api, requests, _dir) =
            client(MockTransport::new().reply(200, json!({ "success": true })));

        api.products()
            .set_status(11, ProductStatus::OutOfStock)
            .unwrap();
        assert_eq!(
            requests.borrow()[0].query_value("status"),
            Some("OUT_OF_STOCK")
        );
    }
}

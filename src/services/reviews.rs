use crate::api::{Ack, ApiClient, ApiError, ApiResponse, Page, PageQuery, Query};
use crate::models::shop::ProductReview;

pub struct ReviewService<'a> {
    pub(super) api: &'a ApiClient,
}

impl ReviewService<'_> {
    pub fn default_paging() -> PageQuery {
        PageQuery::new(0, 10)
    }

    pub fn for_product(
        &self,
        product_id: i64,
        paging: &PageQuery,
    ) -> Result<ApiResponse<Page<ProductReview>>, ApiError> {
        self.api.get(
            &format!("shop/reviews/product/{}", product_id),
            paging.to_query(),
        )
    }

    pub fn by_rating(
        &self,
        product_id: i64,
        rating: u8,
        paging: &PageQuery,
    ) -> Result<ApiResponse<Page<ProductReview>>, ApiError> {
        self.api.get(
            &format!("shop/reviews/product/{}/rating/{}", product_id, rating),
            paging.to_query(),
        )
    }

    pub fn latest_verified(&self, limit: u32) -> Result<ApiResponse<Vec<ProductReview>>, ApiError> {
        self.api.get(
            "shop/reviews/latest-verified",
            Query::new().with("limit", limit),
        )
    }

    pub fn delete(&self, id: i64) -> Result<Ack, ApiError> {
        self.api.delete(&format!("shop/reviews/{}", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::client;
    use crate::api::transport::mock::MockTransport;
    use serde_json::json;

    #[test]
    fn test_reviews_by_rating() {
        let (api, requests, _dir) = client(MockTransport::new().reply(
            200,
            json!({
                "success": true,
                "data": {
                    "content": [{
                        "id": 1, "productId": 11, "userId": 3, "userName": "Minh",
                        "rating": 5, "comment": "Great", "verified": true,
                        "createdAt": "2024-05-01"
                    }],
                    "totalElements": 1, "totalPages": 1
                }
            }),
        ));

        let page = api
            .reviews()
            .by_rating(11, 5, &ReviewService::default_paging())
            .unwrap()
            .into_data()
            .unwrap();
        assert_eq!(page.content[0].rating, 5);
        assert!(page.content[0].verified);
        assert_eq!(
            requests.borrow()[0].url,
            "http://backend.test/api/shop/reviews/product/11/rating/5"
        );
    }

    #[test]
    fn test_latest_verified_limit() {
        let (api, requests, _dir) =
            client(MockTransport::new().reply(200, json!({ "success": true, "data": [] })));

        api.reviews().latest_verified(10).unwrap();
        assert_eq!(requests.borrow()[0].query_value("limit"), Some("10"));
    }
}

use crate::api::{ApiClient, ApiError, ApiResponse, Page, PageQuery, Query};
use crate::models::shop::{
    CreateOrderRequest, Order, OrderStatistics, OrderStatus, UpdateOrderStatusRequest,
};

pub struct OrderService<'a> {
    pub(super) api: &'a ApiClient,
}

impl OrderService<'_> {
    pub fn default_paging() -> PageQuery {
        PageQuery::new(0, 10)
    }

    pub fn create(&self, request: &CreateOrderRequest) -> Result<ApiResponse<Order>, ApiError> {
        self.api.post("shop/orders", request)
    }

    /// The signed-in user's orders, optionally narrowed to one status
    pub fn mine(
        &self,
        paging: &PageQuery,
        status: Option<OrderStatus>,
    ) -> Result<ApiResponse<Page<Order>>, ApiError> {
        let path = match status {
            Some(status) => format!("shop/orders/my-orders/status/{}", status.as_str()),
            None => "shop/orders/my-orders".to_string(),
        };
        self.api.get(&path, paging.to_query())
    }

    pub fn get(&self, id: i64) -> Result<ApiResponse<Order>, ApiError> {
        self.api.get(&format!("shop/orders/{}", id), Query::new())
    }

    pub fn cancel(&self, id: i64, reason: &str) -> Result<ApiResponse<Order>, ApiError> {
        self.api.post_query(
            &format!("shop/orders/{}/cancel", id),
            Query::new().with("reason", reason),
        )
    }

    pub fn all(&self, paging: &PageQuery) -> Result<ApiResponse<Page<Order>>, ApiError> {
        self.api.get("shop/orders/all", paging.to_query())
    }

    pub fn by_status(
        &self,
        status: OrderStatus,
        paging: &PageQuery,
    ) -> Result<ApiResponse<Page<Order>>, ApiError> {
        self.api.get(
            &format!("shop/orders/status/{}", status.as_str()),
            paging.to_query(),
        )
    }

    pub fn update_status(
        &self,
        id: i64,
        request: &UpdateOrderStatusRequest,
    ) -> Result<ApiResponse<Order>, ApiError> {
        self.api.put(&format!("shop/orders/{}/status", id), request)
    }

    pub fn statistics(&self) -> Result<ApiResponse<OrderStatistics>, ApiError> {
        self.api.get("shop/orders/statistics", Query::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::client;
    use crate::api::transport::mock::MockTransport;
    use crate::api::{Body, Method};
    use crate::models::shop::{OrderLineRequest, OrderPaymentMethod, ShippingDetails};
    use serde_json::json;

    fn shipping() -> ShippingDetails {
        ShippingDetails {
            recipient_name: "Lan Pham".to_string(),
            recipient_phone: "0901234567".to_string(),
            shipping_address: "12 Nguyen Hue".to_string(),
            shipping_province: "HCM".to_string(),
            shipping_district: "Q1".to_string(),
            shipping_ward: "Ben Nghe".to_string(),
            note: None,
        }
    }

    #[test]
    fn test_create_flattens_shipping() {
        let (api, requests, _dir) =
            client(MockTransport::new().reply(200, json!({ "success": true })));

        let request = CreateOrderRequest {
            shipping: shipping(),
            payment_method: OrderPaymentMethod::Cod,
            items: vec![OrderLineRequest {
                product_id: 11,
                quantity: 2,
            }],
        };
        api.orders().create(&request).unwrap();

        match &requests.borrow()[0].body {
            Some(Body::Json(v)) => {
                assert_eq!(v["recipientName"], "Lan Pham");
                assert_eq!(v["paymentMethod"], "COD");
                assert_eq!(v["items"][0]["productId"], 11);
                assert!(v.get("note").is_none());
            }
            other => panic!("unexpected body: {:?}", other),
        };
    }

    #[test]
    fn test_my_orders_path_by_status() {
        let (api, requests, _dir) = client(
            MockTransport::new()
                .reply(200, json!({ "success": true }))
                .reply(200, json!({ "success": true })),
        );

        let paging = OrderService::default_paging();
        api.orders().mine(&paging, None).unwrap();
        api.orders()
            .mine(&paging, Some(OrderStatus::Shipping))
            .unwrap();

        let sent = requests.borrow();
        assert_eq!(sent[0].url, "http://backend.test/api/shop/orders/my-orders");
        assert_eq!(
            sent[1].url,
            "http://backend.test/api/shop/orders/my-orders/status/SHIPPING"
        );
        assert_eq!(sent[1].query_value("page"), Some("0"));
    }

    #[test]
    fn test_cancel_sends_reason_as_query() {
        let (api, requests, _dir) =
            client(MockTransport::new().reply(200, json!({ "success": true })));

        api.orders().cancel(5, "changed my mind").unwrap();

        let sent = requests.borrow();
        assert_eq!(sent[0].method, Method::Post);
        assert_eq!(sent[0].url, "http://backend.test/api/shop/orders/5/cancel");
        assert_eq!(sent[0].query_value("reason"), Some("changed my mind"));
        assert!(sent[0].body.is_none());
    }

    #[test]
    fn test_update_status_body() {
        let (api, requests, _dir) =
            client(MockTransport::new().reply(200, json!({ "success": true })));

        api.orders()
            .update_status(
                5,
                &UpdateOrderStatusRequest {
                    status: OrderStatus::Delivered,
                    note: String::new(),
                },
            )
            .unwrap();

        let sent = requests.borrow();
        assert_eq!(sent[0].method, Method::Put);
        assert!(matches!(sent[0].body, Some(Body::Json(ref v)) if v["status"] == "DELIVERED"));
    }

    #[test]
    fn test_statistics() {
        let (api, _requests, _dir) = client(MockTransport::new().reply(
            200,
            json!({ "success": true, "data": { "totalOrders": 40, "totalRevenue": 12500000 } }),
        ));

        let stats = api.orders().statistics().unwrap().into_data().unwrap();
        assert_eq!(stats.total_orders, 40);
        assert_eq!(stats.pending_orders, 0);
        assert_eq!(stats.total_revenue, 12500000.0);
    }
}

//! Booking payments. Unlike the other wrappers these hand back the
//! payload itself, so an unsuccessful envelope surfaces as an error.

use crate::api::{ApiClient, ApiError, Query};
use crate::models::payment::{MoMoPaymentResponse, Payment, PaymentRequest};

pub struct PaymentService<'a> {
    pub(super) api: &'a ApiClient,
}

impl PaymentService<'_> {
    pub fn create_momo(&self, request: &PaymentRequest) -> Result<MoMoPaymentResponse, ApiError> {
        self.api.post("payments/momo/create", request)?.into_data()
    }

    /// Settle a sandbox payment; result code 0 means success
    pub fn confirm_mock(&self, order_id: &str, result_code: i32) -> Result<Payment, ApiError> {
        self.api
            .post_query(
                &format!("payments/mock/confirm/{}", order_id),
                Query::new().with("resultCode", result_code),
            )?
            .into_data()
    }

    pub fn for_booking(&self, booking_id: i64) -> Result<Payment, ApiError> {
        self.api
            .get(&format!("payments/booking/{}", booking_id), Query::new())?
            .into_data()
    }
}

use serde::{Deserialize, Serialize};

wire_enum! {
    PaymentMethod {
        Cash => "CASH",
        BankTransfer => "BANK_TRANSFER",
        Momo => "MOMO",
        Vnpay => "VNPAY",
    }
}

wire_enum! {
    PaymentType {
        Full => "FULL",
        Deposit => "DEPOSIT",
    }
}

wire_enum! {
    PaymentStatus {
        Pending => "PENDING",
        Completed => "COMPLETED",
        Partial => "PARTIAL",
        Failed => "FAILED",
        Expired => "EXPIRED",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: i64,
    pub booking_id: i64,
    pub amount: f64,
    #[serde(default)]
    pub deposit_amount: f64,
    #[serde(default)]
    pub remaining_amount: f64,
    pub payment_method: PaymentMethod,
    pub payment_type: PaymentType,
    pub status: PaymentStatus,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub order_id: String,
    #[serde(default)]
    pub request_id: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub paid_at: Option<String>,
    #[serde(default)]
    pub expired_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub booking_id: i64,
    pub payment_type: PaymentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoMoPaymentResponse {
    pub pay_url: String,
    pub order_id: String,
    #[serde(default)]
    pub request_id: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub result_code: i32,
}

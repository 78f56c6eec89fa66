use serde::{Deserialize, Serialize};

wire_enum! {
    ProductStatus {
        Active => "ACTIVE",
        Inactive => "INACTIVE",
        OutOfStock => "OUT_OF_STOCK",
    }
}

wire_enum! {
    CategoryStatus {
        Active => "ACTIVE",
        Inactive => "INACTIVE",
    }
}

wire_enum! {
    /// How an order is paid
    OrderPaymentMethod {
        Cod => "COD",
        Momo => "MOMO",
        Vnpay => "VNPAY",
        Zalopay => "ZALOPAY",
    }
}

wire_enum! {
    OrderPaymentStatus {
        Pending => "PENDING",
        Paid => "PAID",
        Failed => "FAILED",
    }
}

wire_enum! {
    OrderStatus {
        Pending => "PENDING",
        Confirmed => "CONFIRMED",
        Shipping => "SHIPPING",
        Delivered => "DELIVERED",
        Cancelled => "CANCELLED",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub discount_price: Option<f64>,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub category_name: String,
    pub status: ProductStatus,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub bestseller: bool,
    #[serde(default)]
    pub created_at: String,
}

impl Product {
    /// Discounted price when one is set, list price otherwise
    pub fn effective_price(&self) -> f64 {
        match self.discount_price {
            Some(d) if d > 0.0 => d,
            _ => self.price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    #[serde(default)]
    pub specifications: Option<String>,
    #[serde(default)]
    pub warranty: Option<String>,
}

/// Body for creating or replacing a product, usually read from a TOML file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<f64>,
    pub stock: i64,
    pub category_id: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub bestseller: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specifications: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warranty: Option<String>,
}

/// Search body posted to `/shop/products/search`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSearch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    pub page: u32,
    pub size: u32,
}

impl Default for ProductSearch {
    fn default() -> Self {
        Self {
            keyword: None,
            category_id: None,
            min_price: None,
            max_price: None,
            page: 0,
            size: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCategory {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: CategoryStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductReview {
    pub id: i64,
    pub product_id: i64,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub user_name: String,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: i64,
    pub product_id: i64,
    pub product_name: String,
    #[serde(default)]
    pub product_image: String,
    pub quantity: u32,
    pub price: f64,
    pub total_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub order_code: String,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub recipient_name: String,
    pub recipient_phone: String,
    pub shipping_address: String,
    #[serde(default)]
    pub shipping_province: String,
    #[serde(default)]
    pub shipping_district: String,
    #[serde(default)]
    pub shipping_ward: String,
    #[serde(default)]
    pub note: Option<String>,
    pub total_amount: f64,
    #[serde(default)]
    pub shipping_fee: f64,
    pub final_amount: f64,
    pub payment_method: OrderPaymentMethod,
    pub payment_status: OrderPaymentStatus,
    pub order_status: OrderStatus,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// One cart line as sent with an order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineRequest {
    pub product_id: i64,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingDetails {
    pub recipient_name: String,
    pub recipient_phone: String,
    pub shipping_address: String,
    pub shipping_province: String,
    pub shipping_district: String,
    pub shipping_ward: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(flatten)]
    pub shipping: ShippingDetails,
    pub payment_method: OrderPaymentMethod,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<OrderLineRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
    pub note: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatistics {
    #[serde(default)]
    pub total_orders: u64,
    #[serde(default)]
    pub pending_orders: u64,
    #[serde(default)]
    pub completed_orders: u64,
    #[serde(default)]
    pub total_revenue: f64,
}

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Default, ToSchema)]
pub struct CreateOrderRequest {
    pub user_id: Option<Uuid>,
    pub status: Option<String>,
    pub payment_method: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Default, ToSchema)]
pub struct AddOrderItemRequest {
    pub order_id: Option<Uuid>,
    pub menu_id: Option<Uuid>,
    pub quantity: Option<i32>,
    /// Unit price captured by the caller; defaults to 0.
    #[schema(value_type = Option<String>, example = "9.99")]
    pub price: Option<Decimal>,
}

#[derive(Debug, Deserialize, Serialize, Default, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Default, ToSchema)]
pub struct CheckoutRequest {
    pub payment_method: Option<String>,
}

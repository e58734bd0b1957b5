use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, Serialize, Default, ToSchema)]
pub struct CreateMenuItemRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    #[schema(value_type = Option<String>, example = "9.99")]
    pub price: Option<Decimal>,
    pub description: Option<String>,
    /// Absolute http(s) URL, or empty.
    pub image: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Default, ToSchema)]
pub struct UpdateMenuItemRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    #[schema(value_type = Option<String>, example = "9.99")]
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize, Default, IntoParams, ToSchema)]
pub struct MenuQuery {
    /// Exact category match.
    pub category: Option<String>,
    /// Substring of the item name.
    pub q: Option<String>,
}

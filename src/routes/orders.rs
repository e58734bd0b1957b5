use axum::{
    Json, Router,
    extract::State,
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::orders::{AddOrderItemRequest, CheckoutRequest, CreateOrderRequest, UpdateOrderStatusRequest},
    error::{AppResult, ErrorBody},
    models::{Created, Order},
    response::ApiResponse,
    routes::extract::{ApiJson, ApiPath},
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_all_orders).post(create_order))
        .route("/checkout/{user_id}", post(checkout))
        // `id` is a user id here and an order id under `/status`.
        .route("/{id}", get(list_user_orders))
        .route("/{id}/status", put(update_order_status))
}

pub fn order_items_router() -> Router<AppState> {
    Router::new().route("/", post(add_order_item))
}

#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 200, description = "Order header created with a zero total", body = ApiResponse<Created>),
        (status = 400, description = "Missing user_id or invalid status", body = ErrorBody),
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateOrderRequest>,
) -> AppResult<Json<ApiResponse<Created>>> {
    let resp = order_service::create_order(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/orders",
    responses(
        (status = 200, description = "Every order with its lines, newest first", body = ApiResponse<Vec<Order>>)
    ),
    tag = "Orders"
)]
pub async fn list_all_orders(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    let resp = order_service::list_orders(&state, None).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "The user's orders with their lines, newest first", body = ApiResponse<Vec<Order>>)
    ),
    tag = "Orders"
)]
pub async fn list_user_orders(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    let resp = order_service::list_orders(&state, Some(user_id)).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/orders/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Order status updated", body = ApiResponse<Order>),
        (status = 400, description = "Missing or invalid status", body = ErrorBody),
        (status = 404, description = "Order not found", body = ErrorBody),
    ),
    tag = "Orders"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::update_status(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/orders/checkout/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "User ID")
    ),
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Order placed from the cart at current prices", body = ApiResponse<Order>),
        (status = 400, description = "Empty cart or unavailable item", body = ErrorBody),
    ),
    tag = "Orders"
)]
pub async fn checkout(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<CheckoutRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::checkout(&state, user_id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/order_items",
    request_body = AddOrderItemRequest,
    responses(
        (status = 200, description = "Line appended; returns the order with its recomputed total", body = ApiResponse<Order>),
        (status = 400, description = "Missing fields, bad quantity or negative price", body = ErrorBody),
        (status = 404, description = "Order not found", body = ErrorBody),
    ),
    tag = "Orders"
)]
pub async fn add_order_item(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<AddOrderItemRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::add_order_item(&state, payload).await?;
    Ok(Json(resp))
}

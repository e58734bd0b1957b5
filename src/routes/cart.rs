use axum::{
    Json, Router,
    extract::State,
    routing::{delete, get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::cart::{AddToCartRequest, SetQuantityRequest},
    error::{AppResult, ErrorBody},
    models::{Cart, CartLine, CartOwner},
    response::ApiResponse,
    routes::extract::{ApiJson, ApiPath},
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/guest/{token}", get(guest_cart).post(guest_add).delete(guest_clear))
        .route(
            "/guest/{token}/item/{menu_id}",
            put(guest_set_quantity).delete(guest_remove),
        )
        .route("/{user_id}", get(user_cart).post(user_add).delete(user_clear))
        .route(
            "/{user_id}/item/{menu_id}",
            put(user_set_quantity).delete(user_remove),
        )
        .route("/{user_id}/merge/{token}", post(merge_guest))
        .route("/{user_id}/{menu_id}", delete(user_remove_strict))
}

#[utoipa::path(
    get,
    path = "/cart/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Cart lines, newest first", body = ApiResponse<Cart>)
    ),
    tag = "Cart"
)]
pub async fn user_cart(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> AppResult<Json<ApiResponse<Cart>>> {
    let resp = cart_service::get_cart(&state, &CartOwner::Registered(user_id)).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/cart/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "User ID")
    ),
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Line added or quantity incremented", body = ApiResponse<CartLine>),
        (status = 400, description = "Missing fields, bad quantity or unknown item", body = ErrorBody),
    ),
    tag = "Cart"
)]
pub async fn user_add(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<CartLine>>> {
    let resp = cart_service::add_item(&state, &CartOwner::Registered(user_id), payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/cart/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Cart cleared")
    ),
    tag = "Cart"
)]
pub async fn user_clear(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = cart_service::clear_cart(&state, &CartOwner::Registered(user_id)).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/cart/{user_id}/item/{menu_id}",
    params(
        ("user_id" = Uuid, Path, description = "User ID"),
        ("menu_id" = Uuid, Path, description = "Menu item ID")
    ),
    request_body = SetQuantityRequest,
    responses(
        (status = 200, description = "Quantity set; zero or less removes the line"),
        (status = 400, description = "Missing quantity", body = ErrorBody),
    ),
    tag = "Cart"
)]
pub async fn user_set_quantity(
    State(state): State<AppState>,
    ApiPath((user_id, menu_id)): ApiPath<(Uuid, Uuid)>,
    ApiJson(payload): ApiJson<SetQuantityRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp =
        cart_service::set_quantity(&state, &CartOwner::Registered(user_id), menu_id, payload)
            .await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/cart/{user_id}/item/{menu_id}",
    params(
        ("user_id" = Uuid, Path, description = "User ID"),
        ("menu_id" = Uuid, Path, description = "Menu item ID")
    ),
    responses(
        (status = 200, description = "Line removed, or was already absent")
    ),
    tag = "Cart"
)]
pub async fn user_remove(
    State(state): State<AppState>,
    ApiPath((user_id, menu_id)): ApiPath<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = cart_service::remove_item(&state, &CartOwner::Registered(user_id), menu_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/cart/{user_id}/{menu_id}",
    params(
        ("user_id" = Uuid, Path, description = "User ID"),
        ("menu_id" = Uuid, Path, description = "Menu item ID")
    ),
    responses(
        (status = 200, description = "Line removed"),
        (status = 404, description = "Cart item not found", body = ErrorBody),
    ),
    tag = "Cart"
)]
pub async fn user_remove_strict(
    State(state): State<AppState>,
    ApiPath((user_id, menu_id)): ApiPath<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = cart_service::remove_item_strict(&state, user_id, menu_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/cart/{user_id}/merge/{token}",
    params(
        ("user_id" = Uuid, Path, description = "User receiving the lines"),
        ("token" = String, Path, description = "Guest token")
    ),
    responses(
        (status = 200, description = "Merged user cart", body = ApiResponse<Cart>),
        (status = 400, description = "Missing guest token", body = ErrorBody),
    ),
    tag = "Cart"
)]
pub async fn merge_guest(
    State(state): State<AppState>,
    ApiPath((user_id, token)): ApiPath<(Uuid, String)>,
) -> AppResult<Json<ApiResponse<Cart>>> {
    let resp = cart_service::merge_guest_cart(&state, &token, user_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/cart/guest/{token}",
    params(
        ("token" = String, Path, description = "Guest token")
    ),
    responses(
        (status = 200, description = "Guest cart; the guest is created on first use", body = ApiResponse<Cart>)
    ),
    tag = "Cart"
)]
pub async fn guest_cart(
    State(state): State<AppState>,
    ApiPath(token): ApiPath<String>,
) -> AppResult<Json<ApiResponse<Cart>>> {
    let resp = cart_service::get_cart(&state, &CartOwner::guest(token)).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/cart/guest/{token}",
    params(
        ("token" = String, Path, description = "Guest token")
    ),
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Line added or quantity incremented", body = ApiResponse<CartLine>),
        (status = 400, description = "Missing fields, bad quantity or unknown item", body = ErrorBody),
    ),
    tag = "Cart"
)]
pub async fn guest_add(
    State(state): State<AppState>,
    ApiPath(token): ApiPath<String>,
    ApiJson(payload): ApiJson<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<CartLine>>> {
    let resp = cart_service::add_item(&state, &CartOwner::guest(token), payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/cart/guest/{token}",
    params(
        ("token" = String, Path, description = "Guest token")
    ),
    responses(
        (status = 200, description = "Cart cleared")
    ),
    tag = "Cart"
)]
pub async fn guest_clear(
    State(state): State<AppState>,
    ApiPath(token): ApiPath<String>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = cart_service::clear_cart(&state, &CartOwner::guest(token)).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/cart/guest/{token}/item/{menu_id}",
    params(
        ("token" = String, Path, description = "Guest token"),
        ("menu_id" = Uuid, Path, description = "Menu item ID")
    ),
    request_body = SetQuantityRequest,
    responses(
        (status = 200, description = "Quantity set; zero or less removes the line"),
        (status = 400, description = "Missing quantity", body = ErrorBody),
    ),
    tag = "Cart"
)]
pub async fn guest_set_quantity(
    State(state): State<AppState>,
    ApiPath((token, menu_id)): ApiPath<(String, Uuid)>,
    ApiJson(payload): ApiJson<SetQuantityRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = cart_service::set_quantity(&state, &CartOwner::guest(token), menu_id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/cart/guest/{token}/item/{menu_id}",
    params(
        ("token" = String, Path, description = "Guest token"),
        ("menu_id" = Uuid, Path, description = "Menu item ID")
    ),
    responses(
        (status = 200, description = "Line removed, or was already absent")
    ),
    tag = "Cart"
)]
pub async fn guest_remove(
    State(state): State<AppState>,
    ApiPath((token, menu_id)): ApiPath<(String, Uuid)>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = cart_service::remove_item(&state, &CartOwner::guest(token), menu_id).await?;
    Ok(Json(resp))
}

use axum::{Json, Router, extract::State, routing::get};
use uuid::Uuid;

use crate::{
    dto::favorites::FavoriteRequest,
    error::{AppResult, ErrorBody},
    models::{Favorite, FavoriteDetail, FavoriteStat},
    response::ApiResponse,
    routes::extract::{ApiJson, ApiPath},
    services::favorite_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", axum::routing::post(add_favorite).delete(remove_favorite))
        .route("/all", get(list_all_favorites))
        .route("/stats", get(favorite_stats))
        .route("/{user_id}", get(list_favorites))
}

#[utoipa::path(
    post,
    path = "/favorites",
    request_body = FavoriteRequest,
    responses(
        (status = 200, description = "Added to favorites", body = ApiResponse<Favorite>),
        (status = 400, description = "Missing user_id or menu_id", body = ErrorBody),
        (status = 409, description = "Already favorited", body = ErrorBody),
    ),
    tag = "Favorites"
)]
pub async fn add_favorite(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<FavoriteRequest>,
) -> AppResult<Json<ApiResponse<Favorite>>> {
    let resp = favorite_service::add_favorite(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/favorites",
    request_body = FavoriteRequest,
    responses(
        (status = 200, description = "Removed from favorites"),
        (status = 400, description = "Missing user_id or menu_id", body = ErrorBody),
        (status = 404, description = "Favorite not found", body = ErrorBody),
    ),
    tag = "Favorites"
)]
pub async fn remove_favorite(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<FavoriteRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = favorite_service::remove_favorite(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/favorites/all",
    responses(
        (status = 200, description = "Every favorite with user and item details", body = ApiResponse<Vec<FavoriteDetail>>)
    ),
    tag = "Favorites"
)]
pub async fn list_all_favorites(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<FavoriteDetail>>>> {
    let resp = favorite_service::list_all_favorites(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/favorites/stats",
    responses(
        (status = 200, description = "Favorite counts per item, most favorited first", body = ApiResponse<Vec<FavoriteStat>>)
    ),
    tag = "Favorites"
)]
pub async fn favorite_stats(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<FavoriteStat>>>> {
    let resp = favorite_service::favorite_stats(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/favorites/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "The user's favorites, newest first", body = ApiResponse<Vec<Favorite>>)
    ),
    tag = "Favorites"
)]
pub async fn list_favorites(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<Favorite>>>> {
    let resp = favorite_service::list_favorites(&state, user_id).await?;
    Ok(Json(resp))
}

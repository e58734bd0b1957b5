use axum::{Json, Router, extract::State, routing::get};
use uuid::Uuid;

use crate::{
    dto::reviews::SubmitReviewRequest,
    error::{AppResult, ErrorBody},
    models::{Review, ReviewDetail},
    response::ApiResponse,
    routes::extract::{ApiJson, ApiPath},
    services::review_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_all_reviews).post(submit_review))
        // GET takes a menu item id, DELETE a review id.
        .route("/{id}", get(list_item_reviews).delete(delete_review))
}

#[utoipa::path(
    post,
    path = "/reviews",
    request_body = SubmitReviewRequest,
    responses(
        (status = 200, description = "Review submitted", body = ApiResponse<Review>),
        (status = 400, description = "Missing fields or rating outside 1..=5", body = ErrorBody),
        (status = 403, description = "The user never ordered this item", body = ErrorBody),
    ),
    tag = "Reviews"
)]
pub async fn submit_review(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SubmitReviewRequest>,
) -> AppResult<Json<ApiResponse<Review>>> {
    let resp = review_service::submit_review(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/reviews",
    responses(
        (status = 200, description = "All reviews with username and item name", body = ApiResponse<Vec<ReviewDetail>>)
    ),
    tag = "Reviews"
)]
pub async fn list_all_reviews(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<ReviewDetail>>>> {
    let resp = review_service::list_all_reviews(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/reviews/{id}",
    params(
        ("id" = Uuid, Path, description = "Menu item ID")
    ),
    responses(
        (status = 200, description = "Reviews of one item, newest first", body = ApiResponse<Vec<Review>>)
    ),
    tag = "Reviews"
)]
pub async fn list_item_reviews(
    State(state): State<AppState>,
    ApiPath(menu_id): ApiPath<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<Review>>>> {
    let resp = review_service::list_reviews_for_item(&state, menu_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/reviews/{id}",
    params(
        ("id" = Uuid, Path, description = "Review ID")
    ),
    responses(
        (status = 200, description = "Review deleted"),
        (status = 404, description = "Review not found", body = ErrorBody),
    ),
    tag = "Reviews"
)]
pub async fn delete_review(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = review_service::delete_review(&state, id).await?;
    Ok(Json(resp))
}

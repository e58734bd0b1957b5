use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::auth::{LoginRequest, SignupRequest},
    error::{AppResult, ErrorBody},
    models::User,
    response::ApiResponse,
    routes::extract::ApiJson,
    services::auth_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

#[utoipa::path(
    post,
    path = "/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "User created", body = ApiResponse<User>),
        (status = 400, description = "Missing fields or invalid role", body = ErrorBody),
        (status = 409, description = "Username is already taken", body = ErrorBody),
    ),
    tag = "Auth"
)]
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SignupRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = auth_service::signup(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Identity of the logged in user", body = ApiResponse<User>),
        (status = 400, description = "Missing username or password", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = auth_service::login(&state, payload).await?;
    Ok(Json(resp))
}

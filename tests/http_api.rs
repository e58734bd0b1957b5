mod common;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use common::{create_menu_item, create_user, setup_state};
use foodieflow_api::{app::build_app, routes::create_api_router};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

async fn app() -> anyhow::Result<(Router, foodieflow_api::state::AppState)> {
    let state = setup_state().await?;
    let router = create_api_router().with_state(state.clone());
    Ok((router, state))
}

async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> anyhow::Result<(StatusCode, Value)> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))?,
        None => builder.body(Body::empty())?,
    };

    let response = router.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, value))
}

#[tokio::test]
async fn malformed_json_is_a_bad_request_with_error_body() -> anyhow::Result<()> {
    let (router, _) = app().await?;

    let request = Request::builder()
        .method("POST")
        .uri("/signup")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))?;
    let response = router.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let body: Value = serde_json::from_slice(&bytes)?;
    assert!(body["error"].is_string());
    Ok(())
}

#[tokio::test]
async fn full_app_serves_health_and_unknown_routes() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let app = build_app(state);

    let (status, body) = send(&app, "GET", "/health", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["database"], "ok");

    let request = Request::builder().uri("/nowhere").body(Body::empty())?;
    let response = app.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.headers().contains_key("x-request-id"));
    Ok(())
}

#[tokio::test]
async fn invalid_path_ids_are_bad_requests() -> anyhow::Result<()> {
    let (router, _) = app().await?;

    let (status, body) = send(&router, "GET", "/menu/not-a-uuid", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    Ok(())
}

#[tokio::test]
async fn signup_and_login_over_http() -> anyhow::Result<()> {
    let (router, _) = app().await?;

    let (status, body) = send(
        &router,
        "POST",
        "/signup",
        Some(json!({ "username": "ana", "email": "ana@example.com", "password": "hunter2" })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "user");

    let (status, body) = send(
        &router,
        "POST",
        "/login",
        Some(json!({ "username": "ana", "password": "wrong" })),
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");
    Ok(())
}

#[tokio::test]
async fn guest_and_user_cart_routes_resolve_separately() -> anyhow::Result<()> {
    let (router, state) = app().await?;
    let user_id = create_user(&state, "ana").await?;
    let fries = create_menu_item(&state, "Fries", 450).await?;

    let (status, _) = send(
        &router,
        "POST",
        "/cart/guest/kiosk-7",
        Some(json!({ "menu_id": fries, "quantity": 2 })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&router, "GET", "/cart/guest/kiosk-7", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"][0]["quantity"], 2);
    assert_eq!(body["data"]["items"][0]["menu_price"], "4.50");

    let (status, body) = send(&router, "GET", &format!("/cart/{user_id}"), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["owner_id"], user_id.to_string());
    assert_eq!(body["data"]["items"].as_array().map(Vec::len), Some(0));
    Ok(())
}

#[tokio::test]
async fn strict_and_lenient_cart_deletes_differ() -> anyhow::Result<()> {
    let (router, state) = app().await?;
    let user_id = create_user(&state, "ana").await?;
    let menu_id = Uuid::new_v4();

    let (status, body) = send(&router, "DELETE", &format!("/cart/{user_id}/{menu_id}"), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Cart item not found");

    let (status, _) = send(
        &router,
        "DELETE",
        &format!("/cart/{user_id}/item/{menu_id}"),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn order_flow_over_http() -> anyhow::Result<()> {
    let (router, state) = app().await?;
    let user_id = create_user(&state, "ana").await?;
    let pizza = create_menu_item(&state, "Pizza", 999).await?;

    let (status, body) = send(&router, "POST", "/orders", Some(json!({ "user_id": user_id }))).await?;
    assert_eq!(status, StatusCode::OK);
    let order_id = body["data"]["id"].as_str().map(str::to_owned).unwrap();

    let (status, body) = send(
        &router,
        "POST",
        "/order_items",
        Some(json!({ "order_id": order_id, "menu_id": pizza, "quantity": 2, "price": 9.99 })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_price"], "19.98");

    let (status, body) = send(
        &router,
        "PUT",
        &format!("/orders/{order_id}/status"),
        Some(json!({ "status": "delivered" })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "delivered");

    let (status, body) = send(&router, "GET", &format!("/orders/{user_id}"), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);

    let (status, body) = send(
        &router,
        "POST",
        &format!("/orders/checkout/{user_id}"),
        Some(json!({})),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Cart is empty");
    Ok(())
}

#[tokio::test]
async fn review_gate_is_forbidden_over_http() -> anyhow::Result<()> {
    let (router, state) = app().await?;
    let user_id = create_user(&state, "ana").await?;
    let pizza = create_menu_item(&state, "Pizza", 999).await?;

    let (status, body) = send(
        &router,
        "POST",
        "/reviews",
        Some(json!({ "user_id": user_id, "menu_id": pizza, "rating": 5, "comment": "Great" })),
    )
    .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "You can only review items you have ordered");
    Ok(())
}

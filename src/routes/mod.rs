use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod cart;
pub mod doc;
pub mod extract;
pub mod favorites;
pub mod health;
pub mod menu;
pub mod orders;
pub mod reviews;
pub mod users;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .nest("/users", users::router())
        .nest("/menu", menu::router())
        .nest("/cart", cart::router())
        .nest("/orders", orders::router())
        .nest("/order_items", orders::order_items_router())
        .nest("/reviews", reviews::router())
        .nest("/favorites", favorites::router())
}

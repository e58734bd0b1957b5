use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, SignupRequest, UpdateRoleRequest},
        cart::{AddToCartRequest, SetQuantityRequest},
        favorites::FavoriteRequest,
        menu::{CreateMenuItemRequest, MenuQuery, UpdateMenuItemRequest},
        orders::{AddOrderItemRequest, CheckoutRequest, CreateOrderRequest, UpdateOrderStatusRequest},
        reviews::SubmitReviewRequest,
    },
    error::ErrorBody,
    models::{
        Cart, CartLine, CartOwnerId, Created, Favorite, FavoriteDetail, FavoriteStat, MenuItem,
        Order, OrderLine, OrderStatus, Review, ReviewDetail, Role, User,
    },
    response::Meta,
    routes::{auth, cart, favorites, health, menu, orders, reviews, users},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::signup,
        auth::login,
        users::list_users,
        users::update_role,
        users::delete_user,
        menu::list_menu,
        menu::get_menu_item,
        menu::create_menu_item,
        menu::update_menu_item,
        menu::delete_menu_item,
        cart::user_cart,
        cart::user_add,
        cart::user_clear,
        cart::user_set_quantity,
        cart::user_remove,
        cart::user_remove_strict,
        cart::merge_guest,
        cart::guest_cart,
        cart::guest_add,
        cart::guest_clear,
        cart::guest_set_quantity,
        cart::guest_remove,
        orders::create_order,
        orders::list_all_orders,
        orders::list_user_orders,
        orders::update_order_status,
        orders::checkout,
        orders::add_order_item,
        reviews::submit_review,
        reviews::list_all_reviews,
        reviews::list_item_reviews,
        reviews::delete_review,
        favorites::add_favorite,
        favorites::remove_favorite,
        favorites::list_all_favorites,
        favorites::favorite_stats,
        favorites::list_favorites
    ),
    components(
        schemas(
            User,
            Role,
            MenuItem,
            Cart,
            CartLine,
            CartOwnerId,
            Order,
            OrderLine,
            OrderStatus,
            Created,
            Favorite,
            FavoriteDetail,
            FavoriteStat,
            Review,
            ReviewDetail,
            SignupRequest,
            LoginRequest,
            UpdateRoleRequest,
            CreateMenuItemRequest,
            UpdateMenuItemRequest,
            MenuQuery,
            AddToCartRequest,
            SetQuantityRequest,
            CreateOrderRequest,
            AddOrderItemRequest,
            UpdateOrderStatusRequest,
            CheckoutRequest,
            SubmitReviewRequest,
            FavoriteRequest,
            ErrorBody,
            Meta
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Signup and login"),
        (name = "Users", description = "User administration"),
        (name = "Menu", description = "Menu catalog"),
        (name = "Cart", description = "User and guest carts"),
        (name = "Orders", description = "Orders and order lines"),
        (name = "Reviews", description = "Purchase-gated reviews"),
        (name = "Favorites", description = "Favorite menu items"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

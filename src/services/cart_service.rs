//! Cart aggregation for registered users and guests.
//!
//! A cart is a set of `(owner, menu item) -> quantity` lines. The unique index
//! on `(owner_id, menu_id)` guarantees one line per item; adding an item that
//! is already present increments the stored quantity instead of inserting.
//! A line never holds a quantity of zero or less: setting such a quantity
//! deletes it.

use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::cart::{AddToCartRequest, SetQuantityRequest},
    entity::{
        cart_items::{ActiveModel as CartActive, Column as CartCol, Entity as CartItems},
        menu_items::{Entity as MenuItems, Model as MenuModel},
        users::Entity as Users,
    },
    error::{AppError, AppResult},
    models::{Cart, CartLine, CartOwner, CartOwnerId},
    money::from_cents,
    response::{ApiResponse, Meta},
    services::{auth_service::ensure_guest, require},
    state::AppState,
};

/// Map a request-level owner onto the id cart rows are keyed by.
/// Guests are provisioned on first contact.
pub async fn resolve_owner<C: ConnectionTrait>(db: &C, owner: &CartOwner) -> AppResult<CartOwnerId> {
    match owner {
        CartOwner::Registered(user_id) => Ok(CartOwnerId(*user_id)),
        CartOwner::Guest { token } => ensure_guest(db, token).await,
    }
}

pub async fn get_cart(state: &AppState, owner: &CartOwner) -> AppResult<ApiResponse<Cart>> {
    let owner_id = resolve_owner(&state.orm, owner).await?;
    let items = load_lines(&state.orm, owner_id).await?;

    let meta = Meta::total(items.len());
    Ok(ApiResponse::success(
        "OK",
        Cart { owner_id, items },
        Some(meta),
    ))
}

pub async fn add_item(
    state: &AppState,
    owner: &CartOwner,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartLine>> {
    let menu_id = require(payload.menu_id, "Missing menu_id or quantity")?;
    let quantity = require(payload.quantity, "Missing menu_id or quantity")?;
    if quantity <= 0 {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".to_string(),
        ));
    }

    let owner_id = resolve_owner(&state.orm, owner).await?;

    let txn = state.orm.begin().await?;
    let menu = MenuItems::find_by_id(menu_id).one(&txn).await?;
    let menu = match menu {
        Some(m) => m,
        None => return Err(AppError::BadRequest("menu item not found".to_string())),
    };
    let stored = add_quantity(&txn, owner_id, menu_id, quantity, Utc::now().into()).await?;
    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.orm,
        Some(owner_id.0),
        "cart_add",
        Some("cart_items"),
        Some(serde_json::json!({ "menu_id": menu_id, "quantity": quantity })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let message = if stored == quantity {
        "Cart item added"
    } else {
        "Cart item updated"
    };
    Ok(ApiResponse::success(
        message,
        line_view(menu_id, stored, Some(&menu)),
        Some(Meta::empty()),
    ))
}

pub async fn set_quantity(
    state: &AppState,
    owner: &CartOwner,
    menu_id: Uuid,
    payload: SetQuantityRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let quantity = require(payload.quantity, "Missing quantity")?;
    let owner_id = resolve_owner(&state.orm, owner).await?;

    if quantity <= 0 {
        delete_line(&state.orm, owner_id, menu_id).await?;
        return Ok(ApiResponse::success(
            "Item removed",
            serde_json::json!({ "menu_id": menu_id, "quantity": 0 }),
            Some(Meta::empty()),
        ));
    }

    CartItems::update_many()
        .col_expr(CartCol::Quantity, Expr::value(quantity))
        .filter(CartCol::OwnerId.eq(owner_id.0))
        .filter(CartCol::MenuId.eq(menu_id))
        .exec(&state.orm)
        .await?;

    Ok(ApiResponse::success(
        "Item quantity updated",
        serde_json::json!({ "menu_id": menu_id, "quantity": quantity }),
        Some(Meta::empty()),
    ))
}

/// Delete one line; removing an absent line is not an error.
pub async fn remove_item(
    state: &AppState,
    owner: &CartOwner,
    menu_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let owner_id = resolve_owner(&state.orm, owner).await?;
    delete_line(&state.orm, owner_id, menu_id).await?;

    Ok(ApiResponse::success(
        "Item removed",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

/// Delete one line of a registered user's cart, reporting a missing line as 404.
pub async fn remove_item_strict(
    state: &AppState,
    user_id: Uuid,
    menu_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let removed = delete_line(&state.orm, CartOwnerId(user_id), menu_id).await?;

    if removed == 0 {
        return Err(AppError::NotFound("Cart item not found".into()));
    }

    if let Err(err) = log_audit(
        &state.orm,
        Some(user_id),
        "cart_remove",
        Some("cart_items"),
        Some(serde_json::json!({ "menu_id": menu_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Removed from cart",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn clear_cart(
    state: &AppState,
    owner: &CartOwner,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let owner_id = resolve_owner(&state.orm, owner).await?;
    CartItems::delete_many()
        .filter(CartCol::OwnerId.eq(owner_id.0))
        .exec(&state.orm)
        .await?;

    Ok(ApiResponse::success(
        "Cart cleared",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

/// Move a guest's cart into a registered user's cart.
///
/// Quantities of items present in both carts are added together and the
/// guest cart is emptied. Nothing calls this implicitly at login.
pub async fn merge_guest_cart(
    state: &AppState,
    token: &str,
    user_id: Uuid,
) -> AppResult<ApiResponse<Cart>> {
    if Users::find_by_id(user_id).one(&state.orm).await?.is_none() {
        return Err(AppError::NotFound("User not found".into()));
    }
    let guest_id = ensure_guest(&state.orm, token).await?;
    let user_owner = CartOwnerId(user_id);
    if guest_id == user_owner {
        return Err(AppError::BadRequest(
            "Cannot merge a guest cart into itself".into(),
        ));
    }

    let txn = state.orm.begin().await?;
    let guest_lines = CartItems::find()
        .filter(CartCol::OwnerId.eq(guest_id.0))
        .all(&txn)
        .await?;
    let moved = guest_lines.len();

    for line in guest_lines {
        add_quantity(&txn, user_owner, line.menu_id, line.quantity, line.created_at).await?;
    }
    CartItems::delete_many()
        .filter(CartCol::OwnerId.eq(guest_id.0))
        .exec(&txn)
        .await?;
    txn.commit().await?;

    tracing::info!(guest_id = %guest_id.0, %user_id, moved, "guest cart merged");

    if let Err(err) = log_audit(
        &state.orm,
        Some(user_id),
        "cart_merge",
        Some("cart_items"),
        Some(serde_json::json!({ "guest_id": guest_id.0, "lines": moved })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let items = load_lines(&state.orm, user_owner).await?;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success(
        "Guest cart merged",
        Cart {
            owner_id: user_owner,
            items,
        },
        Some(meta),
    ))
}

/// Increment the line for `(owner, menu)` or insert it, returning the stored quantity.
async fn add_quantity<C: ConnectionTrait>(
    db: &C,
    owner_id: CartOwnerId,
    menu_id: Uuid,
    quantity: i32,
    created_at: DateTime<FixedOffset>,
) -> AppResult<i32> {
    let existing = CartItems::find()
        .filter(CartCol::OwnerId.eq(owner_id.0))
        .filter(CartCol::MenuId.eq(menu_id))
        .one(db)
        .await?;

    let line = match existing {
        Some(line) => {
            if line.quantity.checked_add(quantity).is_none() {
                return Err(AppError::BadRequest("quantity is out of range".into()));
            }
            CartItems::update_many()
                .col_expr(CartCol::Quantity, Expr::col(CartCol::Quantity).add(quantity))
                .filter(CartCol::Id.eq(line.id))
                .exec(db)
                .await?;
            CartItems::find_by_id(line.id).one(db).await?.ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!("cart line {} vanished", line.id))
            })?
        }
        None => {
            CartActive {
                id: Set(Uuid::new_v4()),
                owner_id: Set(owner_id.0),
                menu_id: Set(menu_id),
                quantity: Set(quantity),
                created_at: Set(created_at),
            }
            .insert(db)
            .await?
        }
    };

    Ok(line.quantity)
}

async fn delete_line<C: ConnectionTrait>(
    db: &C,
    owner_id: CartOwnerId,
    menu_id: Uuid,
) -> AppResult<u64> {
    let result = CartItems::delete_many()
        .filter(CartCol::OwnerId.eq(owner_id.0))
        .filter(CartCol::MenuId.eq(menu_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

async fn load_lines<C: ConnectionTrait>(db: &C, owner_id: CartOwnerId) -> AppResult<Vec<CartLine>> {
    let rows = CartItems::find()
        .filter(CartCol::OwnerId.eq(owner_id.0))
        .order_by_desc(CartCol::CreatedAt)
        .find_also_related(MenuItems)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(line, menu)| line_view(line.menu_id, line.quantity, menu.as_ref()))
        .collect())
}

fn line_view(menu_id: Uuid, quantity: i32, menu: Option<&MenuModel>) -> CartLine {
    CartLine {
        menu_id,
        quantity,
        menu_name: menu.map(|m| m.name.clone()),
        menu_price: menu.map(|m| from_cents(m.price_cents)),
    }
}

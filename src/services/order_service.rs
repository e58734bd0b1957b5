use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::orders::{AddOrderItemRequest, CheckoutRequest, CreateOrderRequest, UpdateOrderStatusRequest},
    entity::{
        cart_items::{Column as CartCol, Entity as CartItems},
        menu_items::{Entity as MenuItems, Model as MenuModel},
        order_items::{ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems, Model as OrderItemModel},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
    },
    error::{AppError, AppResult},
    models::{Created, Order, OrderLine, OrderStatus, parse_stored},
    money::{from_cents, lines_total, to_cents},
    response::{ApiResponse, Meta},
    services::{require, require_text},
    state::AppState,
};

const DEFAULT_PAYMENT_METHOD: &str = "none";

pub async fn create_order(
    state: &AppState,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<Created>> {
    let user_id = require(payload.user_id, "Missing user_id")?;
    let status = match payload.status.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => raw.parse::<OrderStatus>()?,
        None => OrderStatus::Pending,
    };
    let payment_method = payload
        .payment_method
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string());

    let order = insert_order(&state.orm, user_id, status, payment_method).await?;

    if let Err(err) = log_audit(
        &state.orm,
        Some(user_id),
        "order_create",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order created",
        Created { id: order.id },
        Some(Meta::empty()),
    ))
}

/// Append a line to an order and rewrite the order total from all of its lines.
pub async fn add_order_item(
    state: &AppState,
    payload: AddOrderItemRequest,
) -> AppResult<ApiResponse<Order>> {
    let order_id = require(payload.order_id, "Missing required fields")?;
    let menu_id = require(payload.menu_id, "Missing required fields")?;
    let quantity = require(payload.quantity, "Missing required fields")?;
    if quantity <= 0 {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".into(),
        ));
    }
    let price_cents = match payload.price {
        Some(price) => to_cents(price)?,
        None => 0,
    };

    let txn = state.orm.begin().await?;
    if Orders::find_by_id(order_id).one(&txn).await?.is_none() {
        return Err(AppError::NotFound("Order not found".into()));
    }
    insert_line(&txn, order_id, menu_id, quantity, price_cents).await?;
    let total_cents = recompute_total(&txn, order_id).await?;
    txn.commit().await?;

    tracing::debug!(%order_id, total_cents, "order total recomputed");

    let order = load_order(&state.orm, order_id).await?;
    Ok(ApiResponse::success("Item added", order, Some(Meta::empty())))
}

/// Orders newest first, each with its lines. `None` lists every user's orders.
pub async fn list_orders(
    state: &AppState,
    user_id: Option<Uuid>,
) -> AppResult<ApiResponse<Vec<Order>>> {
    let mut finder = Orders::find();
    if let Some(user_id) = user_id {
        finder = finder.filter(OrderCol::UserId.eq(user_id));
    }
    let orders = finder
        .order_by_desc(OrderCol::OrderDate)
        .all(&state.orm)
        .await?;

    let order_ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
    let lines = if order_ids.is_empty() {
        Vec::new()
    } else {
        OrderItems::find()
            .filter(OrderItemCol::OrderId.is_in(order_ids))
            .order_by_asc(OrderItemCol::CreatedAt)
            .find_also_related(MenuItems)
            .all(&state.orm)
            .await?
            .into_iter()
            .map(|(line, menu)| line_from_entity(line, menu.as_ref()))
            .collect()
    };

    let orders = group_lines(orders, lines)?;
    let meta = Meta::total(orders.len());
    Ok(ApiResponse::success("Orders", orders, Some(meta)))
}

pub async fn update_status(
    state: &AppState,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    let status = require_text(payload.status, "Missing status")?.parse::<OrderStatus>()?;

    let existing = Orders::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(o) => o,
        None => return Err(AppError::NotFound("Order not found".into())),
    };
    let previous = existing.status.clone();

    let mut active: OrderActive = existing.into();
    active.status = Set(status.as_str().to_string());
    active.update(&state.orm).await?;

    tracing::info!(order_id = %id, from = %previous, to = %status, "order status changed");

    if let Err(err) = log_audit(
        &state.orm,
        None,
        "order_status_update",
        Some("orders"),
        Some(serde_json::json!({ "order_id": id, "from": previous, "to": status })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let order = load_order(&state.orm, id).await?;
    Ok(ApiResponse::success(
        "Order status updated",
        order,
        Some(Meta::empty()),
    ))
}

/// Turn a user's cart into an order priced at the current catalog prices,
/// then empty the cart.
pub async fn checkout(
    state: &AppState,
    user_id: Uuid,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<Order>> {
    let payment_method = payload
        .payment_method
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string());

    let txn = state.orm.begin().await?;

    let rows = CartItems::find()
        .filter(CartCol::OwnerId.eq(user_id))
        .order_by_asc(CartCol::CreatedAt)
        .find_also_related(MenuItems)
        .all(&txn)
        .await?;

    if rows.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }

    let mut priced: Vec<(Uuid, i32, i64)> = Vec::with_capacity(rows.len());
    for (line, menu) in &rows {
        let menu = match menu {
            Some(m) => m,
            None => {
                return Err(AppError::BadRequest(format!(
                    "Menu item {} is no longer available",
                    line.menu_id
                )));
            }
        };
        priced.push((line.menu_id, line.quantity, menu.price_cents));
    }

    let order = insert_order(&txn, user_id, OrderStatus::Pending, payment_method).await?;
    for (menu_id, quantity, price_cents) in &priced {
        insert_line(&txn, order.id, *menu_id, *quantity, *price_cents).await?;
    }
    let total_cents = recompute_total(&txn, order.id).await?;

    CartItems::delete_many()
        .filter(CartCol::OwnerId.eq(user_id))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    tracing::info!(order_id = %order.id, %user_id, lines = priced.len(), total_cents, "checkout completed");

    if let Err(err) = log_audit(
        &state.orm,
        Some(user_id),
        "checkout",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let order = load_order(&state.orm, order.id).await?;
    Ok(ApiResponse::success(
        "Checkout success",
        order,
        Some(Meta::empty()),
    ))
}

async fn insert_order<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    status: OrderStatus,
    payment_method: String,
) -> AppResult<OrderModel> {
    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        order_date: Set(Utc::now().into()),
        status: Set(status.as_str().to_string()),
        total_cents: Set(0),
        payment_method: Set(payment_method),
    }
    .insert(db)
    .await?;
    Ok(order)
}

async fn insert_line<C: ConnectionTrait>(
    db: &C,
    order_id: Uuid,
    menu_id: Uuid,
    quantity: i32,
    price_cents: i64,
) -> AppResult<OrderItemModel> {
    let line = OrderItemActive {
        id: Set(Uuid::new_v4()),
        order_id: Set(order_id),
        menu_id: Set(menu_id),
        quantity: Set(quantity),
        price_cents: Set(price_cents),
        created_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await?;
    Ok(line)
}

/// Recompute and store the order total from its persisted lines.
async fn recompute_total<C: ConnectionTrait>(db: &C, order_id: Uuid) -> AppResult<i64> {
    let lines = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order_id))
        .all(db)
        .await?;
    let total_cents = lines_total(lines.iter().map(|l| (l.quantity, l.price_cents)))?;

    Orders::update_many()
        .col_expr(OrderCol::TotalCents, Expr::value(total_cents))
        .filter(OrderCol::Id.eq(order_id))
        .exec(db)
        .await?;

    Ok(total_cents)
}

async fn load_order<C: ConnectionTrait>(db: &C, order_id: Uuid) -> AppResult<Order> {
    let order = Orders::find_by_id(order_id).one(db).await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound("Order not found".into())),
    };

    let lines = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order_id))
        .order_by_asc(OrderItemCol::CreatedAt)
        .find_also_related(MenuItems)
        .all(db)
        .await?
        .into_iter()
        .map(|(line, menu)| line_from_entity(line, menu.as_ref()))
        .collect();

    order_from_entity(order, lines)
}

/// Attach lines to their orders, keeping the order of both inputs.
fn group_lines(orders: Vec<OrderModel>, lines: Vec<OrderLine>) -> AppResult<Vec<Order>> {
    let mut by_order: HashMap<Uuid, Vec<OrderLine>> = HashMap::new();
    for line in lines {
        by_order.entry(line.order_id).or_default().push(line);
    }

    orders
        .into_iter()
        .map(|order| {
            let items = by_order.remove(&order.id).unwrap_or_default();
            order_from_entity(order, items)
        })
        .collect()
}

fn order_from_entity(model: OrderModel, items: Vec<OrderLine>) -> AppResult<Order> {
    Ok(Order {
        id: model.id,
        user_id: model.user_id,
        order_date: model.order_date.with_timezone(&Utc),
        status: parse_stored(&model.status)?,
        total_price: from_cents(model.total_cents),
        payment_method: model.payment_method,
        items,
    })
}

fn line_from_entity(model: OrderItemModel, menu: Option<&MenuModel>) -> OrderLine {
    OrderLine {
        id: model.id,
        order_id: model.order_id,
        menu_id: model.menu_id,
        quantity: model.quantity,
        price: from_cents(model.price_cents),
        menu_name: menu.map(|m| m.name.clone()),
        menu_image: menu.map(|m| m.image.clone()),
    }
}

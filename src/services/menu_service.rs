use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::menu::{CreateMenuItemRequest, MenuQuery, UpdateMenuItemRequest},
    entity::menu_items::{ActiveModel, Column, Entity as MenuItems, Model as MenuModel},
    error::{AppError, AppResult},
    models::MenuItem,
    money::{from_cents, to_cents},
    response::{ApiResponse, Meta},
    services::{require, require_text},
    state::AppState,
};

pub async fn list_menu(state: &AppState, query: MenuQuery) -> AppResult<ApiResponse<Vec<MenuItem>>> {
    let mut condition = Condition::all();

    if let Some(category) = query.category.as_ref().filter(|c| !c.is_empty()) {
        condition = condition.add(Column::Category.eq(category.as_str()));
    }

    if let Some(search) = query.q.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(Column::Name.contains(search.as_str()));
    }

    let items: Vec<MenuItem> = MenuItems::find()
        .filter(condition)
        .order_by_asc(Column::Category)
        .order_by_asc(Column::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(menu_from_entity)
        .collect();

    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Menu", items, Some(meta)))
}

pub async fn get_menu_item(state: &AppState, id: Uuid) -> AppResult<ApiResponse<MenuItem>> {
    let result = MenuItems::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(menu_from_entity);
    let result = match result {
        Some(m) => m,
        None => return Err(AppError::NotFound("Item not found".into())),
    };
    Ok(ApiResponse::success("Menu item", result, None))
}

pub async fn create_menu_item(
    state: &AppState,
    payload: CreateMenuItemRequest,
) -> AppResult<ApiResponse<MenuItem>> {
    let name = require_text(payload.name, "Missing required fields")?;
    let category = require_text(payload.category, "Missing required fields")?;
    let price_cents = to_cents(require(payload.price, "Missing required fields")?)?;
    let image = payload.image.unwrap_or_default();
    validate_image_url(&image)?;

    let item = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        category: Set(category),
        price_cents: Set(price_cents),
        description: Set(payload.description.unwrap_or_default()),
        image: Set(image),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.orm,
        None,
        "menu_create",
        Some("menu_items"),
        Some(serde_json::json!({ "menu_id": item.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Menu item created successfully",
        menu_from_entity(item),
        Some(Meta::empty()),
    ))
}

pub async fn update_menu_item(
    state: &AppState,
    id: Uuid,
    payload: UpdateMenuItemRequest,
) -> AppResult<ApiResponse<MenuItem>> {
    if let Some(image) = payload.image.as_deref() {
        validate_image_url(image)?;
    }

    let existing = MenuItems::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(m) => m,
        None => return Err(AppError::NotFound("Item not found".into())),
    };

    let mut active: ActiveModel = existing.clone().into();
    if let Some(name) = payload.name.filter(|n| !n.trim().is_empty()) {
        active.name = Set(name);
    }
    if let Some(category) = payload.category.filter(|c| !c.trim().is_empty()) {
        active.category = Set(category);
    }
    if let Some(price) = payload.price {
        active.price_cents = Set(to_cents(price)?);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(image) = payload.image {
        active.image = Set(image);
    }

    if !active.is_changed() {
        return Ok(ApiResponse::success(
            "Menu item unchanged",
            menu_from_entity(existing),
            Some(Meta::empty()),
        ));
    }
    let item = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.orm,
        None,
        "menu_update",
        Some("menu_items"),
        Some(serde_json::json!({ "menu_id": item.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Menu item updated successfully",
        menu_from_entity(item),
        Some(Meta::empty()),
    ))
}

pub async fn delete_menu_item(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = MenuItems::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Item not found".into()));
    }

    if let Err(err) = log_audit(
        &state.orm,
        None,
        "menu_delete",
        Some("menu_items"),
        Some(serde_json::json!({ "menu_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Menu item deleted successfully",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

/// Menu images are either empty or an absolute http(s) URL.
pub fn validate_image_url(image: &str) -> AppResult<()> {
    if image.is_empty() || image.starts_with("http://") || image.starts_with("https://") {
        Ok(())
    } else {
        Err(AppError::BadRequest(
            "image must be a full online URL (http/https)".into(),
        ))
    }
}

pub(crate) fn menu_from_entity(model: MenuModel) -> MenuItem {
    MenuItem {
        id: model.id,
        name: model.name,
        category: model.category,
        price: from_cents(model.price_cents),
        description: model.description,
        image: model.image,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

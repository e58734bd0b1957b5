use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set, prelude::DateTimeWithTimeZone, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::favorites::FavoriteRequest,
    entity::{
        favorites::{
            ActiveModel as FavoriteActive, Column as FavCol, Entity as Favorites,
            Model as FavoriteModel, Relation as FavRelation,
        },
        menu_items::Column as MenuCol,
        users::Column as UserCol,
    },
    error::{AppError, AppResult},
    models::{Favorite, FavoriteDetail, FavoriteStat},
    response::{ApiResponse, Meta},
    services::require,
    state::AppState,
};

#[derive(Debug, FromQueryResult)]
struct FavoriteRow {
    id: Uuid,
    user_id: Uuid,
    username: Option<String>,
    email: Option<String>,
    menu_id: Uuid,
    menu_name: Option<String>,
    image: Option<String>,
    created_at: DateTimeWithTimeZone,
}

#[derive(Debug, FromQueryResult)]
struct FavoriteStatRow {
    menu_id: Uuid,
    favorite_count: i64,
    menu_name: Option<String>,
}

pub async fn add_favorite(
    state: &AppState,
    payload: FavoriteRequest,
) -> AppResult<ApiResponse<Favorite>> {
    let user_id = require(payload.user_id, "Missing user_id or menu_id")?;
    let menu_id = require(payload.menu_id, "Missing user_id or menu_id")?;

    let existing = Favorites::find()
        .filter(FavCol::UserId.eq(user_id))
        .filter(FavCol::MenuId.eq(menu_id))
        .one(&state.orm)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("Already favorited".into()));
    }

    // A concurrent duplicate trips the unique index and surfaces as a conflict.
    let favorite = FavoriteActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        menu_id: Set(menu_id),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.orm,
        Some(user_id),
        "favorite_add",
        Some("favorites"),
        Some(serde_json::json!({ "menu_id": menu_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Added to favorites",
        favorite_from_entity(favorite),
        Some(Meta::empty()),
    ))
}

pub async fn list_favorites(
    state: &AppState,
    user_id: Uuid,
) -> AppResult<ApiResponse<Vec<Favorite>>> {
    let favorites: Vec<Favorite> = Favorites::find()
        .filter(FavCol::UserId.eq(user_id))
        .order_by_desc(FavCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(favorite_from_entity)
        .collect();

    let meta = Meta::total(favorites.len());
    Ok(ApiResponse::success("OK", favorites, Some(meta)))
}

/// Every favorite with the owner's username/email and the item's name/image.
pub async fn list_all_favorites(
    state: &AppState,
) -> AppResult<ApiResponse<Vec<FavoriteDetail>>> {
    let rows = Favorites::find()
        .select_only()
        .column(FavCol::Id)
        .column(FavCol::UserId)
        .column(FavCol::MenuId)
        .column(FavCol::CreatedAt)
        .column_as(UserCol::Username, "username")
        .column_as(UserCol::Email, "email")
        .column_as(MenuCol::Name, "menu_name")
        .column_as(MenuCol::Image, "image")
        .join(JoinType::LeftJoin, FavRelation::Users.def())
        .join(JoinType::LeftJoin, FavRelation::MenuItems.def())
        .order_by_desc(FavCol::CreatedAt)
        .into_model::<FavoriteRow>()
        .all(&state.orm)
        .await?;

    let favorites: Vec<FavoriteDetail> = rows
        .into_iter()
        .map(|row| FavoriteDetail {
            id: row.id,
            user_id: row.user_id,
            username: row.username,
            email: row.email,
            menu_id: row.menu_id,
            menu_name: row.menu_name,
            image: row.image,
            created_at: row.created_at.with_timezone(&Utc),
        })
        .collect();

    let meta = Meta::total(favorites.len());
    Ok(ApiResponse::success("OK", favorites, Some(meta)))
}

/// Favorite counts per menu item, most favorited first.
pub async fn favorite_stats(state: &AppState) -> AppResult<ApiResponse<Vec<FavoriteStat>>> {
    let rows = Favorites::find()
        .select_only()
        .column(FavCol::MenuId)
        .column_as(FavCol::Id.count(), "favorite_count")
        .column_as(MenuCol::Name, "menu_name")
        .join(JoinType::LeftJoin, FavRelation::MenuItems.def())
        .group_by(FavCol::MenuId)
        .group_by(MenuCol::Name)
        .order_by_desc(Expr::cust("favorite_count"))
        .order_by_asc(MenuCol::Name)
        .into_model::<FavoriteStatRow>()
        .all(&state.orm)
        .await?;

    let stats: Vec<FavoriteStat> = rows
        .into_iter()
        .map(|row| FavoriteStat {
            menu_id: row.menu_id,
            count: row.favorite_count,
            menu_name: row.menu_name,
        })
        .collect();

    let meta = Meta::total(stats.len());
    Ok(ApiResponse::success("OK", stats, Some(meta)))
}

pub async fn remove_favorite(
    state: &AppState,
    payload: FavoriteRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let user_id = require(payload.user_id, "Missing user_id or menu_id")?;
    let menu_id = require(payload.menu_id, "Missing user_id or menu_id")?;

    let result = Favorites::delete_many()
        .filter(FavCol::UserId.eq(user_id))
        .filter(FavCol::MenuId.eq(menu_id))
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Favorite not found".into()));
    }

    if let Err(err) = log_audit(
        &state.orm,
        Some(user_id),
        "favorite_remove",
        Some("favorites"),
        Some(serde_json::json!({ "menu_id": menu_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Removed from favorites",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn favorite_from_entity(model: FavoriteModel) -> Favorite {
    Favorite {
        id: model.id,
        user_id: model.user_id,
        menu_id: model.menu_id,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

//! Reviews, gated on purchase history.
//!
//! A user may review a menu item only after at least one of their orders
//! contains it. The order status is not considered.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
    prelude::DateTimeWithTimeZone,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::reviews::SubmitReviewRequest,
    entity::{
        menu_items::Column as MenuCol,
        order_items::{Column as OrderItemCol, Entity as OrderItems},
        orders::{Column as OrderCol, Entity as Orders},
        reviews::{
            ActiveModel as ReviewActive, Column as ReviewCol, Entity as Reviews,
            Model as ReviewModel, Relation as ReviewRelation,
        },
        users::Column as UserCol,
    },
    error::{AppError, AppResult},
    models::{Review, ReviewDetail},
    response::{ApiResponse, Meta},
    services::{require, require_text},
    state::AppState,
};

const RATING_RANGE: std::ops::RangeInclusive<i32> = 1..=5;

#[derive(Debug, FromQueryResult)]
struct ReviewRow {
    id: Uuid,
    user_id: Uuid,
    menu_id: Uuid,
    rating: i32,
    comment: String,
    created_at: DateTimeWithTimeZone,
    username: Option<String>,
    menu_name: Option<String>,
}

pub async fn submit_review(
    state: &AppState,
    payload: SubmitReviewRequest,
) -> AppResult<ApiResponse<Review>> {
    let user_id = require(payload.user_id, "Missing required fields")?;
    let menu_id = require(payload.menu_id, "Missing required fields")?;
    let rating = require(payload.rating, "Missing required fields")?;
    let comment = require_text(payload.comment, "Missing required fields")?;
    if !RATING_RANGE.contains(&rating) {
        return Err(AppError::BadRequest(
            "rating must be between 1 and 5".into(),
        ));
    }

    if !has_ordered(&state.orm, user_id, menu_id).await? {
        return Err(AppError::Forbidden(
            "You can only review items you have ordered".into(),
        ));
    }

    let review = ReviewActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        menu_id: Set(menu_id),
        rating: Set(rating),
        comment: Set(comment),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.orm,
        Some(user_id),
        "review_submit",
        Some("reviews"),
        Some(serde_json::json!({ "review_id": review.id, "menu_id": menu_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Review submitted",
        review_from_entity(review),
        Some(Meta::empty()),
    ))
}

pub async fn list_reviews_for_item(
    state: &AppState,
    menu_id: Uuid,
) -> AppResult<ApiResponse<Vec<Review>>> {
    let reviews: Vec<Review> = Reviews::find()
        .filter(ReviewCol::MenuId.eq(menu_id))
        .order_by_desc(ReviewCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(review_from_entity)
        .collect();

    let meta = Meta::total(reviews.len());
    Ok(ApiResponse::success("OK", reviews, Some(meta)))
}

pub async fn list_all_reviews(state: &AppState) -> AppResult<ApiResponse<Vec<ReviewDetail>>> {
    let rows = Reviews::find()
        .select_only()
        .column(ReviewCol::Id)
        .column(ReviewCol::UserId)
        .column(ReviewCol::MenuId)
        .column(ReviewCol::Rating)
        .column(ReviewCol::Comment)
        .column(ReviewCol::CreatedAt)
        .column_as(UserCol::Username, "username")
        .column_as(MenuCol::Name, "menu_name")
        .join(JoinType::LeftJoin, ReviewRelation::Users.def())
        .join(JoinType::LeftJoin, ReviewRelation::MenuItems.def())
        .order_by_desc(ReviewCol::CreatedAt)
        .into_model::<ReviewRow>()
        .all(&state.orm)
        .await?;

    let reviews: Vec<ReviewDetail> = rows
        .into_iter()
        .map(|row| ReviewDetail {
            id: row.id,
            user_id: row.user_id,
            username: row.username,
            menu_id: row.menu_id,
            menu_name: row.menu_name,
            rating: row.rating,
            comment: row.comment,
            created_at: row.created_at.with_timezone(&Utc),
        })
        .collect();

    let meta = Meta::total(reviews.len());
    Ok(ApiResponse::success("OK", reviews, Some(meta)))
}

pub async fn delete_review(state: &AppState, id: Uuid) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Reviews::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Review not found".into()));
    }

    if let Err(err) = log_audit(
        &state.orm,
        None,
        "review_delete",
        Some("reviews"),
        Some(serde_json::json!({ "review_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Review deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

async fn has_ordered<C: ConnectionTrait>(db: &C, user_id: Uuid, menu_id: Uuid) -> AppResult<bool> {
    let purchases = OrderItems::find()
        .inner_join(Orders)
        .filter(OrderCol::UserId.eq(user_id))
        .filter(OrderItemCol::MenuId.eq(menu_id))
        .count(db)
        .await?;
    Ok(purchases > 0)
}

fn review_from_entity(model: ReviewModel) -> Review {
    Review {
        id: model.id,
        user_id: model.user_id,
        menu_id: model.menu_id,
        rating: model.rating,
        comment: model.comment,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

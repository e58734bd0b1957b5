use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::auth::UpdateRoleRequest,
    entity::users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    error::{AppError, AppResult},
    models::{Role, User},
    response::{ApiResponse, Meta},
    services::{auth_service::user_from_entity, require_text},
    state::AppState,
};

pub async fn list_users(state: &AppState) -> AppResult<ApiResponse<Vec<User>>> {
    let users = Users::find()
        .order_by_desc(UserCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(user_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    let meta = Meta::total(users.len());
    Ok(ApiResponse::success("Users", users, Some(meta)))
}

pub async fn update_role(
    state: &AppState,
    id: Uuid,
    payload: UpdateRoleRequest,
) -> AppResult<ApiResponse<User>> {
    let role = require_text(payload.role, "Missing role")?.parse::<Role>()?;
    if role == Role::Guest {
        return Err(AppError::BadRequest(
            "registered users cannot be demoted to guest".into(),
        ));
    }

    let existing = Users::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(u) => u,
        None => return Err(AppError::NotFound("User not found".into())),
    };

    let mut active: UserActive = existing.into();
    active.role = Set(role.as_str().to_string());
    let user = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.orm,
        None,
        "user_role_update",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id, "role": user.role })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Role updated",
        user_from_entity(user)?,
        Some(Meta::empty()),
    ))
}

pub async fn delete_user(state: &AppState, id: Uuid) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Users::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("User not found".into()));
    }

    if let Err(err) = log_audit(
        &state.orm,
        None,
        "user_delete",
        Some("users"),
        Some(serde_json::json!({ "user_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "User deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

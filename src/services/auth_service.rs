use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::Utc;
use password_hash::rand_core::OsRng;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set,
    sea_query::OnConflict,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::auth::{LoginRequest, SignupRequest},
    entity::{
        guests::{ActiveModel as GuestActive, Column as GuestCol, Entity as Guests},
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users, Model as UserModel},
    },
    error::{AppError, AppResult},
    models::{CartOwnerId, Role, User, parse_stored},
    response::{ApiResponse, Meta},
    services::{require, require_text},
    state::AppState,
};

pub async fn signup(state: &AppState, payload: SignupRequest) -> AppResult<ApiResponse<User>> {
    let username = require_text(payload.username, "Missing required fields")?;
    let email = require_text(payload.email, "Missing required fields")?;
    let password = require(payload.password.filter(|p| !p.is_empty()), "Missing required fields")?;

    let role = match payload.role.as_deref().filter(|r| !r.is_empty()) {
        Some(raw) => raw.parse::<Role>()?,
        None => Role::User,
    };
    if role == Role::Guest {
        return Err(AppError::BadRequest(
            "guest identities are provisioned, not signed up".into(),
        ));
    }

    let exist = Users::find()
        .filter(UserCol::Username.eq(username.as_str()))
        .one(&state.orm)
        .await?;
    if exist.is_some() {
        return Err(AppError::Conflict("Username is already taken".into()));
    }

    let password_hash = hash_password(&password)?;

    let user = UserActive {
        id: Set(Uuid::new_v4()),
        username: Set(username),
        email: Set(email),
        password_hash: Set(password_hash),
        role: Set(role.as_str().to_string()),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.orm,
        Some(user.id),
        "user_signup",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "User created",
        user_from_entity(user)?,
        Some(Meta::empty()),
    ))
}

pub async fn login(state: &AppState, payload: LoginRequest) -> AppResult<ApiResponse<User>> {
    let username = require_text(payload.username, "Missing username or password")?;
    let password = require(
        payload.password.filter(|p| !p.is_empty()),
        "Missing username or password",
    )?;

    let user = Users::find()
        .filter(UserCol::Username.eq(username.as_str()))
        .one(&state.orm)
        .await?;
    let user = match user {
        Some(u) => u,
        None => return Err(AppError::Unauthorized),
    };

    if !verify_password(&password, &user.password_hash)? {
        return Err(AppError::Unauthorized);
    }

    if let Err(err) = log_audit(
        &state.orm,
        Some(user.id),
        "user_login",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Logged in",
        user_from_entity(user)?,
        Some(Meta::empty()),
    ))
}

/// Resolve the guest identity for `token`, creating it on first use.
///
/// Safe under concurrent calls with the same token: the unique index on
/// `guests.token` turns a lost insert race into a no-op, and the follow-up
/// lookup returns whichever row won.
pub async fn ensure_guest<C: ConnectionTrait>(db: &C, token: &str) -> AppResult<CartOwnerId> {
    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::BadRequest("Missing guest token".into()));
    }

    if let Some(guest) = find_guest(db, token).await? {
        return Ok(CartOwnerId(guest));
    }

    let inserted = Guests::insert(GuestActive {
        id: Set(Uuid::new_v4()),
        token: Set(token.to_string()),
        created_at: Set(Utc::now().into()),
    })
    .on_conflict(OnConflict::column(GuestCol::Token).do_nothing().to_owned())
    .exec(db)
    .await;
    match inserted {
        Ok(_) | Err(DbErr::RecordNotInserted) => {}
        Err(err) => return Err(err.into()),
    }

    let guest = find_guest(db, token).await?.ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!("guest for token {token:?} missing after insert"))
    })?;
    tracing::debug!(guest_id = %guest, "guest provisioned");
    Ok(CartOwnerId(guest))
}

async fn find_guest<C: ConnectionTrait>(db: &C, token: &str) -> AppResult<Option<Uuid>> {
    let guest = Guests::find()
        .filter(GuestCol::Token.eq(token))
        .one(db)
        .await?;
    Ok(guest.map(|g| g.id))
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub(crate) fn user_from_entity(model: UserModel) -> AppResult<User> {
    Ok(User {
        id: model.id,
        username: model.username,
        email: model.email,
        role: parse_stored(&model.role)?,
        created_at: model.created_at.with_timezone(&Utc),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashed_password_verifies() {
        let hash = hash_password("s3cret").unwrap();
        assert_ne!(hash, "s3cret");
        assert!(verify_password("s3cret", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn malformed_hash_is_internal() {
        assert!(matches!(
            verify_password("x", "not-a-phc-string"),
            Err(AppError::Internal(_))
        ));
    }
}

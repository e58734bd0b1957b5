#![allow(dead_code)]

use std::path::PathBuf;

use chrono::Utc;
use foodieflow_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::{menu_items::ActiveModel as MenuActive, users::ActiveModel as UserActive},
    services::auth_service::hash_password,
    state::AppState,
};
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

/// Fresh in-memory database with the real schema applied.
///
/// One connection only: every pooled connection to `sqlite::memory:` would
/// otherwise see its own empty database.
pub async fn setup_state() -> anyhow::Result<AppState> {
    let config = AppConfig {
        database_url: "sqlite::memory:".into(),
        host: "127.0.0.1".into(),
        port: 0,
        db_max_connections: 1,
        db_connect_timeout_secs: 5,
    };
    let orm = create_orm_conn(&config).await?;
    run_migrations(&orm).await?;
    Ok(AppState { orm })
}

/// File-backed database shared by `connections` pooled connections.
///
/// Returns the file path so the caller can remove it afterwards.
pub async fn setup_file_state(connections: u32) -> anyhow::Result<(AppState, PathBuf)> {
    let path = std::env::temp_dir().join(format!("foodieflow-{}.db", Uuid::new_v4()));
    let config = AppConfig {
        database_url: format!("sqlite://{}?mode=rwc", path.display()),
        host: "127.0.0.1".into(),
        port: 0,
        db_max_connections: connections,
        db_connect_timeout_secs: 5,
    };
    let orm = create_orm_conn(&config).await?;
    run_migrations(&orm).await?;
    Ok((AppState { orm }, path))
}

pub async fn create_user(state: &AppState, username: &str) -> anyhow::Result<Uuid> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        username: Set(username.to_string()),
        email: Set(format!("{username}@example.com")),
        password_hash: Set(hash_password("password")?),
        role: Set("user".into()),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    Ok(user.id)
}

pub async fn create_menu_item(
    state: &AppState,
    name: &str,
    price_cents: i64,
) -> anyhow::Result<Uuid> {
    let item = MenuActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        category: Set("Mains".into()),
        price_cents: Set(price_cents),
        description: Set(String::new()),
        image: Set(String::new()),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    Ok(item.id)
}

/// Keeps timestamp ordering unambiguous between consecutive writes.
pub async fn tick() {
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
}

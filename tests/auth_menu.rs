mod common;

use std::str::FromStr;

use common::setup_state;
use foodieflow_api::{
    dto::{
        auth::{LoginRequest, SignupRequest, UpdateRoleRequest},
        menu::{CreateMenuItemRequest, MenuQuery, UpdateMenuItemRequest},
    },
    entity::AuditLogs,
    error::AppError,
    models::Role,
    services::{auth_service, menu_service, user_service},
};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

fn signup(username: &str, password: &str) -> SignupRequest {
    SignupRequest {
        username: Some(username.into()),
        email: Some(format!("{username}@example.com")),
        password: Some(password.into()),
        role: None,
    }
}

fn login(username: &str, password: &str) -> LoginRequest {
    LoginRequest {
        username: Some(username.into()),
        password: Some(password.into()),
    }
}

fn menu_item(name: &str, category: &str, price: &str, image: &str) -> CreateMenuItemRequest {
    CreateMenuItemRequest {
        name: Some(name.into()),
        category: Some(category.into()),
        price: Some(Decimal::from_str(price).unwrap()),
        description: None,
        image: Some(image.into()),
    }
}

#[tokio::test]
async fn signup_then_login_returns_the_identity() -> anyhow::Result<()> {
    let state = setup_state().await?;

    let created = auth_service::signup(&state, signup("ana", "hunter2"))
        .await?
        .data
        .unwrap();
    assert_eq!(created.role, Role::User);

    let logged_in = auth_service::login(&state, login("ana", "hunter2"))
        .await?
        .data
        .unwrap();
    assert_eq!(logged_in.id, created.id);
    assert_eq!(logged_in.email, "ana@example.com");

    let json = serde_json::to_value(&logged_in)?;
    assert!(json.get("password_hash").is_none());

    let audited = AuditLogs::find()
        .filter(foodieflow_api::entity::audit_logs::Column::ActorId.eq(created.id))
        .count(&state.orm)
        .await?;
    assert_eq!(audited, 2);
    Ok(())
}

#[tokio::test]
async fn bad_credentials_are_unauthorized() -> anyhow::Result<()> {
    let state = setup_state().await?;
    auth_service::signup(&state, signup("ana", "hunter2")).await?;

    let wrong_password = auth_service::login(&state, login("ana", "nope")).await;
    assert!(matches!(wrong_password, Err(AppError::Unauthorized)));

    let unknown_user = auth_service::login(&state, login("bob", "hunter2")).await;
    assert!(matches!(unknown_user, Err(AppError::Unauthorized)));
    Ok(())
}

#[tokio::test]
async fn signup_rejects_duplicates_and_guest_role() -> anyhow::Result<()> {
    let state = setup_state().await?;
    auth_service::signup(&state, signup("ana", "hunter2")).await?;

    let duplicate = auth_service::signup(&state, signup("ana", "other")).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let guest = auth_service::signup(
        &state,
        SignupRequest {
            role: Some("guest".into()),
            ..signup("kiosk", "x")
        },
    )
    .await;
    assert!(matches!(guest, Err(AppError::BadRequest(_))));

    let missing = auth_service::signup(
        &state,
        SignupRequest {
            email: None,
            ..signup("carl", "x")
        },
    )
    .await;
    assert!(matches!(missing, Err(AppError::BadRequest(_))));
    Ok(())
}

#[tokio::test]
async fn admins_manage_roles_and_accounts() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let ana = auth_service::signup(&state, signup("ana", "hunter2"))
        .await?
        .data
        .unwrap();

    let promoted = user_service::update_role(
        &state,
        ana.id,
        UpdateRoleRequest {
            role: Some("admin".into()),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(promoted.role, Role::Admin);

    let missing = user_service::update_role(
        &state,
        Uuid::new_v4(),
        UpdateRoleRequest {
            role: Some("user".into()),
        },
    )
    .await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    assert_eq!(user_service::list_users(&state).await?.data.unwrap().len(), 1);
    user_service::delete_user(&state, ana.id).await?;
    let again = user_service::delete_user(&state, ana.id).await;
    assert!(matches!(again, Err(AppError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn menu_images_must_be_absolute_urls() -> anyhow::Result<()> {
    let state = setup_state().await?;

    let relative = menu_service::create_menu_item(
        &state,
        menu_item("Pizza", "Pizza", "9.99", "/img/pizza.png"),
    )
    .await;
    assert!(matches!(relative, Err(AppError::BadRequest(_))));

    let item = menu_service::create_menu_item(
        &state,
        menu_item("Pizza", "Pizza", "9.99", "https://cdn.example.com/pizza.png"),
    )
    .await?
    .data
    .unwrap();
    assert_eq!(item.price.to_string(), "9.99");

    let bad_update = menu_service::update_menu_item(
        &state,
        item.id,
        UpdateMenuItemRequest {
            image: Some("ftp://example.com/pizza.png".into()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(bad_update, Err(AppError::BadRequest(_))));
    Ok(())
}

#[tokio::test]
async fn menu_filters_by_category_and_name() -> anyhow::Result<()> {
    let state = setup_state().await?;
    for (name, category) in [
        ("Margherita", "Pizza"),
        ("Pepperoni", "Pizza"),
        ("Pepper Salad", "Salads"),
    ] {
        menu_service::create_menu_item(&state, menu_item(name, category, "5.00", "")).await?;
    }

    let pizzas = menu_service::list_menu(
        &state,
        MenuQuery {
            category: Some("Pizza".into()),
            q: None,
        },
    )
    .await?
    .data
    .unwrap();
    let names: Vec<&str> = pizzas.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Margherita", "Pepperoni"]);

    let peppers = menu_service::list_menu(
        &state,
        MenuQuery {
            category: None,
            q: Some("Pepper".into()),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(peppers.len(), 2);
    Ok(())
}

#[tokio::test]
async fn menu_item_lifecycle_reports_missing_items() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let item = menu_service::create_menu_item(&state, menu_item("Soda", "Drinks", "2.50", ""))
        .await?
        .data
        .unwrap();

    let negative = menu_service::update_menu_item(
        &state,
        item.id,
        UpdateMenuItemRequest {
            price: Some(Decimal::from_str("-2.50").unwrap()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(negative, Err(AppError::BadRequest(_))));

    menu_service::delete_menu_item(&state, item.id).await?;

    let gone = menu_service::get_menu_item(&state, item.id).await;
    assert!(matches!(gone, Err(AppError::NotFound(_))));
    let update_gone = menu_service::update_menu_item(&state, item.id, UpdateMenuItemRequest::default()).await;
    assert!(matches!(update_gone, Err(AppError::NotFound(_))));
    Ok(())
}

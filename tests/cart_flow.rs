mod common;

use common::{create_menu_item, create_user, setup_file_state, setup_state, tick};
use foodieflow_api::{
    dto::cart::{AddToCartRequest, SetQuantityRequest},
    entity::{CartItems, Guests, MenuItems},
    error::AppError,
    models::CartOwner,
    services::cart_service,
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use tokio::task::JoinSet;
use uuid::Uuid;

fn add(menu_id: Uuid, quantity: i32) -> AddToCartRequest {
    AddToCartRequest {
        menu_id: Some(menu_id),
        quantity: Some(quantity),
    }
}

#[tokio::test]
async fn adding_the_same_item_twice_accumulates_one_line() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let user_id = create_user(&state, "ana").await?;
    let burger = create_menu_item(&state, "Burger", 850).await?;
    let owner = CartOwner::Registered(user_id);

    cart_service::add_item(&state, &owner, add(burger, 2)).await?;
    let second = cart_service::add_item(&state, &owner, add(burger, 3)).await?;
    assert_eq!(second.data.unwrap().quantity, 5);

    let cart = cart_service::get_cart(&state, &owner).await?.data.unwrap();
    assert_eq!(cart.owner_id.0, user_id);
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, 5);
    assert_eq!(cart.items[0].menu_name.as_deref(), Some("Burger"));
    assert_eq!(CartItems::find().count(&state.orm).await?, 1);

    Ok(())
}

#[tokio::test]
async fn add_rejects_bad_input() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let user_id = create_user(&state, "ana").await?;
    let burger = create_menu_item(&state, "Burger", 850).await?;
    let owner = CartOwner::Registered(user_id);

    let missing = cart_service::add_item(
        &state,
        &owner,
        AddToCartRequest {
            menu_id: Some(burger),
            quantity: None,
        },
    )
    .await;
    assert!(matches!(missing, Err(AppError::BadRequest(_))));

    let zero = cart_service::add_item(&state, &owner, add(burger, 0)).await;
    assert!(matches!(zero, Err(AppError::BadRequest(_))));

    let unknown = cart_service::add_item(&state, &owner, add(Uuid::new_v4(), 1)).await;
    assert!(matches!(unknown, Err(AppError::BadRequest(_))));

    assert_eq!(CartItems::find().count(&state.orm).await?, 0);
    Ok(())
}

#[tokio::test]
async fn setting_zero_removes_the_line_and_repeating_is_a_no_op() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let user_id = create_user(&state, "ana").await?;
    let fries = create_menu_item(&state, "Fries", 450).await?;
    let owner = CartOwner::Registered(user_id);

    cart_service::add_item(&state, &owner, add(fries, 1)).await?;

    for _ in 0..2 {
        cart_service::set_quantity(
            &state,
            &owner,
            fries,
            SetQuantityRequest { quantity: Some(0) },
        )
        .await?;
        let cart = cart_service::get_cart(&state, &owner).await?.data.unwrap();
        assert!(cart.items.is_empty());
    }

    Ok(())
}

#[tokio::test]
async fn set_quantity_overwrites_but_never_creates() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let user_id = create_user(&state, "ana").await?;
    let fries = create_menu_item(&state, "Fries", 450).await?;
    let soda = create_menu_item(&state, "Soda", 250).await?;
    let owner = CartOwner::Registered(user_id);

    cart_service::add_item(&state, &owner, add(fries, 1)).await?;
    cart_service::set_quantity(&state, &owner, fries, SetQuantityRequest { quantity: Some(7) })
        .await?;
    cart_service::set_quantity(&state, &owner, soda, SetQuantityRequest { quantity: Some(2) })
        .await?;

    let cart = cart_service::get_cart(&state, &owner).await?.data.unwrap();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].menu_id, fries);
    assert_eq!(cart.items[0].quantity, 7);

    let missing = cart_service::set_quantity(&state, &owner, fries, SetQuantityRequest { quantity: None }).await;
    assert!(matches!(missing, Err(AppError::BadRequest(_))));
    Ok(())
}

#[tokio::test]
async fn strict_remove_reports_missing_lines_but_lenient_remove_does_not() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let user_id = create_user(&state, "ana").await?;
    let pizza = create_menu_item(&state, "Pizza", 999).await?;
    let owner = CartOwner::Registered(user_id);

    cart_service::add_item(&state, &owner, add(pizza, 1)).await?;
    cart_service::remove_item_strict(&state, user_id, pizza).await?;

    let again = cart_service::remove_item_strict(&state, user_id, pizza).await;
    assert!(matches!(again, Err(AppError::NotFound(_))));

    cart_service::remove_item(&state, &owner, pizza).await?;
    cart_service::remove_item(&state, &owner, pizza).await?;
    Ok(())
}

#[tokio::test]
async fn cart_lists_newest_first_and_survives_catalog_deletion() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let user_id = create_user(&state, "ana").await?;
    let pizza = create_menu_item(&state, "Pizza", 999).await?;
    let salad = create_menu_item(&state, "Salad", 725).await?;
    let owner = CartOwner::Registered(user_id);

    cart_service::add_item(&state, &owner, add(pizza, 1)).await?;
    tick().await;
    cart_service::add_item(&state, &owner, add(salad, 1)).await?;

    MenuItems::delete_by_id(pizza)
        .exec(&state.orm)
        .await?;

    let cart = cart_service::get_cart(&state, &owner).await?.data.unwrap();
    assert_eq!(cart.items.len(), 2);
    assert_eq!(cart.items[0].menu_id, salad);
    assert_eq!(cart.items[1].menu_id, pizza);
    assert!(cart.items[1].menu_name.is_none());
    assert!(cart.items[1].menu_price.is_none());
    Ok(())
}

#[tokio::test]
async fn clear_cart_always_succeeds() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let user_id = create_user(&state, "ana").await?;
    let pizza = create_menu_item(&state, "Pizza", 999).await?;
    let owner = CartOwner::Registered(user_id);

    cart_service::add_item(&state, &owner, add(pizza, 3)).await?;
    cart_service::clear_cart(&state, &owner).await?;
    cart_service::clear_cart(&state, &owner).await?;

    let cart = cart_service::get_cart(&state, &owner).await?.data.unwrap();
    assert!(cart.items.is_empty());
    Ok(())
}

#[tokio::test]
async fn guest_token_resolves_to_one_guest() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let owner = CartOwner::guest("tab-42");

    let first = cart_service::get_cart(&state, &owner).await?.data.unwrap();
    let second = cart_service::get_cart(&state, &owner).await?.data.unwrap();

    assert_eq!(first.owner_id, second.owner_id);
    assert_eq!(Guests::find().count(&state.orm).await?, 1);

    let other = cart_service::get_cart(&state, &CartOwner::guest("tab-43"))
        .await?
        .data
        .unwrap();
    assert_ne!(other.owner_id, first.owner_id);
    Ok(())
}

#[tokio::test]
async fn blank_guest_token_is_rejected() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let result = cart_service::get_cart(&state, &CartOwner::guest("  ")).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
    assert_eq!(Guests::find().count(&state.orm).await?, 0);
    Ok(())
}

#[tokio::test]
async fn guest_cart_behaves_like_a_user_cart() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let fries = create_menu_item(&state, "Fries", 450).await?;
    let owner = CartOwner::guest("kiosk-1");

    cart_service::add_item(&state, &owner, add(fries, 1)).await?;
    cart_service::add_item(&state, &owner, add(fries, 1)).await?;
    let cart = cart_service::get_cart(&state, &owner).await?.data.unwrap();
    assert_eq!(cart.items[0].quantity, 2);

    cart_service::remove_item(&state, &owner, fries).await?;
    let cart = cart_service::get_cart(&state, &owner).await?.data.unwrap();
    assert!(cart.items.is_empty());
    Ok(())
}

#[tokio::test]
async fn merging_a_guest_cart_adds_quantities_and_empties_it() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let user_id = create_user(&state, "ana").await?;
    let pizza = create_menu_item(&state, "Pizza", 999).await?;
    let soda = create_menu_item(&state, "Soda", 250).await?;
    let user = CartOwner::Registered(user_id);
    let guest = CartOwner::guest("before-login");

    cart_service::add_item(&state, &user, add(pizza, 1)).await?;
    cart_service::add_item(&state, &guest, add(pizza, 2)).await?;
    cart_service::add_item(&state, &guest, add(soda, 4)).await?;

    let merged = cart_service::merge_guest_cart(&state, "before-login", user_id)
        .await?
        .data
        .unwrap();
    assert_eq!(merged.owner_id.0, user_id);
    assert_eq!(merged.items.len(), 2);

    let quantity_of = |menu_id: Uuid| {
        merged
            .items
            .iter()
            .find(|line| line.menu_id == menu_id)
            .map(|line| line.quantity)
    };
    assert_eq!(quantity_of(pizza), Some(3));
    assert_eq!(quantity_of(soda), Some(4));

    let guest_cart = cart_service::get_cart(&state, &guest).await?.data.unwrap();
    assert!(guest_cart.items.is_empty());
    Ok(())
}

#[tokio::test]
async fn adding_past_the_quantity_limit_is_rejected() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let user_id = create_user(&state, "ana").await?;
    let fries = create_menu_item(&state, "Fries", 450).await?;
    let owner = CartOwner::Registered(user_id);

    cart_service::add_item(&state, &owner, add(fries, i32::MAX)).await?;
    let overflow = cart_service::add_item(&state, &owner, add(fries, 1)).await;
    assert!(matches!(overflow, Err(AppError::BadRequest(_))));

    let cart = cart_service::get_cart(&state, &owner).await?.data.unwrap();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, i32::MAX);
    Ok(())
}

#[tokio::test]
async fn merging_into_an_unknown_user_keeps_the_guest_cart() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let pizza = create_menu_item(&state, "Pizza", 999).await?;
    let guest = CartOwner::guest("tok");
    cart_service::add_item(&state, &guest, add(pizza, 2)).await?;

    let unknown = cart_service::merge_guest_cart(&state, "tok", Uuid::new_v4()).await;
    assert!(matches!(unknown, Err(AppError::NotFound(_))));

    let cart = cart_service::get_cart(&state, &guest).await?.data.unwrap();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, 2);
    Ok(())
}

#[tokio::test]
async fn merging_a_guest_cart_into_itself_keeps_it() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let pizza = create_menu_item(&state, "Pizza", 999).await?;
    let guest = CartOwner::guest("tok");
    cart_service::add_item(&state, &guest, add(pizza, 2)).await?;

    let guest_id = cart_service::resolve_owner(&state.orm, &guest).await?;
    let merged = cart_service::merge_guest_cart(&state, "tok", guest_id.0).await;
    assert!(merged.is_err());

    let lines = CartItems::find()
        .filter(foodieflow_api::entity::cart_items::Column::OwnerId.eq(guest_id.0))
        .all(&state.orm)
        .await?;
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].quantity, 2);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_contact_provisions_one_guest() -> anyhow::Result<()> {
    let (state, path) = setup_file_state(4).await?;

    let mut tasks = JoinSet::new();
    for _ in 0..8 {
        let state = state.clone();
        tasks.spawn(async move {
            cart_service::get_cart(&state, &CartOwner::guest("same"))
                .await
                .map(|resp| resp.data.map(|cart| cart.owner_id))
        });
    }

    let mut owners = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        owners.push(joined??);
    }
    assert_eq!(owners.len(), 8);
    assert!(owners.iter().all(|owner| owner.is_some() && *owner == owners[0]));
    assert_eq!(Guests::find().count(&state.orm).await?, 1);

    drop(state);
    let _ = std::fs::remove_file(path);
    Ok(())
}

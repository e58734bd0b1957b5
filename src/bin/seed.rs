use chrono::Utc;
use foodieflow_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::{
        menu_items::{ActiveModel as MenuActive, Column as MenuCol, Entity as MenuItems},
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    },
    models::Role,
    services::auth_service::hash_password,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config).await?;
    run_migrations(&orm).await?;

    let admin_id = ensure_user(&orm, "admin", "admin@example.com", "admin123", Role::Admin).await?;
    let user_id = ensure_user(&orm, "user", "user@example.com", "user123", Role::User).await?;
    seed_menu(&orm).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    orm: &DatabaseConnection,
    username: &str,
    email: &str,
    password: &str,
    role: Role,
) -> anyhow::Result<Uuid> {
    let existing = Users::find()
        .filter(UserCol::Username.eq(username))
        .one(orm)
        .await?;
    if let Some(user) = existing {
        println!("User {username} already exists");
        return Ok(user.id);
    }

    let password_hash = hash_password(password)?;
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        username: Set(username.to_string()),
        email: Set(email.to_string()),
        password_hash: Set(password_hash),
        role: Set(role.as_str().to_string()),
        created_at: Set(Utc::now().into()),
    }
    .insert(orm)
    .await?;

    println!("Ensured user {username} (role={role})");
    Ok(user.id)
}

async fn seed_menu(orm: &DatabaseConnection) -> anyhow::Result<()> {
    let items = vec![
        ("Margherita Pizza", "Pizza", 999, "Tomato, mozzarella and basil", "https://images.example.com/margherita.jpg"),
        ("Pepperoni Pizza", "Pizza", 1199, "Spicy pepperoni on a cheese base", "https://images.example.com/pepperoni.jpg"),
        ("Classic Burger", "Burgers", 850, "Beef patty, cheddar, pickles", "https://images.example.com/burger.jpg"),
        ("Caesar Salad", "Salads", 725, "Romaine, parmesan, croutons", ""),
        ("French Fries", "Sides", 450, "Crispy salted fries", ""),
        ("Lemonade", "Drinks", 325, "Fresh squeezed", ""),
    ];

    let mut created = 0;
    for (name, category, price_cents, description, image) in items {
        let existing = MenuItems::find()
            .filter(MenuCol::Name.eq(name))
            .one(orm)
            .await?;
        if existing.is_some() {
            continue;
        }

        MenuActive {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            category: Set(category.to_string()),
            price_cents: Set(price_cents),
            description: Set(description.to_string()),
            image: Set(image.to_string()),
            created_at: Set(Utc::now().into()),
        }
        .insert(orm)
        .await?;
        created += 1;
    }

    println!("Seeded {created} menu items");
    Ok(())
}

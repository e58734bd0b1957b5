use foodieflow_api::{config::AppConfig, db::create_orm_conn, migration::Migrator};
use sea_orm_migration::MigratorTrait;

/// `migrate` applies pending migrations; `migrate down` rolls back the latest one.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    let orm = create_orm_conn(&config).await?;

    match std::env::args().nth(1).as_deref() {
        None | Some("up") => {
            Migrator::up(&orm, None).await?;
            println!("Migrations applied");
        }
        Some("down") => {
            Migrator::down(&orm, Some(1)).await?;
            println!("Rolled back latest migration");
        }
        Some(other) => anyhow::bail!("unknown command {other:?}, expected `up` or `down`"),
    }
    Ok(())
}

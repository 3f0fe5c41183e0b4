use storefront_api::{
    config::AppConfig,
    db::{DbPool, create_pool, run_migrations},
    state::AppState,
};
use uuid::Uuid;

const STARTER_CATEGORIES: [&str; 5] = ["Electronics", "Books", "Clothing", "Home & Kitchen", "Toys"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let state = AppState::new(create_pool(&config.database_url).await?);
    // Ensure migrations are applied.
    run_migrations(&state.orm).await?;

    let inserted = seed_categories(&state.pool).await?;
    println!("Seed completed. {inserted} new categories");
    Ok(())
}

async fn seed_categories(pool: &DbPool) -> anyhow::Result<u64> {
    let mut inserted = 0;
    for name in STARTER_CATEGORIES {
        // Category names are not unique in the schema, so skip by lookup.
        let result = sqlx::query(
            r#"
            INSERT INTO categories (id, name)
            SELECT $1, $2
            WHERE NOT EXISTS (SELECT 1 FROM categories WHERE name = $2)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            println!("Seeded category {name}");
        }
        inserted += result.rows_affected();
    }
    Ok(inserted)
}

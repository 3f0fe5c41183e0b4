use storefront_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    let state = AppState::new(create_pool(&config.database_url).await?);
    run_migrations(&state.orm).await?;
    println!("Migrations applied");
    Ok(())
}

use coffee_checkout::auth::TokenVerifier;
use coffee_checkout::config::AppConfig;
use coffee_checkout::{build_server, create_pool, run_migrations, AppState};
use dotenvy::dotenv;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().unwrap_or_else(|e| {
        log::error!("invalid configuration: {e}");
        std::process::exit(1);
    });

    let pool = create_pool(&config.database_url, config.db_pool_size)
        .map_err(|e| std::io::Error::other(format!("database pool: {e}")))?;
    run_migrations(&pool).map_err(|e| std::io::Error::other(format!("migrations: {e}")))?;

    log::info!(
        "Starting server at http://{}:{} (tax rate {})",
        config.host,
        config.port,
        config.tax_rate.as_decimal()
    );

    let state = AppState::postgres(pool, config.tax_rate);
    let verifier = TokenVerifier::new(&config.app_secret);
    build_server(state, verifier, &config.host, config.port)?.await
}

pub mod application;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod openapi;
pub mod response;
pub mod schema;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use application::cart_service::CartService;
use application::checkout_service::CheckoutService;
use application::transaction_service::TransactionService;
use auth::TokenVerifier;
use domain::pricing::TaxRate;
use infrastructure::cart_repo::DieselCartRepository;
use infrastructure::catalog_repo::DieselCatalogRepository;
use infrastructure::memory::InMemoryStore;
use infrastructure::transaction_repo::DieselTransactionRepository;

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    conn.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

/// The services behind the HTTP handlers, wired to one storage backend.
pub struct AppState {
    pub carts: CartService,
    pub checkout: CheckoutService,
    pub transactions: TransactionService,
}

impl AppState {
    pub fn postgres(pool: DbPool, tax_rate: TaxRate) -> Self {
        let catalog = Arc::new(DieselCatalogRepository::new(pool.clone()));
        let carts = Arc::new(DieselCartRepository::new(pool.clone()));
        let transactions = Arc::new(DieselTransactionRepository::new(pool));

        Self {
            carts: CartService::new(carts.clone()),
            checkout: CheckoutService::new(
                catalog.clone(),
                catalog,
                carts,
                transactions.clone(),
                tax_rate,
            ),
            transactions: TransactionService::new(transactions),
        }
    }

    pub fn in_memory(store: Arc<InMemoryStore>, tax_rate: TaxRate) -> Self {
        Self {
            carts: CartService::new(store.clone()),
            checkout: CheckoutService::new(
                store.clone(),
                store.clone(),
                store.clone(),
                store.clone(),
                tax_rate,
            ),
            transactions: TransactionService::new(store),
        }
    }
}

/// Registers the extractor configs and every route.
///
/// `/transactions/history` is registered ahead of `/transactions/{id}` so the
/// literal segment wins.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(handlers::json_config())
        .app_data(handlers::path_config())
        .app_data(handlers::query_config())
        .route("/", web::get().to(handlers::health))
        .service(
            web::scope("/cart")
                .route("", web::post().to(handlers::cart::add_to_cart))
                .route("", web::get().to(handlers::cart::get_cart))
                .route("/{id}", web::delete().to(handlers::cart::delete_cart_item)),
        )
        .service(
            web::scope("/transactions")
                .route("", web::post().to(handlers::transactions::create_transaction))
                .route("", web::get().to(handlers::transactions::list_transactions))
                .route(
                    "/history",
                    web::get().to(handlers::transactions::transaction_history),
                )
                .route(
                    "/history/{id}",
                    web::get().to(handlers::transactions::transaction_history_detail),
                )
                .route("/{id}", web::get().to(handlers::transactions::get_transaction))
                .route(
                    "/{id}",
                    web::delete().to(handlers::transactions::delete_transaction),
                )
                .route(
                    "/{id}/status",
                    web::patch().to(handlers::transactions::update_transaction_status),
                ),
        );
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: AppState,
    verifier: TokenVerifier,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let state = web::Data::new(state);
    let verifier = web::Data::new(verifier);

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(verifier.clone())
            .wrap(Logger::default())
            .configure(configure)
    })
    .bind((host.to_string(), port))?
    .run())
}

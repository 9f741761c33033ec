//! Canopy API Server
//!
//! Backend of the Canopy tree-planting marketplace: buyers fund plantings
//! and earn Green Tokens, field brigades validate the trees, and each
//! validated tree backs one Seed Token.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post},
    Json, Router,
};
use sea_orm::Database;
use serde::Serialize;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod auth;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{
    PostgresBrigadeRepository, PostgresMintRepository, PostgresOrderRepository,
    PostgresPaymentRepository, PostgresProductRepository, PostgresProjectRepository,
    PostgresSpeciesRepository, PostgresTreeRepository, PostgresUserRepository,
    PostgresWalletRepository, StubChainClient,
};
use app::{
    AuthService, BrigadeService, CatalogService, ConversionService, EsgService, MintService,
    OrderService, WalletService,
};
use config::Config;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService<PostgresUserRepository, PostgresWalletRepository>>,
    pub catalog_service: Arc<
        CatalogService<
            PostgresSpeciesRepository,
            PostgresProductRepository,
            PostgresProjectRepository,
        >,
    >,
    pub order_service: Arc<
        OrderService<
            PostgresOrderRepository,
            PostgresProductRepository,
            PostgresProjectRepository,
            PostgresTreeRepository,
            PostgresWalletRepository,
            PostgresPaymentRepository,
        >,
    >,
    pub wallet_service: Arc<WalletService<PostgresWalletRepository, PostgresUserRepository>>,
    pub conversion_service: Arc<
        ConversionService<PostgresWalletRepository, PostgresMintRepository, StubChainClient>,
    >,
    pub mint_service: Arc<
        MintService<
            PostgresTreeRepository,
            PostgresWalletRepository,
            PostgresMintRepository,
            StubChainClient,
        >,
    >,
    pub brigade_service: Arc<
        BrigadeService<PostgresBrigadeRepository, PostgresUserRepository, PostgresTreeRepository>,
    >,
    pub esg_service: Arc<EsgService<PostgresTreeRepository, PostgresWalletRepository>>,
    pub config: Config,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,canopy_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Canopy API...");

    // Load configuration
    let config = Config::from_env();
    if !config.stripe_webhooks_enabled() {
        tracing::warn!("STRIPE_WEBHOOK_SECRET not set; webhook signatures will not be verified");
    }

    // Connect to PostgreSQL
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connected");

    // Create adapters
    let user_repo = Arc::new(PostgresUserRepository::new(db.clone()));
    let wallet_repo = Arc::new(PostgresWalletRepository::new(db.clone()));
    let species_repo = Arc::new(PostgresSpeciesRepository::new(db.clone()));
    let product_repo = Arc::new(PostgresProductRepository::new(db.clone()));
    let project_repo = Arc::new(PostgresProjectRepository::new(db.clone()));
    let tree_repo = Arc::new(PostgresTreeRepository::new(db.clone()));
    let order_repo = Arc::new(PostgresOrderRepository::new(db.clone()));
    let payment_repo = Arc::new(PostgresPaymentRepository::new(db.clone()));
    let brigade_repo = Arc::new(PostgresBrigadeRepository::new(db.clone()));
    let mint_repo = Arc::new(PostgresMintRepository::new(db.clone()));

    // The chain integration is a stub until the listener ships
    let chain_client = Arc::new(StubChainClient);

    // Create application services
    let auth_service = Arc::new(AuthService::new(
        user_repo.clone(),
        wallet_repo.clone(),
        config.token_secret.clone(),
        config.token_ttl_secs,
    ));

    let catalog_service = Arc::new(CatalogService::new(
        species_repo.clone(),
        product_repo.clone(),
        project_repo.clone(),
    ));

    let order_service = Arc::new(OrderService::new(
        order_repo.clone(),
        product_repo.clone(),
        project_repo.clone(),
        tree_repo.clone(),
        wallet_repo.clone(),
        payment_repo.clone(),
    ));

    let wallet_service = Arc::new(WalletService::new(wallet_repo.clone(), user_repo.clone()));

    let conversion_service = Arc::new(ConversionService::new(
        wallet_repo.clone(),
        mint_repo.clone(),
        chain_client.clone(),
        config.green_per_seed,
    ));

    let mint_service = Arc::new(MintService::new(
        tree_repo.clone(),
        wallet_repo.clone(),
        mint_repo.clone(),
        chain_client.clone(),
        config.api_base_url.clone(),
    ));

    let brigade_service = Arc::new(BrigadeService::new(
        brigade_repo.clone(),
        user_repo.clone(),
        tree_repo.clone(),
    ));

    let esg_service = Arc::new(EsgService::new(tree_repo.clone(), wallet_repo.clone()));

    // Create app state
    let state = AppState {
        auth_service,
        catalog_service,
        order_service,
        wallet_service,
        conversion_service,
        mint_service,
        brigade_service,
        esg_service,
        config: config.clone(),
    };

    // Rate limiting config: 2 req/sec sustained, burst of 5
    // Uses PeerIpKeyExtractor to get client IP from socket connection
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_second(2)
            .burst_size(5)
            .finish()
            .expect("Failed to build governor config"),
    );

    // Rate-limited routes (registration, login)
    let rate_limited_routes = Router::new()
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .layer(GovernorLayer {
            config: governor_config,
        });

    // Admin routes (auth + admin guard)
    let admin_routes = Router::new()
        .route("/species", post(handlers::create_species))
        .route("/species/:id/rate", patch(handlers::update_species_rate))
        .route("/products", post(handlers::create_product))
        .route("/products/all", get(handlers::list_all_products))
        .route("/products/:id/active", patch(handlers::set_product_active))
        .route("/projects", post(handlers::create_project))
        .route(
            "/projects/:id/status",
            patch(handlers::update_project_status),
        )
        .route("/wallet/grant", post(handlers::grant_green))
        .route("/brigades/:id/tasks", post(handlers::create_task))
        .route_layer(middleware::from_fn(auth::require_admin));

    // Field routes (auth + brigadist/admin guard)
    let field_routes = Router::new()
        .route("/trees/:id/validate", post(handlers::validate_tree))
        .route("/brigades", post(handlers::create_brigade))
        .route_layer(middleware::from_fn(auth::require_field_role));

    // Protected routes (any authenticated user)
    let protected_routes = Router::new()
        .route("/auth/me", get(handlers::me))
        // Orders
        .route("/orders", post(handlers::create_order))
        .route("/orders/my", get(handlers::my_orders))
        .route("/orders/:id", get(handlers::get_order))
        .route("/orders/:id/cancel", post(handlers::cancel_order))
        // Wallet and conversions
        .route("/wallet", get(handlers::get_wallet))
        .route("/conversions", post(handlers::convert))
        .route("/conversions/my", get(handlers::my_conversions))
        // Trees
        .route("/trees/my", get(handlers::my_trees))
        .route("/trees/:id/mint", post(handlers::mint_tree))
        // Brigades
        .route("/brigades/my", get(handlers::my_brigade))
        .route("/brigades/:id/members", post(handlers::add_member))
        .route("/brigades/:id/actions", post(handlers::log_action))
        .route("/brigades/:id/tasks", get(handlers::list_tasks))
        .route(
            "/brigades/tasks/:task_id/complete",
            post(handlers::complete_task),
        )
        // ESG
        .route("/esg/report", get(handlers::user_report))
        .merge(admin_routes)
        .merge(field_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    // Build router
    let app = Router::new()
        // Health check (no auth)
        .route("/health", get(health))
        // Webhooks (no auth, uses signature verification)
        .route("/webhooks/stripe", post(handlers::stripe_webhook))
        // Public catalog
        .route("/species", get(handlers::list_species))
        .route("/species/:id", get(handlers::get_species))
        .route("/products", get(handlers::list_products))
        .route("/products/:id", get(handlers::get_product))
        .route("/projects", get(handlers::list_projects))
        .route("/projects/:id", get(handlers::get_project))
        // Public trees
        .route("/trees", get(handlers::list_trees))
        .route("/trees/:id", get(handlers::get_tree))
        .route("/trees/:id/metadata", get(handlers::get_tree_metadata))
        // Public brigade reads
        .route("/brigades/:id", get(handlers::get_brigade))
        .route("/brigades/:id/members", get(handlers::list_members))
        .route("/brigades/:id/actions", get(handlers::list_actions))
        .route("/brigades/actions/nearby", get(handlers::actions_nearby))
        // Public project roll-ups
        .route("/esg/projects/:id", get(handlers::project_report))
        // Merge rate-limited routes
        .merge(rate_limited_routes)
        // Protected routes
        .merge(protected_routes)
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}

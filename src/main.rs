use axum::{
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inventory_api::audit::{AuditLogger, AuditStore, MemoryAuditStore, MySqlAuditStore};
use inventory_api::models::DatabaseConfig;
use inventory_api::session::{MemorySessionStorage, SessionManager};
use inventory_api::state::AppState;
use inventory_api::storage::memory::{MemoryProductStore, MemoryUserStore};
use inventory_api::storage::{mysql, ProductStore, UserStore};
use inventory_api::{bootstrap, config, handlers, middleware};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inventory_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let app_config = config::load_config_with_fallback();

    // Wire up the storage backends
    let (users, products, audit_store): (
        Arc<dyn UserStore>,
        Arc<dyn ProductStore>,
        Arc<dyn AuditStore>,
    ) = match &app_config.database {
        DatabaseConfig::Memory => {
            tracing::info!("Using in-memory storage");
            (
                Arc::new(MemoryUserStore::new()),
                Arc::new(MemoryProductStore::new()),
                Arc::new(MemoryAuditStore::new()),
            )
        }
        DatabaseConfig::Mysql { url } => {
            let pool = match mysql::connect(url).await {
                Ok(pool) => pool,
                Err(e) => {
                    tracing::error!("Failed to connect to database: {}", e);
                    std::process::exit(1);
                }
            };
            if let Err(e) = mysql::ensure_schema(&pool).await {
                tracing::error!("Failed to prepare database schema: {}", e);
                std::process::exit(1);
            }
            tracing::info!("Connected to MySQL");
            (
                Arc::new(mysql::MySqlUserStore::new(pool.clone())),
                Arc::new(mysql::MySqlProductStore::new(pool.clone())),
                Arc::new(MySqlAuditStore::new(pool)),
            )
        }
    };

    // Create default admin/user if the users table is empty
    if let Err(e) = bootstrap::create_initial_accounts(&users).await {
        tracing::warn!("Failed to seed default accounts: {}", e);
    }

    let state = AppState {
        users,
        products,
        sessions: Arc::new(SessionManager::new(
            Arc::new(MemorySessionStorage::new()),
            app_config.session.clone(),
        )),
        audit: AuditLogger::new(audit_store),
    };

    // Routes that require a valid session
    let protected = Router::new()
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/dashboard", get(handlers::dashboard::dashboard))
        .route(
            "/products",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route(
            "/products/:product_id",
            put(handlers::products::update_product).delete(handlers::products::delete_product),
        )
        .route("/users", post(handlers::users::create_user))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::auth::auth_middleware,
        ));

    let app = Router::new()
        // Health check routes (always available)
        .route("/", get(handlers::health::health_check))
        .route("/health", get(handlers::health::health_check))
        .route("/api/v1/auth/login", post(handlers::auth::login))
        .nest("/api/v1", protected)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    // Run the server
    let addr: SocketAddr = match format!("{}:{}", app_config.server.host, app_config.server.port)
        .parse()
    {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(
                "Invalid server address {}:{}: {}",
                app_config.server.host,
                app_config.server.port,
                e
            );
            std::process::exit(1);
        }
    };

    tracing::info!("Starting inventory API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

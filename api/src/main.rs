//! FreightDesk API Server
//!
//! Back office for a freight-forwarding broker: orders and their cargo
//! lines, warehouse stock, counterparties and a field-level change history.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    http::HeaderValue,
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use freightdesk_migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use serde::Serialize;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
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
    PostgresAdminUserRepository, PostgresChangeHistoryRepository, PostgresCounterpartyRepository,
    PostgresInventoryRepository, PostgresOrderItemRepository, PostgresOrderRepository,
    PostgresTrackingRepository, PostgresWarehouseRepository,
};
use app::{
    AdminService, CounterpartyService, DashboardService, HistoryService, InventoryService,
    OrderItemService, OrderService, TrackingService, WarehouseService,
};
use config::Config;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub order_service: Arc<
        OrderService<
            PostgresOrderRepository,
            PostgresOrderItemRepository,
            PostgresInventoryRepository,
            PostgresCounterpartyRepository,
            PostgresTrackingRepository,
            PostgresChangeHistoryRepository,
        >,
    >,
    pub order_item_service: Arc<
        OrderItemService<
            PostgresOrderRepository,
            PostgresOrderItemRepository,
            PostgresInventoryRepository,
            PostgresChangeHistoryRepository,
        >,
    >,
    pub inventory_service: Arc<
        InventoryService<
            PostgresInventoryRepository,
            PostgresWarehouseRepository,
            PostgresOrderItemRepository,
            PostgresChangeHistoryRepository,
        >,
    >,
    pub warehouse_service: Arc<
        WarehouseService<
            PostgresWarehouseRepository,
            PostgresInventoryRepository,
            PostgresChangeHistoryRepository,
        >,
    >,
    pub counterparty_service: Arc<
        CounterpartyService<
            PostgresCounterpartyRepository,
            PostgresOrderRepository,
            PostgresChangeHistoryRepository,
        >,
    >,
    pub admin_service: Arc<AdminService<PostgresAdminUserRepository, PostgresChangeHistoryRepository>>,
    pub tracking_service: Arc<
        TrackingService<
            PostgresTrackingRepository,
            PostgresOrderRepository,
            PostgresOrderItemRepository,
            PostgresChangeHistoryRepository,
        >,
    >,
    pub history_service: Arc<HistoryService<PostgresChangeHistoryRepository>>,
    pub dashboard_service: Arc<
        DashboardService<
            PostgresOrderRepository,
            PostgresInventoryRepository,
            PostgresWarehouseRepository,
            PostgresCounterpartyRepository,
            PostgresChangeHistoryRepository,
        >,
    >,
    pub config: Config,
}

impl AppState {
    /// Wire the Postgres adapters into the application services
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        let order_repo = Arc::new(PostgresOrderRepository::new(db.clone()));
        let item_repo = Arc::new(PostgresOrderItemRepository::new(db.clone()));
        let inventory_repo = Arc::new(PostgresInventoryRepository::new(db.clone()));
        let warehouse_repo = Arc::new(PostgresWarehouseRepository::new(db.clone()));
        let counterparty_repo = Arc::new(PostgresCounterpartyRepository::new(db.clone()));
        let user_repo = Arc::new(PostgresAdminUserRepository::new(db.clone()));
        let tracking_repo = Arc::new(PostgresTrackingRepository::new(db.clone()));
        let history_repo = Arc::new(PostgresChangeHistoryRepository::new(db));

        Self {
            order_service: Arc::new(OrderService::new(
                order_repo.clone(),
                item_repo.clone(),
                inventory_repo.clone(),
                counterparty_repo.clone(),
                tracking_repo.clone(),
                history_repo.clone(),
            )),
            order_item_service: Arc::new(OrderItemService::new(
                order_repo.clone(),
                item_repo.clone(),
                inventory_repo.clone(),
                history_repo.clone(),
            )),
            inventory_service: Arc::new(InventoryService::new(
                inventory_repo.clone(),
                warehouse_repo.clone(),
                item_repo.clone(),
                history_repo.clone(),
            )),
            warehouse_service: Arc::new(WarehouseService::new(
                warehouse_repo.clone(),
                inventory_repo.clone(),
                history_repo.clone(),
            )),
            counterparty_service: Arc::new(CounterpartyService::new(
                counterparty_repo.clone(),
                order_repo.clone(),
                history_repo.clone(),
            )),
            admin_service: Arc::new(AdminService::new(user_repo, history_repo.clone())),
            tracking_service: Arc::new(TrackingService::new(
                tracking_repo,
                order_repo.clone(),
                item_repo,
                history_repo.clone(),
            )),
            history_service: Arc::new(HistoryService::new(history_repo.clone())),
            dashboard_service: Arc::new(DashboardService::new(
                order_repo,
                inventory_repo,
                warehouse_repo,
                counterparty_repo,
                history_repo,
                config.low_stock_threshold,
            )),
            config,
        }
    }
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

/// Build the full router: public routes, rate-limited routes and `/admin`
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    // Login and public tracking are the only unauthenticated routes that
    // touch the database
    let mut rate_limited_routes = Router::new()
        .route("/auth/login", post(handlers::login))
        .route("/track/:code", get(handlers::track));

    if state.config.rate_limit_enabled {
        // 2 req/sec sustained, burst of 5, keyed by peer IP
        let governor_config = Arc::new(
            GovernorConfigBuilder::default()
                .key_extractor(PeerIpKeyExtractor)
                .per_second(2)
                .burst_size(5)
                .finish()
                .context("Failed to build governor config")?,
        );
        rate_limited_routes = rate_limited_routes.layer(GovernorLayer {
            config: governor_config,
        });
    }

    let admin_routes = Router::new()
        .route("/dashboard", get(handlers::get_dashboard))
        // Orders
        .route(
            "/orders",
            get(handlers::list_orders).post(handlers::create_order),
        )
        .route(
            "/orders/:id",
            get(handlers::get_order)
                .patch(handlers::update_order)
                .delete(handlers::delete_order),
        )
        .route("/orders/:id/status", post(handlers::change_status))
        .route("/orders/:id/recalculate", post(handlers::recalculate_order))
        .route(
            "/orders/:id/items",
            get(handlers::list_items).post(handlers::add_item),
        )
        .route(
            "/orders/:id/tracking",
            get(handlers::list_tracking).post(handlers::issue_tracking),
        )
        // Order items
        .route(
            "/order-items/:id",
            get(handlers::get_item)
                .patch(handlers::update_item)
                .delete(handlers::delete_item),
        )
        .route("/order-items/:id/payments", post(handlers::record_payment))
        .route("/order-items/:id/fulfill", post(handlers::fulfill_item))
        .route("/tracking/:id", delete(handlers::revoke_tracking))
        // Warehouses and stock
        .route(
            "/warehouses",
            get(handlers::list_warehouses).post(handlers::create_warehouse),
        )
        .route(
            "/warehouses/:id",
            get(handlers::get_warehouse)
                .patch(handlers::update_warehouse)
                .delete(handlers::delete_warehouse),
        )
        .route(
            "/inventory",
            get(handlers::list_inventory).post(handlers::create_inventory),
        )
        .route("/inventory/low-stock", get(handlers::low_stock))
        .route(
            "/inventory/:id",
            get(handlers::get_inventory)
                .patch(handlers::update_inventory)
                .delete(handlers::delete_inventory),
        )
        .route("/inventory/:id/adjust", post(handlers::adjust_inventory))
        // Counterparties
        .route(
            "/counterparties",
            get(handlers::list_counterparties).post(handlers::create_counterparty),
        )
        .route(
            "/counterparties/:id",
            get(handlers::get_counterparty)
                .patch(handlers::update_counterparty)
                .delete(handlers::delete_counterparty),
        )
        // History
        .route("/history", get(handlers::recent_history))
        .route(
            "/history/:entity_type/:entity_id",
            get(handlers::entity_history),
        )
        // Users
        .route(
            "/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route("/users/:id/deactivate", post(handlers::deactivate_user))
        .route("/me", get(handlers::me))
        .route("/me/password", post(handlers::change_password))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    let cors = match &state.config.cors_allow_origin {
        Some(origin) => CorsLayer::new().allow_origin(AllowOrigin::exact(
            HeaderValue::from_str(origin).context("Invalid CORS_ALLOW_ORIGIN")?,
        )),
        None => CorsLayer::new().allow_origin(Any),
    }
    .allow_methods(Any)
    .allow_headers(Any);

    Ok(Router::new()
        .route("/health", get(health))
        .merge(rate_limited_routes)
        .nest("/admin", admin_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,freightdesk_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting FreightDesk API...");

    let config = Config::from_env()?;

    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    if config.run_migrations {
        Migrator::up(&db, None)
            .await
            .context("Failed to run migrations")?;
        tracing::info!("Migrations applied");
    }

    let state = AppState::new(db, config.clone());

    if let Some((username, password)) = config.bootstrap_admin() {
        state.admin_service.bootstrap(username, password).await?;
    } else {
        tracing::debug!("ADMIN_USERNAME/ADMIN_PASSWORD not set, skipping admin bootstrap");
    }

    let app = build_router(state)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

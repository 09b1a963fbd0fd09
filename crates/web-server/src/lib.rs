use axum::{
    Router,
    routing::{get, post},
};
use configuration::{PaginationSettings, Settings};
use database::DbRepository;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub db_repo: DbRepository,
    pub pagination: PaginationSettings,
}

/// Builds the router with every query endpoint mounted.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    Router::new()
        .route("/health", get(handlers::health))
        .route("/rpsl_obj/:name", get(handlers::get_rpsl_obj))
        .route("/aut_num/:as_num", get(handlers::get_aut_num))
        .route(
            "/verification_reports/:observed_route_id",
            get(handlers::get_verification_reports),
        )
        .route(
            "/overall_report_type/:type",
            get(handlers::get_by_overall_report_type),
        )
        .route(
            "/as_for_overall_report_type/:type",
            get(handlers::get_as_for_overall_report_type),
        )
        .route(
            "/as_for_report_item_type/:type",
            get(handlers::get_as_for_report_item_type),
        )
        .route(
            "/for_overall_report_type/:type",
            get(handlers::get_for_overall_report_type),
        )
        .route(
            "/for_report_item_type/:type",
            get(handlers::get_for_report_item_type),
        )
        .route(
            "/for_address_prefix/:address/:prefix_length",
            get(handlers::get_for_address_prefix),
        )
        .route("/report_for_as/:as_num", get(handlers::get_reports_for_as))
        .route("/route_for_as/:as_num", get(handlers::get_routes_for_as))
        .route("/as_set/:as_num", get(handlers::get_as_set_name))
        .route("/books", post(handlers::create_book))
        .with_state(state)
        .layer(cors)
        // Logs every request with its latency and status.
        .layer(TraceLayer::new_for_http())
}

/// Configures and runs the web server until Ctrl-C.
pub async fn run_server(settings: Settings) -> anyhow::Result<()> {
    // The pool connects on first use, so the server comes up even while the
    // database is still starting; requests fail with 503 until it is reachable.
    let db_pool = database::connect_lazy(&settings.database)?;
    let db_repo = DbRepository::new(
        db_pool,
        Duration::from_millis(settings.database.statement_timeout_ms),
    );
    if let Err(e) = db_repo.ping().await {
        tracing::warn!(error = %e, "Database not reachable at startup.");
    }

    let app_state = Arc::new(AppState {
        db_repo,
        pagination: settings.pagination.clone(),
    });
    let app = router(app_state);

    let addr = settings.server.bind;
    tracing::info!("Web server started and listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Web server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for the shutdown signal.");
        std::future::pending::<()>().await;
    }
}

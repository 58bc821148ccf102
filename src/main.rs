use axum::extract::State;
use axum::{http::Method, middleware::from_fn_with_state, response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

mod config;
mod database;
mod dtos;
mod errors;
mod extract;
mod handlers;
mod middleware;
mod models;
mod routes;
mod services;
mod state;

#[cfg(test)]
mod tests;

use config::AppConfig;
use database::connection::{ensure_indexes, get_db_client};
use middleware::auth::require_admin;
use state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let db = match get_db_client(&config).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("❌ Failed to connect to MongoDB: {}", e);
            std::process::exit(1);
        }
    };

    ensure_indexes(&db).await;

    if let Err(e) = handlers::auth::bootstrap_admin(&db, &config).await {
        tracing::warn!("Admin bootstrap skipped: {}", e);
    }

    if !config.require_admin_auth {
        tracing::warn!("🔓 Admin auth is disabled, writes are open");
    }

    let addr = config.bind_address();
    let app = build_router(AppState::new(db, config));
    start_server(app, &addr).await;
}

fn build_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .allow_credentials(false);

    // Reads are public; every write below needs an admin token
    let league = Router::new()
        .nest("/schedules", routes::schedules::routes())
        .nest("/fixtures", routes::fixtures::routes())
        .nest("/table", routes::table::routes())
        .nest("/players", routes::players::routes())
        .nest("/player-stats", routes::player_stats::routes())
        .nest("/heroes", routes::heroes::routes())
        .nest("/logos", routes::logos::routes())
        .nest("/predictions", routes::predictions::routes())
        .route_layer(from_fn_with_state(app_state.clone(), require_admin));

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/api/health", get(api_health_check))
        .nest("/api/auth", routes::auth::routes())
        .nest("/api", league)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

async fn start_server(app: Router, addr: &str) {
    tracing::info!("🚀 Server starting on {}", addr);

    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("Server error: {}", e);
                std::process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    }
}

async fn root_handler() -> &'static str {
    "🏆 RoV League API"
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn api_health_check(State(state): State<AppState>) -> Json<Value> {
    use mongodb::bson::doc;

    let db_status = match state.db.run_command(doc! {"ping": 1}).await {
        Ok(_) => "connected",
        Err(_) => "disconnected",
    };

    Json(json!({
        "status": "healthy",
        "database": db_status,
        "adminAuth": state.config.require_admin_auth,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{handlers::table, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(table::get_tables).post(table::create_table))
        .route("/latest", get(table::get_latest_table))
        // Computed from completed fixtures on every read
        .route("/calculated", get(table::get_calculated_table))
        .route("/sync-from-fixtures", post(table::sync_from_fixtures))
        .route("/:id", put(table::update_table).delete(table::delete_table))
}

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::{handlers::fixtures, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(fixtures::get_fixtures).post(fixtures::create_fixture))
        .route("/completed", get(fixtures::get_completed_fixtures))
        .route("/bulk", post(fixtures::bulk_upsert_fixtures))
        .route("/day/:day", get(fixtures::get_fixtures_by_day))
        // matchit wants one parameter name per position: `key` is a match day
        // when followed by a match number, a document id otherwise
        .route("/:key/:match_no", patch(fixtures::update_fixture))
        .route("/:key", delete(fixtures::delete_fixture))
}

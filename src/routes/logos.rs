use axum::{routing::get, Router};

use crate::{handlers::logos, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(logos::get_logos).post(logos::save_logo))
        // One segment serves both: GET by team name, DELETE by id
        .route("/:key", get(logos::get_logo_by_team).delete(logos::delete_logo))
}

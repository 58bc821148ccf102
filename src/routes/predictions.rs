use axum::{routing::get, Router};

use crate::{handlers::predictions, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(predictions::get_predictions))
        .route("/match", get(predictions::get_match_prediction))
}

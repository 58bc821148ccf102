use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::{handlers::heroes, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(heroes::get_heroes).post(heroes::save_hero))
        .route("/bulk", post(heroes::bulk_save_heroes))
        .route("/:id", delete(heroes::delete_hero))
}

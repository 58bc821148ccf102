use axum::{routing::get, Router};

use crate::{handlers::players, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(players::get_players).post(players::create_player))
        .route(
            "/:id",
            get(players::get_player_by_id)
                .put(players::update_player)
                .delete(players::delete_player),
        )
}

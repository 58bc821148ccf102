use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers::player_stats, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(player_stats::get_player_stats).post(player_stats::create_player_stat),
        )
        .route("/day/:day", get(player_stats::get_stats_by_day))
        .route("/totals", get(player_stats::get_player_totals))
        .route("/top/:stat", get(player_stats::get_top_players))
        .route("/player/:name", get(player_stats::get_player_profile))
        .route("/roles", get(player_stats::get_role_summary))
        // Replaces every line of one game
        .route("/sync", post(player_stats::sync_game_stats))
        .route("/bulk", post(player_stats::bulk_create_player_stats))
}

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use super::{
    handlers::{
        create_game, delete_game, get_game, get_history, get_sessions, make_move, reset_game,
        AppState,
    },
    middleware::{cors, logging},
};

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/api/games", post(create_game).get(get_sessions))
        .route("/api/games/:id", get(get_game).delete(delete_game))
        .route("/api/games/:id/move", put(make_move))
        .route("/api/games/:id/reset", post(reset_game))
        .route("/api/games/:id/history", get(get_history))
        .route("/health", get(health_check))
        .layer(middleware::from_fn(cors))
        .layer(middleware::from_fn(logging))
}

async fn health_check() -> &'static str {
    "TicTacToe API Server is running"
}

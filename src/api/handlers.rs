use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::ai::service::AIServiceFactory;
use crate::config::Config;
use crate::error::AIError;
use crate::session::GameSessionManager;

use super::dto::{
    validate_square, ErrorResponse, GameResponse, MoveHistoryResponse, MoveResponse,
    PlayerMoveRequest, SessionListResponse, SessionSummary,
};
use super::service::GameService;

#[derive(Debug, Clone)]
pub struct AppState {
    pub service: Arc<GameService>,
}

impl AppState {
    pub fn new() -> Self {
        let session_manager = Arc::new(GameSessionManager::new(100));
        let service = Arc::new(GameService::new(session_manager));

        Self { service }
    }

    /// 統合設定からアプリケーション状態を構築する
    pub fn from_config(config: &Config) -> Result<Self, AIError> {
        let session_manager = Arc::new(GameSessionManager::with_timeout(
            config.session.max_sessions,
            config.session.session_timeout_minutes,
        ));
        let ai_service = AIServiceFactory::create_service(&config.ai_service)?;
        let service = Arc::new(GameService::new_with_ai_service(
            session_manager,
            ai_service.into(),
        ));

        Ok(Self { service })
    }

    pub fn new_with_service(service: Arc<GameService>) -> Self {
        Self { service }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

pub async fn create_game(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<GameResponse>), (StatusCode, Json<ErrorResponse>)> {
    match state.service.create_game() {
        Ok(response) => Ok((StatusCode::CREATED, Json(response))),
        Err(err) => Err(err.into()),
    }
}

pub async fn get_game(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<GameResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.service.get_game_state(game_id) {
        Ok(response) => Ok(Json(response)),
        Err(err) => Err(err.into()),
    }
}

pub async fn make_move(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
    Json(request): Json<PlayerMoveRequest>,
) -> Result<Json<MoveResponse>, (StatusCode, Json<ErrorResponse>)> {
    let square = match validate_square(request.index) {
        Ok(square) => square,
        Err(error_msg) => {
            let error = ErrorResponse::with_code("INVALID_SQUARE", error_msg, "INVALID_SQUARE");
            return Err((StatusCode::BAD_REQUEST, Json(error)));
        }
    };

    match state.service.make_player_move(game_id, square).await {
        Ok(response) => Ok(Json(response)),
        Err(err) => Err(err.into()),
    }
}

pub async fn reset_game(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<GameResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.service.reset_game(game_id) {
        Ok(response) => Ok(Json(response)),
        Err(err) => Err(err.into()),
    }
}

pub async fn delete_game(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    match state.service.delete_session(game_id) {
        Ok(_) => Ok(StatusCode::NO_CONTENT),
        Err(err) => Err(err.into()),
    }
}

pub async fn get_history(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<MoveHistoryResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.service.get_move_history(game_id) {
        Ok(moves) => {
            let response = MoveHistoryResponse {
                game_id,
                total_moves: moves.len(),
                moves,
            };
            Ok(Json(response))
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn get_sessions(State(state): State<AppState>) -> Json<SessionListResponse> {
    let sessions = state.service.list_sessions();
    let session_summaries: Vec<SessionSummary> =
        sessions.iter().map(SessionSummary::from_session).collect();

    let response = SessionListResponse {
        total_count: session_summaries.len(),
        sessions: session_summaries,
    };

    Json(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::service::{AIServiceConfig, AIServiceType};

    #[test]
    fn test_app_state_creation() {
        let state = AppState::new();
        assert_eq!(state.service.list_sessions().len(), 0);
    }

    #[test]
    fn test_app_state_from_config() {
        let mut config = Config::default();
        config.ai_service = AIServiceConfig {
            service_type: AIServiceType::Mock,
            ..Default::default()
        };

        let state = AppState::from_config(&config).unwrap();
        assert_eq!(
            state.service.get_ai_service().get_service_type(),
            AIServiceType::Mock
        );
    }
}

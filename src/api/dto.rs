//! ゲームAPI データ転送オブジェクト (DTO)

use axum::{http::StatusCode, response::Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AIError, GameError};
use crate::game::{Cell, GameStatus, Player, Square};
use crate::session::{GameSession, MoveRecord};

/// リクエストのマスインデックスを検証する
pub fn validate_square(index: usize) -> Result<Square, String> {
    Square::new(index).ok_or_else(|| format!("マスが範囲外です: {}. 有効範囲: 0-8", index))
}

/// ゲーム状態を文字列表現に変換する
/// フロントエンドのステータス表示に使用する
pub fn status_string(status: &GameStatus) -> String {
    match status {
        GameStatus::InProgress => "in_progress",
        GameStatus::Finished {
            winner: Some(Player::X),
            ..
        } => "finished_x_wins",
        GameStatus::Finished {
            winner: Some(Player::O),
            ..
        } => "finished_o_wins",
        GameStatus::Finished { winner: None, .. } => "finished_draw",
    }
    .to_string()
}

#[derive(Debug, Deserialize)]
pub struct PlayerMoveRequest {
    pub index: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameResponse {
    pub game_id: Uuid,
    pub board: Vec<Option<Player>>,
    pub current_player: Player,
    pub x_count: u8,
    pub o_count: u8,
    pub ai_thinking: bool,
    pub status: String,
    pub winning_line: Option<[usize; 3]>,
    pub empty_squares: Vec<usize>,
    pub move_count: u32,
}

impl GameResponse {
    pub fn from_session(session: &GameSession) -> Self {
        let board: Vec<Option<Player>> = Square::all()
            .map(|square| {
                session
                    .game_state
                    .board
                    .get_cell(square)
                    .and_then(Cell::to_player)
            })
            .collect();

        let empty_squares = if session.is_finished() {
            Vec::new()
        } else {
            session
                .game_state
                .board
                .empty_squares()
                .iter()
                .map(|square| square.index)
                .collect()
        };

        let (x_count, o_count) = session.game_state.count_marks();

        Self {
            game_id: session.id,
            board,
            current_player: session.game_state.current_player,
            x_count,
            o_count,
            ai_thinking: session.ai_thinking,
            status: status_string(&session.game_state.game_status),
            winning_line: session.game_state.winning_line(),
            empty_squares,
            move_count: session.game_state.get_move_count() as u32,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MoveResponse {
    pub success: bool,
    pub game_state: GameResponse,
    pub player_move: usize,
    pub ai_move: Option<usize>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MoveHistoryResponse {
    pub game_id: Uuid,
    pub moves: Vec<MoveRecord>,
    pub total_moves: usize,
}

#[derive(Debug, Serialize)]
pub struct SessionListResponse {
    pub sessions: Vec<SessionSummary>,
    pub total_count: usize,
}

#[derive(Debug, Serialize)]
pub struct SessionSummary {
    pub game_id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub last_move_at: DateTime<Utc>,
    pub move_count: u32,
}

impl SessionSummary {
    pub fn from_session(session: &GameSession) -> Self {
        Self {
            game_id: session.id,
            status: status_string(&session.game_state.game_status),
            created_at: session.created_at,
            last_move_at: session.last_move_at,
            move_count: session.game_state.get_move_count() as u32,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub error_code: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            timestamp: Utc::now(),
            error_code: None,
        }
    }

    pub fn with_code(
        error: impl Into<String>,
        message: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            timestamp: Utc::now(),
            error_code: Some(code.into()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("ゲームセッションが見つかりません: {game_id}")]
    GameNotFound { game_id: Uuid },

    #[error("無効な着手です: {reason}")]
    InvalidMove { reason: String },

    #[error("プレイヤーの手番ではありません")]
    NotPlayerTurn,

    #[error("セッション制限に達しています")]
    SessionLimitExceeded,

    #[error("AI思考エラー: {details}")]
    AiThinkingError { details: String },

    #[error("ゲームは既に終了しています")]
    GameAlreadyFinished,

    #[error("無効なリクエストです: {details}")]
    BadRequest { details: String },
}

impl ApiError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::GameNotFound { .. } => "GAME_NOT_FOUND",
            ApiError::InvalidMove { .. } => "INVALID_MOVE",
            ApiError::NotPlayerTurn => "NOT_PLAYER_TURN",
            ApiError::SessionLimitExceeded => "MAX_SESSIONS_REACHED",
            ApiError::AiThinkingError { .. } => "AI_THINKING_ERROR",
            ApiError::GameAlreadyFinished => "GAME_ALREADY_FINISHED",
            ApiError::BadRequest { .. } => "BAD_REQUEST",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::GameNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::InvalidMove { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotPlayerTurn => StatusCode::FORBIDDEN,
            ApiError::SessionLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            ApiError::AiThinkingError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::GameAlreadyFinished => StatusCode::BAD_REQUEST,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        match err {
            GameError::GameNotFound { game_id } => ApiError::GameNotFound { game_id },
            GameError::InvalidMove { reason } => ApiError::InvalidMove { reason },
            GameError::GameFinished => ApiError::GameAlreadyFinished,
            GameError::SessionLimitExceeded => ApiError::SessionLimitExceeded,
            GameError::AIError { source } => ApiError::AiThinkingError {
                details: source.to_string(),
            },
        }
    }
}

impl From<AIError> for ApiError {
    fn from(err: AIError) -> Self {
        ApiError::AiThinkingError {
            details: err.to_string(),
        }
    }
}

impl From<ApiError> for (StatusCode, Json<ErrorResponse>) {
    fn from(err: ApiError) -> Self {
        let status_code = err.status_code();
        let error_response =
            ErrorResponse::with_code(err.error_code(), err.to_string(), err.error_code());

        (status_code, Json(error_response))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

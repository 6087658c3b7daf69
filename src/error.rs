//! アプリケーション全体のエラー定義モジュール
//! ゲームロジックとAIサービスのエラーを統一管理。

use thiserror::Error;
use uuid::Uuid;

/// ゲームロジックに関連するエラー
#[derive(Debug, Error)]
pub enum GameError {
    #[error("Invalid move: {reason}")]
    InvalidMove { reason: String },

    #[error("Game not found: {game_id}")]
    GameNotFound { game_id: Uuid },

    #[error("Game already finished")]
    GameFinished,

    #[error("AI calculation failed: {source}")]
    AIError {
        #[from]
        source: AIError,
    },

    #[error("Session limit exceeded")]
    SessionLimitExceeded,
}

/// AIサービスに関連するエラー
#[derive(Debug, Error)]
pub enum AIError {
    #[error("No valid moves available")]
    NoValidMoves,

    #[error("AI strategy error: {message}")]
    StrategyError { message: String },

    #[error("AI service unavailable: {service_name} - {reason}")]
    ServiceUnavailable {
        service_name: String,
        reason: String,
    },
}

/// ゲームエラーをベースとした結果型
pub type Result<T> = std::result::Result<T, GameError>;

//! ゲーム進行サービス
//! 人間の着手の受理とマシンの応手の同期実行を調停する。

use std::sync::Arc;
use uuid::Uuid;

use crate::ai::service::{AIService, AIServiceFactory};
use crate::game::{Player, Square, TicTacToeRules};
use crate::session::{GameSessionManager, MoveRecord, SessionStats};

use super::dto::{ApiError, ApiResult, GameResponse, MoveResponse};

pub struct GameService {
    session_manager: Arc<GameSessionManager>,
    ai_service: Arc<dyn AIService>,
}

impl std::fmt::Debug for GameService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameService")
            .field("session_manager", &self.session_manager)
            .field("ai_service", &self.ai_service.get_name())
            .finish()
    }
}

impl GameService {
    pub fn new(session_manager: Arc<GameSessionManager>) -> Self {
        let ai_service = AIServiceFactory::create_default_local()
            .expect("Failed to create default local AI service");

        Self {
            session_manager,
            ai_service: ai_service.into(),
        }
    }

    pub fn new_with_ai_service(
        session_manager: Arc<GameSessionManager>,
        ai_service: Arc<dyn AIService>,
    ) -> Self {
        Self {
            session_manager,
            ai_service,
        }
    }

    pub fn get_ai_service(&self) -> &Arc<dyn AIService> {
        &self.ai_service
    }

    /// 新しいゲームセッションを作成する
    pub fn create_game(&self) -> ApiResult<GameResponse> {
        let session_id = self.session_manager.create_session()?;
        let session = self.session_manager.get_session(&session_id)?;

        Ok(GameResponse::from_session(&session))
    }

    pub fn get_game_state(&self, session_id: Uuid) -> ApiResult<GameResponse> {
        let session = self.session_manager.get_session(&session_id)?;
        Ok(GameResponse::from_session(&session))
    }

    /// 人間（X）の着手を受理し、必要ならマシン（O）の応手まで実行する
    /// マシンの応手は手番が渡った時点で同期的に計算・適用される
    pub async fn make_player_move(
        &self,
        session_id: Uuid,
        square: Square,
    ) -> ApiResult<MoveResponse> {
        let mut session = self.session_manager.get_session(&session_id)?;

        if session.is_finished() {
            return Err(ApiError::GameAlreadyFinished);
        }

        if !session.is_player_turn() {
            return Err(ApiError::NotPlayerTurn);
        }

        if session.ai_thinking {
            return Err(ApiError::AiThinkingError {
                details: "AI is currently thinking".to_string(),
            });
        }

        TicTacToeRules::apply_move(&mut session.game_state, square)?;
        session.add_move_record(MoveRecord::new(Player::X, square, None));

        if !session.is_machine_turn() {
            // 人間の手で終局した
            self.session_manager.update_session(session.clone())?;

            return Ok(MoveResponse {
                success: true,
                game_state: GameResponse::from_session(&session),
                player_move: square.index,
                ai_move: None,
                message: Some("Game finished".to_string()),
            });
        }

        session.ai_thinking = true;
        self.session_manager.update_session(session.clone())?;

        match self.process_machine_move(&mut session).await {
            Ok(machine_square) => {
                session.ai_thinking = false;
                self.session_manager.update_session(session.clone())?;

                Ok(MoveResponse {
                    success: true,
                    game_state: GameResponse::from_session(&session),
                    player_move: square.index,
                    ai_move: Some(machine_square.index),
                    message: None,
                })
            }
            Err(api_error) => {
                session.ai_thinking = false;
                self.session_manager.update_session(session)?;
                Err(api_error)
            }
        }
    }

    /// マシンの応手を計算して盤面に適用する
    async fn process_machine_move(&self, session: &mut crate::session::GameSession) -> ApiResult<Square> {
        let ai_result = self
            .ai_service
            .calculate_move(&session.game_state)
            .await
            .map_err(|e| ApiError::AiThinkingError {
                details: format!("AI service error: {}", e),
            })?;

        let machine_square = ai_result.square;

        TicTacToeRules::apply_move(&mut session.game_state, machine_square)?;
        session.add_move_record(MoveRecord::new(
            Player::O,
            machine_square,
            Some(ai_result.thinking_time_ms),
        ));

        Ok(machine_square)
    }

    /// ゲームを初期状態に戻す
    /// 終局していても進行中でも無条件で成功する
    pub fn reset_game(&self, session_id: Uuid) -> ApiResult<GameResponse> {
        let mut session = self.session_manager.get_session(&session_id)?;

        session.reset();
        self.session_manager.update_session(session.clone())?;

        Ok(GameResponse::from_session(&session))
    }

    pub fn delete_session(&self, session_id: Uuid) -> ApiResult<()> {
        self.session_manager.remove_session(&session_id)?;
        Ok(())
    }

    pub fn get_move_history(&self, session_id: Uuid) -> ApiResult<Vec<MoveRecord>> {
        let session = self.session_manager.get_session(&session_id)?;
        Ok(session.move_records)
    }

    pub fn list_sessions(&self) -> Vec<crate::session::GameSession> {
        self.session_manager.list_sessions()
    }

    pub fn get_stats(&self) -> SessionStats {
        self.session_manager.get_stats()
    }

    /// 期限切れセッションを削除する
    pub fn cleanup_sessions(&self) -> usize {
        self.session_manager.cleanup_inactive_sessions()
    }
}

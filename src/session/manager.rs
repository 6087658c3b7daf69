//! ゲームセッション管理モジュール
//! 同時に対戦を行うユーザーのセッションを管理し、
//! セッション数制限、タイムアウト処理、クリーンアップを担当する。

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{GameError, Result};
use crate::game::{GameState, Player, Square};

/// APIに公開する1手の記録
/// ゲーム履歴にマシンの思考時間を添えて保持する
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRecord {
    pub player: Player,
    pub square: Square,
    pub timestamp: DateTime<Utc>,
    pub thinking_time_ms: Option<u64>,
}

impl MoveRecord {
    pub fn new(player: Player, square: Square, thinking_time_ms: Option<u64>) -> Self {
        Self {
            player,
            square,
            timestamp: Utc::now(),
            thinking_time_ms,
        }
    }
}

/// 人間（X）対マシン（O）の1対戦セッション
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    pub id: Uuid,
    pub game_state: GameState,
    pub ai_thinking: bool,
    pub created_at: DateTime<Utc>,
    pub last_move_at: DateTime<Utc>,
    pub move_records: Vec<MoveRecord>,
}

impl GameSession {
    pub fn new() -> Self {
        let now = Utc::now();
        let game_state = GameState::new();

        Self {
            id: game_state.id,
            game_state,
            ai_thinking: false,
            created_at: now,
            last_move_at: now,
            move_records: Vec::new(),
        }
    }

    /// 人間の手番かチェックする
    pub fn is_player_turn(&self) -> bool {
        self.game_state.current_player == Player::X
    }

    /// マシンの手番かチェックする
    /// 終局していれば常にfalse
    pub fn is_machine_turn(&self) -> bool {
        !self.game_state.is_finished() && self.game_state.current_player == Player::O
    }

    pub fn is_finished(&self) -> bool {
        self.game_state.is_finished()
    }

    pub fn update_last_move(&mut self) {
        self.last_move_at = Utc::now();
    }

    pub fn add_move_record(&mut self, move_record: MoveRecord) {
        self.move_records.push(move_record);
        self.update_last_move();
    }

    /// セッションのゲームを初期状態に戻す
    pub fn reset(&mut self) {
        self.game_state.reset();
        self.move_records.clear();
        self.ai_thinking = false;
        self.update_last_move();
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

/// セッション全体の統計情報
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_sessions: usize,
    pub max_sessions: usize,
    pub ai_thinking_count: usize,
    pub finished_count: usize,
}

/// ゲームセッションの管理を行うメイン構造体
/// スレッドセーフなDashMapで同時アクセスを効率的に処理
#[derive(Debug, Clone)]
pub struct GameSessionManager {
    /// アクティブセッションのコレクション
    sessions: Arc<DashMap<Uuid, GameSession>>,
    /// 同時存在可能な最大セッション数
    max_sessions: usize,
    /// セッションのタイムアウト時間（分）
    session_timeout_minutes: i64,
}

impl GameSessionManager {
    /// デフォルトタイムアウト（30分）でセッションマネージャーを作成
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            max_sessions,
            session_timeout_minutes: 30,
        }
    }

    /// カスタムタイムアウトでセッションマネージャーを作成
    pub fn with_timeout(max_sessions: usize, timeout_minutes: i64) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            max_sessions,
            session_timeout_minutes: timeout_minutes,
        }
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    /// 新しいゲームセッションを作成する
    /// 最大セッション数に達している場合はエラーを返す
    pub fn create_session(&self) -> Result<Uuid> {
        if self.sessions.len() >= self.max_sessions {
            return Err(GameError::SessionLimitExceeded);
        }

        let session = GameSession::new();
        let session_id = session.id;

        self.sessions.insert(session_id, session);

        Ok(session_id)
    }

    /// 指定したIDのセッションを取得する
    pub fn get_session(&self, session_id: &Uuid) -> Result<GameSession> {
        match self.sessions.get(session_id) {
            Some(session) => Ok(session.clone()),
            None => Err(GameError::GameNotFound {
                game_id: *session_id,
            }),
        }
    }

    pub fn update_session(&self, session: GameSession) -> Result<()> {
        let session_id = session.id;

        match self.sessions.get_mut(&session_id) {
            Some(mut existing_session) => {
                *existing_session = session;
                Ok(())
            }
            None => Err(GameError::GameNotFound {
                game_id: session_id,
            }),
        }
    }

    pub fn remove_session(&self, session_id: &Uuid) -> Result<GameSession> {
        match self.sessions.remove(session_id) {
            Some((_, session)) => Ok(session),
            None => Err(GameError::GameNotFound {
                game_id: *session_id,
            }),
        }
    }

    pub fn list_sessions(&self) -> Vec<GameSession> {
        self.sessions
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn session_exists(&self, session_id: &Uuid) -> bool {
        self.sessions.contains_key(session_id)
    }

    pub fn set_ai_thinking(&self, session_id: &Uuid, thinking: bool) -> Result<()> {
        match self.sessions.get_mut(session_id) {
            Some(mut session) => {
                session.ai_thinking = thinking;
                Ok(())
            }
            None => Err(GameError::GameNotFound {
                game_id: *session_id,
            }),
        }
    }

    /// 最終着手から一定時間経過したセッションを削除する
    /// 戻り値は削除したセッション数
    pub fn cleanup_inactive_sessions(&self) -> usize {
        let cutoff_time = Utc::now() - Duration::minutes(self.session_timeout_minutes);
        let mut removed_count = 0;

        let expired_ids: Vec<Uuid> = self
            .sessions
            .iter()
            .filter(|entry| entry.value().last_move_at < cutoff_time)
            .map(|entry| *entry.key())
            .collect();

        for session_id in expired_ids {
            if self.sessions.remove(&session_id).is_some() {
                removed_count += 1;
            }
        }

        removed_count
    }

    pub fn get_stats(&self) -> SessionStats {
        let total_sessions = self.sessions.len();
        let ai_thinking_count = self
            .sessions
            .iter()
            .filter(|entry| entry.value().ai_thinking)
            .count();
        let finished_count = self
            .sessions
            .iter()
            .filter(|entry| entry.value().is_finished())
            .count();

        SessionStats {
            total_sessions,
            max_sessions: self.max_sessions,
            ai_thinking_count,
            finished_count,
        }
    }
}

//! ゲーム状態管理モジュール
//! 三目並べの全体的な状態（盤面、手番、進行状態など）を管理する。

use super::board::Board;
use super::types::{Move, Player};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// ゲームの進行状態を表すenum
/// 進行中か、終局（勝者と勝利ライン、引き分けはwinner: None）かのいずれか
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// ゲーム進行中
    InProgress,
    /// ゲーム終了（勝者と勝利ラインを記録、引き分けは両方None）
    Finished {
        winner: Option<Player>,
        winning_line: Option<[usize; 3]>,
    },
}

/// 三目並べの全体状態を保持する構造体
/// 盤面、現在の手番、手の履歴などを全て含む
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub id: Uuid,
    pub board: Board,
    pub current_player: Player,
    pub game_status: GameStatus,
    pub move_history: Vec<Move>,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl GameState {
    /// 新しいゲーム状態を作成する
    /// 初期状態：空盤面、Xの手番でゲーム開始
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            board: Board::new(),
            current_player: Player::X,
            game_status: GameStatus::InProgress,
            move_history: Vec::new(),
            created_at: Utc::now(),
            last_updated: Utc::now(),
        }
    }

    /// 指定IDで新しいゲーム状態を作成する
    /// テストや特定のIDが必要な場合に使用
    pub fn new_with_id(id: Uuid) -> Self {
        Self {
            id,
            board: Board::new(),
            current_player: Player::X,
            game_status: GameStatus::InProgress,
            move_history: Vec::new(),
            created_at: Utc::now(),
            last_updated: Utc::now(),
        }
    }

    /// ゲームが終了しているかチェックする
    pub fn is_finished(&self) -> bool {
        matches!(self.game_status, GameStatus::Finished { .. })
    }

    /// 終局時の勝利ラインを取得する
    /// 進行中または引き分けの場合はNoneを返す
    pub fn winning_line(&self) -> Option<[usize; 3]> {
        match self.game_status {
            GameStatus::Finished { winning_line, .. } => winning_line,
            GameStatus::InProgress => None,
        }
    }

    /// 終局時の勝者を取得する
    pub fn winner(&self) -> Option<Player> {
        match self.game_status {
            GameStatus::Finished { winner, .. } => winner,
            GameStatus::InProgress => None,
        }
    }

    /// 現在の手番を交代する
    /// 受理された手が終局でなかった場合に呼び出される
    pub fn switch_player(&mut self) {
        self.current_player = self.current_player.opposite();
        self.last_updated = Utc::now();
    }

    /// 手の履歴に新しい手を追加する
    /// 最終更新時刻も同時に更新する
    pub fn add_move(&mut self, game_move: Move) {
        self.move_history.push(game_move);
        self.last_updated = Utc::now();
    }

    /// ゲームを終了させる
    /// 勝者と勝利ラインを記録する（引き分けは両方None）
    pub fn finish(&mut self, winner: Option<Player>, winning_line: Option<[usize; 3]>) {
        self.game_status = GameStatus::Finished {
            winner,
            winning_line,
        };
        self.last_updated = Utc::now();
    }

    /// ゲームを初期状態に戻す
    /// 盤面を全て空にし、Xの手番、進行中に戻す。履歴も消去するため
    /// 「手数が偶数ならXの手番」の不変条件が保たれる。無条件で成功する
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.current_player = Player::X;
        self.game_status = GameStatus::InProgress;
        self.move_history.clear();
        self.last_updated = Utc::now();
    }

    /// 現在のマーク数を取得する
    /// 戻り値: (X数, O数)
    pub fn count_marks(&self) -> (u8, u8) {
        self.board.count_marks()
    }

    /// これまでの手数を取得する
    pub fn get_move_count(&self) -> usize {
        self.move_history.len()
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

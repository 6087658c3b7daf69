//! ゲームの基本型定義モジュール
//! 三目並べで使用される基本的な型とenum、構造体を定義する。

use serde::{Deserialize, Serialize};

/// 盤面の各マスの状態を表現するenum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    X,
    O,
}

impl Cell {
    /// マスに置かれているプレイヤーを返す
    /// 空マスの場合はNoneを返す
    pub fn to_player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::X => Some(Player::X),
            Cell::O => Some(Player::O),
        }
    }
}

/// ゲームのプレイヤーを表すenum
/// 先手はX（人間）、後手はO（マシン）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// 相手プレイヤーを返す
    pub fn opposite(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// プレイヤーを対応するセル状態に変換する
    pub fn to_cell(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }
}

/// 3x3盤面上のマスを表す構造体
/// 行優先順のインデックスで、0-8の範囲で有効
/// （0,1,2が上段、3,4,5が中段、6,7,8が下段）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    pub index: usize,
}

impl Square {
    /// 範囲チェック付きのコンストラクタ
    /// 3x3盤面の範囲外のインデックスの場合はNoneを返す
    pub fn new(index: usize) -> Option<Square> {
        if index < 9 {
            Some(Square { index })
        } else {
            None
        }
    }

    /// インデックスが有効範囲内かチェックする
    pub fn is_valid(&self) -> bool {
        self.index < 9
    }

    /// 全マスをスキャン順（0→8）で列挙する
    pub fn all() -> impl Iterator<Item = Square> {
        (0..9).map(|index| Square { index })
    }

    /// マスの行番号（0-2）を返す
    pub fn row(&self) -> usize {
        self.index / 3
    }

    /// マスの列番号（0-2）を返す
    pub fn col(&self) -> usize {
        self.index % 3
    }
}

/// ゲームの1手を表現する構造体
/// 手の情報とタイムスタンプを保持する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub player: Player,
    pub square: Square,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl Move {
    /// 新しい手を作成する
    /// タイムスタンプは現在時刻で自動設定される
    pub fn new(player: Player, square: Square) -> Self {
        Self {
            player,
            square,
            timestamp: chrono::Utc::now(),
        }
    }
}

//! 三目並べのルールとゲームロジック実装モジュール
//! 勝利ラインの判定、引き分け判定、手の適用を担当する。

use super::board::Board;
use super::state::GameState;
use super::types::{Cell, Move, Player, Square};
use crate::error::{GameError, Result};

/// 勝利となる8本のライン（マスのインデックス3つ組）
/// 横3本（上から）、縦3本（左から）、斜め2本の列挙順は判定順そのもの
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// 盤面の評価結果を表すenum
/// 進行中、勝利（勝者と勝利ライン）、引き分けのいずれか一つが成立する
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    /// ゲーム進行中
    InProgress,
    /// いずれかのラインが揃った
    Win {
        winner: Player,
        line: [usize; 3],
    },
    /// 盤面が埋まりラインなし
    Draw,
}

/// 三目並べのルールを実装する構造体
/// スタティックメソッドのみを提供する
pub struct TicTacToeRules;

impl TicTacToeRules {
    /// 3マスが同じマークで揃った最初のラインを探す
    /// LINESの列挙順で最初に見つかったラインを勝者とともに返す
    pub fn find_winning_line(board: &Board) -> Option<(Player, [usize; 3])> {
        for line in &LINES {
            let first = board.get_cell(Square { index: line[0] });
            let second = board.get_cell(Square { index: line[1] });
            let third = board.get_cell(Square { index: line[2] });

            if let (Some(cell), Some(b), Some(c)) = (first, second, third) {
                if cell != Cell::Empty && cell == b && cell == c {
                    if let Some(winner) = cell.to_player() {
                        return Some((winner, *line));
                    }
                }
            }
        }

        None
    }

    /// 盤面を評価して結果を返す（純粋関数、副作用なし）
    /// 勝利ライン判定が最優先、次に盤面が埋まっていれば引き分け
    pub fn evaluate(board: &Board) -> Evaluation {
        if let Some((winner, line)) = Self::find_winning_line(board) {
            return Evaluation::Win { winner, line };
        }

        if board.is_full() {
            return Evaluation::Draw;
        }

        Evaluation::InProgress
    }

    /// 指定したマスに現在のプレイヤーが置けるかチェックする
    /// 進行中のゲームで、かつ空のマスである必要がある
    pub fn is_valid_move(game_state: &GameState, square: Square) -> bool {
        !game_state.is_finished() && game_state.board.is_empty(square)
    }

    /// 指定したマスに手を適用し、ゲーム状態を更新する
    /// 受理された手は履歴に記録され、終局なら状態を確定、
    /// 継続なら手番を交代する。拒否時は状態を一切変更しない
    pub fn apply_move(game_state: &mut GameState, square: Square) -> Result<Evaluation> {
        if game_state.is_finished() {
            return Err(GameError::GameFinished);
        }

        if !square.is_valid() {
            return Err(GameError::InvalidMove {
                reason: format!("Square index {} is out of bounds", square.index),
            });
        }

        if !game_state.board.is_empty(square) {
            return Err(GameError::InvalidMove {
                reason: format!(
                    "Square {} is already occupied, cannot place {:?}",
                    square.index, game_state.current_player
                ),
            });
        }

        let player = game_state.current_player;
        game_state.board.set_cell(square, player.to_cell());
        game_state.add_move(Move::new(player, square));

        let evaluation = Self::evaluate(&game_state.board);
        match evaluation {
            Evaluation::Win { winner, line } => {
                game_state.finish(Some(winner), Some(line));
            }
            Evaluation::Draw => {
                game_state.finish(None, None);
            }
            Evaluation::InProgress => {
                game_state.switch_player();
            }
        }

        Ok(evaluation)
    }
}

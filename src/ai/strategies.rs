//! AI戦略の実装モジュール
//! マシンプレイヤー（O）の着手を選択する戦略を定義し、
//! 統一されたインターフェースで提供する。

use super::evaluation::score_terminal;
use crate::error::AIError;
use crate::game::{Board, Cell, GameState, Square, TicTacToeRules};

/// AI戦略の共通インターフェース
/// 異なるAI実装を統一して扱うためのtrait
pub trait AIStrategy: Send + Sync {
    /// ゲーム状態から最適な手を計算する
    fn calculate_move(&self, game_state: &GameState) -> Result<Square, AIError>;
    /// AIの名前を返す
    fn get_name(&self) -> &'static str;
}

/// 探索結果を表す構造体
/// 選択したマスと評価値、訪問ノード数を保持する
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub square: Square,
    pub score: i32,
    pub nodes_visited: u64,
}

/// ミニマックス法を使用するAI実装
/// ゲームツリー全体を枝刈りなしで探索して最適手を見つける。
/// 盤面は高々9マスなので毎回の全探索で十分に速い
#[derive(Debug, Clone)]
pub struct MinimaxAI;

impl MinimaxAI {
    /// 新しいMinimaxAIインスタンスを作成する
    pub fn new() -> Self {
        MinimaxAI
    }

    /// Oの手番の盤面を全探索し、最善のマスを返す
    /// マスは0→8の順でスキャンし、同評価なら先に見つかった
    /// （最小インデックスの）マスを保持する
    pub fn search(board: &Board) -> Result<SearchResult, AIError> {
        let mut scratch = board.clone();
        let mut best_score = i32::MIN;
        let mut best_square = None;
        let mut nodes_visited = 0u64;

        for square in Square::all() {
            if scratch.is_empty(square) {
                scratch.set_cell(square, Cell::O);
                let score = Self::minimax(&mut scratch, 0, false, &mut nodes_visited);
                scratch.set_cell(square, Cell::Empty);

                if score > best_score {
                    best_score = score;
                    best_square = Some(square);
                }
            }
        }

        match best_square {
            Some(square) => Ok(SearchResult {
                square,
                score: best_score,
                nodes_visited,
            }),
            None => Err(AIError::NoValidMoves),
        }
    }

    /// ミニマックス再帰本体
    /// 手を置いて再帰し、必ず元に戻すことで探索外から盤面の
    /// 変更が観測されないことを保証する
    fn minimax(board: &mut Board, depth: i32, maximizing: bool, nodes_visited: &mut u64) -> i32 {
        *nodes_visited += 1;

        if let Some(score) = score_terminal(&TicTacToeRules::evaluate(board), depth) {
            return score;
        }

        if maximizing {
            let mut best_score = i32::MIN;
            for square in Square::all() {
                if board.is_empty(square) {
                    board.set_cell(square, Cell::O);
                    let score = Self::minimax(board, depth + 1, false, nodes_visited);
                    board.set_cell(square, Cell::Empty);
                    best_score = best_score.max(score);
                }
            }
            best_score
        } else {
            let mut best_score = i32::MAX;
            for square in Square::all() {
                if board.is_empty(square) {
                    board.set_cell(square, Cell::X);
                    let score = Self::minimax(board, depth + 1, true, nodes_visited);
                    board.set_cell(square, Cell::Empty);
                    best_score = best_score.min(score);
                }
            }
            best_score
        }
    }
}

impl Default for MinimaxAI {
    fn default() -> Self {
        Self::new()
    }
}

impl AIStrategy for MinimaxAI {
    /// ミニマックス法で最適手を計算する
    fn calculate_move(&self, game_state: &GameState) -> Result<Square, AIError> {
        if game_state.is_finished() {
            return Err(AIError::StrategyError {
                message: "Cannot calculate move for finished game".to_string(),
            });
        }

        let result = Self::search(&game_state.board)?;
        Ok(result.square)
    }

    fn get_name(&self) -> &'static str {
        "MinimaxAI"
    }
}

/// AI戦略を生成するファクトリ関数
/// マシンプレイヤーの戦略は全探索ミニマックスのみ
pub fn create_ai_strategy() -> Box<dyn AIStrategy> {
    Box::new(MinimaxAI::new())
}

//! AIの終端局面スコアリング
//! ミニマックス探索が葉で使う評価値を提供する。
//! 深さ補正により早い勝ちと遅い負けを優先する。

use crate::game::{Evaluation, Player};

/// 勝利の基準スコア
/// Oの勝ちは +WIN_SCORE - depth、Xの勝ちは -WIN_SCORE + depth で評価する
pub const WIN_SCORE: i32 = 10;

/// 終端局面のスコアを計算する
/// 探索ルートからの手数depthで補正し、進行中の局面ではNoneを返す
pub fn score_terminal(evaluation: &Evaluation, depth: i32) -> Option<i32> {
    match evaluation {
        Evaluation::Win {
            winner: Player::O, ..
        } => Some(WIN_SCORE - depth),
        Evaluation::Win {
            winner: Player::X, ..
        } => Some(-WIN_SCORE + depth),
        Evaluation::Draw => Some(0),
        Evaluation::InProgress => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_terminal_machine_win() {
        let win = Evaluation::Win {
            winner: Player::O,
            line: [0, 1, 2],
        };

        assert_eq!(score_terminal(&win, 0), Some(10));
        assert_eq!(score_terminal(&win, 3), Some(7));
    }

    #[test]
    fn test_score_terminal_human_win() {
        let win = Evaluation::Win {
            winner: Player::X,
            line: [2, 4, 6],
        };

        assert_eq!(score_terminal(&win, 0), Some(-10));
        assert_eq!(score_terminal(&win, 4), Some(-6));
    }

    #[test]
    fn test_score_terminal_draw() {
        assert_eq!(score_terminal(&Evaluation::Draw, 0), Some(0));
        assert_eq!(score_terminal(&Evaluation::Draw, 8), Some(0));
    }

    #[test]
    fn test_score_terminal_in_progress() {
        assert_eq!(score_terminal(&Evaluation::InProgress, 2), None);
    }

    #[test]
    fn test_depth_prefers_faster_win() {
        let win = Evaluation::Win {
            winner: Player::O,
            line: [0, 4, 8],
        };

        // 浅い深さでの勝ちほど高スコア
        assert!(score_terminal(&win, 1).unwrap() > score_terminal(&win, 3).unwrap());
    }
}

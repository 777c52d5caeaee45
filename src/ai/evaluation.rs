//! AIの盤面評価システム
//! 固定の位置重みテーブルで盤面の優劣を判定する静的評価関数を提供する。
//! 着手可能数や偶数理論は考慮しない。

use crate::game::{Board, Player, Position, ReversiRules, BOARD_SIZE};

/// マスごとの位置評価値
/// 隅と辺を高く、隅に隣接するマスを大きく減点する
pub const POSITION_WEIGHTS: [[i32; BOARD_SIZE]; BOARD_SIZE] = [
    [100, -20, 10, 5, 5, 10, -20, 100],
    [-20, -50, -2, -2, -2, -2, -50, -20],
    [10, -2, -1, -1, -1, -1, -2, 10],
    [5, -2, -1, -1, -1, -1, -2, 5],
    [5, -2, -1, -1, -1, -1, -2, 5],
    [10, -2, -1, -1, -1, -1, -2, 10],
    [-20, -50, -2, -2, -2, -2, -50, -20],
    [100, -20, 10, 5, 5, 10, -20, 100],
];

/// 盤面評価を行うスタティックメソッド集
pub struct BoardEvaluator;

impl BoardEvaluator {
    /// 指定したプレイヤーにとっての盤面評価値を計算する
    /// 自分の石のマスの重み合計から相手の石のマスの重み合計を引く
    pub fn evaluate_board(board: &Board, player: Player) -> i32 {
        let mut score = 0;

        for (row, cells) in board.cells().iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                match cell.owner() {
                    Some(owner) if owner == player => score += POSITION_WEIGHTS[row][col],
                    Some(_) => score -= POSITION_WEIGHTS[row][col],
                    None => {}
                }
            }
        }

        score
    }

    /// 盤面の複製に手を適用してから評価する
    /// 不正な手の場合はNone
    pub fn evaluate_move(board: &Board, position: Position, player: Player) -> Option<i32> {
        let next = ReversiRules::simulate_move(board, position, player)?;
        Some(Self::evaluate_board(&next, player))
    }
}

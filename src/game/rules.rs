//! リバーシのルール実装モジュール
//! 合法手の判定、石のフリップ処理、ゲーム終了判定などを担当する。

use super::board::Board;
use super::types::{Move, Player, Position, BOARD_SIZE};
use crate::error::{GameError, Result};

/// 盤面上の8方向への移動ベクトル
const DIRECTIONS: [(isize, isize); 8] = [
    (-1, -1), (-1, 0), (-1, 1),  // 左上、上、右上
    (0, -1),           (0, 1),   // 左、右
    (1, -1),  (1, 0),  (1, 1),   // 左下、下、右下
];

/// リバーシのルールを実装する構造体
/// スタティックメソッドのみを提供する
pub struct ReversiRules;

impl ReversiRules {
    /// 指定した位置にプレイヤーが置けるかチェックする
    /// 空のマスで、かつ相手の石を少なくとも1個フリップできる必要がある
    pub fn is_valid_move(board: &Board, position: Position, player: Player) -> bool {
        !Self::get_flipped_positions(board, position, player).is_empty()
    }

    /// 指定した位置に石を置いた場合にフリップされる石の位置を返す
    /// 8方向それぞれで相手の石の連続を集め、自分の石で閉じている列だけを採用する
    pub fn get_flipped_positions(
        board: &Board,
        position: Position,
        player: Player,
    ) -> Vec<Position> {
        if !board.is_empty(position) {
            return Vec::new();
        }

        let mut flipped = Vec::new();
        let player_cell = player.to_cell();
        let opponent_cell = player.opposite().to_cell();

        for &(dr, dc) in &DIRECTIONS {
            let mut line_flipped = Vec::new();
            let mut current_row = position.row as isize + dr;
            let mut current_col = position.col as isize + dc;

            while Self::in_bounds(current_row, current_col) {
                let current_pos = Position {
                    row: current_row as usize,
                    col: current_col as usize,
                };

                match board.get_cell(current_pos) {
                    Some(cell) if cell == opponent_cell => {
                        line_flipped.push(current_pos);
                    }
                    Some(cell) if cell == player_cell => {
                        // 自分の石で閉じた列のみ確定
                        flipped.extend(line_flipped);
                        break;
                    }
                    _ => break,
                }

                current_row += dr;
                current_col += dc;
            }
        }

        flipped
    }

    fn in_bounds(row: isize, col: isize) -> bool {
        let size = BOARD_SIZE as isize;
        (0..size).contains(&row) && (0..size).contains(&col)
    }

    /// 指定したプレイヤーの合法手を全て取得する
    /// 行優先（上から下、左から右）の順で返す。先頭の手を使うフォールバックはこの順序に依存する
    pub fn get_valid_moves(board: &Board, player: Player) -> Vec<Position> {
        Position::all()
            .filter(|&position| Self::is_valid_move(board, position, player))
            .collect()
    }

    /// 指定したプレイヤーに合法手があるかチェックする
    pub fn has_valid_moves(board: &Board, player: Player) -> bool {
        Position::all().any(|position| Self::is_valid_move(board, position, player))
    }

    /// 盤面に手を適用する
    /// 不正な手の場合は盤面を変更せずにIllegalMoveを返す
    pub fn apply_move(board: &mut Board, position: Position, player: Player) -> Result<Move> {
        let flipped = Self::get_flipped_positions(board, position, player);
        if flipped.is_empty() {
            return Err(GameError::IllegalMove {
                row: position.row,
                col: position.col,
                player,
            });
        }

        board.set_cell(position, player.to_cell());
        for flip_pos in &flipped {
            board.set_cell(*flip_pos, player.to_cell());
        }

        Ok(Move::new(player, position, flipped))
    }

    /// 盤面の複製に手を適用して返す
    /// 元の盤面は変更しない。不正な手の場合はNone
    pub fn simulate_move(board: &Board, position: Position, player: Player) -> Option<Board> {
        let mut next = board.clone();
        Self::apply_move(&mut next, position, player).ok()?;
        Some(next)
    }

    /// ゲーム終了判定（両プレイヤーとも合法手がない）
    pub fn is_game_over(board: &Board) -> bool {
        !Self::has_valid_moves(board, Player::Black) && !Self::has_valid_moves(board, Player::White)
    }

    /// 最終スコアに基づいて勝者を決定する
    /// 同数の場合はNone（引き分け）を返す
    pub fn determine_winner(board: &Board) -> Option<Player> {
        let (black_count, white_count) = board.count_pieces();

        if black_count > white_count {
            Some(Player::Black)
        } else if white_count > black_count {
            Some(Player::White)
        } else {
            None
        }
    }
}

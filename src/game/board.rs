//! リバーシゲームの盤面状態を管理するモジュール
//! 8x8グリッドの盤面と石の配置を担当する。ルールは持たない純粋なデータ。

use super::types::{Cell, Player, Position, BOARD_SIZE};
use serde::{Deserialize, Serialize};

/// 8x8リバーシ盤面を表現する構造体
/// 探索中のシミュレーションでは必ず複製して使う
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// 標準の初期配置を持つ盤面を作成する
    pub fn new() -> Self {
        Self::with_standard_opening()
    }

    /// 全マスが空の盤面を作成する
    pub fn empty() -> Self {
        Board {
            cells: [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// 中央の4マスに初期配置（白黒が対角）を設定した盤面を作成する
    pub fn with_standard_opening() -> Self {
        let mut board = Self::empty();

        board.cells[3][3] = Cell::White;
        board.cells[3][4] = Cell::Black;
        board.cells[4][3] = Cell::Black;
        board.cells[4][4] = Cell::White;

        board
    }

    /// 指定した位置のセル状態を取得する
    /// 範囲外の場合はNoneを返す
    pub fn get_cell(&self, position: Position) -> Option<Cell> {
        if position.is_valid() {
            Some(self.cells[position.row][position.col])
        } else {
            None
        }
    }

    /// 指定した位置にセル状態を設定する
    /// 範囲外の場合はfalseを返す
    pub fn set_cell(&mut self, position: Position, cell: Cell) -> bool {
        if position.is_valid() {
            self.cells[position.row][position.col] = cell;
            true
        } else {
            false
        }
    }

    /// 指定した位置が空かチェックする
    pub fn is_empty(&self, position: Position) -> bool {
        matches!(self.get_cell(position), Some(Cell::Empty))
    }

    pub fn cells(&self) -> &[[Cell; BOARD_SIZE]; BOARD_SIZE] {
        &self.cells
    }

    /// 盤面上の黒石と白石の数を数える
    /// 戻り値: (黒石数, 白石数)
    pub fn count_pieces(&self) -> (u8, u8) {
        let mut black_count = 0;
        let mut white_count = 0;

        for row in &self.cells {
            for &cell in row {
                match cell {
                    Cell::Black => black_count += 1,
                    Cell::White => white_count += 1,
                    Cell::Empty => {}
                }
            }
        }

        (black_count, white_count)
    }

    /// 指定したプレイヤーの石数
    pub fn count_for(&self, player: Player) -> u8 {
        let (black, white) = self.count_pieces();
        match player {
            Player::Black => black,
            Player::White => white,
        }
    }

    /// 盤面上の石の総数
    pub fn disc_count(&self) -> u8 {
        let (black, white) = self.count_pieces();
        black + white
    }

    /// 表示用の盤面文字列を生成する
    /// ●で黒、○で白、.で空マスを表現
    pub fn display(&self) -> String {
        let mut result = String::new();
        result.push_str("  0 1 2 3 4 5 6 7\n");

        for (row_idx, row) in self.cells.iter().enumerate() {
            result.push_str(&format!("{} ", row_idx));
            for &cell in row {
                let symbol = match cell {
                    Cell::Empty => ".",
                    Cell::Black => "●",
                    Cell::White => "○",
                };
                result.push_str(&format!("{} ", symbol));
            }
            result.push('\n');
        }

        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: usize, col: usize) -> Position {
        Position::new(row, col).unwrap()
    }

    #[test]
    fn test_board_empty() {
        let board = Board::empty();
        assert_eq!(board.count_pieces(), (0, 0));
        assert!(Position::all().all(|p| board.is_empty(p)));
    }

    #[test]
    fn test_board_standard_opening() {
        let board = Board::with_standard_opening();

        assert_eq!(board.get_cell(pos(3, 3)), Some(Cell::White));
        assert_eq!(board.get_cell(pos(3, 4)), Some(Cell::Black));
        assert_eq!(board.get_cell(pos(4, 3)), Some(Cell::Black));
        assert_eq!(board.get_cell(pos(4, 4)), Some(Cell::White));
        assert_eq!(board.get_cell(pos(0, 0)), Some(Cell::Empty));
        assert_eq!(board, Board::default());
    }

    #[test]
    fn test_board_out_of_range() {
        let mut board = Board::new();
        assert_eq!(board.get_cell(Position { row: 8, col: 0 }), None);
        assert!(!board.set_cell(Position { row: 0, col: 8 }, Cell::Black));
    }

    #[test]
    fn test_board_set_cell_and_counts() {
        let mut board = Board::new();
        assert!(board.set_cell(pos(0, 0), Cell::Black));

        assert_eq!(board.count_pieces(), (3, 2));
        assert_eq!(board.count_for(Player::Black), 3);
        assert_eq!(board.count_for(Player::White), 2);
        assert_eq!(board.disc_count(), 5);
    }

    #[test]
    fn test_board_display() {
        let display = Board::new().display();

        assert!(display.starts_with("  0 1 2 3 4 5 6 7\n"));
        assert!(display.contains("3 . . . ○ ● . . . \n"));
    }
}

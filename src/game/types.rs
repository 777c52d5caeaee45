//! ゲームの基本型定義モジュール
//! リバーシゲームで使用される基本的な型とenum、構造体を定義する。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 盤面の一辺のマス数
pub const BOARD_SIZE: usize = 8;

/// 盤面の各マスの状態を表現するenum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Black,
    White,
}

impl Cell {
    /// マスを占有しているプレイヤーを返す（空マスはNone）
    pub fn owner(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Black => Some(Player::Black),
            Cell::White => Some(Player::White),
        }
    }
}

/// ゲームのプレイヤーを表すenum
/// 先手は黒、後手は白
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    Black,
    White,
}

impl Player {
    /// 相手プレイヤーを返す
    pub fn opposite(self) -> Player {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }

    /// プレイヤーを対応するセル状態に変換する
    pub fn to_cell(self) -> Cell {
        match self {
            Player::Black => Cell::Black,
            Player::White => Cell::White,
        }
    }

    /// 画面表示用の色名
    pub fn label(self) -> &'static str {
        match self {
            Player::Black => "黒",
            Player::White => "白",
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// "black"/"white" のほか先手・後手の呼び方 "first"/"second" も受け付ける
impl FromStr for Player {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "black" | "first" | "黒" => Ok(Player::Black),
            "white" | "second" | "白" => Ok(Player::White),
            other => Err(format!("unknown player color: {}", other)),
        }
    }
}

/// 8x8リバーシ盤面上の座標を表す構造体
/// row, colともに0-7の範囲で有効
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    /// 範囲チェック付きのコンストラクタ
    /// 8x8盤面の範囲外の座標の場合はNoneを返す
    pub fn new(row: usize, col: usize) -> Option<Position> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Some(Position { row, col })
        } else {
            None
        }
    }

    /// 座標が有効範囲内かチェックする
    pub fn is_valid(&self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }

    /// 盤面の全座標を行優先（上から下、左から右）で列挙する
    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Position { row, col }))
    }
}

/// ゲームの1手を表現する構造体
/// 着手位置とひっくり返された石の位置を保持する。
/// 必要な時に計算されるだけで、ゲーム状態には保存しない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub player: Player,
    pub position: Position,
    pub flipped: Vec<Position>,
}

impl Move {
    pub fn new(player: Player, position: Position, flipped: Vec<Position>) -> Self {
        Self {
            player,
            position,
            flipped,
        }
    }
}

//! 描画用の盤面スナップショット

use serde::Serialize;

use crate::game::{Board, GameState, Player, Position, TurnOwner, TurnPhase};

/// 状態変化の通知で描画側に渡す盤面情報
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardSnapshot {
    pub board: Board,
    pub current_player: Player,
    /// ゲーム終了後はNone
    pub turn_owner: Option<TurnOwner>,
    pub black_count: u8,
    pub white_count: u8,
    /// 手番のプレイヤーが置けるマス（ハイライト用）
    pub valid_moves: Vec<Position>,
    pub phase: TurnPhase,
    pub epoch: u64,
    pub role_locked: bool,
}

impl BoardSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let (black_count, white_count) = state.score();
        Self {
            board: state.board.clone(),
            current_player: state.current_player,
            turn_owner: state.turn_owner(),
            black_count,
            white_count,
            valid_moves: state.valid_moves(),
            phase: state.phase.clone(),
            epoch: state.epoch,
            role_locked: state.role_locked,
        }
    }

    /// 盤面と手番、スコアをテキストで表示する
    pub fn render(&self) -> String {
        let turn = match self.turn_owner {
            Some(TurnOwner::Human) => format!("{}（あなた）", self.current_player),
            Some(TurnOwner::Computer) => format!("{}（CPU）", self.current_player),
            None => "-".to_string(),
        };
        format!(
            "{}手番: {} | 黒: {} | 白: {}",
            self.board.display(),
            turn,
            self.black_count,
            self.white_count
        )
    }
}

//! ゲーム状態管理モジュール
//! 盤面、手番、人間/コンピュータの役割、世代番号（エポック）を保持し、
//! 純粋な状態遷移関数で手番を進める。非同期の思考待ちは session 側が担当する。

use super::board::Board;
use super::rules::ReversiRules;
use super::types::{Move, Player, Position};
use crate::error::{GameError, Result};
use serde::{Deserialize, Serialize};

/// 手番を持っている側
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnOwner {
    Human,
    Computer,
}

/// 人間とコンピュータの色の割り当て
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub human: Player,
    pub computer: Player,
}

impl RoleAssignment {
    pub fn new(human: Player) -> Self {
        Self {
            human,
            computer: human.opposite(),
        }
    }

    pub fn owner_of(&self, player: Player) -> TurnOwner {
        if player == self.human {
            TurnOwner::Human
        } else {
            TurnOwner::Computer
        }
    }
}

/// ゲームの進行状態を表すenum
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    /// 最初のゲームがまだ開始されていない
    NotStarted,
    /// 人間の着手待ち
    AwaitingHumanMove,
    /// コンピュータの思考中
    ComputerThinking,
    /// `by` が置ける場所がなくパスした直後
    /// `current_player` は既に `by` の相手に切り替わっている。もう一度 `process_turn` で解決する
    Passed { by: Player },
    /// ゲーム終了（勝者と最終スコア (黒, 白) を記録）
    GameOver {
        winner: Option<Player>,
        score: (u8, u8),
    },
}

/// リバーシゲームの全体状態を保持する構造体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub current_player: Player,
    pub roles: RoleAssignment,
    pub role_locked: bool,
    pub epoch: u64,
    pub phase: TurnPhase,
}

impl GameState {
    /// 最初のゲームを開始した状態を作成する（エポック1）
    pub fn new(human_color: Player) -> Self {
        let mut state = Self::idle(human_color);
        state.start_new_game(human_color);
        state
    }

    /// 対局開始前の状態を作成する（エポック0）
    /// 手番は `start_new_game` などで対局を始めるまで誰にもない
    pub fn idle(human_color: Player) -> Self {
        Self {
            board: Board::new(),
            current_player: Player::Black,
            roles: RoleAssignment::new(human_color),
            role_locked: false,
            epoch: 0,
            phase: TurnPhase::NotStarted,
        }
    }

    /// 任意の局面からゲーム状態を作成する
    /// 局面解析やテストで使用する
    pub fn from_position(board: Board, current_player: Player, human_color: Player) -> Self {
        let mut state = Self::idle(human_color);
        state.load_position(board, current_player, human_color);
        state
    }

    /// 新しいゲームを開始する
    /// エポックを進め、役割のロックを解除して盤面を作り直す
    pub fn start_new_game(&mut self, human_color: Player) -> TurnPhase {
        self.load_position(Board::with_standard_opening(), Player::Black, human_color)
    }

    /// 指定した局面と手番から新しいゲームを開始する
    /// エポックを進めて役割のロックを解除し、最初の手番を1段階評価する
    pub fn load_position(
        &mut self,
        board: Board,
        current_player: Player,
        human_color: Player,
    ) -> TurnPhase {
        self.epoch += 1;
        self.roles = RoleAssignment::new(human_color);
        self.role_locked = false;
        self.board = board;
        self.current_player = current_player;
        self.process_turn()
    }

    /// 人間側の色を選び直す
    /// 最初の手が打たれる前だけ受け付け、新しいゲームを開始する
    pub fn select_human_color(&mut self, color: Player) -> Result<TurnPhase> {
        if self.role_locked {
            return Err(GameError::RoleLocked);
        }
        Ok(self.start_new_game(color))
    }

    /// 人間の着手を処理する
    /// 拒否した場合は状態を一切変更しない
    pub fn attempt_human_move(&mut self, position: Position) -> Result<Move> {
        if self.phase != TurnPhase::AwaitingHumanMove {
            return Err(GameError::NotYourTurn);
        }
        self.play(position)
    }

    /// 思考待ちから戻ったコンピュータの着手を処理する
    /// 捕捉したエポックが現在と異なる場合は何もせずに破棄する
    pub fn apply_computer_move(&mut self, epoch: u64, position: Position) -> Result<Move> {
        self.check_epoch(epoch)?;
        if self.phase != TurnPhase::ComputerThinking {
            return Err(GameError::NotYourTurn);
        }
        self.play(position)
    }

    fn play(&mut self, position: Position) -> Result<Move> {
        let game_move = ReversiRules::apply_move(&mut self.board, position, self.current_player)?;
        self.role_locked = true;
        self.switch_player();
        self.phase = self.process_turn();
        Ok(game_move)
    }

    /// 現在の手番を1段階だけ評価する
    ///
    /// 合法手があれば手番の持ち主に応じて着手待ちか思考中になる。
    /// 合法手がなければ相手の合法手を確認し、相手もなければゲーム終了、
    /// 相手にあればパスとして手番だけを交代する。パス後の解決は呼び出し側が
    /// もう一度このメソッドを呼んで行う。
    pub fn process_turn(&mut self) -> TurnPhase {
        let phase = if ReversiRules::has_valid_moves(&self.board, self.current_player) {
            match self.roles.owner_of(self.current_player) {
                TurnOwner::Human => TurnPhase::AwaitingHumanMove,
                TurnOwner::Computer => TurnPhase::ComputerThinking,
            }
        } else if !ReversiRules::has_valid_moves(&self.board, self.current_player.opposite()) {
            TurnPhase::GameOver {
                winner: ReversiRules::determine_winner(&self.board),
                score: self.board.count_pieces(),
            }
        } else {
            let passed = self.current_player;
            self.switch_player();
            TurnPhase::Passed { by: passed }
        };

        self.phase = phase.clone();
        phase
    }

    /// 継続処理が捕捉したエポックが現在のものか確認する
    pub fn check_epoch(&self, epoch: u64) -> Result<()> {
        if epoch != self.epoch {
            return Err(GameError::StaleContinuation {
                captured: epoch,
                live: self.epoch,
            });
        }
        Ok(())
    }

    pub fn switch_player(&mut self) {
        self.current_player = self.current_player.opposite();
    }

    /// 現在の手番の持ち主（ゲーム終了後はNone）
    pub fn turn_owner(&self) -> Option<TurnOwner> {
        if self.is_finished() || self.phase == TurnPhase::NotStarted {
            None
        } else {
            Some(self.roles.owner_of(self.current_player))
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, TurnPhase::GameOver { .. })
    }

    /// 現在のスコアを取得する
    /// 戻り値: (黒石数, 白石数)
    pub fn score(&self) -> (u8, u8) {
        self.board.count_pieces()
    }

    /// 現在の手番のプレイヤーの合法手
    pub fn valid_moves(&self) -> Vec<Position> {
        if self.is_finished() || self.phase == TurnPhase::NotStarted {
            return Vec::new();
        }
        ReversiRules::get_valid_moves(&self.board, self.current_player)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Player::Black)
    }
}

//! AI戦略の実装モジュール
//! ランダム、貪欲（1手読みの静的評価）、ミニマックス（αβ枝刈り）の
//! 各戦略を定義し、統一されたインターフェースで提供する。

use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::evaluation::BoardEvaluator;
use crate::error::AIError;
use crate::game::{Board, Player, Position, ReversiRules};

/// 標準の探索深度
pub const DEFAULT_SEARCH_DEPTH: u8 = 3;

/// AIの難易度を表すenum
/// コンピュータの手番の開始時に一度だけ読み取られる
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    /// 合法手からランダムに選ぶ
    Random,
    /// 1手先の盤面評価が最大の手を選ぶ
    Greedy,
    /// αβ枝刈り付きミニマックス探索
    Minimax,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Random => "random",
            Difficulty::Greedy => "eval",
            Difficulty::Minimax => "minimax",
        };
        f.write_str(name)
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "random" => Ok(Difficulty::Random),
            "eval" | "greedy" => Ok(Difficulty::Greedy),
            "minimax" => Ok(Difficulty::Minimax),
            other => Err(format!("unknown difficulty: {}", other)),
        }
    }
}

/// 戦略が選んだ手と探索の統計
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveChoice {
    pub position: Position,
    /// 選んだ手の評価値（ランダムではNone）
    pub score: Option<i32>,
    pub nodes_evaluated: u64,
}

/// AI戦略の共通インターフェース
pub trait AIStrategy: Send + Sync {
    /// 盤面と手番から手を選ぶ
    fn calculate_move(&self, board: &Board, player: Player) -> Result<MoveChoice, AIError>;
    fn get_difficulty(&self) -> Difficulty;
    fn get_name(&self) -> &'static str;
}

fn legal_moves_or_err(board: &Board, player: Player) -> Result<Vec<Position>, AIError> {
    let moves = ReversiRules::get_valid_moves(board, player);
    if moves.is_empty() {
        return Err(AIError::NoValidMoves);
    }
    Ok(moves)
}

/// 合法手の中から一様ランダムに選ぶAI
#[derive(Debug, Clone, Default)]
pub struct RandomAI;

impl RandomAI {
    pub fn new() -> Self {
        RandomAI
    }
}

impl AIStrategy for RandomAI {
    fn calculate_move(&self, board: &Board, player: Player) -> Result<MoveChoice, AIError> {
        let moves = legal_moves_or_err(board, player)?;
        let position = *moves
            .choose(&mut rand::rng())
            .ok_or(AIError::NoValidMoves)?;

        Ok(MoveChoice {
            position,
            score: None,
            nodes_evaluated: 0,
        })
    }

    fn get_difficulty(&self) -> Difficulty {
        Difficulty::Random
    }

    fn get_name(&self) -> &'static str {
        "RandomAI"
    }
}

/// 1手先の盤面を静的評価して最善の手を選ぶAI
/// 同点の場合は行優先で先に見つかった手を選ぶ
#[derive(Debug, Clone, Default)]
pub struct GreedyAI;

impl GreedyAI {
    pub fn new() -> Self {
        GreedyAI
    }
}

impl AIStrategy for GreedyAI {
    fn calculate_move(&self, board: &Board, player: Player) -> Result<MoveChoice, AIError> {
        let moves = legal_moves_or_err(board, player)?;

        let mut best: Option<(Position, i32)> = None;
        let mut nodes_evaluated = 0;
        for position in moves {
            let Some(score) = BoardEvaluator::evaluate_move(board, position, player) else {
                continue;
            };
            nodes_evaluated += 1;
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((position, score));
            }
        }

        let (position, score) = best.ok_or(AIError::NoValidMoves)?;
        Ok(MoveChoice {
            position,
            score: Some(score),
            nodes_evaluated,
        })
    }

    fn get_difficulty(&self) -> Difficulty {
        Difficulty::Greedy
    }

    fn get_name(&self) -> &'static str {
        "GreedyAI"
    }
}

/// ミニマックス法で手を選ぶAI
/// 指定した深度までゲームツリーを探索する。`pruning` が有効ならαβ枝刈りを行う
#[derive(Debug, Clone)]
pub struct MinimaxAI {
    /// 探索深度（手数）。0は1として扱う
    pub depth: u8,
    pub pruning: bool,
}

impl MinimaxAI {
    /// αβ枝刈り付きのMinimaxAIを作成する
    pub fn new(depth: u8) -> Self {
        MinimaxAI {
            depth,
            pruning: true,
        }
    }

    /// 枝刈りなしの完全なミニマックス探索
    /// 枝刈り版と結果が一致することの確認に使う
    pub fn without_pruning(depth: u8) -> Self {
        MinimaxAI {
            depth,
            pruning: false,
        }
    }
}

impl AIStrategy for MinimaxAI {
    fn calculate_move(&self, board: &Board, player: Player) -> Result<MoveChoice, AIError> {
        let moves = legal_moves_or_err(board, player)?;
        let depth = self.depth.max(1);
        let mut search = MinimaxSearch {
            root: player,
            pruning: self.pruning,
            nodes: 0,
        };

        let mut alpha = i32::MIN;
        let beta = i32::MAX;
        let mut best: Option<(Position, i32)> = None;

        for position in moves {
            let Some(next) = ReversiRules::simulate_move(board, position, player) else {
                continue;
            };
            let value = search.minimax(&next, depth - 1, alpha, beta, false);
            if best.map_or(true, |(_, best_value)| value > best_value) {
                best = Some((position, value));
            }
            if search.pruning {
                alpha = alpha.max(value);
            }
        }

        let (position, score) = best.ok_or(AIError::NoValidMoves)?;
        Ok(MoveChoice {
            position,
            score: Some(score),
            nodes_evaluated: search.nodes,
        })
    }

    fn get_difficulty(&self) -> Difficulty {
        Difficulty::Minimax
    }

    fn get_name(&self) -> &'static str {
        if self.pruning {
            "MinimaxAI"
        } else {
            "MinimaxAI (no pruning)"
        }
    }
}

/// 1回の探索の状態
/// 評価は常にルートのプレイヤー視点で行う
struct MinimaxSearch {
    root: Player,
    pruning: bool,
    nodes: u64,
}

impl MinimaxSearch {
    fn minimax(
        &mut self,
        board: &Board,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> i32 {
        self.nodes += 1;

        let mover = if maximizing { self.root } else { self.root.opposite() };
        let moves = ReversiRules::get_valid_moves(board, mover);
        if depth == 0 || moves.is_empty() {
            return BoardEvaluator::evaluate_board(board, self.root);
        }

        if maximizing {
            let mut best = i32::MIN;
            for position in moves {
                let Some(next) = ReversiRules::simulate_move(board, position, mover) else {
                    continue;
                };
                best = best.max(self.minimax(&next, depth - 1, alpha, beta, false));
                alpha = alpha.max(best);
                if self.pruning && beta <= alpha {
                    break;
                }
            }
            best
        } else {
            let mut best = i32::MAX;
            for position in moves {
                let Some(next) = ReversiRules::simulate_move(board, position, mover) else {
                    continue;
                };
                best = best.min(self.minimax(&next, depth - 1, alpha, beta, true));
                beta = beta.min(best);
                if self.pruning && beta <= alpha {
                    break;
                }
            }
            best
        }
    }
}

/// 難易度に応じたAI戦略を生成するファクトリ関数
pub fn create_ai_strategy(difficulty: Difficulty, depth: u8) -> Box<dyn AIStrategy> {
    match difficulty {
        Difficulty::Random => Box::new(RandomAI::new()),
        Difficulty::Greedy => Box::new(GreedyAI::new()),
        Difficulty::Minimax => Box::new(MinimaxAI::new(depth)),
    }
}

/// 難易度と深度を指定して最善手を求める
pub fn best_move(
    board: &Board,
    player: Player,
    depth: u8,
    difficulty: Difficulty,
) -> Result<Position, AIError> {
    create_ai_strategy(difficulty, depth)
        .calculate_move(board, player)
        .map(|choice| choice.position)
}

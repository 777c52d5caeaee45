//! エンジン全体のエラー定義モジュール
//! ゲームロジックとAIのエラーを統一管理する。どれも致命的ではなく、
//! 呼び出し側で処理して状態は変更しない。

use thiserror::Error;

use crate::game::Player;

/// ゲームロジックに関連するエラー
#[derive(Debug, Error)]
pub enum GameError {
    #[error("Illegal move at ({row}, {col}) for {player:?}")]
    IllegalMove {
        row: usize,
        col: usize,
        player: Player,
    },

    #[error("Not your turn")]
    NotYourTurn,

    #[error("Roles are locked until the next game")]
    RoleLocked,

    /// 思考待ちの間に新しいゲームが始まった継続処理
    #[error("Stale continuation: captured epoch {captured}, live epoch {live}")]
    StaleContinuation { captured: u64, live: u64 },

    #[error("AI calculation failed: {source}")]
    AIError {
        #[from]
        source: AIError,
    },
}

/// AIに関連するエラー
#[derive(Debug, Error)]
pub enum AIError {
    #[error("No valid moves available")]
    NoValidMoves,

    #[error("AI strategy error: {message}")]
    StrategyError { message: String },

    #[error("AI service unavailable: {service_name} - {reason}")]
    ServiceUnavailable {
        service_name: String,
        reason: String,
    },
}

/// ゲームエラーをベースとした結果型
pub type Result<T> = std::result::Result<T, GameError>;

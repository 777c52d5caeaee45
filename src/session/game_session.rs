//! ゲームセッション管理モジュール
//! 1局のゲーム状態を所有し、人間の着手、パスの連鎖、コンピュータの
//! 思考待ち（遅延実行）を順に進めて、描画側へ状態変化とメッセージを通知する。
//!
//! コンピュータの手番は思考待ちの後に別タスクで実行される。タスクは予約時の
//! エポックを保持し、盤面を変更する前に現在のエポックと照合する。新しい
//! ゲームが始まっていれば何もせずに破棄される。

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::snapshot::BoardSnapshot;
use crate::ai::service::AIService;
use crate::ai::strategies::Difficulty;
use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::game::{Board, GameState, Move, Player, Position, ReversiRules, TurnPhase};

type StateListener = Box<dyn Fn(&BoardSnapshot) + Send + Sync>;
type MessageListener = Box<dyn Fn(&str) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    state_changed: Vec<StateListener>,
    message: Vec<MessageListener>,
}

struct SessionInner {
    state: Mutex<GameState>,
    difficulty: RwLock<Difficulty>,
    ai_service: Arc<dyn AIService>,
    config: GameConfig,
    listeners: RwLock<Listeners>,
    pending_turn: Mutex<Option<JoinHandle<()>>>,
    message_seq: AtomicU64,
}

/// 1局分のゲームを進行させるコントローラ
/// クローンしても同じセッションを指す
#[derive(Clone)]
pub struct GameSession {
    inner: Arc<SessionInner>,
}

impl GameSession {
    /// セッションを作成する
    /// 対局は `start_new_game` を呼んだ時点で始まり、それまでは誰の手番でもない
    pub fn new(config: GameConfig, ai_service: Arc<dyn AIService>) -> Self {
        let state = GameState::idle(config.human_color);
        let difficulty = config.default_difficulty;

        Self {
            inner: Arc::new(SessionInner {
                state: Mutex::new(state),
                difficulty: RwLock::new(difficulty),
                ai_service,
                config,
                listeners: RwLock::new(Listeners::default()),
                pending_turn: Mutex::new(None),
                message_seq: AtomicU64::new(0),
            }),
        }
    }

    /// 盤面の変化とパスのたびに呼ばれるリスナーを登録する
    pub async fn on_state_changed<F>(&self, listener: F)
    where
        F: Fn(&BoardSnapshot) + Send + Sync + 'static,
    {
        self.inner.listeners.write().await.state_changed.push(Box::new(listener));
    }

    /// パスやゲーム終了のメッセージを受け取るリスナーを登録する
    /// 表示時間が過ぎると空文字列で消去が通知される
    pub async fn on_message<F>(&self, listener: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.inner.listeners.write().await.message.push(Box::new(listener));
    }

    /// 難易度を変更する
    /// 次のコンピュータの手番から反映され、思考中の手には影響しない
    pub async fn set_difficulty(&self, difficulty: Difficulty) {
        *self.inner.difficulty.write().await = difficulty;
        info!(%difficulty, "difficulty changed");
    }

    pub async fn difficulty(&self) -> Difficulty {
        *self.inner.difficulty.read().await
    }

    pub async fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::capture(&*self.inner.state.lock().await)
    }

    /// 新しいゲームを開始する
    /// 思考待ちのタスクは中止し、エポックを進めて役割のロックを解除する
    pub async fn start_new_game(&self, human_color: Player) {
        let mut state = self.inner.state.lock().await;
        self.cancel_pending_turn().await;

        state.start_new_game(human_color);
        info!(epoch = state.epoch, human = ?human_color, "new game started");

        self.emit_state(&state).await;
        self.drive(&mut state).await;
    }

    /// 指定した局面から新しいゲームを開始する
    /// `start_new_game` と同じく思考待ちを中止してエポックを進める
    pub async fn load_position(&self, board: Board, current_player: Player, human_color: Player) {
        let mut state = self.inner.state.lock().await;
        self.cancel_pending_turn().await;

        state.load_position(board, current_player, human_color);
        info!(
            epoch = state.epoch,
            human = ?human_color,
            to_move = ?current_player,
            "position loaded"
        );

        self.emit_state(&state).await;
        self.drive(&mut state).await;
    }

    /// 人間側の色を選び直す
    /// 最初の手が打たれる前だけ受け付け、新しいゲームとして手番を評価し直す
    pub async fn select_human_color(&self, color: Player) -> Result<()> {
        let mut state = self.inner.state.lock().await;
        if state.role_locked {
            debug!(requested = ?color, "role selection ignored while locked");
            return Err(GameError::RoleLocked);
        }

        self.cancel_pending_turn().await;
        state.select_human_color(color)?;
        info!(epoch = state.epoch, human = ?color, "roles reassigned");

        self.emit_state(&state).await;
        self.drive(&mut state).await;
        Ok(())
    }

    /// 人間の着手を試みる
    /// 拒否（NotYourTurn / IllegalMove）の場合は状態を変更しない
    pub async fn attempt_human_move(&self, row: usize, col: usize) -> Result<Move> {
        let mut state = self.inner.state.lock().await;

        let result = match Position::new(row, col) {
            Some(position) => state.attempt_human_move(position),
            None if state.phase != TurnPhase::AwaitingHumanMove => Err(GameError::NotYourTurn),
            None => Err(GameError::IllegalMove {
                row,
                col,
                player: state.current_player,
            }),
        };

        let game_move = match result {
            Ok(game_move) => game_move,
            Err(err) => {
                debug!(row, col, %err, "human move rejected");
                return Err(err);
            }
        };
        info!(
            player = ?game_move.player,
            row,
            col,
            flipped = game_move.flipped.len(),
            "human move applied"
        );

        self.emit_state(&state).await;
        self.drive(&mut state).await;
        Ok(game_move)
    }

    async fn cancel_pending_turn(&self) {
        if let Some(handle) = self.inner.pending_turn.lock().await.take() {
            handle.abort();
        }
    }

    /// 人間の着手待ちかゲーム終了になるまで手番を進める
    /// コンピュータの手番になった場合は思考待ちを予約して戻る
    async fn drive(&self, state: &mut GameState) {
        loop {
            match state.phase.clone() {
                TurnPhase::Passed { by } => {
                    info!(player = ?by, "pass");
                    self.post_message(format!("{}はパスです", by.label())).await;
                    state.process_turn();
                    self.emit_state(state).await;
                }
                TurnPhase::GameOver { winner, score } => {
                    info!(?winner, black = score.0, white = score.1, "game over");
                    self.post_message(game_over_message(winner, score)).await;
                    return;
                }
                TurnPhase::ComputerThinking => {
                    self.schedule_computer_turn(state.epoch).await;
                    return;
                }
                TurnPhase::AwaitingHumanMove | TurnPhase::NotStarted => return,
            }
        }
    }

    async fn schedule_computer_turn(&self, epoch: u64) {
        let session = self.clone();
        let delay = self.inner.config.thinking_delay;
        debug!(epoch, ?delay, "computer turn scheduled");

        let handle = tokio::spawn(async move {
            sleep(delay).await;
            session.run_computer_turn(epoch).await;
        });
        *self.inner.pending_turn.lock().await = Some(handle);
    }

    /// 思考待ち後のコンピュータの手番
    /// 予約時のエポックが古ければ盤面に触れずに終了する
    fn run_computer_turn(self, epoch: u64) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        Box::pin(async move {
            let (board, player) = {
                let state = self.inner.state.lock().await;
                if let Err(err) = state.check_epoch(epoch) {
                    debug!(%err, "discarding stale computer turn");
                    return;
                }
                if state.phase != TurnPhase::ComputerThinking {
                    return;
                }
                (state.board.clone(), state.current_player)
            };

            let difficulty = *self.inner.difficulty.read().await;
            let position = match self
                .inner
                .ai_service
                .calculate_move(&board, player, difficulty)
                .await
            {
                Ok(result) if ReversiRules::is_valid_move(&board, result.position, player) => {
                    debug!(
                        %difficulty,
                        score = ?result.evaluation_score,
                        nodes = ?result.nodes_evaluated,
                        thinking_time_ms = result.thinking_time_ms,
                        "computer move selected"
                    );
                    Some(result.position)
                }
                Ok(result) => {
                    warn!(
                        position = ?result.position,
                        "AI returned an illegal move, using first legal move"
                    );
                    ReversiRules::get_valid_moves(&board, player).first().copied()
                }
                Err(err) => {
                    warn!(
                        %err,
                        service = self.inner.ai_service.get_name(),
                        "AI failed, using first legal move"
                    );
                    ReversiRules::get_valid_moves(&board, player).first().copied()
                }
            };
            let Some(position) = position else {
                return;
            };

            let mut state = self.inner.state.lock().await;
            match state.apply_computer_move(epoch, position) {
                Ok(game_move) => {
                    info!(
                        player = ?game_move.player,
                        row = position.row,
                        col = position.col,
                        flipped = game_move.flipped.len(),
                        "computer move applied"
                    );
                    self.emit_state(&state).await;
                    self.drive(&mut state).await;
                }
                Err(GameError::StaleContinuation { captured, live }) => {
                    debug!(captured, live, "discarding stale computer move");
                }
                Err(err) => warn!(%err, "computer move rejected"),
            }
        })
    }

    async fn emit_state(&self, state: &GameState) {
        let snapshot = BoardSnapshot::capture(state);
        for listener in &self.inner.listeners.read().await.state_changed {
            listener(&snapshot);
        }
    }

    async fn emit_message(&self, message: &str) {
        for listener in &self.inner.listeners.read().await.message {
            listener(message);
        }
    }

    /// メッセージを通知し、表示時間の経過後に消去を通知する
    /// その間に新しいメッセージが出ていれば消去しない
    async fn post_message(&self, message: String) {
        let seq = self.inner.message_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.emit_message(&message).await;

        let session = self.clone();
        let duration = self.inner.config.message_duration;
        tokio::spawn(async move {
            sleep(duration).await;
            if session.inner.message_seq.load(Ordering::SeqCst) == seq {
                session.emit_message("").await;
            }
        });
    }
}

fn game_over_message(winner: Option<Player>, (black, white): (u8, u8)) -> String {
    let result = match winner {
        Some(player) => format!("{}の勝ち", player.label()),
        None => "引き分け".to_string(),
    };
    format!("ゲーム終了！ {} (黒: {} | 白: {})", result, black, white)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_over_message() {
        assert_eq!(
            game_over_message(Some(Player::Black), (40, 24)),
            "ゲーム終了！ 黒の勝ち (黒: 40 | 白: 24)"
        );
        assert_eq!(
            game_over_message(None, (32, 32)),
            "ゲーム終了！ 引き分け (黒: 32 | 白: 32)"
        );
    }
}

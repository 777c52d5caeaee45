use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tokio::time::{sleep, Duration};

use crate::error::AIError;
use crate::game::{Board, Player, Position, ReversiRules};

use super::service::{AIMoveResult, AIService, AIServiceType};
use super::strategies::Difficulty;

#[derive(Debug, Clone)]
pub struct MockAIConfig {
    pub available: bool,
    pub response_time_ms: u64,
    pub should_error: bool,
    pub error_message: String,
    pub fixed_move: Option<Position>,
    pub supported_difficulties: Vec<Difficulty>,
}

impl Default for MockAIConfig {
    fn default() -> Self {
        Self {
            available: true,
            response_time_ms: 100,
            should_error: false,
            error_message: "Mock AI error".to_string(),
            fixed_move: None,
            supported_difficulties: vec![
                Difficulty::Random,
                Difficulty::Greedy,
                Difficulty::Minimax,
            ],
        }
    }
}

/// 決定的に動くテスト用AI
/// 固定手が合法ならそれを、そうでなければ行優先で最初の合法手を返す
#[derive(Debug, Default)]
pub struct MockAIService {
    config: MockAIConfig,
    calls: AtomicUsize,
}

impl MockAIService {
    pub fn new(config: MockAIConfig) -> Self {
        Self {
            config,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn new_default() -> Self {
        Self::new(MockAIConfig::default())
    }

    pub fn new_unavailable() -> Self {
        Self::new(MockAIConfig {
            available: false,
            ..MockAIConfig::default()
        })
    }

    pub fn new_error(error_message: impl Into<String>) -> Self {
        Self::new(MockAIConfig {
            should_error: true,
            error_message: error_message.into(),
            ..MockAIConfig::default()
        })
    }

    pub fn new_with_fixed_move(position: Position) -> Self {
        Self::new(MockAIConfig {
            fixed_move: Some(position),
            response_time_ms: 0,
            ..MockAIConfig::default()
        })
    }

    pub fn new_fast() -> Self {
        Self::new(MockAIConfig {
            response_time_ms: 0,
            ..MockAIConfig::default()
        })
    }

    /// 指定した応答時間だけ待ってから答えるモック
    pub fn new_slow(response_time_ms: u64) -> Self {
        Self::new(MockAIConfig {
            response_time_ms,
            ..MockAIConfig::default()
        })
    }

    /// calculate_moveが呼ばれた回数
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AIService for MockAIService {
    async fn calculate_move(
        &self,
        board: &Board,
        player: Player,
        difficulty: Difficulty,
    ) -> Result<AIMoveResult, AIError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let start_time = Instant::now();

        if !self.config.available {
            return Err(AIError::ServiceUnavailable {
                service_name: self.get_name().to_string(),
                reason: "Mock AI service is configured as unavailable".to_string(),
            });
        }

        if self.config.should_error {
            return Err(AIError::StrategyError {
                message: self.config.error_message.clone(),
            });
        }

        if !self.config.supported_difficulties.contains(&difficulty) {
            return Err(AIError::StrategyError {
                message: format!("Difficulty {:?} is not supported by mock AI", difficulty),
            });
        }

        if self.config.response_time_ms > 0 {
            sleep(Duration::from_millis(self.config.response_time_ms)).await;
        }

        let valid_moves = ReversiRules::get_valid_moves(board, player);
        let position = match self.config.fixed_move {
            Some(fixed_move) if valid_moves.contains(&fixed_move) => fixed_move,
            _ => valid_moves.first().copied().ok_or(AIError::NoValidMoves)?,
        };

        Ok(AIMoveResult {
            position,
            thinking_time_ms: start_time.elapsed().as_millis() as u64,
            evaluation_score: None,
            nodes_evaluated: Some(valid_moves.len() as u64),
        })
    }

    async fn is_available(&self) -> bool {
        self.config.available
    }

    fn get_supported_difficulties(&self) -> Vec<Difficulty> {
        self.config.supported_difficulties.clone()
    }

    fn get_name(&self) -> &'static str {
        "MockAIService"
    }

    fn get_service_type(&self) -> AIServiceType {
        AIServiceType::Mock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_ai_service_default() {
        let service = MockAIService::new_default();
        assert_eq!(service.get_name(), "MockAIService");
        assert_eq!(service.get_service_type(), AIServiceType::Mock);
        assert!(service.is_available().await);
        assert_eq!(service.call_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_ai_service_unavailable() {
        let service = MockAIService::new_unavailable();
        assert!(!service.is_available().await);

        let result = service
            .calculate_move(&Board::new(), Player::Black, Difficulty::Random)
            .await;
        assert!(matches!(result, Err(AIError::ServiceUnavailable { .. })));
        assert!(service.health_check().await.is_err());
    }

    #[tokio::test]
    async fn test_mock_ai_service_error() {
        let service = MockAIService::new_error("Test error");

        let result = service
            .calculate_move(&Board::new(), Player::Black, Difficulty::Random)
            .await;

        if let Err(AIError::StrategyError { message }) = result {
            assert_eq!(message, "Test error");
        } else {
            panic!("Expected StrategyError");
        }
        assert_eq!(service.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_ai_service_fixed_move() {
        let fixed_position = Position::new(5, 4).unwrap();
        let service = MockAIService::new_with_fixed_move(fixed_position);

        let result = service
            .calculate_move(&Board::new(), Player::Black, Difficulty::Minimax)
            .await
            .unwrap();

        assert_eq!(result.position, fixed_position);
    }

    #[tokio::test]
    async fn test_illegal_fixed_move_falls_back_to_first_legal() {
        let service = MockAIService::new_with_fixed_move(Position::new(0, 0).unwrap());

        let result = service
            .calculate_move(&Board::new(), Player::Black, Difficulty::Minimax)
            .await
            .unwrap();

        assert_eq!(result.position, Position::new(2, 3).unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_mock_waits() {
        let service = MockAIService::new_slow(500);
        let start = tokio::time::Instant::now();

        service
            .calculate_move(&Board::new(), Player::Black, Difficulty::Random)
            .await
            .unwrap();

        assert!(start.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_unsupported_difficulty() {
        let service = MockAIService::new(MockAIConfig {
            supported_difficulties: vec![Difficulty::Random],
            response_time_ms: 0,
            ..MockAIConfig::default()
        });

        let result = service
            .calculate_move(&Board::new(), Player::Black, Difficulty::Minimax)
            .await;
        assert!(matches!(result, Err(AIError::StrategyError { .. })));
    }
}

use async_trait::async_trait;
use std::time::Instant;

use crate::error::AIError;
use crate::game::{Board, Player};

use super::service::{AIMoveResult, AIService, AIServiceType};
use super::strategies::{create_ai_strategy, Difficulty, DEFAULT_SEARCH_DEPTH};

#[derive(Debug, Clone)]
pub struct LocalAIService {
    pub search_depth: u8,
}

impl LocalAIService {
    pub fn new() -> Self {
        Self::with_depth(DEFAULT_SEARCH_DEPTH)
    }

    pub fn with_depth(search_depth: u8) -> Self {
        Self { search_depth }
    }
}

impl Default for LocalAIService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AIService for LocalAIService {
    async fn calculate_move(
        &self,
        board: &Board,
        player: Player,
        difficulty: Difficulty,
    ) -> Result<AIMoveResult, AIError> {
        let start_time = Instant::now();

        let strategy = create_ai_strategy(difficulty, self.search_depth);
        let choice = strategy.calculate_move(board, player)?;

        Ok(AIMoveResult {
            position: choice.position,
            thinking_time_ms: start_time.elapsed().as_millis() as u64,
            evaluation_score: choice.score,
            nodes_evaluated: Some(choice.nodes_evaluated),
        })
    }

    async fn is_available(&self) -> bool {
        true
    }

    fn get_supported_difficulties(&self) -> Vec<Difficulty> {
        vec![Difficulty::Random, Difficulty::Greedy, Difficulty::Minimax]
    }

    fn get_name(&self) -> &'static str {
        "LocalAIService"
    }

    fn get_service_type(&self) -> AIServiceType {
        AIServiceType::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::ReversiRules;

    #[tokio::test]
    async fn test_local_ai_service_creation() {
        let service = LocalAIService::new();
        assert_eq!(service.search_depth, 3);
        assert_eq!(service.get_name(), "LocalAIService");
        assert_eq!(service.get_service_type(), AIServiceType::Local);
        assert!(service.is_available().await);
    }

    #[tokio::test]
    async fn test_calculate_move_all_difficulties() {
        let service = LocalAIService::with_depth(2);
        let board = Board::new();

        for difficulty in service.get_supported_difficulties() {
            let result = service
                .calculate_move(&board, Player::Black, difficulty)
                .await
                .unwrap();
            assert!(ReversiRules::is_valid_move(&board, result.position, Player::Black));
        }
    }

    #[tokio::test]
    async fn test_minimax_reports_statistics() {
        let service = LocalAIService::new();
        let board = Board::new();

        let result = service
            .calculate_move(&board, Player::Black, Difficulty::Minimax)
            .await
            .unwrap();

        assert!(result.evaluation_score.is_some());
        assert!(result.nodes_evaluated.unwrap() > 0);
    }

    #[tokio::test]
    async fn test_calculate_move_without_moves() {
        let service = LocalAIService::new();

        let result = service
            .calculate_move(&Board::empty(), Player::White, Difficulty::Greedy)
            .await;

        assert!(matches!(result, Err(AIError::NoValidMoves)));
    }

    #[tokio::test]
    async fn test_health_check() {
        let service = LocalAIService::new();
        let status = service.health_check().await.unwrap();

        assert_eq!(status.name, "LocalAIService");
        assert!(status.available);
        assert_eq!(status.supported_difficulties.len(), 3);
        assert!(status.average_response_time_ms.is_some());
    }
}

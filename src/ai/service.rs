//! AIサービスの抽象化層モジュール
//! ローカル実装とテスト用モックを統一したインターフェースで提供し、
//! 設定に基づいてAIサービスを生成する。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::strategies::{Difficulty, DEFAULT_SEARCH_DEPTH};
use crate::error::AIError;
use crate::game::{Board, Player, Position};

/// AIの手の計算結果を表す構造体
/// 選択した位置と計算の統計情報を含む
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AIMoveResult {
    /// AIが選択した手の位置
    pub position: Position,
    /// 計算時間（ミリ秒）。演出用の思考待ちは含まない
    pub thinking_time_ms: u64,
    /// 盤面評価値（ランダムでは省略）
    pub evaluation_score: Option<i32>,
    /// 評価したノード数
    pub nodes_evaluated: Option<u64>,
}

/// AIサービスの種類を表すenum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AIServiceType {
    /// 戦略を直接実行するローカルAI
    Local,
    /// テスト用のモックAI
    Mock,
}

/// AIサービスの状態情報を表す構造体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AIServiceStatus {
    pub service_type: AIServiceType,
    pub name: String,
    pub available: bool,
    pub supported_difficulties: Vec<Difficulty>,
    pub average_response_time_ms: Option<u64>,
}

/// AIサービスの統一インターフェース
/// 異なるAI実装を同じ方法で呼び出すためのtrait
#[async_trait]
pub trait AIService: Send + Sync {
    /// 指定した盤面、手番、難易度でAIの手を計算する
    async fn calculate_move(
        &self,
        board: &Board,
        player: Player,
        difficulty: Difficulty,
    ) -> Result<AIMoveResult, AIError>;

    /// サービスが利用可能かチェックする
    async fn is_available(&self) -> bool;

    /// サポートしている難易度の一覧を返す
    fn get_supported_difficulties(&self) -> Vec<Difficulty>;

    fn get_name(&self) -> &'static str;

    fn get_service_type(&self) -> AIServiceType;

    /// サービスの健全性チェックを実行し、レスポンス時間も測定する
    async fn health_check(&self) -> Result<AIServiceStatus, AIError> {
        let start_time = std::time::Instant::now();
        let available = self.is_available().await;
        let response_time = start_time.elapsed().as_millis() as u64;

        if available {
            Ok(AIServiceStatus {
                service_type: self.get_service_type(),
                name: self.get_name().to_string(),
                available: true,
                supported_difficulties: self.get_supported_difficulties(),
                average_response_time_ms: Some(response_time),
            })
        } else {
            Err(AIError::ServiceUnavailable {
                service_name: self.get_name().to_string(),
                reason: "Service health check failed".to_string(),
            })
        }
    }
}

/// AIサービスの設定を管理する構造体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AIServiceConfig {
    pub service_type: AIServiceType,
    /// ミニマックス探索の深度
    pub search_depth: u8,
}

impl Default for AIServiceConfig {
    fn default() -> Self {
        Self {
            service_type: AIServiceType::Local,
            search_depth: DEFAULT_SEARCH_DEPTH,
        }
    }
}

/// AIサービスを生成するファクトリ
pub struct AIServiceFactory;

impl AIServiceFactory {
    /// 設定に基づいてAIサービスを生成する
    pub fn create_service(config: &AIServiceConfig) -> Box<dyn AIService> {
        match config.service_type {
            AIServiceType::Local => {
                use crate::ai::local_service::LocalAIService;
                Box::new(LocalAIService::with_depth(config.search_depth))
            }
            AIServiceType::Mock => {
                use crate::ai::mock_service::MockAIService;
                Box::new(MockAIService::new_default())
            }
        }
    }
}

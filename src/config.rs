//! エンジン設定管理モジュール
//! 思考待ち時間、メッセージ表示時間、AI、ログなどの設定を
//! 設定ファイルと環境変数から読み込んで管理する。

use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path, str::FromStr, time::Duration};

use crate::ai::service::{AIServiceConfig, AIServiceType};
use crate::ai::strategies::Difficulty;
use crate::game::Player;

/// Duration型をJSONでシリアライズするためのモジュール
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    /// Durationを(secs, nanos)のタプルとしてシリアライズ
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let secs = duration.as_secs();
        let nanos = duration.subsec_nanos();
        (secs, nanos).serialize(serializer)
    }

    /// (secs, nanos)のタプルからDurationをデシリアライズ
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (secs, nanos) = <(u64, u32)>::deserialize(deserializer)?;
        Ok(Duration::new(secs, nanos))
    }
}

/// ゲーム進行の設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// コンピュータが着手する前の演出用の待ち時間
    #[serde(with = "duration_serde")]
    pub thinking_delay: Duration,
    /// パスや終了のメッセージを消すまでの時間
    #[serde(with = "duration_serde")]
    pub message_duration: Duration,
    pub default_difficulty: Difficulty,
    pub human_color: Player,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            thinking_delay: Duration::from_millis(600),
            message_duration: Duration::from_millis(3000),
            default_difficulty: Difficulty::Random,
            human_color: Player::Black,
        }
    }
}

/// ログ出力の設定
/// RUST_LOGが設定されている場合はそちらが優先される
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// 全設定を統合するメイン設定構造体
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub game: GameConfig,
    pub ai_service: AIServiceConfig,
    pub logging: LoggingConfig,
}

/// 設定関連のエラーを表すenum
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("設定ファイル読み込みエラー: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("設定ファイル解析エラー: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("環境変数エラー: {name} = {value}")]
    EnvVarError { name: String, value: String },

    #[error("設定値が無効です: {field} = {value}")]
    InvalidValue { field: String, value: String },
}

/// 環境変数を読み、設定されていればパースして返す
fn parse_env<T: FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarError {
                name: name.to_string(),
                value,
            }),
        Err(_) => Ok(None),
    }
}

impl Config {
    /// 指定したファイルパスから設定を読み込む
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// 環境変数から設定を読み込む
    /// デフォルト値をベースに環境変数で上書きする
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();
        config.apply_env()?;
        Ok(config)
    }

    /// 環境変数の値で現在の設定を上書きする
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(ms) = parse_env::<u64>("REVERSI_THINKING_DELAY_MS")? {
            self.game.thinking_delay = Duration::from_millis(ms);
        }

        if let Some(ms) = parse_env::<u64>("REVERSI_MESSAGE_DURATION_MS")? {
            self.game.message_duration = Duration::from_millis(ms);
        }

        if let Some(difficulty) = parse_env::<Difficulty>("REVERSI_DIFFICULTY")? {
            self.game.default_difficulty = difficulty;
        }

        if let Some(color) = parse_env::<Player>("REVERSI_HUMAN_COLOR")? {
            self.game.human_color = color;
        }

        if let Some(depth) = parse_env::<u8>("REVERSI_SEARCH_DEPTH")? {
            self.ai_service.search_depth = depth;
        }

        if let Ok(service_type) = env::var("AI_SERVICE_TYPE") {
            self.ai_service.service_type = match service_type.to_lowercase().as_str() {
                "local" => AIServiceType::Local,
                "mock" => AIServiceType::Mock,
                _ => {
                    return Err(ConfigError::EnvVarError {
                        name: "AI_SERVICE_TYPE".to_string(),
                        value: service_type,
                    })
                }
            };
        }

        if let Ok(level) = env::var("REVERSI_LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(())
    }

    /// 設定ファイルと環境変数を結合して設定を読み込む
    /// 設定ファイルがなくてもデフォルト値で動作する
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = ["config.json", "config/app.json", "/etc/reversi/config.json"]
            .iter()
            .find_map(|path| Self::from_file(path).ok())
            .unwrap_or_default();

        config.apply_env()?;
        Ok(config)
    }

    /// 現在の設定を指定したファイルに保存する
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// 設定値の妥当性をチェックする
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ai_service.search_depth == 0 {
            return Err(ConfigError::InvalidValue {
                field: "ai_service.search_depth".to_string(),
                value: self.ai_service.search_depth.to_string(),
            });
        }

        if self.game.message_duration.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "game.message_duration".to_string(),
                value: format!("{:?}", self.game.message_duration),
            });
        }

        Ok(())
    }
}

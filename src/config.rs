//! アプリケーション設定管理モジュール
//! サーバー、セッション、AIサービスなどの設定を
//! 設定ファイルと環境変数から読み込んで管理する。

use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path, time::Duration};

use crate::ai::service::{AIServiceConfig, AIServiceType};

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

/// システムの制限値を定義する構造体
/// 同時ゲーム数、タイムアウト値などのリソース制限を管理
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemLimits {
    /// 同時実行可能なゲーム数の上限
    pub max_concurrent_games: usize,
    /// AIの計算時間の上限
    #[serde(with = "duration_serde")]
    pub max_ai_calculation_time: Duration,
    /// セッションのタイムアウト時間
    #[serde(with = "duration_serde")]
    pub session_timeout: Duration,
    /// 保存する手の履歴の上限数
    pub max_move_history: usize,
}

impl Default for SystemLimits {
    /// バランスの取れたデフォルト制限値
    fn default() -> Self {
        Self {
            max_concurrent_games: 100,
            max_ai_calculation_time: Duration::from_secs(5),
            session_timeout: Duration::from_secs(3600),
            // 3x3盤面では1ゲーム高々9手
            max_move_history: 9,
        }
    }
}

/// サーバーの設定を管理する構造体
/// ポート番号、ホスト名、CORS設定などを含む
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub enable_cors: bool,
    pub enable_logging: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
            enable_cors: true,
            enable_logging: true,
        }
    }
}

/// 対戦セッションの設定を管理する構造体
/// セッション数制限、タイムアウト、クリーンアップ設定など
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub max_sessions: usize,
    pub session_timeout_minutes: i64,
    pub enable_session_cleanup: bool,
    pub cleanup_interval_minutes: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_sessions: 100,
            session_timeout_minutes: 30,
            enable_session_cleanup: true,
            cleanup_interval_minutes: 5,
        }
    }
}

/// アプリケーションの全設定を統合するメイン設定構造体
/// 各サブシステムの設定をまとめて管理する
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub system_limits: SystemLimits,
    pub server: ServerConfig,
    pub session: SessionConfig,
    pub ai_service: AIServiceConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            system_limits: SystemLimits::default(),
            server: ServerConfig::default(),
            session: SessionConfig::default(),
            ai_service: AIServiceConfig::default(),
        }
    }
}

/// 設定関連のエラーを表すenum
/// ファイル読み込み、パース、検証エラーなどを含む
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

        if let Ok(port) = env::var("SERVER_PORT") {
            config.server.port = port.parse().map_err(|_| ConfigError::EnvVarError {
                name: "SERVER_PORT".to_string(),
                value: port,
            })?;
        }

        if let Ok(host) = env::var("SERVER_HOST") {
            config.server.host = host;
        }

        if let Ok(max_sessions) = env::var("GAME_MAX_SESSIONS") {
            config.session.max_sessions =
                max_sessions.parse().map_err(|_| ConfigError::EnvVarError {
                    name: "GAME_MAX_SESSIONS".to_string(),
                    value: max_sessions,
                })?;
        }

        if let Ok(session_timeout) = env::var("GAME_SESSION_TIMEOUT_MINUTES") {
            config.session.session_timeout_minutes =
                session_timeout
                    .parse()
                    .map_err(|_| ConfigError::EnvVarError {
                        name: "GAME_SESSION_TIMEOUT_MINUTES".to_string(),
                        value: session_timeout,
                    })?;
        }

        if let Ok(ai_service_type) = env::var("AI_SERVICE_TYPE") {
            config.ai_service.service_type = match ai_service_type.to_lowercase().as_str() {
                "local" => AIServiceType::Local,
                "mock" => AIServiceType::Mock,
                _ => {
                    return Err(ConfigError::EnvVarError {
                        name: "AI_SERVICE_TYPE".to_string(),
                        value: ai_service_type,
                    })
                }
            };
        }

        if let Ok(timeout) = env::var("AI_SERVICE_TIMEOUT_MS") {
            config.ai_service.timeout_ms =
                timeout.parse().map_err(|_| ConfigError::EnvVarError {
                    name: "AI_SERVICE_TIMEOUT_MS".to_string(),
                    value: timeout,
                })?;
        }

        Ok(config)
    }

    /// 設定ファイルと環境変数を結合して設定を読み込む
    /// 設定ファイルがなくてもデフォルト値で動作する
    pub fn load() -> Self {
        let mut config = Config::default();

        if let Ok(file_config) = Self::from_file("config.json") {
            config = file_config;
        } else if let Ok(file_config) = Self::from_file("config/app.json") {
            config = file_config;
        } else if let Ok(file_config) = Self::from_file("/etc/tictactoe/config.json") {
            config = file_config;
        }

        // 環境変数で設定を上書き
        if let Ok(env_config) = Self::from_env() {
            config.server.port = env_config.server.port;
            config.server.host = env_config.server.host;
            config.session.max_sessions = env_config.session.max_sessions;
            config.session.session_timeout_minutes = env_config.session.session_timeout_minutes;
            config.ai_service = env_config.ai_service;
        }

        config
    }

    /// 現在の設定を指定したファイルに保存する
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// 設定値の妥当性をチェックする
    /// 不正な値がある場合はConfigErrorを返す
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                value: self.server.port.to_string(),
            });
        }

        if self.session.max_sessions == 0 {
            return Err(ConfigError::InvalidValue {
                field: "session.max_sessions".to_string(),
                value: self.session.max_sessions.to_string(),
            });
        }

        if self.ai_service.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "ai_service.timeout_ms".to_string(),
                value: self.ai_service.timeout_ms.to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.session.max_sessions, 100);
        assert_eq!(config.ai_service.service_type, AIServiceType::Local);
        assert_eq!(config.system_limits.max_move_history, 9);
    }

    #[test]
    fn test_config_validate_default_ok() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validate_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.server.port, config.server.port);
        assert_eq!(
            parsed.system_limits.session_timeout,
            config.system_limits.session_timeout
        );
    }
}

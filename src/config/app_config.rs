// ==========================================
// 钢卷库存台账系统 - 应用配置
// ==========================================
// 来源优先级: 环境变量 > 默认值
// ==========================================

use crate::engine::statistics::DEFAULT_MAX_SERIES_DAYS;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// 环境变量名
pub mod env_keys {
    pub const DB_PATH: &str = "ROLL_LEDGER_DB_PATH";
    pub const BIND_ADDR: &str = "ROLL_LEDGER_BIND_ADDR";
    pub const MAX_SERIES_DAYS: &str = "ROLL_LEDGER_MAX_SERIES_DAYS";
}

/// 默认监听地址
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("配置项{key}取值无效: {value}（{reason}）")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// SQLite 数据库文件路径
    pub db_path: String,
    /// HTTP 监听地址
    pub bind_addr: SocketAddr,
    /// 逐日统计允许的最大区间天数
    pub max_series_days: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: get_default_db_path(),
            bind_addr: DEFAULT_BIND_ADDR
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 8000))),
            max_series_days: DEFAULT_MAX_SERIES_DAYS,
        }
    }
}

impl AppConfig {
    /// 从进程环境变量加载
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源加载（便于测试）
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(path) = read(env_keys::DB_PATH) {
            config.db_path = path;
        }

        if let Some(raw) = read(env_keys::BIND_ADDR) {
            config.bind_addr = raw.parse().map_err(|e: std::net::AddrParseError| {
                ConfigError::InvalidValue {
                    key: env_keys::BIND_ADDR,
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?;
        }

        if let Some(raw) = read(env_keys::MAX_SERIES_DAYS) {
            config.max_series_days = match raw.parse::<u64>() {
                Ok(days) if days > 0 => days,
                Ok(_) => {
                    return Err(ConfigError::InvalidValue {
                        key: env_keys::MAX_SERIES_DAYS,
                        value: raw,
                        reason: "必须大于0".to_string(),
                    })
                }
                Err(e) => {
                    return Err(ConfigError::InvalidValue {
                        key: env_keys::MAX_SERIES_DAYS,
                        value: raw,
                        reason: e.to_string(),
                    })
                }
            };
        }

        Ok(config)
    }
}

/// 默认数据库路径
///
/// 优先使用用户数据目录，拿不到时回退到当前目录下的 rolls.db。
pub fn get_default_db_path() -> String {
    let mut path = PathBuf::from("./rolls.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("steel-roll-ledger");
        // best-effort: 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("rolls.db");
        }
    }

    path.to_string_lossy().to_string()
}

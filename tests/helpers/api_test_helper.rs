// ==========================================
// API集成测试辅助工具
// ==========================================
// 职责: 基于临时数据库文件装配完整的应用状态
// ==========================================

#![allow(dead_code)]

use std::sync::Arc;
use tempfile::NamedTempFile;

use steel_roll_ledger::api::{ApiError, RollApi};
use steel_roll_ledger::app::AppState;
use steel_roll_ledger::config::AppConfig;
use steel_roll_ledger::repository::{RollLedger, RollRepository};

// ==========================================
// API测试环境
// ==========================================

/// API测试环境
///
/// 持有临时数据库文件，drop 时自动删除
pub struct ApiTestEnv {
    pub _temp_file: NamedTempFile,
    pub db_path: String,
    pub ledger: Arc<RollRepository>,
    pub state: AppState,
}

impl ApiTestEnv {
    /// 使用默认逐日统计上限创建测试环境
    pub fn new() -> Result<Self, String> {
        Self::with_series_limit(steel_roll_ledger::engine::DEFAULT_MAX_SERIES_DAYS)
    }

    /// 指定逐日统计上限创建测试环境
    pub fn with_series_limit(max_series_days: u64) -> Result<Self, String> {
        let temp_file = NamedTempFile::new().map_err(|e| e.to_string())?;
        let db_path = temp_file
            .path()
            .to_str()
            .ok_or("临时文件路径不是UTF-8")?
            .to_string();

        let ledger = Arc::new(RollRepository::new(&db_path).map_err(|e| e.to_string())?);
        let config = AppConfig {
            db_path: db_path.clone(),
            max_series_days,
            ..AppConfig::from_lookup(|_| None).map_err(|e| e.to_string())?
        };
        let state = AppState::with_ledger(config, ledger.clone() as Arc<dyn RollLedger>);

        Ok(Self {
            _temp_file: temp_file,
            db_path,
            ledger,
            state,
        })
    }

    pub fn api(&self) -> &RollApi {
        &self.state.roll_api
    }
}

// ==========================================
// 断言辅助
// ==========================================

pub fn assert_invalid_input<T: std::fmt::Debug>(result: Result<T, ApiError>) {
    match result {
        Err(ApiError::InvalidInput(_)) => {}
        other => panic!("Expected InvalidInput, got {:?}", other),
    }
}

pub fn assert_validation_error<T: std::fmt::Debug>(result: Result<T, ApiError>) {
    match result {
        Err(ApiError::ValidationError(_)) => {}
        other => panic!("Expected ValidationError, got {:?}", other),
    }
}

pub fn assert_not_found<T: std::fmt::Debug>(result: Result<T, ApiError>) {
    match result {
        Err(ApiError::NotFound(_)) => {}
        other => panic!("Expected NotFound, got {:?}", other),
    }
}

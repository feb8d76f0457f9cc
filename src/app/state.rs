// ==========================================
// 钢卷库存台账系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::Arc;

use crate::api::RollApi;
use crate::config::AppConfig;
use crate::engine::{ReportService, StatisticsEngine};
use crate::repository::{RollLedger, RollRepository};

/// 应用状态
///
/// 启动时构建一次，作为 HTTP 路由的共享状态
#[derive(Clone)]
pub struct AppState {
    /// 生效配置
    pub config: Arc<AppConfig>,

    /// 钢卷台账API
    pub roll_api: Arc<RollApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开数据库并确保 rolls 表存在
    /// 2. 初始化统计引擎与报表服务
    /// 3. 创建API实例
    pub fn new(config: AppConfig) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", config.db_path);

        let repo = RollRepository::new(&config.db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;

        Ok(Self::with_ledger(config, Arc::new(repo)))
    }

    /// 使用已有台账构建（测试或嵌入场景）
    pub fn with_ledger(config: AppConfig, ledger: Arc<dyn RollLedger>) -> Self {
        let engine = Arc::new(StatisticsEngine::with_series_limit(
            ledger.clone(),
            config.max_series_days,
        ));
        let report_service = Arc::new(ReportService::new(engine.clone()));
        let roll_api = Arc::new(RollApi::new(ledger, engine, report_service));

        tracing::info!(
            max_series_days = config.max_series_days,
            "AppState初始化完成"
        );

        Self {
            config: Arc::new(config),
            roll_api,
        }
    }
}

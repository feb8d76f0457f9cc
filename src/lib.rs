// ==========================================
// 钢卷库存台账系统 - 核心库
// ==========================================
// 技术栈: axum + Rust + SQLite
// 系统定位: 钢卷出入库台账与区间统计
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体、类型与日期工具
pub mod domain;

// 数据仓储层 - 台账存储
pub mod repository;

// 引擎层 - 区间统计与报表
pub mod engine;

// 配置层 - 运行配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态装配与 HTTP 路由
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

pub use api::{ApiError, RollApi};
pub use app::{router, AppState};
pub use config::AppConfig;
pub use domain::{DateRange, NewRoll, Roll, RollId};
pub use engine::{InventoryReport, ReportService, StatisticKind, StatisticsEngine};
pub use repository::{RollLedger, RollRepository};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "钢卷库存台账系统";

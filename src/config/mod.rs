// ==========================================
// 钢卷库存台账系统 - 配置层
// ==========================================
// 职责: 数据库路径、监听地址、逐日统计区间上限
// 来源: 环境变量，缺省取默认值
// ==========================================

pub mod app_config;

// 重导出核心配置
pub use app_config::{env_keys, get_default_db_path, AppConfig, ConfigError};

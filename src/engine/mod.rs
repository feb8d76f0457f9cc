// ==========================================
// 钢卷库存台账系统 - 统计引擎层
// ==========================================
// 职责: 区间统计、逐日序列、综合报表
// 红线: 只读台账，不做任何写入
// ==========================================

pub mod daily_series;
pub mod error;
pub mod report;
pub mod statistics;

// 重导出核心引擎
pub use daily_series::{DailyExtremes, DailySeries, DayValue};
pub use error::{StatisticsError, StatisticsResult};
pub use report::{InventoryReport, ReportService};
pub use statistics::{
    DurationBounds, LengthWeightBounds, LengthWeightSum, MeanLengthWeight, StatisticKind,
    StatisticValue, StatisticsEngine, DEFAULT_MAX_SERIES_DAYS,
};

// ==========================================
// 钢卷库存台账系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、日期工具
// 红线: 不含数据访问逻辑,不含统计逻辑
// ==========================================

pub mod dates;
pub mod roll;
pub mod types;

// 重导出核心类型
pub use dates::{
    days_between, enumerate_days, format_date, parse_date, DateFormatError, DateRange,
};
pub use roll::{NewRoll, Roll};
pub use types::{
    parse_sort_keys, RemovalFilter, RollId, RollSortField, RollSortKey, SortDirection,
};

// ==========================================
// 钢卷库存台账系统 - 统计引擎错误类型
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 统计引擎错误
///
/// 空区间/空结果不是错误，统一回落到定义好的零值。
#[derive(Error, Debug)]
pub enum StatisticsError {
    #[error("统计区间过长: {days}天，上限{limit}天")]
    RangeTooLong { days: u64, limit: u64 },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Result 类型别名
pub type StatisticsResult<T> = Result<T, StatisticsError>;

// ==========================================
// 钢卷库存台账系统 - 综合报表
// ==========================================
// 职责: 组合八项区间统计为一份报表
// 说明: 各项独立扫描，不共享中间结果，也不在一个事务内；
//       并发写入时各子项可能来自略有差异的快照
// ==========================================

use crate::domain::dates::DateRange;
use crate::engine::daily_series::DailyExtremes;
use crate::engine::error::StatisticsResult;
use crate::engine::statistics::{
    DurationBounds, LengthWeightBounds, LengthWeightSum, MeanLengthWeight, StatisticsEngine,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 区间综合报表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryReport {
    pub range: DateRange,
    pub count_added: u64,
    pub count_removed: u64,
    pub mean_length_weight: MeanLengthWeight,
    pub min_max_length_weight: LengthWeightBounds,
    pub sum_length_weight: LengthWeightSum,
    #[serde(rename = "min_max_datadiff")]
    pub min_max_duration_days: DurationBounds,
    pub min_max_inventory_days: DailyExtremes,
    #[serde(rename = "min_max_wight_days")]
    pub min_max_weight_days: DailyExtremes,
}

pub struct ReportService {
    engine: Arc<StatisticsEngine>,
}

impl ReportService {
    pub fn new(engine: Arc<StatisticsEngine>) -> Self {
        Self { engine }
    }

    /// 生成区间综合报表
    pub fn full_report(&self, range: &DateRange) -> StatisticsResult<InventoryReport> {
        // 逐日项最耗时，先校验区间长度，避免做完前六项再失败
        self.engine.check_series_range(range)?;

        let report = InventoryReport {
            range: *range,
            count_added: self.engine.count_added(range)?,
            count_removed: self.engine.count_removed(range)?,
            mean_length_weight: self.engine.mean_length_weight(range)?,
            min_max_length_weight: self.engine.min_max_length_weight(range)?,
            sum_length_weight: self.engine.sum_length_weight(range)?,
            min_max_duration_days: self.engine.min_max_duration_days(range)?,
            min_max_inventory_days: self.engine.min_max_inventory_days(range)?,
            min_max_weight_days: self.engine.min_max_weight_days(range)?,
        };

        tracing::info!(
            start = %range.start,
            end = %range.end,
            count_added = report.count_added,
            count_removed = report.count_removed,
            "综合报表生成完成"
        );
        Ok(report)
    }
}

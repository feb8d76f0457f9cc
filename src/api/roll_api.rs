// ==========================================
// 钢卷库存台账系统 - 钢卷台账 API
// ==========================================
// 职责: 入参校验（日期格式、尺寸、ID）、调用台账仓储与统计引擎
// ==========================================

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::dates::{parse_date, wire_date, DateRange};
use crate::domain::roll::{NewRoll, Roll};
use crate::domain::types::{parse_sort_keys, RollId};
use crate::engine::report::{InventoryReport, ReportService};
use crate::engine::statistics::{StatisticKind, StatisticValue, StatisticsEngine};
use crate::repository::roll_repo::RollLedger;

// ==========================================
// 响应 DTO
// ==========================================

/// 新增钢卷结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollCreated {
    pub ok: bool,
    pub roll_id: RollId,
}

/// 单项统计结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticResponse {
    pub parameter: String,
    #[serde(with = "wire_date")]
    pub start_date: NaiveDate,
    #[serde(with = "wire_date")]
    pub end_date: NaiveDate,
    #[serde(flatten)]
    pub result: StatisticValue,
}

// ==========================================
// RollApi - 钢卷台账 API
// ==========================================

/// 钢卷台账API
///
/// 职责：
/// 1. 入库登记、出库登记、记录删除、台账清空
/// 2. 台账查询（单条、列表）
/// 3. 区间统计（单项、综合报表）
pub struct RollApi {
    ledger: Arc<dyn RollLedger>,
    engine: Arc<StatisticsEngine>,
    report_service: Arc<ReportService>,
}

impl RollApi {
    /// 创建新的RollApi实例
    pub fn new(
        ledger: Arc<dyn RollLedger>,
        engine: Arc<StatisticsEngine>,
        report_service: Arc<ReportService>,
    ) -> Self {
        Self {
            ledger,
            engine,
            report_service,
        }
    }

    /// 钢卷入库登记
    ///
    /// # 参数
    /// - length / weight: 必须为正数
    /// - added_date: 入库日期（DD.MM.YYYY）
    /// - removed_date: 出库日期（可选，DD.MM.YYYY，不得早于入库日期）
    ///
    /// # 返回
    /// - Ok(RollCreated): 新分配的ID
    /// - Err(ApiError::InvalidInput): 日期格式错误
    /// - Err(ApiError::ValidationError): 尺寸非正或出库早于入库
    pub fn add_roll(
        &self,
        length: f64,
        weight: f64,
        added_date: &str,
        removed_date: Option<&str>,
    ) -> ApiResult<RollCreated> {
        let added = parse_date(added_date)?;
        let removed = removed_date
            .filter(|s| !s.trim().is_empty())
            .map(parse_date)
            .transpose()?;

        let roll = NewRoll {
            length,
            weight,
            added_date: added,
            removed_date: removed,
        };
        roll.validate().map_err(field_error)?;

        let roll_id = self.ledger.add(&roll)?;
        tracing::info!(roll_id, length, weight, added_date, "钢卷入库登记");

        Ok(RollCreated { ok: true, roll_id })
    }

    /// 查询全部钢卷
    ///
    /// # 参数
    /// - sorting_properties: 逗号分隔的排序项，如 "weight desc, added_date"；为空按ID升序
    pub fn list_rolls(&self, sorting_properties: &str) -> ApiResult<Vec<Roll>> {
        let keys = parse_sort_keys(sorting_properties).map_err(ApiError::InvalidInput)?;
        Ok(self.ledger.list(&keys)?)
    }

    /// 查询单个钢卷
    pub fn get_roll(&self, roll_id: &str) -> ApiResult<Roll> {
        let id = parse_roll_id(roll_id)?;
        self.ledger
            .get_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("钢卷{}不存在", id)))
    }

    /// 登记出库（重复登记视为更正出库日期）
    pub fn remove_roll(&self, roll_id: &str, removed_date: &str) -> ApiResult<Roll> {
        let id = parse_roll_id(roll_id)?;
        let removed = parse_date(removed_date)?;

        // 出库日期先后校验由台账在同一条更新语句内完成
        self.ledger.mark_removed(id, removed)?;
        tracing::info!(roll_id = id, removed_date, "钢卷出库登记");

        self.ledger
            .get_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("钢卷{}不存在", id)))
    }

    /// 彻底删除钢卷记录
    pub fn remove_roll_info(&self, roll_id: &str) -> ApiResult<()> {
        let id = parse_roll_id(roll_id)?;
        self.ledger.delete_record(id)?;
        tracing::info!(roll_id = id, "钢卷记录已删除");
        Ok(())
    }

    /// 清空台账（不可恢复）
    pub fn clear(&self) -> ApiResult<()> {
        self.ledger.reset()?;
        Ok(())
    }

    /// 单项区间统计
    ///
    /// # 返回
    /// - Err(ApiError::InvalidInput): 日期格式错误或逐日区间过长
    /// - Err(ApiError::UnknownStatistic): 统计项不存在
    pub fn get_statistic(
        &self,
        parameter: &str,
        start_date: &str,
        end_date: &str,
    ) -> ApiResult<StatisticResponse> {
        let range = DateRange::parse(start_date, end_date)?;
        let kind: StatisticKind = parameter.parse().map_err(ApiError::UnknownStatistic)?;

        let result = self.engine.compute(kind, &range)?;
        tracing::debug!(parameter = kind.as_str(), start_date, end_date, "单项统计完成");

        Ok(StatisticResponse {
            parameter: kind.as_str().to_string(),
            start_date: range.start,
            end_date: range.end,
            result,
        })
    }

    /// 区间综合报表
    pub fn get_all_statistic(&self, start_date: &str, end_date: &str) -> ApiResult<InventoryReport> {
        let range = DateRange::parse(start_date, end_date)?;
        Ok(self.report_service.full_report(&range)?)
    }

    /// 存储可用性检查
    pub fn health(&self) -> ApiResult<()> {
        Ok(self.ledger.ping()?)
    }
}

fn field_error((field, message): (&'static str, String)) -> ApiError {
    ApiError::ValidationError(format!("字段{}错误: {}", field, message))
}

/// 解析钢卷ID
fn parse_roll_id(raw: &str) -> ApiResult<RollId> {
    raw.trim()
        .parse::<RollId>()
        .map_err(|_| ApiError::InvalidInput(format!("钢卷ID格式错误: {}", raw)))
}

// ==========================================
// 钢卷库存台账系统 - 区间统计引擎
// ==========================================
// 职责: 在入库日期区间上计算数量、合计、均值、极值、库存时长、逐日负荷
// 红线: 只通过 RollLedger::scan 读数据，从不修改台账
// 红线: 空结果不报错，统一回落到零值
// ==========================================

use crate::domain::dates::DateRange;
use crate::domain::roll::Roll;
use crate::domain::types::RemovalFilter;
use crate::engine::daily_series::{DailyExtremes, DailySeries};
use crate::engine::error::{StatisticsError, StatisticsResult};
use crate::repository::roll_repo::RollLedger;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// 逐日统计默认最多扫描的天数
pub const DEFAULT_MAX_SERIES_DAYS: u64 = 366;

// ==========================================
// 统计结果类型
// ==========================================

/// 平均长度/重量
///
/// 区间内没有钢卷时长度、重量均为 0，并置 `insufficient_data`。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeanLengthWeight {
    pub length: f64,
    pub weight: f64,
    pub sample_count: u64,
    pub insufficient_data: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LengthWeightSum {
    pub length: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LengthWeightBounds {
    pub min_length: f64,
    pub max_length: f64,
    pub min_weight: f64,
    pub max_weight: f64,
}

/// 库存时长极值（天）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationBounds {
    pub min_days: i64,
    pub max_days: i64,
}

// ==========================================
// StatisticKind - 统计项
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatisticKind {
    CountAdded,
    CountRemoved,
    MeanLengthWeight,
    MinMaxLengthWeight,
    SumLengthWeight,
    #[serde(rename = "min_max_datadiff")]
    MinMaxDurationDays,
    MinMaxInventoryDays,
    #[serde(rename = "min_max_wight_days")]
    MinMaxWeightDays,
}

impl StatisticKind {
    pub const ALL: [StatisticKind; 8] = [
        StatisticKind::CountAdded,
        StatisticKind::CountRemoved,
        StatisticKind::MeanLengthWeight,
        StatisticKind::MinMaxLengthWeight,
        StatisticKind::SumLengthWeight,
        StatisticKind::MinMaxDurationDays,
        StatisticKind::MinMaxInventoryDays,
        StatisticKind::MinMaxWeightDays,
    ];

    /// 对外参数名（沿用既有客户端使用的名称）
    pub fn as_str(&self) -> &'static str {
        match self {
            StatisticKind::CountAdded => "count_added",
            StatisticKind::CountRemoved => "count_removed",
            StatisticKind::MeanLengthWeight => "mean_length_weight",
            StatisticKind::MinMaxLengthWeight => "min_max_length_weight",
            StatisticKind::SumLengthWeight => "sum_length_weight",
            StatisticKind::MinMaxDurationDays => "min_max_datadiff",
            StatisticKind::MinMaxInventoryDays => "min_max_inventory_days",
            StatisticKind::MinMaxWeightDays => "min_max_wight_days",
        }
    }
}

impl fmt::Display for StatisticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StatisticKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "count_added" => Ok(StatisticKind::CountAdded),
            "count_removed" => Ok(StatisticKind::CountRemoved),
            "mean_length_weight" => Ok(StatisticKind::MeanLengthWeight),
            "min_max_length_weight" => Ok(StatisticKind::MinMaxLengthWeight),
            "sum_length_weight" => Ok(StatisticKind::SumLengthWeight),
            "min_max_datadiff" | "min_max_duration_days" => Ok(StatisticKind::MinMaxDurationDays),
            "min_max_inventory_days" => Ok(StatisticKind::MinMaxInventoryDays),
            "min_max_wight_days" | "min_max_weight_days" => Ok(StatisticKind::MinMaxWeightDays),
            other => Err(format!("统计项 {} 不存在", other)),
        }
    }
}

/// 单项统计结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "statistic", content = "value", rename_all = "snake_case")]
pub enum StatisticValue {
    CountAdded(u64),
    CountRemoved(u64),
    MeanLengthWeight(MeanLengthWeight),
    MinMaxLengthWeight(LengthWeightBounds),
    SumLengthWeight(LengthWeightSum),
    #[serde(rename = "min_max_datadiff")]
    MinMaxDurationDays(DurationBounds),
    MinMaxInventoryDays(DailyExtremes),
    #[serde(rename = "min_max_wight_days")]
    MinMaxWeightDays(DailyExtremes),
}

// ==========================================
// StatisticsEngine - 区间统计引擎
// ==========================================
pub struct StatisticsEngine {
    ledger: Arc<dyn RollLedger>,
    max_series_days: u64,
}

impl StatisticsEngine {
    pub fn new(ledger: Arc<dyn RollLedger>) -> Self {
        Self::with_series_limit(ledger, DEFAULT_MAX_SERIES_DAYS)
    }

    /// # 参数
    /// - max_series_days: 逐日统计允许的最大区间天数
    pub fn with_series_limit(ledger: Arc<dyn RollLedger>, max_series_days: u64) -> Self {
        Self {
            ledger,
            max_series_days,
        }
    }

    pub fn max_series_days(&self) -> u64 {
        self.max_series_days
    }

    fn scan(&self, range: &DateRange, filter: RemovalFilter) -> StatisticsResult<Vec<Roll>> {
        Ok(self.ledger.scan(range, filter)?)
    }

    /// 区间内入库且仍在库的钢卷数
    pub fn count_added(&self, range: &DateRange) -> StatisticsResult<u64> {
        Ok(self.scan(range, RemovalFilter::OnlyInStock)?.len() as u64)
    }

    /// 区间内入库且已出库的钢卷数
    pub fn count_removed(&self, range: &DateRange) -> StatisticsResult<u64> {
        Ok(self.scan(range, RemovalFilter::OnlyRemoved)?.len() as u64)
    }

    /// 平均长度/重量（不区分出库状态）
    pub fn mean_length_weight(&self, range: &DateRange) -> StatisticsResult<MeanLengthWeight> {
        let rolls = self.scan(range, RemovalFilter::Any)?;
        if rolls.is_empty() {
            return Ok(MeanLengthWeight {
                length: 0.0,
                weight: 0.0,
                sample_count: 0,
                insufficient_data: true,
            });
        }

        let sum = sum_of(&rolls);
        let n = rolls.len() as f64;
        Ok(MeanLengthWeight {
            length: sum.length / n,
            weight: sum.weight / n,
            sample_count: rolls.len() as u64,
            insufficient_data: false,
        })
    }

    /// 长度/重量合计（不区分出库状态）
    pub fn sum_length_weight(&self, range: &DateRange) -> StatisticsResult<LengthWeightSum> {
        Ok(sum_of(&self.scan(range, RemovalFilter::Any)?))
    }

    /// 长度/重量极值（不区分出库状态），空结果全为 0
    pub fn min_max_length_weight(
        &self,
        range: &DateRange,
    ) -> StatisticsResult<LengthWeightBounds> {
        let rolls = self.scan(range, RemovalFilter::Any)?;
        let Some(first) = rolls.first() else {
            return Ok(LengthWeightBounds::default());
        };

        let init = LengthWeightBounds {
            min_length: first.length,
            max_length: first.length,
            min_weight: first.weight,
            max_weight: first.weight,
        };
        Ok(rolls.iter().skip(1).fold(init, |acc, roll| LengthWeightBounds {
            min_length: acc.min_length.min(roll.length),
            max_length: acc.max_length.max(roll.length),
            min_weight: acc.min_weight.min(roll.weight),
            max_weight: acc.max_weight.max(roll.weight),
        }))
    }

    /// 已出库钢卷的库存时长极值（天），空结果为 (0, 0)
    pub fn min_max_duration_days(&self, range: &DateRange) -> StatisticsResult<DurationBounds> {
        let durations: Vec<i64> = self
            .scan(range, RemovalFilter::OnlyRemoved)?
            .iter()
            .filter_map(Roll::storage_days)
            .collect();

        Ok(DurationBounds {
            min_days: durations.iter().copied().min().unwrap_or(0),
            max_days: durations.iter().copied().max().unwrap_or(0),
        })
    }

    /// 逐日在库入库数序列：每天 d 取 count_added([d, d])
    pub fn daily_count_series(&self, range: &DateRange) -> StatisticsResult<DailySeries> {
        self.check_series_range(range)?;
        DailySeries::build(range, |day| {
            self.count_added(&DateRange::single(day))
                .map(|count| count as f64)
        })
    }

    /// 逐日入库重量序列：每天 d 取 sum_length_weight([d, d]).weight
    pub fn daily_weight_series(&self, range: &DateRange) -> StatisticsResult<DailySeries> {
        self.check_series_range(range)?;
        DailySeries::build(range, |day| {
            self.sum_length_weight(&DateRange::single(day))
                .map(|sum| sum.weight)
        })
    }

    /// 按数量的最低/最高负荷日
    pub fn min_max_inventory_days(&self, range: &DateRange) -> StatisticsResult<DailyExtremes> {
        let series = self.daily_count_series(range)?;
        let extremes = series.extremes();
        tracing::debug!(
            days = extremes.days_scanned,
            "逐日数量序列极值计算完成"
        );
        Ok(extremes)
    }

    /// 按重量的最低/最高负荷日
    pub fn min_max_weight_days(&self, range: &DateRange) -> StatisticsResult<DailyExtremes> {
        let series = self.daily_weight_series(range)?;
        let extremes = series.extremes();
        tracing::debug!(
            days = extremes.days_scanned,
            "逐日重量序列极值计算完成"
        );
        Ok(extremes)
    }

    /// 按统计项计算
    pub fn compute(
        &self,
        kind: StatisticKind,
        range: &DateRange,
    ) -> StatisticsResult<StatisticValue> {
        let value = match kind {
            StatisticKind::CountAdded => StatisticValue::CountAdded(self.count_added(range)?),
            StatisticKind::CountRemoved => StatisticValue::CountRemoved(self.count_removed(range)?),
            StatisticKind::MeanLengthWeight => {
                StatisticValue::MeanLengthWeight(self.mean_length_weight(range)?)
            }
            StatisticKind::MinMaxLengthWeight => {
                StatisticValue::MinMaxLengthWeight(self.min_max_length_weight(range)?)
            }
            StatisticKind::SumLengthWeight => {
                StatisticValue::SumLengthWeight(self.sum_length_weight(range)?)
            }
            StatisticKind::MinMaxDurationDays => {
                StatisticValue::MinMaxDurationDays(self.min_max_duration_days(range)?)
            }
            StatisticKind::MinMaxInventoryDays => {
                StatisticValue::MinMaxInventoryDays(self.min_max_inventory_days(range)?)
            }
            StatisticKind::MinMaxWeightDays => {
                StatisticValue::MinMaxWeightDays(self.min_max_weight_days(range)?)
            }
        };
        Ok(value)
    }

    /// 逐日统计的区间长度上限
    pub fn check_series_range(&self, range: &DateRange) -> StatisticsResult<()> {
        let days = range.day_count();
        if days > self.max_series_days {
            return Err(StatisticsError::RangeTooLong {
                days,
                limit: self.max_series_days,
            });
        }
        Ok(())
    }
}

fn sum_of(rolls: &[Roll]) -> LengthWeightSum {
    rolls.iter().fold(LengthWeightSum::default(), |acc, roll| LengthWeightSum {
        length: acc.length + roll.length,
        weight: acc.weight + roll.weight,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::roll::NewRoll;
    use crate::repository::roll_repo::RollRepository;
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn range(start: u32, end: u32) -> DateRange {
        DateRange::new(d(start), d(end))
    }

    fn setup() -> (Arc<RollRepository>, StatisticsEngine) {
        let repo = Arc::new(RollRepository::in_memory().unwrap());
        let engine = StatisticsEngine::new(repo.clone());
        (repo, engine)
    }

    /// A: 10/5 于 1 日入库；B: 20/15 于 2 日入库、5 日出库
    fn seed_two(repo: &RollRepository) {
        repo.add(&NewRoll::new(10.0, 5.0, d(1))).unwrap();
        repo.add(&NewRoll::new(20.0, 15.0, d(2)).removed_on(d(5)))
            .unwrap();
    }

    #[test]
    fn test_counts_split_by_removal() {
        let (repo, engine) = setup();
        seed_two(&repo);
        assert_eq!(engine.count_added(&range(1, 2)).unwrap(), 1);
        assert_eq!(engine.count_removed(&range(1, 2)).unwrap(), 1);
        assert_eq!(engine.count_added(&range(3, 9)).unwrap(), 0);
    }

    #[test]
    fn test_count_added_partition_adds_up() {
        let (repo, engine) = setup();
        for day in [1, 2, 2, 4, 6, 6, 6] {
            repo.add(&NewRoll::new(1.0, 1.0, d(day))).unwrap();
        }
        repo.add(&NewRoll::new(1.0, 1.0, d(3)).removed_on(d(7)))
            .unwrap();

        let whole = engine.count_added(&range(1, 6)).unwrap();
        let left = engine.count_added(&range(1, 3)).unwrap();
        let right = engine.count_added(&range(4, 6)).unwrap();
        assert_eq!(whole, 7);
        assert_eq!(left + right, whole);
    }

    #[test]
    fn test_sum_and_mean() {
        let (repo, engine) = setup();
        seed_two(&repo);

        let sum = engine.sum_length_weight(&range(1, 2)).unwrap();
        assert_eq!(sum, LengthWeightSum { length: 30.0, weight: 20.0 });

        let mean = engine.mean_length_weight(&range(1, 2)).unwrap();
        assert_eq!(mean.length, 15.0);
        assert_eq!(mean.weight, 10.0);
        assert_eq!(mean.sample_count, 2);
        assert!(!mean.insufficient_data);
    }

    #[test]
    fn test_empty_range_fallbacks() {
        let (repo, engine) = setup();
        seed_two(&repo);
        let empty = range(20, 25);

        assert_eq!(engine.sum_length_weight(&empty).unwrap(), LengthWeightSum::default());
        let mean = engine.mean_length_weight(&empty).unwrap();
        assert_eq!((mean.length, mean.weight, mean.sample_count), (0.0, 0.0, 0));
        assert!(mean.insufficient_data);
        assert_eq!(
            engine.min_max_length_weight(&empty).unwrap(),
            LengthWeightBounds::default()
        );
        assert_eq!(
            engine.min_max_duration_days(&empty).unwrap(),
            DurationBounds::default()
        );
    }

    #[test]
    fn test_min_max_length_weight() {
        let (repo, engine) = setup();
        seed_two(&repo);
        repo.add(&NewRoll::new(7.0, 30.0, d(2))).unwrap();
        assert_eq!(
            engine.min_max_length_weight(&range(1, 2)).unwrap(),
            LengthWeightBounds {
                min_length: 7.0,
                max_length: 20.0,
                min_weight: 5.0,
                max_weight: 30.0,
            }
        );
    }

    #[test]
    fn test_duration_single_match() {
        let (repo, engine) = setup();
        repo.add(&NewRoll::new(1.0, 1.0, d(1)).removed_on(d(3)))
            .unwrap();
        repo.add(&NewRoll::new(1.0, 1.0, d(1))).unwrap();
        assert_eq!(
            engine.min_max_duration_days(&range(1, 1)).unwrap(),
            DurationBounds { min_days: 2, max_days: 2 }
        );
    }

    #[test]
    fn test_duration_spread() {
        let (repo, engine) = setup();
        repo.add(&NewRoll::new(1.0, 1.0, d(1)).removed_on(d(1)))
            .unwrap();
        repo.add(&NewRoll::new(1.0, 1.0, d(2)).removed_on(d(12)))
            .unwrap();
        assert_eq!(
            engine.min_max_duration_days(&range(1, 2)).unwrap(),
            DurationBounds { min_days: 0, max_days: 10 }
        );
    }

    #[test]
    fn test_inventory_days_true_extremum() {
        let (repo, engine) = setup();
        // 1 日: 1 卷；2 日: 3 卷；3 日: 0 卷
        repo.add(&NewRoll::new(1.0, 1.0, d(1))).unwrap();
        for _ in 0..3 {
            repo.add(&NewRoll::new(1.0, 1.0, d(2))).unwrap();
        }

        let ext = engine.min_max_inventory_days(&range(1, 3)).unwrap();
        let min = ext.min.unwrap();
        let max = ext.max.unwrap();
        assert_eq!((min.date, min.value), (d(3), 0.0));
        assert_eq!((max.date, max.value), (d(2), 3.0));
        assert_eq!(ext.days_scanned, 3);
    }

    #[test]
    fn test_inventory_days_ignores_removed_rolls() {
        let (repo, engine) = setup();
        repo.add(&NewRoll::new(1.0, 1.0, d(1))).unwrap();
        repo.add(&NewRoll::new(1.0, 1.0, d(2)).removed_on(d(2)))
            .unwrap();

        let series = engine.daily_count_series(&range(1, 2)).unwrap();
        assert_eq!(series.get(d(1)), Some(1.0));
        assert_eq!(series.get(d(2)), Some(0.0));
    }

    #[test]
    fn test_weight_days_ties_pick_earliest() {
        let (repo, engine) = setup();
        repo.add(&NewRoll::new(1.0, 4.0, d(1))).unwrap();
        repo.add(&NewRoll::new(1.0, 9.0, d(2))).unwrap();
        repo.add(&NewRoll::new(1.0, 4.0, d(3))).unwrap();
        repo.add(&NewRoll::new(1.0, 9.0, d(4)).removed_on(d(6)))
            .unwrap();

        let ext = engine.min_max_weight_days(&range(1, 4)).unwrap();
        assert_eq!(ext.min.unwrap().date, d(1));
        assert_eq!(ext.max.unwrap().date, d(2));
        assert_eq!(ext.max.unwrap().value, 9.0);
    }

    #[test]
    fn test_daily_on_inverted_range_is_empty() {
        let (_repo, engine) = setup();
        let ext = engine.min_max_inventory_days(&range(5, 1)).unwrap();
        assert!(ext.min.is_none());
        assert!(ext.max.is_none());
    }

    #[test]
    fn test_series_range_limit() {
        let repo = Arc::new(RollRepository::in_memory().unwrap());
        let engine = StatisticsEngine::with_series_limit(repo, 3);
        assert!(engine.min_max_weight_days(&range(1, 3)).is_ok());
        let err = engine.min_max_weight_days(&range(1, 4)).unwrap_err();
        assert!(matches!(
            err,
            StatisticsError::RangeTooLong { days: 4, limit: 3 }
        ));
    }

    #[test]
    fn test_statistic_kind_names() {
        for kind in StatisticKind::ALL {
            assert_eq!(kind.as_str().parse::<StatisticKind>().unwrap(), kind);
        }
        assert_eq!(
            "min_max_weight_days".parse::<StatisticKind>().unwrap(),
            StatisticKind::MinMaxWeightDays
        );
        assert!("median".parse::<StatisticKind>().is_err());
    }

    #[test]
    fn test_compute_dispatch() {
        let (repo, engine) = setup();
        seed_two(&repo);
        let value = engine
            .compute(StatisticKind::CountRemoved, &range(1, 2))
            .unwrap();
        assert_eq!(value, StatisticValue::CountRemoved(1));

        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json["statistic"], "count_removed");
        assert_eq!(json["value"], 1);
    }

    #[test]
    fn test_serialized_names_match_parameter_names() {
        let (repo, engine) = setup();
        seed_two(&repo);
        for kind in StatisticKind::ALL {
            let value = engine.compute(kind, &range(1, 2)).unwrap();
            let json = serde_json::to_value(&value).unwrap();
            assert_eq!(json["statistic"], kind.as_str());
            assert_eq!(serde_json::to_value(kind).unwrap(), kind.as_str());
        }
    }
}

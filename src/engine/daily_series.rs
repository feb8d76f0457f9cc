// ==========================================
// 钢卷库存台账系统 - 逐日序列
// ==========================================
// 职责: 对区间内每一天做一次单日统计，得到 日期 -> 数值 序列
// 极值选取: 取真实最小/最大值，并列时取最早日期
// 生命周期: 仅在一次统计调用内存在，不落库
// ==========================================

use crate::domain::dates::{wire_date, DateRange};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 逐日序列（按日期升序）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailySeries {
    points: BTreeMap<NaiveDate, f64>,
}

impl DailySeries {
    /// 按天枚举区间，对每一天调用 `value_of`
    ///
    /// 任一天取值失败即整体失败。
    pub fn build<F, E>(range: &DateRange, mut value_of: F) -> Result<Self, E>
    where
        F: FnMut(NaiveDate) -> Result<f64, E>,
    {
        let mut points = BTreeMap::new();
        for day in range.days() {
            points.insert(day, value_of(day)?);
        }
        Ok(Self { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, day: NaiveDate) -> Option<f64> {
        self.points.get(&day).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.points.iter().map(|(day, value)| (*day, *value))
    }

    /// 选取最小/最大值所在日期
    ///
    /// 严格比较保证并列时保留最早日期；空序列返回 None。
    pub fn extremes(&self) -> DailyExtremes {
        let mut min: Option<DayValue> = None;
        let mut max: Option<DayValue> = None;

        for (date, value) in self.iter() {
            if min.map_or(true, |m| value < m.value) {
                min = Some(DayValue { date, value });
            }
            if max.map_or(true, |m| value > m.value) {
                max = Some(DayValue { date, value });
            }
        }

        DailyExtremes {
            min,
            max,
            days_scanned: self.len() as u64,
        }
    }
}

/// 某一天的取值
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayValue {
    #[serde(with = "wire_date")]
    pub date: NaiveDate,
    pub value: f64,
}

/// 逐日极值
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyExtremes {
    /// 最小值所在日（并列取最早）
    pub min: Option<DayValue>,
    /// 最大值所在日（并列取最早）
    pub max: Option<DayValue>,
    pub days_scanned: u64,
}

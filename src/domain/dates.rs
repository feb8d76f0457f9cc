// ==========================================
// 钢卷库存台账系统 - 日期工具
// ==========================================
// 对外格式: DD.MM.YYYY (两位日.两位月.四位年)
// 存储格式: YYYY-MM-DD (保证 SQL 区间比较按时间先后)
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// 对外(HTTP/JSON)日期格式
pub const WIRE_DATE_FORMAT: &str = "%d.%m.%Y";

/// 数据库存储日期格式
pub const STORAGE_DATE_FORMAT: &str = "%Y-%m-%d";

/// 日期解析错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateFormatError {
    #[error("日期格式错误（应为DD.MM.YYYY）: {0}")]
    Malformed(String),

    #[error("日期不存在: {0}")]
    InvalidCalendarDate(String),
}

/// 解析 DD.MM.YYYY 日期
///
/// 先做形状校验(两位数字.两位数字.四位数字，不允许多余字符)，
/// 再做日历校验(例如 31.02.2024 会被拒绝)。
pub fn parse_date(s: &str) -> Result<NaiveDate, DateFormatError> {
    if !has_wire_shape(s) {
        return Err(DateFormatError::Malformed(s.to_string()));
    }

    NaiveDate::parse_from_str(s, WIRE_DATE_FORMAT)
        .map_err(|_| DateFormatError::InvalidCalendarDate(s.to_string()))
}

fn has_wire_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            2 | 5 => *b == b'.',
            _ => b.is_ascii_digit(),
        })
}

/// 格式化为 DD.MM.YYYY
pub fn format_date(date: NaiveDate) -> String {
    date.format(WIRE_DATE_FORMAT).to_string()
}

/// 日期转存储文本
pub fn to_storage(date: NaiveDate) -> String {
    date.format(STORAGE_DATE_FORMAT).to_string()
}

/// 存储文本转日期
pub fn from_storage(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s, STORAGE_DATE_FORMAT)
}

/// 计算 b - a 的整天数（可为负）
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    b.signed_duration_since(a).num_days()
}

/// 按天枚举区间内所有日期（升序，含两端）
///
/// 起始晚于结束时返回空序列。
pub fn enumerate_days(range: &DateRange) -> Vec<NaiveDate> {
    range
        .start
        .iter_days()
        .take_while(|day| *day <= range.end)
        .collect()
}

// ==========================================
// DateRange - 日期区间
// ==========================================

/// 闭区间 [start, end]
///
/// 不强制 start <= end；倒置区间不匹配任何记录，也不枚举任何日期。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(with = "wire_date")]
    pub start: NaiveDate,
    #[serde(with = "wire_date")]
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// 单日区间 [day, day]
    pub fn single(day: NaiveDate) -> Self {
        Self { start: day, end: day }
    }

    /// 由 DD.MM.YYYY 文本构造
    pub fn parse(start: &str, end: &str) -> Result<Self, DateFormatError> {
        Ok(Self::new(parse_date(start)?, parse_date(end)?))
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// 区间包含的天数
    pub fn day_count(&self) -> u64 {
        if self.end < self.start {
            0
        } else {
            days_between(self.start, self.end) as u64 + 1
        }
    }

    pub fn days(&self) -> Vec<NaiveDate> {
        enumerate_days(self)
    }
}

// ==========================================
// serde 辅助: 以 DD.MM.YYYY 序列化日期
// ==========================================

pub mod wire_date {
    use super::*;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_date(&raw).map_err(serde::de::Error::custom)
    }
}

pub mod wire_date_opt {
    use super::*;

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => serializer.serialize_some(&format_date(*d)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|s| parse_date(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

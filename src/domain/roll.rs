// ==========================================
// 钢卷库存台账系统 - 钢卷领域模型
// ==========================================
// 对齐: rolls 表 (id, length, weight, added_date, removed_date)
// 红线: length > 0 且 weight > 0；出库日期不得早于入库日期
// ==========================================

use crate::domain::dates::{format_date, wire_date, wire_date_opt};
use crate::domain::types::RollId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// Roll - 钢卷台账记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roll {
    pub id: RollId,
    pub length: f64,
    pub weight: f64,

    #[serde(with = "wire_date")]
    pub added_date: NaiveDate, // 入库日期

    #[serde(with = "wire_date_opt", default)]
    pub removed_date: Option<NaiveDate>, // 出库日期 (null表示在库)
}

impl Roll {
    /// 库存时长（天），未出库返回 None
    pub fn storage_days(&self) -> Option<i64> {
        self.removed_date
            .map(|removed| crate::domain::dates::days_between(self.added_date, removed))
    }
}

// ==========================================
// NewRoll - 新增钢卷输入
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRoll {
    pub length: f64,
    pub weight: f64,

    #[serde(with = "wire_date")]
    pub added_date: NaiveDate,

    #[serde(with = "wire_date_opt", default)]
    pub removed_date: Option<NaiveDate>,
}

impl NewRoll {
    pub fn new(length: f64, weight: f64, added_date: NaiveDate) -> Self {
        Self {
            length,
            weight,
            added_date,
            removed_date: None,
        }
    }

    pub fn removed_on(mut self, removed_date: NaiveDate) -> Self {
        self.removed_date = Some(removed_date);
        self
    }

    /// 校验字段约束
    ///
    /// # 返回
    /// - Ok(()): 校验通过
    /// - Err((field, message)): 违规字段及原因
    pub fn validate(&self) -> Result<(), (&'static str, String)> {
        check_dimension("length", self.length)?;
        check_dimension("weight", self.weight)?;
        if let Some(removed) = self.removed_date {
            check_removal_order(self.added_date, removed)?;
        }
        Ok(())
    }
}

fn check_dimension(field: &'static str, value: f64) -> Result<(), (&'static str, String)> {
    if !value.is_finite() {
        return Err((field, format!("必须为有限数值，实际为{}", value)));
    }
    if value <= 0.0 {
        return Err((field, format!("必须大于0，实际为{}", value)));
    }
    Ok(())
}

/// 出库日期不得早于入库日期
pub fn check_removal_order(
    added_date: NaiveDate,
    removed_date: NaiveDate,
) -> Result<(), (&'static str, String)> {
    if removed_date < added_date {
        return Err((
            "removed_date",
            format!(
                "出库日期{}早于入库日期{}",
                format_date(removed_date),
                format_date(added_date)
            ),
        ));
    }
    Ok(())
}

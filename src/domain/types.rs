// ==========================================
// 钢卷库存台账系统 - 领域类型定义
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 钢卷ID（由仓储在创建时分配）
pub type RollId = i64;

// ==========================================
// 出库状态过滤 (Removal Filter)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RemovalFilter {
    Any,         // 不限
    OnlyInStock, // 仅在库 (removed_date 为空)
    OnlyRemoved, // 仅已出库 (removed_date 非空)
}

impl RemovalFilter {
    /// 对应的 SQL 条件片段
    pub fn sql_predicate(&self) -> Option<&'static str> {
        match self {
            RemovalFilter::Any => None,
            RemovalFilter::OnlyInStock => Some("removed_date IS NULL"),
            RemovalFilter::OnlyRemoved => Some("removed_date IS NOT NULL"),
        }
    }
}

// ==========================================
// 列表排序 (Sort Keys)
// ==========================================
// 排序字段白名单，不接受任意 SQL 文本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollSortField {
    Id,
    Length,
    Weight,
    AddedDate,
    RemovedDate,
}

impl RollSortField {
    pub fn column(&self) -> &'static str {
        match self {
            RollSortField::Id => "id",
            RollSortField::Length => "length",
            RollSortField::Weight => "weight",
            RollSortField::AddedDate => "added_date",
            RollSortField::RemovedDate => "removed_date",
        }
    }
}

impl FromStr for RollSortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "id" => Ok(RollSortField::Id),
            "length" => Ok(RollSortField::Length),
            "weight" => Ok(RollSortField::Weight),
            "added_date" | "addeddate" => Ok(RollSortField::AddedDate),
            "removed_date" | "removeddate" => Ok(RollSortField::RemovedDate),
            other => Err(format!("不支持的排序字段: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "ASC"),
            SortDirection::Desc => write!(f, "DESC"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollSortKey {
    pub field: RollSortField,
    pub direction: SortDirection,
}

impl RollSortKey {
    pub fn asc(field: RollSortField) -> Self {
        Self { field, direction: SortDirection::Asc }
    }

    pub fn desc(field: RollSortField) -> Self {
        Self { field, direction: SortDirection::Desc }
    }

    /// ORDER BY 子句片段，例如 "weight DESC"
    pub fn to_sql(&self) -> String {
        format!("{} {}", self.field.column(), self.direction)
    }
}

impl FromStr for RollSortKey {
    type Err = String;

    /// 解析 "weight"、"weight desc"、"added_date ASC"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let field = parts
            .next()
            .ok_or_else(|| "排序字段不能为空".to_string())?
            .parse::<RollSortField>()?;

        let direction = match parts.next().map(|p| p.to_ascii_lowercase()) {
            None => SortDirection::Asc,
            Some(p) if p == "asc" => SortDirection::Asc,
            Some(p) if p == "desc" => SortDirection::Desc,
            Some(p) => return Err(format!("不支持的排序方向: {}", p)),
        };

        if parts.next().is_some() {
            return Err(format!("排序项格式错误: {}", s.trim()));
        }

        Ok(Self { field, direction })
    }
}

/// 解析逗号分隔的排序项列表；空白文本返回空列表
pub fn parse_sort_keys(raw: &str) -> Result<Vec<RollSortKey>, String> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    raw.split(',').map(str::parse).collect()
}

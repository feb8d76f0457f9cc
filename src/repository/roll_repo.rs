// ==========================================
// 钢卷库存台账系统 - 钢卷台账仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化；排序字段走白名单
// ==========================================

use crate::db;
use crate::domain::dates::{from_storage, to_storage, DateRange};
use crate::domain::roll::{check_removal_order, NewRoll, Roll};
use crate::domain::types::{RemovalFilter, RollId, RollSortKey};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// RollLedger - 台账存储接口
// ==========================================
/// 台账存储接口
///
/// 统计引擎只依赖 `scan`，从不修改台账。
pub trait RollLedger: Send + Sync {
    /// 新增钢卷，返回新分配的ID
    fn add(&self, roll: &NewRoll) -> RepositoryResult<RollId>;

    /// 按ID查询
    fn get_by_id(&self, id: RollId) -> RepositoryResult<Option<Roll>>;

    /// 登记出库日期（重复登记视为更正）
    fn mark_removed(&self, id: RollId, removed_date: NaiveDate) -> RepositoryResult<()>;

    /// 彻底删除记录
    fn delete_record(&self, id: RollId) -> RepositoryResult<()>;

    /// 按入库日期区间 + 出库状态过滤，按ID(插入顺序)升序返回
    fn scan(&self, range: &DateRange, filter: RemovalFilter) -> RepositoryResult<Vec<Roll>>;

    /// 全量列表，按排序项排序（为空时按ID升序）
    fn list(&self, sort_keys: &[RollSortKey]) -> RepositoryResult<Vec<Roll>>;

    /// 清空台账（删表重建）
    fn reset(&self) -> RepositoryResult<()>;

    /// 检查存储可用
    fn ping(&self) -> RepositoryResult<()>;
}

// ==========================================
// RollRepository - SQLite 实现
// ==========================================
pub struct RollRepository {
    conn: Arc<Mutex<Connection>>,
}

const SELECT_COLUMNS: &str = "SELECT id, length, weight, added_date, removed_date FROM rolls";

impl RollRepository {
    /// 打开数据库文件并确保表存在
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = db::open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        db::ensure_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例（调用方负责建表）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 内存库（测试用）
    pub fn in_memory() -> RepositoryResult<Self> {
        let conn = db::open_in_memory()?;
        db::ensure_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

/// 行映射
fn map_roll(row: &Row<'_>) -> rusqlite::Result<Roll> {
    let added_raw: String = row.get(3)?;
    let removed_raw: Option<String> = row.get(4)?;

    Ok(Roll {
        id: row.get(0)?,
        length: row.get(1)?,
        weight: row.get(2)?,
        added_date: parse_stored_date(3, &added_raw)?,
        removed_date: removed_raw
            .map(|s| parse_stored_date(4, &s))
            .transpose()?,
    })
}

fn parse_stored_date(idx: usize, raw: &str) -> rusqlite::Result<NaiveDate> {
    from_storage(raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

impl RollLedger for RollRepository {
    fn add(&self, roll: &NewRoll) -> RepositoryResult<RollId> {
        if let Err((field, message)) = roll.validate() {
            return Err(RepositoryError::FieldValueError {
                field: field.to_string(),
                message,
            });
        }

        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO rolls (length, weight, added_date, removed_date) VALUES (?1, ?2, ?3, ?4)",
            params![
                roll.length,
                roll.weight,
                to_storage(roll.added_date),
                roll.removed_date.map(to_storage),
            ],
        )?;
        let id = conn.last_insert_rowid();

        tracing::debug!(roll_id = id, "钢卷入库登记成功");
        Ok(id)
    }

    fn get_by_id(&self, id: RollId) -> RepositoryResult<Option<Roll>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
        let roll = conn
            .query_row(&sql, params![id], map_roll)
            .optional()?;
        Ok(roll)
    }

    fn mark_removed(&self, id: RollId, removed_date: NaiveDate) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE rolls SET removed_date = ?1 WHERE id = ?2 AND added_date <= ?1",
            params![to_storage(removed_date), id],
        )?;
        if affected > 0 {
            return Ok(());
        }

        // 未更新：区分记录不存在与出库早于入库
        let added_raw: Option<String> = conn
            .query_row(
                "SELECT added_date FROM rolls WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        match added_raw {
            None => Err(RepositoryError::roll_not_found(id)),
            Some(raw) => {
                let added = parse_stored_date(0, &raw)?;
                match check_removal_order(added, removed_date) {
                    Err((field, message)) => Err(RepositoryError::FieldValueError {
                        field: field.to_string(),
                        message,
                    }),
                    Ok(()) => Err(RepositoryError::InternalError(format!(
                        "钢卷{}出库登记未生效",
                        id
                    ))),
                }
            }
        }
    }

    fn delete_record(&self, id: RollId) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM rolls WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(RepositoryError::roll_not_found(id));
        }
        Ok(())
    }

    fn scan(&self, range: &DateRange, filter: RemovalFilter) -> RepositoryResult<Vec<Roll>> {
        let mut sql = format!("{} WHERE added_date BETWEEN ?1 AND ?2", SELECT_COLUMNS);
        if let Some(predicate) = filter.sql_predicate() {
            sql.push_str(" AND ");
            sql.push_str(predicate);
        }
        sql.push_str(" ORDER BY id ASC");

        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let rolls = stmt
            .query_map(
                params![to_storage(range.start), to_storage(range.end)],
                map_roll,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rolls)
    }

    fn list(&self, sort_keys: &[RollSortKey]) -> RepositoryResult<Vec<Roll>> {
        let order_by = if sort_keys.is_empty() {
            "id ASC".to_string()
        } else {
            sort_keys
                .iter()
                .map(RollSortKey::to_sql)
                .collect::<Vec<_>>()
                .join(", ")
        };
        let sql = format!("{} ORDER BY {}", SELECT_COLUMNS, order_by);

        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let rolls = stmt
            .query_map([], map_roll)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rolls)
    }

    fn reset(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        db::recreate_schema(&conn)?;
        tracing::warn!("台账已清空（删表重建）");
        Ok(())
    }

    fn ping(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        if !db::has_rolls_table(&conn)? {
            return Err(RepositoryError::DatabaseConnectionError(
                "rolls 表不存在".to_string(),
            ));
        }
        Ok(())
    }
}

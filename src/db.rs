// ==========================================
// 钢卷库存台账系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 统一 rolls 表的建表/删表语句
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 台账表名
pub const ROLLS_TABLE: &str = "rolls";

/// rolls 表结构
///
/// 说明：
/// - 日期以 YYYY-MM-DD 文本存储，区间比较即时间先后比较
/// - length/weight 的正数约束由 CHECK 兜底
const CREATE_ROLLS_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS rolls (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    length REAL NOT NULL CHECK (length > 0),
    weight REAL NOT NULL CHECK (weight > 0),
    added_date TEXT NOT NULL,
    removed_date TEXT
);
CREATE INDEX IF NOT EXISTS idx_rolls_added_date ON rolls(added_date);
"#;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 打开内存数据库（测试用）
pub fn open_in_memory() -> rusqlite::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 建表（幂等）
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(CREATE_ROLLS_SQL)
}

/// 删表并重建
pub fn recreate_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("DROP TABLE IF EXISTS rolls;")?;
    ensure_schema(conn)
}

/// rolls 表是否存在
pub fn has_rolls_table(conn: &Connection) -> rusqlite::Result<bool> {
    let exists = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1 LIMIT 1",
            [ROLLS_TABLE],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);
    Ok(exists)
}

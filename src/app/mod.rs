// ==========================================
// 钢卷库存台账系统 - 应用层
// ==========================================
// 职责: 共享状态装配与 HTTP 路由
// ==========================================

pub mod http_routes;
pub mod state;

// 重导出
pub use http_routes::{router, AckResponse, ErrorResponse};
pub use state::AppState;

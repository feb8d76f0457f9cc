// ==========================================
// 钢卷库存台账系统 - HTTP 路由（按域拆分）
// ==========================================
// 职责: 解析查询参数，调用 RollApi，映射错误状态码
// ==========================================

mod common;
mod rolls;
mod statistics;

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::app::state::AppState;

pub use common::{AckResponse, ErrorResponse};

/// 构建完整路由
pub fn router(state: AppState) -> Router {
    let rolls = Router::new()
        .route("/add_roll", post(rolls::add_roll))
        .route("/get_rolls", get(rolls::get_rolls))
        .route("/get_one_roll", get(rolls::get_one_roll))
        .route("/remove_roll", delete(rolls::remove_roll))
        .route("/remove_roll_info", delete(rolls::remove_roll_info))
        .route("/clear_db", delete(rolls::clear_db))
        .route("/get_statistic", get(statistics::get_statistic))
        .route("/get_all_statistic", get(statistics::get_all_statistic));

    Router::new()
        .route("/health", get(rolls::health))
        .nest("/rolls", rolls)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

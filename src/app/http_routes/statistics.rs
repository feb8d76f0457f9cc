use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use serde::Deserialize;

use crate::api::StatisticResponse;
use crate::app::state::AppState;
use crate::engine::InventoryReport;

use super::common::{run_blocking, HttpResult};

// ==========================================
// 区间统计相关路由
// ==========================================

#[derive(Debug, Deserialize)]
pub(super) struct StatisticQuery {
    parameter: String,
    start_date: String,
    end_date: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct RangeQuery {
    start_date: String,
    end_date: String,
}

/// 单项区间统计
pub(super) async fn get_statistic(
    State(state): State<AppState>,
    query: Result<Query<StatisticQuery>, QueryRejection>,
) -> HttpResult<StatisticResponse> {
    let Query(q) = query?;
    run_blocking(state.roll_api.clone(), move |api| {
        api.get_statistic(&q.parameter, &q.start_date, &q.end_date)
    })
    .await
}

/// 区间综合报表
pub(super) async fn get_all_statistic(
    State(state): State<AppState>,
    query: Result<Query<RangeQuery>, QueryRejection>,
) -> HttpResult<InventoryReport> {
    let Query(q) = query?;
    run_blocking(state.roll_api.clone(), move |api| {
        api.get_all_statistic(&q.start_date, &q.end_date)
    })
    .await
}

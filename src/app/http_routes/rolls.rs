use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::RollCreated;
use crate::app::state::AppState;
use crate::domain::roll::Roll;

use super::common::{run_blocking, AckResponse, HttpResult};

// ==========================================
// 钢卷台账相关路由
// ==========================================

#[derive(Debug, Deserialize)]
pub(super) struct AddRollQuery {
    length: f64,
    weight: f64,
    added_date: String,
    removed_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct ListRollsQuery {
    #[serde(default, rename = "sortingProperties", alias = "sorting_properties")]
    sorting_properties: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct RollIdQuery {
    roll_id: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct RemoveRollQuery {
    roll_id: String,
    removed_date: String,
}

/// 钢卷入库登记
pub(super) async fn add_roll(
    State(state): State<AppState>,
    query: Result<Query<AddRollQuery>, QueryRejection>,
) -> HttpResult<RollCreated> {
    let Query(q) = query?;
    run_blocking(state.roll_api.clone(), move |api| {
        api.add_roll(q.length, q.weight, &q.added_date, q.removed_date.as_deref())
    })
    .await
}

/// 查询全部钢卷（可排序）
pub(super) async fn get_rolls(
    State(state): State<AppState>,
    query: Result<Query<ListRollsQuery>, QueryRejection>,
) -> HttpResult<Vec<Roll>> {
    let Query(q) = query?;
    run_blocking(state.roll_api.clone(), move |api| {
        api.list_rolls(&q.sorting_properties)
    })
    .await
}

/// 查询单个钢卷
pub(super) async fn get_one_roll(
    State(state): State<AppState>,
    query: Result<Query<RollIdQuery>, QueryRejection>,
) -> HttpResult<Roll> {
    let Query(q) = query?;
    run_blocking(state.roll_api.clone(), move |api| api.get_roll(&q.roll_id)).await
}

/// 登记出库
pub(super) async fn remove_roll(
    State(state): State<AppState>,
    query: Result<Query<RemoveRollQuery>, QueryRejection>,
) -> HttpResult<Roll> {
    let Query(q) = query?;
    run_blocking(state.roll_api.clone(), move |api| {
        api.remove_roll(&q.roll_id, &q.removed_date)
    })
    .await
}

/// 删除钢卷记录
pub(super) async fn remove_roll_info(
    State(state): State<AppState>,
    query: Result<Query<RollIdQuery>, QueryRejection>,
) -> HttpResult<AckResponse> {
    let Query(q) = query?;
    let message = format!("钢卷{}记录已删除", q.roll_id.trim());
    run_blocking(state.roll_api.clone(), move |api| api.remove_roll_info(&q.roll_id)).await?;
    Ok(Json(AckResponse::new(message)))
}

/// 清空台账
pub(super) async fn clear_db(State(state): State<AppState>) -> HttpResult<AckResponse> {
    run_blocking(state.roll_api.clone(), |api| api.clear()).await?;
    Ok(Json(AckResponse::new("台账已清空")))
}

/// 存储可用性
pub(super) async fn health(State(state): State<AppState>) -> HttpResult<AckResponse> {
    run_blocking(state.roll_api.clone(), |api| api.health()).await?;
    Ok(Json(AckResponse::new("ok")))
}

use crate::api::error::{ApiError, ApiResult};
use crate::api::RollApi;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ==========================================
// 公共工具：错误映射、统一响应
// ==========================================

/// 错误响应（所有非2xx响应体）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 错误代码
    pub code: String,

    /// 错误消息
    pub message: String,

    /// 详细信息（可选）
    pub details: Option<serde_json::Value>,
}

/// 操作确认响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    pub ok: bool,
    pub message: String,
}

impl AckResponse {
    pub(super) fn new(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }
}

/// HTTP 错误（状态码 + 错误体）
#[derive(Debug)]
pub(super) struct HttpError {
    status: StatusCode,
    body: ErrorResponse,
}

pub(super) type HttpResult<T> = Result<Json<T>, HttpError>;

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        map_api_error(err)
    }
}

/// 查询参数缺失或类型错误
impl From<QueryRejection> for HttpError {
    fn from(rejection: QueryRejection) -> Self {
        HttpError {
            status: StatusCode::BAD_REQUEST,
            body: ErrorResponse {
                code: "INVALID_INPUT".to_string(),
                message: format!("无效输入: {}", rejection.body_text()),
                details: None,
            },
        }
    }
}

/// 在阻塞线程池上执行同步的 RollApi 调用
///
/// SQLite 访问持有互斥锁且可能较慢（逐日统计），不得占用异步工作线程
pub(super) async fn run_blocking<T, F>(api: Arc<RollApi>, call: F) -> HttpResult<T>
where
    T: Send + 'static,
    F: FnOnce(&RollApi) -> ApiResult<T> + Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || call(&api))
        .await
        .map_err(|e| ApiError::InternalError(format!("任务执行失败: {}", e)))??;
    Ok(Json(result))
}

/// 将ApiError映射为状态码与错误体
///
/// 存储不可用按约定返回404；5xx 只返回通用消息，细节写日志
pub(super) fn map_api_error(err: ApiError) -> HttpError {
    let (status, code) = match &err {
        ApiError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
        ApiError::ValidationError(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        ApiError::UnknownStatistic(_) => (StatusCode::NOT_FOUND, "UNKNOWN_STATISTIC"),
        ApiError::DatabaseConnectionError(_) => {
            (StatusCode::NOT_FOUND, "DATABASE_CONNECTION_ERROR")
        }
        ApiError::DatabaseError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
        ApiError::InternalError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        ApiError::Other(_) => (StatusCode::INTERNAL_SERVER_ERROR, "OTHER_ERROR"),
    };

    let message = if status.is_server_error() {
        tracing::error!(code, error = %err, "请求处理失败");
        "服务器内部错误".to_string()
    } else {
        tracing::debug!(code, error = %err, "请求被拒绝");
        err.to_string()
    };

    HttpError {
        status,
        body: ErrorResponse {
            code: code.to_string(),
            message,
            details: None,
        },
    }
}

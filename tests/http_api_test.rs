// ==========================================
// HTTP 路由集成测试
// ==========================================
// 测试目标: 查询参数解析、JSON 响应、错误状态码映射
// ==========================================

mod helpers;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use helpers::api_test_helper::ApiTestEnv;
use chrono::{Duration, NaiveDate};
use serde_json::{json, Value};
use std::time::Instant;
use steel_roll_ledger::app::{router, AppState};
use steel_roll_ledger::db;
use tower::ServiceExt;

async fn send(state: &AppState, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = router(state.clone())
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn test_新增与查询钢卷() {
    let env = ApiTestEnv::new().unwrap();

    let (status, body) = send(
        &env.state,
        "POST",
        "/rolls/add_roll?length=10&weight=5&added_date=01.01.2024",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], json!(true));
    let id = body["roll_id"].as_i64().unwrap();

    let (status, body) = send(
        &env.state,
        "POST",
        "/rolls/add_roll?length=20&weight=15&added_date=02.01.2024&removed_date=05.01.2024",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(body["roll_id"].as_i64().unwrap(), id);

    let (status, body) = send(&env.state, "GET", &format!("/rolls/get_one_roll?roll_id={}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "id": id,
            "length": 10.0,
            "weight": 5.0,
            "added_date": "01.01.2024",
            "removed_date": null
        })
    );

    let (status, body) = send(&env.state, "GET", "/rolls/get_rolls?sortingProperties=weight%20desc").await;
    assert_eq!(status, StatusCode::OK);
    let weights: Vec<f64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["weight"].as_f64().unwrap())
        .collect();
    assert_eq!(weights, vec![15.0, 5.0]);

    let (status, body) = send(&env.state, "GET", "/rolls/get_rolls?sorting_properties=added_date").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["added_date"], json!("01.01.2024"));
}

#[tokio::test]
async fn test_新增钢卷参数错误返回400() {
    let env = ApiTestEnv::new().unwrap();

    let cases = [
        "/rolls/add_roll?length=10&weight=5&added_date=1.1.2024",
        "/rolls/add_roll?length=-1&weight=5&added_date=01.01.2024",
        "/rolls/add_roll?length=10&weight=5&added_date=05.01.2024&removed_date=04.01.2024",
        "/rolls/add_roll?length=abc&weight=5&added_date=01.01.2024",
        "/rolls/add_roll?weight=5&added_date=01.01.2024",
    ];
    for uri in cases {
        let (status, body) = send(&env.state, "POST", uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri={}", uri);
        assert!(body["code"].is_string());
        assert!(body["message"].is_string());
        assert!(body["details"].is_null());
    }

    let (_, body) = send(&env.state, "GET", "/rolls/get_rolls").await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_单项统计响应结构() {
    let env = ApiTestEnv::new().unwrap();
    test_helpers::seed_reference_rolls(env.api());

    let (status, body) = send(
        &env.state,
        "GET",
        "/rolls/get_statistic?parameter=sum_length_weight&start_date=01.01.2024&end_date=02.01.2024",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["parameter"], json!("sum_length_weight"));
    assert_eq!(body["start_date"], json!("01.01.2024"));
    assert_eq!(body["end_date"], json!("02.01.2024"));
    assert_eq!(body["value"]["length"], json!(30.0));
    assert_eq!(body["value"]["weight"], json!(20.0));

    let (status, body) = send(
        &env.state,
        "GET",
        "/rolls/get_statistic?parameter=min_max_duration_days&start_date=01.01.2024&end_date=02.01.2024",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["parameter"], json!("min_max_datadiff"));
    assert_eq!(body["statistic"], json!("min_max_datadiff"));

    let (status, body) = send(
        &env.state,
        "GET",
        "/rolls/get_statistic?parameter=count_added&start_date=01.01.2024&end_date=02.01.2024",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["value"], json!(1));
}

#[tokio::test]
async fn test_统计错误状态码() {
    let env = ApiTestEnv::new().unwrap();

    let (status, body) = send(
        &env.state,
        "GET",
        "/rolls/get_statistic?parameter=median&start_date=01.01.2024&end_date=02.01.2024",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], json!("UNKNOWN_STATISTIC"));

    let (status, body) = send(
        &env.state,
        "GET",
        "/rolls/get_statistic?parameter=count_added&start_date=2024-01-01&end_date=02.01.2024",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("INVALID_INPUT"));

    let (status, _) = send(
        &env.state,
        "GET",
        "/rolls/get_all_statistic?start_date=01.01.2020&end_date=01.01.2030",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_综合报表() {
    let env = ApiTestEnv::new().unwrap();
    test_helpers::seed_reference_rolls(env.api());

    let (status, body) = send(
        &env.state,
        "GET",
        "/rolls/get_all_statistic?start_date=01.01.2024&end_date=02.01.2024",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count_added"], json!(1));
    assert_eq!(body["count_removed"], json!(1));
    assert_eq!(body["min_max_datadiff"]["max_days"], json!(3));
    assert_eq!(
        body["min_max_inventory_days"]["max"]["date"],
        json!("01.01.2024")
    );
}

#[tokio::test]
async fn test_出库删除与清空() {
    let env = ApiTestEnv::new().unwrap();
    let (a, b) = test_helpers::seed_reference_rolls(env.api());

    let (status, body) = send(
        &env.state,
        "DELETE",
        &format!("/rolls/remove_roll?roll_id={}&removed_date=10.01.2024", a),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed_date"], json!("10.01.2024"));

    let (status, _) = send(
        &env.state,
        "DELETE",
        &format!("/rolls/remove_roll?roll_id={}&removed_date=10-01-2024", a),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &env.state,
        "DELETE",
        "/rolls/remove_roll?roll_id=999&removed_date=10.01.2024",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&env.state, "DELETE", &format!("/rolls/remove_roll_info?roll_id={}", b)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], json!(true));

    let (status, body) = send(&env.state, "GET", &format!("/rolls/get_one_roll?roll_id={}", b)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], json!("NOT_FOUND"));

    let (status, _) = send(&env.state, "DELETE", "/rolls/clear_db").await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&env.state, "GET", "/rolls/get_rolls").await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_存储不可用返回404() {
    let env = ApiTestEnv::new().unwrap();

    let (status, _) = send(&env.state, "GET", "/health").await;
    assert_eq!(status, StatusCode::OK);

    let conn = db::open_sqlite_connection(&env.db_path).unwrap();
    conn.execute_batch("DROP TABLE rolls;").unwrap();

    let (status, body) = send(&env.state, "GET", "/health").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], json!("DATABASE_CONNECTION_ERROR"));

    let (status, _) = send(&env.state, "GET", "/rolls/get_rolls").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// 批量写入一年内分布的钢卷（直接写库，日期为存储格式）
fn bulk_insert_rolls(db_path: &str, count: i64) {
    let mut conn = db::open_sqlite_connection(db_path).unwrap();
    let tx = conn.transaction().unwrap();
    let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    for i in 0..count {
        let added = base + Duration::days(i % 366);
        let removed = (i % 2 == 0).then(|| added + Duration::days(i % 30));
        tx.execute(
            "INSERT INTO rolls (length, weight, added_date, removed_date) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                10.0 + (i % 7) as f64,
                5.0 + (i % 11) as f64,
                added.format("%Y-%m-%d").to_string(),
                removed.map(|d| d.format("%Y-%m-%d").to_string()),
            ],
        )
        .unwrap();
    }
    tx.commit().unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn test_长时间报表不阻塞运行时() {
    let env = ApiTestEnv::new().unwrap();
    bulk_insert_rolls(&env.db_path, 2000);

    let state = env.state.clone();
    let report = tokio::spawn(async move {
        let (status, body) = send(
            &state,
            "GET",
            "/rolls/get_all_statistic?start_date=01.01.2024&end_date=31.12.2024",
        )
        .await;
        (status, body, Instant::now())
    });

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let timer_at = Instant::now();

    let (status, body, report_done_at) = report.await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count_added"], json!(1000));
    assert!(timer_at < report_done_at, "计时器应在报表完成前触发");
}

// ==========================================
// 钢卷库存台账系统 - HTTP 服务入口
// ==========================================

use anyhow::Context;
use steel_roll_ledger::app::{router, AppState};
use steel_roll_ledger::config::AppConfig;
use steel_roll_ledger::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", steel_roll_ledger::APP_NAME);
    tracing::info!("系统版本: {}", steel_roll_ledger::VERSION);
    tracing::info!("==================================================");

    let config = AppConfig::from_env().context("加载配置失败")?;
    tracing::info!("使用数据库: {}", config.db_path);

    let bind_addr = config.bind_addr;
    let app_state = AppState::new(config).map_err(anyhow::Error::msg)?;

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("无法监听 {}", bind_addr))?;
    tracing::info!("HTTP 服务已启动: http://{}", bind_addr);

    axum::serve(listener, router(app_state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP 服务异常退出")?;

    tracing::info!("服务已停止");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("监听退出信号失败: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("收到退出信号，正在关闭...");
}

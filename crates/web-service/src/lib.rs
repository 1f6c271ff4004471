//! Web服务模块
//!
//! 提供 HTTP API 接口和文档服务

use color_eyre::Result;
use engine::{InvestmentServiceTrait, TokenLedger};
use shared_lib::{Address, EventLog};
use std::sync::Arc;
use tokio::sync::watch::Receiver;
use tracing::info;

pub mod models;
pub mod routes;

/// 应用共享状态
///
/// clone 的开销很小，axum 会为每个请求 clone 一份。
#[derive(Clone)]
pub struct AppState {
    /// 投资服务，项目和投资相关接口都通过它完成
    pub service: Arc<dyn InvestmentServiceTrait>,
    /// 代币账本，投资前的授权、余额查询使用
    pub ledger: Arc<dyn TokenLedger>,
    /// 进程内事件日志
    pub events: Arc<EventLog>,
    /// 代币发行账户，转账接口只允许从这个账户转出
    pub treasury: Address,
}

/// 启动 Web 服务
pub async fn start_web_service(state: AppState, bind_addr: &str, mut shutdown_rx: Receiver<bool>) -> Result<()> {
    let router = routes::create_app_router(state);

    info!("🚀 启动 Web Service 在 {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move {
            // 发送端被丢弃同样视为关闭信号
            let _ = shutdown_rx.changed().await;
            info!("🛑 Web Service 正在关闭...");
        })
        .await?;

    Ok(())
}

//! P2P众筹投资服务入口
//!
//! 负责加载配置、初始化日志，组装项目仓库、代币账本和投资引擎，
//! 然后同时运行 Web 服务和审计消费者，收到 Ctrl+C 后优雅退出。

use color_eyre::Result;
use consumer_service::{start_event_consumers, AuditHandler};
use database::{initialize_database, MemoryProjectRepository, ProjectRepository};
use engine::{InvestmentEngine, InvestmentServiceTrait, MemoryTokenLedger, TokenLedger};
use shared_lib::{AppConfig, EventLog, EventSink, EventSinks, RedisEventSink};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::try_join;
use tracing::{error, info};
use web_service::{start_web_service, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let app_config = AppConfig::load()?;

    tracing_subscriber::fmt().with_max_level(app_config.log_level).init();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("🛑 收到退出信号，开始关闭服务..."),
            Err(err) => error!("❌ 监听退出信号失败，服务即将关闭: {}", err),
        }
        let _ = shutdown_tx.send(true);
    });

    let ledger_config = &app_config.ledger;
    let ledger: Arc<dyn TokenLedger> = Arc::new(MemoryTokenLedger::new(
        &ledger_config.token_name,
        &ledger_config.token_symbol,
        &ledger_config.treasury,
        ledger_config.initial_supply,
    ));
    info!(
        "🪙 代币 {} 发行 {}，发行账户 {}，托管账户 {}",
        ledger_config.token_symbol, ledger_config.initial_supply, ledger_config.treasury, ledger_config.custody_account
    );

    // 事件先写进程内日志，配置了redis时同时写入stream
    let event_log = Arc::new(EventLog::new());
    let mut sinks = EventSinks::new().with(Arc::clone(&event_log) as Arc<dyn EventSink>);
    if let Some(redis) = &app_config.redis {
        let redis_sink = RedisEventSink::connect(&redis.redis_conn_str, redis.event_stream.clone()).await?;
        sinks = sinks.with(Arc::new(redis_sink));
        info!("📮 领域事件同时发布到redis stream {}", redis.event_stream);
    }
    let sinks: Arc<dyn EventSink> = Arc::new(sinks);

    let custody = ledger_config.custody_account.clone();
    let service: Arc<dyn InvestmentServiceTrait> = match &app_config.postgresql_conn_str {
        Some(conn_str) => {
            let pool = initialize_database(conn_str).await?;
            Arc::new(
                InvestmentEngine::new(ProjectRepository::new(pool), Arc::clone(&ledger), custody).with_events(sinks),
            )
        }
        None => {
            info!("💾 未配置 DATABASE_URL，使用内存项目仓库");
            Arc::new(
                InvestmentEngine::new(MemoryProjectRepository::new(), Arc::clone(&ledger), custody).with_events(sinks),
            )
        }
    };

    let state = AppState {
        service,
        ledger,
        events: event_log,
        treasury: ledger_config.treasury.clone(),
    };

    let consumers = async {
        match &app_config.redis {
            Some(redis) => {
                let audit = Arc::new(AuditHandler);
                start_event_consumers(redis, audit, shutdown_rx.clone()).await
            }
            None => {
                info!("未配置 REDIS_URL，不启动审计消费者");
                Ok(())
            }
        }
    };

    try_join!(
        start_web_service(state, &app_config.bind_addr, shutdown_rx.clone()),
        consumers
    )?;

    info!("👋 服务已退出");

    Ok(())
}

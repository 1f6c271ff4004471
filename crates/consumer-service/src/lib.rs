//! 消费者服务模块
//!
//! 从Redis Stream读取引擎发布的领域事件，交给 [`EventHandlerTrait`] 处理器处理（当前是审计处理器）。
//!
//! 每个消费者的处理流程：
//!
//! 1. 读取已投递但未确认的消息（上次退出时没有处理完的）
//! 2. 读取新消息
//! 3. 逐条交给处理器，处理失败只记录日志
//! 4. 整批 `XACK`

pub mod audit;
pub mod redis_interaction;
pub mod traits;

pub use audit::AuditHandler;
pub use traits::{EventHandlerTrait, EventStream};

use crate::redis_interaction::{consumer_event_worker, create_event_group};
use color_eyre::eyre::Context;
use color_eyre::Result;
use futures::future::try_join_all;
use shared_lib::RedisConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch::Receiver;
use tracing::{info, warn};

/// 启动审计消费者
///
/// ## 参数说明
/// - `redis_config`: redis配置，决定stream名称和消费者个数
/// - `handler`: 事件处理器
/// - `shutdown_rx`: 用于接收关闭信号
///
/// 启动失败（例如redis暂时不可用）会每5秒重试一次，直到收到关闭信号。
pub async fn start_event_consumers<H: EventHandlerTrait>(
    redis_config: &RedisConfig,
    handler: Arc<H>,
    shutdown_rx: Receiver<bool>,
) -> Result<()> {
    info!(
        "Starting redis event consumers on stream {} with redis info {}...",
        redis_config.event_stream, redis_config.redis_conn_str
    );

    let event_stream = Arc::new(EventStream {
        handler,
        stream_name: redis_config.event_stream.clone(),
        consumer_name_template: "audit_consumer".to_string(),
    });

    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        match start_stream_consumers(redis_config, Arc::clone(&event_stream), shutdown_rx.clone()).await {
            Ok(_) => break,
            Err(err) => {
                warn!("{:?}", err);
                warn!("Failed to start event consumers, retrying...");
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
        }
    }

    info!("Redis event consumers stopped");

    Ok(())
}

async fn start_stream_consumers<H: EventHandlerTrait>(
    redis_config: &RedisConfig,
    event_stream: Arc<EventStream<H>>,
    shutdown_rx: Receiver<bool>,
) -> Result<()> {
    create_event_group(&redis_config.redis_conn_str, &event_stream).await?;

    let consumers: Vec<_> = (0..redis_config.max_consumer_count.max(1))
        .map(|i| {
            let consumer_name = format!("{}_{}", event_stream.consumer_name_template, i);

            consumer_event_worker(
                redis_config.redis_conn_str.clone(),
                Arc::clone(&event_stream),
                consumer_name,
                shutdown_rx.clone(),
            )
        })
        .collect();

    try_join_all(consumers)
        .await
        .context(format!("wait for all consumer [{}] end", event_stream.consumer_name_template))?;

    Ok(())
}

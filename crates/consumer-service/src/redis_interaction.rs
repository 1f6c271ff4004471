use crate::traits::{EventHandlerTrait, EventStream};
use color_eyre::Result;
use futures::stream::iter;
use futures::StreamExt;
use redis::aio::ConnectionManager;
use redis::streams::{StreamId, StreamReadOptions, StreamReadReply};
use redis::{AsyncCommands, RedisError, RedisResult, Value};
use shared_lib::{BATCH_SIZE, CONSUMER_GROUP_NAME, EVENT_FIELD, READ_BLOCK_MILLIS};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch::Receiver;
use tracing::{debug, error, warn};

pub async fn new_redis_connection_manager(conn_str: &str) -> Result<ConnectionManager> {
    Ok(ConnectionManager::new(redis::Client::open(conn_str)?).await?)
}

/// 创建消费者组，stream不存在时一并创建
///
/// 从stream开头读取，消费者组创建之前发布的事件也会被审计
pub async fn create_event_group<H: EventHandlerTrait>(conn_str: &str, event_stream: &EventStream<H>) -> Result<()> {
    let mut conn = new_redis_connection_manager(conn_str).await?;

    let re: RedisResult<()> = conn
        .xgroup_create_mkstream(&event_stream.stream_name, CONSUMER_GROUP_NAME, "0")
        .await;
    if let Err(err) = re {
        // 消费者组已经存在时同样会返回错误（BUSYGROUP）
        warn!("Failed to create redis event group {}: {}", CONSUMER_GROUP_NAME, err);
    }

    Ok(())
}

/// 先读取已投递未确认的消息，再读取新消息
pub async fn xread_group<H: EventHandlerTrait>(
    conn: &mut ConnectionManager,
    streams: &[String],
    opts: &StreamReadOptions,
    event_stream: &Arc<EventStream<H>>,
) -> Result<()> {
    let pending_msg = conn.xread_options::<String, &str, StreamReadReply>(streams, &["0"], opts).await?;
    consume_redis_message(conn, pending_msg, event_stream).await?;

    let undelivered_msg = conn.xread_options::<String, &str, StreamReadReply>(streams, &[">"], opts).await?;
    consume_redis_message(conn, undelivered_msg, event_stream).await?;

    Ok(())
}

pub async fn consume_redis_message<H: EventHandlerTrait>(
    conn: &mut ConnectionManager,
    reply: StreamReadReply,
    event_stream: &Arc<EventStream<H>>,
) -> Result<()> {
    for key in reply.keys {
        if key.ids.is_empty() {
            continue;
        }

        // 同一批消息按顺序处理，审计日志和发布顺序一致
        iter(key.ids.iter().map(|id| consume_single_redis_message(Arc::clone(event_stream), id)))
            .buffered(1)
            .collect::<Vec<_>>()
            .await;

        let xack_ret: Result<(), RedisError> = conn
            .xack(
                &event_stream.stream_name,
                CONSUMER_GROUP_NAME,
                &key.ids.iter().map(|it| &it.id).collect::<Vec<_>>(),
            )
            .await;

        if let Err(err) = xack_ret {
            error!(
                "xack batch consumer redis message from stream {} failed, err = {}",
                &event_stream.stream_name, err
            )
        }
    }

    Ok(())
}

async fn consume_single_redis_message<H: EventHandlerTrait>(event_stream: Arc<EventStream<H>>, stream_id: &StreamId) {
    if let Some(Value::BulkString(data)) = stream_id.map.get(EVENT_FIELD) {
        if let Ok(raw) = String::from_utf8(data.to_vec()) {
            if let Err(err) = event_stream.handler.handle_event(&raw).await {
                error!("failed to handle redis message {}: {}", stream_id.id, err);
            }
        } else {
            warn!("stream id {} format is not a string", stream_id.id);
        }
    } else {
        warn!("stream id {} has no {} field", stream_id.id, EVENT_FIELD);
    }
}

pub async fn consumer_event_worker<H: EventHandlerTrait>(
    conn_str: String,
    event_stream: Arc<EventStream<H>>,
    consumer_name: String,
    mut shutdown_rx: Receiver<bool>,
) -> Result<()> {
    let mut conn = new_redis_connection_manager(&conn_str).await?;
    debug!("Redis event consumer {} started", consumer_name);

    let opts = StreamReadOptions::default()
        .group(CONSUMER_GROUP_NAME, &consumer_name)
        .block(READ_BLOCK_MILLIS)
        .count(BATCH_SIZE);
    let streams = vec![event_stream.stream_name.clone()];

    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        tokio::select! {
          changed = shutdown_rx.changed() => {
              // 发送端被丢弃时同样退出
              if changed.is_err() || *shutdown_rx.borrow() {
                  break;
              }
          }
          result = xread_group(&mut conn, &streams, &opts, &event_stream) => {
              if let Err(err) = result {
                  warn!("{} xread group failed, err: {}, reconnecting...", consumer_name, err);
                  tokio::time::sleep(Duration::from_secs(5)).await;
              }
          }
        }
    }

    debug!("Redis event consumer {} ended", consumer_name);

    Ok(())
}

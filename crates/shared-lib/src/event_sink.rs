//! 领域事件发布
//!
//! 引擎只依赖 [`EventSink`] 特征，具体发布到哪里由程序启动时组装：
//! - [`EventLog`]: 进程内事件日志，供查询接口和测试使用
//! - [`RedisEventSink`]: 写入Redis Stream，供审计消费者异步处理
//! - [`EventSinks`]: 同时发布到多个目标

use crate::error::SharedResult;
use crate::models::events::DomainEvent;
use crate::models::redis_constants::EVENT_FIELD;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{trace, warn};

/// 事件发布特征
///
/// 事件发布发生在状态变更之后，发布失败不会回滚已经提交的状态，
/// 调用方只需要记录日志。
#[async_trait::async_trait]
pub trait EventSink: Send + Sync + 'static {
    async fn publish(&self, event: &DomainEvent) -> SharedResult<()>;
}

/// 进程内事件日志，按发布顺序保存
#[derive(Debug, Default)]
pub struct EventLog {
    events: RwLock<Vec<DomainEvent>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 返回全部事件的副本
    pub async fn events(&self) -> Vec<DomainEvent> {
        self.events.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl EventSink for EventLog {
    async fn publish(&self, event: &DomainEvent) -> SharedResult<()> {
        self.events.write().await.push(event.clone());
        Ok(())
    }
}

/// 多目标发布
///
/// 会尝试发布到所有目标，某个目标失败不影响其他目标，最终返回第一个错误。
#[derive(Default, Clone)]
pub struct EventSinks {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl EventSinks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

#[async_trait::async_trait]
impl EventSink for EventSinks {
    async fn publish(&self, event: &DomainEvent) -> SharedResult<()> {
        let mut first_err = None;
        for sink in &self.sinks {
            if let Err(err) = sink.publish(event).await {
                warn!("⚠️ 事件 {} 发布失败: {}", event.name(), err);
                if first_err.is_none() {
                    first_err = Some(err);
                }
            }
        }

        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// 发布事件到Redis Stream
///
/// 每个事件对应一条stream记录：`XADD <stream> * event <json>`
#[derive(Clone)]
pub struct RedisEventSink {
    conn: ConnectionManager,
    stream_name: String,
}

impl RedisEventSink {
    pub fn new(conn: ConnectionManager, stream_name: impl Into<String>) -> Self {
        Self {
            conn,
            stream_name: stream_name.into(),
        }
    }

    /// 根据连接字符串创建
    pub async fn connect(conn_str: &str, stream_name: impl Into<String>) -> SharedResult<Self> {
        let conn = ConnectionManager::new(redis::Client::open(conn_str)?).await?;
        Ok(Self::new(conn, stream_name))
    }
}

#[async_trait::async_trait]
impl EventSink for RedisEventSink {
    async fn publish(&self, event: &DomainEvent) -> SharedResult<()> {
        let payload = serde_json::to_string(event)?;
        trace!("Publishing event to {}: {}", self.stream_name, payload);

        // ConnectionManager内部是共享连接，clone代价很小
        let mut conn = self.conn.clone();
        let _: String = conn.xadd(&self.stream_name, "*", &[(EVENT_FIELD, payload)]).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SharedError;
    use crate::models::address::Address;

    struct BrokenSink;

    #[async_trait::async_trait]
    impl EventSink for BrokenSink {
        async fn publish(&self, _event: &DomainEvent) -> SharedResult<()> {
            let err = serde_json::from_str::<DomainEvent>("not json").unwrap_err();
            Err(SharedError::Serialization(err))
        }
    }

    #[tokio::test]
    async fn test_event_log_keeps_order() {
        let log = EventLog::new();
        assert!(log.is_empty().await);

        log.publish(&DomainEvent::ProjectCreated { project_id: 1 }).await.unwrap();
        log.publish(&DomainEvent::InvestmentMade {
            investor: Address::new("0xa"),
            project_id: 1,
            amount: 10,
        })
        .await
        .unwrap();

        let events = log.events().await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], DomainEvent::ProjectCreated { project_id: 1 });
        assert_eq!(events[1].name(), "InvestmentMade");
    }

    #[tokio::test]
    async fn test_fanout_continues_after_failure() {
        let log = Arc::new(EventLog::new());
        let sinks = EventSinks::new()
            .with(Arc::new(BrokenSink))
            .with(Arc::clone(&log) as Arc<dyn EventSink>);

        let result = sinks.publish(&DomainEvent::ProjectCreated { project_id: 3 }).await;

        // 失败会返回，但后面的目标仍然收到事件
        assert!(result.is_err());
        assert_eq!(log.len().await, 1);
    }
}

use color_eyre::Result;
use std::sync::Arc;

/// 异步事件处理器特征
///
/// 由于实现了 [`EventHandlerTrait`] 的处理器需要async move到协程中，因此需要实现线程安全的[`Send`]和[`Sync`]
///
/// 返回错误时消息依然会被确认，不会重复投递。
#[async_trait::async_trait]
pub trait EventHandlerTrait: Send + Sync + 'static {
    /// 处理一条stream消息，`payload` 是消息里 `event` 字段的内容
    async fn handle_event(&self, payload: &str) -> Result<()>;
}

/// 事件消费任务
///
/// - `handler`: 核心业务处理器
/// - `stream_name`: 读取的stream名称
/// - `consumer_name_template`: 消费者名称，实际执行的时候会加上序号（并发处理的多个消费者）
pub struct EventStream<H: EventHandlerTrait> {
    pub handler: Arc<H>,
    pub stream_name: String,
    pub consumer_name_template: String,
}

//! Redis常量定义模块
//!
//! 统一管理所有Redis相关的键名、配置常量等，
//! 确保事件发布方和消费方使用的键名保持一致。

/// 默认的领域事件流名称
///
/// 可通过环境变量 `EVENT_STREAM` 覆盖
pub const DEFAULT_EVENT_STREAM: &str = "p2p_fund:events";

/// Redis消费者组名称
///
/// 所有审计消费者都属于这个统一的组
pub const CONSUMER_GROUP_NAME: &str = "p2p-fund";

/// 事件在stream条目中的字段名
///
/// 值为 [`crate::DomainEvent`] 的JSON序列化数据
pub const EVENT_FIELD: &str = "event";

/// 单次读取的最大消息数
pub const BATCH_SIZE: usize = 10;

/// XREADGROUP 阻塞等待时间（毫秒）
pub const READ_BLOCK_MILLIS: usize = 1000;

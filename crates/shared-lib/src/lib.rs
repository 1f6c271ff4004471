//! 🔧 共享库模块
//!
//! 这个模块包含了在多个服务之间共享的通用代码，包括：
//! - 领域基础类型（账户地址、项目ID、金额、时间戳）
//! - 程序配置
//! - 领域事件及事件发布
//! - Redis 常量

pub mod error;
pub mod event_sink;
pub mod models;

// 重新导出常用类型
pub use error::{SharedError, SharedResult};
pub use event_sink::{EventLog, EventSink, EventSinks, RedisEventSink};
pub use models::{
    Address, Amount, AppConfig, DomainEvent, LedgerConfig, ProjectId, RedisConfig, Timestamp,
    // Redis 常量
    BATCH_SIZE, CONSUMER_GROUP_NAME, DEFAULT_EVENT_STREAM, EVENT_FIELD, READ_BLOCK_MILLIS,
    // 时间常量
    SECONDS_PER_DAY, SECONDS_PER_HOUR,
};

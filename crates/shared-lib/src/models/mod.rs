pub mod address;
pub mod config;
pub mod events;
pub mod redis_constants;

// 重新导出具体的类型
pub use address::{Address, Amount, ProjectId, Timestamp, SECONDS_PER_DAY, SECONDS_PER_HOUR};
pub use config::{AppConfig, LedgerConfig, RedisConfig};
pub use events::DomainEvent;
pub use redis_constants::*;

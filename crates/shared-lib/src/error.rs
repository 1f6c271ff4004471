//! 📋 错误处理模块
//!
//! 定义了共享库中使用的统一错误类型

use thiserror::Error;

/// 共享库错误类型
#[derive(Error, Debug)]
pub enum SharedError {
    #[error("❌ Redis错误: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("❌ 序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// 共享库的 Result 类型
pub type SharedResult<T> = std::result::Result<T, SharedError>;

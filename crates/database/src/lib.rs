//! 项目登记模块
//!
//! 负责项目记录的存储，提供两种实现：
//! - [`MemoryProjectRepository`]: 内存中的索引表，项目ID即下标+1
//! - [`ProjectRepository`]: PostgreSQL持久化实现
//!
//! 仓库层只保证数据自身的约束（ID单调递增、募资总额不超过目标），
//! 时间窗口、投资人身份等业务规则由上层的投资引擎负责。

pub mod connection;
pub mod error;
pub mod models;
pub mod repositories;

pub use connection::{initialize_database, DatabasePool};
pub use error::DatabaseError;
pub use models::project::{Investment, Project, ProjectCreate, ProjectSearchResult, ProjectTuple};
pub use repositories::{memory::MemoryProjectRepository, project::ProjectRepository, traits::ProjectRepositoryTrait};

/// 数据库操作结果类型
pub type DatabaseResult<T> = Result<T, DatabaseError>;

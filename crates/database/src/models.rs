//! 数据库模型模块
//!
//! 这里定义项目与投资记录的结构体和相关操作

pub mod project;

// 重新导出具体的模型
pub use project::{Investment, Project, ProjectCreate, ProjectSearchResult, ProjectTuple};

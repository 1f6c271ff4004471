//! 数据库仓库 trait 定义
//!
//! 这里定义了项目登记的抽象接口
//!
//! ## Repository Trait 设计模式 🎯
//!
//! 仓库 trait 统一使用以下约束：
//!
//! ```rust,ignore
//! #[async_trait::async_trait]
//! pub trait XxxRepositoryTrait: Send + Sync + 'static {
//!     // 异步方法定义...
//! }
//! ```
//!
//! ### Trait 约束说明 📚
//!
//! #### `Send` + `Sync` 🚀
//! - 投资引擎会在多个请求协程中同时使用同一个仓库实例
//! - 异步方法返回的 `Future` 需要在不同线程间传递
//!
//! #### `'static` 生命周期 ⏰
//! - 仓库作为应用服务长期运行，不依赖于短期引用
//!
//! 这里没有要求 `Clone`：内存仓库内部已经是 `Arc`，PostgreSQL 仓库持有的连接池本身就可以 clone，
//! 上层按需要自行包装。
//!
//! ### 实际应用场景 💡
//!
//! ```rust,ignore
//! // 1. Policy Based Design - 引擎对仓库使用泛型
//! let engine = InvestmentEngine::new(MemoryProjectRepository::new(), ledger, custody);
//!
//! // 2. 生产环境换成 PostgreSQL，引擎代码不需要改动
//! let pool = initialize_database(&database_url).await?;
//! let engine = InvestmentEngine::new(ProjectRepository::new(pool), ledger, custody);
//! ```
//!
//! ### 最佳实践 ✅
//!
//! 1. **异步优先**：所有仓库方法都是异步的
//! 2. **错误处理**：使用统一的 `DatabaseResult<T>` 类型进行错误处理
//! 3. **失败无副作用**：任何返回错误的调用都不能修改已保存的数据

pub mod project;

// 重新导出
pub use project::ProjectRepositoryTrait;

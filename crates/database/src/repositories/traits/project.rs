//! 项目仓库 trait 定义
//!
//! 定义项目登记的抽象接口

use crate::models::project::{Investment, Project, ProjectCreate, ProjectSearchResult};
use crate::{DatabaseError, DatabaseResult};
use shared_lib::ProjectId;

/// 项目仓库trait定义
///
/// 定义了项目登记相关的操作接口，支持：
/// - 项目创建（分配单调递增的ID）
/// - 项目查询、分页搜索
/// - 投资记账（唯一修改 `total_raised` 的入口）
/// - 投资记录查询
///
/// 项目和投资记录都不会被删除。
#[async_trait::async_trait]
pub trait ProjectRepositoryTrait: Send + Sync + 'static {
    /// 创建新项目
    ///
    /// # 参数
    /// - `project`: 项目创建信息，会先调用 [`ProjectCreate::validate`] 检查
    ///
    /// # 返回值
    /// 返回创建的项目，ID从1开始递增且不会复用，`total_raised` 为0
    async fn create_project(&self, project: ProjectCreate) -> DatabaseResult<Project>;

    /// 根据 ID 查找项目，不存在时返回 `None`
    async fn find_project(&self, id: ProjectId) -> DatabaseResult<Option<Project>>;

    /// 根据 ID 获取项目信息
    ///
    /// # 返回值
    /// 项目不存在（包括ID为0）时返回 [`DatabaseError::ProjectNotFound`]
    async fn get_project_by_id(&self, id: ProjectId) -> DatabaseResult<Project> {
        self.find_project(id).await?.ok_or(DatabaseError::ProjectNotFound(id))
    }

    /// 根据查询参数搜索项目
    ///
    /// # 参数
    /// - `project_name`: 项目名称（模糊搜索）
    /// - `page_size`: 页面大小
    /// - `offset`: 偏移量
    ///
    /// # 返回值
    /// 按ID排序，返回包含项目列表和总数的结果 [`ProjectSearchResult`]
    async fn find_projects(&self, project_name: Option<String>, page_size: u64, offset: u64) -> DatabaseResult<ProjectSearchResult>;

    /// 记录一笔投资
    ///
    /// 追加投资记录并把金额累加到 `total_raised`。调用方需要提前完成时间窗口、
    /// 投资人身份等校验，这里只检查项目存在以及不会超过募资目标。
    ///
    /// # 返回值
    /// 返回记账后的项目
    async fn record_investment(&self, investment: Investment) -> DatabaseResult<Project>;

    /// 按记账顺序返回项目的全部投资记录
    async fn list_investments(&self, id: ProjectId) -> DatabaseResult<Vec<Investment>>;
}

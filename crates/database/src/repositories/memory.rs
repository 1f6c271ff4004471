//! 内存项目仓库
//!
//! 使用 `Vec` 作为索引表，项目ID = 下标 + 1。项目不会被删除，所以ID天然单调递增且不会复用。

use crate::models::project::{Investment, Project, ProjectCreate, ProjectSearchResult};
use crate::repositories::traits::ProjectRepositoryTrait;
use crate::{DatabaseError, DatabaseResult};
use shared_lib::ProjectId;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug)]
struct ProjectEntry {
    project: Project,
    investments: Vec<Investment>,
}

/// 内存项目仓库
///
/// 读操作共享读锁，创建项目和记账使用写锁，保证"检查-更新"在同一把锁内完成。
#[derive(Debug, Clone, Default)]
pub struct MemoryProjectRepository {
    entries: Arc<RwLock<Vec<ProjectEntry>>>,
}

impl MemoryProjectRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

/// 项目ID转换为下标，ID为0时返回 `None`
fn slot(id: ProjectId) -> Option<usize> {
    id.checked_sub(1).and_then(|index| usize::try_from(index).ok())
}

#[async_trait::async_trait]
impl ProjectRepositoryTrait for MemoryProjectRepository {
    async fn create_project(&self, project: ProjectCreate) -> DatabaseResult<Project> {
        debug!("📝 创建项目: {:#?}", project);
        project.validate()?;

        let mut entries = self.entries.write().await;
        let id = entries.len() as ProjectId + 1;
        let project = project.into_project(id);
        entries.push(ProjectEntry {
            project: project.clone(),
            investments: Vec::new(),
        });

        debug!("✅ 项目创建成功: {}", id);
        Ok(project)
    }

    async fn find_project(&self, id: ProjectId) -> DatabaseResult<Option<Project>> {
        let entries = self.entries.read().await;
        Ok(slot(id).and_then(|index| entries.get(index)).map(|entry| entry.project.clone()))
    }

    async fn find_projects(&self, project_name: Option<String>, page_size: u64, offset: u64) -> DatabaseResult<ProjectSearchResult> {
        debug!(
            "🔍 搜索项目 - 名称: {:?}, 页面大小: {}, 偏移量: {}",
            project_name, page_size, offset
        );

        let entries = self.entries.read().await;
        let matched: Vec<&Project> = entries
            .iter()
            .map(|entry| &entry.project)
            .filter(|p| project_name.as_deref().map_or(true, |name| p.name.contains(name)))
            .collect();

        let total = matched.len() as u64;
        let projects = matched
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(page_size).unwrap_or(usize::MAX))
            .cloned()
            .collect::<Vec<_>>();

        debug!("✅ 搜索完成 - 找到 {} 个项目，总计 {} 个", projects.len(), total);
        Ok(ProjectSearchResult { projects, total })
    }

    async fn record_investment(&self, investment: Investment) -> DatabaseResult<Project> {
        debug!("💰 记录投资: {:?}", investment);

        if investment.amount == 0 {
            return Err(DatabaseError::InvalidInvestment("amount must be positive".to_string()));
        }

        let mut entries = self.entries.write().await;
        let entry = slot(investment.project_id)
            .and_then(|index| entries.get_mut(index))
            .ok_or(DatabaseError::ProjectNotFound(investment.project_id))?;

        let project = &mut entry.project;
        let new_total = project
            .total_raised
            .checked_add(investment.amount)
            .filter(|total| *total <= project.fund_target)
            .ok_or(DatabaseError::FundTargetExceeded {
                project_id: project.id,
                total_raised: project.total_raised,
                amount: investment.amount,
                fund_target: project.fund_target,
            })?;

        project.total_raised = new_total;
        let updated = project.clone();
        entry.investments.push(investment);

        debug!("✅ 投资记录成功，项目 {} 已募集 {}", updated.id, updated.total_raised);
        Ok(updated)
    }

    async fn list_investments(&self, id: ProjectId) -> DatabaseResult<Vec<Investment>> {
        let entries = self.entries.read().await;
        slot(id)
            .and_then(|index| entries.get(index))
            .map(|entry| entry.investments.clone())
            .ok_or(DatabaseError::ProjectNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_lib::{Address, SECONDS_PER_DAY};

    fn project_create(name: &str, fund_target: u64) -> ProjectCreate {
        ProjectCreate {
            owner: Address::new("0xowner"),
            name: name.to_string(),
            fund_start_time: SECONDS_PER_DAY,
            fund_end_time: 7 * SECONDS_PER_DAY,
            debt_annual_interest_rate: 8,
            debt_repayment_time: 365 * SECONDS_PER_DAY,
            fund_target,
        }
    }

    fn investment(project_id: ProjectId, amount: u64) -> Investment {
        Investment {
            investor: Address::new("0xinvestor"),
            project_id,
            amount,
            timestamp: 2 * SECONDS_PER_DAY,
        }
    }

    #[tokio::test]
    async fn test_ids_are_monotonic_from_one() {
        let repo = MemoryProjectRepository::new();

        for expected in 1..=5 {
            let project = repo.create_project(project_create("p", 100)).await.unwrap();
            assert_eq!(project.id, expected);
            assert_eq!(project.total_raised, 0);
        }
    }

    #[tokio::test]
    async fn test_invalid_create_does_not_allocate_id() {
        let repo = MemoryProjectRepository::new();

        let err = repo.create_project(project_create("", 100)).await.unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidProjectParameters(_)));

        let project = repo.create_project(project_create("ok", 100)).await.unwrap();
        assert_eq!(project.id, 1);
    }

    #[tokio::test]
    async fn test_get_unknown_project() {
        let repo = MemoryProjectRepository::new();
        repo.create_project(project_create("p", 100)).await.unwrap();

        assert!(matches!(repo.get_project_by_id(0).await, Err(DatabaseError::ProjectNotFound(0))));
        assert!(matches!(repo.get_project_by_id(2).await, Err(DatabaseError::ProjectNotFound(2))));
        assert!(matches!(repo.list_investments(9).await, Err(DatabaseError::ProjectNotFound(9))));
        assert_eq!(repo.get_project_by_id(1).await.unwrap().name, "p");
    }

    #[tokio::test]
    async fn test_record_investment_accumulates() {
        let repo = MemoryProjectRepository::new();
        repo.create_project(project_create("p", 100)).await.unwrap();

        repo.record_investment(investment(1, 30)).await.unwrap();
        let project = repo.record_investment(investment(1, 70)).await.unwrap();
        assert_eq!(project.total_raised, 100);

        let investments = repo.list_investments(1).await.unwrap();
        assert_eq!(investments.iter().map(|i| i.amount).collect::<Vec<_>>(), vec![30, 70]);
    }

    #[tokio::test]
    async fn test_record_investment_over_target_is_rejected() {
        let repo = MemoryProjectRepository::new();
        repo.create_project(project_create("p", 100)).await.unwrap();
        repo.record_investment(investment(1, 60)).await.unwrap();

        let err = repo.record_investment(investment(1, 41)).await.unwrap_err();
        assert!(matches!(err, DatabaseError::FundTargetExceeded { total_raised: 60, amount: 41, .. }));

        // 失败不能修改任何数据
        assert_eq!(repo.get_project_by_id(1).await.unwrap().total_raised, 60);
        assert_eq!(repo.list_investments(1).await.unwrap().len(), 1);

        let err = repo.record_investment(investment(1, u64::MAX)).await.unwrap_err();
        assert!(matches!(err, DatabaseError::FundTargetExceeded { .. }));
    }

    #[tokio::test]
    async fn test_record_investment_unknown_project_or_zero_amount() {
        let repo = MemoryProjectRepository::new();

        assert!(matches!(
            repo.record_investment(investment(1, 10)).await,
            Err(DatabaseError::ProjectNotFound(1))
        ));
        assert!(matches!(
            repo.record_investment(investment(1, 0)).await,
            Err(DatabaseError::InvalidInvestment(_))
        ));
    }

    #[tokio::test]
    async fn test_find_projects_paging_and_filter() {
        let repo = MemoryProjectRepository::new();
        for name in ["solar farm", "wind farm", "bakery", "solar roof"] {
            repo.create_project(project_create(name, 100)).await.unwrap();
        }

        let all = repo.find_projects(None, 2, 0).await.unwrap();
        assert_eq!(all.total, 4);
        assert_eq!(all.projects.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2]);

        let second_page = repo.find_projects(None, 2, 2).await.unwrap();
        assert_eq!(second_page.projects.iter().map(|p| p.id).collect::<Vec<_>>(), vec![3, 4]);

        let solar = repo.find_projects(Some("solar".to_string()), 10, 0).await.unwrap();
        assert_eq!(solar.total, 2);
        assert_eq!(solar.projects.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 4]);

        let empty = repo.find_projects(Some("farm".to_string()), 10, 5).await.unwrap();
        assert_eq!(empty.total, 2);
        assert!(empty.projects.is_empty());
    }
}

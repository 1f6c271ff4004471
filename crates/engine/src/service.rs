use crate::engine::{InvestmentEngine, InvestmentRecord};
use crate::error::EngineResult;
use crate::ledger::TokenLedger;
use database::{Investment, Project, ProjectCreate, ProjectRepositoryTrait, ProjectSearchResult};
use shared_lib::{Address, Amount, ProjectId};

/// 投资服务特征
///
/// Web 层通过 `Arc<dyn InvestmentServiceTrait>` 使用引擎，不需要知道仓库和账本的具体类型。
#[async_trait::async_trait]
pub trait InvestmentServiceTrait: Send + Sync + 'static {
    async fn create_project(&self, project: ProjectCreate) -> EngineResult<Project>;

    async fn get_project(&self, project_id: ProjectId) -> EngineResult<Project>;

    async fn find_projects(&self, name: Option<String>, page_size: u64, offset: u64) -> EngineResult<ProjectSearchResult>;

    async fn invest(&self, project_id: ProjectId, investor: Address, amount: Amount) -> EngineResult<InvestmentRecord>;

    async fn list_investments(&self, project_id: ProjectId) -> EngineResult<Vec<Investment>>;

    fn custody_account(&self) -> &Address;
}

#[async_trait::async_trait]
impl<PR, TL> InvestmentServiceTrait for InvestmentEngine<PR, TL>
where
    PR: ProjectRepositoryTrait,
    TL: TokenLedger + ?Sized,
{
    async fn create_project(&self, project: ProjectCreate) -> EngineResult<Project> {
        InvestmentEngine::create_project(self, project).await
    }

    async fn get_project(&self, project_id: ProjectId) -> EngineResult<Project> {
        InvestmentEngine::get_project(self, project_id).await
    }

    async fn find_projects(&self, name: Option<String>, page_size: u64, offset: u64) -> EngineResult<ProjectSearchResult> {
        InvestmentEngine::find_projects(self, name, page_size, offset).await
    }

    async fn invest(&self, project_id: ProjectId, investor: Address, amount: Amount) -> EngineResult<InvestmentRecord> {
        InvestmentEngine::invest(self, project_id, investor, amount).await
    }

    async fn list_investments(&self, project_id: ProjectId) -> EngineResult<Vec<Investment>> {
        InvestmentEngine::list_investments(self, project_id).await
    }

    fn custody_account(&self) -> &Address {
        InvestmentEngine::custody_account(self)
    }
}

//! 投资引擎
//!
//! 负责把"校验 → 转账 → 记账 → 发事件"编排成一个对调用方来说不可分割的操作。
//!
//! ## 顺序约束
//!
//! - 只有校验通过才会向账本发起转账
//! - 只有转账成功才会记账，转账失败时 `total_raised` 和投资列表都不变，也不会发出事件
//! - 同一个项目的投资请求通过项目锁串行执行，"检查-更新"不会交错
//!
//! 记账所需的条件在转账之前都已经在锁内校验过，记账正常情况下不会失败；
//! 万一失败（例如存储故障），引擎会把投资款从托管账户退回给投资人。

use crate::clock::{Clock, SystemClock};
use crate::error::{EngineError, EngineResult};
use crate::ledger::TokenLedger;
use crate::validator::validate_investment;
use database::{Investment, Project, ProjectCreate, ProjectRepositoryTrait, ProjectSearchResult};
use shared_lib::{Address, Amount, DomainEvent, EventLog, EventSink, ProjectId, Timestamp};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, error, info, warn};

/// 一笔成功的投资
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvestmentRecord {
    pub investment: Investment,
    /// 记账后项目的募资总额
    pub total_raised: Amount,
    pub fund_target: Amount,
}

/// 投资引擎
///
/// - `PR`: 项目仓库
/// - `TL`: 代币账本，可以是具体类型，也可以是 `dyn TokenLedger`
pub struct InvestmentEngine<PR: ProjectRepositoryTrait, TL: TokenLedger + ?Sized> {
    registry: PR,
    ledger: Arc<TL>,
    /// 托管账户，投资款转入这里
    custody: Address,
    events: Arc<dyn EventSink>,
    clock: Arc<dyn Clock>,
    /// 每个项目一把锁，只为存在的项目创建
    project_locks: Mutex<HashMap<ProjectId, Arc<tokio::sync::Mutex<()>>>>,
}

impl<PR: ProjectRepositoryTrait, TL: TokenLedger + ?Sized> InvestmentEngine<PR, TL> {
    /// 创建引擎，默认使用系统时间，事件只记录在进程内
    pub fn new(registry: PR, ledger: Arc<TL>, custody: Address) -> Self {
        Self {
            registry,
            ledger,
            custody,
            events: Arc::new(EventLog::new()),
            clock: Arc::new(SystemClock),
            project_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn registry(&self) -> &PR {
        &self.registry
    }

    pub fn ledger(&self) -> &Arc<TL> {
        &self.ledger
    }

    pub fn custody_account(&self) -> &Address {
        &self.custody
    }

    /// 创建项目并发出 `ProjectCreated` 事件
    pub async fn create_project(&self, project: ProjectCreate) -> EngineResult<Project> {
        let project = match self.registry.create_project(project).await {
            Ok(project) => project,
            Err(err) => {
                warn!("⚠️ 项目创建失败: {}", err);
                return Err(err.into());
            }
        };

        info!("✅ 项目 {} 创建成功，发起人: {}", project.id, project.owner);
        self.emit(DomainEvent::ProjectCreated { project_id: project.id }).await;

        Ok(project)
    }

    pub async fn get_project(&self, project_id: ProjectId) -> EngineResult<Project> {
        Ok(self.registry.get_project_by_id(project_id).await?)
    }

    pub async fn find_projects(&self, name: Option<String>, page_size: u64, offset: u64) -> EngineResult<ProjectSearchResult> {
        Ok(self.registry.find_projects(name, page_size, offset).await?)
    }

    pub async fn list_investments(&self, project_id: ProjectId) -> EngineResult<Vec<Investment>> {
        Ok(self.registry.list_investments(project_id).await?)
    }

    /// 使用当前时间投资
    pub async fn invest(&self, project_id: ProjectId, investor: Address, amount: Amount) -> EngineResult<InvestmentRecord> {
        let now = self.clock.now();
        self.invest_at(project_id, investor, amount, now).await
    }

    /// 在 `now` 这个时间点投资
    ///
    /// 投资人需要提前把不少于 `amount` 的额度授权给托管账户，否则返回
    /// [`EngineError::TransferRejected`]，调用方增加授权后重新发起即可，引擎不会自动重试。
    pub async fn invest_at(
        &self,
        project_id: ProjectId,
        investor: Address,
        amount: Amount,
        now: Timestamp,
    ) -> EngineResult<InvestmentRecord> {
        debug!(
            "💰 投资请求 - 项目: {}, 投资人: {}, 金额: {}, 时间: {}",
            project_id, investor, amount, now
        );

        // 项目不存在时不需要加锁，直接交给校验器给出拒绝原因
        let _guard = match self.registry.find_project(project_id).await? {
            Some(_) => Some(self.project_lock(project_id).lock_owned().await),
            None => None,
        };

        // 持锁之后重新读取，保证看到的是最新的 total_raised
        let project = self.registry.find_project(project_id).await?;
        if let Err(rejection) = validate_investment(project.as_ref(), project_id, &investor, amount, now) {
            warn!("⚠️ 投资被拒绝 - 项目: {}, 投资人: {}, 原因: {}", project_id, investor, rejection);
            return Err(rejection.into());
        }

        if let Err(err) = self.ledger.transfer_from(&investor, &self.custody, amount).await {
            warn!("⚠️ 转账被拒绝 - 项目: {}, 投资人: {}, 原因: {}", project_id, investor, err);
            return Err(EngineError::TransferRejected(err));
        }

        let investment = Investment {
            investor,
            project_id,
            amount,
            timestamp: now,
        };

        let updated = match self.registry.record_investment(investment.clone()).await {
            Ok(project) => project,
            Err(err) => {
                error!("❌ 项目 {} 记账失败，退回投资款: {}", project_id, err);
                self.refund(&investment).await;
                return Err(err.into());
            }
        };

        info!(
            "✅ 投资成功 - 项目: {}, 投资人: {}, 金额: {}, 已募集: {}/{}",
            project_id, investment.investor, amount, updated.total_raised, updated.fund_target
        );

        self.emit(DomainEvent::InvestmentMade {
            investor: investment.investor.clone(),
            project_id,
            amount,
        })
        .await;

        Ok(InvestmentRecord {
            investment,
            total_raised: updated.total_raised,
            fund_target: updated.fund_target,
        })
    }

    fn project_lock(&self, project_id: ProjectId) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.project_locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(project_id).or_default())
    }

    /// 记账失败后的补偿：托管账户把钱退回给投资人
    async fn refund(&self, investment: &Investment) {
        if let Err(err) = self
            .ledger
            .transfer(&self.custody, &investment.investor, investment.amount)
            .await
        {
            error!(
                "❌ 退款失败，需要人工处理 - 项目: {}, 投资人: {}, 金额: {}, 原因: {}",
                investment.project_id, investment.investor, investment.amount, err
            );
        }
    }

    /// 发布失败只记录日志，不影响已经完成的状态变更
    async fn emit(&self, event: DomainEvent) {
        if let Err(err) = self.events.publish(&event).await {
            warn!("⚠️ 事件 {} 发布失败: {}", event.name(), err);
        }
    }
}

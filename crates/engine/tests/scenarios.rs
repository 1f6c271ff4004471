//! 投资流程端到端测试：内存仓库 + 内存账本 + 手动时钟

use database::{MemoryProjectRepository, ProjectCreate};
use engine::{EngineError, InvestmentEngine, ManualClock, MemoryTokenLedger, Rejection, TokenLedger};
use shared_lib::{Address, DomainEvent, EventLog, EventSink, Timestamp, SECONDS_PER_DAY, SECONDS_PER_HOUR};
use std::sync::Arc;

const NOW: Timestamp = 1_700_000_000;

struct Fixture {
    engine: Arc<InvestmentEngine<MemoryProjectRepository, MemoryTokenLedger>>,
    ledger: Arc<MemoryTokenLedger>,
    clock: Arc<ManualClock>,
    events: Arc<EventLog>,
    owner: Address,
    custody: Address,
    treasury: Address,
}

impl Fixture {
    fn new() -> Self {
        let treasury = Address::new("0xtreasury");
        let custody = Address::new("0xcustody");
        let ledger = Arc::new(MemoryTokenLedger::new("P2P Test Token", "P2PTTK", &treasury, 10_000));
        let clock = Arc::new(ManualClock::new(NOW));
        let events = Arc::new(EventLog::new());

        let engine = InvestmentEngine::new(MemoryProjectRepository::new(), Arc::clone(&ledger), custody.clone())
            .with_events(Arc::clone(&events) as Arc<dyn EventSink>)
            .with_clock(Arc::clone(&clock) as Arc<dyn engine::Clock>);

        Self {
            engine: Arc::new(engine),
            ledger,
            clock,
            events,
            owner: Address::new("0xowner"),
            custody,
            treasury,
        }
    }

    fn project(&self) -> ProjectCreate {
        ProjectCreate {
            owner: self.owner.clone(),
            name: "community solar".to_string(),
            fund_start_time: NOW + SECONDS_PER_DAY,
            fund_end_time: NOW + 7 * SECONDS_PER_DAY,
            debt_annual_interest_rate: 5,
            debt_repayment_time: NOW + 365 * SECONDS_PER_DAY,
            fund_target: 500,
        }
    }

    /// 从发行账户领取代币并授权给托管账户
    async fn fund_investor(&self, investor: &Address, balance: u64, approval: u64) {
        self.ledger.transfer(&self.treasury, investor, balance).await.unwrap();
        self.ledger.approve(investor, &self.custody, approval).await.unwrap();
    }

    fn open_window(&self) {
        self.clock.set(NOW + SECONDS_PER_DAY + SECONDS_PER_HOUR);
    }
}

#[tokio::test]
async fn test_create_project_assigns_ids_and_emits() {
    let fx = Fixture::new();

    let first = fx.engine.create_project(fx.project()).await.unwrap();
    let second = fx.engine.create_project(fx.project()).await.unwrap();

    assert_eq!(first.id, 1);
    assert_eq!(second.id, 2);
    assert_eq!(first.total_raised, 0);
    assert_eq!(first.debt_annual_interest_rate, 500);
    assert_eq!(
        fx.events.events().await,
        vec![
            DomainEvent::ProjectCreated { project_id: 1 },
            DomainEvent::ProjectCreated { project_id: 2 }
        ]
    );
}

#[tokio::test]
async fn test_create_project_rejects_bad_schedule() {
    let fx = Fixture::new();
    let mut project = fx.project();
    project.fund_end_time = project.fund_start_time;

    let err = fx.engine.create_project(project).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidProjectParameters(_)));
    assert!(fx.events.is_empty().await);
}

#[tokio::test]
async fn test_successful_investment() {
    let fx = Fixture::new();
    let investor = Address::new("0xinvestor1");
    fx.engine.create_project(fx.project()).await.unwrap();
    fx.fund_investor(&investor, 100, 50).await;
    fx.open_window();

    let record = fx.engine.invest(1, investor.clone(), 50).await.unwrap();

    assert_eq!(record.total_raised, 50);
    assert_eq!(record.fund_target, 500);
    assert_eq!(record.investment.timestamp, NOW + SECONDS_PER_DAY + SECONDS_PER_HOUR);
    assert_eq!(fx.ledger.balance_of(&investor).await, 50);
    assert_eq!(fx.ledger.balance_of(&fx.custody).await, 50);
    assert_eq!(fx.engine.get_project(1).await.unwrap().total_raised, 50);
    assert_eq!(fx.engine.list_investments(1).await.unwrap(), vec![record.investment]);
    assert_eq!(
        fx.events.events().await.last(),
        Some(&DomainEvent::InvestmentMade {
            investor,
            project_id: 1,
            amount: 50
        })
    );
}

#[tokio::test]
async fn test_insufficient_allowance_is_atomic() {
    let fx = Fixture::new();
    let investor = Address::new("0xinvestor1");
    fx.engine.create_project(fx.project()).await.unwrap();
    fx.fund_investor(&investor, 100, 50).await;
    fx.open_window();

    let err = fx.engine.invest(1, investor.clone(), 60).await.unwrap_err();
    assert!(matches!(err, EngineError::TransferRejected(_)));
    assert_eq!(err.kind(), "TransferRejected");

    assert_eq!(fx.engine.get_project(1).await.unwrap().total_raised, 0);
    assert!(fx.engine.list_investments(1).await.unwrap().is_empty());
    assert_eq!(fx.ledger.balance_of(&investor).await, 100);
    assert_eq!(fx.events.len().await, 1);

    // 提高授权后重试成功
    fx.ledger.approve(&investor, &fx.custody, 60).await.unwrap();
    let record = fx.engine.invest(1, investor, 60).await.unwrap();
    assert_eq!(record.total_raised, 60);
}

#[tokio::test]
async fn test_owner_cannot_invest() {
    let fx = Fixture::new();
    fx.engine.create_project(fx.project()).await.unwrap();
    fx.fund_investor(&fx.owner, 100, 100).await;
    fx.open_window();

    let err = fx.engine.invest(1, fx.owner.clone(), 10).await.unwrap_err();
    assert_eq!(
        err.rejection(),
        Some(&Rejection::OwnerCannotInvest {
            project_id: 1,
            owner: fx.owner.clone()
        })
    );
    assert_eq!(fx.ledger.balance_of(&fx.owner).await, 100);
}

#[tokio::test]
async fn test_fundraising_window() {
    let fx = Fixture::new();
    let investor = Address::new("0xinvestor1");
    let project = fx.engine.create_project(fx.project()).await.unwrap();
    fx.fund_investor(&investor, 100, 100).await;

    let err = fx.engine.invest(1, investor.clone(), 10).await.unwrap_err();
    assert_eq!(err.kind(), "FundraisingNotStarted");

    // 开始和结束时间点都可以投资
    fx.engine
        .invest_at(1, investor.clone(), 10, project.fund_start_time)
        .await
        .unwrap();
    fx.engine
        .invest_at(1, investor.clone(), 10, project.fund_end_time)
        .await
        .unwrap();

    fx.clock.set(project.fund_end_time + 1);
    let err = fx.engine.invest(1, investor, 10).await.unwrap_err();
    assert_eq!(err.kind(), "FundraisingClosed");
    assert_eq!(fx.engine.get_project(1).await.unwrap().total_raised, 20);
}

#[tokio::test]
async fn test_fund_target_is_a_hard_cap() {
    let fx = Fixture::new();
    let investor = Address::new("0xinvestor1");
    fx.engine.create_project(fx.project()).await.unwrap();
    fx.fund_investor(&investor, 1_000, 1_000).await;
    fx.open_window();

    fx.engine.invest(1, investor.clone(), 450).await.unwrap();
    let err = fx.engine.invest(1, investor.clone(), 51).await.unwrap_err();
    assert_eq!(err.kind(), "FundTargetExceeded");

    // 达到目标之后窗口依然开放，但已经没有剩余额度
    let record = fx.engine.invest(1, investor.clone(), 50).await.unwrap();
    assert_eq!(record.total_raised, 500);
    let err = fx.engine.invest(1, investor.clone(), 1).await.unwrap_err();
    assert_eq!(err.kind(), "FundTargetExceeded");

    assert_eq!(fx.ledger.balance_of(&investor).await, 500);
}

#[tokio::test]
async fn test_unknown_project_and_zero_investor() {
    let fx = Fixture::new();

    let err = fx.engine.invest(7, Address::new("0xinvestor1"), 10).await.unwrap_err();
    assert_eq!(err.rejection(), Some(&Rejection::ProjectNotFound(7)));

    let err = fx.engine.invest(7, Address::zero(), 10).await.unwrap_err();
    assert_eq!(err.rejection(), Some(&Rejection::ZeroAddressActor));

    let err = fx.engine.get_project(7).await.unwrap_err();
    assert_eq!(err.kind(), "ProjectNotFound");
}

#[tokio::test]
async fn test_zero_amount_rejected() {
    let fx = Fixture::new();
    let investor = Address::new("0xinvestor1");
    fx.engine.create_project(fx.project()).await.unwrap();
    fx.fund_investor(&investor, 100, 100).await;
    fx.open_window();

    let err = fx.engine.invest(1, investor, 0).await.unwrap_err();
    assert_eq!(err.kind(), "InvalidAmount");
    assert!(fx.engine.list_investments(1).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_concurrent_investments_never_exceed_target() {
    let fx = Fixture::new();
    fx.engine.create_project(fx.project()).await.unwrap();
    fx.open_window();

    // 20 个投资人各投 40，目标 500，最多只能成功 12 笔
    let mut investors = Vec::new();
    for i in 0..20 {
        let investor = Address::new(format!("0xinvestor{i}"));
        fx.fund_investor(&investor, 40, 40).await;
        investors.push(investor);
    }

    let handles = investors.into_iter().map(|investor| {
        let engine = Arc::clone(&fx.engine);
        tokio::spawn(async move { engine.invest(1, investor, 40).await })
    });
    let results = futures::future::join_all(handles).await;

    let succeeded = results
        .into_iter()
        .map(|joined| joined.unwrap())
        .filter(|result| result.is_ok())
        .count();

    assert_eq!(succeeded, 12);
    let project = fx.engine.get_project(1).await.unwrap();
    assert_eq!(project.total_raised, 480);
    assert_eq!(fx.ledger.balance_of(&fx.custody).await, 480);
    assert_eq!(fx.engine.list_investments(1).await.unwrap().len(), 12);
}

#[tokio::test]
async fn test_total_matches_investment_history() {
    let fx = Fixture::new();
    fx.engine.create_project(fx.project()).await.unwrap();
    fx.open_window();

    let alice = Address::new("0xalice");
    let bob = Address::new("0xbob");
    fx.fund_investor(&alice, 200, 200).await;
    fx.fund_investor(&bob, 200, 200).await;

    fx.engine.invest(1, alice.clone(), 120).await.unwrap();
    fx.engine.invest(1, bob.clone(), 80).await.unwrap();
    fx.engine.invest(1, alice, 30).await.unwrap();

    let history = fx.engine.list_investments(1).await.unwrap();
    let sum: u64 = history.iter().map(|investment| investment.amount).sum();
    assert_eq!(sum, fx.engine.get_project(1).await.unwrap().total_raised);
    assert_eq!(history.iter().map(|i| i.amount).collect::<Vec<_>>(), vec![120, 80, 30]);
}

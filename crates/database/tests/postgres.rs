//! PostgreSQL 仓库测试
//!
//! 需要可用的数据库，通过 `DATABASE_URL` 指定，默认不执行：
//! `DATABASE_URL=postgres://... cargo test -p database -- --ignored`

use database::{initialize_database, DatabaseError, Investment, ProjectCreate, ProjectRepository, ProjectRepositoryTrait};
use shared_lib::{Address, ProjectId, SECONDS_PER_DAY};

async fn repository() -> ProjectRepository {
    let conn_str = std::env::var("DATABASE_URL").expect("DATABASE_URL must point to a test database");
    let pool = initialize_database(&conn_str).await.unwrap();
    ProjectRepository::new(pool)
}

fn project_create(fund_target: u64) -> ProjectCreate {
    ProjectCreate {
        owner: Address::new("0xowner"),
        name: "postgres solar".to_string(),
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
#[ignore]
async fn test_record_investment_guarded_update() {
    let repo = repository().await;
    let project = repo.create_project(project_create(100)).await.unwrap();
    assert_eq!(project.debt_annual_interest_rate, 800);

    let updated = repo.record_investment(investment(project.id, 60)).await.unwrap();
    assert_eq!(updated.total_raised, 60);

    let err = repo.record_investment(investment(project.id, 50)).await.unwrap_err();
    assert!(matches!(
        err,
        DatabaseError::FundTargetExceeded {
            total_raised: 60,
            amount: 50,
            fund_target: 100,
            ..
        }
    ));

    // 回滚之后总额和投资记录都不变
    assert_eq!(repo.get_project_by_id(project.id).await.unwrap().total_raised, 60);
    let investments = repo.list_investments(project.id).await.unwrap();
    assert_eq!(investments.len(), 1);
    assert_eq!(investments[0].amount, 60);

    let updated = repo.record_investment(investment(project.id, 40)).await.unwrap();
    assert_eq!(updated.total_raised, 100);
}

#[tokio::test]
#[ignore]
async fn test_record_investment_unknown_project_or_zero_amount() {
    let repo = repository().await;
    let project = repo.create_project(project_create(100)).await.unwrap();

    let missing = project.id + 1_000_000;
    assert!(matches!(
        repo.record_investment(investment(missing, 10)).await,
        Err(DatabaseError::ProjectNotFound(id)) if id == missing
    ));
    assert!(matches!(
        repo.record_investment(investment(project.id, 0)).await,
        Err(DatabaseError::InvalidInvestment(_))
    ));
    assert!(repo.list_investments(project.id).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore]
async fn test_concurrent_records_never_exceed_target() {
    let repo = repository().await;
    let project = repo.create_project(project_create(100)).await.unwrap();

    let handles: Vec<_> = (0..12)
        .map(|_| {
            let repo = repo.clone();
            tokio::spawn(async move { repo.record_investment(investment(project.id, 20)).await })
        })
        .collect();

    let mut accepted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(err) => assert!(matches!(err, DatabaseError::FundTargetExceeded { .. }), "{err}"),
        }
    }

    assert_eq!(accepted, 5);
    assert_eq!(repo.get_project_by_id(project.id).await.unwrap().total_raised, 100);
    assert_eq!(repo.list_investments(project.id).await.unwrap().len(), 5);
}

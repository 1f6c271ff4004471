//! PostgreSQL项目仓库
//!
//! 负责项目登记的数据库操作

use crate::models::project::{Investment, Project, ProjectCreate, ProjectSearchResult};
use crate::repositories::traits::ProjectRepositoryTrait;
use crate::{DatabaseError, DatabaseResult};
use shared_lib::{Address, ProjectId};
use sqlx::{FromRow, PgPool};
use tracing::debug;

/// 项目表的一行数据
///
/// 数据库里统一使用 BIGINT，读出来之后再转换为无符号类型
#[derive(Debug, FromRow)]
struct ProjectRow {
    id: i64,
    project_name: String,
    owner: String,
    fund_start_time: i64,
    fund_end_time: i64,
    debt_annual_interest_rate: i64,
    debt_repayment_time: i64,
    fund_target: i64,
    total_raised: i64,
}

#[derive(Debug, FromRow)]
struct ProjectPageRow {
    #[sqlx(flatten)]
    project: ProjectRow,
    total_count: i64,
}

#[derive(Debug, FromRow)]
struct InvestmentRow {
    project_id: i64,
    investor: String,
    amount: i64,
    invested_at: i64,
}

fn to_unsigned(value: i64, field: &str) -> DatabaseResult<u64> {
    u64::try_from(value).map_err(|_| DatabaseError::out_of_range(format!("{field} = {value}")))
}

fn to_db(value: u64, field: &str) -> DatabaseResult<i64> {
    i64::try_from(value).map_err(|_| DatabaseError::out_of_range(format!("{field} = {value}")))
}

impl TryFrom<ProjectRow> for Project {
    type Error = DatabaseError;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        Ok(Project {
            id: to_unsigned(row.id, "id")?,
            name: row.project_name,
            owner: Address::new(row.owner),
            fund_start_time: row.fund_start_time,
            fund_end_time: row.fund_end_time,
            debt_annual_interest_rate: to_unsigned(row.debt_annual_interest_rate, "debt_annual_interest_rate")?,
            debt_repayment_time: row.debt_repayment_time,
            fund_target: to_unsigned(row.fund_target, "fund_target")?,
            total_raised: to_unsigned(row.total_raised, "total_raised")?,
        })
    }
}

impl TryFrom<InvestmentRow> for Investment {
    type Error = DatabaseError;

    fn try_from(row: InvestmentRow) -> Result<Self, Self::Error> {
        Ok(Investment {
            investor: Address::new(row.investor),
            project_id: to_unsigned(row.project_id, "project_id")?,
            amount: to_unsigned(row.amount, "amount")?,
            timestamp: row.invested_at,
        })
    }
}

const PROJECT_COLUMNS: &str = "id, project_name, owner, fund_start_time, fund_end_time, \
     debt_annual_interest_rate, debt_repayment_time, fund_target, total_raised";

/// 项目仓库结构体
#[derive(Debug, Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    /// 创建新的项目仓库实例
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ProjectRepositoryTrait for ProjectRepository {
    /// 创建新项目
    ///
    /// ID由 `BIGSERIAL` 分配，从1开始递增。序列值不会回滚，因此即使插入失败，
    /// 已经分配过的ID也不会被再次使用。
    async fn create_project(&self, project: ProjectCreate) -> DatabaseResult<Project> {
        debug!("📝 创建项目: {:#?}", project);
        project.validate()?;

        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            r#"
            INSERT INTO fund.projects (project_name, owner, fund_start_time, fund_end_time,
                                       debt_annual_interest_rate, debt_repayment_time, fund_target)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PROJECT_COLUMNS};
            "#
        ))
        .bind(&project.name)
        .bind(project.owner.as_str())
        .bind(project.fund_start_time)
        .bind(project.fund_end_time)
        .bind(to_db(project.stored_interest_rate(), "debt_annual_interest_rate")?)
        .bind(project.debt_repayment_time)
        .bind(to_db(project.fund_target, "fund_target")?)
        .fetch_one(&self.pool)
        .await?;

        let project = Project::try_from(row)?;
        debug!("✅ 项目创建成功: {}", project.id);
        Ok(project)
    }

    async fn find_project(&self, id: ProjectId) -> DatabaseResult<Option<Project>> {
        debug!("🔍 根据 ID 获取项目: {}", id);

        // 超出BIGINT范围的ID一定不存在
        let Ok(id) = i64::try_from(id) else {
            return Ok(None);
        };

        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM fund.projects WHERE id = $1 LIMIT 1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Project::try_from).transpose()
    }

    /// 根据查询参数搜索项目
    ///
    /// # SQL 查询说明
    ///
    /// 使用 CTE 在一次查询里拿到分页数据和总数：
    /// 1. `COUNT(*) OVER ()` 窗口函数在 LIMIT 之前计算，得到过滤后的总记录数
    /// 2. 使用 `COALESCE` 函数处理可选的名称参数
    ///
    /// 偏移量超过结果数量时没有数据行，返回的总数为0
    async fn find_projects(&self, project_name: Option<String>, page_size: u64, offset: u64) -> DatabaseResult<ProjectSearchResult> {
        debug!(
            "🔍 搜索项目 - 名称: {:?}, 页面大小: {}, 偏移量: {}",
            project_name, page_size, offset
        );

        let like_param = project_name.as_ref().map(|n| format!("%{n}%"));

        let rows = sqlx::query_as::<_, ProjectPageRow>(&format!(
            r#"
            WITH filtered_projects AS (
                SELECT {PROJECT_COLUMNS},
                       COUNT(*) OVER () AS total_count
                FROM fund.projects
                WHERE (COALESCE($1, '') = '' OR project_name LIKE $2)
                ORDER BY id
                LIMIT $3 OFFSET $4
            )
            SELECT * FROM filtered_projects;
            "#
        ))
        .bind(project_name)
        .bind(like_param)
        .bind(to_db(page_size, "page_size")?)
        .bind(to_db(offset, "offset")?)
        .fetch_all(&self.pool)
        .await?;

        let total = match rows.first() {
            Some(row) => to_unsigned(row.total_count, "total_count")?,
            None => 0,
        };

        let projects = rows
            .into_iter()
            .map(|row| Project::try_from(row.project))
            .collect::<DatabaseResult<Vec<_>>>()?;

        debug!("✅ 搜索完成 - 找到 {} 个项目，总计 {} 个", projects.len(), total);
        Ok(ProjectSearchResult { projects, total })
    }

    /// 记录一笔投资
    ///
    /// 在同一个事务中完成：
    /// 1. 带条件的 `UPDATE`，只有 `total_raised + amount <= fund_target` 时才会更新
    /// 2. 写入投资记录
    ///
    /// 更新不到数据时再查一次，区分项目不存在和超过目标两种情况，然后回滚。
    async fn record_investment(&self, investment: Investment) -> DatabaseResult<Project> {
        debug!("💰 记录投资: {:?}", investment);

        if investment.amount == 0 {
            return Err(DatabaseError::InvalidInvestment("amount must be positive".to_string()));
        }

        let project_id = to_db(investment.project_id, "project_id")?;
        let amount = to_db(investment.amount, "amount")?;

        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, ProjectRow>(&format!(
            r#"
            UPDATE fund.projects
            SET total_raised = total_raised + $2
            WHERE id = $1
              AND total_raised + $2 <= fund_target
            RETURNING {PROJECT_COLUMNS};
            "#
        ))
        .bind(project_id)
        .bind(amount)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = updated else {
            let current = sqlx::query_as::<_, ProjectRow>(&format!(
                "SELECT {PROJECT_COLUMNS} FROM fund.projects WHERE id = $1"
            ))
            .bind(project_id)
            .fetch_optional(&mut *tx)
            .await?;
            tx.rollback().await?;

            return Err(match current {
                None => DatabaseError::ProjectNotFound(investment.project_id),
                Some(row) => {
                    let project = Project::try_from(row)?;
                    DatabaseError::FundTargetExceeded {
                        project_id: project.id,
                        total_raised: project.total_raised,
                        amount: investment.amount,
                        fund_target: project.fund_target,
                    }
                }
            });
        };

        sqlx::query(
            r#"
            INSERT INTO fund.investments (project_id, investor, amount, invested_at)
            VALUES ($1, $2, $3, $4);
            "#,
        )
        .bind(project_id)
        .bind(investment.investor.as_str())
        .bind(amount)
        .bind(investment.timestamp)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let project = Project::try_from(row)?;
        debug!("✅ 投资记录成功，项目 {} 已募集 {}", project.id, project.total_raised);
        Ok(project)
    }

    async fn list_investments(&self, id: ProjectId) -> DatabaseResult<Vec<Investment>> {
        if self.find_project(id).await?.is_none() {
            return Err(DatabaseError::ProjectNotFound(id));
        }

        let rows = sqlx::query_as::<_, InvestmentRow>(
            r#"
            SELECT project_id, investor, amount, invested_at
            FROM fund.investments
            WHERE project_id = $1
            ORDER BY id;
            "#,
        )
        .bind(to_db(id, "project_id")?)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Investment::try_from).collect()
    }
}

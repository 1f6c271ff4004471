//! 投资校验
//!
//! 纯函数，没有副作用，可以重复调用。检查按固定顺序进行，第一个失败的检查决定拒绝原因：
//!
//! 1. 投资人不能是空身份 → [`Rejection::ZeroAddressActor`]
//! 2. 项目必须存在 → [`Rejection::ProjectNotFound`]
//! 3. 投资人不能是项目发起人 → [`Rejection::OwnerCannotInvest`]
//! 4. 募资尚未开始 → [`Rejection::FundraisingNotStarted`]
//! 5. 募资已经结束 → [`Rejection::FundraisingClosed`]
//! 6. 超过募资目标 → [`Rejection::FundTargetExceeded`]
//! 7. 金额为0 → [`Rejection::InvalidAmount`]
//!
//! 顺序是对外约定：身份问题先于时间问题报告，不存在的项目先于任何业务规则报告。

use database::Project;
use shared_lib::{Address, Amount, ProjectId, Timestamp};
use thiserror::Error;

/// 拒绝原因
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("investor must not be the zero address")]
    ZeroAddressActor,

    #[error("project {0} not found")]
    ProjectNotFound(ProjectId),

    #[error("owner {owner} cannot invest in own project {project_id}")]
    OwnerCannotInvest { project_id: ProjectId, owner: Address },

    #[error("fundraising of project {project_id} starts at {fund_start_time}, now is {now}")]
    FundraisingNotStarted {
        project_id: ProjectId,
        now: Timestamp,
        fund_start_time: Timestamp,
    },

    #[error("fundraising of project {project_id} closed at {fund_end_time}, now is {now}")]
    FundraisingClosed {
        project_id: ProjectId,
        now: Timestamp,
        fund_end_time: Timestamp,
    },

    #[error("project {project_id} has raised {total_raised}, investing {amount} would exceed the target {fund_target}")]
    FundTargetExceeded {
        project_id: ProjectId,
        total_raised: Amount,
        amount: Amount,
        fund_target: Amount,
    },

    #[error("investment amount must be positive")]
    InvalidAmount,
}

impl Rejection {
    /// 错误类型名称，对外接口用它区分错误
    pub fn kind(&self) -> &'static str {
        match self {
            Rejection::ZeroAddressActor => "ZeroAddressActor",
            Rejection::ProjectNotFound(_) => "ProjectNotFound",
            Rejection::OwnerCannotInvest { .. } => "OwnerCannotInvest",
            Rejection::FundraisingNotStarted { .. } => "FundraisingNotStarted",
            Rejection::FundraisingClosed { .. } => "FundraisingClosed",
            Rejection::FundTargetExceeded { .. } => "FundTargetExceeded",
            Rejection::InvalidAmount => "InvalidAmount",
        }
    }
}

/// 校验通过
///
/// 只是一个决定，不附带任何后续义务
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Acceptance {
    /// 记账之后项目的募资总额
    pub new_total: Amount,
}

/// 校验一笔投资
///
/// `project` 为 `None` 表示 `project_id` 对应的项目不存在。
pub fn validate_investment(
    project: Option<&Project>,
    project_id: ProjectId,
    investor: &Address,
    amount: Amount,
    now: Timestamp,
) -> Result<Acceptance, Rejection> {
    if investor.is_zero() {
        return Err(Rejection::ZeroAddressActor);
    }

    let project = project.ok_or(Rejection::ProjectNotFound(project_id))?;

    if *investor == project.owner {
        return Err(Rejection::OwnerCannotInvest {
            project_id: project.id,
            owner: project.owner.clone(),
        });
    }

    if now < project.fund_start_time {
        return Err(Rejection::FundraisingNotStarted {
            project_id: project.id,
            now,
            fund_start_time: project.fund_start_time,
        });
    }

    if now > project.fund_end_time {
        return Err(Rejection::FundraisingClosed {
            project_id: project.id,
            now,
            fund_end_time: project.fund_end_time,
        });
    }

    // 溢出同样视为超过目标
    let new_total = project
        .total_raised
        .checked_add(amount)
        .filter(|total| *total <= project.fund_target)
        .ok_or(Rejection::FundTargetExceeded {
            project_id: project.id,
            total_raised: project.total_raised,
            amount,
            fund_target: project.fund_target,
        })?;

    if amount == 0 {
        return Err(Rejection::InvalidAmount);
    }

    Ok(Acceptance { new_total })
}

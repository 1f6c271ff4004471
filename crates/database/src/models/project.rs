//! 项目数据模型
//!
//! 定义项目、投资记录以及创建参数

use crate::{DatabaseError, DatabaseResult};
use shared_lib::{Address, Amount, ProjectId, Timestamp};

/// 对外查询接口的固定顺序元组
///
/// 顺序：`(id, name, owner, fund_start_time, fund_end_time, debt_annual_interest_rate*100,
/// debt_repayment_time, fund_target, total_raised)`，已有调用方依赖这个顺序，不能调整。
pub type ProjectTuple = (ProjectId, String, Address, Timestamp, Timestamp, u64, Timestamp, Amount, Amount);

/// 募资项目
///
/// 创建之后只有 `total_raised` 会变化，并且只会因为成功的投资而增加。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub owner: Address,
    pub fund_start_time: Timestamp,
    pub fund_end_time: Timestamp,
    /// 年化利率，单位为万分之一（提交的百分比 * 100）
    pub debt_annual_interest_rate: u64,
    pub debt_repayment_time: Timestamp,
    pub fund_target: Amount,
    pub total_raised: Amount,
}

impl Project {
    pub fn as_tuple(&self) -> ProjectTuple {
        (
            self.id,
            self.name.clone(),
            self.owner.clone(),
            self.fund_start_time,
            self.fund_end_time,
            self.debt_annual_interest_rate,
            self.debt_repayment_time,
            self.fund_target,
            self.total_raised,
        )
    }

    /// 距离募资目标还差多少
    pub fn remaining(&self) -> Amount {
        self.fund_target.saturating_sub(self.total_raised)
    }

    /// `now` 是否在募资窗口内（两端都包含）
    pub fn is_funding_open(&self, now: Timestamp) -> bool {
        self.fund_start_time <= now && now <= self.fund_end_time
    }
}

/// 一笔投资记录，创建后不可变
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Investment {
    pub investor: Address,
    pub project_id: ProjectId,
    pub amount: Amount,
    pub timestamp: Timestamp,
}

/// 项目搜索结果
#[derive(Debug, Clone)]
pub struct ProjectSearchResult {
    pub projects: Vec<Project>,
    pub total: u64,
}

/// 项目创建参数
#[derive(Debug, Clone)]
pub struct ProjectCreate {
    pub owner: Address,
    pub name: String,
    pub fund_start_time: Timestamp,
    pub fund_end_time: Timestamp,
    /// 年化利率（整数百分比），保存时会乘以100
    pub debt_annual_interest_rate: u32,
    pub debt_repayment_time: Timestamp,
    pub fund_target: Amount,
}

impl ProjectCreate {
    /// 检查创建参数，返回第一个不满足的条件
    pub fn validate(&self) -> DatabaseResult<()> {
        if self.owner.is_zero() {
            return Err(DatabaseError::invalid_params("owner must not be the zero address"));
        }
        if self.name.trim().is_empty() {
            return Err(DatabaseError::invalid_params("name must not be empty"));
        }
        if self.fund_start_time >= self.fund_end_time {
            return Err(DatabaseError::invalid_params(format!(
                "fund_start_time ({}) must be before fund_end_time ({})",
                self.fund_start_time, self.fund_end_time
            )));
        }
        if self.fund_end_time >= self.debt_repayment_time {
            return Err(DatabaseError::invalid_params(format!(
                "fund_end_time ({}) must be before debt_repayment_time ({})",
                self.fund_end_time, self.debt_repayment_time
            )));
        }
        if self.fund_target == 0 {
            return Err(DatabaseError::invalid_params("fund_target must be positive"));
        }

        Ok(())
    }

    /// 保存到库里的利率，u32 * 100 一定放得进 u64
    pub fn stored_interest_rate(&self) -> u64 {
        u64::from(self.debt_annual_interest_rate) * 100
    }

    /// 生成ID为 `id`、尚未募资的项目
    pub fn into_project(self, id: ProjectId) -> Project {
        Project {
            id,
            debt_annual_interest_rate: self.stored_interest_rate(),
            name: self.name,
            owner: self.owner,
            fund_start_time: self.fund_start_time,
            fund_end_time: self.fund_end_time,
            debt_repayment_time: self.debt_repayment_time,
            fund_target: self.fund_target,
            total_raised: 0,
        }
    }
}

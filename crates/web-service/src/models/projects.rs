use crate::models::common::PageQuery;
use database::Project;
use serde::{Deserialize, Serialize};
use shared_lib::Address;
use utoipa::ToSchema;
use validator::Validate;

/// 搜索项目列表信息
///
/// - `project_name`为可选参数
#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct ProjectSearch {
    #[schema(example = "solar")]
    #[validate(length(min = 1, max = 100))]
    /// 查询的项目名称（包含匹配，区分大小写）
    pub project_name: Option<String>,

    /// 查询分页信息
    #[validate(nested)]
    pub page_query: PageQuery,
}

/// 新建项目参数
///
/// 时间都是 unix 时间戳（秒），需要满足 `fund_start_time < fund_end_time < debt_repayment_time`。
#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct ProjectCreate {
    #[schema(example = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8")]
    /// 项目发起人账户
    #[validate(length(min = 1))]
    pub owner: String,

    #[schema(example = "community solar")]
    /// 新建项目名称
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[schema(example = 1_700_086_400)]
    pub fund_start_time: i64,

    #[schema(example = 1_700_604_800)]
    pub fund_end_time: i64,

    #[schema(example = 5)]
    /// 年化利率（整数百分比）
    pub debt_annual_interest_rate: u32,

    #[schema(example = 1_731_536_000)]
    pub debt_repayment_time: i64,

    #[schema(example = 500)]
    /// 募资目标
    pub fund_target: u64,
}

impl From<ProjectCreate> for database::ProjectCreate {
    fn from(project: ProjectCreate) -> Self {
        Self {
            owner: Address::new(project.owner),
            name: project.name,
            fund_start_time: project.fund_start_time,
            fund_end_time: project.fund_end_time,
            debt_annual_interest_rate: project.debt_annual_interest_rate,
            debt_repayment_time: project.debt_repayment_time,
            fund_target: project.fund_target,
        }
    }
}

/// 项目信息
///
/// 字段顺序和对外查询元组一致，不能调整。
#[derive(Deserialize, Debug, ToSchema, Serialize)]
pub struct ProjectInfo {
    #[schema(example = 1)]
    /// 项目ID
    pub id: u64,

    #[schema(example = "community solar")]
    /// 项目名称
    pub name: String,

    #[schema(example = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8")]
    pub owner: String,

    pub fund_start_time: i64,

    pub fund_end_time: i64,

    #[schema(example = 500)]
    /// 年化利率，单位为万分之一
    pub debt_annual_interest_rate: u64,

    pub debt_repayment_time: i64,

    #[schema(example = 500)]
    pub fund_target: u64,

    #[schema(example = 50)]
    /// 已募集金额
    pub total_raised: u64,
}

impl From<Project> for ProjectInfo {
    fn from(project: Project) -> Self {
        let (
            id,
            name,
            owner,
            fund_start_time,
            fund_end_time,
            debt_annual_interest_rate,
            debt_repayment_time,
            fund_target,
            total_raised,
        ) = project.as_tuple();

        Self {
            id,
            name,
            owner: owner.into(),
            fund_start_time,
            fund_end_time,
            debt_annual_interest_rate,
            debt_repayment_time,
            fund_target,
            total_raised,
        }
    }
}

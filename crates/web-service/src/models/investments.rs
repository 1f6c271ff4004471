use database::Investment;
use engine::InvestmentRecord;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 投资参数
///
/// 投资前需要先通过 `/ledger/approvals` 把不少于 `amount` 的额度授权给托管账户。
#[derive(Deserialize, Debug, ToSchema)]
pub struct InvestRequest {
    #[schema(example = "0x3c44cdddb6a900fa2b585dd299e03d12fa4293bc")]
    /// 投资人账户，空账户会被拒绝
    pub investor: String,

    #[schema(example = 50)]
    pub amount: u64,
}

/// 投资记录
#[derive(Deserialize, Debug, ToSchema, Serialize)]
pub struct InvestmentInfo {
    pub investor: String,

    #[schema(example = 1)]
    pub project_id: u64,

    #[schema(example = 50)]
    pub amount: u64,

    /// 投资被接受的时间
    pub timestamp: i64,
}

impl From<Investment> for InvestmentInfo {
    fn from(investment: Investment) -> Self {
        Self {
            investor: investment.investor.into(),
            project_id: investment.project_id,
            amount: investment.amount,
            timestamp: investment.timestamp,
        }
    }
}

/// 投资结果
#[derive(Deserialize, Debug, ToSchema, Serialize)]
pub struct InvestmentReceipt {
    pub investment: InvestmentInfo,

    #[schema(example = 50)]
    /// 投资后项目的募资总额
    pub total_raised: u64,

    #[schema(example = 500)]
    pub fund_target: u64,
}

impl From<InvestmentRecord> for InvestmentReceipt {
    fn from(record: InvestmentRecord) -> Self {
        Self {
            investment: record.investment.into(),
            total_raised: record.total_raised,
            fund_target: record.fund_target,
        }
    }
}

//! 代币账本相关的请求和返回对象

use engine::TokenMetadata;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// 授权参数，会覆盖之前的授权额度
#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct ApproveRequest {
    #[validate(length(min = 1))]
    pub owner: String,

    #[validate(length(min = 1))]
    /// 被授权账户，投资时是托管账户
    pub spender: String,

    #[schema(example = 50)]
    pub amount: u64,
}

/// 转账参数
#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct TransferRequest {
    #[validate(length(min = 1))]
    pub from: String,

    #[validate(length(min = 1))]
    pub to: String,

    #[schema(example = 100)]
    pub amount: u64,
}

#[derive(Deserialize, Debug, ToSchema, Serialize)]
pub struct BalanceInfo {
    pub account: String,

    #[schema(example = 100)]
    pub balance: u64,
}

#[derive(Deserialize, Debug, ToSchema, Serialize)]
pub struct AllowanceInfo {
    pub owner: String,
    pub spender: String,

    #[schema(example = 50)]
    pub allowance: u64,
}

/// 代币信息
#[derive(Deserialize, Debug, ToSchema, Serialize)]
pub struct TokenInfo {
    #[schema(example = "P2P Fund Token")]
    pub name: String,

    #[schema(example = "P2PF")]
    pub symbol: String,

    #[schema(example = 10000)]
    pub total_supply: u64,

    /// 投资款的托管账户，投资前需要授权给这个账户
    pub custody_account: String,
}

impl TokenInfo {
    pub fn new(metadata: TokenMetadata, custody_account: String) -> Self {
        Self {
            name: metadata.name,
            symbol: metadata.symbol,
            total_supply: metadata.total_supply,
            custody_account,
        }
    }
}

//! 代币账本接口
//!
//! 投资前的授权以及余额查询。转账接口只用于从发行账户给投资人分发代币，
//! 托管账户里的投资款只能由投资引擎移动。

use crate::models::err::{AppError, ErrorReply};
use crate::models::ledger::{AllowanceInfo, ApproveRequest, BalanceInfo, TokenInfo, TransferRequest};
use crate::AppState;
use axum::extract::{Path, State};
use axum::Json;
use color_eyre::Result;
use shared_lib::Address;
use tracing::{info, instrument, warn};
use validator::Validate;

#[utoipa::path(get,
    path = "/ledger/balances/{account}",
    tag = "ledger",
    params(("account" = String, Path, description = "账户地址")),
    responses((status = 200, description = "Balance", body = BalanceInfo))
)]
pub async fn get_balance(State(state): State<AppState>, Path(account): Path<String>) -> Json<BalanceInfo> {
    let account = Address::new(account);
    let balance = state.ledger.balance_of(&account).await;

    Json(BalanceInfo {
        account: account.into(),
        balance,
    })
}

#[utoipa::path(get,
    path = "/ledger/allowances/{owner}/{spender}",
    tag = "ledger",
    params(
        ("owner" = String, Path, description = "授权账户"),
        ("spender" = String, Path, description = "被授权账户")
    ),
    responses((status = 200, description = "Allowance", body = AllowanceInfo))
)]
pub async fn get_allowance(
    State(state): State<AppState>,
    Path((owner, spender)): Path<(String, String)>,
) -> Json<AllowanceInfo> {
    let owner = Address::new(owner);
    let spender = Address::new(spender);
    let allowance = state.ledger.allowance(&owner, &spender).await;

    Json(AllowanceInfo {
        owner: owner.into(),
        spender: spender.into(),
        allowance,
    })
}

/// 授权
///
/// 直接覆盖之前的授权额度，不是累加。
#[utoipa::path(post,
    path = "/ledger/approvals",
    tag = "ledger",
    request_body = ApproveRequest,
    responses(
        (status = 200, description = "Allowance after approval", body = AllowanceInfo),
        (status = 400, description = "Zero address", body = ErrorReply)
    )
)]
#[instrument(skip(state))]
pub async fn approve(
    State(state): State<AppState>,
    Json(request): Json<ApproveRequest>,
) -> Result<Json<AllowanceInfo>, AppError> {
    request.validate()?;

    let owner = Address::new(request.owner);
    let spender = Address::new(request.spender);
    state.ledger.approve(&owner, &spender, request.amount).await?;
    info!("✅ {} 授权 {} 给 {}", owner, request.amount, spender);

    Ok(Json(AllowanceInfo {
        owner: owner.into(),
        spender: spender.into(),
        allowance: request.amount,
    }))
}

/// 从发行账户转账
///
/// `from` 不是发行账户时返回403，余额不变。
#[utoipa::path(post,
    path = "/ledger/transfers",
    tag = "ledger",
    request_body = TransferRequest,
    responses(
        (status = 200, description = "Balance of the sender after the transfer", body = BalanceInfo),
        (status = 402, description = "Insufficient balance", body = ErrorReply),
        (status = 403, description = "Sender is not the token treasury", body = ErrorReply)
    )
)]
#[instrument(skip(state))]
pub async fn transfer(
    State(state): State<AppState>,
    Json(request): Json<TransferRequest>,
) -> Result<Json<BalanceInfo>, AppError> {
    request.validate()?;

    let from = Address::new(request.from);
    if from != state.treasury {
        warn!("⚠️ 拒绝从 {} 转账，只允许从发行账户转出", from);
        return Err(AppError::TransferNotAllowed(from));
    }

    let to = Address::new(request.to);
    state.ledger.transfer(&from, &to, request.amount).await?;
    info!("✅ {} 转账 {} 给 {}", from, request.amount, to);

    let balance = state.ledger.balance_of(&from).await;
    Ok(Json(BalanceInfo {
        account: from.into(),
        balance,
    }))
}

/// 代币信息以及托管账户
#[utoipa::path(get,
    path = "/ledger/token",
    tag = "ledger",
    responses((status = 200, description = "Token metadata", body = TokenInfo))
)]
pub async fn get_token(State(state): State<AppState>) -> Json<TokenInfo> {
    Json(TokenInfo::new(
        state.ledger.metadata(),
        state.service.custody_account().to_string(),
    ))
}

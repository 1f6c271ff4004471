//! 投资相关接口

use crate::models::common::Reply;
use crate::models::err::{AppError, ErrorReply};
use crate::models::investments::{InvestRequest, InvestmentInfo, InvestmentReceipt};
use crate::AppState;
use axum::extract::{Path, State};
use axum::Json;
use color_eyre::Result;
use shared_lib::Address;
use tracing::instrument;

/// 投资项目
///
/// 投资人需要提前授权不少于 `amount` 的额度给托管账户，否则返回402，
/// 增加授权后重新提交即可。
///
/// 失败的请求不会修改任何状态。
#[utoipa::path(post,
    path = "/projects/{id}/investments",
    tag = "investments",
    params(("id" = u64, Path, description = "项目ID")),
    request_body = InvestRequest,
    responses(
        (status = 200, description = "Investment accepted", body = Reply<InvestmentReceipt>),
        (status = 400, description = "Zero investor or amount", body = ErrorReply),
        (status = 402, description = "Token ledger rejected the transfer", body = ErrorReply),
        (status = 403, description = "Owner cannot invest", body = ErrorReply),
        (status = 404, description = "Project not found", body = ErrorReply),
        (status = 409, description = "Outside the funding window or over the target", body = ErrorReply)
    )
)]
#[instrument(skip(state))]
pub async fn invest(
    State(state): State<AppState>,
    Path(project_id): Path<u64>,
    Json(request): Json<InvestRequest>,
) -> Result<Json<Reply<InvestmentReceipt>>, AppError> {
    let record = state
        .service
        .invest(project_id, Address::new(request.investor), request.amount)
        .await?;

    Ok(Json(Reply { data: record.into() }))
}

/// 查询项目的投资记录，按投资被接受的顺序排列
#[utoipa::path(get,
    path = "/projects/{id}/investments",
    tag = "investments",
    params(("id" = u64, Path, description = "项目ID")),
    responses(
        (status = 200, description = "Investments of the project", body = Reply<Vec<InvestmentInfo>>),
        (status = 404, description = "Project not found", body = ErrorReply)
    )
)]
pub async fn list_investments(
    State(state): State<AppState>,
    Path(project_id): Path<u64>,
) -> Result<Json<Reply<Vec<InvestmentInfo>>>, AppError> {
    let investments = state.service.list_investments(project_id).await?;

    Ok(Json(Reply {
        data: investments.into_iter().map(Into::into).collect(),
    }))
}

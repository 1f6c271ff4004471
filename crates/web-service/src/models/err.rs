use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use color_eyre::eyre::Error;
use engine::{EngineError, LedgerError, Rejection};
use serde::Serialize;
use shared_lib::Address;
use thiserror::Error;
use tracing::{debug, error};
use utoipa::ToSchema;
use validator::ValidationErrors;

/// 使用 [`thiserror`] 定义错误类型
/// 方便根据类型转换为相应的http错误码
#[derive(Error, Debug)]
pub enum AppError {
    /// 数据验证错误，这种错误通常都是用户参数不正确导致的，所以需要转换为400
    #[error(transparent)]
    ValidationFailed(#[from] ValidationErrors),

    /// 投资引擎错误，按照错误类型转换为对应的http错误码
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// 代币账本错误
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// 转账接口只能从发行账户转出，托管账户等其他账户都不行
    #[error("transfers are only allowed from the token treasury, not from {0}")]
    TransferNotAllowed(Address),

    /// 其他类型错误
    #[error(transparent)]
    InternalError(#[from] Error),
}

/// 错误返回内容
///
/// `error` 是错误类型名称，调用方可以据此给出对应的提示
#[derive(Serialize, Debug, ToSchema)]
pub struct ErrorReply {
    #[schema(example = "TransferRejected")]
    pub error: String,

    #[schema(example = "transfer rejected by token ledger: insufficient allowance")]
    pub message: String,
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::ValidationFailed(_) => "ValidationFailed",
            AppError::Engine(err) => err.kind(),
            AppError::Ledger(LedgerError::InsufficientBalance { .. }) => "InsufficientBalance",
            AppError::Ledger(LedgerError::InsufficientAllowance { .. }) => "InsufficientAllowance",
            AppError::Ledger(LedgerError::ZeroAddress) => "ZeroAddress",
            AppError::TransferNotAllowed(_) => "TransferNotAllowed",
            AppError::InternalError(_) => "InternalError",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            AppError::Engine(err) => match err {
                EngineError::InvalidProjectParameters(_) => StatusCode::BAD_REQUEST,
                EngineError::Rejected(rejection) => match rejection {
                    Rejection::ZeroAddressActor | Rejection::InvalidAmount => StatusCode::BAD_REQUEST,
                    Rejection::ProjectNotFound(_) => StatusCode::NOT_FOUND,
                    Rejection::OwnerCannotInvest { .. } => StatusCode::FORBIDDEN,
                    Rejection::FundraisingNotStarted { .. }
                    | Rejection::FundraisingClosed { .. }
                    | Rejection::FundTargetExceeded { .. } => StatusCode::CONFLICT,
                },
                EngineError::TransferRejected(_) => StatusCode::PAYMENT_REQUIRED,
                EngineError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Ledger(LedgerError::ZeroAddress) => StatusCode::BAD_REQUEST,
            AppError::Ledger(_) => StatusCode::PAYMENT_REQUIRED,
            AppError::TransferNotAllowed(_) => StatusCode::FORBIDDEN,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Tell axum how to convert `AppError` into a response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("❌ 请求处理失败: {:?}", self);
        } else {
            debug!("请求被拒绝 {}: {}", status, self);
        }

        let reply = ErrorReply {
            error: self.kind().to_string(),
            message: self.to_string(),
        };
        (status, Json(reply)).into_response()
    }
}

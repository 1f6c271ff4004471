use crate::ledger::LedgerError;
use crate::validator::Rejection;
use database::DatabaseError;
use thiserror::Error;

/// 投资引擎错误
///
/// 每个请求相互独立，任何错误都不会影响引擎本身，失败的请求不会修改任何已保存的状态。
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid project parameters: {0}")]
    InvalidProjectParameters(String),

    /// 校验器的拒绝原因，原样返回
    #[error(transparent)]
    Rejected(#[from] Rejection),

    /// 代币账本拒绝转账（余额不足或授权额度不足）
    #[error("transfer rejected by token ledger: {0}")]
    TransferRejected(#[source] LedgerError),

    #[error("storage error: {0}")]
    Storage(#[source] DatabaseError),
}

pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// 错误类型名称，方便调用方给出对应的提示
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::InvalidProjectParameters(_) => "InvalidProjectParameters",
            EngineError::Rejected(rejection) => rejection.kind(),
            EngineError::TransferRejected(_) => "TransferRejected",
            EngineError::Storage(_) => "StorageError",
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            EngineError::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }
}

/// 仓库层的业务错误转换为对应的引擎错误，其他错误归为存储错误
impl From<DatabaseError> for EngineError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::InvalidProjectParameters(msg) => EngineError::InvalidProjectParameters(msg),
            DatabaseError::ProjectNotFound(id) => EngineError::Rejected(Rejection::ProjectNotFound(id)),
            DatabaseError::FundTargetExceeded {
                project_id,
                total_raised,
                amount,
                fund_target,
            } => EngineError::Rejected(Rejection::FundTargetExceeded {
                project_id,
                total_raised,
                amount,
                fund_target,
            }),
            DatabaseError::InvalidInvestment(_) => EngineError::Rejected(Rejection::InvalidAmount),
            other => EngineError::Storage(other),
        }
    }
}

use shared_lib::{Amount, ProjectId};
use thiserror::Error;

/// 数据库操作错误类型
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// SQLX 错误
    #[error("数据库操作错误: {0}")]
    SqlxError(#[from] sqlx::Error),

    /// 连接错误
    #[error("数据库连接错误: {0}")]
    ConnectionError(String),

    /// 迁移错误
    #[error("数据库迁移错误: {0}")]
    MigrationError(String),

    /// 项目创建参数不合法
    #[error("项目参数不合法: {0}")]
    InvalidProjectParameters(String),

    /// 投资记录不合法（金额为0等）
    #[error("投资记录不合法: {0}")]
    InvalidInvestment(String),

    #[error("项目 {0} 不存在")]
    ProjectNotFound(ProjectId),

    /// 记账后募资总额会超过目标
    #[error("项目 {project_id} 已募集 {total_raised}，再投入 {amount} 会超过目标 {fund_target}")]
    FundTargetExceeded {
        project_id: ProjectId,
        total_raised: Amount,
        amount: Amount,
        fund_target: Amount,
    },

    /// 数值超出数据库字段范围
    #[error("数值超出范围: {0}")]
    OutOfRange(String),
}

impl DatabaseError {
    /// 创建连接错误
    pub fn connection<T: ToString>(msg: T) -> Self {
        Self::ConnectionError(msg.to_string())
    }

    /// 创建迁移错误
    pub fn migration<T: ToString>(msg: T) -> Self {
        Self::MigrationError(msg.to_string())
    }

    /// 创建参数错误
    pub fn invalid_params<T: ToString>(msg: T) -> Self {
        Self::InvalidProjectParameters(msg.to_string())
    }

    pub fn out_of_range<T: ToString>(msg: T) -> Self {
        Self::OutOfRange(msg.to_string())
    }
}

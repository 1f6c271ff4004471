//! 项目投资引擎
//!
//! 所有状态变更都经过 [`InvestmentEngine`]：
//!
//! 1. [`validator`] 给出接受/拒绝的决定，不修改任何状态
//! 2. 通过 [`TokenLedger`] 把投资款从投资人账户转入引擎托管账户（使用预先授权的额度）
//! 3. 转账成功之后才在项目仓库中记账
//! 4. 发出领域事件
//!
//! 任何一步失败，已保存的状态都保持不变。

pub mod clock;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod service;
pub mod validator;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{InvestmentEngine, InvestmentRecord};
pub use error::{EngineError, EngineResult};
pub use ledger::{LedgerError, LedgerResult, MemoryTokenLedger, TokenLedger, TokenMetadata};
pub use service::InvestmentServiceTrait;
pub use validator::{validate_investment, Acceptance, Rejection};

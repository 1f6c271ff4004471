//! 代币账本
//!
//! 引擎只通过 [`TokenLedger`] 移动资金，账本的余额和授权额度不属于引擎。
//! [`MemoryTokenLedger`] 是进程内实现，语义和常见的同质化代币一致：
//! - `approve` 直接覆盖授权额度（不是累加）
//! - `transfer_from` 同时消耗余额和授权额度
//! - 任何失败都不修改余额和额度

use shared_lib::{Address, Amount};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

/// 账本错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("insufficient balance: {account} holds {balance}, needs {required}")]
    InsufficientBalance {
        account: Address,
        balance: Amount,
        required: Amount,
    },

    #[error("insufficient allowance: {owner} approved {allowance} to {spender}, needs {required}. Increase your approval before investing")]
    InsufficientAllowance {
        owner: Address,
        spender: Address,
        allowance: Amount,
        required: Amount,
    },

    #[error("zero address is not a valid account")]
    ZeroAddress,
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// 代币基本信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub total_supply: Amount,
}

/// 代币账本特征
#[async_trait::async_trait]
pub trait TokenLedger: Send + Sync + 'static {
    /// 使用 `from` 授权给 `to` 的额度，把 `amount` 从 `from` 转到 `to`
    async fn transfer_from(&self, from: &Address, to: &Address, amount: Amount) -> LedgerResult<()>;

    /// 账户持有人直接转账
    async fn transfer(&self, from: &Address, to: &Address, amount: Amount) -> LedgerResult<()>;

    /// 设置 `owner` 给 `spender` 的授权额度
    async fn approve(&self, owner: &Address, spender: &Address, amount: Amount) -> LedgerResult<()>;

    async fn balance_of(&self, account: &Address) -> Amount;

    async fn allowance(&self, owner: &Address, spender: &Address) -> Amount;

    fn metadata(&self) -> TokenMetadata;
}

#[derive(Debug, Default)]
struct LedgerState {
    balances: HashMap<Address, Amount>,
    allowances: HashMap<(Address, Address), Amount>,
}

impl LedgerState {
    fn balance(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances.get(&(owner.clone(), spender.clone())).copied().unwrap_or(0)
    }

    /// 检查通过之后才修改余额
    fn move_funds(&mut self, from: &Address, to: &Address, amount: Amount) -> LedgerResult<()> {
        if from.is_zero() || to.is_zero() {
            return Err(LedgerError::ZeroAddress);
        }

        let balance = self.balance(from);
        if balance < amount {
            return Err(LedgerError::InsufficientBalance {
                account: from.clone(),
                balance,
                required: amount,
            });
        }

        self.balances.insert(from.clone(), balance - amount);
        // 总供应量固定，入账不会溢出
        *self.balances.entry(to.clone()).or_insert(0) += amount;
        Ok(())
    }
}

/// 进程内代币账本
#[derive(Debug)]
pub struct MemoryTokenLedger {
    metadata: TokenMetadata,
    state: Mutex<LedgerState>,
}

impl MemoryTokenLedger {
    /// 发行代币，全部初始供应量记到 `treasury`
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, treasury: &Address, initial_supply: Amount) -> Self {
        let mut state = LedgerState::default();
        state.balances.insert(treasury.clone(), initial_supply);

        Self {
            metadata: TokenMetadata {
                name: name.into(),
                symbol: symbol.into(),
                total_supply: initial_supply,
            },
            state: Mutex::new(state),
        }
    }
}

#[async_trait::async_trait]
impl TokenLedger for MemoryTokenLedger {
    async fn transfer_from(&self, from: &Address, to: &Address, amount: Amount) -> LedgerResult<()> {
        if from.is_zero() || to.is_zero() {
            return Err(LedgerError::ZeroAddress);
        }

        let mut state = self.state.lock().await;

        let allowance = state.allowance(from, to);
        if allowance < amount {
            return Err(LedgerError::InsufficientAllowance {
                owner: from.clone(),
                spender: to.clone(),
                allowance,
                required: amount,
            });
        }

        state.move_funds(from, to, amount)?;
        state.allowances.insert((from.clone(), to.clone()), allowance - amount);

        debug!("transfer_from {} -> {}: {}", from, to, amount);
        Ok(())
    }

    async fn transfer(&self, from: &Address, to: &Address, amount: Amount) -> LedgerResult<()> {
        self.state.lock().await.move_funds(from, to, amount)?;
        debug!("transfer {} -> {}: {}", from, to, amount);
        Ok(())
    }

    async fn approve(&self, owner: &Address, spender: &Address, amount: Amount) -> LedgerResult<()> {
        if owner.is_zero() || spender.is_zero() {
            return Err(LedgerError::ZeroAddress);
        }

        self.state
            .lock()
            .await
            .allowances
            .insert((owner.clone(), spender.clone()), amount);
        debug!("approve {} -> {}: {}", owner, spender, amount);
        Ok(())
    }

    async fn balance_of(&self, account: &Address) -> Amount {
        self.state.lock().await.balance(account)
    }

    async fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.state.lock().await.allowance(owner, spender)
    }

    fn metadata(&self) -> TokenMetadata {
        self.metadata.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Address {
        Address::new(s)
    }

    #[tokio::test]
    async fn test_initial_supply_and_transfer() {
        // 和代币部署时一样：全部供应量给发行账户，再分给两个投资人
        let ledger = MemoryTokenLedger::new("P2P Test Token", "P2PTTK", &addr("0xtreasury"), 10_000);

        ledger.transfer(&addr("0xtreasury"), &addr("0xinvestor1"), 100).await.unwrap();
        ledger.transfer(&addr("0xtreasury"), &addr("0xinvestor2"), 100).await.unwrap();

        assert_eq!(ledger.balance_of(&addr("0xinvestor1")).await, 100);
        assert_eq!(ledger.balance_of(&addr("0xinvestor2")).await, 100);
        assert_eq!(ledger.balance_of(&addr("0xtreasury")).await, 9_800);
        assert_eq!(ledger.metadata().total_supply, 10_000);
        assert_eq!(ledger.metadata().symbol, "P2PTTK");
    }

    #[tokio::test]
    async fn test_transfer_from_consumes_allowance() {
        let ledger = MemoryTokenLedger::new("T", "T", &addr("0xalice"), 100);
        ledger.approve(&addr("0xalice"), &addr("0xvault"), 60).await.unwrap();

        ledger.transfer_from(&addr("0xalice"), &addr("0xvault"), 50).await.unwrap();

        assert_eq!(ledger.balance_of(&addr("0xalice")).await, 50);
        assert_eq!(ledger.balance_of(&addr("0xvault")).await, 50);
        assert_eq!(ledger.allowance(&addr("0xalice"), &addr("0xvault")).await, 10);
    }

    #[tokio::test]
    async fn test_insufficient_allowance_changes_nothing() {
        let ledger = MemoryTokenLedger::new("T", "T", &addr("0xalice"), 100);
        ledger.approve(&addr("0xalice"), &addr("0xvault"), 40).await.unwrap();

        let err = ledger.transfer_from(&addr("0xalice"), &addr("0xvault"), 50).await.unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientAllowance { allowance: 40, required: 50, .. }));

        assert_eq!(ledger.balance_of(&addr("0xalice")).await, 100);
        assert_eq!(ledger.balance_of(&addr("0xvault")).await, 0);
        assert_eq!(ledger.allowance(&addr("0xalice"), &addr("0xvault")).await, 40);
    }

    #[tokio::test]
    async fn test_insufficient_balance_changes_nothing() {
        let ledger = MemoryTokenLedger::new("T", "T", &addr("0xalice"), 30);
        ledger.approve(&addr("0xalice"), &addr("0xvault"), 100).await.unwrap();

        let err = ledger.transfer_from(&addr("0xalice"), &addr("0xvault"), 50).await.unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientBalance { balance: 30, .. }));

        assert_eq!(ledger.balance_of(&addr("0xalice")).await, 30);
        assert_eq!(ledger.allowance(&addr("0xalice"), &addr("0xvault")).await, 100);
    }

    #[tokio::test]
    async fn test_approve_overwrites() {
        let ledger = MemoryTokenLedger::new("T", "T", &addr("0xalice"), 30);
        ledger.approve(&addr("0xalice"), &addr("0xvault"), 100).await.unwrap();
        ledger.approve(&addr("0xalice"), &addr("0xvault"), 5).await.unwrap();

        assert_eq!(ledger.allowance(&addr("0xalice"), &addr("0xvault")).await, 5);
    }

    #[tokio::test]
    async fn test_zero_address_rejected() {
        let ledger = MemoryTokenLedger::new("T", "T", &addr("0xalice"), 30);

        assert_eq!(
            ledger.transfer(&addr("0xalice"), &Address::zero(), 1).await,
            Err(LedgerError::ZeroAddress)
        );
        assert_eq!(
            ledger.approve(&Address::zero(), &addr("0xvault"), 1).await,
            Err(LedgerError::ZeroAddress)
        );
        assert_eq!(ledger.balance_of(&addr("0xalice")).await, 30);
    }
}

//! 领域基础类型
//!
//! 项目ID、金额、时间戳都使用整数表示，避免浮点误差。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 项目ID，从1开始单调递增
pub type ProjectId = u64;

/// 金额（代币最小单位）
pub type Amount = u64;

/// unix 时间戳（秒）
pub type Timestamp = i64;

pub const SECONDS_PER_HOUR: Timestamp = 3600;
pub const SECONDS_PER_DAY: Timestamp = 24 * SECONDS_PER_HOUR;

const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// 账户地址
///
/// 创建时会去掉首尾空白并统一转为小写，因此 `0xABC` 和 `0xabc` 是同一个账户。
///
/// 空字符串，或者（去掉 `0x` 前缀后）全部由 `0` 组成的地址被视为**空身份**，
/// 参考 [`Address::is_zero`]。
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_ascii_lowercase())
    }

    /// 零地址
    pub fn zero() -> Self {
        Self(ZERO_ADDRESS.to_string())
    }

    /// 是否为空身份
    pub fn is_zero(&self) -> bool {
        let digits = self.0.strip_prefix("0x").unwrap_or(&self.0);
        digits.chars().all(|c| c == '0')
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Address {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&str> for Address {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

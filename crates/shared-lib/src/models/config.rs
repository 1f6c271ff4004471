use crate::models::address::{Address, Amount};
use crate::models::redis_constants::DEFAULT_EVENT_STREAM;
use color_eyre::eyre::eyre;
use color_eyre::{Help, Result};
use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// 默认托管账户，接收所有投资款
pub const DEFAULT_CUSTODY_ACCOUNT: &str = "0xf00d000000000000000000000000000000000001";

/// 默认代币发行账户，初始供应量全部记在这个账户上
pub const DEFAULT_TOKEN_TREASURY: &str = "0xf00d000000000000000000000000000000000002";

pub struct RedisConfig {
    /// redis链接字符串
    pub redis_conn_str: String,

    /// 领域事件写入的stream名称
    ///
    /// 可通过环境变量 `EVENT_STREAM` 来调整
    pub event_stream: String,

    /// 审计消费者个数
    ///
    /// 可通过环境变量 `MAX_CONSUMER_COUNT` 来调整
    pub max_consumer_count: usize,
}

/// 代币账本配置
///
/// 当前使用的是进程内账本，启动时把全部初始供应量记到 `treasury` 账户，
/// 投资人需要先从 `treasury` 转入代币，再授权给托管账户。
pub struct LedgerConfig {
    /// 引擎托管账户
    pub custody_account: Address,

    pub treasury: Address,

    pub initial_supply: Amount,

    pub token_name: String,

    pub token_symbol: String,
}

/// 程序配置
pub struct AppConfig {
    /// HTTP监听地址
    pub bind_addr: String,

    /// postgresql数据库链接字符串
    ///
    /// 没有配置时使用内存中的项目仓库
    pub postgresql_conn_str: Option<String>,

    /// redis配置，没有配置 `REDIS_URL` 时不发布事件到redis，也不启动审计消费者
    pub redis: Option<RedisConfig>,

    pub ledger: LedgerConfig,

    /// 日志级别
    pub log_level: tracing::Level,
}

impl AppConfig {
    pub fn load() -> Result<Arc<AppConfig>> {
        // 加载.env文件中的数据注入到环境变量中，方便本地测试
        // 线上环境部署时会直接使用环境变量，不需要.env文件
        if let Err(err) = dotenvy::dotenv() {
            debug!("No .env file loaded: {err}");
        }

        let config = Self::from_lookup(|key| std::env::var(key).ok())?;
        Ok(Arc::new(config))
    }

    /// 从任意键值来源构建配置，空字符串视为未配置
    pub fn from_lookup<F>(lookup: F) -> Result<AppConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let redis = match get("REDIS_URL") {
            Some(redis_url) => Some(RedisConfig {
                redis_conn_str: redis_url,
                event_stream: get("EVENT_STREAM").unwrap_or_else(|| DEFAULT_EVENT_STREAM.to_string()),
                max_consumer_count: parse_var(get("MAX_CONSUMER_COUNT"), "MAX_CONSUMER_COUNT", 1)?,
            }),
            None => None,
        };

        let custody_account = Address::new(get("CUSTODY_ACCOUNT").unwrap_or_else(|| DEFAULT_CUSTODY_ACCOUNT.to_string()));
        if custody_account.is_zero() {
            return Err(eyre!("CUSTODY_ACCOUNT must not be the zero address")).suggestion("设置一个非零的 CUSTODY_ACCOUNT");
        }

        let config = AppConfig {
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
            postgresql_conn_str: get("DATABASE_URL"),
            redis,
            ledger: LedgerConfig {
                custody_account,
                treasury: Address::new(get("TOKEN_TREASURY").unwrap_or_else(|| DEFAULT_TOKEN_TREASURY.to_string())),
                initial_supply: parse_var(get("TOKEN_INITIAL_SUPPLY"), "TOKEN_INITIAL_SUPPLY", 10_000)?,
                token_name: get("TOKEN_NAME").unwrap_or_else(|| "P2P Fund Token".to_string()),
                token_symbol: get("TOKEN_SYMBOL").unwrap_or_else(|| "P2PF".to_string()),
            },
            log_level: parse_var(get("LOG_LEVEL"), "LOG_LEVEL", tracing::Level::INFO)?,
        };

        Ok(config)
    }
}

fn parse_var<T>(raw: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match raw {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| eyre!("Invalid value {raw:?} for {key}: {e}"))
            .suggestion(format!("检查环境变量 {key} 的取值")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert!(config.postgresql_conn_str.is_none());
        assert!(config.redis.is_none());
        assert_eq!(config.ledger.initial_supply, 10_000);
        assert_eq!(config.ledger.custody_account, Address::new(DEFAULT_CUSTODY_ACCOUNT));
        assert_eq!(config.log_level, tracing::Level::INFO);
    }

    #[test]
    fn test_redis_section() {
        let config = load(&[("REDIS_URL", "redis://127.0.0.1/"), ("MAX_CONSUMER_COUNT", "3")]).unwrap();

        let redis = config.redis.unwrap();
        assert_eq!(redis.redis_conn_str, "redis://127.0.0.1/");
        assert_eq!(redis.event_stream, DEFAULT_EVENT_STREAM);
        assert_eq!(redis.max_consumer_count, 3);
    }

    #[test]
    fn test_empty_value_is_unset() {
        let config = load(&[("DATABASE_URL", "  "), ("LOG_LEVEL", "debug")]).unwrap();

        assert!(config.postgresql_conn_str.is_none());
        assert_eq!(config.log_level, tracing::Level::DEBUG);
    }

    #[test]
    fn test_malformed_number_is_error() {
        assert!(load(&[("TOKEN_INITIAL_SUPPLY", "lots")]).is_err());
        assert!(load(&[("REDIS_URL", "redis://x"), ("MAX_CONSUMER_COUNT", "-1")]).is_err());
    }

    #[test]
    fn test_zero_custody_rejected() {
        assert!(load(&[("CUSTODY_ACCOUNT", "0x0000")]).is_err());
    }
}

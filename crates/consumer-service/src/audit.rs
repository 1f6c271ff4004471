//! 审计处理器
//!
//! 解析引擎发布的领域事件并写审计日志。处理器本身不保存事件，成功返回后消息被确认。

use crate::traits::EventHandlerTrait;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use shared_lib::DomainEvent;
use tracing::info;

#[derive(Debug, Default, Clone, Copy)]
pub struct AuditHandler;

impl AuditHandler {
    /// 解析消息内容，未知类型或者格式错误都返回错误
    pub fn decode(payload: &str) -> Result<DomainEvent> {
        serde_json::from_str(payload).wrap_err_with(|| format!("undecodable domain event: {payload}"))
    }
}

#[async_trait::async_trait]
impl EventHandlerTrait for AuditHandler {
    async fn handle_event(&self, payload: &str) -> Result<()> {
        match Self::decode(payload)? {
            DomainEvent::ProjectCreated { project_id } => {
                info!("📋 审计 - 项目 {} 已创建", project_id);
            }
            DomainEvent::InvestmentMade {
                investor,
                project_id,
                amount,
            } => {
                info!("📋 审计 - {} 向项目 {} 投资 {}", investor, project_id, amount);
            }
        }

        Ok(())
    }
}

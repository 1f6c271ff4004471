use crate::models::address::{Address, Amount, ProjectId};
use serde::{Deserialize, Serialize};

/// 领域事件
///
/// 只有状态真正变更（项目创建成功、投资记账成功）之后才会发出。
/// 序列化格式示例：
///
/// ```json
/// {"type": "investment_made", "investor": "0xabc", "project_id": 1, "amount": 50}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    ProjectCreated {
        project_id: ProjectId,
    },
    InvestmentMade {
        investor: Address,
        project_id: ProjectId,
        amount: Amount,
    },
}

impl DomainEvent {
    /// 事件名称，用于日志
    pub fn name(&self) -> &'static str {
        match self {
            DomainEvent::ProjectCreated { .. } => "ProjectCreated",
            DomainEvent::InvestmentMade { .. } => "InvestmentMade",
        }
    }

    pub fn project_id(&self) -> ProjectId {
        match self {
            DomainEvent::ProjectCreated { project_id } | DomainEvent::InvestmentMade { project_id, .. } => *project_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_json_shape() {
        let event = DomainEvent::InvestmentMade {
            investor: Address::new("0xABC"),
            project_id: 1,
            amount: 50,
        };

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({"type": "investment_made", "investor": "0xabc", "project_id": 1, "amount": 50})
        );

        let created: DomainEvent = serde_json::from_value(json!({"type": "project_created", "project_id": 7})).unwrap();
        assert_eq!(created, DomainEvent::ProjectCreated { project_id: 7 });
        assert_eq!(created.name(), "ProjectCreated");
        assert_eq!(created.project_id(), 7);
    }
}

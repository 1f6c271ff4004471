use serde::{Deserialize, Serialize};
use shared_lib::DomainEvent;
use utoipa::ToSchema;

/// 领域事件
///
/// `investor` 和 `amount` 只有投资事件才有
#[derive(Deserialize, Debug, ToSchema, Serialize)]
pub struct EventInfo {
    #[schema(example = "InvestmentMade")]
    pub name: String,

    #[schema(example = 1)]
    pub project_id: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub investor: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 50)]
    pub amount: Option<u64>,
}

impl From<DomainEvent> for EventInfo {
    fn from(event: DomainEvent) -> Self {
        let name = event.name().to_string();
        match event {
            DomainEvent::ProjectCreated { project_id } => Self {
                name,
                project_id,
                investor: None,
                amount: None,
            },
            DomainEvent::InvestmentMade {
                investor,
                project_id,
                amount,
            } => Self {
                name,
                project_id,
                investor: Some(investor.into()),
                amount: Some(amount),
            },
        }
    }
}

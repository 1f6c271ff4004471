use crate::models::common::Reply;
use crate::models::events::EventInfo;
use crate::AppState;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

/// 进程内事件日志，按发布顺序排列
#[utoipa::path(get,
    path = "/events",
    tag = "events",
    responses((status = 200, description = "Published domain events", body = Reply<Vec<EventInfo>>))
)]
pub async fn list_events(State(state): State<AppState>) -> Json<Reply<Vec<EventInfo>>> {
    let events = state.events.events().await;

    Json(Reply {
        data: events.into_iter().map(Into::into).collect(),
    })
}

#[derive(Serialize, Debug, ToSchema)]
pub struct HealthInfo {
    #[schema(example = "ok")]
    pub status: &'static str,

    /// 已创建的项目数量
    pub projects: u64,
}

#[utoipa::path(get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is up", body = HealthInfo))
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthInfo> {
    // 查询失败时依然返回，只是数量为0
    let projects = match state.service.find_projects(None, 1, 0).await {
        Ok(result) => result.total,
        Err(err) => {
            warn!("⚠️ 健康检查查询项目数量失败: {}", err);
            0
        }
    };

    Json(HealthInfo { status: "ok", projects })
}

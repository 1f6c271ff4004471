//! 项目相关接口
//!

use crate::models::common::{Reply, ReplyList};
use crate::models::err::{AppError, ErrorReply};
use crate::models::projects::{ProjectCreate, ProjectInfo, ProjectSearch};
use crate::AppState;
use axum::extract::{Path, State};
use axum::Json;
use color_eyre::Result;
use tracing::{debug, instrument};
use validator::Validate;

/// 根据查询参数搜索项目
///
/// 根据查询参数搜索符合要求的项目列表，支持分页，结果按项目ID升序排列。
///
/// 查询参数由 [`ProjectSearch`] 参数决定，部分参数为可选参数。
///
/// ## Json化
///
/// 通过`Json(search): Json<ProjectSearch>`这种语法，框架能自动将body数据反序列化为[`ProjectSearch`]对象，如果
/// 反序列化失败会直接返回400错误。
///
/// ## 返回值
///
/// 1. [`Json`] 会对内部类型进行json序列化，保证返回的数据是一个合法的json字符串
/// 2. [`ReplyList`] 是我们封装的一个类型，表明结果是一个通用的`api-json`格式列表对象
/// 3. [`AppError`] 是错误时返回的Error类型，会根据错误类型转换为对应的http错误码
#[utoipa::path(post,
    path = "/search-projects",
    tag = "projects",
    request_body = ProjectSearch,
    responses(
        (status = 200, description = "Search results", body = ReplyList<ProjectInfo>),
        (status = 400, description = "Invalid page query", body = ErrorReply)
    ),
)]
pub async fn find_projects(
    State(state): State<AppState>,
    Json(search): Json<ProjectSearch>,
) -> Result<Json<ReplyList<ProjectInfo>>, AppError> {
    debug!("🔍 搜索项目 {:#?}", search);

    // 验证输入参数，确保有效性
    search.validate()?;

    let result = state
        .service
        .find_projects(
            search.project_name.clone(),
            u64::from(search.page_query.page_size),
            search.page_query.offset(),
        )
        .await?;

    Ok(Json(ReplyList {
        total: result.total,
        data: result.projects.into_iter().map(Into::into).collect(),
        page_size: search.page_query.page_size,
        page_index: search.page_query.page_index,
    }))
}

/// 创建项目
///
/// 创建成功后项目ID从1开始递增，`total_raised` 为0。
/// 提交的年化利率是整数百分比，返回的是乘以100之后的值。
#[utoipa::path(post,
    path = "/projects",
    tag = "projects",
    request_body = ProjectCreate,
    responses(
        (status = 200, description = "Create project result", body = Reply<ProjectInfo>),
        (status = 400, description = "Invalid project parameters", body = ErrorReply)
    )
)]
#[instrument(skip(state))]
pub async fn create_project(
    State(state): State<AppState>,
    Json(project): Json<ProjectCreate>,
) -> Result<Json<Reply<ProjectInfo>>, AppError> {
    project.validate()?;

    let project = state.service.create_project(project.into()).await?;

    Ok(Json(Reply { data: project.into() }))
}

/// 查询指定项目信息
#[utoipa::path(get,
    path = "/projects/{id}",
    tag = "projects",
    params(("id" = u64, Path, description = "项目ID")),
    responses(
        (status = 200, description = "Project", body = ProjectInfo),
        (status = 404, description = "Project not found", body = ErrorReply)
    )
)]
pub async fn get_project(
    State(state): State<AppState>,
    Path(project_id): Path<u64>,
) -> Result<Json<ProjectInfo>, AppError> {
    debug!("Getting project id {:#?}", project_id);

    let project = state.service.get_project(project_id).await?;

    Ok(Json(project.into()))
}

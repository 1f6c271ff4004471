//! 路由入口
//!
//! 提供 [`create_app_router`] 函数，导出当前App的所有路由。
//!
//! 用户可以在导出路由时传入共享数据 shared_state，这样所有路由函数都可以访问。

use crate::routes::events::__path_health;
use crate::routes::events::__path_list_events;
use crate::routes::events::{health, list_events};
use crate::routes::investments::__path_invest;
use crate::routes::investments::__path_list_investments;
use crate::routes::investments::{invest, list_investments};
use crate::routes::ledger::__path_approve;
use crate::routes::ledger::__path_get_allowance;
use crate::routes::ledger::__path_get_balance;
use crate::routes::ledger::__path_get_token;
use crate::routes::ledger::__path_transfer;
use crate::routes::ledger::{approve, get_allowance, get_balance, get_token, transfer};
use crate::routes::projects::__path_create_project;
use crate::routes::projects::__path_find_projects;
use crate::routes::projects::__path_get_project;
use crate::routes::projects::{create_project, find_projects, get_project};
use crate::AppState;
use axum::Router;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use utoipa_scalar::{Scalar, Servable};

pub mod events;
pub mod investments;
pub mod ledger;
pub mod projects;

/// 导出当前App的所有路由
///
/// ## 参数定义
/// - state: 共享数据，参考 [`AppState`] 定义。存放投资服务、代币账本和事件日志。
///
/// ## **❗️注意事项：**
///
/// 由于 [`routes!`] 宏限制，一个宏里面只能放同一个路径的接口，并且不能同时定义多个相同类型的http接口。
/// 不能这样定义：
///
/// ```rust,ignore
/// routes!(get, get, post)
/// ```
///
/// 这样会导致Panic
///
/// 需要拆开定义
///
/// ```rust,ignore
/// routes!(get, post)
/// .routes!(get)
/// ```
///
fn routers(state: AppState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(find_projects))
        .routes(routes!(create_project))
        .routes(routes!(get_project))
        .routes(routes!(invest, list_investments))
        .routes(routes!(get_balance))
        .routes(routes!(get_allowance))
        .routes(routes!(approve))
        .routes(routes!(transfer))
        .routes(routes!(get_token))
        .routes(routes!(list_events))
        .routes(routes!(health))
        .with_state(state)
}

/// 创建当前App的路由
///
/// 完成以下功能：
/// - 生成OpenAPI文档
/// - 生成App路由
/// - 使用Scalar作为最终在线文档格式
///
/// 由于使用了 `utoipa` 库来自动化生成`openapi`文档，因此我们没有使用原生的 [`Router`]，而是使用了
/// [`OpenApiRouter`] 。
pub fn create_app_router(shared_state: AppState) -> Router {
    // 当前项目的OpenAPI声明
    #[derive(OpenApi)]
    #[openapi(
        tags(
            (name = "p2p-fund", description = r#"
P2P众筹投资服务：

- 项目创建和查询
- 投资（需要先授权给托管账户）
- 代币账本
- 领域事件
            "#)
        ),
    )]
    struct ApiDoc;

    // 使用`utoipa_axum`提供的OpenApiRouter来创建路由。
    // 同时传递共享状态数据到路由中供使用。
    // 最终拿到的变量：
    // - router: Axum的Router，实际的路由对象
    // - api: utoipa的OpenApi，生成的OpenAPI对象
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api/v1", routers(shared_state))
        .split_for_parts();

    // 合并文档路由，用户可通过 /docs 访问文档网页地址
    router.merge(Scalar::with_url("/docs", api))
}

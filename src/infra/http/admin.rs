//! Routes served on the private admin listener.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use serde::Deserialize;

use crate::{
    application::{
        admin::{AdminListError, AdminPostService, AdminSubscriptionService},
        error::HttpError,
    },
    infra::db::PostgresRepositories,
    presentation::views::{
        AdminPostRow, AdminPostsTemplate, AdminSubscriptionRow, AdminSubscriptionsTemplate,
        render_template_response,
    },
};

use super::{
    db_health_response,
    middleware::{log_responses, set_request_context},
    public::PageQuery,
};

#[derive(Clone)]
pub struct AdminState {
    pub posts: Arc<AdminPostService>,
    pub subscriptions: Arc<AdminSubscriptionService>,
    pub db: Arc<PostgresRepositories>,
}

pub fn build_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to("/posts") }))
        .route("/posts", get(list_posts))
        .route("/subscriptions", get(list_subscriptions))
        .route("/_health/db", get(admin_health))
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
        .with_state(state)
}

async fn list_posts(State(state): State<AdminState>, Query(query): Query<PageQuery>) -> Response {
    match state.posts.list(query.number()).await {
        Ok(page) => render_template_response(
            AdminPostsTemplate {
                rows: page.items.into_iter().map(AdminPostRow::from).collect(),
                total: page.total,
                page_number: page.page_number,
                page_count: page.page_count,
                has_previous: page.has_previous,
                has_next: page.has_next,
            },
            StatusCode::OK,
        ),
        Err(err) => admin_error_to_response(err),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchQuery {
    search: Option<String>,
}

async fn list_subscriptions(
    State(state): State<AdminState>,
    Query(query): Query<SearchQuery>,
) -> Response {
    match state.subscriptions.list(query.search.as_deref()).await {
        Ok(rows) => render_template_response(
            AdminSubscriptionsTemplate {
                rows: rows.into_iter().map(AdminSubscriptionRow::from).collect(),
                search: query.search.unwrap_or_default(),
            },
            StatusCode::OK,
        ),
        Err(err) => admin_error_to_response(err),
    }
}

async fn admin_health(State(state): State<AdminState>) -> Response {
    db_health_response(state.db.health_check().await)
}

fn admin_error_to_response(err: AdminListError) -> Response {
    match err {
        AdminListError::PageOutOfRange(err) => HttpError::new(
            "infra::http::admin::admin_error_to_response",
            StatusCode::NOT_FOUND,
            "Page not found",
            err.to_string(),
        )
        .into_response(),
        AdminListError::Repo(err) => HttpError::from(err).into_response(),
    }
}

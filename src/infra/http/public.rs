use std::sync::Arc;

use axum::{
    Extension, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use crate::{
    application::{
        about::about_view,
        error::HttpError,
        feed::{FeedError, FeedFilter, FeedService, SIDEBAR_DEFAULT_COUNT},
        posts::PostService,
        repos::UsersRepo,
        subscriptions::{SubscribeOutcome, SubscriptionService},
    },
    infra::db::PostgresRepositories,
    presentation::views::{
        AboutTemplate, LayoutContext, ListingTemplate, PageMetaView, PostTemplate,
        render_not_found_response, render_template_response,
    },
};

use super::{
    db_health_response,
    middleware::{log_responses, set_request_context},
    posts as post_handlers,
    session::{self, AuthContext, FlashCode},
};

#[derive(Clone)]
pub struct HttpState {
    pub feed: Arc<FeedService>,
    pub posts: Arc<PostService>,
    pub subscriptions: Arc<SubscriptionService>,
    pub users: Arc<dyn UsersRepo>,
    pub db: Arc<PostgresRepositories>,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/blog", get(index))
        .route("/user/{username}", get(user_posts))
        .route(
            "/post/new",
            get(post_handlers::new_post_form).post(post_handlers::create_post),
        )
        .route("/post/{id}", get(post_detail))
        .route(
            "/post/{id}/update",
            get(post_handlers::edit_post_form).post(post_handlers::update_post),
        )
        .route(
            "/post/{id}/delete",
            get(post_handlers::delete_post_confirm).post(post_handlers::delete_post),
        )
        .route("/about", get(about))
        .route("/subscribe", post(subscribe))
        .route("/_health/db", get(public_health))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session::resolve_identity,
        ))
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
        .with_state(state)
}

// `page` stays a raw string so garbled values reach the paginator instead
// of failing extraction with a bare 400.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    /// Page 1 when absent. A value that is not a number is mapped to 0,
    /// which every paginated view rejects as out of range.
    pub fn number(&self) -> u32 {
        match self.page.as_deref() {
            None => 1,
            Some(raw) => raw.parse().unwrap_or(0),
        }
    }
}

/// Builds the shared page chrome. A sidebar fetch failure degrades to an
/// empty widget rather than failing the whole page.
pub(super) async fn layout(
    state: &HttpState,
    auth: &AuthContext,
    meta: PageMetaView,
) -> LayoutContext {
    let sidebar = match state.feed.latest_posts(SIDEBAR_DEFAULT_COUNT).await {
        Ok(sidebar) => sidebar,
        Err(err) => {
            warn!(
                target = "pluma::http::sidebar",
                error = %err,
                "sidebar lookup failed"
            );
            Vec::new()
        }
    };

    LayoutContext::new(meta, auth.username()).with_sidebar(sidebar)
}

async fn index(
    State(state): State<HttpState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<PageQuery>,
    jar: CookieJar,
) -> Response {
    let (jar, messages) = session::take_flash(jar);
    let layout = layout(&state, &auth, PageMetaView::site_default())
        .await
        .with_messages(messages);

    let response = match state
        .feed
        .page_context(FeedFilter::All, query.number())
        .await
    {
        Ok(content) => render_template_response(ListingTemplate { layout, content }, StatusCode::OK),
        Err(err) => feed_error_to_response(err, layout),
    };

    (jar, response).into_response()
}

async fn user_posts(
    State(state): State<HttpState>,
    Extension(auth): Extension<AuthContext>,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> Response {
    let layout = layout(
        &state,
        &auth,
        PageMetaView::for_page(format!("Posts by {username}")),
    )
    .await;

    match state
        .feed
        .page_context(FeedFilter::Author(username), query.number())
        .await
    {
        Ok(content) => render_template_response(ListingTemplate { layout, content }, StatusCode::OK),
        Err(err) => feed_error_to_response(err, layout),
    }
}

async fn post_detail(
    State(state): State<HttpState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Response {
    match state.feed.post_detail(id).await {
        Ok(Some(mut content)) => {
            content.can_edit = auth
                .user
                .as_ref()
                .is_some_and(|user| user.id == content.author_id);
            let layout = layout(&state, &auth, PageMetaView::for_page(content.title.clone())).await;
            render_template_response(PostTemplate { layout, content }, StatusCode::OK)
        }
        Ok(None) => {
            let layout = layout(&state, &auth, PageMetaView::site_default()).await;
            render_not_found_response(layout)
        }
        Err(err) => HttpError::from(err).into_response(),
    }
}

async fn about(State(state): State<HttpState>, Extension(auth): Extension<AuthContext>) -> Response {
    let about = about_view();
    let layout = layout(
        &state,
        &auth,
        PageMetaView::custom(about.meta.title, about.meta.description),
    )
    .await;
    render_template_response(AboutTemplate { layout, about }, StatusCode::OK)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SubscribeForm {
    email: String,
}

async fn subscribe(
    State(state): State<HttpState>,
    jar: CookieJar,
    axum::extract::Form(form): axum::extract::Form<SubscribeForm>,
) -> Response {
    match state.subscriptions.subscribe(&form.email).await {
        Ok(SubscribeOutcome::Subscribed(_)) => {
            let jar = session::push_flash(jar, FlashCode::Subscribed);
            (jar, Redirect::to("/")).into_response()
        }
        Ok(SubscribeOutcome::Invalid) => {
            let jar = session::push_flash(jar, FlashCode::SubscribeInvalid);
            (jar, Redirect::to("/")).into_response()
        }
        Err(err) => HttpError::from(err).into_response(),
    }
}

async fn not_found(
    State(state): State<HttpState>,
    Extension(auth): Extension<AuthContext>,
) -> Response {
    let layout = layout(&state, &auth, PageMetaView::site_default()).await;
    render_not_found_response(layout)
}

async fn public_health(State(state): State<HttpState>) -> Response {
    db_health_response(state.db.health_check().await)
}

pub(super) fn feed_error_to_response(err: FeedError, layout: LayoutContext) -> Response {
    match err {
        FeedError::UnknownAuthor | FeedError::PageOutOfRange(_) => {
            let mut response = render_not_found_response(layout);
            crate::application::error::ErrorReport::from_message(
                "infra::http::public::feed_error_to_response",
                StatusCode::NOT_FOUND,
                err.to_string(),
            )
            .attach(&mut response);
            response
        }
        err => HttpError::from(err).into_response(),
    }
}

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use http_body_util::BodyExt;
use pluma::{
    application::{
        admin::{AdminPostService, AdminSubscriptionService},
        feed::FeedService,
        posts::PostService,
        subscriptions::SubscriptionService,
    },
    infra::db::PostgresRepositories,
    infra::http::{AdminState, HttpState, build_admin_router, build_router},
};
use sqlx::PgPool;
use time::{Duration, OffsetDateTime};
use tower::ServiceExt;
use uuid::Uuid;

pub fn public_router(pool: PgPool) -> Router {
    let repos = Arc::new(PostgresRepositories::new(pool));
    let state = HttpState {
        feed: Arc::new(FeedService::new(repos.clone(), repos.clone())),
        posts: Arc::new(PostService::new(repos.clone(), repos.clone())),
        subscriptions: Arc::new(SubscriptionService::new(repos.clone())),
        users: repos.clone(),
        db: repos,
    };
    build_router(state)
}

pub fn admin_router(pool: PgPool) -> Router {
    let repos = Arc::new(PostgresRepositories::new(pool));
    let state = AdminState {
        posts: Arc::new(AdminPostService::new(repos.clone())),
        subscriptions: Arc::new(AdminSubscriptionService::new(repos.clone())),
        db: repos,
    };
    build_admin_router(state)
}

pub async fn seed_user(pool: &PgPool, username: &str) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO users (id, username) VALUES ($1, $2)")
        .bind(id)
        .bind(username)
        .execute(pool)
        .await
        .expect("seed user");
    id
}

pub async fn seed_session(pool: &PgPool, user_id: Uuid) -> String {
    let token = Uuid::new_v4().to_string();
    sqlx::query("INSERT INTO sessions (token, user_id) VALUES ($1, $2)")
        .bind(&token)
        .bind(user_id)
        .execute(pool)
        .await
        .expect("seed session");
    token
}

/// Inserts a post `age_days` in the past so ordering is deterministic.
pub async fn seed_post(pool: &PgPool, author_id: Uuid, title: &str, age_days: i64) -> Uuid {
    let id = Uuid::new_v4();
    let date_posted = OffsetDateTime::now_utc() - Duration::days(age_days);
    sqlx::query(
        "INSERT INTO posts (id, title, content, date_posted, author_id) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(id)
    .bind(title)
    .bind(format!("Body of {title}"))
    .bind(date_posted)
    .bind(author_id)
    .execute(pool)
    .await
    .expect("seed post");
    id
}

pub async fn get(router: &Router, uri: &str) -> Response<Body> {
    router
        .clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("route request")
}

pub async fn get_with_session(router: &Router, uri: &str, token: &str) -> Response<Body> {
    router
        .clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .header(header::COOKIE, format!("session={token}"))
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("route request")
}

pub async fn post_form(
    router: &Router,
    uri: &str,
    body: &str,
    session: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(token) = session {
        builder = builder.header(header::COOKIE, format!("session={token}"));
    }
    router
        .clone()
        .oneshot(builder.body(Body::from(body.to_string())).expect("build request"))
        .await
        .expect("route request")
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

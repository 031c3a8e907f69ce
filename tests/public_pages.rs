mod common;

use axum::http::StatusCode;
use sqlx::PgPool;
use uuid::Uuid;

use common::{body_text, get, public_router, seed_post, seed_user};

#[sqlx::test(migrations = "./migrations")]
async fn homepage_lists_posts_newest_first(pool: PgPool) {
    let author = seed_user(&pool, "ada").await;
    seed_post(&pool, author, "Oldest", 3).await;
    seed_post(&pool, author, "Middle", 2).await;
    seed_post(&pool, author, "Newest", 1).await;

    let router = public_router(pool);
    let response = get(&router, "/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    let newest = body.find("Newest").expect("newest post rendered");
    let middle = body.find("Middle").expect("middle post rendered");
    let oldest = body.find("Oldest").expect("oldest post rendered");
    assert!(newest < middle && middle < oldest);
}

#[sqlx::test(migrations = "./migrations")]
async fn homepage_caps_listing_at_five_posts(pool: PgPool) {
    let author = seed_user(&pool, "ada").await;
    for age in 1..=7 {
        seed_post(&pool, author, &format!("Post {age}"), age).await;
    }

    let router = public_router(pool);
    let body = body_text(get(&router, "/").await).await;

    // Card bodies only appear in the listing, never in the sidebar, so they
    // distinguish the page's own posts from the latest-posts widget.
    assert!(body.contains("Body of Post 1"));
    assert!(body.contains("Body of Post 5"));
    assert!(!body.contains("Body of Post 6"));
    assert!(!body.contains("Body of Post 7"));

    let page_two = body_text(get(&router, "/?page=2").await).await;
    assert!(page_two.contains("Body of Post 6"));
    assert!(page_two.contains("Body of Post 7"));
    assert!(!page_two.contains("Body of Post 1"));
}

#[sqlx::test(migrations = "./migrations")]
async fn out_of_range_page_is_not_found(pool: PgPool) {
    let author = seed_user(&pool, "ada").await;
    seed_post(&pool, author, "Only", 1).await;

    let router = public_router(pool);
    assert_eq!(get(&router, "/?page=2").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(get(&router, "/?page=0").await.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn non_numeric_page_renders_the_error_page(pool: PgPool) {
    let author = seed_user(&pool, "ada").await;
    seed_post(&pool, author, "Only", 1).await;

    let router = public_router(pool);
    for uri in ["/?page=abc", "/?page=", "/user/ada?page=-1"] {
        let response = get(&router, uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("Page Not Found"));
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn empty_homepage_still_renders_page_one(pool: PgPool) {
    let router = public_router(pool);
    let response = get(&router, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("No posts yet."));
}

#[sqlx::test(migrations = "./migrations")]
async fn blog_alias_serves_the_same_listing(pool: PgPool) {
    let author = seed_user(&pool, "ada").await;
    seed_post(&pool, author, "Shared", 1).await;

    let router = public_router(pool);
    let response = get(&router, "/blog").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Shared"));
}

#[sqlx::test(migrations = "./migrations")]
async fn user_listing_filters_by_author(pool: PgPool) {
    let ada = seed_user(&pool, "ada").await;
    let grace = seed_user(&pool, "grace").await;
    seed_post(&pool, ada, "By Ada", 2).await;
    seed_post(&pool, grace, "By Grace", 1).await;

    let router = public_router(pool);
    let body = body_text(get(&router, "/user/ada").await).await;
    assert!(body.contains("Body of By Ada"));
    assert!(!body.contains("Body of By Grace"));
    assert!(body.contains("Posts by ada"));
}

#[sqlx::test(migrations = "./migrations")]
async fn unknown_author_is_not_found_but_empty_author_is_ok(pool: PgPool) {
    seed_user(&pool, "ada").await;

    let router = public_router(pool);
    assert_eq!(
        get(&router, "/user/nobody").await.status(),
        StatusCode::NOT_FOUND
    );

    // Registered user with zero posts gets an empty page, not a 404.
    let response = get(&router, "/user/ada").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("No posts yet."));
}

#[sqlx::test(migrations = "./migrations")]
async fn post_detail_renders_or_404s(pool: PgPool) {
    let author = seed_user(&pool, "ada").await;
    let id = seed_post(&pool, author, "Readable", 1).await;

    let router = public_router(pool);
    let response = get(&router, &format!("/post/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Readable"));
    // Anonymous viewers never see the edit controls.
    assert!(!body.contains("/update"));

    let missing = Uuid::new_v4();
    assert_eq!(
        get(&router, &format!("/post/{missing}")).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn sidebar_shows_at_most_five_latest_posts(pool: PgPool) {
    let author = seed_user(&pool, "ada").await;
    for age in 1..=8 {
        seed_post(&pool, author, &format!("Sidebar {age}"), age).await;
    }

    let router = public_router(pool);
    // The about page has no listing of its own, so every post title in the
    // body comes from the sidebar widget.
    let body = body_text(get(&router, "/about").await).await;
    assert!(body.contains("Sidebar 1"));
    assert!(body.contains("Sidebar 5"));
    assert!(!body.contains("Sidebar 6"));
}

#[sqlx::test(migrations = "./migrations")]
async fn about_page_renders_static_content(pool: PgPool) {
    let router = public_router(pool);
    let response = get(&router, "/about").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Empowering Content Creators Worldwide"));
    assert!(body.contains("Alex Chen"));
    assert!(body.contains("10K+"));
}

#[sqlx::test(migrations = "./migrations")]
async fn unknown_route_renders_the_error_page(pool: PgPool) {
    let router = public_router(pool);
    let response = get(&router, "/no-such-page").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("Page Not Found"));
}

#[sqlx::test(migrations = "./migrations")]
async fn health_endpoint_reports_db_reachable(pool: PgPool) {
    let router = public_router(pool);
    assert_eq!(
        get(&router, "/_health/db").await.status(),
        StatusCode::NO_CONTENT
    );
}

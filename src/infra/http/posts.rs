//! Authenticated post create, update, and delete handlers.

use axum::{
    Extension,
    extract::{Form, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    application::{
        error::HttpError,
        posts::{PostFormInput, PostMutationError},
    },
    domain::entities::UserRecord,
    presentation::views::{
        DeleteConfirmTemplate, DeleteConfirmView, PageMetaView, PostFormTemplate, PostFormView,
        render_not_found_response, render_template_response,
    },
};

use super::{
    public::{HttpState, layout},
    session::AuthContext,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct PostForm {
    title: String,
    content: String,
}

impl From<PostForm> for PostFormInput {
    fn from(form: PostForm) -> Self {
        Self {
            title: form.title,
            content: form.content,
        }
    }
}

fn require_user<'a>(auth: &'a AuthContext, source: &'static str) -> Result<&'a UserRecord, HttpError> {
    auth.user
        .as_ref()
        .ok_or_else(|| HttpError::unauthorized(source, "no valid session cookie on request"))
}

pub(super) async fn new_post_form(
    State(state): State<HttpState>,
    Extension(auth): Extension<AuthContext>,
) -> Response {
    if let Err(err) = require_user(&auth, "infra::http::posts::new_post_form") {
        return err.into_response();
    }

    let layout = layout(&state, &auth, PageMetaView::for_page("New Post")).await;
    render_template_response(
        PostFormTemplate {
            layout,
            form: PostFormView::create(),
        },
        StatusCode::OK,
    )
}

pub(super) async fn create_post(
    State(state): State<HttpState>,
    Extension(auth): Extension<AuthContext>,
    Form(form): Form<PostForm>,
) -> Response {
    let author = match require_user(&auth, "infra::http::posts::create_post") {
        Ok(user) => user.clone(),
        Err(err) => return err.into_response(),
    };

    match state.posts.create(&author, PostFormInput::from(form)).await {
        Ok(record) => Redirect::to(&format!("/post/{}", record.id)).into_response(),
        Err(PostMutationError::Validation(errors)) => {
            let layout = layout(&state, &auth, PageMetaView::for_page("New Post")).await;
            render_template_response(
                PostFormTemplate {
                    layout,
                    form: PostFormView::create().with_errors(errors),
                },
                StatusCode::OK,
            )
        }
        Err(err) => mutation_error_to_response(err, &state, &auth).await,
    }
}

pub(super) async fn edit_post_form(
    State(state): State<HttpState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Response {
    let actor = match require_user(&auth, "infra::http::posts::edit_post_form") {
        Ok(user) => user.clone(),
        Err(err) => return err.into_response(),
    };

    match state.posts.edit_target(&actor, id).await {
        Ok(post) => {
            let layout = layout(&state, &auth, PageMetaView::for_page("Update Post")).await;
            render_template_response(
                PostFormTemplate {
                    layout,
                    form: PostFormView::update(post.id, post.title, post.content),
                },
                StatusCode::OK,
            )
        }
        Err(err) => mutation_error_to_response(err, &state, &auth).await,
    }
}

pub(super) async fn update_post(
    State(state): State<HttpState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Form(form): Form<PostForm>,
) -> Response {
    let actor = match require_user(&auth, "infra::http::posts::update_post") {
        Ok(user) => user.clone(),
        Err(err) => return err.into_response(),
    };

    let title = form.title.clone();
    let content = form.content.clone();

    match state.posts.update(&actor, id, PostFormInput::from(form)).await {
        Ok(record) => Redirect::to(&format!("/post/{}", record.id)).into_response(),
        Err(PostMutationError::Validation(errors)) => {
            let layout = layout(&state, &auth, PageMetaView::for_page("Update Post")).await;
            render_template_response(
                PostFormTemplate {
                    layout,
                    form: PostFormView::update(id, title, content).with_errors(errors),
                },
                StatusCode::OK,
            )
        }
        Err(err) => mutation_error_to_response(err, &state, &auth).await,
    }
}

pub(super) async fn delete_post_confirm(
    State(state): State<HttpState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Response {
    let actor = match require_user(&auth, "infra::http::posts::delete_post_confirm") {
        Ok(user) => user.clone(),
        Err(err) => return err.into_response(),
    };

    match state.posts.edit_target(&actor, id).await {
        Ok(post) => {
            let layout = layout(&state, &auth, PageMetaView::for_page("Delete Post")).await;
            render_template_response(
                DeleteConfirmTemplate {
                    layout,
                    post: DeleteConfirmView {
                        id: post.id,
                        title: post.title,
                    },
                },
                StatusCode::OK,
            )
        }
        Err(err) => mutation_error_to_response(err, &state, &auth).await,
    }
}

pub(super) async fn delete_post(
    State(state): State<HttpState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Response {
    let actor = match require_user(&auth, "infra::http::posts::delete_post") {
        Ok(user) => user.clone(),
        Err(err) => return err.into_response(),
    };

    match state.posts.delete(&actor, id).await {
        Ok(()) => Redirect::to("/").into_response(),
        Err(err) => mutation_error_to_response(err, &state, &auth).await,
    }
}

async fn mutation_error_to_response(
    err: PostMutationError,
    state: &HttpState,
    auth: &AuthContext,
) -> Response {
    match err {
        PostMutationError::NotFound => {
            let layout = layout(state, auth, PageMetaView::site_default()).await;
            render_not_found_response(layout)
        }
        PostMutationError::NotOwner => HttpError::forbidden(
            "infra::http::posts::mutation_error_to_response",
            "authenticated user is not the post's author",
        )
        .into_response(),
        PostMutationError::Validation(_) => HttpError::new(
            "infra::http::posts::mutation_error_to_response",
            StatusCode::UNPROCESSABLE_ENTITY,
            "Invalid form submission",
            "validation error escaped the form handler",
        )
        .into_response(),
        PostMutationError::Repo(err) => HttpError::from(err).into_response(),
    }
}

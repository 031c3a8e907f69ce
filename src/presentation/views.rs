use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use time::{OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};
use uuid::Uuid;

use crate::application::about::AboutView;
use crate::application::error::{ErrorReport, HttpError};
use crate::application::posts::PostFormErrors;
use crate::application::repos::PostListItem;
use crate::domain::entities::SubscriptionRecord;

const SITE_TITLE: &str = "Pluma Blog";
const SITE_DESCRIPTION: &str = "A small multi-author blog.";

const PUBLISHED_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[month repr:long] [day padding:none], [year]");

/// Human-readable publication date, e.g. `August 24, 2026`.
pub fn format_published(ts: OffsetDateTime) -> String {
    ts.format(PUBLISHED_FORMAT)
        .unwrap_or_else(|_| ts.date().to_string())
}

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn render_not_found_response(layout: LayoutContext) -> Response {
    let error = ErrorPageView::not_found();
    let mut response =
        render_template_response(ErrorTemplate { layout, error }, StatusCode::NOT_FOUND);
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        "Resource not found",
    )
    .attach(&mut response);
    response
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
}

impl FlashKind {
    pub fn css_class(&self) -> &'static str {
        match self {
            FlashKind::Success => "success",
            FlashKind::Error => "danger",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FlashMessage {
    pub kind: FlashKind,
    pub text: String,
}

#[derive(Clone)]
pub struct PageMetaView {
    pub title: String,
    pub description: String,
}

impl PageMetaView {
    pub fn site_default() -> Self {
        Self {
            title: SITE_TITLE.to_string(),
            description: SITE_DESCRIPTION.to_string(),
        }
    }

    pub fn for_page(title: impl Into<String>) -> Self {
        Self {
            title: format!("{} | {SITE_TITLE}", title.into()),
            description: SITE_DESCRIPTION.to_string(),
        }
    }

    pub fn custom(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Per-request chrome shared by every public template: meta tags, the
/// signed-in username, flash messages, and the sidebar widget.
#[derive(Clone)]
pub struct LayoutContext {
    pub meta: PageMetaView,
    pub current_user: Option<String>,
    pub messages: Vec<FlashMessage>,
    pub sidebar: Vec<SidebarPostView>,
}

impl LayoutContext {
    pub fn new(meta: PageMetaView, current_user: Option<String>) -> Self {
        Self {
            meta,
            current_user,
            messages: Vec::new(),
            sidebar: Vec::new(),
        }
    }

    pub fn with_sidebar(mut self, sidebar: Vec<SidebarPostView>) -> Self {
        self.sidebar = sidebar;
        self
    }

    pub fn with_messages(mut self, messages: Vec<FlashMessage>) -> Self {
        self.messages = messages;
        self
    }
}

#[derive(Clone)]
pub struct SidebarPostView {
    pub id: Uuid,
    pub title: String,
    pub published: String,
}

#[derive(Clone, Debug)]
pub struct PostCard {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author: String,
    pub published: String,
}

#[derive(Debug)]
pub struct ListingContext {
    pub heading: Option<String>,
    pub posts: Vec<PostCard>,
    pub total_count: u64,
    pub page_number: u32,
    pub page_count: u32,
    pub has_previous: bool,
    pub has_next: bool,
    pub previous_page: u32,
    pub next_page: u32,
    pub base_path: String,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct ListingTemplate {
    pub layout: LayoutContext,
    pub content: ListingContext,
}

pub struct PostDetailContext {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author: String,
    pub author_id: Uuid,
    pub published: String,
    /// True when the viewer is the post's author; shows the edit controls.
    pub can_edit: bool,
}

#[derive(Template)]
#[template(path = "post.html")]
pub struct PostTemplate {
    pub layout: LayoutContext,
    pub content: PostDetailContext,
}

pub struct PostFormView {
    pub heading: &'static str,
    pub submit_label: &'static str,
    pub action: String,
    pub title_value: String,
    pub content_value: String,
    pub errors: PostFormErrors,
}

impl PostFormView {
    pub fn create() -> Self {
        Self {
            heading: "New Post",
            submit_label: "Post",
            action: "/post/new".to_string(),
            title_value: String::new(),
            content_value: String::new(),
            errors: PostFormErrors::default(),
        }
    }

    pub fn update(id: Uuid, title: String, content: String) -> Self {
        Self {
            heading: "Update Post",
            submit_label: "Update",
            action: format!("/post/{id}/update"),
            title_value: title,
            content_value: content,
            errors: PostFormErrors::default(),
        }
    }

    pub fn with_errors(mut self, errors: PostFormErrors) -> Self {
        self.errors = errors;
        self
    }
}

#[derive(Template)]
#[template(path = "post_form.html")]
pub struct PostFormTemplate {
    pub layout: LayoutContext,
    pub form: PostFormView,
}

pub struct DeleteConfirmView {
    pub id: Uuid,
    pub title: String,
}

#[derive(Template)]
#[template(path = "post_delete.html")]
pub struct DeleteConfirmTemplate {
    pub layout: LayoutContext,
    pub post: DeleteConfirmView,
}

#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub layout: LayoutContext,
    pub about: AboutView,
}

pub struct ErrorPageView {
    pub title: String,
    pub message: String,
}

impl ErrorPageView {
    pub fn not_found() -> Self {
        Self {
            title: "Page Not Found".to_string(),
            message: "The page you requested does not exist. Try returning to the homepage."
                .to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub layout: LayoutContext,
    pub error: ErrorPageView,
}

/// Admin post table row with the timestamp already formatted for display.
pub struct AdminPostRow {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub published: String,
}

impl From<PostListItem> for AdminPostRow {
    fn from(item: PostListItem) -> Self {
        Self {
            id: item.id,
            title: item.title,
            author: item.author_username,
            published: format_published(item.date_posted),
        }
    }
}

#[derive(Template)]
#[template(path = "admin/posts.html")]
pub struct AdminPostsTemplate {
    pub rows: Vec<AdminPostRow>,
    pub total: u64,
    pub page_number: u32,
    pub page_count: u32,
    pub has_previous: bool,
    pub has_next: bool,
}

pub struct AdminSubscriptionRow {
    pub email: String,
    pub created_at: String,
}

impl From<SubscriptionRecord> for AdminSubscriptionRow {
    fn from(record: SubscriptionRecord) -> Self {
        Self {
            email: record.email,
            created_at: format_published(record.created_at),
        }
    }
}

#[derive(Template)]
#[template(path = "admin/subscriptions.html")]
pub struct AdminSubscriptionsTemplate {
    pub rows: Vec<AdminSubscriptionRow>,
    pub search: String,
}

//! Session-cookie identity resolution and flash messages.
//!
//! Sessions are provisioned outside this codebase (there is no login or
//! registration surface); a request carrying a known session token acts as
//! that user, anything else is anonymous.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use tracing::warn;

use crate::domain::entities::UserRecord;
use crate::presentation::views::{FlashKind, FlashMessage};

use super::public::HttpState;

pub const SESSION_COOKIE: &str = "session";
pub const FLASH_COOKIE: &str = "flash";

const FLASH_SUBSCRIBED: &str = "subscribed";
const FLASH_SUBSCRIBE_INVALID: &str = "subscribe-invalid";

/// Identity resolved for the current request, inserted into request
/// extensions by [`resolve_identity`].
#[derive(Clone)]
pub struct AuthContext {
    pub user: Option<UserRecord>,
}

impl AuthContext {
    pub fn username(&self) -> Option<String> {
        self.user.as_ref().map(|user| user.username.clone())
    }
}

pub async fn resolve_identity(
    State(state): State<HttpState>,
    jar: CookieJar,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let user = match jar.get(SESSION_COOKIE) {
        Some(cookie) => match state.users.user_for_session(cookie.value()).await {
            Ok(user) => user,
            Err(err) => {
                // A failed lookup downgrades the request to anonymous; the
                // handler decides whether authentication is required.
                warn!(
                    target = "pluma::http::session",
                    error = %err,
                    "session lookup failed"
                );
                None
            }
        },
        None => None,
    };

    request.extensions_mut().insert(AuthContext { user });
    next.run(request).await
}

/// Queue a flash message for the next rendered page. Messages travel as a
/// short code in a cookie, never as free text.
pub fn push_flash(jar: CookieJar, code: FlashCode) -> CookieJar {
    let mut cookie = Cookie::new(FLASH_COOKIE, code.as_str());
    cookie.set_path("/");
    jar.add(cookie)
}

/// Consume any pending flash message: returns the jar with the cookie
/// cleared plus the decoded messages for the layout.
pub fn take_flash(jar: CookieJar) -> (CookieJar, Vec<FlashMessage>) {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return (jar, Vec::new());
    };

    let messages = decode_flash(cookie.value()).into_iter().collect();
    let mut removal = Cookie::from(FLASH_COOKIE);
    removal.set_path("/");
    (jar.remove(removal), messages)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashCode {
    Subscribed,
    SubscribeInvalid,
}

impl FlashCode {
    fn as_str(self) -> &'static str {
        match self {
            FlashCode::Subscribed => FLASH_SUBSCRIBED,
            FlashCode::SubscribeInvalid => FLASH_SUBSCRIBE_INVALID,
        }
    }
}

fn decode_flash(code: &str) -> Option<FlashMessage> {
    match code {
        FLASH_SUBSCRIBED => Some(FlashMessage {
            kind: FlashKind::Success,
            text: "Thanks for subscribing!".to_string(),
        }),
        FLASH_SUBSCRIBE_INVALID => Some(FlashMessage {
            kind: FlashKind::Error,
            text: "Please enter a valid email address.".to_string(),
        }),
        _ => None,
    }
}

//! Visitor sessions are tracked with a single random token in the `spg_session` cookie. All session state lives in
//! the database; the cookie carries nothing else.
use std::future::{ready, Ready};

use actix_web::{
    cookie::{Cookie, SameSite},
    dev::Payload,
    FromRequest,
    HttpRequest,
    HttpResponseBuilder,
};
use spg_engine::db_types::{Session, SessionId};

pub const SESSION_COOKIE: &str = "spg_session";

/// The session token presented by the browser, if any. Extracting it never fails.
#[derive(Debug, Clone, Default)]
pub struct SessionCookie(pub Option<SessionId>);

impl SessionCookie {
    pub fn id(&self) -> Option<&SessionId> {
        self.0.as_ref()
    }

    /// Sets the cookie on the response if `session` is not the one the browser presented, i.e. when a new session
    /// was started.
    pub fn refresh(&self, res: &mut HttpResponseBuilder, session: &Session) {
        if self.id() != Some(&session.id) {
            res.cookie(session_cookie(&session.id));
        }
    }
}

impl FromRequest for SessionCookie {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let id = req
            .cookie(SESSION_COOKIE)
            .map(|c| c.value().trim().to_string())
            .filter(|v| !v.is_empty())
            .map(SessionId::from);
        ready(Ok(Self(id)))
    }
}

pub fn session_cookie(id: &SessionId) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, id.as_str().to_string()).path("/").http_only(true).same_site(SameSite::Lax).finish()
}

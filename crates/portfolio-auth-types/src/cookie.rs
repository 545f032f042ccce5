//! Cookie builders for the admin session token.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

/// Cookie name for the admin session token.
pub const ADMIN_SESSION_COOKIE: &str = "portfolio_admin_session";

/// Session JWT lifetime and cookie Max-Age in seconds (4 hours).
pub const SESSION_TOKEN_EXP: u64 = 14400;

/// Set the session cookie on the jar.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use portfolio_auth_types::cookie::{set_session_cookie, ADMIN_SESSION_COOKIE};
///
/// let jar = CookieJar::new();
/// let jar = set_session_cookie(jar, "token_value".to_string(), "example.com".to_string());
/// let cookie = jar.get(ADMIN_SESSION_COOKIE).unwrap();
/// assert_eq!(cookie.value(), "token_value");
/// assert_eq!(cookie.path(), Some("/"));
/// assert_eq!(cookie.domain(), Some("example.com"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(14400)));
/// assert!(cookie.http_only().unwrap_or(false));
/// assert!(cookie.secure().unwrap_or(false));
/// ```
pub fn set_session_cookie(jar: CookieJar, value: String, domain: String) -> CookieJar {
    jar.add(session_cookie(value, domain, Duration::seconds(SESSION_TOKEN_EXP as i64)))
}

/// Clear the session cookie by setting Max-Age to 0.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use portfolio_auth_types::cookie::{
///     clear_session_cookie, set_session_cookie, ADMIN_SESSION_COOKIE,
/// };
///
/// let jar = CookieJar::new();
/// let jar = set_session_cookie(jar, "t".to_string(), "example.com".to_string());
/// let jar = clear_session_cookie(jar, "example.com".to_string());
/// let cookie = jar.get(ADMIN_SESSION_COOKIE).unwrap();
/// assert_eq!(cookie.value(), "");
/// assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
/// ```
pub fn clear_session_cookie(jar: CookieJar, domain: String) -> CookieJar {
    jar.add(session_cookie(String::new(), domain, Duration::ZERO))
}

fn session_cookie(value: String, domain: String, max_age: Duration) -> Cookie<'static> {
    Cookie::build((ADMIN_SESSION_COOKIE, value))
        .path("/")
        .domain(domain)
        .max_age(max_age)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build()
}

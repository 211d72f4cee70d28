use actix_web::cookie::{time::Duration, Cookie, SameSite};

pub const ACCESS_COOKIE: &str = "access";
pub const REFRESH_COOKIE: &str = "refresh";
pub const OAUTH2_STATE_COOKIE: &str = "oauth2_state";

const OAUTH2_STATE_TTL_SECS: i64 = 300;

pub fn auth_cookie(name: &'static str, value: String, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build(name, value)
        .path("/")
        .http_only(true)
        .secure(secure)
        // SameSite=None требует Secure, иначе браузер отбросит cookie
        .same_site(if secure { SameSite::None } else { SameSite::Lax })
        .max_age(Duration::seconds(max_age_secs))
        .finish()
}

pub fn oauth2_state_cookie(state: String, secure: bool) -> Cookie<'static> {
    auth_cookie(OAUTH2_STATE_COOKIE, state, OAUTH2_STATE_TTL_SECS, secure)
}

/// Cookie with the same attributes and `Max-Age=0`, so the browser drops it.
pub fn expired_cookie(name: &'static str, secure: bool) -> Cookie<'static> {
    auth_cookie(name, String::new(), 0, secure)
}

use std::sync::Arc;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::Url;
use tracing::warn;

/// Cookie that carries the anti-forgery token.
pub const CSRF_COOKIE: &str = "csrftoken";

/// Value of the first `csrftoken` entry in a `k=v; k=v` cookie string.
/// Values are returned exactly as stored, without any decoding.
pub fn csrf_token(cookies: &str) -> Option<String> {
    cookie_value(cookies, CSRF_COOKIE)
}

fn cookie_value(cookies: &str, name: &str) -> Option<String> {
    cookies.split(';').find_map(|entry| {
        let (key, value) = entry.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

/// Session cookies for the download server, shared by every clone of the API client.
///
/// The jar is handed to reqwest as its cookie provider, so `Set-Cookie` headers
/// (including expirations) are applied and the `Cookie` header is sent without
/// any help from the caller.
#[derive(Debug, Clone)]
pub struct SessionCookies {
    jar: Arc<Jar>,
    origin: Option<Url>,
}

impl SessionCookies {
    /// Seed the jar from a `k=v; k=v` string scoped to `origin`.
    pub fn new(origin: &str, raw: &str) -> Self {
        let jar = Arc::new(Jar::default());
        let origin = match Url::parse(origin) {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(origin, error = %e, "Server URL is invalid, cookies disabled");
                None
            }
        };

        if let Some(url) = &origin {
            for pair in raw.split(';').map(str::trim).filter(|p| p.contains('=')) {
                jar.add_cookie_str(pair, url);
            }
        }

        Self { jar, origin }
    }

    pub fn jar(&self) -> Arc<Jar> {
        Arc::clone(&self.jar)
    }

    /// Cookies the jar would send to the server right now, as `k=v; k=v`.
    pub fn header_value(&self) -> String {
        self.origin
            .as_ref()
            .and_then(|url| self.jar.cookies(url))
            .and_then(|value| value.to_str().ok().map(str::to_string))
            .unwrap_or_default()
    }

    /// Re-read on every call so a token issued mid-session is picked up.
    pub fn csrf_token(&self) -> Option<String> {
        csrf_token(&self.header_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    const ORIGIN: &str = "http://127.0.0.1:8000/";

    #[test]
    fn test_token_found_among_other_cookies() {
        let cookies = "sessionid=abc; csrftoken=tok123; theme=dark";
        assert_eq!(csrf_token(cookies), Some("tok123".to_string()));
    }

    #[test]
    fn test_first_matching_entry_wins() {
        assert_eq!(
            csrf_token("csrftoken=first;csrftoken=second"),
            Some("first".to_string())
        );
    }

    #[test]
    fn test_key_must_match_exactly() {
        assert_eq!(csrf_token("xcsrftoken=a; csrftokens=b; CSRFTOKEN=c"), None);
    }

    #[test]
    fn test_missing_or_malformed_store_yields_none() {
        assert_eq!(csrf_token(""), None);
        assert_eq!(csrf_token(";;; novalue ; ="), None);
        assert_eq!(csrf_token("sessionid=abc"), None);
    }

    #[test]
    fn test_value_is_not_decoded() {
        assert_eq!(csrf_token("csrftoken=a%20b"), Some("a%20b".to_string()));
        // Only the first '=' separates key from value.
        assert_eq!(csrf_token("csrftoken=a=b"), Some("a=b".to_string()));
    }

    #[test]
    fn test_seeded_cookies_are_readable() {
        let cookies = SessionCookies::new(ORIGIN, "sessionid=abc; csrftoken=seed; junk");
        assert_eq!(cookies.csrf_token(), Some("seed".to_string()));
        assert!(cookies.header_value().contains("sessionid=abc"));
    }

    #[test]
    fn test_expired_set_cookie_removes_token() {
        let cookies = SessionCookies::new(ORIGIN, "csrftoken=old");
        let url = Url::parse(ORIGIN).unwrap();
        let deletion = HeaderValue::from_static(
            "csrftoken=\"\"; expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=0; Path=/",
        );

        cookies
            .jar()
            .set_cookies(&mut std::iter::once(&deletion), &url);

        assert_eq!(cookies.csrf_token(), None);
    }

    #[test]
    fn test_clones_share_one_jar() {
        let cookies = SessionCookies::new(ORIGIN, "");
        let clone = cookies.clone();
        assert_eq!(cookies.csrf_token(), None);

        let url = Url::parse(ORIGIN).unwrap();
        let issued = HeaderValue::from_static("csrftoken=shared; Path=/; SameSite=Lax");
        clone.jar().set_cookies(&mut std::iter::once(&issued), &url);

        assert_eq!(cookies.csrf_token(), Some("shared".to_string()));
    }

    #[test]
    fn test_invalid_origin_disables_cookies() {
        let cookies = SessionCookies::new("not a url", "csrftoken=x");
        assert_eq!(cookies.csrf_token(), None);
        assert_eq!(cookies.header_value(), "");
    }
}

//! Cookie-borne session credentials.
//!
//! A [`SessionJar`] is built from the incoming `Cookie` header for a single
//! request. Identity provider calls read tokens from it and stage rotated
//! credentials onto it; the HTTP layer later renders the staged operations as
//! `Set-Cookie` headers and forwards the effective cookies downstream.

use std::collections::BTreeMap;

use chrono::Duration;

/// Cookie holding the short-lived access token.
pub const ACCESS_TOKEN_COOKIE: &str = "sb-access-token";

/// Cookie holding the rotating refresh token.
pub const REFRESH_TOKEN_COOKIE: &str = "sb-refresh-token";

/// Lifetime of the refresh-token cookie in the browser.
pub const REFRESH_COOKIE_MAX_AGE_DAYS: i64 = 30;

/// Tokens issued by the identity provider when a session is established or
/// refreshed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionGrant {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: Duration,
}

/// A cookie mutation to send back to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieOp {
    Set {
        name: String,
        value: String,
        max_age: Option<Duration>,
    },
    Remove {
        name: String,
    },
}

impl CookieOp {
    pub fn name(&self) -> &str {
        match self {
            CookieOp::Set { name, .. } | CookieOp::Remove { name } => name,
        }
    }

    /// Render as a `Set-Cookie` header value.
    pub fn to_header_value(&self, secure: bool) -> String {
        let mut out = match self {
            CookieOp::Set {
                name,
                value,
                max_age,
            } => {
                let mut s = format!("{name}={value}; Path=/");
                if let Some(max_age) = max_age {
                    s.push_str(&format!("; Max-Age={}", max_age.num_seconds().max(0)));
                }
                s
            }
            CookieOp::Remove { name } => format!("{name}=; Path=/; Max-Age=0"),
        };
        out.push_str("; HttpOnly; SameSite=Lax");
        if secure {
            out.push_str("; Secure");
        }
        out
    }
}

/// Request-scoped view of the session cookies plus the mutations staged
/// while handling the request.
#[derive(Debug, Clone, Default)]
pub struct SessionJar {
    cookies: BTreeMap<String, String>,
    staged: Vec<CookieOp>,
}

impl SessionJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `Cookie` header (`a=1; b=2`). Malformed pairs are skipped and the
    /// first occurrence of a name wins.
    pub fn from_cookie_header(header: Option<&str>) -> Self {
        let mut cookies = BTreeMap::new();
        for pair in header.unwrap_or_default().split(';') {
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            cookies
                .entry(name.to_string())
                .or_insert_with(|| value.to_string());
        }
        Self {
            cookies,
            staged: Vec::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Stage a cookie and make it visible to later reads in this request.
    pub fn set(&mut self, name: &str, value: impl Into<String>, max_age: Option<Duration>) {
        let value = value.into();
        self.cookies.insert(name.to_string(), value.clone());
        self.staged.push(CookieOp::Set {
            name: name.to_string(),
            value,
            max_age,
        });
    }

    /// Stage a cookie removal and hide it from later reads in this request.
    pub fn remove(&mut self, name: &str) {
        self.cookies.remove(name);
        self.staged.push(CookieOp::Remove {
            name: name.to_string(),
        });
    }

    /// Operations staged so far, in the order they were made.
    pub fn staged(&self) -> &[CookieOp] {
        &self.staged
    }

    pub fn into_staged(self) -> Vec<CookieOp> {
        self.staged
    }

    /// Effective cookies re-serialised for the downstream request, or `None`
    /// when nothing is left.
    pub fn request_cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    pub fn access_token(&self) -> Option<&str> {
        self.get(ACCESS_TOKEN_COOKIE).filter(|t| !t.is_empty())
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.get(REFRESH_TOKEN_COOKIE).filter(|t| !t.is_empty())
    }

    /// Stage both session cookies from a fresh grant.
    pub fn store_session(&mut self, grant: &SessionGrant) {
        self.set(
            ACCESS_TOKEN_COOKIE,
            grant.access_token.clone(),
            Some(grant.expires_in),
        );
        self.set(
            REFRESH_TOKEN_COOKIE,
            grant.refresh_token.clone(),
            Some(Duration::days(REFRESH_COOKIE_MAX_AGE_DAYS)),
        );
    }

    /// Stage removal of both session cookies.
    pub fn clear_session(&mut self) {
        self.remove(ACCESS_TOKEN_COOKIE);
        self.remove(REFRESH_TOKEN_COOKIE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pairs_and_skips_garbage() {
        let jar = SessionJar::from_cookie_header(Some("a=1; junk; =x; b=\"two\"; a=3"));
        assert_eq!(jar.get("a"), Some("1"));
        assert_eq!(jar.get("b"), Some("two"));
        assert_eq!(jar.get("junk"), None);
        assert!(jar.staged().is_empty());
    }

    #[test]
    fn staged_set_is_visible_to_later_reads() {
        let mut jar = SessionJar::from_cookie_header(Some("sb-access-token=old; theme=dark"));
        jar.set(ACCESS_TOKEN_COOKIE, "new", Some(Duration::hours(1)));

        assert_eq!(jar.access_token(), Some("new"));
        assert_eq!(
            jar.request_cookie_header().as_deref(),
            Some("sb-access-token=new; theme=dark")
        );
        assert_eq!(jar.staged().len(), 1);
    }

    #[test]
    fn clear_session_removes_both_tokens() {
        let mut jar = SessionJar::from_cookie_header(Some(
            "sb-access-token=a; sb-refresh-token=r",
        ));
        jar.clear_session();

        assert_eq!(jar.access_token(), None);
        assert_eq!(jar.refresh_token(), None);
        assert_eq!(jar.request_cookie_header(), None);
        let names: Vec<_> = jar.staged().iter().map(CookieOp::name).collect();
        assert_eq!(names, vec![ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE]);
    }

    #[test]
    fn set_cookie_rendering() {
        let set = CookieOp::Set {
            name: "sb-access-token".into(),
            value: "abc".into(),
            max_age: Some(Duration::seconds(3600)),
        };
        assert_eq!(
            set.to_header_value(true),
            "sb-access-token=abc; Path=/; Max-Age=3600; HttpOnly; SameSite=Lax; Secure"
        );

        let remove = CookieOp::Remove {
            name: "sb-refresh-token".into(),
        };
        assert_eq!(
            remove.to_header_value(false),
            "sb-refresh-token=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax"
        );
    }

    #[test]
    fn empty_token_cookie_counts_as_absent() {
        let jar = SessionJar::from_cookie_header(Some("sb-access-token="));
        assert_eq!(jar.access_token(), None);
    }
}

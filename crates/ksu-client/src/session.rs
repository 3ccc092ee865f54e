//! Session cookie jar.
//!
//! Holds the cookies that make up the signed-in session. Cookies are keyed
//! by host; path, domain and the secure flag are not tracked, and a cookie
//! is either live or gone. A `Set-Cookie` whose `Max-Age` is zero or less,
//! or whose `Expires` lies in the past, deletes the cookie, which is how
//! servers end a session.

use std::collections::{BTreeMap, HashMap};

use cookie::time::{Duration, OffsetDateTime};
use cookie::Cookie;
use parking_lot::RwLock;
use reqwest::header::HeaderValue;
use url::Url;

/// Thread-safe cookie store shared between a client and its sign-out hook.
#[derive(Debug, Default)]
pub struct SessionJar {
    hosts: RwLock<HashMap<String, BTreeMap<String, String>>>,
}

impl SessionJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a cookie for the host of `url`. URLs without a host are ignored.
    pub fn insert(&self, url: &Url, name: impl Into<String>, value: impl Into<String>) {
        let Some(host) = url.host_str() else {
            return;
        };
        self.hosts
            .write()
            .entry(host.to_string())
            .or_default()
            .insert(name.into(), value.into());
    }

    pub fn get(&self, url: &Url, name: &str) -> Option<String> {
        let host = url.host_str()?;
        self.hosts.read().get(host)?.get(name).cloned()
    }

    fn remove(&self, url: &Url, name: &str) {
        let Some(host) = url.host_str() else {
            return;
        };
        let mut hosts = self.hosts.write();
        if let Some(cookies) = hosts.get_mut(host) {
            cookies.remove(name);
            if cookies.is_empty() {
                hosts.remove(host);
            }
        }
    }

    /// `Cookie` header value for `url`, or `None` if the host has no cookies.
    pub fn cookie_header(&self, url: &Url) -> Option<HeaderValue> {
        let host = url.host_str()?;
        let hosts = self.hosts.read();
        let cookies = hosts.get(host).filter(|c| !c.is_empty())?;
        let joined = cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ");
        HeaderValue::from_str(&joined).ok()
    }

    /// Apply `Set-Cookie` header values received from `url`.
    pub fn store_set_cookies<'a, I>(&self, url: &Url, headers: I)
    where
        I: IntoIterator<Item = &'a HeaderValue>,
    {
        for header in headers {
            let Ok(raw) = header.to_str() else {
                tracing::debug!("skipping non-ASCII Set-Cookie header");
                continue;
            };
            match parse_set_cookie(raw) {
                Some(SetCookie::Store { name, value }) => self.insert(url, name, value),
                Some(SetCookie::Expire { name }) => self.remove(url, &name),
                None => tracing::debug!(header = raw, "ignoring malformed Set-Cookie header"),
            }
        }
    }

    /// Drop every cookie. Returns how many were removed.
    pub fn clear(&self) -> usize {
        let mut hosts = self.hosts.write();
        let count = hosts.values().map(BTreeMap::len).sum();
        hosts.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.hosts.read().values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, PartialEq, Eq)]
enum SetCookie {
    Store { name: String, value: String },
    Expire { name: String },
}

fn parse_set_cookie(raw: &str) -> Option<SetCookie> {
    let cookie = Cookie::parse(raw).ok()?;
    let name = cookie.name().to_string();

    let max_age_elapsed = cookie.max_age().is_some_and(|age| age <= Duration::ZERO);
    let expires_elapsed = cookie
        .expires_datetime()
        .is_some_and(|at| at <= OffsetDateTime::now_utc());

    if max_age_elapsed || expires_elapsed {
        Some(SetCookie::Expire { name })
    } else {
        Some(SetCookie::Store {
            name,
            value: cookie.value().trim_matches('"').to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    #[test]
    fn insert_and_get_are_host_scoped() {
        let jar = SessionJar::new();
        jar.insert(&url("https://ksu.dawoony.com/graphql"), "sid", "abc");
        assert_eq!(
            jar.get(&url("https://ksu.dawoony.com/other"), "sid").as_deref(),
            Some("abc")
        );
        assert_eq!(jar.get(&url("https://example.com/"), "sid"), None);
    }

    #[test]
    fn cookie_header_joins_sorted_pairs() {
        let jar = SessionJar::new();
        let u = url("http://127.0.0.1:8080/graphql");
        jar.insert(&u, "sid", "abc");
        jar.insert(&u, "csrf", "xyz");
        assert_eq!(jar.cookie_header(&u).unwrap(), "csrf=xyz; sid=abc");
    }

    #[test]
    fn cookie_header_empty_jar_is_none() {
        let jar = SessionJar::new();
        assert!(jar.cookie_header(&url("http://127.0.0.1/")).is_none());
    }

    #[test]
    fn parse_set_cookie_reads_name_value() {
        assert_eq!(
            parse_set_cookie("sid=abc; Path=/; HttpOnly; Secure"),
            Some(SetCookie::Store {
                name: "sid".into(),
                value: "abc".into()
            })
        );
    }

    #[test]
    fn parse_set_cookie_strips_quotes() {
        assert_eq!(
            parse_set_cookie("token=\"q v\""),
            Some(SetCookie::Store {
                name: "token".into(),
                value: "q v".into()
            })
        );
    }

    #[test]
    fn parse_set_cookie_max_age_zero_expires() {
        assert_eq!(
            parse_set_cookie("sid=; Max-Age=0; Path=/"),
            Some(SetCookie::Expire { name: "sid".into() })
        );
        assert_eq!(
            parse_set_cookie("sid=x; max-age=-1"),
            Some(SetCookie::Expire { name: "sid".into() })
        );
    }

    #[test]
    fn parse_set_cookie_past_expires_expires() {
        assert_eq!(
            parse_set_cookie("sid=; Path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT"),
            Some(SetCookie::Expire { name: "sid".into() })
        );
    }

    #[test]
    fn parse_set_cookie_future_expires_is_stored() {
        assert_eq!(
            parse_set_cookie("sid=abc; Expires=Fri, 31 Dec 9999 23:59:59 GMT"),
            Some(SetCookie::Store {
                name: "sid".into(),
                value: "abc".into()
            })
        );
    }

    #[test]
    fn store_set_cookies_past_expires_removes_session() {
        let jar = SessionJar::new();
        let u = url("http://127.0.0.1/graphql");
        jar.insert(&u, "sid", "abc");

        jar.store_set_cookies(
            &u,
            &[HeaderValue::from_static(
                "sid=; Path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
            )],
        );
        assert_eq!(jar.get(&u, "sid"), None);
        assert!(jar.cookie_header(&u).is_none());
    }

    #[test]
    fn parse_set_cookie_rejects_malformed() {
        assert_eq!(parse_set_cookie("no-equals-sign"), None);
        assert_eq!(parse_set_cookie("=value"), None);
    }

    #[test]
    fn store_set_cookies_inserts_and_expires() {
        let jar = SessionJar::new();
        let u = url("http://127.0.0.1/graphql");
        jar.store_set_cookies(
            &u,
            &[
                HeaderValue::from_static("sid=abc; Path=/"),
                HeaderValue::from_static("csrf=1"),
            ],
        );
        assert_eq!(jar.len(), 2);

        jar.store_set_cookies(&u, &[HeaderValue::from_static("sid=; Max-Age=0")]);
        assert_eq!(jar.get(&u, "sid"), None);
        assert_eq!(jar.get(&u, "csrf").as_deref(), Some("1"));
    }

    #[test]
    fn clear_reports_removed_count() {
        let jar = SessionJar::new();
        jar.insert(&url("http://a.test/"), "x", "1");
        jar.insert(&url("http://b.test/"), "y", "2");
        assert_eq!(jar.clear(), 2);
        assert!(jar.is_empty());
        assert_eq!(jar.clear(), 0);
    }
}

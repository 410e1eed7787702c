//! Upstream target URL construction.
//!
//! `origin + "/" + residual path + query`, with the origin's trailing slashes
//! stripped first. Segments and query are copied into the target string as
//! received. The HTTP client then parses that string as a WHATWG URL, which
//! collapses `.`/`..` segments (encoded or not) and percent-encodes bytes
//! such as `"` that are not allowed in a query. Already-encoded escapes like
//! `%2F` and `%20` are left alone.

/// Strip every trailing `/` from an origin.
pub fn trim_origin(origin: &str) -> &str {
    origin.trim_end_matches('/')
}

/// The part of an inbound path after the gateway's mount point.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResidualPath(String);

impl ResidualPath {
    /// Build from already-split segments.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = segments
            .into_iter()
            .map(|s| s.as_ref().to_owned())
            .collect::<Vec<_>>()
            .join("/");
        Self(joined)
    }

    /// Cut the mount prefix off a raw request path.
    ///
    /// Returns `None` when the path is not under the mount. A mount of `/`
    /// (or an empty mount) accepts every path.
    pub fn strip_mount(path: &str, mount: &str) -> Option<Self> {
        let mount = mount.trim_end_matches('/');
        let rest = path.strip_prefix(mount)?;
        if !rest.is_empty() && !rest.starts_with('/') {
            return None;
        }
        Some(Self(rest.trim_start_matches('/').to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Build the outbound URL for a residual path and raw query string.
///
/// `query` is the text after `?` (without it); an empty query adds nothing.
pub fn build_target_url(origin: &str, residual: &ResidualPath, query: Option<&str>) -> String {
    let origin = trim_origin(origin);
    let mut url = String::with_capacity(origin.len() + residual.as_str().len() + 2);
    url.push_str(origin);
    url.push('/');
    url.push_str(residual.as_str());
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        url.push('?');
        url.push_str(query);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concrete_users_example() {
        let residual = ResidualPath::strip_mount("/api/users/42", "/api").unwrap();
        let url = build_target_url("http://backend:9000", &residual, Some("active=true"));
        assert_eq!(url, "http://backend:9000/users/42?active=true");
    }

    #[test]
    fn trailing_slashes_on_origin_do_not_matter() {
        let residual = ResidualPath::from_segments(["deals", "7"]);
        let bare = build_target_url("http://api", &residual, None);
        assert_eq!(bare, "http://api/deals/7");
        assert_eq!(build_target_url("http://api/", &residual, None), bare);
        assert_eq!(build_target_url("http://api///", &residual, None), bare);
        assert_eq!(trim_origin(trim_origin("http://api//")), "http://api");
    }

    #[test]
    fn encoded_segments_and_query_pass_through() {
        let residual = ResidualPath::strip_mount("/api/companies/A%26B%20Co", "/api").unwrap();
        let url = build_target_url("http://up", &residual, Some("q=a%2Fb&x=%20"));
        assert_eq!(url, "http://up/companies/A%26B%20Co?q=a%2Fb&x=%20");
    }

    #[test]
    fn empty_query_is_dropped() {
        let residual = ResidualPath::from_segments(["health"]);
        assert_eq!(build_target_url("http://up", &residual, Some("")), "http://up/health");
    }

    #[test]
    fn bare_mount_targets_origin_root() {
        let residual = ResidualPath::strip_mount("/api", "/api").unwrap();
        assert_eq!(residual.as_str(), "");
        assert_eq!(build_target_url("http://up/", &residual, None), "http://up/");
    }

    #[test]
    fn strip_mount_requires_segment_boundary() {
        assert!(ResidualPath::strip_mount("/apix/users", "/api").is_none());
        assert!(ResidualPath::strip_mount("/other", "/api").is_none());
        assert_eq!(
            ResidualPath::strip_mount("/anything/here", "/").unwrap().as_str(),
            "anything/here"
        );
    }

    #[test]
    fn from_segments_joins_with_slashes() {
        let residual = ResidualPath::from_segments(["a", "b", "c"]);
        assert_eq!(residual.as_str(), "a/b/c");
    }

    #[test]
    fn client_url_parsing_normalizes_dot_segments_and_quotes() {
        let residual = ResidualPath::strip_mount("/api/a/%2e%2e/b", "/api").unwrap();
        let target = build_target_url("http://up", &residual, Some("q=\"x\"&p=a%2Fb"));
        assert_eq!(target, "http://up/a/%2e%2e/b?q=\"x\"&p=a%2Fb");

        let sent = reqwest::Url::parse(&target).unwrap();
        assert_eq!(sent.path(), "/b");
        assert_eq!(sent.query(), Some("q=%22x%22&p=a%2Fb"));
    }
}

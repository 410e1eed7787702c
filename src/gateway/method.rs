//! The closed set of methods the gateway forwards.

use std::fmt;

use axum::http::Method;

/// Methods accepted on the mount. Anything else is refused before dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForwardMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl ForwardMethod {
    pub const ALL: [ForwardMethod; 7] = [
        ForwardMethod::Get,
        ForwardMethod::Post,
        ForwardMethod::Put,
        ForwardMethod::Patch,
        ForwardMethod::Delete,
        ForwardMethod::Head,
        ForwardMethod::Options,
    ];

    /// GET and HEAD never send a body upstream.
    pub fn carries_body(self) -> bool {
        !matches!(self, ForwardMethod::Get | ForwardMethod::Head)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ForwardMethod::Get => "GET",
            ForwardMethod::Post => "POST",
            ForwardMethod::Put => "PUT",
            ForwardMethod::Patch => "PATCH",
            ForwardMethod::Delete => "DELETE",
            ForwardMethod::Head => "HEAD",
            ForwardMethod::Options => "OPTIONS",
        }
    }

    pub fn to_http(self) -> Method {
        match self {
            ForwardMethod::Get => Method::GET,
            ForwardMethod::Post => Method::POST,
            ForwardMethod::Put => Method::PUT,
            ForwardMethod::Patch => Method::PATCH,
            ForwardMethod::Delete => Method::DELETE,
            ForwardMethod::Head => Method::HEAD,
            ForwardMethod::Options => Method::OPTIONS,
        }
    }

    /// Value for an `Allow` header listing every forwarded method.
    pub fn allow_header() -> String {
        Self::ALL.map(Self::as_str).join(", ")
    }
}

impl TryFrom<&Method> for ForwardMethod {
    type Error = Method;

    fn try_from(method: &Method) -> Result<Self, Self::Error> {
        Ok(match *method {
            Method::GET => ForwardMethod::Get,
            Method::POST => ForwardMethod::Post,
            Method::PUT => ForwardMethod::Put,
            Method::PATCH => ForwardMethod::Patch,
            Method::DELETE => ForwardMethod::Delete,
            Method::HEAD => ForwardMethod::Head,
            Method::OPTIONS => ForwardMethod::Options,
            _ => return Err(method.clone()),
        })
    }
}

impl fmt::Display for ForwardMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

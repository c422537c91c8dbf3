use actix_web::http::Method;
use url::Url;

/// An upstream service the gateway can forward to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backend {
    pub name: &'static str,
    pub base_url: Url,
}

impl Backend {
    pub fn new(name: &'static str, base_url: Url) -> Self {
        Self { name, base_url }
    }

    /// Base URL joined with the original path and query, verbatim
    pub fn upstream_url(&self, path_and_query: &str) -> Result<Url, url::ParseError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}{path_and_query}"))
    }
}

#[derive(Debug, Clone)]
struct Route {
    prefix: String,
    backend: Backend,
}

/// Ordered `(prefix, backend)` pairs; the longest matching prefix wins
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route(mut self, prefix: impl Into<String>, backend: Backend) -> Self {
        self.routes.push(Route {
            prefix: prefix.into(),
            backend,
        });
        self
    }

    /// Promocode paths go to the promocode API, account paths to the
    /// identity service
    pub fn platform_default(identity: Url, promocode: Url) -> Self {
        let identity = Backend::new("identity-service", identity);
        let promocode = Backend::new("promocode-api", promocode);

        Self::new()
            .with_route("/promo", promocode.clone())
            .with_route("/api/promocodes", promocode)
            .with_route("/profile", identity.clone())
            .with_route("/login", identity.clone())
            .with_route("/register", identity)
    }

    /// Plain string prefix match, so `/promo` also covers `/promotions`.
    /// Ties keep the earlier entry. Every method routes the same way.
    pub fn route(&self, path: &str, _method: &Method) -> Option<&Backend> {
        self.routes
            .iter()
            .filter(|r| path.starts_with(&r.prefix))
            .fold(None::<&Route>, |best, r| match best {
                Some(b) if b.prefix.len() >= r.prefix.len() => Some(b),
                _ => Some(r),
            })
            .map(|r| &r.backend)
    }
}

//! CORS for the tenant API.
//!
//! Two pieces:
//! - `CorsHeaders`: the fixed echo headers every tenant response carries
//!   (success and error alike). The resource handler copies them into its
//!   proxy response; `apply` also sets them on anything else the route returns.
//! - Preflight (`OPTIONS`) handled by `tower_http::cors::CorsLayer`.
//!
//! Origin is `ALLOWED_ORIGIN` when configured, `*` otherwise. No credentials.

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

pub const ALLOW_METHODS: &str = "OPTIONS,GET";
pub const ALLOW_HEADERS: &str = "Authorization, *";

#[derive(Debug, Clone)]
pub struct CorsHeaders {
    allow_origin: HeaderValue,
    wildcard: bool,
}

impl CorsHeaders {
    /// Invalid origins fall back to `*`; config loading rejects them earlier.
    pub fn new(allowed_origin: Option<&str>) -> Self {
        match allowed_origin.and_then(|o| HeaderValue::from_str(o).ok()) {
            Some(allow_origin) => Self {
                allow_origin,
                wildcard: false,
            },
            None => Self {
                allow_origin: HeaderValue::from_static("*"),
                wildcard: true,
            },
        }
    }

    pub fn allow_origin(&self) -> &str {
        self.allow_origin.to_str().unwrap_or("*")
    }

    /// Header pairs in response order.
    pub fn pairs(&self) -> [(HeaderName, HeaderValue); 3] {
        [
            (
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static(ALLOW_HEADERS),
            ),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, self.allow_origin.clone()),
            (
                header::ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static(ALLOW_METHODS),
            ),
        ]
    }

    fn preflight(&self) -> CorsLayer {
        let origin = if self.wildcard {
            AllowOrigin::from(Any)
        } else {
            AllowOrigin::exact(self.allow_origin.clone())
        };

        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers(Any)
            .max_age(std::time::Duration::from_secs(60 * 10))
    }
}

/// Apply preflight handling + echo headers to the given Router.
///
/// Echo headers are `if_not_present`, so the handler's own values win and
/// rejections from inner layers (401, 408, 413, 500) still get them. Apply this
/// after `http::apply` for that to hold.
pub fn apply<S>(router: Router<S>, cors: &CorsHeaders) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let mut router = router.layer(cors.preflight());
    for (name, value) in cors.pairs() {
        router = router.layer(SetResponseHeaderLayer::if_not_present(name, value));
    }
    router
}

use std::str::FromStr;

use http::Method;
use http::header::HeaderName;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use voiss_config::{AnyOrList, CorsConfig};

/// Build a Tower CORS layer from configuration
///
/// Entries that do not parse are skipped with a warning.
pub fn cors_layer(config: &CorsConfig) -> anyhow::Result<CorsLayer> {
    if config.credentials && [&config.origins, &config.methods, &config.headers].contains(&&AnyOrList::Any) {
        anyhow::bail!("CORS credentials cannot be combined with wildcard origins, methods or headers");
    }

    let mut layer = CorsLayer::new();

    layer = match &config.origins {
        AnyOrList::Any => layer.allow_origin(AllowOrigin::any()),
        AnyOrList::List(origins) => layer.allow_origin(parse_all::<http::HeaderValue>("origin", origins)),
    };

    layer = match &config.methods {
        AnyOrList::Any => layer.allow_methods(AllowMethods::any()),
        AnyOrList::List(methods) => layer.allow_methods(parse_all::<Method>("method", methods)),
    };

    layer = match &config.headers {
        AnyOrList::Any => layer.allow_headers(AllowHeaders::any()),
        AnyOrList::List(headers) => layer.allow_headers(parse_all::<HeaderName>("header", headers)),
    };

    if !config.expose_headers.is_empty() {
        layer = layer.expose_headers(parse_all::<HeaderName>("expose header", &config.expose_headers));
    }

    if config.credentials {
        layer = layer.allow_credentials(true);
    }

    if let Some(duration) = config.max_age_duration() {
        layer = layer.max_age(duration);
    }

    Ok(layer)
}

fn parse_all<T: FromStr>(kind: &str, values: &[String]) -> Vec<T> {
    values
        .iter()
        .filter_map(|value| {
            let parsed = value.parse().ok();
            if parsed.is_none() {
                tracing::warn!(kind, value = %value, "ignoring invalid CORS entry");
            }
            parsed
        })
        .collect()
}

//! Static asset serving module
//!
//! Serves the client library script and the favicon with `ETag` caching.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use crate::logger;

const FAVICON_PATH: &str = "static/favicon.svg";

/// Serve the client library script
///
/// This is the script the test page drives in the browser. A read failure is
/// a hard 500 with a JSON body rather than a silently empty page.
pub async fn serve_library_script(
    ctx: &RequestContext<'_>,
    script_path: &str,
) -> Response<Full<Bytes>> {
    let path = Path::new(script_path);
    match fs::read(path).await {
        Ok(content) => {
            let content_type = mime::get_content_type(path.extension().and_then(|e| e.to_str()));
            build_asset_response(content, content_type, ctx)
        }
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read library script '{script_path}': {e}"
            ));
            http::build_500_json_response(&e)
        }
    }
}

/// Serve favicon
pub async fn serve_favicon(ctx: &RequestContext<'_>) -> Response<Full<Bytes>> {
    match fs::read(FAVICON_PATH).await {
        Ok(data) => build_asset_response(data, "image/svg+xml", ctx),
        Err(_) => http::build_404_response(),
    }
}

/// Build asset response with `ETag` and conditional request support
fn build_asset_response(
    data: Vec<u8>,
    content_type: &str,
    ctx: &RequestContext<'_>,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(&data);

    if cache::check_etag_match(ctx.if_none_match.as_deref(), &etag) {
        return http::build_304_response(&etag);
    }

    http::response::build_cached_response(Bytes::from(data), content_type, &etag, ctx.is_head)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(if_none_match: Option<&str>) -> RequestContext<'static> {
        RequestContext {
            path: "/dom-to-image.js",
            is_head: false,
            if_none_match: if_none_match.map(ToString::to_string),
            resource: None,
        }
    }

    #[test]
    fn test_asset_response_sets_etag() {
        let resp = build_asset_response(b"var x = 1;".to_vec(), "application/javascript", &ctx(None));
        assert_eq!(resp.status(), 200);
        assert!(resp.headers().contains_key("ETag"));
        assert_eq!(
            resp.headers().get("Content-Type").unwrap(),
            "application/javascript"
        );
    }

    #[test]
    fn test_matching_etag_yields_304() {
        let etag = cache::generate_etag(b"var x = 1;");
        let resp = build_asset_response(
            b"var x = 1;".to_vec(),
            "application/javascript",
            &ctx(Some(&etag)),
        );
        assert_eq!(resp.status(), 304);
    }

    #[tokio::test]
    async fn test_missing_script_is_500() {
        let resp = serve_library_script(&ctx(None), "no/such/script.js").await;
        assert_eq!(resp.status(), 500);
        assert_eq!(
            resp.headers().get("Content-Type").unwrap(),
            "application/json"
        );
    }
}

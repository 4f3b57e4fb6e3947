//! Test page rendering
//!
//! Builds the harness page: a fixture selector, the DOM node under test, the
//! library's live PNG/JPEG/SVG renderings, and the pre-recorded control
//! image they are compared against.

use std::io;
use std::path::Path;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::config::AppState;
use crate::fixtures::{self, FixtureFiles};
use crate::handler::router::RequestContext;
use crate::http;
use crate::logger;

/// Serve the test page for the selected fixture, or the empty-state page
/// when no `resource` is given
///
/// File-system errors other than "not found" render as an HTML error page;
/// either way the developer gets a page back.
pub async fn serve_test_page(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let root = Path::new(&state.config.harness.fixtures_dir);
    let library_route = &state.config.harness.library_route;

    let html = match build_page(root, library_route, ctx.resource.as_deref()).await {
        Ok(html) => html,
        Err(err) => {
            logger::log_error(&format!("Failed to build test page: {err}"));
            render_error_page(&err)
        }
    };

    http::response::build_html_response(html, ctx.is_head)
}

async fn build_page(
    root: &Path,
    library_route: &str,
    resource: Option<&str>,
) -> io::Result<String> {
    let names = fixtures::list(root).await?;
    let files = match resource {
        Some(name) => fixtures::load(root, name).await?,
        None => FixtureFiles::default(),
    };
    Ok(render_test_page(&names, resource, &files, library_route))
}

/// Render the full test page HTML
///
/// Fixture content (DOM fragment, style sheet, control image data URL) is
/// inserted verbatim: it is the markup under test. Only the fixture names
/// are escaped.
fn render_test_page(
    names: &[String],
    selected: Option<&str>,
    files: &FixtureFiles,
    library_route: &str,
) -> String {
    let title = selected.map_or_else(|| "(no fixture)".to_string(), escape_html);
    let options = render_options(names, selected);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title} | Fixture Harness</title>
    <script src="{library_route}"></script>
    <style>
        * {{
            box-sizing: border-box;
        }}
    </style>
    <style>
        {style}
    </style>
</head>
<body>

    <form method="get" action="">
        <label>
            Fixtures
            <select name="resource">
                {options}
            </select>
        </label>
        <button type="submit">Test</button>
    </form>

    <h1>Test {title}</h1>

    <div>
        <h1>DOM node</h1>
        <div id="dom-node">{input}</div>
    </div>

    <div>
        <h1>rendered image</h1>
        <div class="actuals">
            <div>
                <h2>PNG</h2>
                <div id="actual-toPng"></div>
            </div>
            <div>
                <h2>JPG</h2>
                <div id="actual-toJpeg"></div>
            </div>
            <div>
                <h2>SVG</h2>
                <div id="actual-toSvg"></div>
            </div>
        </div>
    </div>

    <div>
        <h1>control image</h1>
        <img id="control-image" src="{expected}">
    </div>

    <script>
        const methods = ['toPng', 'toJpeg', 'toSvg'];

        methods.forEach(method => {{
            domtoimage[method](document.getElementById('dom-node'))
                .then(dataUrl => {{
                    const img = new Image();
                    img.src = dataUrl;
                    document.getElementById('actual-' + method).appendChild(img);
                }});
        }});
    </script>

</body>
</html>"#,
        style = files.style,
        input = files.dom_node,
        expected = files.control_image,
    )
}

/// Render the fixture selector options, marking the selected one
fn render_options(names: &[String], selected: Option<&str>) -> String {
    names
        .iter()
        .map(|name| {
            let sel = if Some(name.as_str()) == selected {
                " selected=\"selected\""
            } else {
                ""
            };
            format!("<option{sel}>{}</option>", escape_html(name))
        })
        .collect::<Vec<_>>()
        .join("\n                ")
}

/// Render the developer-facing error page
///
/// Served with status 200: the page itself is the debug output.
pub fn render_error_page(err: &io::Error) -> String {
    let message = escape_html(&err.to_string());
    let detail = serde_json::json!({
        "kind": format!("{:?}", err.kind()),
        "message": err.to_string(),
        "os_error": err.raw_os_error(),
    });
    let detail = escape_html(
        &serde_json::to_string_pretty(&detail).unwrap_or_else(|_| "{}".to_string()),
    );

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Error: {message} | Fixture Harness</title>
</head>
<body>

    <h1>{message}</h1>

    <pre>
{detail}
    </pre>

</body>
</html>"#
    )
}

/// Escape text for insertion into HTML
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_files() -> FixtureFiles {
        FixtureFiles {
            dom_node: "<div class=\"pretty\">content</div>".to_string(),
            style: ".pretty { border: 1px solid; }".to_string(),
            control_image: "data:image/png;base64,AAAA".to_string(),
        }
    }

    #[test]
    fn test_page_embeds_fixture_content_verbatim() {
        let names = vec!["big-vector".to_string(), "small-div".to_string()];
        let html = render_test_page(
            &names,
            Some("small-div"),
            &sample_files(),
            "/dom-to-image.js",
        );

        assert!(html.contains("<div class=\"pretty\">content</div>"));
        assert!(html.contains(".pretty { border: 1px solid; }"));
        assert!(html.contains("src=\"data:image/png;base64,AAAA\""));
        assert!(html.contains("<script src=\"/dom-to-image.js\"></script>"));
        assert!(html.contains("<title>small-div | Fixture Harness</title>"));
    }

    #[test]
    fn test_selector_marks_selected_fixture() {
        let names = vec!["alpha".to_string(), "beta".to_string()];
        let html = render_test_page(&names, Some("beta"), &sample_files(), "/dom-to-image.js");

        assert!(html.contains("<option>alpha</option>"));
        assert!(html.contains("<option selected=\"selected\">beta</option>"));
    }

    #[test]
    fn test_empty_state_page() {
        let html = render_test_page(&[], None, &FixtureFiles::default(), "/dom-to-image.js");

        assert!(html.contains("<title>(no fixture) | Fixture Harness</title>"));
        assert!(html.contains("<div id=\"dom-node\"></div>"));
        assert!(!html.contains("<option"));
    }

    #[test]
    fn test_fixture_names_are_escaped() {
        let names = vec!["<script>".to_string()];
        let html = render_test_page(&names, None, &FixtureFiles::default(), "/dom-to-image.js");

        assert!(html.contains("<option>&lt;script&gt;</option>"));
    }

    #[test]
    fn test_error_page() {
        let err = io::Error::new(io::ErrorKind::PermissionDenied, "resources: <denied>");
        let html = render_error_page(&err);

        assert!(html.contains("<h1>resources: &lt;denied&gt;</h1>"));
        assert!(html.contains("PermissionDenied"));
        assert!(html.contains("<pre>"));
    }

    #[tokio::test]
    async fn test_build_page_missing_root_propagates() {
        let root = std::env::temp_dir().join("fixture-harness-page-no-root");
        let err = build_page(&root, "/dom-to-image.js", None)
            .await
            .expect_err("missing root should fail");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_build_page_with_fixture() {
        let root = std::env::temp_dir().join(format!(
            "fixture-harness-page-build-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&root);
        let dir = root.join("solo");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(fixtures::DOM_NODE_FILE), "<span>x</span>").unwrap();

        let html = build_page(&root, "/dom-to-image.js", Some("solo"))
            .await
            .expect("page builds");
        assert!(html.contains("<span>x</span>"));
        // Missing style and control image render as the placeholder
        assert!(html.contains(fixtures::MISSING_FILE_PLACEHOLDER));

        let _ = std::fs::remove_dir_all(&root);
    }
}

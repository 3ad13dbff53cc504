//! In-process HTTP servers standing in for the reference and candidate

use axum::{
    body::Bytes,
    http::{HeaderMap, StatusCode, Uri},
    response::Html,
    routing::get,
    Router,
};
use http_conformance::ComparisonConfig;
use std::path::Path;
use std::time::Duration;
use tokio::net::TcpListener;

pub const INDEX: &str = "<html>\n<body>\n<h1>It works</h1>\n</body>\n</html>\n";

/// Serve `app` on an ephemeral port and return its base URL
pub async fn spawn(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A base URL nothing listens on
pub async fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Static site whose error page names the server software
pub fn static_site(server_name: &'static str) -> Router {
    Router::new()
        .route(
            "/",
            get(|| async { Html(INDEX) }).post(|| async { StatusCode::METHOD_NOT_ALLOWED }),
        )
        .route("/index.html", get(|| async { Html(INDEX) }))
        .fallback(move || async move {
            (
                StatusCode::NOT_FOUND,
                [("server", server_name)],
                format!("<h1>404 Not Found</h1>\n<hr>\n{}\n", server_name),
            )
        })
}

/// Echoes the request body back together with the content type it was sent with
pub fn echo_site() -> Router {
    Router::new().route(
        "/cgi-bin/hello.py",
        get(|| async { "no input\n" }).post(|headers: HeaderMap, body: Bytes| async move {
            let content_type = headers
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("none")
                .to_string();
            format!(
                "content-type: {}\nlength: {}\n{}",
                content_type,
                body.len(),
                String::from_utf8_lossy(&body)
            )
        }),
    )
}

/// Site that answers every request with a fixed set of headers
pub fn header_site(headers: &'static [(&'static str, &'static str)]) -> Router {
    Router::new().fallback(move || async move {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            map.insert(*name, value.parse().unwrap());
        }
        (StatusCode::OK, map, "same body\n")
    })
}

/// Serves `body` verbatim as `application/octet-stream`
pub fn binary_site(body: &'static [u8]) -> Router {
    Router::new().fallback(move || async move {
        ([("content-type", "application/octet-stream")], body)
    })
}

/// Answers with the request target exactly as it arrived
pub fn uri_echo_site() -> Router {
    Router::new().fallback(|uri: Uri| async move { uri.to_string() })
}

/// Site that answers only after `delay`
pub fn slow_site(delay: Duration) -> Router {
    Router::new().fallback(move || async move {
        tokio::time::sleep(delay).await;
        "late\n"
    })
}

pub fn config(reference: &str, candidate: &str, results_dir: &Path) -> ComparisonConfig {
    ComparisonConfig::new(reference, candidate)
        .with_results_dir(results_dir)
        .with_timeout(Duration::from_secs(5))
}

/// Names of the files currently in `dir`, sorted
pub fn artifacts(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

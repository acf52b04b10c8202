//! Fallback for the static frontend: `/<page>` resolves to
//! `<static_dir>/<page>/index.html` or `<static_dir>/<page>.html`, anything
//! else single-segment redirects to the frontend's 404 page, which is itself
//! served with status 404.

use std::path::{Path, PathBuf};

use axum::extract::State;
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Redirect, Response};

use crate::constants::NOT_FOUND_PAGE;
use crate::response::AppError;
use crate::state::AppState;

pub async fn page_fallback(State(state): State<AppState>, uri: Uri) -> Response {
    let path = uri.path();
    let Some(page) = single_segment(path) else {
        return AppError::not_found("Page not found").into_response();
    };

    let status = if path == NOT_FOUND_PAGE {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    };
    for candidate in page_candidates(Path::new(&state.config().static_dir), page) {
        if let Ok(html) = tokio::fs::read(&candidate).await {
            return (status, [(header::CONTENT_TYPE, "text/html; charset=utf-8")], html).into_response();
        }
    }

    if status == StatusCode::NOT_FOUND {
        return AppError::not_found("Page not found").into_response();
    }
    tracing::debug!(page, "No frontend page, redirecting");
    Redirect::to(NOT_FOUND_PAGE).into_response()
}

pub async fn api_root() -> Redirect {
    Redirect::to("/")
}

fn page_candidates(static_dir: &Path, page: &str) -> [PathBuf; 2] {
    [
        static_dir.join(page).join("index.html"),
        static_dir.join(format!("{page}.html")),
    ]
}

/// `/docs` or `/docs/` → `docs`. Nested paths, dot segments and
/// backslashes are rejected.
fn single_segment(path: &str) -> Option<&str> {
    let segment = path.strip_prefix('/')?.trim_end_matches('/');
    let valid = !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(['/', '\\']);
    valid.then_some(segment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_single_segments() {
        assert_eq!(single_segment("/dashboard"), Some("dashboard"));
        assert_eq!(single_segment("/dashboard/"), Some("dashboard"));
    }

    #[test]
    fn rejects_nested_and_traversal_paths() {
        assert_eq!(single_segment("/"), None);
        assert_eq!(single_segment("/a/b"), None);
        assert_eq!(single_segment("/.."), None);
        assert_eq!(single_segment("/..\\etc"), None);
    }

    #[test]
    fn folder_index_is_tried_first() {
        let [first, second] = page_candidates(Path::new("public"), "logs");
        assert_eq!(first, Path::new("public/logs/index.html"));
        assert_eq!(second, Path::new("public/logs.html"));
    }
}

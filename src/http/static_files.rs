//! Static bundle serving with single-page-application fallback.
//!
//! # Responsibilities
//! - Map a request path onto a file under the web directory
//! - Serve the app shell (`index.html`) for client-side routes
//! - Delegate content types, ranges and conditional requests to `ServeDir`
//!
//! # Design Decisions
//! - Any path that is not an existing file and does not end in `/` gets the
//!   app shell, including directories addressed without a trailing slash
//! - Paths ending in `/` get directory handling: `<dir>/index.html` or 404
//! - `..` and absolute components never resolve to a file

use axum::{
    body::Body,
    http::Request,
    response::Response,
};
use std::path::{Component, Path, PathBuf};
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

use crate::config::ProxyConfig;

/// What a static-mode path resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// An existing regular file.
    File(PathBuf),
    /// A path ending in `/` with no file behind it.
    Directory,
    /// Anything else: serve the root document.
    AppShell,
}

/// Serves the compiled web bundle.
#[derive(Debug, Clone)]
pub struct StaticResolver {
    web_dir: PathBuf,
    index: PathBuf,
    files: ServeDir,
}

impl StaticResolver {
    pub fn from_config(config: &ProxyConfig) -> Self {
        Self {
            index: config.index_document(),
            files: ServeDir::new(&config.web_dir),
            web_dir: config.web_dir.clone(),
        }
    }

    /// Decide what a request path (query string allowed) maps to.
    pub async fn resolve(&self, path: &str) -> Resolution {
        let path = path.split_once('?').map_or(path, |(path, _)| path);

        if let Some(candidate) = self.candidate(path) {
            let is_file = tokio::fs::metadata(&candidate)
                .await
                .map(|meta| meta.is_file())
                .unwrap_or(false);
            if is_file {
                return Resolution::File(candidate);
            }
        }

        if path.ends_with('/') {
            Resolution::Directory
        } else {
            Resolution::AppShell
        }
    }

    /// Serve a GET or HEAD request.
    pub async fn serve(&self, request: Request<Body>) -> Response {
        let path = request.uri().path().to_owned();
        let resolution = self.resolve(&path).await;
        tracing::trace!(path = %path, ?resolution, "Static resolution");

        let served = match resolution {
            Resolution::AppShell => ServeFile::new(&self.index).oneshot(request).await,
            Resolution::File(_) | Resolution::Directory => self.files.clone().oneshot(request).await,
        };

        match served {
            Ok(response) => response.map(Body::new),
            Err(never) => match never {},
        }
    }

    /// Percent-decoded path joined onto the web directory, or `None` if it
    /// would escape it.
    fn candidate(&self, path: &str) -> Option<PathBuf> {
        let decoded = urlencoding::decode(path).ok()?;
        let mut candidate = self.web_dir.clone();
        for component in Path::new(decoded.trim_start_matches('/')).components() {
            match component {
                Component::Normal(part) => candidate.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        Some(candidate)
    }
}

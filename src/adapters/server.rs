//! Static file server for the built front-end.
//!
//! Serves files from the site directory and falls back to the entry
//! document for any path that does not match a file, so client-side routes
//! resolve on reload.

use crate::utils::error::{Result, SiteError};
use percent_encoding::percent_decode_str;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SITE_DIR: &str = "dist";
pub const DEFAULT_ENTRY_DOCUMENT: &str = "index.html";

pub mod mime {
    use std::path::Path;

    pub const HTML: &str = "text/html; charset=utf-8";
    pub const PLAIN: &str = "text/plain; charset=utf-8";
    pub const CSS: &str = "text/css; charset=utf-8";
    pub const JAVASCRIPT: &str = "text/javascript; charset=utf-8";
    pub const JSON: &str = "application/json";
    pub const SVG: &str = "image/svg+xml";
    pub const OCTET_STREAM: &str = "application/octet-stream";

    pub fn from_path(path: &Path) -> &'static str {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("html" | "htm") => HTML,
            Some("css") => CSS,
            Some("js" | "mjs") => JAVASCRIPT,
            Some("json" | "map") => JSON,
            Some("txt") => PLAIN,
            Some("xml") => "application/xml",
            Some("webmanifest") => "application/manifest+json",
            Some("svg") => SVG,
            Some("png") => "image/png",
            Some("jpg" | "jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            Some("avif") => "image/avif",
            Some("ico") => "image/x-icon",
            Some("woff") => "font/woff",
            Some("woff2") => "font/woff2",
            Some("ttf") => "font/ttf",
            Some("otf") => "font/otf",
            Some("pdf") => "application/pdf",
            Some("mp4") => "video/mp4",
            Some("webm") => "video/webm",
            _ => OCTET_STREAM,
        }
    }
}

/// What a request path maps to under the site root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    File(PathBuf),
    /// No file matched; serve the entry document instead.
    Fallback(PathBuf),
    /// Traversal attempt.
    Forbidden,
    /// Neither a file nor the entry document exists.
    NotFound,
}

#[derive(Debug, Clone)]
pub struct SiteRoot {
    root: PathBuf,
    entry_document: String,
}

impl SiteRoot {
    pub fn new(root: impl Into<PathBuf>, entry_document: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            entry_document: entry_document.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entry_path(&self) -> PathBuf {
        self.root.join(&self.entry_document)
    }

    /// Directories resolve to their own copy of the entry document; any
    /// other miss falls back to the root one.
    pub fn resolve(&self, url: &str) -> Resolved {
        let clean = normalize_request_path(url);

        if clean.split('/').any(|segment| segment == "..") {
            return Resolved::Forbidden;
        }

        if let Some(path) = self.resolve_file(&clean) {
            return Resolved::File(path);
        }

        let entry = self.entry_path();
        if entry.is_file() {
            Resolved::Fallback(entry)
        } else {
            Resolved::NotFound
        }
    }

    fn resolve_file(&self, clean: &str) -> Option<PathBuf> {
        let local = self.root.join(clean);

        // canonicalize also catches symlinks pointing outside the root
        let canonical = local.canonicalize().ok()?;
        let root_canonical = self.root.canonicalize().ok()?;
        if !canonical.starts_with(&root_canonical) {
            return None;
        }

        if canonical.is_file() {
            return Some(canonical);
        }

        if canonical.is_dir() {
            let index = canonical.join(&self.entry_document);
            if index.is_file() {
                return Some(index);
            }
        }

        None
    }
}

/// Decode, strip query and fragment, trim slashes.
fn normalize_request_path(url: &str) -> String {
    let path = url.split(|c: char| c == '?' || c == '#').next().unwrap_or(url);
    let decoded = percent_decode_str(path)
        .decode_utf8()
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_default();
    decoded.trim_matches('/').to_string()
}

pub struct StaticServer {
    server: Arc<Server>,
    addr: SocketAddr,
    site: SiteRoot,
}

impl StaticServer {
    pub fn bind(host: IpAddr, port: u16, site: SiteRoot) -> Result<Self> {
        let requested = SocketAddr::new(host, port);
        let server = Server::http(requested).map_err(|e| SiteError::ServerError {
            message: format!("Failed to bind {}: {}", requested, e),
        })?;

        // port 0 asks the OS for a free port
        let addr = server.server_addr().to_ip().unwrap_or(requested);

        if !site.entry_path().is_file() {
            tracing::warn!(
                "Entry document {} not found; unmatched paths will return 404",
                site.entry_path().display()
            );
        }

        Ok(Self {
            server: Arc::new(server),
            addr,
            site,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn site(&self) -> &SiteRoot {
        &self.site
    }

    /// Handle that can stop a running server from another thread.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle(Arc::clone(&self.server))
    }

    /// Blocks until the server is unblocked.
    pub fn run(self) {
        tracing::info!("Server listening on http://{}", self.addr);
        tracing::info!("Serving {}", self.site.root().display());

        for request in self.server.incoming_requests() {
            let method = request.method().clone();
            let url = request.url().to_string();
            if let Err(e) = handle_request(request, &self.site) {
                tracing::error!("{} {} failed: {}", method, url, e);
            }
        }

        tracing::info!("Server stopped");
    }
}

#[derive(Clone)]
pub struct ShutdownHandle(Arc<Server>);

impl ShutdownHandle {
    pub fn shutdown(&self) {
        self.0.unblock();
    }
}

fn handle_request(request: Request, site: &SiteRoot) -> Result<()> {
    if !matches!(request.method(), Method::Get | Method::Head) {
        return send_body(request, 405, mime::PLAIN, b"405 Method Not Allowed".to_vec());
    }

    let resolved = site.resolve(request.url());
    tracing::debug!("{} {} -> {:?}", request.method(), request.url(), resolved);

    match resolved {
        Resolved::File(path) | Resolved::Fallback(path) => respond_file(request, &path),
        Resolved::Forbidden => send_body(request, 403, mime::PLAIN, b"403 Forbidden".to_vec()),
        Resolved::NotFound => send_body(request, 404, mime::PLAIN, b"404 Not Found".to_vec()),
    }
}

fn respond_file(request: Request, path: &Path) -> Result<()> {
    let content_type = mime::from_path(path);
    let body = fs::read(path)?;
    send_body(request, 200, content_type, body)
}

fn send_body(request: Request, status: u16, content_type: &'static str, body: Vec<u8>) -> Result<()> {
    let header = make_header("Content-Type", content_type)?;

    if request.method() == &Method::Head {
        let response = Response::empty(StatusCode(status)).with_header(header);
        request.respond(response)?;
        return Ok(());
    }

    let response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(header);
    request.respond(response)?;
    Ok(())
}

fn make_header(key: &'static str, value: &'static str) -> Result<Header> {
    Header::from_bytes(key, value).map_err(|_| SiteError::ServerError {
        message: format!("Invalid header {}: {}", key, value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn site_with_entry() -> (TempDir, SiteRoot) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.html"), "<div id=\"root\"></div>").unwrap();
        fs::create_dir_all(dir.path().join("assets")).unwrap();
        fs::write(dir.path().join("assets/app.js"), "console.log(1)").unwrap();
        let site = SiteRoot::new(dir.path(), DEFAULT_ENTRY_DOCUMENT);
        (dir, site)
    }

    #[test]
    fn test_existing_file_resolves() {
        let (dir, site) = site_with_entry();
        let expected = dir.path().join("assets/app.js").canonicalize().unwrap();
        assert_eq!(site.resolve("/assets/app.js"), Resolved::File(expected));
        assert_eq!(
            site.resolve("/assets/app.js?v=3"),
            Resolved::File(dir.path().join("assets/app.js").canonicalize().unwrap())
        );
    }

    #[test]
    fn test_root_resolves_to_index() {
        let (dir, site) = site_with_entry();
        let expected = dir.path().join("index.html").canonicalize().unwrap();
        assert_eq!(site.resolve("/"), Resolved::File(expected));
    }

    #[test]
    fn test_unknown_route_falls_back_to_entry() {
        let (dir, site) = site_with_entry();
        assert_eq!(
            site.resolve("/servicios/seo"),
            Resolved::Fallback(dir.path().join("index.html"))
        );
    }

    #[test]
    fn test_directory_index_uses_configured_entry() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("blog")).unwrap();
        fs::write(dir.path().join("app.html"), "root").unwrap();
        fs::write(dir.path().join("blog/app.html"), "blog").unwrap();
        fs::write(dir.path().join("blog/index.html"), "ignored").unwrap();
        let site = SiteRoot::new(dir.path(), "app.html");

        assert_eq!(
            site.resolve("/blog/"),
            Resolved::File(dir.path().join("blog/app.html").canonicalize().unwrap())
        );
        assert_eq!(
            site.resolve("/"),
            Resolved::File(dir.path().join("app.html").canonicalize().unwrap())
        );
        assert_eq!(
            site.resolve("/tienda"),
            Resolved::Fallback(dir.path().join("app.html"))
        );
    }

    #[test]
    fn test_missing_entry_is_not_found() {
        let dir = TempDir::new().unwrap();
        let site = SiteRoot::new(dir.path(), DEFAULT_ENTRY_DOCUMENT);
        assert_eq!(site.resolve("/anything"), Resolved::NotFound);
    }

    #[test]
    fn test_traversal_is_forbidden() {
        let (_dir, site) = site_with_entry();
        assert_eq!(site.resolve("/../etc/passwd"), Resolved::Forbidden);
        assert_eq!(site.resolve("/assets/%2e%2e/%2e%2e/secret"), Resolved::Forbidden);
    }

    #[test]
    fn test_percent_encoded_names_resolve() {
        let (dir, site) = site_with_entry();
        fs::write(dir.path().join("guía.txt"), "hola").unwrap();
        assert_eq!(
            site.resolve("/gu%C3%ADa.txt"),
            Resolved::File(dir.path().join("guía.txt").canonicalize().unwrap())
        );
    }

    #[test]
    fn test_mime_by_extension() {
        assert_eq!(mime::from_path(Path::new("index.html")), mime::HTML);
        assert_eq!(mime::from_path(Path::new("app.JS")), mime::JAVASCRIPT);
        assert_eq!(mime::from_path(Path::new("logo.svg")), mime::SVG);
        assert_eq!(mime::from_path(Path::new("blob")), mime::OCTET_STREAM);
    }
}

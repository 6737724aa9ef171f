//! Local preview server for the build output.

pub mod mime;
pub mod shutdown;

use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tiny_http::{Header, Method, Request, Response, ResponseBox, Server, StatusCode};

use crate::core::build::ENTRY_POINT;
use crate::core::error::AppError;

pub use shutdown::{install_handler, stop_flag, ServingGuard};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

const CORS_HEADERS: &[(&str, &str)] = &[
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET, POST, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type"),
];

/// Where a request path leads inside the served root.
#[derive(Debug, PartialEq, Eq)]
pub enum Resolved {
    File(PathBuf),
    Forbidden,
    NotFound,
}

/// Static file server bound to one port.
pub struct PreviewServer {
    server: Server,
    root: PathBuf,
    host: String,
    port: u16,
}

impl PreviewServer {
    /// Binds `host:port` and serves files under `root`.
    pub fn bind(host: &str, port: u16, root: &Path) -> Result<Self, AppError> {
        if !root.is_dir() {
            return Err(AppError::Server(format!(
                "Directory not found: {}",
                root.display()
            )));
        }

        let addr = format!("{}:{}", host, port);
        let server = Server::http(&addr).map_err(|e| {
            let in_use = e
                .downcast_ref::<io::Error>()
                .map(|io| io.kind() == io::ErrorKind::AddrInUse)
                .unwrap_or(false)
                || e.to_string().contains("in use");
            if in_use {
                AppError::PortInUse { port }
            } else {
                AppError::Server(format!("Failed to listen on {}: {}", addr, e))
            }
        })?;

        let port = server
            .server_addr()
            .to_ip()
            .map(|a| a.port())
            .unwrap_or(port);
        tracing::debug!("preview server bound to {}:{}", host, port);

        Ok(Self {
            server,
            root: root.to_path_buf(),
            host: host.to_string(),
            port,
        })
    }

    /// Port actually bound, useful when binding port 0.
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}/", self.host, self.port)
    }

    /// Serves requests until `stop` is raised. Returns the request count.
    pub fn serve_until(&self, stop: &AtomicBool) -> Result<usize, AppError> {
        let mut served = 0;
        while !stop.load(Ordering::SeqCst) {
            if self.handle_next(POLL_INTERVAL)? {
                served += 1;
            }
        }
        Ok(served)
    }

    /// Waits up to `timeout` for one request and answers it.
    /// Returns false when no request arrived.
    pub fn handle_next(&self, timeout: Duration) -> Result<bool, AppError> {
        match self.server.recv_timeout(timeout) {
            Ok(Some(request)) => {
                self.handle(request);
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(false),
            Err(e) => Err(AppError::Server(format!("Failed to accept request: {}", e))),
        }
    }

    fn handle(&self, request: Request) {
        let method = request.method().clone();
        let url = request.url().to_string();

        let (status, response) = match method {
            Method::Options => (204, Response::empty(StatusCode(204)).boxed()),
            Method::Get | Method::Head => self.respond_with_file(&url),
            _ => (405, text_response(405, "Method Not Allowed")),
        };

        println!(
            "[{}] {} {} {}",
            chrono::Local::now().format("%H:%M:%S"),
            method,
            url,
            status
        );

        if let Err(e) = request.respond(with_cors(response)) {
            tracing::debug!("client went away before response: {}", e);
        }
    }

    fn respond_with_file(&self, url: &str) -> (u16, ResponseBox) {
        match resolve(&self.root, url) {
            Resolved::File(path) => match File::open(&path) {
                Ok(file) => {
                    let mut response = Response::from_file(file).boxed();
                    set_header(&mut response, "Content-Type", mime::content_type(&path));
                    (200, response)
                }
                Err(e) => {
                    tracing::warn!("failed to open {}: {}", path.display(), e);
                    (500, text_response(500, "Internal Server Error"))
                }
            },
            Resolved::Forbidden => (403, text_response(403, "Forbidden")),
            Resolved::NotFound => (404, text_response(404, "Not Found")),
        }
    }
}

/// Maps a request URL onto a file under `root`.
///
/// The query string is ignored, the path is percent-decoded and any `..`
/// component is rejected. Directories resolve to their `index.html`.
pub fn resolve(root: &Path, url: &str) -> Resolved {
    let raw = url.split(['?', '#']).next().unwrap_or("");
    let Ok(decoded) = urlencoding::decode(raw) else {
        return Resolved::NotFound;
    };

    let mut path = root.to_path_buf();
    for segment in decoded.split('/') {
        if segment.is_empty() || segment == "." {
            continue;
        }
        if segment == ".." || segment.contains('\\') {
            return Resolved::Forbidden;
        }
        // Reject anything that is not a plain name, e.g. `C:` on Windows.
        let mut components = Path::new(segment).components();
        if !matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        ) {
            return Resolved::Forbidden;
        }
        path.push(segment);
    }

    if path.is_dir() {
        path.push(ENTRY_POINT);
    }
    if path.is_file() {
        Resolved::File(path)
    } else {
        Resolved::NotFound
    }
}

/// Top-level HTML pages other than the entry page, sorted.
pub fn other_pages(root: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(root) else {
        return Vec::new();
    };
    let mut pages: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter_map(|e| e.file_name().into_string().ok())
        .filter(|name| name.ends_with(".html") && name != ENTRY_POINT)
        .collect();
    pages.sort();
    pages
}

/// Opens `url` in the default browser. Best effort.
pub fn open_browser(url: &str) {
    let result = if cfg!(target_os = "macos") {
        std::process::Command::new("open").arg(url).spawn()
    } else if cfg!(windows) {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", url])
            .spawn()
    } else {
        std::process::Command::new("xdg-open").arg(url).spawn()
    };

    if let Err(e) = result {
        tracing::warn!("could not open browser: {}", e);
    }
}

fn set_header(response: &mut ResponseBox, name: &str, value: &str) {
    match Header::from_bytes(name.as_bytes(), value.as_bytes()) {
        Ok(header) => response.add_header(header),
        Err(()) => tracing::debug!("skipping invalid header {}: {}", name, value),
    }
}

fn with_cors(mut response: ResponseBox) -> ResponseBox {
    for (name, value) in CORS_HEADERS {
        set_header(&mut response, name, value);
    }
    response
}

fn text_response(status: u16, body: &str) -> ResponseBox {
    Response::from_string(body)
        .with_status_code(StatusCode(status))
        .boxed()
}

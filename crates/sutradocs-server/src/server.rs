//! Development server implementation.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::{header, HeaderMap, StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use tokio::sync::RwLock;

use sutradocs_static::{assets::AssetPipeline, ApiFiles, Site, SiteConfig, SiteError};

use crate::api;
use crate::watcher::{FileWatcher, WatchEvent, WatchTargets};
use crate::websocket::{reload_client_script, ReloadHub, ReloadMessage};

/// Configuration for the development server.
#[derive(Debug, Clone)]
pub struct DevServerConfig {
    /// Site to serve
    pub site: SiteConfig,

    /// API data files behind the data routes
    pub api: ApiFiles,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            site: SiteConfig {
                live_reload: true,
                ..Default::default()
            },
            api: ApiFiles::default(),
            port: 7777,
            host: "127.0.0.1".to_string(),
            open: true,
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("File watch error: {0}")]
    WatchError(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error(transparent)]
    Site(#[from] SiteError),
}

/// Shared server state.
pub(crate) struct ServerState {
    pub(crate) config: DevServerConfig,
    pub(crate) site: Site,
    pub(crate) hub: ReloadHub,
}

impl ServerState {
    /// Load the site for serving.
    ///
    /// The dev server mounts everything at the root, so links are rendered
    /// without the deployment `base_url`.
    pub(crate) fn new(mut config: DevServerConfig) -> Result<Self, ServerError> {
        if config.site.base_url != "/" {
            tracing::debug!("Serving at / instead of {}", config.site.base_url);
            config.site.base_url = "/".to_string();
        }

        let site = Site::load(config.site.clone())?;

        Ok(Self {
            config,
            site,
            hub: ReloadHub::new(),
        })
    }
}

pub(crate) type SharedState = Arc<RwLock<ServerState>>;

/// Development server.
pub struct DevServer {
    config: DevServerConfig,
}

impl DevServer {
    /// Create a new development server.
    pub fn new(config: DevServerConfig) -> Self {
        Self { config }
    }

    /// Load the site and serve it until the process is stopped.
    pub async fn start(self) -> Result<(), ServerError> {
        let address = format!("{}:{}", self.config.host, self.config.port);
        let addr: SocketAddr = address
            .parse()
            .map_err(|_| ServerError::InvalidAddress(address))?;

        let state = ServerState::new(self.config.clone())?;
        let introduction = state.site.catalog().introduction().to_string();
        tracing::info!(
            "Loaded {} pages and {} sidebar categories",
            state.site.pages().count(),
            state.site.catalog().categories().len()
        );

        let state = Arc::new(RwLock::new(state));

        let targets = WatchTargets {
            content_dirs: std::iter::once(self.config.site.docs_dir.clone())
                .chain(self.config.site.cookbooks_dir.clone())
                .collect(),
            sidebar: self.config.site.sidebar.clone(),
        };
        let (watcher, mut rx) =
            FileWatcher::new(&targets).map_err(|e| ServerError::WatchError(e.to_string()))?;

        let watch_state = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                handle_watch_event(&watch_state, event).await;
            }
            // Keep watcher alive
            drop(watcher);
        });

        let app = create_router(state);

        tracing::info!("Starting dev server at http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        if self.config.open {
            let url = format!("http://{}{}", addr, introduction);
            if let Err(e) = open::that(&url) {
                tracing::warn!("Failed to open browser: {}", e);
            }
        }

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        Ok(())
    }
}

pub(crate) fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/assets/{file}", get(asset_handler))
        .route("/__reload", get(ws_handler))
        .route("/__reload.js", get(reload_script_handler))
        .route("/api/openapi-spec", get(api::openapi_spec))
        .route("/api/sutra-api", get(api::service_description))
        .fallback(page_handler)
        .with_state(state)
}

/// Reload whatever changed and tell browsers about it.
///
/// The reload runs on a copy of the site off the async workers; requests keep
/// being served from the current site until the copy is swapped in. A failed
/// reload keeps the previous catalog or pages in place.
pub(crate) async fn handle_watch_event(state: &SharedState, event: WatchEvent) {
    let site = state.read().await.site.clone();
    let reloaded = tokio::task::spawn_blocking(move || reload_site(site, &event)).await;

    let mut state = state.write().await;
    let error = match reloaded {
        Ok(Ok(site)) => {
            state.site = site;
            state.hub.send(ReloadMessage::Reload);
            return;
        }
        Ok(Err(e)) => e.to_string(),
        Err(e) => format!("Reload task failed: {}", e),
    };

    tracing::warn!("Reload failed: {}", error);
    state.hub.send(ReloadMessage::Error { message: error });
}

fn reload_site(mut site: Site, event: &WatchEvent) -> Result<Site, SiteError> {
    match event {
        WatchEvent::Content(path) => {
            tracing::info!("Content changed: {}", path.display());
            site.reload_pages()?;
        }
        WatchEvent::Sidebar(path) => {
            tracing::info!("Sidebar changed: {}", path.display());
            site.reload_catalog()?;
        }
    }
    Ok(site)
}

/// Redirect the site root to the introduction page.
async fn index_handler(State(state): State<SharedState>) -> Redirect {
    let state = state.read().await;
    Redirect::temporary(state.site.catalog().introduction())
}

/// Render a content page on demand.
async fn page_handler(State(state): State<SharedState>, uri: Uri) -> Response {
    let state = state.read().await;

    match state.site.render(uri.path()) {
        Ok(Some(html)) => Html(html).into_response(),
        Ok(None) => match state.site.render_not_found() {
            Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
            Err(e) => render_error(e),
        },
        Err(e) => render_error(e),
    }
}

fn render_error(e: SiteError) -> Response {
    tracing::error!("Failed to render page: {}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
}

/// Serve the theme assets and configured stylesheets.
async fn asset_handler(
    State(state): State<SharedState>,
    axum::extract::Path(file): axum::extract::Path<String>,
) -> Response {
    match file.as_str() {
        "main.css" => css(AssetPipeline::generate_css()),
        "main.js" => (
            [(header::CONTENT_TYPE, "application/javascript")],
            AssetPipeline::generate_js(),
        )
            .into_response(),
        _ => {
            let state = state.read().await;
            let style = state
                .config
                .site
                .styles
                .iter()
                .find(|s| Path::new(s).file_name().and_then(|f| f.to_str()) == Some(file.as_str()));

            match style.map(std::fs::read_to_string) {
                Some(Ok(content)) => css(content),
                Some(Err(e)) => {
                    tracing::warn!("Failed to read stylesheet {}: {}", file, e);
                    StatusCode::NOT_FOUND.into_response()
                }
                None => StatusCode::NOT_FOUND.into_response(),
            }
        }
    }
}

fn css(content: String) -> Response {
    ([(header::CONTENT_TYPE, "text/css")], content).into_response()
}

/// Handler for the live reload WebSocket endpoint.
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<SharedState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Forward reload messages to one browser.
async fn handle_ws(mut socket: WebSocket, state: SharedState) {
    let mut rx = {
        let state = state.read().await;
        state.hub.subscribe()
    };

    if !send_message(&mut socket, &ReloadMessage::Connected).await {
        return;
    }

    while let Ok(msg) = rx.recv().await {
        if !send_message(&mut socket, &msg).await {
            break;
        }
    }
}

async fn send_message(socket: &mut WebSocket, msg: &ReloadMessage) -> bool {
    let Ok(json) = serde_json::to_string(msg) else {
        return false;
    };
    socket.send(Message::Text(json.into())).await.is_ok()
}

/// Handler for the live reload client script.
async fn reload_script_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let host = match headers.get(header::HOST).and_then(|h| h.to_str().ok()) {
        Some(host) => host.to_string(),
        None => {
            let state = state.read().await;
            format!("{}:{}", state.config.host, state.config.port)
        }
    };

    let script = reload_client_script(&format!("ws://{}/__reload", host));
    ([(header::CONTENT_TYPE, "application/javascript")], script)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use pretty_assertions::assert_eq;
    use tempfile::{tempdir, TempDir};
    use tower::ServiceExt;

    use super::*;

    const SIDEBAR: &str = r#"
categories:
  - title: Get Started
    entries:
      - { title: Introduction, path: /docs }
      - { title: Quickstart, path: /docs/quickstart }
"#;

    fn fixture() -> (TempDir, SharedState) {
        fixture_with_base("/")
    }

    fn fixture_with_base(base_url: &str) -> (TempDir, SharedState) {
        let temp = tempdir().unwrap();
        let root = temp.path();
        let docs = root.join("docs");
        fs::create_dir_all(&docs).unwrap();
        fs::write(docs.join("index.mdx"), "---\ntitle: Introduction\n---\nWelcome").unwrap();
        fs::write(docs.join("quickstart.mdx"), "---\ntitle: Quickstart\n---\n## Install").unwrap();
        fs::write(root.join("sidebar.yml"), SIDEBAR).unwrap();
        fs::write(
            root.join("sutra.yml"),
            "openapi: 3.0.0\ninfo:\n  title: Sutra API\n  version: '2'\n",
        )
        .unwrap();
        fs::write(root.join("service.json"), r#"{"name":"sutra"}"#).unwrap();

        let config = DevServerConfig {
            site: SiteConfig {
                title: "Sutra Docs".to_string(),
                base_url: base_url.to_string(),
                docs_dir: docs,
                sidebar: root.join("sidebar.yml"),
                live_reload: true,
                ..Default::default()
            },
            api: ApiFiles {
                openapi: Some(root.join("sutra.yml")),
                service: Some(root.join("service.json")),
            },
            open: false,
            ..Default::default()
        };

        let state = Arc::new(RwLock::new(ServerState::new(config).unwrap()));

        (temp, state)
    }

    async fn get(state: &SharedState, uri: &str) -> (StatusCode, HeaderMap, String) {
        let response = create_router(Arc::clone(state))
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8(body.to_vec()).unwrap())
    }

    #[test]
    fn creates_server_with_default_config() {
        let server = DevServer::new(DevServerConfig::default());

        assert_eq!(server.config.port, 7777);
        assert!(server.config.site.live_reload);
    }

    #[tokio::test]
    async fn root_redirects_to_introduction() {
        let (_temp, state) = fixture();

        let (status, headers, _) = get(&state, "/").await;

        assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(headers[header::LOCATION], "/docs");
    }

    #[tokio::test]
    async fn renders_pages_on_demand() {
        let (_temp, state) = fixture();

        let (status, _, body) = get(&state, "/docs/quickstart").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<title>Quickstart - Sutra Docs</title>"));
        assert!(body.contains("footer-card prev"));
        assert!(body.contains("__reload.js"));
    }

    #[tokio::test]
    async fn unknown_page_is_not_found() {
        let (_temp, state) = fixture();

        let (status, _, body) = get(&state, "/docs/missing").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Page not found"));
    }

    #[tokio::test]
    async fn serves_theme_assets() {
        let (_temp, state) = fixture();

        let (status, headers, body) = get(&state, "/assets/main.css").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "text/css");
        assert!(body.contains(".page-footer"));

        let (status, _, _) = get(&state, "/assets/unknown.css").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn serves_openapi_spec_as_json() {
        let (_temp, state) = fixture();

        let (status, headers, body) = get(&state, "/api/openapi-spec").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CACHE_CONTROL], "public, max-age=3600");
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["info"]["title"], "Sutra API");
    }

    #[tokio::test]
    async fn missing_openapi_spec_is_server_error() {
        let (temp, state) = fixture();
        fs::remove_file(temp.path().join("sutra.yml")).unwrap();

        let (status, _, body) = get(&state, "/api/openapi-spec").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(json["error"].as_str().unwrap().contains("sutra.yml"));
    }

    #[tokio::test]
    async fn echoes_service_description() {
        let (_temp, state) = fixture();

        let (status, _, body) = get(&state, "/api/sutra-api").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"name":"sutra"}"#);
    }

    #[tokio::test]
    async fn script_uses_request_host() {
        let (_temp, state) = fixture();

        let response = create_router(Arc::clone(&state))
            .oneshot(
                Request::builder()
                    .uri("/__reload.js")
                    .header(header::HOST, "localhost:9000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        assert!(String::from_utf8_lossy(&body).contains("ws://localhost:9000/__reload"));
    }

    #[tokio::test]
    async fn sidebar_change_reloads_catalog() {
        let (temp, state) = fixture();
        let mut rx = state.read().await.hub.subscribe();
        let sidebar = temp.path().join("sidebar.yml");
        fs::write(
            &sidebar,
            "categories:\n  - title: Only\n    entries:\n      - { title: Quickstart, path: /docs/quickstart }\n",
        )
        .unwrap();

        handle_watch_event(&state, WatchEvent::Sidebar(sidebar)).await;

        assert_eq!(rx.try_recv().unwrap(), ReloadMessage::Reload);
        assert_eq!(state.read().await.site.catalog().categories()[0].title, "Only");
    }

    #[tokio::test]
    async fn broken_sidebar_keeps_previous_catalog() {
        let (temp, state) = fixture();
        let mut rx = state.read().await.hub.subscribe();
        let sidebar = temp.path().join("sidebar.yml");
        fs::write(&sidebar, "categories: [").unwrap();

        handle_watch_event(&state, WatchEvent::Sidebar(sidebar)).await;

        assert!(matches!(rx.try_recv().unwrap(), ReloadMessage::Error { .. }));
        assert_eq!(
            state.read().await.site.catalog().categories()[0].title,
            "Get Started"
        );
    }

    #[tokio::test]
    async fn content_change_picks_up_new_pages() {
        let (temp, state) = fixture();
        let page = temp.path().join("docs/streaming.mdx");
        fs::write(&page, "---\ntitle: Streaming\n---\n").unwrap();

        handle_watch_event(&state, WatchEvent::Content(page)).await;

        let (status, _, _) = get(&state, "/docs/streaming").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn deployment_base_url_is_ignored_in_dev() {
        let (_temp, state) = fixture_with_base("/sutra/");

        let (status, _, body) = get(&state, "/docs").await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body.contains("sutra&#x2f;"));
        assert!(!body.contains("/sutra/"));

        let (status, _, _) = get(&state, "/docs/quickstart").await;
        assert_eq!(status, StatusCode::OK);

        let (status, _, _) = get(&state, "/assets/main.css").await;
        assert_eq!(status, StatusCode::OK);
    }
}

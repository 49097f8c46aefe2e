//! Local server with fallback rendering for ungenerated posts

use anyhow::Result;
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Response},
    Router,
};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tower_http::services::ServeDir;

use crate::cms::CmsClient;
use crate::generator::Generator;
use crate::Comet;

/// Server state
struct ServerState {
    comet: Comet,
    /// Uids with a fallback render currently in flight
    in_flight: Mutex<HashSet<String>>,
}

/// Start the server
pub async fn start(comet: &Comet, ip: &str, port: u16, open: bool) -> Result<()> {
    let state = Arc::new(ServerState {
        comet: comet.clone(),
        in_flight: Mutex::new(HashSet::new()),
    });

    let app = Router::new().fallback(fallback_handler).with_state(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Serves generated files; a post that was not generated gets a loading
/// placeholder while its page is rendered in the background
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    let path = request.uri().path().to_string();

    if let Some(uid) = post_uid_from_path(&path) {
        let generated = state
            .comet
            .public_dir
            .join("post")
            .join(&uid)
            .join("index.html");

        if !generated.exists() {
            spawn_fallback_render(state.clone(), uid);
            return match loading_page(&state.comet) {
                Ok(html) => Html(html).into_response(),
                Err(e) => {
                    tracing::error!("Failed to render loading page: {}", e);
                    (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
                }
            };
        }
    }

    let mut service = ServeDir::new(&state.comet.public_dir).append_index_html_on_directories(true);
    match service.try_call(request).await {
        Ok(response) => response.into_response(),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
    }
}

fn loading_page(comet: &Comet) -> Result<String> {
    Generator::new(comet)?.render_loading()
}

/// Extract the uid from a `/post/{uid}` path
fn post_uid_from_path(path: &str) -> Option<String> {
    let rest = path.strip_prefix("/post/")?;
    let uid = rest.trim_end_matches('/');
    if uid.is_empty() || uid.contains('/') || uid.contains("..") {
        return None;
    }
    Some(uid.to_string())
}

/// Render one post in the background. At most one render per uid runs
/// at a time; the placeholder keeps polling until the file lands.
fn spawn_fallback_render(state: Arc<ServerState>, uid: String) {
    {
        let mut in_flight = state.in_flight.lock().unwrap();
        if !in_flight.insert(uid.clone()) {
            return;
        }
    }

    tokio::spawn(async move {
        tracing::info!("Fallback render for post {}", uid);
        let result = render_one(&state.comet, &uid).await;
        if let Err(e) = result {
            tracing::warn!("Fallback render failed for {}: {}", uid, e);
        }
        state.in_flight.lock().unwrap().remove(&uid);
    });
}

async fn render_one(comet: &Comet, uid: &str) -> Result<()> {
    let client = CmsClient::connect(&comet.config.api).await?;
    let generator = Generator::new(comet)?;
    generator.generate_post(&client, uid, None).await
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}

// File: src/web_server.rs
// Web server with dashboard page model, connection commands and WebSocket updates

use anyhow::Result;
use axum::{
    extract::{ws::Message, ws::WebSocket, Path, Query, State, WebSocketUpgrade},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{delete, get},
    Json, Router,
};
use futures::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

use crate::commands::CommandDispatcher;
use crate::connections::{validate_peer, ConnectionsView};
use crate::dashboard::{connections_view, status_panel, BlockRowView, DashboardView, StatusPanel};
use crate::data_models::{AppConfig, WebSocketMessage};
use crate::navigation::{Route, SearchBox, Navigator};
use crate::store::NodeStore;

/// Query parameters for block search
#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

/// Body of an open-connection request
#[derive(Deserialize)]
struct OpenConnectionRequest {
    host: String,
    port: u16,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: NodeStore,
    pub commands: CommandDispatcher,
}

/// Build the router with every dashboard route
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard_html))
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/status", get(get_status))
        .route("/api/blocks", get(get_blocks))
        .route("/api/connections", get(get_connections).post(open_connection))
        .route("/api/connections/:node_id", delete(close_connection))
        .route("/api/search", get(search_block))
        .route("/ws", get(websocket_handler))
        .with_state(state)
}

/// Run the web server
pub async fn run_web_mode(
    config: &AppConfig,
    store: NodeStore,
    commands: CommandDispatcher,
    bind: &str,
    port: u16,
    enable_cors: bool,
) -> Result<()> {
    let app_state = AppState {
        config: config.clone(),
        store,
        commands,
    };

    let mut app = router(app_state);

    // Add CORS if enabled
    if enable_cors {
        app = app.layer(
            ServiceBuilder::new().layer(
                CorsLayer::new()
                    .allow_origin(tower_http::cors::Any)
                    .allow_methods(tower_http::cors::Any)
                    .allow_headers(tower_http::cors::Any),
            ),
        );
    }

    let addr: SocketAddr = format!("{}:{}", bind, port).parse()?;

    println!("🌐 Web dashboard available at: http://{}", addr);
    println!("🔌 WebSocket endpoint: ws://{}/ws", addr);
    println!("📊 API endpoints:");
    println!("   GET    /api/dashboard - Full page model");
    println!("   GET    /api/status - Status panel");
    println!("   GET    /api/blocks - Recent blocks table");
    println!("   GET    /api/connections - Peer connections");
    println!("   POST   /api/connections - Open a peer connection");
    println!("   DELETE /api/connections/:node_id - Close a peer connection");
    println!("   GET    /api/search?q=HASH - Block page location");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "web dashboard listening");
    axum::serve(listener, app).await?;

    Ok(())
}

/// Serve the main dashboard HTML page
async fn dashboard_html() -> Html<&'static str> {
    Html(include_str!("dashboard.html"))
}

async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardView> {
    let snapshot = state.store.snapshot().await;
    Json(DashboardView::from_state(&snapshot, &state.config.base_path))
}

async fn get_status(State(state): State<AppState>) -> Json<StatusPanel> {
    let snapshot = state.store.snapshot().await;
    Json(status_panel(&snapshot))
}

async fn get_blocks(State(state): State<AppState>) -> Json<Vec<BlockRowView>> {
    let snapshot = state.store.snapshot().await;
    Json(DashboardView::from_state(&snapshot, &state.config.base_path).blocks)
}

async fn get_connections(State(state): State<AppState>) -> Json<ConnectionsView> {
    let snapshot = state.store.snapshot().await;
    Json(connections_view(&snapshot))
}

/// Forward an open-connection command; the outcome arrives with a later snapshot
async fn open_connection(
    State(state): State<AppState>,
    Json(request): Json<OpenConnectionRequest>,
) -> StatusCode {
    match validate_peer(&request.host, request.port) {
        Ok((host, port)) => {
            state.commands.open_connection(&host, port);
            StatusCode::ACCEPTED
        }
        Err(e) => {
            warn!("rejected open connection request: {}", e);
            StatusCode::BAD_REQUEST
        }
    }
}

async fn close_connection(
    Path(node_id): Path<String>,
    State(state): State<AppState>,
) -> StatusCode {
    state.commands.close_connection(&node_id);
    StatusCode::ACCEPTED
}

/// Resolve the search box to a block page location, without validating it
async fn search_block(
    Query(params): Query<SearchQuery>,
    State(state): State<AppState>,
) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "location": Route::Block(params.q).path(&state.config.base_path),
    }))
}

/// WebSocket connection handler
async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_websocket(socket, state))
}

/// Handle individual WebSocket connections
async fn handle_websocket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    // Send initial dashboard data
    let snapshot = state.store.snapshot().await;
    let message = WebSocketMessage::Dashboard {
        data: DashboardView::from_state(&snapshot, &state.config.base_path),
    };
    if let Ok(json) = serde_json::to_string(&message) {
        if sender.send(Message::Text(json)).await.is_err() {
            return;
        }
    }

    // Subscribe before entering the loop so no replacement is missed
    let mut updates = state.store.subscribe();

    loop {
        tokio::select! {
            update = updates.recv() => {
                let node_state = match update {
                    Ok(node_state) => node_state,
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "websocket client lagging behind node updates");
                        state.store.snapshot().await
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                };
                let message = WebSocketMessage::Dashboard {
                    data: DashboardView::from_state(&node_state, &state.config.base_path),
                };
                if let Ok(json) = serde_json::to_string(&message) {
                    if sender.send(Message::Text(json)).await.is_err() {
                        break;
                    }
                }
            }

            // Handle incoming messages from client
            msg = receiver.next() => {
                let msg = match msg {
                    Some(Ok(msg)) => msg,
                    _ => break,
                };

                match msg {
                    Message::Text(text) => {
                        let response = match serde_json::from_str::<WebSocketMessage>(&text) {
                            Ok(request) => handle_websocket_message(request, &state).await,
                            Err(e) => {
                                warn!("unreadable websocket message: {}", e);
                                WebSocketMessage::Error {
                                    message: format!("Invalid message: {}", e),
                                }
                            }
                        };

                        if let Ok(json) = serde_json::to_string(&response) {
                            if sender.send(Message::Text(json)).await.is_err() {
                                break;
                            }
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    }
}

/// Handle individual WebSocket messages
async fn handle_websocket_message(message: WebSocketMessage, state: &AppState) -> WebSocketMessage {
    match message {
        WebSocketMessage::GetDashboard => {
            let snapshot = state.store.snapshot().await;
            WebSocketMessage::Dashboard {
                data: DashboardView::from_state(&snapshot, &state.config.base_path),
            }
        }

        WebSocketMessage::OpenConnection { host, port } => match validate_peer(&host, port) {
            Ok((host, port)) => {
                state.commands.open_connection(&host, port);
                WebSocketMessage::Accepted
            }
            Err(e) => WebSocketMessage::Error { message: e.to_string() },
        },

        WebSocketMessage::CloseConnection { node_id } => {
            state.commands.close_connection(&node_id);
            WebSocketMessage::Accepted
        }

        WebSocketMessage::Search { query } => {
            let mut navigator = Navigator::new(state.config.base_path.clone());
            let mut search = SearchBox::default();
            search.set(query);
            WebSocketMessage::Navigate {
                location: search.submit(&mut navigator),
            }
        }

        WebSocketMessage::Ping => WebSocketMessage::Pong,

        _ => WebSocketMessage::Error {
            message: "Unsupported message type".to_string(),
        },
    }
}

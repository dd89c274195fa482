//! Axum web server with WebSocket streaming of playback frames.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use dsa_steps::{Scenario, Step, View};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

use crate::frame::Frame;
use crate::player::Player;
use crate::playback::PlaybackStatus;

/// Frame type streamed to clients.
pub type ScenarioFrame = Frame<Step, View>;

/// Shared application state.
pub struct AppState {
    player: Player<Scenario>,
}

/// Visualization server.
pub struct VisServer {
    state: Arc<AppState>,
}

impl VisServer {
    /// Create a new visualization server around a player.
    pub fn new(player: Player<Scenario>) -> Self {
        Self {
            state: Arc::new(AppState { player }),
        }
    }

    /// Build the router for the server.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/status", get(status_handler))
            .route("/api/frame", get(frame_handler))
            .route("/api/scenario", post(scenario_handler))
            .route("/api/playback", get(playback_status_handler))
            .route("/api/playback/play", post(play_handler))
            .route("/api/playback/pause", post(pause_handler))
            .route("/api/playback/stop", post(stop_handler))
            .route("/api/playback/reset", post(reset_handler))
            .route("/api/playback/seek", post(seek_handler))
            .route("/api/playback/speed", post(speed_handler))
            .route("/api/playback/step", post(step_handler))
            // WebSocket for frame streaming
            .route("/ws", get(ws_handler))
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Run the server on the given address.
    pub async fn serve(self, addr: SocketAddr) -> Result<(), std::io::Error> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Visualization server running on http://{}", addr);
        axum::serve(listener, self.router()).await
    }
}

/// Server status response.
#[derive(Serialize)]
struct StatusResponse {
    status: &'static str,
    algorithm: String,
    total_steps: usize,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let status = state.player.status().await;
    Json(StatusResponse {
        status: "ok",
        algorithm: status.algorithm,
        total_steps: status.total_steps,
    })
}

async fn frame_handler(State(state): State<Arc<AppState>>) -> Json<ScenarioFrame> {
    Json(state.player.frame().await)
}

async fn scenario_handler(
    State(state): State<Arc<AppState>>,
    Json(scenario): Json<Scenario>,
) -> Result<Json<PlaybackStatus>, (StatusCode, Json<ErrorResponse>)> {
    match state.player.load(scenario).await {
        Ok(status) => {
            info!(algorithm = %status.algorithm, steps = status.total_steps, "scenario loaded");
            Ok(Json(status))
        }
        Err(e) => {
            warn!("rejected scenario: {}", e);
            Err((StatusCode::BAD_REQUEST, Json(ErrorResponse {
                error: e.to_string(),
            })))
        }
    }
}

async fn playback_status_handler(State(state): State<Arc<AppState>>) -> Json<PlaybackStatus> {
    Json(state.player.status().await)
}

async fn play_handler(State(state): State<Arc<AppState>>) -> Json<PlaybackStatus> {
    Json(state.player.play().await)
}

async fn pause_handler(State(state): State<Arc<AppState>>) -> Json<PlaybackStatus> {
    Json(state.player.pause().await)
}

async fn stop_handler(State(state): State<Arc<AppState>>) -> Json<PlaybackStatus> {
    Json(state.player.stop().await)
}

async fn reset_handler(State(state): State<Arc<AppState>>) -> Json<PlaybackStatus> {
    Json(state.player.reset().await)
}

#[derive(Deserialize)]
struct SeekRequest {
    applied: usize,
}

async fn seek_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SeekRequest>,
) -> Json<PlaybackStatus> {
    Json(state.player.seek(req.applied).await)
}

#[derive(Deserialize)]
struct SpeedRequest {
    speed: f64,
}

async fn speed_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SpeedRequest>,
) -> Json<PlaybackStatus> {
    Json(state.player.set_speed(req.speed).await)
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Direction {
    Forward,
    Backward,
}

#[derive(Deserialize)]
struct StepRequest {
    direction: Direction,
}

async fn step_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StepRequest>,
) -> Json<PlaybackStatus> {
    Json(step(&state, req.direction).await)
}

async fn step(state: &AppState, direction: Direction) -> PlaybackStatus {
    match direction {
        Direction::Forward => state.player.step_forward().await,
        Direction::Backward => state.player.step_backward().await,
    }
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    info!("WebSocket client connected");
    let mut frames = state.player.subscribe();

    // Send the frame at the current cursor first
    let initial = WsResponse::Frame(frames.borrow_and_update().clone());
    if send_json(&mut socket, &initial).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            changed = frames.changed() => {
                if changed.is_err() {
                    break;
                }
                let frame = WsResponse::Frame(frames.borrow_and_update().clone());
                if let Err(e) = send_json(&mut socket, &frame).await {
                    warn!("Failed to send frame: {}", e);
                    break;
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let response = match serde_json::from_str::<WsCommand>(&text) {
                            Ok(cmd) => handle_ws_command(&state, cmd).await,
                            Err(e) => WsResponse::Error {
                                message: e.to_string(),
                            },
                        };
                        if send_json(&mut socket, &response).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        debug!("WebSocket error: {}", e);
                        break;
                    }
                    _ => {}
                }
            }
        }
    }
    info!("WebSocket client disconnected");
}

async fn send_json<T: Serialize>(socket: &mut WebSocket, value: &T) -> Result<(), axum::Error> {
    let json = serde_json::to_string(value).map_err(axum::Error::new)?;
    socket.send(Message::Text(json.into())).await
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsCommand {
    GetFrame,
    GetStatus,
    Play,
    Pause,
    Stop,
    Reset,
    Step { direction: Direction },
    Seek { applied: usize },
    Speed { speed: f64 },
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsResponse {
    Frame(ScenarioFrame),
    Status(PlaybackStatus),
    Error { message: String },
}

async fn handle_ws_command(state: &AppState, cmd: WsCommand) -> WsResponse {
    let status = match cmd {
        WsCommand::GetFrame => return WsResponse::Frame(state.player.frame().await),
        WsCommand::GetStatus => state.player.status().await,
        WsCommand::Play => state.player.play().await,
        WsCommand::Pause => state.player.pause().await,
        WsCommand::Stop => state.player.stop().await,
        WsCommand::Reset => state.player.reset().await,
        WsCommand::Step { direction } => step(state, direction).await,
        WsCommand::Seek { applied } => state.player.seek(applied).await,
        WsCommand::Speed { speed } => state.player.set_speed(speed).await,
    };
    WsResponse::Status(status)
}

//! DSA Engine Visualization
//!
//! Timer-driven playback of recorded algorithm steps.
//!
//! # Architecture
//!
//! - **Playback**: cursor over a step sequence with play/pause/stop/reset/seek
//! - **Player**: tokio tick task applying one step per interval, stopped
//!   through an explicit cancellation token
//! - **WebSocket**: streams frames to the frontend
//! - **REST API**: control playback, load scenarios, get frames
//!
//! # Usage
//!
//! ```ignore
//! let scenario = Scenario::demo(ScenarioKind::QuickSort, &InputConfig::default());
//! let player = Player::new(Playback::new(scenario)?);
//!
//! let server = VisServer::new(player);
//! server.serve(addr).await?;
//! ```

mod cancel;
mod config;
mod error;
mod frame;
mod playback;
mod player;
mod server;

pub use cancel::{CancellationSource, CancellationToken};
pub use config::VisConfig;
pub use error::{Error, Result};
pub use frame::{Frame, FrameOf};
pub use playback::{Controls, Playback, PlaybackState, PlaybackStatus, Speed, DEFAULT_BASE_DELAY};
pub use player::Player;
pub use server::{ScenarioFrame, VisServer};

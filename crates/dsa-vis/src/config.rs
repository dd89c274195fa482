//! Visualizer configuration from environment variables.

use std::net::SocketAddr;
use std::time::Duration;

use dsa_steps::{InputConfig, ScenarioKind};

use crate::error::{Error, Result};
use crate::playback::DEFAULT_BASE_DELAY;

/// Configuration for the visualizer binary.
#[derive(Debug, Clone)]
pub struct VisConfig {
    /// HTTP/WebSocket listen address
    pub addr: SocketAddr,

    /// Tick interval at 1x speed
    pub base_delay: Duration,

    /// Demo scenario loaded at startup
    pub scenario: ScenarioKind,

    /// Generated array shape for sort demos
    pub input: InputConfig,
}

impl Default for VisConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            base_delay: DEFAULT_BASE_DELAY,
            scenario: ScenarioKind::QuickSort,
            input: InputConfig::default(),
        }
    }
}

impl VisConfig {
    /// Create config from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = lookup("DSA_VIS_ADDR") {
            config.addr = parse("DSA_VIS_ADDR", &addr)?;
        }
        if let Some(ms) = lookup("DSA_VIS_BASE_DELAY_MS") {
            let ms: u64 = parse("DSA_VIS_BASE_DELAY_MS", &ms)?;
            if ms == 0 {
                return Err(Error::Config("DSA_VIS_BASE_DELAY_MS must be positive".into()));
            }
            config.base_delay = Duration::from_millis(ms);
        }
        if let Some(kind) = lookup("DSA_VIS_SCENARIO") {
            config.scenario = kind.trim().parse().map_err(Error::Config)?;
        }
        if let Some(len) = lookup("DSA_VIS_LEN") {
            config.input.len = parse("DSA_VIS_LEN", &len)?;
        }
        if let Some(seed) = lookup("DSA_VIS_SEED") {
            config.input.seed = parse("DSA_VIS_SEED", &seed)?;
        }

        Ok(config)
    }
}

fn parse<T>(key: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| Error::Config(format!("invalid {key} '{raw}': {e}")))
}

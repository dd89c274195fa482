//! DSA Engine Cache Store
//!
//! Expiring cache for solved-problem summaries fetched from LeetCode and
//! Codeforces proxies.
//!
//! - [`Cache`]: `get` / `set(key, value, ttl)` with an injectable [`Clock`]
//! - [`Store`]: [`MemoryStore`] for the process, [`DbStore`] on disk
//! - [`SolvedSummary`]: proxy response shape, tagged by [`ProblemSource`]

mod cache;
mod error;
mod problem;
mod store;

pub use cache::{Cache, Clock, ManualClock, SystemClock, DEFAULT_TTL};
pub use error::{Error, Result};
pub use problem::{ProblemRef, ProblemSource, SolvedSummary};
pub use store::{DbStore, Entry, MemoryStore, Store};

//! PvP stats server
//!
//! Resolves a Minecraft display name to its Mojang profile id (through a
//! Redis cache-aside layer) and serves the player's persisted PvP stats.

pub mod api;
pub mod cache;
pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod identity;
pub mod metrics;
pub mod rate_limit;
pub mod server;
pub mod stats;

pub use context::AppContext;
pub use error::{StatsError, StatsResult};

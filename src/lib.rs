// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod clock;
pub mod config;
pub mod controller;
pub mod runtime;
pub mod session;
pub mod stats;
pub mod words;

/// Cadence at which the countdown is re-evaluated, in milliseconds.
pub const TICK_RATE_MS: u64 = 200;

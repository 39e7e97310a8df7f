// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod arena;
pub mod audio;
pub mod config;
pub mod export;
pub mod metrics;
pub mod runtime;
pub mod session;
pub mod time_series;
pub mod util;

pub use metrics::{summarize, summarize_over, ClickEvent, Point, SessionSummary, Tier};

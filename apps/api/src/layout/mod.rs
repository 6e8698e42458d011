// Single-page layout: static page metrics, the deterministic estimator, the
// reduction catalogue and the stage-3 layout prompt.
// Everything here except `handlers` is pure and synchronous.

pub mod estimator;
pub mod handlers;
pub mod metrics;
pub mod prompts;
pub mod reducer;

// Re-export the page setup consumed by state and startup.
pub use metrics::{default_page_metrics, PageMetrics};

//! Dark Factory control plane service.
//!
//! Assembles the component crates behind a single warp application:
//! Judge-01 Scenario Eval (`/evaluate`), Spec Engine (`/specs`), Scenario
//! Executor (`/scenarios`), Attractor (`/attractor`), and DTU Controller
//! (`/dtu`). Error bodies use the `{"detail": ...}` shape SDSM already
//! consumes.

pub mod rejections;
pub mod routes;
pub mod state;

pub use routes::app;
pub use state::AppState;

/// Service version reported by `GET /health`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

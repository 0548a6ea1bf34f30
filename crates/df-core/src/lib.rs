//! Core primitives shared across the Dark Factory workspace.
//!
//! Everything here is wire-level plumbing: the unit-interval satisfaction
//! score, short hex identifier fragments, and decimal rounding for response
//! payloads.

pub mod identifiers;
pub mod rounding;
pub mod score;

pub use identifiers::short_hex;
pub use rounding::round_dp;
pub use score::{SatisfactionScore, ScoreOutOfRange};

//! Attractor - convergence agent for Dark Factory spec satisfaction.
//!
//! The attractor runs the generate-verify-evaluate cycle that pulls
//! generated code toward the satisfaction threshold of a published spec,
//! within an explicit budget. When progress stalls it distinguishes weak
//! generation from a defective spec and, in supervised mode, proposes
//! amendments instead of burning budget.

pub mod convergence;
pub mod driver;
pub mod models;

pub use convergence::{AttractorEngine, STALL_DELTA_THRESHOLD};
pub use driver::{ConvergenceDriver, HttpDriver};
pub use models::{
    AmendmentDiagnosis, AmendmentProposal, BudgetAllocation, CodebaseContext, ConvergeRequest,
    ConvergeResponse, ConvergenceState, ConvergenceStatus, ExecutionMode, IterationResult,
};

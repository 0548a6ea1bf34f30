//! Spec Engine - spec validation and scenario compilation.
//!
//! Specs describe a behavior contract for a target service: inputs, outputs,
//! invariants, and weighted acceptance criteria. The engine validates specs
//! for completeness and compiles published specs into scenario skeletons that
//! the Scenario Executor populates with concrete test data.

pub mod compiler;
pub mod models;
pub mod state;
pub mod validator;

pub use compiler::{compile_criterion, compile_invariant, compile_spec};
pub use models::{
    AcceptanceCriterion, CompileRequest, CompileResponse, ScenarioSkeleton, ScenarioStep, Spec,
    SpecDependencies, SpecDomain, SpecInput, SpecOutput, SpecState, ValidateRequest,
    ValidateResponse,
};
pub use state::{allowed_transitions, can_transition};
pub use validator::validate_spec;

//! DTU Controller - digital twin universe lifecycle management.
//!
//! Each scenario execution gets an isolated namespace with API-compatible
//! behavioral clones of the services under test. Twins are lightweight
//! containers with in-memory state designed for fast startup.

pub mod models;
pub mod orchestrator;

pub use models::{
    EnvironmentSpec, EnvironmentStatus, ProvisionRequest, ProvisionResponse, TeardownRequest,
    TeardownResponse, TwinInstance, TwinSpec, TwinStatus, TWIN_CATALOG,
};
pub use orchestrator::DtuOrchestrator;

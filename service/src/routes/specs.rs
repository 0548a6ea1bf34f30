//! Spec Engine endpoints.

use df_spec_engine::{compile_spec, validate_spec, CompileRequest, CompileResponse, ValidateRequest};
use warp::{Filter, Rejection, Reply};

pub(crate) fn routes() -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let validate_route = warp::path!("specs" / "validate")
        .and(warp::post())
        .and(warp::body::json())
        .and_then(validate);
    let compile_route = warp::path!("specs" / "compile")
        .and(warp::post())
        .and(warp::body::json())
        .and_then(compile);
    validate_route.or(compile_route)
}

/// `POST /specs/validate`: check a spec for completeness.
async fn validate(request: ValidateRequest) -> Result<impl Reply, Rejection> {
    let result = validate_spec(&request.spec);
    tracing::info!(
        "Validated spec {}: valid={} errors={}",
        request.spec.id,
        result.valid,
        result.errors.len()
    );
    Ok(warp::reply::json(&result))
}

/// `POST /specs/compile`: validate, then compile into scenario skeletons.
/// Validation errors come back in the compile response with no scenarios.
async fn compile(request: CompileRequest) -> Result<impl Reply, Rejection> {
    let validation = validate_spec(&request.spec);
    if !validation.valid {
        let response = CompileResponse {
            spec_id: request.spec.id.clone(),
            version: request.spec.version.clone(),
            scenarios: Vec::new(),
            errors: validation.errors,
        };
        return Ok(warp::reply::json(&response));
    }

    let result = compile_spec(&request.spec);
    tracing::info!(
        "Compiled spec {}: scenarios={} errors={}",
        request.spec.id,
        result.scenarios.len(),
        result.errors.len()
    );
    Ok(warp::reply::json(&result))
}

//! Route dispatch: maps parsed requests onto the model registry and turns
//! `ModelError`s into status codes.

use std::collections::BTreeMap;
use std::io;
use std::time::Instant;

use log::{error, info};
use serde::Deserialize;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};

use distributions::{CurveData, ModelError, ModelType, Registry, validate_parameters};

use crate::http::{self, Method, Request, Response};
use crate::settings::Settings;

const HEALTH_PATH: &str = "/api/v1/health";
const DISTRIBUTIONS_PATH: &str = "/api/v1/distributions";
const CALCULATE_PATH: &str = "/api/v1/calculate";

/// Fewest and most parameters a calculate request may carry.
const MIN_PARAMETERS: usize = 1;
const MAX_PARAMETERS: usize = 20;

const MIN_NUM_POINTS: usize = 10;

/// Body of `POST /api/v1/calculate`.
#[derive(Debug, Deserialize)]
pub struct CalculateRequest {
    pub distribution_type: ModelType,
    pub parameters: BTreeMap<String, f64>,
    #[serde(default)]
    pub num_points: Option<usize>,
}

/// Serves one connection: read a request, dispatch it, write the response,
/// log the exchange. One request per connection.
pub async fn handle_connection<S>(
    stream: S,
    registry: &Registry,
    settings: &Settings,
) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (rx, mut tx) = tokio::io::split(stream);
    let mut rx = BufReader::new(rx);

    let started = Instant::now();
    let request = match http::read_request(&mut rx).await {
        Ok(Some(request)) => request,
        Ok(None) => return Ok(()),
        Err(e) if e.kind() == io::ErrorKind::InvalidData => {
            let response = Response::detail(400, &e.to_string());
            return http::write_response(&mut tx, &response, None, elapsed(started)).await;
        }
        Err(e) => return Err(e),
    };

    let response = handle(&request, registry, settings);
    let allow_origin = request
        .origin
        .as_deref()
        .filter(|origin| settings.allows_origin(origin));

    let process_time = elapsed(started);
    info!(
        "{} {} - status: {} - time: {process_time:.3}s",
        request.method, request.path, response.status
    );
    http::write_response(&mut tx, &response, allow_origin, process_time).await
}

fn elapsed(started: Instant) -> f64 {
    started.elapsed().as_secs_f64()
}

/// Pure dispatch, factored out of the connection handling so tests can call
/// it on constructed requests.
pub fn handle(request: &Request, registry: &Registry, settings: &Settings) -> Response {
    if request.method == Method::Options {
        return Response::no_content();
    }

    match (request.method, request.path.as_str()) {
        (Method::Get, "/") => Response::json(
            200,
            &serde_json::json!({
                "message": "distribution visualization API",
                "health": HEALTH_PATH,
            }),
        ),
        (Method::Get, HEALTH_PATH) => Response::json(
            200,
            &serde_json::json!({ "status": "healthy", "service": "distribution-api" }),
        ),
        (Method::Get, DISTRIBUTIONS_PATH) => {
            let all: Vec<_> = registry.list().collect();
            Response::json(200, &all)
        }
        (Method::Get, path) => match path.strip_prefix("/api/v1/distributions/") {
            Some(raw_type) => describe(raw_type, registry),
            None => Response::detail(404, "not found"),
        },
        (Method::Post, CALCULATE_PATH) => calculate(&request.body, registry, settings),
        _ => Response::detail(404, "not found"),
    }
}

fn describe(raw_type: &str, registry: &Registry) -> Response {
    let result = raw_type
        .parse::<ModelType>()
        .and_then(|model_type| registry.describe(model_type));
    match result {
        Ok(descriptor) => Response::json(200, descriptor),
        Err(e) => {
            error!("describe failed: {e}");
            Response::detail(status_for(&e), &e.to_string())
        }
    }
}

fn calculate(body: &[u8], registry: &Registry, settings: &Settings) -> Response {
    let request: CalculateRequest = match serde_json::from_slice(body) {
        Ok(request) => request,
        Err(e) => return Response::detail(400, &format!("malformed request: {e}")),
    };

    let count = request.parameters.len();
    if !(MIN_PARAMETERS..=MAX_PARAMETERS).contains(&count) {
        return Response::detail(
            400,
            &format!("expected {MIN_PARAMETERS} to {MAX_PARAMETERS} parameters, got {count}"),
        );
    }

    let num_points = request.num_points.unwrap_or(settings.default_num_points);
    if !(MIN_NUM_POINTS..=settings.max_num_points).contains(&num_points) {
        return Response::detail(
            400,
            &format!(
                "num_points ({num_points}) outside [{MIN_NUM_POINTS}, {}]",
                settings.max_num_points
            ),
        );
    }

    match compute(&request, num_points, registry) {
        Ok(data) => Response::json(200, &data),
        Err(e) => {
            error!("calculate failed: {e}");
            Response::detail(status_for(&e), &e.to_string())
        }
    }
}

fn compute(
    request: &CalculateRequest,
    num_points: usize,
    registry: &Registry,
) -> Result<CurveData, ModelError> {
    let descriptor = registry.describe(request.distribution_type)?;
    validate_parameters(descriptor, &request.parameters)?;
    registry.compute(request.distribution_type, &request.parameters, num_points)
}

fn status_for(error: &ModelError) -> u16 {
    match error {
        ModelError::UnknownModel { .. } => 404,
        ModelError::Validation(_) | ModelError::InvalidParameters(_) => 400,
        ModelError::NotImplemented { .. } => 500,
    }
}

use crate::core::{Matcher, SolverParams};
use crate::models::{
    AlgorithmKind, ComputeMatchesRequest, ComputeMatchesResponse, ErrorResponse, HealthResponse,
};
use actix_web::{web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

/// Application state shared across all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub algorithm: AlgorithmKind,
    pub params: SolverParams,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/compute", web::post().to(compute_matches));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Compute matches endpoint
///
/// POST /api/v1/matches/compute
///
/// Request body:
/// ```json
/// {
///   "eventId": "string",
///   "slots": ["09:00-09:15"],
///   "providers": [{ "id": "string", "availableSlots": ["09:00-09:15"] }],
///   "requesters": [{ "id": "string", "preferences": ["string"], "availableSlots": ["09:00-09:15"] }],
///   "algorithm": "exact|greedy",
///   "maxIterations": 5000,
///   "timeLimitMs": 30000,
///   "earlyTerminationThreshold": 0.95
/// }
/// ```
async fn compute_matches(
    state: web::Data<AppState>,
    req: web::Json<ComputeMatchesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for compute_matches request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let request = req.into_inner();
    let algorithm = request.algorithm.unwrap_or(state.algorithm);
    let params = request.solver_params(state.params);
    let input = request.into_input();
    let run_id = Uuid::new_v4().to_string();

    tracing::info!(
        "Computing matches for event {} (run {}, {}): {} requesters, {} providers, {} slots",
        input.event_id,
        run_id,
        algorithm,
        input.requesters.len(),
        input.providers.len(),
        input.slots.len()
    );

    // the solve is CPU bound, keep it off the async workers
    let matcher = Matcher::new(algorithm, params);
    let outcome = web::block(move || matcher.compute_matches(&input)).await;

    match outcome {
        Ok(Ok(outcome)) => {
            tracing::debug!("Run {} report: {:?}", run_id, outcome.report);
            HttpResponse::Ok().json(ComputeMatchesResponse {
                run_id,
                result: outcome.result,
                report: outcome.report,
            })
        }
        Ok(Err(e)) => {
            tracing::info!("Rejected input for run {}: {}", run_id, e);
            HttpResponse::UnprocessableEntity().json(ErrorResponse {
                error: "Invalid matching input".to_string(),
                message: e.to_string(),
                status_code: 422,
            })
        }
        Err(e) => {
            tracing::error!("Matching run {} failed: {}", run_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Matching failed".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};

    fn state() -> web::Data<AppState> {
        web::Data::new(AppState {
            algorithm: AlgorithmKind::Exact,
            params: SolverParams::default(),
        })
    }

    #[actix_web::test]
    async fn test_health_check() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "healthy");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[actix_web::test]
    async fn test_compute_matches() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/matches/compute")
            .set_json(json!({
                "eventId": "open-day",
                "slots": ["09:00-09:15", "09:15-09:30"],
                "providers": [{ "id": "f1", "availableSlots": ["09:00-09:15", "09:15-09:30"] }],
                "requesters": [
                    { "id": "s1", "preferences": ["f1"], "availableSlots": ["09:00-09:15"] },
                    { "id": "s2", "preferences": ["f1"], "availableSlots": ["09:00-09:15", "09:15-09:30"] },
                    { "id": "s3", "preferences": [], "availableSlots": ["09:00-09:15"] }
                ]
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["report"]["algorithm"], "exact");
        assert_eq!(body["result"]["meetings"].as_array().unwrap().len(), 2);
        assert_eq!(body["result"]["meetings"][0]["eventId"], "open-day");
        assert_eq!(body["result"]["unmatchedRequesters"], json!(["s3"]));
        assert!(body["result"]["timeTakenSeconds"].as_f64().is_some());
        assert!(Uuid::parse_str(body["runId"].as_str().unwrap()).is_ok());
    }

    #[actix_web::test]
    async fn test_rejects_empty_event_id() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/matches/compute")
            .set_json(json!({ "eventId": "" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_rejects_malformed_slot() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/matches/compute")
            .set_json(json!({ "eventId": "e", "slots": ["9am"] }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.status_code, 422);
        assert!(body.message.contains("9am"));
    }
}

use serde_json::json;
use topup_checkout::catalog::get_payment_categories;
use topup_checkout::config::ScoringWeights;
use topup_checkout::models::checkout::RecommendRequest;
use topup_checkout::models::payment::validate_catalog;
use topup_checkout::report::generate_ranking_report;
use topup_checkout::telemetry::init_tracing;
use tracing::{info, warn};
use vercel_runtime::{run, Body, Error, Request, Response, StatusCode};

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing("topup_checkout=info,recommend=info");
    run(handler).await
}

/// POST /api/recommend — Rank payment channels for a subtotal.
///
/// Uses the built-in catalog unless the body carries its own categories.
pub async fn handler(req: Request) -> Result<Response<Body>, Error> {
    if *req.method() != http::Method::POST {
        let error = json!({
            "error": "Method not allowed",
            "message": "Use POST with a subtotal to rank payment methods"
        });
        return json_response(StatusCode::METHOD_NOT_ALLOWED, error);
    }

    let request: RecommendRequest = match serde_json::from_slice(body_bytes(req.body())) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "rejected recommend request");
            let error = json!({ "error": "Invalid request body", "message": e.to_string() });
            return json_response(StatusCode::BAD_REQUEST, error);
        }
    };

    let categories = request.categories.unwrap_or_else(get_payment_categories);
    if let Err(e) = validate_catalog(&categories) {
        warn!(error = %e, "rejected payment categories");
        let error = json!({ "error": "Invalid payment categories", "message": e.to_string() });
        return json_response(StatusCode::BAD_REQUEST, error);
    }

    let report = generate_ranking_report(&categories, request.subtotal, &ScoringWeights::default());
    info!(
        subtotal = request.subtotal,
        recommended = ?report.recommended,
        online = report.overall.len(),
        "ranked payment methods"
    );

    json_response(StatusCode::OK, serde_json::to_value(&report)?)
}

fn body_bytes(body: &Body) -> &[u8] {
    match body {
        Body::Empty => &[],
        Body::Text(text) => text.as_bytes(),
        Body::Binary(bytes) => bytes.as_slice(),
    }
}

fn json_response(status: StatusCode, payload: serde_json::Value) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Body::Text(payload.to_string()))?)
}

use serde_json::json;
use topup_checkout::catalog::get_payment_categories;
use topup_checkout::engine::fallback::ToastLog;
use topup_checkout::engine::CheckoutEngine;
use topup_checkout::models::checkout::{FallbackRequest, FallbackResponse};
use topup_checkout::models::payment::validate_catalog;
use topup_checkout::telemetry::init_tracing;
use topup_checkout::CheckoutError;
use tracing::{info, warn};
use vercel_runtime::{run, Body, Error, Request, Response, StatusCode};

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing("topup_checkout=info,fallback=info");
    run(handler).await
}

/// POST /api/fallback — Re-check a selected payment channel against live statuses.
///
/// Returns the checkout phase, the fallback suggestion (if the selected
/// channel is no longer online) and any toasts the check produced.
pub async fn handler(req: Request) -> Result<Response<Body>, Error> {
    if *req.method() != http::Method::POST {
        let error = json!({
            "error": "Method not allowed",
            "message": "Use POST with the selected payment method to check for a fallback"
        });
        return json_response(StatusCode::METHOD_NOT_ALLOWED, error);
    }

    let request: FallbackRequest = match serde_json::from_slice(body_bytes(req.body())) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "rejected fallback request");
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

    let mut session = CheckoutEngine::default().start_session(ToastLog::default());
    match session.restore_selection(&request.selected_method_id, &categories, request.subtotal) {
        Ok(phase) => info!(
            method_id = %request.selected_method_id,
            subtotal = request.subtotal,
            ?phase,
            "fallback check"
        ),
        Err(e @ CheckoutError::UnknownMethod(_)) => {
            let error = json!({ "error": "Unknown payment method", "message": e.to_string() });
            return json_response(StatusCode::NOT_FOUND, error);
        }
        Err(e) => return Err(e.into()),
    }

    let suggestion = session.suggestion().cloned();
    let response = FallbackResponse {
        phase: session.phase(),
        selected: session.selected().cloned(),
        fee_delta: suggestion.as_ref().map(|s| s.fee_delta()),
        suggestion,
        toasts: session.into_notifier().into_toasts(),
    };

    json_response(StatusCode::OK, serde_json::to_value(&response)?)
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

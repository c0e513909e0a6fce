use vercel_runtime::{run, Body, Error, Request, Response, StatusCode};
use serde_json::json;
use topup_checkout::catalog::get_payment_categories;
use topup_checkout::engine::health::online_methods;
use topup_checkout::telemetry::init_tracing;
use topup_checkout::version;

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing("topup_checkout=info");
    run(handler).await
}

pub async fn handler(_req: Request) -> Result<Response<Body>, Error> {
    let categories = get_payment_categories();
    let payload = json!({
        "status": "ok",
        "version": version(),
        "channelsOnline": online_methods(&categories).len(),
    });

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .body(Body::Text(payload.to_string()))?)
}

//! AWS Lambda handler serving the projection API
//!
//! Accepts Lambda Function URL / API Gateway HTTP events and forwards the
//! method, path and body to the runtime-independent router.

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use startup_projection::{Api, ApiResponse};

fn into_http(response: ApiResponse) -> Result<Response<Body>, Error> {
    let mut builder = Response::builder().status(response.status);
    for (name, value) in response.headers() {
        builder = builder.header(name, value);
    }

    let body = if response.body.is_empty() {
        Body::Empty
    } else {
        Body::Text(response.body)
    };
    Ok(builder.body(body)?)
}

/// Lambda handler function
async fn handler(event: Request) -> Result<Response<Body>, Error> {
    let start = std::time::Instant::now();

    // Parse request body
    let body_str = match event.body() {
        Body::Text(s) => s.clone(),
        Body::Binary(b) => String::from_utf8_lossy(b).to_string(),
        Body::Empty => String::new(),
    };

    let api = Api::new();
    let response = api.handle(event.method().as_str(), event.uri().path(), &body_str);

    log::info!(
        "{} {} -> {} in {}ms",
        event.method(),
        event.uri().path(),
        response.status,
        start.elapsed().as_millis()
    );

    into_http(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}

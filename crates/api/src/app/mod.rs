//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: backend wiring (identity provider, directory, financials)
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower_http::trace::TraceLayer;

use crate::gate::RequestGate;
use crate::middleware::{self, GateState};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// Every route, the fallback included, sits behind the request gate.
pub fn build_app(services: AppServices) -> Router {
    let gate_state = GateState {
        gate: RequestGate::new(services.identity.clone(), services.base_domain.clone()),
        secure_cookies: services.secure_cookies,
    };
    let services = Arc::new(services);

    routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            gate_state,
            middleware::gate_middleware,
        ))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use super::*;

    fn request(host: &str, path: &str) -> Request<Body> {
        Request::builder()
            .uri(path)
            .header(header::HOST, host)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn nested_protected_path_redirects_even_without_a_route() {
        let app = build_app(AppServices::in_memory("example.org"));

        let res = app
            .oneshot(request("acme.example.org", "/dashboard/reports?year=2025"))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(res.headers().get(header::LOCATION).unwrap(), "/login?year=2025");
        assert_eq!(res.headers().get("x-subdomain").unwrap(), "acme");
    }

    #[tokio::test]
    async fn health_answers_on_any_host() {
        let app = build_app(AppServices::in_memory("example.org"));
        let res = app.oneshot(request("10.0.0.7:8080", "/health")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().get("x-subdomain").is_none());
    }
}

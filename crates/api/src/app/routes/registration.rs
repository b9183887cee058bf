use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};

use saldoo_auth::{RegistrationRequest, check_subdomain_availability, register_accountant};
use saldoo_core::Subdomain;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<RegistrationRequest>,
) -> axum::response::Response {
    match register_accountant(services.identity.as_ref(), services.directory.as_ref(), &body).await {
        Ok(registration) => {
            let login_url = services.login_url(registration.subdomain.as_str());
            (
                StatusCode::CREATED,
                Json(dto::RegistrationResponse::new(registration, login_url)),
            )
                .into_response()
        }
        Err(e) => {
            tracing::info!(error = %e, "registration refused");
            errors::registration_error_to_response(e)
        }
    }
}

/// Live availability check for the registration form. Malformed names are
/// reported unavailable without asking the directory.
pub async fn check_subdomain(
    Extension(services): Extension<Arc<AppServices>>,
    Path(name): Path<String>,
) -> axum::response::Response {
    let subdomain = name.trim().to_lowercase();
    let available = Subdomain::parse(&subdomain).is_ok()
        && check_subdomain_availability(services.directory.as_ref(), &subdomain).await;

    Json(dto::SubdomainAvailability { subdomain, available }).into_response()
}

use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use saldoo_dashboard::build_dashboard;

use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::SessionContext;
use crate::gate::LOGIN_PATH;
use crate::middleware::redirect;

/// Dashboard for the signed-in user, shaped by their role.
///
/// A user without a readable profile is sent back to the login page.
pub async fn dashboard(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    let Some(identity) = session.identity() else {
        return redirect(StatusCode::SEE_OTHER, LOGIN_PATH);
    };

    let profile = match services.directory.get_profile(identity.id).await {
        Ok(Some(profile)) => profile,
        Ok(None) => {
            tracing::warn!(user_id = %identity.id, "signed-in user has no profile");
            return redirect(StatusCode::SEE_OTHER, LOGIN_PATH);
        }
        Err(e) => {
            tracing::warn!(user_id = %identity.id, error = %e, "profile lookup failed");
            return redirect(StatusCode::SEE_OTHER, LOGIN_PATH);
        }
    };

    let today = Utc::now().date_naive();
    match build_dashboard(&profile, services.financials.as_ref(), today).await {
        Ok(page) => Json(page).into_response(),
        Err(e) => {
            tracing::warn!(user_id = %identity.id, error = %e, "dashboard data unavailable");
            errors::source_error_to_response(e)
        }
    }
}

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
};

use crate::app::services::AppServices;
use crate::gate::LOGIN_PATH;
use crate::middleware::{apply_cookies, redirect, session_jar};

/// End the session. Cookies are cleared even when the provider call fails.
pub async fn sign_out(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> axum::response::Response {
    let mut jar = session_jar(&headers);

    if let Err(e) = services.identity.sign_out(&mut jar).await {
        tracing::warn!(error = %e, "sign-out failed upstream");
        jar.clear_session();
    }

    let mut response = redirect(StatusCode::SEE_OTHER, LOGIN_PATH);
    apply_cookies(response.headers_mut(), jar.staged(), services.secure_cookies);
    response
}

use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};

use saldoo_auth::Branding;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::TenantContext;
use crate::gate::DASHBOARD_PATH;
use crate::middleware::{apply_cookies, redirect, session_jar};

/// Login page data, themed for the firm on this subdomain.
///
/// Without a subdomain the product branding is used. A subdomain that does
/// not lead to an active firm is reported rather than silently rebranded.
pub async fn login_page(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
) -> axum::response::Response {
    let Some(subdomain) = tenant.lookup_key() else {
        return Json(dto::LoginPage::new(None, Branding::generic())).into_response();
    };

    match services.directory.get_account_by_subdomain(&subdomain).await {
        Ok(Some(account)) => {
            Json(dto::LoginPage::new(Some(subdomain), Branding::from(&account))).into_response()
        }
        Ok(None) => office_not_found(&subdomain),
        Err(e) => {
            tracing::warn!(subdomain = %subdomain, error = %e, "account lookup failed");
            office_not_found(&subdomain)
        }
    }
}

fn office_not_found(subdomain: &str) -> axum::response::Response {
    errors::json_error(
        StatusCode::NOT_FOUND,
        "office_not_found",
        format!("no active office found for subdomain '{subdomain}'"),
    )
}

pub async fn sign_in(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Json(body): Json<dto::SignInRequest>,
) -> axum::response::Response {
    let mut jar = session_jar(&headers);

    match services
        .identity
        .sign_in_with_password(&mut jar, &body.email, &body.password)
        .await
    {
        Ok(identity) => {
            tracing::info!(user_id = %identity.id, "signed in");
            let mut response = redirect(StatusCode::SEE_OTHER, DASHBOARD_PATH);
            apply_cookies(response.headers_mut(), jar.staged(), services.secure_cookies);
            response
        }
        Err(e) => {
            tracing::info!(error = %e, "sign-in failed");
            errors::identity_error_to_response(e)
        }
    }
}

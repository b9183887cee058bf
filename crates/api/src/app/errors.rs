use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use saldoo_auth::{IdentityError, RegistrationError};
use saldoo_dashboard::SourceError;

pub fn registration_error_to_response(err: RegistrationError) -> axum::response::Response {
    let message = err.to_string();
    match err {
        RegistrationError::PasswordMismatch
        | RegistrationError::WeakPassword
        | RegistrationError::MissingFields
        | RegistrationError::InvalidSubdomain(_) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", message)
        }
        RegistrationError::SubdomainTaken => json_error(StatusCode::CONFLICT, "subdomain_taken", message),
        RegistrationError::SignUp(IdentityError::AlreadyRegistered) => {
            json_error(StatusCode::CONFLICT, "already_registered", message)
        }
        RegistrationError::SignUp(IdentityError::Rejected(_)) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "sign_up_rejected", message)
        }
        RegistrationError::AvailabilityCheck(_) => {
            json_error(StatusCode::SERVICE_UNAVAILABLE, "availability_check_failed", message)
        }
        RegistrationError::SignUp(_) | RegistrationError::AccountCreation(_) => {
            json_error(StatusCode::BAD_GATEWAY, "registration_failed", message)
        }
    }
}

pub fn identity_error_to_response(err: IdentityError) -> axum::response::Response {
    match err {
        IdentityError::InvalidCredentials => {
            json_error(StatusCode::UNAUTHORIZED, "invalid_credentials", err.to_string())
        }
        IdentityError::Rejected(msg) => json_error(StatusCode::BAD_REQUEST, "rejected", msg),
        other => json_error(StatusCode::BAD_GATEWAY, "identity_unavailable", other.to_string()),
    }
}

pub fn source_error_to_response(err: SourceError) -> axum::response::Response {
    json_error(StatusCode::BAD_GATEWAY, "dashboard_unavailable", err.to_string())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

use axum::{
    Router,
    routing::{get, post},
};

pub mod dashboard;
pub mod login;
pub mod registration;
pub mod session;
pub mod system;

/// Router for every page and form endpoint (all behind the gate).
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/login", get(login::login_page).post(login::sign_in))
        .route("/logout", post(session::sign_out))
        .route("/register", post(registration::register))
        .route("/register/subdomains/:name", get(registration::check_subdomain))
        .route("/dashboard", get(dashboard::dashboard))
        .fallback(system::not_found)
}

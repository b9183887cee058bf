//! Hosted backend adapters against a mock auth service and data API.
//!
//! These tests verify that:
//! 1. Session lookup refreshes on a rejected access token and stages new cookies
//! 2. A dead refresh token clears the session instead of failing
//! 3. Sign-in, sign-up and the registration RPCs map statuses to the right errors
//! 4. Data API rows are decoded into profiles, accounts and euro-cent periods

use saldoo_auth::session::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
use saldoo_auth::{
    CookieOp, Directory, DirectoryError, IdentityError, IdentityProvider, NewAccount, Role,
    SessionJar, SignUpMetadata,
};
use saldoo_core::{AccountId, CompanyId, Subdomain, UserId};
use saldoo_dashboard::FinancialSource;
use saldoo_infra::{HostedConfig, HostedDirectory, HostedIdentityProvider};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USER_ID: &str = "0190f2a4-6b8e-7c3d-9a1b-2c3d4e5f6a7b";
const ACCOUNT_ID: &str = "0190f2a4-6b8e-7c3d-9a1b-000000000001";
const COMPANY_ID: &str = "0190f2a4-6b8e-7c3d-9a1b-000000000002";

fn config(server: &MockServer) -> HostedConfig {
    HostedConfig::new(server.uri(), "anon-key").with_service_key("service-key")
}

fn token_body(access: &str, refresh: &str) -> serde_json::Value {
    json!({
        "access_token": access,
        "refresh_token": refresh,
        "token_type": "bearer",
        "expires_in": 3600,
        "user": { "id": USER_ID, "email": "els@acme.be" }
    })
}

fn set_names(jar: &SessionJar) -> Vec<&str> {
    jar.staged()
        .iter()
        .filter(|op| matches!(op, CookieOp::Set { .. }))
        .map(CookieOp::name)
        .collect()
}

#[tokio::test]
async fn valid_access_token_needs_no_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("authorization", "Bearer live-token"))
        .and(header("apikey", "anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": USER_ID, "email": "els@acme.be" })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = HostedIdentityProvider::new(&config(&server)).unwrap();
    let mut jar = SessionJar::from_cookie_header(Some(&format!("{ACCESS_TOKEN_COOKIE}=live-token")));

    let identity = provider.current_identity(&mut jar).await.unwrap().unwrap();
    assert_eq!(identity.id.to_string(), USER_ID);
    assert!(jar.staged().is_empty());
}

#[tokio::test]
async fn rejected_access_token_is_refreshed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "msg": "JWT expired" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "refresh_token"))
        .and(body_partial_json(json!({ "refresh_token": "old-refresh" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("new-access", "new-refresh")))
        .expect(1)
        .mount(&server)
        .await;

    let provider = HostedIdentityProvider::new(&config(&server)).unwrap();
    let mut jar = SessionJar::from_cookie_header(Some(&format!(
        "{ACCESS_TOKEN_COOKIE}=stale; {REFRESH_TOKEN_COOKIE}=old-refresh"
    )));

    let identity = provider.current_identity(&mut jar).await.unwrap();
    assert!(identity.is_some());
    assert_eq!(set_names(&jar), vec![ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE]);
    assert_eq!(jar.access_token(), Some("new-access"));
}

#[tokio::test]
async fn dead_refresh_token_clears_the_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid Refresh Token: Already Used"
        })))
        .mount(&server)
        .await;

    let provider = HostedIdentityProvider::new(&config(&server)).unwrap();
    let mut jar = SessionJar::from_cookie_header(Some(&format!("{REFRESH_TOKEN_COOKIE}=used")));

    assert_eq!(provider.current_identity(&mut jar).await.unwrap(), None);
    assert!(jar.staged().iter().all(|op| matches!(op, CookieOp::Remove { .. })));
    assert_eq!(jar.staged().len(), 2);
}

#[tokio::test]
async fn auth_outage_is_an_error_not_anonymous() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let provider = HostedIdentityProvider::new(&config(&server)).unwrap();
    let mut jar = SessionJar::from_cookie_header(Some(&format!("{ACCESS_TOKEN_COOKIE}=tok")));

    let err = provider.current_identity(&mut jar).await.unwrap_err();
    assert!(matches!(err, IdentityError::Unavailable(_)));
}

#[tokio::test]
async fn password_sign_in_stores_session_or_reports_bad_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(body_partial_json(json!({ "email": "els@acme.be", "password": "secret1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("a1", "r1")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(body_partial_json(json!({ "password": "wrong" })))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })))
        .mount(&server)
        .await;

    let provider = HostedIdentityProvider::new(&config(&server)).unwrap();

    let mut jar = SessionJar::new();
    provider
        .sign_in_with_password(&mut jar, "els@acme.be", "secret1")
        .await
        .unwrap();
    assert_eq!(set_names(&jar), vec![ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE]);

    let mut jar = SessionJar::new();
    let err = provider
        .sign_in_with_password(&mut jar, "els@acme.be", "wrong")
        .await
        .unwrap_err();
    assert_eq!(err, IdentityError::InvalidCredentials);
    assert!(jar.staged().is_empty());
}

#[tokio::test]
async fn sign_up_sends_metadata_and_maps_duplicates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .and(body_partial_json(json!({
            "email": "new@kantoor.be",
            "data": { "subdomain": "kantoor", "company_name": "Kantoor" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": USER_ID, "email": "new@kantoor.be" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .and(body_partial_json(json!({ "email": "taken@kantoor.be" })))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({ "msg": "User already registered" })))
        .mount(&server)
        .await;

    let provider = HostedIdentityProvider::new(&config(&server)).unwrap();
    let metadata = SignUpMetadata {
        first_name: "An".into(),
        last_name: "Claes".into(),
        company_name: "Kantoor".into(),
        subdomain: "kantoor".into(),
    };

    let identity = provider.sign_up("new@kantoor.be", "geheim123", &metadata).await.unwrap();
    assert_eq!(identity.email, "new@kantoor.be");

    let err = provider
        .sign_up("taken@kantoor.be", "geheim123", &metadata)
        .await
        .unwrap_err();
    assert_eq!(err, IdentityError::AlreadyRegistered);
}

#[tokio::test]
async fn sign_out_clears_cookies_even_when_the_call_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let provider = HostedIdentityProvider::new(&config(&server)).unwrap();
    let mut jar = SessionJar::from_cookie_header(Some(&format!("{ACCESS_TOKEN_COOKIE}=tok")));

    provider.sign_out(&mut jar).await.unwrap();
    assert_eq!(jar.access_token(), None);
    assert_eq!(jar.staged().len(), 2);
}

#[tokio::test]
async fn profile_is_read_with_its_account_using_the_service_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("id", format!("eq.{USER_ID}")))
        .and(query_param("select", "*,account:accounts(*)"))
        .and(header("apikey", "service-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": USER_ID,
            "account_id": ACCOUNT_ID,
            "email": "els@acme.be",
            "first_name": "Els",
            "last_name": "Maes",
            "role": "entrepreneur",
            "company_id": COMPANY_ID,
            "account": {
                "id": ACCOUNT_ID,
                "name": "Acme Boekhouding",
                "subdomain": "acme",
                "logo_url": null,
                "primary_color": "#0f766e",
                "is_active": true
            }
        }])))
        .mount(&server)
        .await;

    let directory = HostedDirectory::new(&config(&server)).unwrap();
    let user_id: UserId = USER_ID.parse().unwrap();

    let profile = directory.get_profile(user_id).await.unwrap().unwrap();
    assert_eq!(profile.role, Role::Entrepreneur);
    assert_eq!(profile.account.name, "Acme Boekhouding");
    assert_eq!(profile.account.contrast_color, "#ffffff");
    assert_eq!(profile.company_id, Some(COMPANY_ID.parse().unwrap()));
}

#[tokio::test]
async fn account_lookup_filters_active_and_empty_means_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/accounts"))
        .and(query_param("subdomain", "eq.ghost"))
        .and(query_param("is_active", "eq.true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let directory = HostedDirectory::new(&config(&server)).unwrap();
    assert_eq!(directory.get_account_by_subdomain("ghost").await.unwrap(), None);
}

#[tokio::test]
async fn registration_rpcs_send_named_arguments() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/is_subdomain_available"))
        .and(body_partial_json(json!({ "subdomain_name": "kantoor" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(true)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/create_account_and_user"))
        .and(body_partial_json(json!({
            "user_id": USER_ID,
            "user_email": "an@kantoor.be",
            "account_name": "Kantoor Claes",
            "account_subdomain": "kantoor"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(ACCOUNT_ID)))
        .mount(&server)
        .await;

    let directory = HostedDirectory::new(&config(&server)).unwrap();
    assert!(directory.is_subdomain_available("kantoor").await.unwrap());

    let new = NewAccount {
        user_id: USER_ID.parse().unwrap(),
        email: "an@kantoor.be".into(),
        first_name: "An".into(),
        last_name: "Claes".into(),
        account_name: "Kantoor Claes".into(),
        subdomain: Subdomain::parse("kantoor").unwrap(),
    };
    let account_id = directory.create_account_and_user(&new).await.unwrap();
    assert_eq!(account_id, ACCOUNT_ID.parse::<AccountId>().unwrap());
}

#[tokio::test]
async fn rpc_status_classes_map_to_rejected_and_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/create_account_and_user"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "code": "23505",
            "message": "duplicate key value violates unique constraint"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/is_subdomain_available"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let directory = HostedDirectory::new(&config(&server)).unwrap();
    let new = NewAccount {
        user_id: UserId::new(),
        email: "an@kantoor.be".into(),
        first_name: "An".into(),
        last_name: "Claes".into(),
        account_name: "Kantoor Claes".into(),
        subdomain: Subdomain::parse("kantoor").unwrap(),
    };

    let err = directory.create_account_and_user(&new).await.unwrap_err();
    assert!(matches!(err, DirectoryError::Rejected(ref m) if m.contains("duplicate key")));

    let err = directory.is_subdomain_available("kantoor").await.unwrap_err();
    assert!(matches!(err, DirectoryError::Unavailable(_)));
}

#[tokio::test]
async fn financial_rows_are_converted_to_cents() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/financial_data"))
        .and(query_param("company_id", format!("eq.{COMPANY_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "0190f2a4-6b8e-7c3d-9a1b-000000000003",
            "company_id": COMPANY_ID,
            "year": 2025,
            "month": 1,
            "revenue": 12450.0,
            "expenses": 8320.5,
            "gross_margin": 4129.5,
            "tax_estimate": 1240,
            "data_source": "exact_online"
        }])))
        .mount(&server)
        .await;

    let directory = HostedDirectory::new(&config(&server)).unwrap();
    let company_id: CompanyId = COMPANY_ID.parse().unwrap();

    let periods = directory.financial_periods(company_id).await.unwrap();
    assert_eq!(periods.len(), 1);
    assert_eq!(periods[0].revenue, 1_245_000);
    assert_eq!(periods[0].expenses, 832_050);
    assert_eq!(periods[0].tax_estimate, 124_000);
    assert_eq!(periods[0].data_source, saldoo_dashboard::DataSource::ExactOnline);
}

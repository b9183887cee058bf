use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderValue, Method, Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use saldoo_auth::{CookieOp, SessionJar};

use crate::context::{SessionContext, TENANT_HEADER, TenantContext};
use crate::gate::{GateDecision, RequestGate};

#[derive(Clone)]
pub struct GateState {
    pub gate: RequestGate,
    pub secure_cookies: bool,
}

/// Run the [`RequestGate`] in front of every route.
///
/// On `Continue` the downstream request sees the effective cookies, a
/// [`TenantContext`], a [`SessionContext`] and the tenant header. Every
/// response, redirects included, carries the gate's `Set-Cookie`s and the
/// tenant header.
pub async fn gate_middleware(
    State(state): State<GateState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let mut jar = session_jar(req.headers());
    let host = host(&req);
    let path = req.uri().path().to_string();

    let decision = state.gate.decide(host.as_deref(), &path, &mut jar).await;
    let tenant_value = decision
        .tenant()
        .and_then(|t| HeaderValue::from_str(t.as_str()).ok());

    let mut response = match &decision {
        GateDecision::Redirect { target, .. } => {
            let location = match req.uri().query() {
                Some(query) => format!("{target}?{query}"),
                None => (*target).to_string(),
            };
            redirect(redirect_status(req.method()), &location)
        }
        GateDecision::Continue { tenant, identity, .. } => {
            let headers = req.headers_mut();
            headers.remove(header::COOKIE);
            if let Some(value) = jar
                .request_cookie_header()
                .and_then(|c| HeaderValue::from_str(&c).ok())
            {
                headers.insert(header::COOKIE, value);
            }
            headers.remove(TENANT_HEADER);
            if let Some(value) = &tenant_value {
                headers.insert(TENANT_HEADER, value.clone());
            }

            req.extensions_mut().insert(TenantContext::new(tenant.clone()));
            req.extensions_mut().insert(SessionContext::new(identity.clone()));

            next.run(req).await
        }
    };

    prepend_cookies(response.headers_mut(), decision.cookies(), state.secure_cookies);
    if let Some(value) = tenant_value {
        response.headers_mut().insert(TENANT_HEADER, value);
    }
    response
}

/// 307 keeps the method, which only suits safe requests; anything else
/// (a form post to `/login`) is turned into a GET of the target with 303.
fn redirect_status(method: &Method) -> StatusCode {
    if method == Method::GET || method == Method::HEAD {
        StatusCode::TEMPORARY_REDIRECT
    } else {
        StatusCode::SEE_OTHER
    }
}

/// Session jar over all `Cookie` headers of a request.
pub fn session_jar(headers: &HeaderMap) -> SessionJar {
    SessionJar::from_cookie_header(cookie_header(headers).as_deref())
}

/// All `Cookie` headers of a request joined into one.
fn cookie_header(headers: &HeaderMap) -> Option<String> {
    let parts: Vec<&str> = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect();
    (!parts.is_empty()).then(|| parts.join("; "))
}

fn host(req: &Request<Body>) -> Option<String> {
    req.headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| req.uri().host().map(str::to_string))
}

pub fn redirect(status: StatusCode, location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (status, [(header::LOCATION, value)]).into_response(),
        Err(_) => status.into_response(),
    }
}

/// Append `Set-Cookie` headers for `ops`.
pub fn apply_cookies(headers: &mut HeaderMap, ops: &[CookieOp], secure: bool) {
    for op in ops {
        match HeaderValue::from_str(&op.to_header_value(secure)) {
            Ok(value) => {
                headers.append(header::SET_COOKIE, value);
            }
            Err(_) => tracing::warn!(cookie = op.name(), "dropping cookie with invalid header value"),
        }
    }
}

/// Place the gate's cookies before any the handler set, so that a handler
/// that signs in or out has the last word on the session.
fn prepend_cookies(headers: &mut HeaderMap, ops: &[CookieOp], secure: bool) {
    if ops.is_empty() {
        return;
    }
    let handler_cookies: Vec<HeaderValue> = headers.get_all(header::SET_COOKIE).iter().cloned().collect();
    headers.remove(header::SET_COOKIE);
    apply_cookies(headers, ops, secure);
    for value in handler_cookies {
        headers.append(header::SET_COOKIE, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(name: &str, value: &str) -> CookieOp {
        CookieOp::Set {
            name: name.into(),
            value: value.into(),
            max_age: None,
        }
    }

    #[test]
    fn multiple_cookie_headers_are_joined() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("a=1"));
        headers.append(header::COOKIE, HeaderValue::from_static("b=2"));
        assert_eq!(cookie_header(&headers).as_deref(), Some("a=1; b=2"));
        assert_eq!(cookie_header(&HeaderMap::new()), None);
    }

    #[test]
    fn gate_cookies_come_before_handler_cookies() {
        let mut headers = HeaderMap::new();
        apply_cookies(&mut headers, &[op("sb-access-token", "from-handler")], false);
        prepend_cookies(&mut headers, &[op("sb-access-token", "from-gate")], false);

        let values: Vec<_> = headers
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(values.len(), 2);
        assert!(values[0].starts_with("sb-access-token=from-gate"));
        assert!(values[1].starts_with("sb-access-token=from-handler"));
    }

    #[test]
    fn only_safe_methods_keep_their_method_across_redirects() {
        assert_eq!(redirect_status(&Method::GET), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(redirect_status(&Method::HEAD), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(redirect_status(&Method::POST), StatusCode::SEE_OTHER);
        assert_eq!(redirect_status(&Method::DELETE), StatusCode::SEE_OTHER);
    }

    #[test]
    fn redirect_sets_location() {
        let response = redirect(StatusCode::SEE_OTHER, "/login?next=%2Fdashboard");
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/login?next=%2Fdashboard"
        );
    }
}

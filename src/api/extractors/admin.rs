use axum::{
    extract::{FromRequestParts, FromRef},
    http::{header, request::Parts, Method, StatusCode},
};
use crate::state::AppState;
use crate::domain::models::auth::{Claims, ADMIN_ROLE};
use std::sync::Arc;
use tower_cookies::Cookies;
use jsonwebtoken::{decode, DecodingKey, Validation, Algorithm};
use tracing::{debug, Span};

/// Authenticated staff member. Carries the token subject.
pub struct AdminUser {
    pub id: String,
}

enum TokenSource {
    Header(String),
    Cookie(String),
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts.headers.get(header::AUTHORIZATION)?
        .to_str().ok()?
        .strip_prefix("Bearer ")
        .map(|t| t.trim().to_string())
}

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let source = match bearer_token(parts) {
            Some(token) => TokenSource::Header(token),
            None => {
                let cookies = parts.extensions.get::<Cookies>()
                    .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;
                let token = cookies.get("access_token")
                    .ok_or(StatusCode::UNAUTHORIZED)?
                    .value()
                    .to_string();
                TokenSource::Cookie(token)
            }
        };

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let decoding_key = DecodingKey::from_ed_pem(app_state.config.jwt_public_key.as_bytes())
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_audience(&[app_state.config.auth_audience.as_str()]);
        validation.set_issuer(&[app_state.config.auth_issuer.as_str()]);

        let token = match &source {
            TokenSource::Header(t) | TokenSource::Cookie(t) => t,
        };
        let token_data = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|e| {
                debug!("Rejected admin token: {}", e);
                StatusCode::UNAUTHORIZED
            })?;

        if token_data.claims.role != ADMIN_ROLE {
            return Err(StatusCode::FORBIDDEN);
        }

        // CSRF check applies to cookie-borne tokens only.
        let method = &parts.method;
        if matches!(source, TokenSource::Cookie(_))
            && method != Method::GET && method != Method::HEAD && method != Method::OPTIONS {
            let csrf_header_val = parts.headers.get("X-CSRF-Token")
                .ok_or(StatusCode::FORBIDDEN)?
                .to_str()
                .map_err(|_| StatusCode::FORBIDDEN)?;

            if token_data.claims.csrf_token.as_deref() != Some(csrf_header_val) {
                return Err(StatusCode::FORBIDDEN);
            }
        }

        Span::current().record("admin_id", token_data.claims.sub.as_str());

        Ok(AdminUser { id: token_data.claims.sub })
    }
}

//! Bearer token verification and the authentication middleware.
//!
//! Every faculty route requires `Authorization: Bearer <jwt>`. The token is
//! checked (HS256 signature, `exp`, optional `iss`/`aud`) before the handler
//! runs, so request bodies are never read for unauthenticated callers.

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use log::warn;
use serde::Deserialize;

use crate::config::JwtConfig;
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller, inserted into request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Value of the token's `sub` claim.
    pub subject: String,
}

/// Reason a request failed authentication. Logged, never returned verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    MissingHeader,
    NotBearer,
    InvalidToken,
    MissingSubject,
}

impl AuthFailure {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingHeader => "missing_header",
            Self::NotBearer => "not_bearer",
            Self::InvalidToken => "invalid_token",
            Self::MissingSubject => "missing_subject",
        }
    }

    fn into_api_error(self) -> ApiError {
        match self {
            Self::MissingHeader | Self::NotBearer => {
                ApiError::unauthorized("missing bearer token")
            }
            Self::InvalidToken | Self::MissingSubject => {
                ApiError::unauthorized("invalid bearer token")
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(default)]
    sub: Option<String>,
}

/// Verifies bearer tokens against the configured HS256 secret.
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.leeway_seconds;
        validation.validate_nbf = true;

        if let Some(iss) = config.issuer.as_deref() {
            validation.set_issuer(&[iss]);
            validation.required_spec_claims.insert("iss".to_string());
        }
        match config.audience.as_deref() {
            Some(aud) => {
                validation.set_audience(&[aud]);
                validation.required_spec_claims.insert("aud".to_string());
            }
            None => validation.validate_aud = false,
        }

        Self {
            key: DecodingKey::from_secret(config.hs256_secret.as_bytes()),
            validation,
        }
    }

    /// Verifies one raw token and returns the principal it names.
    pub fn verify(&self, token: &str) -> Result<Principal, AuthFailure> {
        let data = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|_| AuthFailure::InvalidToken)?;

        data.claims
            .sub
            .filter(|subject| !subject.trim().is_empty())
            .map(|subject| Principal { subject })
            .ok_or(AuthFailure::MissingSubject)
    }
}

/// Extracts the raw token from an `Authorization: Bearer` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthFailure> {
    let raw = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(AuthFailure::MissingHeader)?
        .to_str()
        .map_err(|_| AuthFailure::NotBearer)?;
    let token = raw
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthFailure::NotBearer)?;
    Ok(token)
}

/// Authentication middleware for protected routes.
///
/// Rejects with 401 before the handler (and its body extractor) runs.
pub async fn require_bearer(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let verified = bearer_token(req.headers()).and_then(|token| state.verifier().verify(token));

    match verified {
        Ok(principal) => {
            req.extensions_mut().insert(principal);
            next.run(req).await
        }
        Err(failure) => {
            warn!(
                "event=auth_rejected module=auth status=error reason={} method={} path={}",
                failure.as_str(),
                req.method(),
                req.uri().path()
            );
            failure.into_api_error().into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{bearer_token, AuthFailure, TokenVerifier};
    use crate::config::JwtConfig;
    use axum::http::{header, HeaderMap, HeaderValue};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;
    use std::time::{SystemTime, UNIX_EPOCH};

    const SECRET: &str = "unit-test-secret";

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64
    }

    fn sign(claims: serde_json::Value, secret: &str) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn bearer_token_requires_bearer_scheme() {
        assert_eq!(
            bearer_token(&HeaderMap::new()),
            Err(AuthFailure::MissingHeader)
        );
        assert_eq!(
            bearer_token(&headers_with("Basic abc")),
            Err(AuthFailure::NotBearer)
        );
        assert_eq!(
            bearer_token(&headers_with("Bearer ")),
            Err(AuthFailure::NotBearer)
        );
        assert_eq!(bearer_token(&headers_with("Bearer abc.def")), Ok("abc.def"));
    }

    #[test]
    fn verify_accepts_valid_token_and_returns_subject() {
        let verifier = TokenVerifier::new(&JwtConfig::hs256(SECRET));
        let token = sign(json!({"sub": "OutCurrTestUser", "exp": now() + 600}), SECRET);

        let principal = verifier.verify(&token).unwrap();
        assert_eq!(principal.subject, "OutCurrTestUser");
    }

    #[test]
    fn verify_rejects_wrong_secret_expired_and_subjectless_tokens() {
        let verifier = TokenVerifier::new(&JwtConfig::hs256(SECRET));

        let wrong_secret = sign(json!({"sub": "u", "exp": now() + 600}), "other");
        assert_eq!(verifier.verify(&wrong_secret), Err(AuthFailure::InvalidToken));

        let expired = sign(json!({"sub": "u", "exp": now() - 3_600}), SECRET);
        assert_eq!(verifier.verify(&expired), Err(AuthFailure::InvalidToken));

        let no_subject = sign(json!({"exp": now() + 600}), SECRET);
        assert_eq!(verifier.verify(&no_subject), Err(AuthFailure::MissingSubject));
    }

    #[test]
    fn verify_enforces_configured_issuer() {
        let mut config = JwtConfig::hs256(SECRET);
        config.issuer = Some("outcurr-auth".to_string());
        let verifier = TokenVerifier::new(&config);

        let foreign = sign(
            json!({"sub": "u", "exp": now() + 600, "iss": "someone-else"}),
            SECRET,
        );
        assert_eq!(verifier.verify(&foreign), Err(AuthFailure::InvalidToken));

        let trusted = sign(
            json!({"sub": "u", "exp": now() + 600, "iss": "outcurr-auth"}),
            SECRET,
        );
        assert!(verifier.verify(&trusted).is_ok());
    }
}

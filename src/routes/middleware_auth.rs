use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Subject of a verified bearer token.
#[derive(Debug, Clone, PartialEq)]
pub struct JwtUser(pub String);

impl<S> FromRequestParts<S> for JwtUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<JwtUser>()
            .cloned()
            .ok_or(AppError::Unauthorized("missing user"))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
}

/// HS256 verification keys shared with the external token issuer.
#[derive(Clone)]
pub struct JwtKeys {
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(token, &self.decoding, &self.validation).map(|data| data.claims)
    }
}

pub async fn require_auth(
    State(keys): State<JwtKeys>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req.headers().get(AUTHORIZATION).and_then(|v| v.to_str().ok());

    let token = match auth_header.and_then(|h| h.strip_prefix("Bearer ")) {
        Some(token) => token.trim(),
        None => {
            tracing::warn!(path = %req.uri().path(), "request without bearer token");
            return Err(AppError::Unauthorized("missing token"));
        }
    };

    let claims = keys.verify(token).map_err(|e| {
        tracing::warn!(error = %e, "JWT decode error");
        AppError::Unauthorized("invalid token")
    })?;

    if claims.sub.is_empty() {
        return Err(AppError::Unauthorized("invalid subject"));
    }

    req.extensions_mut().insert(JwtUser(claims.sub));
    Ok(next.run(req).await)
}

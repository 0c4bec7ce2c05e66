//! Extraction of the signed-in user from the identity cookie.
//!
//! The identity cookie carries a JWT minted by the external auth service.
//! Handlers receive the decoded claims as an [`AuthenticatedUser`] argument;
//! requests without a verifiable token answer 401 and are turned into a
//! sign-in redirect by [`crate::middleware::RedirectUnauthorized`].

use std::future::{Ready, ready};

use actix_identity::Identity;
use actix_web::dev::Payload;
use actix_web::error::ErrorUnauthorized;
use actix_web::{Error, FromRequest, HttpRequest, web};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};

use crate::domain::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;

/// Decodes and verifies a JWT into user claims.
///
/// Verification requires an HS256 signature under `secret` and an unexpired
/// `exp` claim.
pub fn decode_token(
    token: &str,
    secret: &str,
) -> Result<AuthenticatedUser, jsonwebtoken::errors::Error> {
    let data = jsonwebtoken::decode::<AuthenticatedUser>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )?;
    Ok(data.claims)
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        ready(authenticate(req, payload))
    }
}

fn authenticate(req: &HttpRequest, payload: &mut Payload) -> Result<AuthenticatedUser, Error> {
    let identity = Identity::from_request(req, payload)
        .into_inner()
        .map_err(|_| ErrorUnauthorized("no identity"))?;
    let token = identity.id().map_err(|_| ErrorUnauthorized("no identity"))?;
    let config = req
        .app_data::<web::Data<ServerConfig>>()
        .ok_or_else(|| ErrorUnauthorized("server configuration missing"))?;
    decode_token(&token, &config.secret).map_err(|_| ErrorUnauthorized("invalid token"))
}

/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 */

//! Access token decoding.
//!
//! UAA access tokens are JWTs whose payload carries the user's identity.
//! Under [`TokenTrust::Channel`] the signature is deliberately **not**
//! verified: the token was received directly from the configured token
//! endpoint, in response to a request authenticated with our client secret,
//! so the channel vouches for it. Such a token must not be forwarded to
//! other components as proof of identity.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use thiserror::Error;
use uaa_auth_types::IdentityClaims;

use crate::config::TokenTrust;

/// Why an access token could not be turned into an identity.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("access token is not a well-formed JWT: {0}")]
    Malformed(jsonwebtoken::errors::Error),
    #[error("access token payload carries no usable identity: {0}")]
    MissingIdentity(jsonwebtoken::errors::Error),
    #[error("access token signature rejected: {0}")]
    Signature(jsonwebtoken::errors::Error),
}

impl From<jsonwebtoken::errors::Error> for DecodeError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::Json(_) => Self::MissingIdentity(err),
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => Self::Signature(err),
            _ => Self::Malformed(err),
        }
    }
}

/// Decode the identity claims embedded in an access token.
///
/// Expiry and audience are not checked here; the session lifetime comes from
/// the token response's `expires_in` instead.
pub fn decode_identity_claims(
    access_token: &str,
    trust: &TokenTrust,
) -> Result<IdentityClaims, DecodeError> {
    let (key, mut validation) = match trust {
        TokenTrust::Channel => {
            let mut validation = Validation::default();
            validation.insecure_disable_signature_validation();
            (DecodingKey::from_secret(&[]), validation)
        }
        TokenTrust::SharedSecret(secret) => (
            DecodingKey::from_secret(secret.as_bytes()),
            Validation::new(Algorithm::HS256),
        ),
    };
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<IdentityClaims>(access_token, &key, &validation)?;
    Ok(data.claims)
}

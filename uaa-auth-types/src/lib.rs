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

//! Shared wire types for the UAA authentication backend.
//!
//! This crate defines the contract between the authentication backend, the
//! identity provider's token endpoint, and the local development provider.
//! It does not depend on axum, an HTTP client, or database types.

pub mod claims;
pub mod error;
pub mod requests;
pub mod responses;

pub use claims::{IdentityClaims, SessionClaims};
pub use error::APIError;
pub use responses::APIResponse;

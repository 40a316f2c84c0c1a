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

//! UAA protocol helpers: endpoint resolution, the authorization-code
//! exchange, and access token decoding.

pub mod decode;
pub mod exchange;
pub mod urls;

pub use decode::{decode_identity_claims, DecodeError};
pub use exchange::{TokenExchange, UaaTokenClient};
pub use urls::{get_auth_url, get_token_url, CALLBACK_PATH, FAKE_AUTH_PATH, FAKE_TOKEN_PATH};

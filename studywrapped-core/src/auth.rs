//! Identity resolution from an opaque bearer credential
//!
//! The platform issues JWTs whose payload segment carries the student's
//! identity fields. Nothing here verifies the signature - the token is
//! only *parsed* so the recap can address the student by name and id;
//! the reports API is the authority that accepts or rejects it.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::error::{Error, Result};
use crate::types::UserIdentity;

/// Decode the payload segment of a bearer token into a [`UserIdentity`].
///
/// Any structural problem (wrong segment count, bad base64, bad JSON,
/// missing identity fields) is an authentication error: the caller
/// should prompt for re-authentication rather than continue.
pub fn decode_token(token: &str) -> Result<UserIdentity> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| Error::Auth("credential is not a well-formed token".to_string()))?;

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| Error::Auth(format!("credential payload is not valid base64: {}", e)))?;

    serde_json::from_slice::<UserIdentity>(&bytes)
        .map_err(|e| Error::Auth(format!("credential payload is not a valid identity: {}", e)))
}

//! Device key extractor
//!
//! Reads the `X-Device-Key` header: a per-browser storage key that anchors
//! anonymous viewer identity. Absent for clients that never set one.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;

/// Header carrying the per-browser anonymous storage key
pub const DEVICE_KEY_HEADER: &str = "x-device-key";

/// Longest device key accepted; anything longer is ignored
const MAX_DEVICE_KEY_LEN: usize = 128;

/// Optional per-browser device key
#[derive(Debug, Clone)]
pub struct DeviceKey(pub Option<String>);

impl DeviceKey {
    /// The key as a borrowed str, if present
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for DeviceKey
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let key = parts
            .headers
            .get(DEVICE_KEY_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|key| !key.is_empty() && key.len() <= MAX_DEVICE_KEY_LEN)
            .map(String::from);

        Ok(DeviceKey(key))
    }
}

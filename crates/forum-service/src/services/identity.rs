//! Identity resolver
//!
//! Turns the caller's credentials into a `Subject`: an authenticated token
//! always wins, everything else resolves to a stable anonymous session id.

use tracing::{debug, instrument};
use uuid::Uuid;

use forum_cache::AnonymousSessionStore;
use forum_core::value_objects::{Subject, Target};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Identity service
pub struct IdentityService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> IdentityService<'a> {
    /// Create a new IdentityService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Resolve the subject performing a presence action.
    ///
    /// Anonymous callers reuse the id minted for their `(device key, target)`
    /// pair so reloading a page does not inflate the viewer count. A caller
    /// without a device key gets a one-off id that is never persisted.
    #[instrument(skip(self, device_key))]
    pub async fn resolve_subject(
        &self,
        auth_user_id: Option<Uuid>,
        device_key: Option<&str>,
        target: Target,
    ) -> ServiceResult<Subject> {
        if let Some(user_id) = auth_user_id {
            return Ok(Subject::user(user_id));
        }

        match device_key {
            Some(key) if !key.trim().is_empty() => {
                let id = self
                    .ctx
                    .anonymous_sessions()
                    .get_or_create(key.trim(), target)
                    .await?;
                Ok(Subject::anonymous(id))
            }
            _ => {
                debug!(target = %target, "Caller sent no device key; minting one-off id");
                Ok(Subject::anonymous(AnonymousSessionStore::mint_id()))
            }
        }
    }
}

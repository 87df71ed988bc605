//! Principal Resolver – das Tor, durch das jede geschuetzte Operation geht

use std::sync::Arc;

use wohnheim_db::PrincipalRepository;

use crate::error::{AuthError, AuthResult};
use crate::principal::Principal;
use crate::token::TokenCodec;

/// Loest ein Bearer-Token in einen aktiven Principal auf
pub struct PrincipalResolver<U: PrincipalRepository> {
    repo: Arc<U>,
    codec: Arc<TokenCodec>,
}

impl<U: PrincipalRepository> PrincipalResolver<U> {
    pub fn neu(repo: Arc<U>, codec: Arc<TokenCodec>) -> Self {
        Self { repo, codec }
    }

    /// Prueft das Token und laedt den Principal (genau ein Store-Zugriff)
    ///
    /// Unbekanntes Subject und inaktiver Principal sind fuer den Aufrufer
    /// nicht von einem ungueltigen Token zu unterscheiden.
    pub async fn aufloesen(&self, token: &str) -> AuthResult<Principal> {
        let username = self.codec.pruefen(token)?;

        let record = self
            .repo
            .get_by_username(&username)
            .await?
            .ok_or(AuthError::NichtAutorisiert)?;

        if !record.is_active {
            tracing::debug!(username = %record.username, "Token fuer inaktiven Principal");
            return Err(AuthError::NichtAutorisiert);
        }

        Ok(Principal::from(record))
    }
}

//! Signierte, zeitlich begrenzte Bearer-Token (JWT, HS256)
//!
//! Ein Token traegt nur das Subject (Benutzername) und den Ablaufzeitpunkt.
//! Es gibt keine serverseitige Sperrliste; ein Token endet mit seinem `exp`.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};

/// Standard-Lebensdauer eines Tokens
pub const STANDARD_TTL_MINUTEN: i64 = 30;

/// Claims im Token-Payload
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
    iat: i64,
}

/// Erstellt und prueft Bearer-Token mit einem prozessweiten Schluessel
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenCodec {
    /// Erstellt einen Codec mit symmetrischem Schluessel und Lebensdauer
    pub fn neu(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Stellt ein Token fuer `subject` aus, gueltig ab jetzt fuer `ttl`
    pub fn ausstellen(&self, subject: &str) -> AuthResult<String> {
        self.ausstellen_ab(subject, Utc::now())
    }

    /// Stellt ein Token mit explizitem Ausstellungszeitpunkt aus
    pub(crate) fn ausstellen_ab(&self, subject: &str, ausgestellt: DateTime<Utc>) -> AuthResult<String> {
        let claims = Claims {
            sub: subject.to_string(),
            exp: (ausgestellt + self.ttl).timestamp(),
            iat: ausgestellt.timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Token(e.to_string()))
    }

    /// Prueft Signatur und Ablauf und gibt das Subject zurueck
    ///
    /// Jede Ablehnung wird zu [`AuthError::NichtAutorisiert`]; der konkrete
    /// Grund landet nur im Debug-Log.
    pub fn pruefen(&self, token: &str) -> AuthResult<String> {
        let daten = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| {
                let grund = match e.kind() {
                    ErrorKind::ExpiredSignature => "abgelaufen",
                    ErrorKind::InvalidSignature => "signatur",
                    ErrorKind::MissingRequiredClaim(_) => "claim_fehlt",
                    _ => "format",
                };
                tracing::debug!(grund, "Token abgelehnt");
                AuthError::NichtAutorisiert
            })?;

        if daten.claims.sub.is_empty() {
            tracing::debug!(grund = "subject_leer", "Token abgelehnt");
            return Err(AuthError::NichtAutorisiert);
        }

        Ok(daten.claims.sub)
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("ttl_minuten", &self.ttl.num_minutes())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::neu(b"test-geheimnis-fuer-tokens", Duration::minutes(STANDARD_TTL_MINUTEN))
    }

    #[test]
    fn token_ausstellen_und_pruefen() {
        let codec = codec();
        let token = codec.ausstellen("w1").unwrap();
        assert_eq!(codec.pruefen(&token).unwrap(), "w1");
    }

    #[test]
    fn abgelaufenes_token_abgelehnt() {
        let codec = codec();
        let frueher = Utc::now() - Duration::minutes(STANDARD_TTL_MINUTEN) - Duration::seconds(5);
        let token = codec.ausstellen_ab("w1", frueher).unwrap();
        assert!(matches!(codec.pruefen(&token), Err(AuthError::NichtAutorisiert)));
    }

    #[test]
    fn token_kurz_vor_ablauf_noch_gueltig() {
        let codec = codec();
        let frueher = Utc::now() - Duration::minutes(STANDARD_TTL_MINUTEN) + Duration::seconds(30);
        let token = codec.ausstellen_ab("w1", frueher).unwrap();
        assert!(codec.pruefen(&token).is_ok());
    }

    #[test]
    fn jedes_veraenderte_zeichen_wird_abgelehnt() {
        let codec = codec();
        let token = codec.ausstellen("priya").unwrap();

        for i in 0..token.len() {
            let mut bytes = token.clone().into_bytes();
            bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
            let manipuliert = String::from_utf8(bytes).unwrap();
            if manipuliert == token {
                continue;
            }
            assert!(
                codec.pruefen(&manipuliert).is_err(),
                "Manipulation an Position {i} wurde akzeptiert"
            );
        }
    }

    #[test]
    fn fremder_schluessel_abgelehnt() {
        let fremd = TokenCodec::neu(b"anderes-geheimnis", Duration::minutes(5));
        let token = fremd.ausstellen("w1").unwrap();
        assert!(matches!(codec().pruefen(&token), Err(AuthError::NichtAutorisiert)));
    }

    #[test]
    fn leeres_subject_und_muell_abgelehnt() {
        let codec = codec();
        let token = codec.ausstellen("").unwrap();
        assert!(codec.pruefen(&token).is_err());
        assert!(codec.pruefen("kein.gueltiges.token").is_err());
        assert!(codec.pruefen("").is_err());
    }

    #[test]
    fn debug_zeigt_keinen_schluessel() {
        let ausgabe = format!("{:?}", codec());
        assert!(!ausgabe.contains("test-geheimnis"));
    }
}

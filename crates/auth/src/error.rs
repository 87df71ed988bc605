//! Fehlertypen fuer den Auth-Kern

use thiserror::Error;

/// Feld, an dem eine Registrierung wegen Doppelung scheitert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KonfliktFeld {
    Benutzername,
    Email,
}

impl KonfliktFeld {
    /// Ordnet den Spaltennamen eines UNIQUE-Index dem Feld zu
    pub fn aus_spalte(spalte: &str) -> Option<Self> {
        match spalte {
            "username" => Some(Self::Benutzername),
            "email" => Some(Self::Email),
            _ => None,
        }
    }
}

impl std::fmt::Display for KonfliktFeld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Benutzername => f.write_str("Benutzername bereits registriert"),
            Self::Email => f.write_str("E-Mail bereits registriert"),
        }
    }
}

/// Alle moeglichen Fehler im Auth-Kern
///
/// Die Meldungen gehen unveraendert an den Aufrufer. Sie enthalten daher
/// weder Passwoerter, Hashes, Token noch den Signaturschluessel.
#[derive(Debug, Error)]
pub enum AuthError {
    // --- Taxonomie an der Grenze ---
    #[error("{0}")]
    Konflikt(KonfliktFeld),

    /// Unbekannter Benutzer, falsches Passwort, ungueltiges oder abgelaufenes Token
    #[error("Ungueltige Anmeldedaten")]
    NichtAutorisiert,

    #[error("Zugriff verweigert")]
    Verboten,

    #[error("Ungueltige Eingabe: {0}")]
    UngueltigeEingabe(String),

    // --- Intern ---
    #[error("Passwort-Hashing fehlgeschlagen: {0}")]
    PasswortHashing(String),

    #[error("Token konnte nicht signiert werden: {0}")]
    Token(String),

    #[error("Datenbankfehler: {0}")]
    Datenbank(#[from] wohnheim_db::DbError),

    #[error("Interner Fehler: {0}")]
    Intern(String),
}

impl AuthError {
    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }

    pub fn ungueltige_eingabe(msg: impl Into<String>) -> Self {
        Self::UngueltigeEingabe(msg.into())
    }
}

/// Result-Alias fuer den Auth-Kern
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn konflikt_meldung_nennt_feld() {
        assert_eq!(
            AuthError::Konflikt(KonfliktFeld::Email).to_string(),
            "E-Mail bereits registriert"
        );
        assert_eq!(KonfliktFeld::aus_spalte("username"), Some(KonfliktFeld::Benutzername));
        assert_eq!(KonfliktFeld::aus_spalte("phone"), None);
    }
}

//! Passwort-Hashing mit Argon2id
//!
//! Jeder Hash traegt sein eigenes zufaelliges Salt im PHC-String; die
//! Verifikation vergleicht in konstanter Zeit (argon2-Crate).

use std::sync::OnceLock;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params, Version,
};

use crate::error::{AuthError, AuthResult};

/// Argon2id-Parameter fuer sicheres Passwort-Hashing
///
/// Werte gemaess OWASP-Empfehlungen:
/// - Speicher: 64 MiB
/// - Iterationen: 3
/// - Parallelismus: 1
fn argon2_instanz() -> AuthResult<Argon2<'static>> {
    let params = Params::new(
        64 * 1024, // m_cost: 64 MiB
        3,         // t_cost: 3 Iterationen
        1,         // p_cost: 1 Thread
        None,      // output_len: Standard (32 Bytes)
    )
    .map_err(|e| AuthError::PasswortHashing(format!("Argon2-Parameter ungueltig: {e}")))?;

    Ok(Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params))
}

/// Hasht ein Passwort mit Argon2id und einem zufaelligen Salt
///
/// Gibt den PHC-String zurueck (inkl. Algorithmus, Parameter und Salt).
pub fn passwort_hashen(passwort: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    argon2_instanz()?
        .hash_password(passwort.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswortHashing(e.to_string()))
}

/// Verifiziert ein Passwort gegen einen gespeicherten PHC-Hash
///
/// Ein nicht lesbarer Hash gilt als Fehlschlag, nicht als Fehler.
pub fn passwort_verifizieren(passwort: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        tracing::warn!("Gespeicherter Passwort-Hash nicht lesbar");
        return false;
    };
    let Ok(argon2) = argon2_instanz() else {
        return false;
    };

    #[cfg(test)]
    VERIFIZIERUNGEN.with(|z| z.set(z.get() + 1));

    argon2
        .verify_password(passwort.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Prueft ein Passwort gegen den Hash eines Principals, falls es ihn gibt
///
/// Ohne Hash wird gegen einen festen Ersatz-Hash mit denselben Parametern
/// verifiziert und `false` geliefert. Ein unbekannter Benutzername kostet
/// so dieselbe Zeit wie ein falsches Passwort.
pub fn passwort_pruefen(passwort: &str, hash: Option<&str>) -> bool {
    match hash {
        Some(hash) => passwort_verifizieren(passwort, hash),
        None => {
            passwort_verifizieren(passwort, ersatz_hash());
            false
        }
    }
}

/// Wird beim Aufbau des Gateways einmal erzeugt
pub(crate) fn ersatz_hash() -> &'static str {
    static ERSATZ: OnceLock<String> = OnceLock::new();
    ERSATZ.get_or_init(|| {
        passwort_hashen("wohnheim-ersatz-hash").unwrap_or_else(|e| {
            tracing::error!(fehler = %e, "Ersatz-Hash konnte nicht erzeugt werden");
            String::new()
        })
    })
}

#[cfg(test)]
thread_local! {
    /// Anzahl vollstaendiger Argon2-Verifikationen im aktuellen Thread
    pub(crate) static VERIFIZIERUNGEN: std::cell::Cell<u32> = const { std::cell::Cell::new(0) };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passwort_hashen_und_verifizieren() {
        let passwort = "sicheres_passwort_123!";
        let hash = passwort_hashen(passwort).expect("Hashing fehlgeschlagen");

        assert!(
            hash.starts_with("$argon2id$"),
            "Hash muss mit $argon2id$ beginnen"
        );
        assert!(!hash.contains(passwort));
        assert!(passwort_verifizieren(passwort, &hash));
    }

    #[test]
    fn veraendertes_passwort_wird_abgelehnt() {
        let hash = passwort_hashen("richtiges_passwort").expect("Hashing fehlgeschlagen");

        assert!(!passwort_verifizieren("richtiges_passworT", &hash));
        assert!(!passwort_verifizieren("", &hash));
    }

    #[test]
    fn gleiche_passwoerter_unterschiedliche_hashes() {
        let passwort = "gleiches_passwort";
        let hash1 = passwort_hashen(passwort).expect("Hashing 1 fehlgeschlagen");
        let hash2 = passwort_hashen(passwort).expect("Hashing 2 fehlgeschlagen");

        assert_ne!(hash1, hash2, "Salt muss pro Aufruf neu sein");
        assert!(passwort_verifizieren(passwort, &hash1));
        assert!(passwort_verifizieren(passwort, &hash2));
    }

    #[test]
    fn ohne_hash_wird_ersatz_verifiziert() {
        assert!(ersatz_hash().starts_with("$argon2id$"));

        VERIFIZIERUNGEN.with(|z| z.set(0));
        assert!(!passwort_pruefen("wohnheim-ersatz-hash", None));
        assert_eq!(VERIFIZIERUNGEN.with(|z| z.get()), 1);
    }

    #[test]
    fn ungueltiges_hash_format_ist_false() {
        assert!(!passwort_verifizieren("passwort", "kein_gueltiger_hash"));
        assert!(!passwort_verifizieren("passwort", ""));
    }
}

//! Nach aussen sichtbare Sicht auf einen Principal

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;
use wohnheim_core::Rolle;
use wohnheim_db::models::PrincipalRecord;

/// Principal ohne Passwort-Hash
///
/// Einzige Form, in der ein Principal den Auth-Kern verlaesst.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Rolle,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub student_id: Option<String>,
    pub student_record_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<PrincipalRecord> for Principal {
    fn from(r: PrincipalRecord) -> Self {
        Self {
            id: r.id,
            username: r.username,
            email: r.email,
            role: r.role,
            full_name: r.full_name,
            phone: r.phone,
            student_id: r.student_id,
            student_record_id: r.student_record_id,
            is_active: r.is_active,
            created_at: r.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialisierung_ohne_hash() {
        let record = PrincipalRecord {
            id: Uuid::new_v4(),
            username: "priya".into(),
            email: "priya@x.org".into(),
            role: Rolle::Student,
            full_name: None,
            phone: None,
            student_id: Some("S-1".into()),
            student_record_id: None,
            password_hash: "$argon2id$geheim".into(),
            is_active: true,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(Principal::from(record)).unwrap();
        assert_eq!(json["role"], "student");
        assert!(json.get("password_hash").is_none());
        assert!(!json.to_string().contains("geheim"));
    }
}

//! Integration-Tests fuer PrincipalRepository und StudentRepository (In-Memory SQLite)

use wohnheim_core::{Rolle, Sichtbereich};
use wohnheim_db::{
    models::{NeuerPrincipal, NeuerStudent, StudentStatus, StudentUpdate},
    DbError, PrincipalRepository, SqliteDb, StudentRepository,
};

async fn db() -> SqliteDb {
    SqliteDb::in_memory()
        .await
        .expect("In-Memory DB konnte nicht erstellt werden")
}

fn student_principal<'a>(username: &'a str, email: &'a str, sid: &'a str) -> NeuerPrincipal<'a> {
    NeuerPrincipal {
        username,
        email,
        role: Rolle::Student,
        full_name: Some("Priya Sharma"),
        phone: None,
        student_id: Some(sid),
        password_hash: "$argon2id$dummy",
    }
}

#[tokio::test]
async fn principal_erstellen_und_laden() {
    let db = db().await;

    let p = PrincipalRepository::create(&db, student_principal("priya", "priya@x.org", "S-1001"))
        .await
        .expect("Principal erstellen fehlgeschlagen");

    assert_eq!(p.role, Rolle::Student);
    assert!(p.is_active);
    assert_eq!(p.student_record_id, None);

    let geladen = PrincipalRepository::get_by_username(&db, "priya")
        .await
        .unwrap()
        .expect("Principal sollte gefunden werden");
    assert_eq!(geladen.username, "priya");
    assert_eq!(geladen.student_id.as_deref(), Some("S-1001"));
    assert_eq!(geladen.password_hash, "$argon2id$dummy");

    let per_mail = PrincipalRepository::get_by_email(&db, "priya@x.org").await.unwrap();
    assert_eq!(per_mail.map(|p| p.id), Some(p.id));
}

#[tokio::test]
async fn benutzername_gross_klein_signifikant() {
    let db = db().await;
    PrincipalRepository::create(&db, student_principal("priya", "priya@x.org", "S-1001"))
        .await
        .unwrap();

    let anders = PrincipalRepository::get_by_username(&db, "Priya").await.unwrap();
    assert!(anders.is_none());
}

#[tokio::test]
async fn doppelter_benutzername_meldet_spalte() {
    let db = db().await;
    PrincipalRepository::create(&db, student_principal("priya", "priya@x.org", "S-1001"))
        .await
        .unwrap();

    let err = PrincipalRepository::create(&db, student_principal("priya", "andere@x.org", "S-1002"))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Eindeutigkeit { .. }));
    assert_eq!(err.eindeutigkeit_feld(), Some("username"));

    let err = PrincipalRepository::create(&db, student_principal("ravi", "priya@x.org", "S-1003"))
        .await
        .unwrap_err();
    assert_eq!(err.eindeutigkeit_feld(), Some("email"));
}

#[tokio::test]
async fn warden_ohne_student_id_erlaubt() {
    let db = db().await;
    let w = PrincipalRepository::create(
        &db,
        NeuerPrincipal {
            username: "warden",
            email: "warden@x.org",
            role: Rolle::Warden,
            full_name: None,
            phone: Some("555-0100"),
            student_id: None,
            password_hash: "h",
        },
    )
    .await
    .unwrap();
    assert_eq!(w.role, Rolle::Warden);
    assert_eq!(w.student_id, None);
}

#[tokio::test]
async fn principal_deaktivieren() {
    let db = db().await;
    let p = PrincipalRepository::create(&db, student_principal("priya", "priya@x.org", "S-1001"))
        .await
        .unwrap();

    assert!(PrincipalRepository::set_active(&db, p.id, false).await.unwrap());
    let geladen = PrincipalRepository::get_by_username(&db, "priya").await.unwrap().unwrap();
    assert!(!geladen.is_active);
}

#[tokio::test]
async fn verknuepfung_wird_bei_loeschung_geloest() {
    let db = db().await;
    let p = PrincipalRepository::create(&db, student_principal("priya", "priya@x.org", "S-1001"))
        .await
        .unwrap();
    let s = StudentRepository::create(
        &db,
        NeuerStudent {
            name: "Priya Sharma",
            email: "priya@x.org",
            phone: "555-0101",
            student_id: "S-1001",
        },
    )
    .await
    .unwrap();

    PrincipalRepository::link_student_record(&db, p.id, Some(s.id)).await.unwrap();
    let geladen = PrincipalRepository::get_by_username(&db, "priya").await.unwrap().unwrap();
    assert_eq!(geladen.student_record_id, Some(s.id));

    assert!(StudentRepository::delete(&db, s.id).await.unwrap());
    let geladen = PrincipalRepository::get_by_username(&db, "priya").await.unwrap().unwrap();
    assert_eq!(geladen.student_record_id, None);
}

#[tokio::test]
async fn student_sichtbereich_filtert() {
    let db = db().await;
    let eigen = StudentRepository::create(
        &db,
        NeuerStudent { name: "Priya", email: "p@x.org", phone: "1", student_id: "S-1001" },
    )
    .await
    .unwrap();
    let fremd = StudentRepository::create(
        &db,
        NeuerStudent { name: "Ravi", email: "r@x.org", phone: "2", student_id: "S-2002" },
    )
    .await
    .unwrap();

    let sicht = Sichtbereich::Eigentuemer("S-1001".into());
    let liste = StudentRepository::list(&db, &sicht).await.unwrap();
    assert_eq!(liste.len(), 1);
    assert_eq!(liste[0].id, eigen.id);

    assert!(StudentRepository::get(&db, fremd.id, &sicht).await.unwrap().is_none());
    assert!(StudentRepository::get(&db, fremd.id, &Sichtbereich::Global)
        .await
        .unwrap()
        .is_some());
    assert_eq!(StudentRepository::list(&db, &Sichtbereich::Global).await.unwrap().len(), 2);
}

#[tokio::test]
async fn student_aktualisieren() {
    let db = db().await;
    let s = StudentRepository::create(
        &db,
        NeuerStudent { name: "Priya", email: "p@x.org", phone: "1", student_id: "S-1001" },
    )
    .await
    .unwrap();

    let neu = StudentRepository::update(
        &db,
        s.id,
        StudentUpdate {
            phone: Some("555-9999".into()),
            status: Some(StudentStatus::Out),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(neu.phone, "555-9999");
    assert_eq!(neu.name, "Priya");
    assert_eq!(neu.status, StudentStatus::Out);
    assert_eq!(StudentRepository::count(&db, Some(StudentStatus::Out)).await.unwrap(), 1);

    let err = StudentRepository::update(&db, uuid::Uuid::new_v4(), StudentUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::NichtGefunden(_)));
}

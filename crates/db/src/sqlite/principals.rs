//! SQLite-Implementierung des PrincipalRepository (Credential-Store)

use chrono::Utc;
use uuid::Uuid;

use crate::error::DbError;
use crate::models::{NeuerPrincipal, PrincipalRecord};
use crate::repository::{DbResult, PrincipalRepository};
use crate::sqlite::pool::SqliteDb;
use crate::sqlite::util::{parse_datetime, parse_opt_uuid, parse_text, parse_uuid, zeit_text};

const SPALTEN: &str = "id, username, email, role, full_name, phone, student_id,
                       student_record_id, password_hash, is_active, created_at";

impl PrincipalRepository for SqliteDb {
    async fn create(&self, data: NeuerPrincipal<'_>) -> DbResult<PrincipalRecord> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        // Kein Vorab-SELECT: die UNIQUE-Indizes entscheiden atomar
        sqlx::query(
            "INSERT INTO users (id, username, email, role, full_name, phone, student_id,
                                password_hash, is_active, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, 1, ?)",
        )
        .bind(id.to_string())
        .bind(data.username)
        .bind(data.email)
        .bind(data.role.als_str())
        .bind(data.full_name)
        .bind(data.phone)
        .bind(data.student_id)
        .bind(data.password_hash)
        .bind(zeit_text(now))
        .execute(&self.pool)
        .await
        .map_err(DbError::aus_sqlx)?;

        Ok(PrincipalRecord {
            id,
            username: data.username.to_string(),
            email: data.email.to_string(),
            role: data.role,
            full_name: data.full_name.map(str::to_string),
            phone: data.phone.map(str::to_string),
            student_id: data.student_id.map(str::to_string),
            student_record_id: None,
            password_hash: data.password_hash.to_string(),
            is_active: true,
            created_at: now,
        })
    }

    async fn get_by_username(&self, username: &str) -> DbResult<Option<PrincipalRecord>> {
        // Gross-/Kleinschreibung ist signifikant (SQLite-Standard fuer '=')
        let sql = format!("SELECT {SPALTEN} FROM users WHERE username = ?");
        let row = sqlx::query(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_principal(&r)).transpose()
    }

    async fn get_by_email(&self, email: &str) -> DbResult<Option<PrincipalRecord>> {
        let sql = format!("SELECT {SPALTEN} FROM users WHERE email = ?");
        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_principal(&r)).transpose()
    }

    async fn set_active(&self, id: Uuid, aktiv: bool) -> DbResult<bool> {
        let affected = sqlx::query("UPDATE users SET is_active = ? WHERE id = ?")
            .bind(aktiv as i64)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }

    async fn link_student_record(&self, id: Uuid, record_id: Option<Uuid>) -> DbResult<()> {
        let affected = sqlx::query("UPDATE users SET student_record_id = ? WHERE id = ?")
            .bind(record_id.map(|r| r.to_string()))
            .bind(id.to_string())
            .execute(&self.pool)
            .await?
            .rows_affected();
        if affected == 0 {
            return Err(DbError::nicht_gefunden(format!("Principal {id}")));
        }
        Ok(())
    }

    async fn list_by_student_id(&self, student_id: &str) -> DbResult<Vec<PrincipalRecord>> {
        let sql = format!("SELECT {SPALTEN} FROM users WHERE student_id = ? ORDER BY username");
        let rows = sqlx::query(&sql)
            .bind(student_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_principal).collect()
    }
}

fn row_to_principal(row: &sqlx::sqlite::SqliteRow) -> DbResult<PrincipalRecord> {
    use sqlx::Row as _;

    let is_active: i64 = row.try_get("is_active")?;

    Ok(PrincipalRecord {
        id: parse_uuid(row, "id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        role: parse_text(row, "role")?,
        full_name: row.try_get("full_name")?,
        phone: row.try_get("phone")?,
        student_id: row.try_get("student_id")?,
        student_record_id: parse_opt_uuid(row, "student_record_id")?,
        password_hash: row.try_get("password_hash")?,
        is_active: is_active != 0,
        created_at: parse_datetime(row, "created_at")?,
    })
}

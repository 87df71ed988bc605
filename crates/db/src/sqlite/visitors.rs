//! SQLite-Implementierung des BesucherRepository

use chrono::Utc;
use uuid::Uuid;
use wohnheim_core::Sichtbereich;

use crate::error::DbError;
use crate::models::{BesucherRecord, BesucherStatus, NeuerBesucher};
use crate::repository::{BesucherRepository, DbResult};
use crate::sqlite::pool::SqliteDb;
use crate::sqlite::util::{parse_datetime, parse_opt_datetime, parse_text, parse_uuid, zeit_text};

const SPALTEN: &str = "id, name, phone, visiting_student_id, visiting_student_name, purpose,
                       check_in, check_out, status";

impl BesucherRepository for SqliteDb {
    async fn create(&self, data: NeuerBesucher<'_>) -> DbResult<BesucherRecord> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO visitors (id, name, phone, visiting_student_id, visiting_student_name,
                                   purpose, check_in, check_out, status)
             VALUES (?, ?, ?, ?, ?, ?, ?, NULL, ?)",
        )
        .bind(id.to_string())
        .bind(data.name)
        .bind(data.phone)
        .bind(data.visiting_student_id)
        .bind(data.visiting_student_name)
        .bind(data.purpose)
        .bind(zeit_text(now))
        .bind(BesucherStatus::CheckedIn.als_str())
        .execute(&self.pool)
        .await
        .map_err(DbError::aus_sqlx)?;

        Ok(BesucherRecord {
            id,
            name: data.name.to_string(),
            phone: data.phone.to_string(),
            visiting_student_id: data.visiting_student_id.to_string(),
            visiting_student_name: data.visiting_student_name.to_string(),
            purpose: data.purpose.to_string(),
            check_in: now,
            check_out: None,
            status: BesucherStatus::CheckedIn,
        })
    }

    async fn list(&self, sicht: &Sichtbereich) -> DbResult<Vec<BesucherRecord>> {
        let sql = format!(
            "SELECT {SPALTEN} FROM visitors WHERE (? IS NULL OR visiting_student_id = ?)
             ORDER BY check_in DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(sicht.eigentuemer())
            .bind(sicht.eigentuemer())
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_besucher).collect()
    }

    async fn list_active(&self, sicht: &Sichtbereich) -> DbResult<Vec<BesucherRecord>> {
        let sql = format!(
            "SELECT {SPALTEN} FROM visitors
             WHERE status = ? AND (? IS NULL OR visiting_student_id = ?)
             ORDER BY check_in DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(BesucherStatus::CheckedIn.als_str())
            .bind(sicht.eigentuemer())
            .bind(sicht.eigentuemer())
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_besucher).collect()
    }

    async fn check_out(&self, id: Uuid) -> DbResult<bool> {
        let affected = sqlx::query("UPDATE visitors SET check_out = ?, status = ? WHERE id = ?")
            .bind(zeit_text(Utc::now()))
            .bind(BesucherStatus::CheckedOut.als_str())
            .bind(id.to_string())
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }

    async fn count_active(&self, sicht: &Sichtbereich) -> DbResult<i64> {
        let anzahl: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM visitors
             WHERE status = ? AND (? IS NULL OR visiting_student_id = ?)",
        )
        .bind(BesucherStatus::CheckedIn.als_str())
        .bind(sicht.eigentuemer())
        .bind(sicht.eigentuemer())
        .fetch_one(&self.pool)
        .await?;
        Ok(anzahl)
    }
}

fn row_to_besucher(row: &sqlx::sqlite::SqliteRow) -> DbResult<BesucherRecord> {
    use sqlx::Row as _;

    Ok(BesucherRecord {
        id: parse_uuid(row, "id")?,
        name: row.try_get("name")?,
        phone: row.try_get("phone")?,
        visiting_student_id: row.try_get("visiting_student_id")?,
        visiting_student_name: row.try_get("visiting_student_name")?,
        purpose: row.try_get("purpose")?,
        check_in: parse_datetime(row, "check_in")?,
        check_out: parse_opt_datetime(row, "check_out")?,
        status: parse_text(row, "status")?,
    })
}

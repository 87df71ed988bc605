//! SQLite-Implementierung des WartungsRepository

use chrono::Utc;
use uuid::Uuid;
use wohnheim_core::Sichtbereich;

use crate::error::DbError;
use crate::models::{NeueWartung, WartungsRecord, WartungsStatus};
use crate::repository::{DbResult, WartungsRepository};
use crate::sqlite::pool::SqliteDb;
use crate::sqlite::util::{parse_datetime, parse_text, parse_uuid, zeit_text};

const SPALTEN: &str = "id, student_id, student_name, room_number, issue_type, description,
                       status, created_at, updated_at";

impl WartungsRepository for SqliteDb {
    async fn create(&self, data: NeueWartung<'_>) -> DbResult<WartungsRecord> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO maintenance_requests (id, student_id, student_name, room_number,
                                               issue_type, description, status,
                                               created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(data.student_id)
        .bind(data.student_name)
        .bind(data.room_number)
        .bind(data.issue_type)
        .bind(data.description)
        .bind(WartungsStatus::Pending.als_str())
        .bind(zeit_text(now))
        .bind(zeit_text(now))
        .execute(&self.pool)
        .await
        .map_err(DbError::aus_sqlx)?;

        Ok(WartungsRecord {
            id,
            student_id: data.student_id.to_string(),
            student_name: data.student_name.to_string(),
            room_number: data.room_number.to_string(),
            issue_type: data.issue_type.to_string(),
            description: data.description.to_string(),
            status: WartungsStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    async fn list(&self, sicht: &Sichtbereich) -> DbResult<Vec<WartungsRecord>> {
        let sql = format!(
            "SELECT {SPALTEN} FROM maintenance_requests WHERE (? IS NULL OR student_id = ?)
             ORDER BY created_at DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(sicht.eigentuemer())
            .bind(sicht.eigentuemer())
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_wartung).collect()
    }

    async fn update_status(&self, id: Uuid, status: WartungsStatus) -> DbResult<bool> {
        let affected =
            sqlx::query("UPDATE maintenance_requests SET status = ?, updated_at = ? WHERE id = ?")
                .bind(status.als_str())
                .bind(zeit_text(Utc::now()))
                .bind(id.to_string())
                .execute(&self.pool)
                .await?
                .rows_affected();
        Ok(affected > 0)
    }

    async fn count(&self, sicht: &Sichtbereich, status: WartungsStatus) -> DbResult<i64> {
        let anzahl: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM maintenance_requests
             WHERE status = ? AND (? IS NULL OR student_id = ?)",
        )
        .bind(status.als_str())
        .bind(sicht.eigentuemer())
        .bind(sicht.eigentuemer())
        .fetch_one(&self.pool)
        .await?;
        Ok(anzahl)
    }
}

fn row_to_wartung(row: &sqlx::sqlite::SqliteRow) -> DbResult<WartungsRecord> {
    use sqlx::Row as _;

    Ok(WartungsRecord {
        id: parse_uuid(row, "id")?,
        student_id: row.try_get("student_id")?,
        student_name: row.try_get("student_name")?,
        room_number: row.try_get("room_number")?,
        issue_type: row.try_get("issue_type")?,
        description: row.try_get("description")?,
        status: parse_text(row, "status")?,
        created_at: parse_datetime(row, "created_at")?,
        updated_at: parse_datetime(row, "updated_at")?,
    })
}

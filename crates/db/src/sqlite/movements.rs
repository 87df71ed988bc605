//! SQLite-Implementierung des BewegungRepository

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;
use wohnheim_core::Sichtbereich;

use crate::error::DbError;
use crate::models::{BewegungRecord, NeueBewegung};
use crate::repository::{BewegungRepository, DbResult};
use crate::sqlite::pool::SqliteDb;
use crate::sqlite::util::{parse_datetime, parse_text, parse_uuid, zeit_text};

const SPALTEN: &str = "id, student_id, student_name, action, timestamp, note";

impl BewegungRepository for SqliteDb {
    async fn create(&self, data: NeueBewegung<'_>) -> DbResult<BewegungRecord> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO movement_logs (id, student_id, student_name, action, timestamp, note)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(data.student_id)
        .bind(data.student_name)
        .bind(data.action.als_str())
        .bind(zeit_text(now))
        .bind(data.note)
        .execute(&mut *tx)
        .await
        .map_err(DbError::aus_sqlx)?;

        // Zuordnung ueber die fachliche Kennung; ohne Treffer bleibt nur der Log-Eintrag
        let aktualisiert =
            sqlx::query("UPDATE students SET status = ?, last_seen = ? WHERE student_id = ?")
                .bind(data.action.folgestatus().als_str())
                .bind(zeit_text(now))
                .bind(data.student_id)
                .execute(&mut *tx)
                .await?
                .rows_affected();

        tx.commit().await?;

        debug!(
            student_id = %data.student_id,
            action = data.action.als_str(),
            aktualisiert,
            "Bewegung protokolliert"
        );

        Ok(BewegungRecord {
            id,
            student_id: data.student_id.to_string(),
            student_name: data.student_name.to_string(),
            action: data.action,
            timestamp: now,
            note: data.note.map(str::to_string),
        })
    }

    async fn list(&self, sicht: &Sichtbereich, limit: Option<i64>) -> DbResult<Vec<BewegungRecord>> {
        // LIMIT -1 bedeutet in SQLite "unbegrenzt"
        let sql = format!(
            "SELECT {SPALTEN} FROM movement_logs WHERE (? IS NULL OR student_id = ?)
             ORDER BY timestamp DESC LIMIT ?"
        );
        let rows = sqlx::query(&sql)
            .bind(sicht.eigentuemer())
            .bind(sicht.eigentuemer())
            .bind(limit.unwrap_or(-1))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_bewegung).collect()
    }
}

fn row_to_bewegung(row: &sqlx::sqlite::SqliteRow) -> DbResult<BewegungRecord> {
    use sqlx::Row as _;

    Ok(BewegungRecord {
        id: parse_uuid(row, "id")?,
        student_id: row.try_get("student_id")?,
        student_name: row.try_get("student_name")?,
        action: parse_text(row, "action")?,
        timestamp: parse_datetime(row, "timestamp")?,
        note: row.try_get("note")?,
    })
}

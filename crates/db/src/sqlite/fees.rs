//! SQLite-Implementierung des GebuehrRepository

use chrono::{DateTime, Utc};
use uuid::Uuid;
use wohnheim_core::Sichtbereich;

use crate::error::DbError;
use crate::models::{GebuehrRecord, GebuehrStatus, NeueGebuehr};
use crate::repository::{DbResult, GebuehrRepository};
use crate::sqlite::pool::SqliteDb;
use crate::sqlite::util::{parse_datetime, parse_opt_datetime, parse_text, parse_uuid, zeit_text};

const SPALTEN: &str = "id, student_id, student_name, fee_type, amount, due_date, status,
                       paid_date, created_at";

impl GebuehrRepository for SqliteDb {
    async fn create(&self, data: NeueGebuehr<'_>) -> DbResult<GebuehrRecord> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO fee_records (id, student_id, student_name, fee_type, amount, due_date,
                                      status, paid_date, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, NULL, ?)",
        )
        .bind(id.to_string())
        .bind(data.student_id)
        .bind(data.student_name)
        .bind(data.fee_type)
        .bind(data.amount)
        .bind(zeit_text(data.due_date))
        .bind(GebuehrStatus::Pending.als_str())
        .bind(zeit_text(now))
        .execute(&self.pool)
        .await
        .map_err(DbError::aus_sqlx)?;

        Ok(GebuehrRecord {
            id,
            student_id: data.student_id.to_string(),
            student_name: data.student_name.to_string(),
            fee_type: data.fee_type.to_string(),
            amount: data.amount,
            due_date: data.due_date,
            status: GebuehrStatus::Pending,
            paid_date: None,
            created_at: now,
        })
    }

    async fn list(&self, sicht: &Sichtbereich) -> DbResult<Vec<GebuehrRecord>> {
        let sql = format!(
            "SELECT {SPALTEN} FROM fee_records WHERE (? IS NULL OR student_id = ?)
             ORDER BY due_date ASC"
        );
        let rows = sqlx::query(&sql)
            .bind(sicht.eigentuemer())
            .bind(sicht.eigentuemer())
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_gebuehr).collect()
    }

    async fn list_overdue(
        &self,
        sicht: &Sichtbereich,
        stichtag: DateTime<Utc>,
    ) -> DbResult<Vec<GebuehrRecord>> {
        let sql = format!(
            "SELECT {SPALTEN} FROM fee_records
             WHERE due_date < ? AND status != ? AND (? IS NULL OR student_id = ?)
             ORDER BY due_date ASC"
        );
        let rows = sqlx::query(&sql)
            .bind(zeit_text(stichtag))
            .bind(GebuehrStatus::Paid.als_str())
            .bind(sicht.eigentuemer())
            .bind(sicht.eigentuemer())
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_gebuehr).collect()
    }

    async fn pay(&self, id: Uuid) -> DbResult<bool> {
        let affected = sqlx::query("UPDATE fee_records SET status = ?, paid_date = ? WHERE id = ?")
            .bind(GebuehrStatus::Paid.als_str())
            .bind(zeit_text(Utc::now()))
            .bind(id.to_string())
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }

    async fn count_overdue(&self, sicht: &Sichtbereich, stichtag: DateTime<Utc>) -> DbResult<i64> {
        let anzahl: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM fee_records
             WHERE due_date < ? AND status != ? AND (? IS NULL OR student_id = ?)",
        )
        .bind(zeit_text(stichtag))
        .bind(GebuehrStatus::Paid.als_str())
        .bind(sicht.eigentuemer())
        .bind(sicht.eigentuemer())
        .fetch_one(&self.pool)
        .await?;
        Ok(anzahl)
    }
}

fn row_to_gebuehr(row: &sqlx::sqlite::SqliteRow) -> DbResult<GebuehrRecord> {
    use sqlx::Row as _;

    Ok(GebuehrRecord {
        id: parse_uuid(row, "id")?,
        student_id: row.try_get("student_id")?,
        student_name: row.try_get("student_name")?,
        fee_type: row.try_get("fee_type")?,
        amount: row.try_get("amount")?,
        due_date: parse_datetime(row, "due_date")?,
        status: parse_text(row, "status")?,
        paid_date: parse_opt_datetime(row, "paid_date")?,
        created_at: parse_datetime(row, "created_at")?,
    })
}

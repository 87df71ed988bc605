//! SQLite-Implementierung des ZimmerRepository

use chrono::Utc;
use uuid::Uuid;

use crate::error::DbError;
use crate::models::{NeuesZimmer, ZimmerRecord, ZimmerStatus};
use crate::repository::{DbResult, ZimmerRepository};
use crate::sqlite::pool::SqliteDb;
use crate::sqlite::util::{parse_datetime, parse_text, parse_uuid, zeit_text};

const SPALTEN: &str = "id, room_number, floor, capacity, occupied, status, created_at";

impl ZimmerRepository for SqliteDb {
    async fn create(&self, data: NeuesZimmer<'_>) -> DbResult<ZimmerRecord> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO rooms (id, room_number, floor, capacity, occupied, status, created_at)
             VALUES (?, ?, ?, ?, 0, ?, ?)",
        )
        .bind(id.to_string())
        .bind(data.room_number)
        .bind(data.floor)
        .bind(data.capacity)
        .bind(ZimmerStatus::Available.als_str())
        .bind(zeit_text(now))
        .execute(&self.pool)
        .await
        .map_err(DbError::aus_sqlx)?;

        Ok(ZimmerRecord {
            id,
            room_number: data.room_number.to_string(),
            floor: data.floor,
            capacity: data.capacity,
            occupied: 0,
            status: ZimmerStatus::Available,
            created_at: now,
        })
    }

    async fn get_by_number(&self, room_number: &str) -> DbResult<Option<ZimmerRecord>> {
        let sql = format!("SELECT {SPALTEN} FROM rooms WHERE room_number = ? LIMIT 1");
        let row = sqlx::query(&sql)
            .bind(room_number)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_zimmer(&r)).transpose()
    }

    async fn list(&self) -> DbResult<Vec<ZimmerRecord>> {
        let sql = format!("SELECT {SPALTEN} FROM rooms ORDER BY room_number ASC");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(row_to_zimmer).collect()
    }

    async fn list_available(&self) -> DbResult<Vec<ZimmerRecord>> {
        let sql = format!(
            "SELECT {SPALTEN} FROM rooms WHERE status = ? AND occupied < capacity
             ORDER BY room_number ASC"
        );
        let rows = sqlx::query(&sql)
            .bind(ZimmerStatus::Available.als_str())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_zimmer).collect()
    }

    async fn allocate(&self, room_id: Uuid, student_record_id: Uuid) -> DbResult<ZimmerRecord> {
        let mut tx = self.pool.begin().await?;

        let sql = format!("SELECT {SPALTEN} FROM rooms WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(room_id.to_string())
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::nicht_gefunden(format!("Zimmer {room_id}")))?;
        let mut zimmer = row_to_zimmer(&row)?;

        if zimmer.ist_voll() {
            return Err(DbError::ZimmerVoll);
        }

        let affected = sqlx::query("UPDATE students SET room_number = ? WHERE id = ?")
            .bind(&zimmer.room_number)
            .bind(student_record_id.to_string())
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if affected == 0 {
            return Err(DbError::nicht_gefunden(format!("Student {student_record_id}")));
        }

        zimmer.occupied += 1;
        zimmer.status = if zimmer.ist_voll() {
            ZimmerStatus::Occupied
        } else {
            ZimmerStatus::Available
        };

        sqlx::query("UPDATE rooms SET occupied = ?, status = ? WHERE id = ?")
            .bind(zimmer.occupied)
            .bind(zimmer.status.als_str())
            .bind(room_id.to_string())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(zimmer)
    }

    async fn count(&self, status: Option<ZimmerStatus>) -> DbResult<i64> {
        let anzahl: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM rooms WHERE (? IS NULL OR status = ?)")
                .bind(status.map(|s| s.als_str()))
                .bind(status.map(|s| s.als_str()))
                .fetch_one(&self.pool)
                .await?;
        Ok(anzahl)
    }
}

fn row_to_zimmer(row: &sqlx::sqlite::SqliteRow) -> DbResult<ZimmerRecord> {
    use sqlx::Row as _;

    Ok(ZimmerRecord {
        id: parse_uuid(row, "id")?,
        room_number: row.try_get("room_number")?,
        floor: row.try_get("floor")?,
        capacity: row.try_get("capacity")?,
        occupied: row.try_get("occupied")?,
        status: parse_text(row, "status")?,
        created_at: parse_datetime(row, "created_at")?,
    })
}

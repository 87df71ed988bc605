//! SQLite-Implementierung des StudentRepository

use chrono::Utc;
use uuid::Uuid;
use wohnheim_core::Sichtbereich;

use crate::error::DbError;
use crate::models::{NeuerStudent, StudentRecord, StudentStatus, StudentUpdate};
use crate::repository::{DbResult, StudentRepository};
use crate::sqlite::pool::SqliteDb;
use crate::sqlite::util::{parse_datetime, parse_text, parse_uuid, zeit_text};

const SPALTEN: &str = "id, name, email, phone, student_id, room_number, status, created_at, last_seen";

impl StudentRepository for SqliteDb {
    async fn create(&self, data: NeuerStudent<'_>) -> DbResult<StudentRecord> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO students (id, name, email, phone, student_id, room_number, status,
                                   created_at, last_seen)
             VALUES (?, ?, ?, ?, ?, NULL, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(data.name)
        .bind(data.email)
        .bind(data.phone)
        .bind(data.student_id)
        .bind(StudentStatus::In.als_str())
        .bind(zeit_text(now))
        .bind(zeit_text(now))
        .execute(&self.pool)
        .await
        .map_err(DbError::aus_sqlx)?;

        Ok(StudentRecord {
            id,
            name: data.name.to_string(),
            email: data.email.to_string(),
            phone: data.phone.to_string(),
            student_id: data.student_id.to_string(),
            room_number: None,
            status: StudentStatus::In,
            created_at: now,
            last_seen: now,
        })
    }

    async fn get(&self, id: Uuid, sicht: &Sichtbereich) -> DbResult<Option<StudentRecord>> {
        let sql = format!(
            "SELECT {SPALTEN} FROM students WHERE id = ? AND (? IS NULL OR student_id = ?)"
        );
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .bind(sicht.eigentuemer())
            .bind(sicht.eigentuemer())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_student(&r)).transpose()
    }

    async fn list(&self, sicht: &Sichtbereich) -> DbResult<Vec<StudentRecord>> {
        let sql = format!(
            "SELECT {SPALTEN} FROM students WHERE (? IS NULL OR student_id = ?)
             ORDER BY created_at ASC"
        );
        let rows = sqlx::query(&sql)
            .bind(sicht.eigentuemer())
            .bind(sicht.eigentuemer())
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_student).collect()
    }

    async fn find_by_student_id(&self, student_id: &str) -> DbResult<Vec<StudentRecord>> {
        let sql = format!("SELECT {SPALTEN} FROM students WHERE student_id = ? ORDER BY created_at ASC");
        let rows = sqlx::query(&sql)
            .bind(student_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_student).collect()
    }

    async fn update(&self, id: Uuid, data: StudentUpdate) -> DbResult<StudentRecord> {
        let mut tx = self.pool.begin().await?;

        let sql = format!("SELECT {SPALTEN} FROM students WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::nicht_gefunden(format!("Student {id}")))?;
        let mut student = row_to_student(&row)?;

        if let Some(name) = data.name {
            student.name = name;
        }
        if let Some(email) = data.email {
            student.email = email;
        }
        if let Some(phone) = data.phone {
            student.phone = phone;
        }
        if let Some(room_number) = data.room_number {
            student.room_number = Some(room_number);
        }
        if let Some(status) = data.status {
            student.status = status;
        }

        sqlx::query(
            "UPDATE students SET name = ?, email = ?, phone = ?, room_number = ?, status = ?
             WHERE id = ?",
        )
        .bind(&student.name)
        .bind(&student.email)
        .bind(&student.phone)
        .bind(&student.room_number)
        .bind(student.status.als_str())
        .bind(id.to_string())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(student)
    }

    async fn delete(&self, id: Uuid) -> DbResult<bool> {
        let affected = sqlx::query("DELETE FROM students WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }

    async fn count(&self, status: Option<StudentStatus>) -> DbResult<i64> {
        let anzahl: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM students WHERE (? IS NULL OR status = ?)")
                .bind(status.map(|s| s.als_str()))
                .bind(status.map(|s| s.als_str()))
                .fetch_one(&self.pool)
                .await?;
        Ok(anzahl)
    }
}

fn row_to_student(row: &sqlx::sqlite::SqliteRow) -> DbResult<StudentRecord> {
    use sqlx::Row as _;

    Ok(StudentRecord {
        id: parse_uuid(row, "id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        student_id: row.try_get("student_id")?,
        room_number: row.try_get("room_number")?,
        status: parse_text(row, "status")?,
        created_at: parse_datetime(row, "created_at")?,
        last_seen: parse_datetime(row, "last_seen")?,
    })
}

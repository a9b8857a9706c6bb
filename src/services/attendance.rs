use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::attendance::{Attendance, AttendingUser};

pub struct AttendanceService;

impl AttendanceService {
    /// Upsert the caller's attendance for a date. Last write wins; no
    /// history is kept.
    pub async fn set(
        pool: &PgPool,
        user_id: Uuid,
        date: NaiveDate,
        is_attending: bool,
    ) -> anyhow::Result<Attendance> {
        let row = sqlx::query_as::<_, Attendance>(
            "INSERT INTO daily_attendance (user_id, date, is_attending)
             VALUES ($1, $2, $3)
             ON CONFLICT (user_id, date) DO UPDATE SET
                 is_attending = EXCLUDED.is_attending
             RETURNING *",
        )
        .bind(user_id)
        .bind(date)
        .bind(is_attending)
        .fetch_one(pool)
        .await?;
        Ok(row)
    }

    pub async fn is_attending(
        pool: &PgPool,
        user_id: Uuid,
        date: NaiveDate,
    ) -> anyhow::Result<bool> {
        let attending: Option<bool> = sqlx::query_scalar(
            "SELECT is_attending FROM daily_attendance WHERE user_id = $1 AND date = $2",
        )
        .bind(user_id)
        .bind(date)
        .fetch_optional(pool)
        .await?;
        Ok(attending.unwrap_or(false))
    }

    /// Attending users for a date with their display names.
    pub async fn attending_users(
        pool: &PgPool,
        date: NaiveDate,
    ) -> anyhow::Result<Vec<AttendingUser>> {
        let users = sqlx::query_as::<_, AttendingUser>(
            "SELECT a.user_id, p.name
             FROM daily_attendance a
             JOIN profiles p ON p.id = a.user_id
             WHERE a.date = $1 AND a.is_attending = TRUE
             ORDER BY a.created_at, a.id",
        )
        .bind(date)
        .fetch_all(pool)
        .await?;
        Ok(users)
    }

    pub async fn attending_user_ids(pool: &PgPool, date: NaiveDate) -> anyhow::Result<Vec<Uuid>> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT user_id FROM daily_attendance
             WHERE date = $1 AND is_attending = TRUE
             ORDER BY created_at, id",
        )
        .bind(date)
        .fetch_all(pool)
        .await?;
        Ok(ids)
    }

    /// Flag that the user rated today's restaurant. Write-only marker kept
    /// alongside the attendance row.
    pub async fn mark_rated(pool: &PgPool, user_id: Uuid, date: NaiveDate) -> anyhow::Result<()> {
        sqlx::query(
            "UPDATE daily_attendance SET has_rated = TRUE WHERE user_id = $1 AND date = $2",
        )
        .bind(user_id)
        .bind(date)
        .execute(pool)
        .await?;
        Ok(())
    }
}

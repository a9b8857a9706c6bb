use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// DB row struct. One row per (user, date), upserted on toggle.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Attendance {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub is_attending: bool,
    pub has_rated: bool,
    pub created_at: DateTime<Utc>,
}

/// An attending user with their display name, for the "who's coming" list.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AttendingUser {
    pub user_id: Uuid,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct SetAttendanceRequest {
    pub is_attending: bool,
}

#[derive(Debug, Serialize)]
pub struct AttendanceOverview {
    pub date: NaiveDate,
    pub is_attending: bool,
    pub attending: Vec<AttendingUser>,
}

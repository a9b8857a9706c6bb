use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Group with its member count, for the groups listing.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct GroupWithMemberCount {
    pub id: Uuid,
    pub name: String,
    pub is_default: bool,
    pub member_count: i64,
}

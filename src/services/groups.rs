use sqlx::PgPool;
use uuid::Uuid;

use crate::models::group::GroupWithMemberCount;

pub struct GroupService;

impl GroupService {
    pub async fn list(pool: &PgPool) -> anyhow::Result<Vec<GroupWithMemberCount>> {
        let groups = sqlx::query_as::<_, GroupWithMemberCount>(
            "SELECT g.id, g.name, g.is_default,
                 (SELECT COUNT(*) FROM group_members gm WHERE gm.group_id = g.id) AS member_count
             FROM groups g
             ORDER BY g.name",
        )
        .fetch_all(pool)
        .await?;
        Ok(groups)
    }

    pub async fn exists(pool: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM groups WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(exists)
    }

    pub async fn join(pool: &PgPool, group_id: Uuid, user_id: Uuid) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO group_members (group_id, user_id)
             VALUES ($1, $2)
             ON CONFLICT (group_id, user_id) DO NOTHING",
        )
        .bind(group_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn leave(pool: &PgPool, group_id: Uuid, user_id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM group_members WHERE group_id = $1 AND user_id = $2")
            .bind(group_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(())
    }
}

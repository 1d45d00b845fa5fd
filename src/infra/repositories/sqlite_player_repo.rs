use crate::domain::{models::player::Player, ports::PlayerRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqlitePlayerRepo {
    pool: SqlitePool,
}

impl SqlitePlayerRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlayerRepository for SqlitePlayerRepo {
    async fn create(&self, player: &Player) -> Result<Player, AppError> {
        sqlx::query_as::<_, Player>(
            r#"INSERT INTO players (id, coach_id, parent_id, first_name, last_name, date_of_birth, position, preferred_foot, height_cm, weight_kg, notes, is_active, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
               RETURNING *"#
        )
            .bind(&player.id)
            .bind(&player.coach_id)
            .bind(&player.parent_id)
            .bind(&player.first_name)
            .bind(&player.last_name)
            .bind(player.date_of_birth)
            .bind(&player.position)
            .bind(&player.preferred_foot)
            .bind(player.height_cm)
            .bind(player.weight_kg)
            .bind(&player.notes)
            .bind(player.is_active)
            .bind(player.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Player>, AppError> {
        sqlx::query_as::<_, Player>("SELECT * FROM players WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_coach(&self, coach_id: &str, include_inactive: bool) -> Result<Vec<Player>, AppError> {
        sqlx::query_as::<_, Player>(
            "SELECT * FROM players WHERE coach_id = ? AND (is_active = 1 OR ? = 1) ORDER BY first_name ASC, last_name ASC"
        )
            .bind(coach_id)
            .bind(include_inactive)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_parent(&self, parent_id: &str) -> Result<Vec<Player>, AppError> {
        sqlx::query_as::<_, Player>(
            "SELECT * FROM players WHERE parent_id = ? AND is_active = 1 ORDER BY first_name ASC, last_name ASC"
        )
            .bind(parent_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn set_parent(&self, id: &str, coach_id: &str, parent_id: Option<&str>) -> Result<Option<Player>, AppError> {
        sqlx::query_as::<_, Player>("UPDATE players SET parent_id = ? WHERE id = ? AND coach_id = ? RETURNING *")
            .bind(parent_id)
            .bind(id)
            .bind(coach_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn deactivate(&self, id: &str, coach_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE players SET is_active = 0 WHERE id = ? AND coach_id = ?")
            .bind(id)
            .bind(coach_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected() > 0)
    }
}

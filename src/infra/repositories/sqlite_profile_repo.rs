use crate::domain::{models::profile::{Coach, Parent}, ports::ProfileRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteProfileRepo {
    pool: SqlitePool,
}

impl SqliteProfileRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for SqliteProfileRepo {
    async fn create_coach(&self, coach: &Coach) -> Result<Coach, AppError> {
        sqlx::query_as::<_, Coach>(
            "INSERT INTO coaches (id, user_id, display_name, created_at) VALUES (?, ?, ?, ?) RETURNING *"
        )
            .bind(&coach.id)
            .bind(&coach.user_id)
            .bind(&coach.display_name)
            .bind(coach.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn create_parent(&self, parent: &Parent) -> Result<Parent, AppError> {
        sqlx::query_as::<_, Parent>(
            "INSERT INTO parents (id, user_id, display_name, email, phone, created_at) VALUES (?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&parent.id)
            .bind(&parent.user_id)
            .bind(&parent.display_name)
            .bind(&parent.email)
            .bind(&parent.phone)
            .bind(parent.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_coach_by_user(&self, user_id: &str) -> Result<Option<Coach>, AppError> {
        sqlx::query_as::<_, Coach>("SELECT * FROM coaches WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_parent_by_user(&self, user_id: &str) -> Result<Option<Parent>, AppError> {
        sqlx::query_as::<_, Parent>("SELECT * FROM parents WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_parent_by_id(&self, id: &str) -> Result<Option<Parent>, AppError> {
        sqlx::query_as::<_, Parent>("SELECT * FROM parents WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}

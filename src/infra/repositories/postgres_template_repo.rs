use crate::domain::{models::availability::AvailabilityTemplate, ports::TemplateRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresTemplateRepo {
    pool: PgPool,
}

impl PostgresTemplateRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TemplateRepository for PostgresTemplateRepo {
    async fn create(&self, template: &AvailabilityTemplate) -> Result<AvailabilityTemplate, AppError> {
        sqlx::query_as::<_, AvailabilityTemplate>(
            r#"INSERT INTO availability_templates (id, coach_id, day_of_week, start_time, end_time, location, is_recurring, specific_date, max_capacity, is_active, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
               RETURNING *"#
        )
            .bind(&template.id)
            .bind(&template.coach_id)
            .bind(template.day_of_week)
            .bind(&template.start_time)
            .bind(&template.end_time)
            .bind(&template.location)
            .bind(template.is_recurring)
            .bind(template.specific_date)
            .bind(template.max_capacity)
            .bind(template.is_active)
            .bind(template.created_at)
            .bind(template.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<AvailabilityTemplate>, AppError> {
        sqlx::query_as::<_, AvailabilityTemplate>("SELECT * FROM availability_templates WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, template: &AvailabilityTemplate) -> Result<AvailabilityTemplate, AppError> {
        sqlx::query_as::<_, AvailabilityTemplate>(
            r#"UPDATE availability_templates
               SET day_of_week = $1, start_time = $2, end_time = $3, location = $4, is_recurring = $5, specific_date = $6,
                   max_capacity = $7, updated_at = $8
               WHERE id = $9 AND coach_id = $10 AND is_active
               RETURNING *"#
        )
            .bind(template.day_of_week)
            .bind(&template.start_time)
            .bind(&template.end_time)
            .bind(&template.location)
            .bind(template.is_recurring)
            .bind(template.specific_date)
            .bind(template.max_capacity)
            .bind(template.updated_at)
            .bind(&template.id)
            .bind(&template.coach_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Slot not found or not authorized".into()))
    }

    async fn deactivate(&self, id: &str, coach_id: &str, now: DateTime<Utc>) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE availability_templates SET is_active = FALSE, updated_at = $1 WHERE id = $2 AND coach_id = $3 AND is_active"
        )
            .bind(now)
            .bind(id)
            .bind(coach_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_active(&self, coach_id: &str) -> Result<Vec<AvailabilityTemplate>, AppError> {
        sqlx::query_as::<_, AvailabilityTemplate>(
            "SELECT * FROM availability_templates WHERE coach_id = $1 AND is_active ORDER BY day_of_week ASC, start_time ASC"
        )
            .bind(coach_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_active_recurring(&self, coach_id: &str) -> Result<Vec<AvailabilityTemplate>, AppError> {
        sqlx::query_as::<_, AvailabilityTemplate>(
            r#"SELECT * FROM availability_templates
               WHERE coach_id = $1 AND is_active AND is_recurring
               ORDER BY day_of_week ASC, start_time ASC"#
        )
            .bind(coach_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}

use std::sync::Arc;
use chrono::NaiveDate;
use crate::domain::models::player::{NewPlayerParams, Player};
use crate::domain::ports::{PlayerRepository, ProfileRepository};
use crate::error::AppError;
use tracing::info;

pub struct NewPlayer {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub position: Option<String>,
    pub preferred_foot: Option<String>,
    pub height_cm: Option<i32>,
    pub weight_kg: Option<i32>,
    pub notes: Option<String>,
    pub parent_id: Option<String>,
}

/// Coach-scoped player registry; parents only ever read the players linked to them.
pub struct PlayerService {
    players: Arc<dyn PlayerRepository>,
    profiles: Arc<dyn ProfileRepository>,
}

impl PlayerService {
    pub fn new(players: Arc<dyn PlayerRepository>, profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { players, profiles }
    }

    pub async fn create(&self, coach_id: &str, req: NewPlayer) -> Result<Player, AppError> {
        if req.first_name.trim().is_empty() || req.last_name.trim().is_empty() {
            return Err(AppError::Validation("First and last name are required".into()));
        }
        if let Some(parent_id) = &req.parent_id {
            self.ensure_parent(parent_id).await?;
        }

        let player = Player::new(NewPlayerParams {
            coach_id: coach_id.to_string(),
            parent_id: req.parent_id,
            first_name: req.first_name,
            last_name: req.last_name,
            date_of_birth: req.date_of_birth,
            position: req.position,
            preferred_foot: req.preferred_foot,
            height_cm: req.height_cm,
            weight_kg: req.weight_kg,
            notes: req.notes,
        });

        let created = self.players.create(&player).await?;
        info!("Created player {} for coach {}", created.id, coach_id);
        Ok(created)
    }

    pub async fn list_for_coach(&self, coach_id: &str, include_inactive: bool) -> Result<Vec<Player>, AppError> {
        self.players.list_by_coach(coach_id, include_inactive).await
    }

    pub async fn list_for_parent(&self, parent_id: &str) -> Result<Vec<Player>, AppError> {
        self.players.list_by_parent(parent_id).await
    }

    /// Links the player to another parent, or unlinks it when `parent_id` is None.
    pub async fn assign_parent(&self, id: &str, coach_id: &str, parent_id: Option<String>) -> Result<Player, AppError> {
        self.owned(id, coach_id).await?;
        if let Some(parent_id) = &parent_id {
            self.ensure_parent(parent_id).await?;
        }

        let updated = self.players.set_parent(id, coach_id, parent_id.as_deref()).await?
            .ok_or(AppError::NotFound("Player not found".into()))?;
        info!("Player {} reassigned to parent {:?}", id, updated.parent_id);
        Ok(updated)
    }

    pub async fn deactivate(&self, id: &str, coach_id: &str) -> Result<(), AppError> {
        self.owned(id, coach_id).await?;
        if !self.players.deactivate(id, coach_id).await? {
            return Err(AppError::NotFound("Player not found".into()));
        }
        info!("Deactivated player {}", id);
        Ok(())
    }

    async fn ensure_parent(&self, parent_id: &str) -> Result<(), AppError> {
        self.profiles.find_parent_by_id(parent_id).await?
            .map(|_| ())
            .ok_or(AppError::NotFound("Parent not found".into()))
    }

    async fn owned(&self, id: &str, coach_id: &str) -> Result<Player, AppError> {
        let player = self.players.find_by_id(id).await?
            .ok_or(AppError::NotFound("Player not found".into()))?;
        if player.coach_id != coach_id {
            return Err(AppError::Forbidden("Not authorized to update this player".into()));
        }
        Ok(player)
    }
}

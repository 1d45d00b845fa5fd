use std::sync::Arc;
use crate::domain::{
    models::{auth::{Actor, Role}, profile::{Coach, Parent}},
    ports::ProfileRepository,
};
use crate::error::{is_unique_violation, AppError};
use serde::Serialize;
use tracing::info;

impl Actor {
    pub fn coach_id(&self) -> Result<&str, AppError> {
        match (self.role, self.profile_id.as_deref()) {
            (Role::Coach, Some(id)) => Ok(id),
            _ => Err(AppError::Forbidden("Coach access required".into())),
        }
    }

    pub fn parent_id(&self) -> Result<&str, AppError> {
        match (self.role, self.profile_id.as_deref()) {
            (Role::Parent, Some(id)) => Ok(id),
            _ => Err(AppError::Forbidden("Parent access required".into())),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum Profile {
    Coach(Coach),
    Parent(Parent),
}

pub struct RegisterProfile {
    pub display_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Maps an authenticated user onto the coach or parent profile that owns their data.
pub struct IdentityResolver {
    profiles: Arc<dyn ProfileRepository>,
}

impl IdentityResolver {
    pub fn new(profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { profiles }
    }

    pub async fn resolve(&self, user_id: &str, role: Role) -> Result<Actor, AppError> {
        let profile_id = match role {
            Role::Coach => Some(
                self.profiles.find_coach_by_user(user_id).await?
                    .ok_or(AppError::Forbidden("Coach profile not found".into()))?
                    .id,
            ),
            Role::Parent => Some(
                self.profiles.find_parent_by_user(user_id).await?
                    .ok_or(AppError::Forbidden("Parent profile not found".into()))?
                    .id,
            ),
            Role::Admin => None,
        };

        Ok(Actor { user_id: user_id.to_string(), role, profile_id })
    }

    pub async fn current_profile(&self, user_id: &str, role: Role) -> Result<Profile, AppError> {
        match role {
            Role::Coach => self.profiles.find_coach_by_user(user_id).await?
                .map(Profile::Coach)
                .ok_or(AppError::NotFound("Coach profile not found".into())),
            Role::Parent => self.profiles.find_parent_by_user(user_id).await?
                .map(Profile::Parent)
                .ok_or(AppError::NotFound("Parent profile not found".into())),
            Role::Admin => Err(AppError::NotFound("Admins have no profile".into())),
        }
    }

    pub async fn register(&self, user_id: &str, role: Role, req: RegisterProfile) -> Result<Profile, AppError> {
        if req.display_name.trim().is_empty() {
            return Err(AppError::Validation("Display name is required".into()));
        }

        let created = match role {
            Role::Coach => self.profiles
                .create_coach(&Coach::new(user_id.to_string(), req.display_name))
                .await
                .map(Profile::Coach),
            Role::Parent => self.profiles
                .create_parent(&Parent::new(user_id.to_string(), req.display_name, req.email, req.phone))
                .await
                .map(Profile::Parent),
            Role::Admin => return Err(AppError::Forbidden("Admins cannot register a profile".into())),
        };

        match created {
            Ok(profile) => {
                info!("Registered {} profile for user {}", role.as_str(), user_id);
                Ok(profile)
            }
            Err(AppError::Database(e)) if is_unique_violation(&e) => {
                Err(AppError::Conflict("Profile already registered".into()))
            }
            Err(e) => Err(e),
        }
    }
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::role::{AppRole, CreatedUser, NewUser};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateUserPayload {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[validate(length(min = 1, max = 200))]
    pub full_name: Option<String>,
    #[serde(default = "default_role")]
    #[schema(value_type = String, example = "user")]
    pub role: AppRole,
}

fn default_role() -> AppRole {
    AppRole::User
}

impl From<CreateUserPayload> for NewUser {
    fn from(p: CreateUserPayload) -> Self {
        Self {
            email: p.email.trim().to_lowercase(),
            password: p.password,
            full_name: p.full_name,
            role: p.role,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateUserResponse {
    pub id: Uuid,
    pub email: String,
    pub role: String,
}

impl CreateUserResponse {
    pub fn new(user: CreatedUser, role: AppRole) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: role.as_str().to_string(),
        }
    }
}

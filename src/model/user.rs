use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Public view of an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    #[schema(example = 7)]
    pub id: u64,
    #[schema(example = "jdoe")]
    pub username: String,
    #[schema(example = false)]
    pub is_manager: bool,
}

/// Account row including the argon2 password hash.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserCredentials {
    pub id: u64,
    pub username: String,
    pub password: String,
    pub is_manager: bool,
}

impl UserCredentials {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            is_manager: self.is_manager,
        }
    }
}
